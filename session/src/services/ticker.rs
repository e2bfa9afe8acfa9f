//! Live ticker: one fixed-rate recomputation timer per roast

use std::collections::HashMap;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// Owns the tick tasks, keyed by roast id.
///
/// Starting a ticker for a roast that already has one cancels the old task
/// first, so a roast never has two timers running. Dropping the registry
/// cancels everything.
#[derive(Debug)]
pub struct TickerRegistry {
    period: Duration,
    tickers: HashMap<Uuid, JoinHandle<()>>,
}

impl TickerRegistry {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            tickers: HashMap::new(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run `on_tick` every period for `roast_id`, starting immediately.
    ///
    /// Must be called from within a Tokio runtime. Ticks that fall behind are
    /// skipped rather than queued.
    pub fn start<F>(&mut self, roast_id: Uuid, mut on_tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        if self.cancel(roast_id) {
            tracing::debug!("Replacing ticker for roast {}", roast_id);
        }

        let period = self.period;
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                on_tick();
            }
        });

        self.tickers.insert(roast_id, handle);
        tracing::debug!("Ticker started for roast {} every {:?}", roast_id, period);
    }

    /// Cancel the ticker for a roast; returns whether one was running
    pub fn cancel(&mut self, roast_id: Uuid) -> bool {
        match self.tickers.remove(&roast_id) {
            Some(handle) => {
                handle.abort();
                tracing::debug!("Ticker cancelled for roast {}", roast_id);
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (roast_id, handle) in self.tickers.drain() {
            handle.abort();
            tracing::debug!("Ticker cancelled for roast {}", roast_id);
        }
    }

    pub fn is_running(&self, roast_id: Uuid) -> bool {
        self.tickers
            .get(&roast_id)
            .map_or(false, |handle| !handle.is_finished())
    }

    pub fn active_count(&self) -> usize {
        self.tickers.values().filter(|h| !h.is_finished()).count()
    }
}

impl Drop for TickerRegistry {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
