//! In-memory event store for a single roast
//!
//! Plays the part of the event backend: it assigns ids, offsets and
//! timestamps on append and returns events in insertion order.

use chrono::{DateTime, Utc};
use shared::{validate_new_event, EpochMillis, EpochSeconds, Event, NewEvent};
use uuid::Uuid;

use crate::error::{SessionError, SessionResult};

#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log seeded with events fetched from elsewhere, kept in the given order
    pub fn from_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Events in insertion order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Validate and append an event, computing its offset from the roast start
    pub fn append(
        &mut self,
        input: NewEvent,
        start_ts: EpochSeconds,
        now_ms: EpochMillis,
    ) -> SessionResult<&Event> {
        validate_new_event(&input)?;

        let offset = offset_secs(start_ts, now_ms);
        let event = input.into_event(Uuid::new_v4(), offset, timestamp(now_ms));
        self.events.push(event);
        Ok(&self.events[self.events.len() - 1])
    }

    /// Replace an event's content, keeping its id and creation time.
    ///
    /// `t_offset_sec` moves the event in time when given.
    pub fn edit(
        &mut self,
        id: Uuid,
        input: NewEvent,
        t_offset_sec: Option<u32>,
    ) -> SessionResult<&Event> {
        validate_new_event(&input)?;

        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(SessionError::EventNotFound(id))?;
        let offset = t_offset_sec.unwrap_or(event.t_offset_sec);
        *event = input.into_event(id, offset, event.created_at);
        Ok(event)
    }

    pub fn delete(&mut self, id: Uuid) -> SessionResult<Event> {
        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or(SessionError::EventNotFound(id))?;
        Ok(self.events.remove(index))
    }
}

/// Whole seconds from roast start, never negative
fn offset_secs(start_ts: EpochSeconds, now_ms: EpochMillis) -> u32 {
    let elapsed = now_ms.saturating_sub(start_ts.saturating_mul(1000)).div_euclid(1000);
    elapsed.clamp(0, i64::from(u32::MAX)) as u32
}

fn timestamp(now_ms: EpochMillis) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(now_ms).unwrap_or_default()
}
