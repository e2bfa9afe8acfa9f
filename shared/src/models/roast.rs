//! Finished roast models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Weights recorded when a roast is finalized
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoastWeights {
    pub green_weight_g: Decimal,
    pub roasted_weight_g: Decimal,
}

/// Summary of a finished roast, built from its frozen milestones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoastSummary {
    pub roast_id: Uuid,
    pub total_time_s: u32,
    pub drying_time_s: u32,
    pub maillard_time_s: u32,
    pub development_time_s: u32,
    /// Development time ratio, as a percentage of total time
    pub dtr_percent: Decimal,
    pub first_crack_temp_f: Option<f64>,
    pub drop_temp_f: Option<f64>,
    pub weight_loss_percent: Option<Decimal>,
}

/// Calculate weight loss percentage
pub fn calculate_weight_loss(green_weight: Decimal, roasted_weight: Decimal) -> Decimal {
    if green_weight.is_zero() {
        Decimal::ZERO
    } else {
        ((green_weight - roasted_weight) / green_weight) * Decimal::from(100)
    }
}

/// Calculate development time ratio (percentage of total roast time)
pub fn calculate_dtr(development_time: u32, total_time: u32) -> Decimal {
    if total_time == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(development_time) / Decimal::from(total_time)) * Decimal::from(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_loss() {
        let loss = calculate_weight_loss(Decimal::from(250), Decimal::from(215));
        assert_eq!(loss, Decimal::from(14));
        assert_eq!(calculate_weight_loss(Decimal::ZERO, Decimal::from(10)), Decimal::ZERO);
    }

    #[test]
    fn test_dtr() {
        assert_eq!(calculate_dtr(90, 600), Decimal::from(15));
        assert_eq!(calculate_dtr(90, 0), Decimal::ZERO);
    }
}
