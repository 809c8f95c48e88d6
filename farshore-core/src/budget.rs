//! Budget policy governing how much travel cost a route may consume.
use serde::{Deserialize, Serialize};

use crate::vehicle::VehicleCapability;

/// Upper bound accepted for a fixed-duration ceiling.
pub const MAX_BUDGET_HOURS: u8 = 48;

/// Rule deciding the cumulative travel cost available to route search.
///
/// Exactly one policy is active per invocation; it is owned by the caller's
/// settings layer and passed in by value. One cost unit equals one minute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPolicy {
    /// Bounded only by the vehicle's range.
    Unrestricted,
    /// Explicit hour:minute ceiling.
    Fixed { hours: u8, minutes: u8 },
    /// Same ceiling, but among equal-yield routes prefer the one consuming
    /// the most of the remaining budget.
    Maximize { hours: u8, minutes: u8 },
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self::Unrestricted
    }
}

impl BudgetPolicy {
    /// Ceiling in cost units, clamped to the valid range; `None` when
    /// unrestricted.
    #[must_use]
    pub fn ceiling(&self) -> Option<f32> {
        match *self {
            Self::Unrestricted => None,
            Self::Fixed { hours, minutes } | Self::Maximize { hours, minutes } => {
                let hours = u32::from(hours.min(MAX_BUDGET_HOURS));
                let minutes = u32::from(minutes.min(59));
                #[allow(clippy::cast_precision_loss)]
                Some((hours * 60 + minutes) as f32)
            }
        }
    }

    /// Budget actually available to a vehicle under this policy.
    #[must_use]
    pub fn effective_budget(&self, capability: &VehicleCapability) -> f32 {
        let range = capability.range.max(0.0);
        match self.ceiling() {
            Some(ceiling) => ceiling.min(range),
            None => range,
        }
    }

    /// Whether ties between equal-yield routes prefer higher consumption.
    #[must_use]
    pub const fn prefers_full_consumption(&self) -> bool {
        matches!(self, Self::Maximize { .. })
    }
}
