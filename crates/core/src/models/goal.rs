use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::money::Money;

/// A savings goal shown as a progress bar.
///
/// `current <= target` is expected but not enforced; display values are
/// clamped instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub current: Money,
    pub target: Money,
    /// Presentation color hint (e.g., "blue", "emerald")
    pub color_tag: String,
}

impl Goal {
    pub fn new(
        name: impl Into<String>,
        current: Money,
        target: Money,
        color_tag: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            current,
            target,
            color_tag: color_tag.into(),
        }
    }

    /// `current / target`, clamped to `[0, 1]`. A non-positive target yields 0.
    pub fn progress_ratio(&self) -> Decimal {
        if self.target.amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let ratio = self
            .current
            .amount
            .checked_div(self.target.amount)
            .unwrap_or(Decimal::ZERO);
        ratio.clamp(Decimal::ZERO, Decimal::ONE)
    }

    /// `round(100 * current / target)`, clamped to `[0, 100]`.
    pub fn progress_pct(&self) -> u8 {
        if self.target.amount <= Decimal::ZERO {
            return 0;
        }
        let pct = self
            .current
            .amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|v| v.checked_div(self.target.amount))
            .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .unwrap_or(Decimal::ZERO)
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        pct.to_u8().unwrap_or(0)
    }
}
