use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;

use crate::models::chart::ChartDataPoint;
use crate::models::snapshot::PortfolioSnapshot;

/// Share of today's net worth the trajectory starts from.
const TRAJECTORY_START_FACTOR: f64 = 0.68;

/// Maximum relative jitter applied to historical points (±2%).
const JITTER_SPREAD: f64 = 0.02;

/// Maximum number of monthly points in a trajectory (10 years).
pub const MAX_TRAJECTORY_POINTS: usize = 120;

/// Builds the decorative chart series shown on the dashboard.
///
/// The core computes the numbers and the frontend only renders them. None of this
/// is durable data: every call produces a fresh series.
pub struct ChartService {
    jitter: bool,
}

impl ChartService {
    pub fn new() -> Self {
        Self { jitter: true }
    }

    /// A service whose output is fully deterministic (no random jitter).
    pub fn without_jitter() -> Self {
        Self { jitter: false }
    }

    /// Monthly "wealth trajectory" ending at the current net worth.
    ///
    /// Produces `points` entries labelled with month abbreviations, oldest
    /// first, the last one labelled with `ending`'s month. Earlier points
    /// rise linearly from 68% of net worth; all but the last get jitter.
    /// Requests longer than [`MAX_TRAJECTORY_POINTS`] are clamped to it.
    pub fn wealth_trajectory(
        &self,
        snapshot: &PortfolioSnapshot,
        ending: NaiveDate,
        points: usize,
    ) -> Vec<ChartDataPoint> {
        if points == 0 {
            return Vec::new();
        }
        let points = points.min(MAX_TRAJECTORY_POINTS);

        let net_worth = snapshot.net_worth.amount.to_f64().unwrap_or(0.0);
        let first_of_month = ending.with_day(1).unwrap_or(ending);
        let mut series = Vec::with_capacity(points);

        for i in 0..points {
            let label = u32::try_from(points - 1 - i)
                .ok()
                .and_then(|back| first_of_month.checked_sub_months(Months::new(back)))
                .map(|d| d.format("%b").to_string())
                .unwrap_or_default();

            let progress = if points == 1 {
                1.0
            } else {
                i as f64 / (points - 1) as f64
            };
            let factor = TRAJECTORY_START_FACTOR + (1.0 - TRAJECTORY_START_FACTOR) * progress;
            let mut value = net_worth * factor;

            if self.jitter && i + 1 < points {
                value *= 1.0 + random_unit() * JITTER_SPREAD;
            }

            series.push(ChartDataPoint {
                label,
                value: (value * 100.0).round() / 100.0,
            });
        }

        series
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniform-ish value in `[-1, 1]`. Falls back to 0 if the OS RNG is unavailable.
fn random_unit() -> f64 {
    let mut buf = [0u8; 4];
    if getrandom::getrandom(&mut buf).is_err() {
        return 0.0;
    }
    let raw = u32::from_le_bytes(buf) as f64 / u32::MAX as f64;
    raw * 2.0 - 1.0
}
