use serde::{Deserialize, Serialize};

/// A single point of a dashboard chart.
///
/// Generated at render time and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    /// Axis label (e.g., "Jan")
    pub label: String,

    /// Value in the snapshot currency
    pub value: f64,
}
