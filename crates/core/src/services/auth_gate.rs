use chrono::{DateTime, Duration, Utc};

/// Timer behind the fake biometric splash.
///
/// Purely cosmetic: it only decides *when* the splash gives way to the
/// dashboard. It verifies nothing.
#[derive(Debug, Clone)]
pub struct AuthGate {
    delay: Duration,
    armed_at: Option<DateTime<Utc>>,
}

impl AuthGate {
    pub fn new(delay_ms: u64) -> Self {
        let delay = i64::try_from(delay_ms)
            .ok()
            .and_then(Duration::try_milliseconds)
            .unwrap_or_else(Duration::zero);
        Self {
            delay,
            armed_at: None,
        }
    }

    pub fn arm(&mut self, now: DateTime<Utc>) {
        self.armed_at = Some(now);
    }

    pub fn disarm(&mut self) {
        self.armed_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// True once the delay has fully elapsed since arming.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.armed_at
            .map(|armed_at| now - armed_at >= self.delay)
            .unwrap_or(false)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}
