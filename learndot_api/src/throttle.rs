//! Post-request pacing.
//!
//! The backend enforces an undocumented rate limit. Every request is
//! followed by a pause, whether the status was 200, some other status, or
//! the transport failed part way through reading the response.

use std::time::Duration;

use tokio::time::sleep;

/// Default pause after each backend response.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Delay strategy applied after every backend response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Throttle {
    /// No pause. Intended for tests and mock servers.
    None,
    /// Sleep for a fixed duration.
    Fixed(Duration),
}

impl Default for Throttle {
    fn default() -> Self {
        Throttle::Fixed(DEFAULT_DELAY)
    }
}

impl Throttle {
    /// Waits according to the strategy.
    pub async fn pause(&self) {
        match self {
            Throttle::None => {}
            Throttle::Fixed(delay) if delay.is_zero() => {}
            Throttle::Fixed(delay) => {
                tracing::trace!("Throttling for {:?}", delay);
                sleep(*delay).await;
            }
        }
    }
}
