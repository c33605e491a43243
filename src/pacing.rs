//! Randomised request pacing.
//!
//! Every outbound request is preceded by a pause of
//! `base_delay + fraction * delay_multiplier` seconds, with `fraction` drawn
//! uniformly from `[0, 1)` on each call.

use std::time::Duration;

use tokio::time::sleep;

use crate::config::ConfigError;

/// Delay parameters applied before each outbound request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    base_delay: f64,
    delay_multiplier: f64,
}

impl Pacing {
    /// Both values are in seconds and must be finite and non-negative.
    pub fn new(base_delay: f64, delay_multiplier: f64) -> Result<Self, ConfigError> {
        check_delay("base_delay", base_delay)?;
        check_delay("delay_multiplier", delay_multiplier)?;
        // The longest possible pause must still fit in a `Duration`.
        if Duration::try_from_secs_f64(base_delay + delay_multiplier).is_err() {
            let name = if base_delay >= delay_multiplier {
                "base_delay"
            } else {
                "delay_multiplier"
            };
            let value = base_delay.max(delay_multiplier);
            return Err(ConfigError::InvalidDelay { name, value });
        }
        Ok(Self {
            base_delay,
            delay_multiplier,
        })
    }

    /// No pause at all.
    pub fn disabled() -> Self {
        Self {
            base_delay: 0.0,
            delay_multiplier: 0.0,
        }
    }

    pub fn base_delay(&self) -> f64 {
        self.base_delay
    }

    pub fn delay_multiplier(&self) -> f64 {
        self.delay_multiplier
    }

    /// Delay for an explicit fraction. Fractions outside `[0, 1)` are clamped.
    pub fn delay_for(&self, fraction: f64) -> Duration {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0 - f64::EPSILON)
        };
        Duration::from_secs_f64(self.base_delay + fraction * self.delay_multiplier)
    }

    /// Draws a fresh delay.
    pub fn next_delay(&self) -> Duration {
        self.delay_for(rand::random::<f64>())
    }

    /// Suspends the caller for a freshly drawn delay.
    pub async fn pause(&self) -> Duration {
        let delay = self.next_delay();
        if !delay.is_zero() {
            log::debug!("pausing {:.2}s before next request", delay.as_secs_f64());
            sleep(delay).await;
        }
        delay
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            base_delay: 1.0,
            delay_multiplier: 1.0,
        }
    }
}

fn check_delay(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDelay { name, value })
    }
}
