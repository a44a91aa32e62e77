//! Admin notification stream configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Notification pipeline tuning
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    /// Per-connection outbound buffer; events beyond it are dropped for
    /// that connection
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Interval between keep-alive comment frames
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u64,

    /// Default size of a subscriber's local notification list
    #[serde(default = "default_max_recent")]
    pub max_recent: usize,
}

impl NotificationsConfig {
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=10_000).contains(&self.channel_capacity) {
            return Err(ValidationError::InvalidChannelCapacity);
        }
        if !(1..=300).contains(&self.keep_alive_secs) {
            return Err(ValidationError::InvalidKeepAlive);
        }
        Ok(())
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            keep_alive_secs: default_keep_alive(),
            max_recent: default_max_recent(),
        }
    }
}

fn default_channel_capacity() -> usize {
    64
}

fn default_keep_alive() -> u64 {
    15
}

fn default_max_recent() -> usize {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = NotificationsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.keep_alive(), Duration::from_secs(15));
    }

    #[test]
    fn zero_capacity_rejected() {
        let config = NotificationsConfig {
            channel_capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidChannelCapacity));
    }

    #[test]
    fn keep_alive_bounds() {
        let config = NotificationsConfig {
            keep_alive_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidKeepAlive));
    }
}
