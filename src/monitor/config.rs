// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Monitor configuration.

use tokio::sync::mpsc;

use crate::error::ConfigError;
use crate::report::Report;

/// Default capacity of the report channel.
pub const DEFAULT_REPORT_CAPACITY: usize = 64;

/// Configuration for a [`Monitor`](super::Monitor).
///
/// # Examples
///
/// ```
/// use bambu_monitor::MonitorConfig;
///
/// let config = MonitorConfig::new()
///     .with_label("workshop-x1c")
///     .with_report_capacity(16)
///     .with_lifecycle_logging(false);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.label(), Some("workshop-x1c"));
///
/// let (tx, rx) = config.report_channel();
/// # drop((tx, rx));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    label: Option<String>,
    report_capacity: usize,
    log_lifecycle_events: bool,
}

impl MonitorConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a label attached to the monitor's log records.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the capacity of the channel created by [`report_channel`](Self::report_channel).
    #[must_use]
    pub fn with_report_capacity(mut self, capacity: usize) -> Self {
        self.report_capacity = capacity;
        self
    }

    /// Enables or disables `info` logs for lifecycle events.
    #[must_use]
    pub fn with_lifecycle_logging(mut self, enabled: bool) -> Self {
        self.log_lifecycle_events = enabled;
        self
    }

    /// Returns the label, if set.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the report channel capacity.
    #[must_use]
    pub fn report_capacity(&self) -> usize {
        self.report_capacity
    }

    /// Returns whether lifecycle events are logged.
    #[must_use]
    pub fn log_lifecycle_events(&self) -> bool {
        self.log_lifecycle_events
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the report capacity is zero
    /// or the label is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "report_capacity",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.label.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::InvalidValue {
                field: "label",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Creates a report channel with the configured capacity.
    ///
    /// A zero capacity is raised to one.
    #[must_use]
    pub fn report_channel(&self) -> (mpsc::Sender<Report>, mpsc::Receiver<Report>) {
        mpsc::channel(self.report_capacity.max(1))
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            label: None,
            report_capacity: DEFAULT_REPORT_CAPACITY,
            log_lifecycle_events: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.label(), None);
        assert_eq!(config.report_capacity(), DEFAULT_REPORT_CAPACITY);
        assert!(config.log_lifecycle_events());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_sets_values() {
        let config = MonitorConfig::new()
            .with_label("p1s")
            .with_report_capacity(8)
            .with_lifecycle_logging(false);

        assert_eq!(config.label(), Some("p1s"));
        assert_eq!(config.report_capacity(), 8);
        assert!(!config.log_lifecycle_events());
    }

    #[test]
    fn zero_capacity_is_invalid() {
        let err = MonitorConfig::new()
            .with_report_capacity(0)
            .validate()
            .unwrap_err();

        assert_eq!(
            err,
            ConfigError::InvalidValue {
                field: "report_capacity",
                message: "must be greater than zero".to_string(),
            }
        );
    }

    #[test]
    fn empty_label_is_invalid() {
        let err = MonitorConfig::new().with_label("").validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "label", .. }));
    }

    #[tokio::test]
    async fn report_channel_uses_capacity() {
        let (tx, _rx) = MonitorConfig::new().with_report_capacity(2).report_channel();
        assert_eq!(tx.max_capacity(), 2);

        let (tx, _rx) = MonitorConfig::new().with_report_capacity(0).report_channel();
        assert_eq!(tx.max_capacity(), 1);
    }
}
