// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT transport for printer reports.
//!
//! Printers publish partial reports on `device/<serial>/report` and accept
//! requests on `device/<serial>/request`, both on the printer's own broker
//! (LAN mode) and on the cloud broker.
//!
//! - [`PrinterConfig`]: broker address, credentials and TLS settings
//! - [`ReportClient`]: subscribes to reports and feeds them into a channel
//!   (requires the `mqtt` feature, enabled by default)
//! - [`PushAllRequest`]: asks the printer for a full report

mod config;
#[cfg(feature = "mqtt")]
mod mqtt;
mod request;

pub use config::{BrokerKind, DEFAULT_KEEP_ALIVE, DEFAULT_PORT, LOCAL_USERNAME, PrinterConfig, TlsMode};
#[cfg(feature = "mqtt")]
pub use mqtt::ReportClient;
pub use request::PushAllRequest;

use crate::error::ParseError;
use crate::report::{Report, decode_report};

/// Returns the topic a printer publishes reports on.
///
/// # Examples
///
/// ```
/// use bambu_monitor::protocol::report_topic;
///
/// assert_eq!(report_topic("01S00C123456789"), "device/01S00C123456789/report");
/// ```
#[must_use]
pub fn report_topic(serial: &str) -> String {
    format!("device/{serial}/report")
}

/// Returns the topic a printer accepts requests on.
#[must_use]
pub fn request_topic(serial: &str) -> String {
    format!("device/{serial}/request")
}

/// Decodes a message received for the printer `serial`.
///
/// # Errors
///
/// Returns [`ParseError::UnexpectedTopic`] if `topic` is not the printer's
/// report topic, or [`ParseError::Json`] if the payload is not a report.
pub fn decode_message(serial: &str, topic: &str, payload: &[u8]) -> Result<Report, ParseError> {
    if topic != report_topic(serial) {
        return Err(ParseError::UnexpectedTopic(topic.to_string()));
    }
    decode_report(payload)
}
