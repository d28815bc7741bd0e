// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `bambu_monitor` library.
//!
//! The reconciliation pipeline itself never fails: merging is total and
//! interpretation degrades unparsable values to "absent". Errors only exist
//! at the edges of the crate: decoding raw payloads, talking to the MQTT
//! broker, validating configuration, and driving the monitor loop.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while decoding a printer report.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Configuration is invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The monitor loop is already consuming a report source.
    #[error("monitor is already running")]
    AlreadyRunning,
}

/// Errors related to MQTT communication with the printer.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT connection or communication failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// The connection's event loop is no longer running.
    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

/// Errors related to decoding printer reports.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON decoding or encoding failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A message arrived on a topic that does not carry printer reports.
    #[error("unexpected topic: {0}")]
    UnexpectedTopic(String),
}

/// Errors related to configuration validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field is empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A field holds a value that cannot be used.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
