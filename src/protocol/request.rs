// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Requests published on `device/<serial>/request`.

use serde::Serialize;

use crate::error::ParseError;

/// Asks the printer to publish a full report instead of a delta.
///
/// # Examples
///
/// ```
/// use bambu_monitor::protocol::PushAllRequest;
///
/// let payload = PushAllRequest::new().to_payload().unwrap();
/// assert_eq!(
///     String::from_utf8(payload).unwrap(),
///     r#"{"pushing":{"sequence_id":"0","command":"pushall","version":1,"push_target":1}}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushAllRequest {
    pushing: Pushing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Pushing {
    sequence_id: String,
    command: &'static str,
    version: u32,
    push_target: u32,
}

impl PushAllRequest {
    /// Creates a request with sequence ID `"0"`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pushing: Pushing {
                sequence_id: "0".to_string(),
                command: "pushall",
                version: 1,
                push_target: 1,
            },
        }
    }

    /// Sets the sequence ID echoed back by the printer.
    #[must_use]
    pub fn with_sequence_id(mut self, sequence_id: impl Into<String>) -> Self {
        self.pushing.sequence_id = sequence_id.into();
        self
    }

    /// Returns the sequence ID.
    #[must_use]
    pub fn sequence_id(&self) -> &str {
        &self.pushing.sequence_id
    }

    /// Encodes the request as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] if encoding fails.
    pub fn to_payload(&self) -> Result<Vec<u8>, ParseError> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl Default for PushAllRequest {
    fn default() -> Self {
        Self::new()
    }
}
