// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Printer connection configuration.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::ConfigError;

/// Username of the printer's local MQTT broker.
pub const LOCAL_USERNAME: &str = "bblp";

/// Default MQTT port of both the printer and the cloud broker.
pub const DEFAULT_PORT: u16 = 8883;

/// Default keep-alive interval.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(10);

/// Counter for generating unique client IDs.
static CLIENT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// How the connection to the broker is secured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsMode {
    /// TLS verified against the platform's root certificates.
    NativeRoots,
    /// TLS verified against the given PEM certificate authority.
    CustomCa(Vec<u8>),
    /// Plain TCP.
    Disabled,
}

/// Whether the configuration targets the printer itself or the cloud broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerKind {
    /// The MQTT broker embedded in the printer (LAN mode).
    Local,
    /// The manufacturer's cloud broker.
    Cloud,
}

/// Connection settings for a printer's report stream.
///
/// Printers in LAN mode present a self-signed certificate; pass their CA with
/// [`with_ca_certificate`](Self::with_ca_certificate).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use bambu_monitor::protocol::{BrokerKind, PrinterConfig};
///
/// let config = PrinterConfig::local("192.168.1.60", "01S00C123456789", "12345678")
///     .with_keep_alive(Duration::from_secs(30))
///     .with_client_id("workshop-monitor");
///
/// assert_eq!(config.kind(), BrokerKind::Local);
/// assert_eq!(config.username(), "bblp");
/// assert_eq!(config.port(), 8883);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PrinterConfig {
    kind: BrokerKind,
    host: String,
    port: u16,
    serial: String,
    username: String,
    password: String,
    client_id: Option<String>,
    keep_alive: Duration,
    tls: TlsMode,
}

impl PrinterConfig {
    /// Connects to the printer's own broker with its LAN access code.
    #[must_use]
    pub fn local(
        host: impl Into<String>,
        serial: impl Into<String>,
        access_code: impl Into<String>,
    ) -> Self {
        Self::new(
            BrokerKind::Local,
            host.into(),
            serial.into(),
            LOCAL_USERNAME.to_string(),
            access_code.into(),
        )
    }

    /// Connects to the cloud broker with account credentials.
    #[must_use]
    pub fn cloud(
        endpoint: impl Into<String>,
        serial: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(
            BrokerKind::Cloud,
            endpoint.into(),
            serial.into(),
            username.into(),
            password.into(),
        )
    }

    fn new(
        kind: BrokerKind,
        host: String,
        serial: String,
        username: String,
        password: String,
    ) -> Self {
        Self {
            kind,
            host,
            port: DEFAULT_PORT,
            serial,
            username,
            password,
            client_id: None,
            keep_alive: DEFAULT_KEEP_ALIVE,
            tls: TlsMode::NativeRoots,
        }
    }

    /// Sets the broker port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the MQTT client ID. A unique ID is generated otherwise.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the keep-alive interval.
    #[must_use]
    pub fn with_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Verifies the broker against a PEM encoded certificate authority.
    #[must_use]
    pub fn with_ca_certificate(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.tls = TlsMode::CustomCa(pem.into());
        self
    }

    /// Connects over plain TCP.
    #[must_use]
    pub fn without_tls(mut self) -> Self {
        self.tls = TlsMode::Disabled;
        self
    }

    /// Returns the broker kind.
    #[must_use]
    pub fn kind(&self) -> BrokerKind {
        self.kind
    }

    /// Returns the broker host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the broker port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the printer serial number.
    #[must_use]
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Returns the MQTT username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Returns the keep-alive interval.
    #[must_use]
    pub fn keep_alive(&self) -> Duration {
        self.keep_alive
    }

    /// Returns the transport security mode.
    #[must_use]
    pub fn tls(&self) -> &TlsMode {
        &self.tls
    }

    /// Returns the configured client ID, or generates a unique one.
    #[must_use]
    pub fn client_id(&self) -> String {
        self.client_id.clone().unwrap_or_else(|| {
            let counter = CLIENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
            format!("bambu_monitor_{}_{}", std::process::id(), counter)
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] for an empty host, serial,
    /// username or password, and [`ConfigError::InvalidValue`] for a serial
    /// that is not usable in a topic, a zero port, an empty client ID, or a
    /// keep-alive shorter than one second.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingField("host"));
        }
        if self.serial.is_empty() {
            return Err(ConfigError::MissingField("serial"));
        }
        if self.username.is_empty() {
            return Err(ConfigError::MissingField("username"));
        }
        if self.password.is_empty() {
            return Err(ConfigError::MissingField("password"));
        }
        if let Some(c) = self
            .serial
            .chars()
            .find(|c| matches!(c, '/' | '+' | '#') || c.is_whitespace())
        {
            return Err(ConfigError::InvalidValue {
                field: "serial",
                message: format!("must not contain {c:?}"),
            });
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port",
                message: "must not be zero".to_string(),
            });
        }
        if self.client_id.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::InvalidValue {
                field: "client_id",
                message: "must not be empty".to_string(),
            });
        }
        if self.keep_alive < Duration::from_secs(1) {
            return Err(ConfigError::InvalidValue {
                field: "keep_alive",
                message: "must be at least one second".to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for PrinterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrinterConfig")
            .field("kind", &self.kind)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("serial", &self.serial)
            .field("username", &self.username)
            .field("password", &"***")
            .field("client_id", &self.client_id)
            .field("keep_alive", &self.keep_alive)
            .field("tls", &self.tls)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_defaults() {
        let config = PrinterConfig::local("192.168.1.60", "SERIAL", "code");

        assert_eq!(config.kind(), BrokerKind::Local);
        assert_eq!(config.host(), "192.168.1.60");
        assert_eq!(config.port(), DEFAULT_PORT);
        assert_eq!(config.serial(), "SERIAL");
        assert_eq!(config.username(), LOCAL_USERNAME);
        assert_eq!(config.password(), "code");
        assert_eq!(config.keep_alive(), DEFAULT_KEEP_ALIVE);
        assert_eq!(config.tls(), &TlsMode::NativeRoots);
    }

    #[test]
    fn cloud_uses_account_credentials() {
        let config = PrinterConfig::cloud("us.mqtt.bambulab.com", "SERIAL", "u_123", "token");

        assert_eq!(config.kind(), BrokerKind::Cloud);
        assert_eq!(config.username(), "u_123");
        assert_eq!(config.password(), "token");
        assert_eq!(config.port(), DEFAULT_PORT);
    }

    #[test]
    fn builder_overrides() {
        let config = PrinterConfig::local("printer", "SERIAL", "code")
            .with_port(1883)
            .with_client_id("monitor")
            .with_keep_alive(Duration::from_secs(60))
            .with_ca_certificate(b"-----BEGIN CERTIFICATE-----".to_vec());

        assert_eq!(config.port(), 1883);
        assert_eq!(config.client_id(), "monitor");
        assert_eq!(config.keep_alive(), Duration::from_secs(60));
        assert!(matches!(config.tls(), TlsMode::CustomCa(_)));

        assert_eq!(config.without_tls().tls(), &TlsMode::Disabled);
    }

    #[test]
    fn generated_client_ids_are_unique() {
        let config = PrinterConfig::local("printer", "SERIAL", "code");
        let first = config.client_id();
        let second = config.client_id();

        assert!(first.starts_with("bambu_monitor_"));
        assert_ne!(first, second);
    }

    #[test]
    fn missing_fields() {
        assert_eq!(
            PrinterConfig::local(" ", "SERIAL", "code").validate(),
            Err(ConfigError::MissingField("host"))
        );
        assert_eq!(
            PrinterConfig::local("printer", "", "code").validate(),
            Err(ConfigError::MissingField("serial"))
        );
        assert_eq!(
            PrinterConfig::local("printer", "SERIAL", "").validate(),
            Err(ConfigError::MissingField("password"))
        );
        assert_eq!(
            PrinterConfig::cloud("broker", "SERIAL", "", "token").validate(),
            Err(ConfigError::MissingField("username"))
        );
    }

    #[test]
    fn serial_must_be_topic_safe() {
        for serial in ["a/b", "a+b", "a#", "a b"] {
            let err = PrinterConfig::local("printer", serial, "code")
                .validate()
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { field: "serial", .. }));
        }
    }

    #[test]
    fn invalid_values() {
        let base = PrinterConfig::local("printer", "SERIAL", "code");

        assert!(matches!(
            base.clone().with_port(0).validate(),
            Err(ConfigError::InvalidValue { field: "port", .. })
        ));
        assert!(matches!(
            base.clone().with_client_id("").validate(),
            Err(ConfigError::InvalidValue { field: "client_id", .. })
        ));
        assert!(matches!(
            base.with_keep_alive(Duration::from_millis(200)).validate(),
            Err(ConfigError::InvalidValue { field: "keep_alive", .. })
        ));
    }

    #[test]
    fn debug_hides_password() {
        let config = PrinterConfig::local("printer", "SERIAL", "secret-code");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-code"));
        assert!(debug.contains("SERIAL"));
    }
}
