// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT client for the printer's report stream.

use std::time::Duration;

use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS, TlsConfiguration, Transport};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{ProtocolError, Result};
use crate::monitor::DEFAULT_REPORT_CAPACITY;
use crate::report::Report;

use super::{PrinterConfig, PushAllRequest, TlsMode, decode_message, report_topic, request_topic};

/// Delay before polling again after an event loop error.
const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Capacity of the rumqttc request channel.
const REQUEST_CAPACITY: usize = 10;

/// Subscribes to a printer's reports and forwards them in arrival order.
///
/// Payloads that are not valid reports are logged and skipped. The client
/// reconnects on its own after network errors.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use bambu_monitor::Monitor;
/// use bambu_monitor::protocol::{PrinterConfig, ReportClient};
///
/// # async fn example() -> bambu_monitor::Result<()> {
/// let config = PrinterConfig::local("192.168.1.60", "01S00C123456789", "12345678")
///     .with_ca_certificate(std::fs::read("printer-ca.pem").unwrap_or_default());
///
/// let (client, reports) = ReportClient::connect(&config).await?;
/// client.request_push_all().await?;
///
/// let monitor = Arc::new(Monitor::new());
/// monitor.run(reports).await?;
/// client.disconnect().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ReportClient {
    client: AsyncClient,
    serial: String,
    task: JoinHandle<()>,
}

impl ReportClient {
    /// Connects to the broker and returns the client with a report receiver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the configuration
    /// is invalid, or [`Error::Protocol`](crate::Error::Protocol) if the
    /// subscription cannot be queued.
    pub async fn connect(config: &PrinterConfig) -> Result<(Self, mpsc::Receiver<Report>)> {
        let (tx, rx) = mpsc::channel(DEFAULT_REPORT_CAPACITY);
        let client = Self::connect_with_sender(config, tx).await?;
        Ok((client, rx))
    }

    /// Connects to the broker and forwards reports into `reports`.
    ///
    /// Use this with [`MonitorConfig::report_channel`](crate::MonitorConfig::report_channel)
    /// to control the channel capacity.
    ///
    /// # Errors
    ///
    /// Same as [`connect`](Self::connect).
    pub async fn connect_with_sender(
        config: &PrinterConfig,
        reports: mpsc::Sender<Report>,
    ) -> Result<Self> {
        config.validate()?;

        let options = mqtt_options(config);
        let (client, event_loop) = AsyncClient::new(options, REQUEST_CAPACITY);

        let topic = report_topic(config.serial());
        client
            .subscribe(&topic, QoS::AtLeastOnce)
            .await
            .map_err(ProtocolError::Mqtt)?;

        tracing::debug!(
            host = %config.host(),
            port = config.port(),
            serial = %config.serial(),
            "Connecting to printer broker"
        );

        let serial = config.serial().to_string();
        let task = tokio::spawn(handle_mqtt_events(
            event_loop,
            client.clone(),
            serial.clone(),
            reports,
        ));

        // Let the broker process CONNECT and SUBSCRIBE before the caller publishes
        tokio::time::sleep(Duration::from_millis(200)).await;

        Ok(Self {
            client,
            serial,
            task,
        })
    }

    /// Returns the printer serial number.
    #[must_use]
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Returns `true` while the event loop task is alive.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    /// Asks the printer to publish a full report.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::ChannelClosed`] if the event loop has stopped,
    /// or [`ProtocolError::Mqtt`] if the request cannot be queued.
    pub async fn request_push_all(&self) -> Result<()> {
        self.publish(&PushAllRequest::new()).await
    }

    /// Publishes a push-all request with a custom sequence ID.
    ///
    /// # Errors
    ///
    /// Same as [`request_push_all`](Self::request_push_all).
    pub async fn publish(&self, request: &PushAllRequest) -> Result<()> {
        if !self.is_active() {
            return Err(ProtocolError::ChannelClosed("MQTT event loop stopped".to_string()).into());
        }

        let topic = request_topic(&self.serial);
        let payload = request.to_payload()?;

        tracing::debug!(
            topic = %topic,
            sequence_id = %request.sequence_id(),
            "Publishing pushall request"
        );

        self.client
            .publish(&topic, QoS::AtLeastOnce, false, payload)
            .await
            .map_err(ProtocolError::Mqtt)?;
        Ok(())
    }

    /// Disconnects from the broker. The report receiver then closes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Mqtt`] if the disconnect cannot be queued.
    pub async fn disconnect(&self) -> Result<()> {
        tracing::debug!(serial = %self.serial, "Disconnecting from printer broker");
        self.client
            .disconnect()
            .await
            .map_err(ProtocolError::Mqtt)?;
        Ok(())
    }
}

impl Drop for ReportClient {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Builds rumqttc options from a printer configuration.
fn mqtt_options(config: &PrinterConfig) -> MqttOptions {
    let mut options = MqttOptions::new(config.client_id(), config.host(), config.port());
    options.set_keep_alive(config.keep_alive());
    options.set_clean_session(true);
    options.set_credentials(config.username(), config.password());

    match config.tls() {
        TlsMode::NativeRoots => {
            options.set_transport(Transport::tls_with_default_config());
        }
        TlsMode::CustomCa(ca) => {
            options.set_transport(Transport::tls_with_config(TlsConfiguration::Simple {
                ca: ca.clone(),
                alpn: None,
                client_auth: None,
            }));
        }
        TlsMode::Disabled => {}
    }

    options
}

/// Drives the event loop and forwards decoded reports.
async fn handle_mqtt_events(
    mut event_loop: EventLoop,
    client: AsyncClient,
    serial: String,
    reports: mpsc::Sender<Report>,
) {
    use rumqttc::{Event, Outgoing, Packet};

    let topic = report_topic(&serial);
    let mut connected_once = false;

    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                tracing::debug!(?connack, serial = %serial, "MQTT connected");
                // Clean sessions drop subscriptions on reconnect
                if connected_once
                    && let Err(e) = client.try_subscribe(&topic, QoS::AtLeastOnce)
                {
                    tracing::error!(error = %e, topic = %topic, "Failed to resubscribe");
                }
                connected_once = true;
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::debug!(?suback, "MQTT subscription acknowledged");
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                match decode_message(&serial, &publish.topic, &publish.payload) {
                    Ok(report) => {
                        if reports.send(report).await.is_err() {
                            tracing::debug!(serial = %serial, "Report receiver dropped");
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            topic = %publish.topic,
                            "Skipping undecodable report"
                        );
                    }
                }
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                tracing::debug!(serial = %serial, "MQTT disconnected");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                if reports.is_closed() {
                    break;
                }
                tracing::error!(error = %e, serial = %serial, "MQTT event loop error");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_from_local_config() {
        let config = PrinterConfig::local("192.168.1.60", "SERIAL", "code")
            .with_client_id("monitor")
            .with_keep_alive(Duration::from_secs(15))
            .without_tls();

        let options = mqtt_options(&config);

        assert_eq!(options.client_id(), "monitor");
        assert_eq!(
            options.broker_address(),
            ("192.168.1.60".to_string(), 8883)
        );
        assert_eq!(options.keep_alive(), Duration::from_secs(15));
        assert!(options.clean_session());
        assert!(matches!(options.transport(), Transport::Tcp));
    }

    #[test]
    fn options_with_ca_use_tls() {
        let config = PrinterConfig::local("printer", "SERIAL", "code")
            .with_ca_certificate(b"-----BEGIN CERTIFICATE-----".to_vec());

        let options = mqtt_options(&config);
        assert!(matches!(
            options.transport(),
            Transport::Tls(TlsConfiguration::Simple { .. })
        ));
    }
}
