// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `bambu_monitor` - Reconciles partial Bambu Lab printer reports into typed state.
//!
//! Printers only publish what changed since their previous report. This crate
//! folds those partial reports into a complete picture of the printer,
//! interprets it into typed values, and signals print lifecycle transitions.
//!
//! # Pipeline
//!
//! 1. **Merge** ([`report::merge`]): fold each raw [`Report`] into the
//!    accumulated baseline. Absent fields never erase known values; lists
//!    are replaced as a whole; a report that adds nothing is not a change.
//! 2. **Interpret** ([`state::interpret`]): convert the baseline into a
//!    [`PrinterState`] (fan speeds in percent, parsed numbers, named speed
//!    tiers, chamber light on/off). Unparsable values become absent.
//! 3. **Detect** ([`event::detect`]): compare the new state with the previous
//!    one and derive [`LifecycleEvent`]s (started, cancelled, finished).
//! 4. **Notify**: the [`Monitor`] fires its "updated" signal on every change,
//!    then one signal per lifecycle event.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bambu_monitor::Monitor;
//! use bambu_monitor::protocol::{PrinterConfig, ReportClient};
//!
//! #[tokio::main]
//! async fn main() -> bambu_monitor::Result<()> {
//!     let config = PrinterConfig::local("192.168.1.60", "01S00C123456789", "12345678")
//!         .with_ca_certificate(std::fs::read("printer-ca.pem").unwrap_or_default());
//!
//!     let (client, reports) = ReportClient::connect(&config).await?;
//!     client.request_push_all().await?;
//!
//!     let monitor = Arc::new(Monitor::new());
//!     let worker = Arc::clone(&monitor);
//!     tokio::spawn(async move { worker.run(reports).await });
//!
//!     loop {
//!         monitor.print_finished().wait().await;
//!         if let Some(state) = monitor.current_state() {
//!             println!("finished {:?}", state.current_print.subtask);
//!         }
//!     }
//! }
//! ```
//!
//! # Driving the Monitor Yourself
//!
//! Records can come from anywhere: [`Monitor::process`] handles one report
//! synchronously and [`Monitor::run`] consumes any `mpsc` channel.
//!
//! ```
//! use bambu_monitor::Monitor;
//! use bambu_monitor::report::decode_report;
//!
//! let monitor = Monitor::new();
//! let report = decode_report(br#"{"print":{"cooling_fan_speed":"15"}}"#).unwrap();
//!
//! assert!(monitor.process(&report));
//! assert!(!monitor.process(&report));
//! assert_eq!(monitor.current_state().unwrap().fans.part, Some(100.0));
//! ```
//!
//! # Features
//!
//! - `mqtt` (default): the [`protocol::ReportClient`] MQTT transport, built
//!   on `rumqttc`.

pub mod error;
pub mod event;
pub mod monitor;
pub mod protocol;
pub mod report;
pub mod state;
pub mod types;

pub use error::{ConfigError, Error, ParseError, ProtocolError, Result};
pub use event::{LifecycleEvent, Signal};
pub use monitor::{Monitor, MonitorConfig};
#[cfg(feature = "mqtt")]
pub use protocol::ReportClient;
pub use protocol::PrinterConfig;
pub use report::{Report, decode_report, merge};
pub use state::{PrinterState, interpret};
pub use types::{GcodeState, SpeedLevel};
