// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The report reconciliation pipeline.
//!
//! A [`Monitor`] consumes raw [`Report`]s in arrival order. For each one it
//! merges the report into the accumulated baseline, and if anything changed
//! it re-interprets the baseline into a [`PrinterState`], shifts the two-deep
//! history, derives lifecycle events and fires the matching signals.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use bambu_monitor::Monitor;
//! use bambu_monitor::report::decode_report;
//! use bambu_monitor::types::GcodeState;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> bambu_monitor::Result<()> {
//! let monitor = Arc::new(Monitor::new());
//! let (tx, rx) = monitor.config().report_channel();
//!
//! let worker = Arc::clone(&monitor);
//! let handle = tokio::spawn(async move { worker.run(rx).await });
//!
//! tx.send(decode_report(br#"{"print":{"gcode_state":"IDLE"}}"#)?).await.ok();
//! tx.send(decode_report(br#"{"print":{"gcode_state":"RUNNING"}}"#)?).await.ok();
//! drop(tx);
//!
//! handle.await.expect("monitor task panicked")?;
//!
//! let state = monitor.current_state().unwrap();
//! assert_eq!(state.gcode.state, Some(GcodeState::Running));
//! let previous = monitor.previous_state().unwrap();
//! assert_eq!(previous.gcode.state, Some(GcodeState::Idle));
//! # Ok(())
//! # }
//! ```

mod config;
mod history;
mod shutdown;

pub use config::{DEFAULT_REPORT_CAPACITY, MonitorConfig};

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::event::{LifecycleEvent, Signal, UpdateBus, detect};
use crate::report::{Report, merge};
use crate::state::PrinterState;

use history::History;
use shutdown::Shutdown;

/// Everything readers can observe, swapped as a unit under one lock.
#[derive(Debug, Default)]
struct Snapshot {
    reports: History<Report>,
    states: History<PrinterState>,
    last_update: Option<DateTime<Utc>>,
}

/// Reconciles a stream of partial printer reports into typed state.
///
/// The monitor is meant to be shared behind an [`Arc`](std::sync::Arc): one
/// task drives it with [`run`](Self::run) (or calls [`process`](Self::process)
/// directly) while any number of readers use the accessors and wait on the
/// signals. Readers always observe a fully processed report, never a partial
/// merge.
///
/// After [`stop`](Self::stop) the monitor is inert: further records are
/// ignored and no signal fires.
#[derive(Debug)]
pub struct Monitor {
    config: MonitorConfig,
    snapshot: RwLock<Snapshot>,
    bus: UpdateBus,
    shutdown: Shutdown,
    running: AtomicBool,
}

impl Monitor {
    /// Creates a monitor with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(MonitorConfig::default())
    }

    /// Creates a monitor with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn with_config(config: MonitorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: MonitorConfig) -> Self {
        Self {
            config,
            snapshot: RwLock::new(Snapshot::default()),
            bus: UpdateBus::new(),
            shutdown: Shutdown::new(),
            running: AtomicBool::new(false),
        }
    }

    /// Returns the monitor's configuration.
    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn label(&self) -> &str {
        self.config.label().unwrap_or("printer")
    }

    /// Processes one report synchronously.
    ///
    /// Returns `true` if the report changed the accumulated state, in which
    /// case the state and history were updated and the signals fired. Returns
    /// `false` for reports that add nothing, and for every report once the
    /// monitor is stopped.
    pub fn process(&self, incoming: &Report) -> bool {
        if self.shutdown.is_triggered() {
            tracing::trace!(label = %self.label(), "Monitor stopped, ignoring report");
            return false;
        }

        let events = {
            let mut snapshot = self.snapshot.write();

            let (merged, changed) = merge(snapshot.reports.current().cloned(), incoming);
            if !changed {
                tracing::debug!(label = %self.label(), "Report carried no changes");
                return false;
            }

            let state = PrinterState::from_report(&merged);
            let events = detect(&state, snapshot.states.current());

            snapshot.reports.push(merged);
            snapshot.states.push(state);
            snapshot.last_update = Some(Utc::now());
            events
        };

        tracing::debug!(label = %self.label(), events = events.len(), "Printer state updated");
        if self.config.log_lifecycle_events() {
            for event in &events {
                tracing::info!(label = %self.label(), event = %event, "Print lifecycle event");
            }
        }

        self.bus.publish(&events, || self.shutdown.is_triggered());
        true
    }

    /// Consumes reports until the source closes or the monitor is stopped.
    ///
    /// Reports are processed one at a time in arrival order. The loop checks
    /// for shutdown before each report and while waiting for the next one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyRunning`] if another call to `run` is active on
    /// this monitor.
    pub async fn run(&self, mut reports: mpsc::Receiver<Report>) -> Result<()> {
        if self.running.swap(true, Ordering::AcqRel) {
            return Err(Error::AlreadyRunning);
        }
        let _guard = RunningGuard(&self.running);

        tracing::info!(label = %self.label(), "Monitor started");

        loop {
            if self.shutdown.is_triggered() {
                break;
            }

            tokio::select! {
                biased;

                () = self.shutdown.wait() => break,
                report = reports.recv() => {
                    let Some(report) = report else {
                        tracing::debug!(label = %self.label(), "Report source closed");
                        break;
                    };
                    self.process(&report);
                }
            }
        }

        tracing::info!(label = %self.label(), "Monitor stopped");
        Ok(())
    }

    /// Stops the monitor.
    ///
    /// Idempotent and safe to call from any task. A running [`run`](Self::run)
    /// loop returns promptly; later reports are ignored.
    pub fn stop(&self) {
        if self.shutdown.trigger() {
            tracing::info!(label = %self.label(), "Monitor stop requested");
        }
    }

    /// Returns `true` once [`stop`](Self::stop) has been called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.shutdown.is_triggered()
    }

    /// Returns `true` while a [`run`](Self::run) loop is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Returns the accumulated report after the latest change.
    #[must_use]
    pub fn current_report(&self) -> Option<Report> {
        self.snapshot.read().reports.current().cloned()
    }

    /// Returns the accumulated report before the latest change.
    #[must_use]
    pub fn previous_report(&self) -> Option<Report> {
        self.snapshot.read().reports.previous().cloned()
    }

    /// Returns the printer state after the latest change.
    #[must_use]
    pub fn current_state(&self) -> Option<PrinterState> {
        self.snapshot.read().states.current().cloned()
    }

    /// Returns the printer state before the latest change.
    #[must_use]
    pub fn previous_state(&self) -> Option<PrinterState> {
        self.snapshot.read().states.previous().cloned()
    }

    /// Returns when the state last changed.
    #[must_use]
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.snapshot.read().last_update
    }

    /// Signal fired on every state change.
    #[must_use]
    pub fn updated(&self) -> &Signal {
        self.bus.updated()
    }

    /// Signal fired when a print starts.
    #[must_use]
    pub fn print_started(&self) -> &Signal {
        self.bus.lifecycle(LifecycleEvent::PrintStarted)
    }

    /// Signal fired on every change while the current job reports a cancellation.
    #[must_use]
    pub fn print_cancelled(&self) -> &Signal {
        self.bus.lifecycle(LifecycleEvent::PrintCancelled)
    }

    /// Signal fired when a print finishes.
    #[must_use]
    pub fn print_finished(&self) -> &Signal {
        self.bus.lifecycle(LifecycleEvent::PrintFinished)
    }

    /// Signal for the given lifecycle event.
    #[must_use]
    pub fn lifecycle(&self, event: LifecycleEvent) -> &Signal {
        self.bus.lifecycle(event)
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the running flag when the loop exits, including on cancellation.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::event::CANCELLED_ERROR_CODE;
    use crate::report::decode_report;
    use crate::types::GcodeState;

    const WAIT: Duration = Duration::from_millis(50);

    fn report(json: &str) -> Report {
        decode_report(json.as_bytes()).unwrap()
    }

    #[test]
    fn starts_empty() {
        let monitor = Monitor::new();
        assert!(monitor.current_report().is_none());
        assert!(monitor.previous_report().is_none());
        assert!(monitor.current_state().is_none());
        assert!(monitor.previous_state().is_none());
        assert!(monitor.last_update().is_none());
        assert!(!monitor.is_stopped());
        assert!(!monitor.is_running());
    }

    #[test]
    fn with_config_rejects_invalid() {
        let result = Monitor::with_config(MonitorConfig::new().with_report_capacity(0));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn process_updates_history() {
        let monitor = Monitor::new();

        assert!(monitor.process(&report(r#"{"print":{"gcode_state":"IDLE","bed_temper":21.0}}"#)));
        assert!(monitor.process(&report(r#"{"print":{"gcode_state":"RUNNING"}}"#)));

        let current = monitor.current_state().unwrap();
        assert_eq!(current.gcode.state, Some(GcodeState::Running));
        assert_eq!(current.bed.temperature, Some(21.0));

        let previous = monitor.previous_state().unwrap();
        assert_eq!(previous.gcode.state, Some(GcodeState::Idle));

        let previous_report = monitor.previous_report().unwrap();
        assert_eq!(
            previous_report.print.unwrap().gcode_state.as_deref(),
            Some("IDLE")
        );
        assert!(monitor.last_update().is_some());
    }

    #[test]
    fn unchanged_report_leaves_history() {
        let monitor = Monitor::new();
        let first = report(r#"{"print":{"mc_percent":10}}"#);

        assert!(monitor.process(&first));
        let stamp = monitor.last_update();

        assert!(!monitor.process(&first));
        assert!(!monitor.process(&report("{}")));
        assert!(monitor.previous_state().is_none());
        assert_eq!(monitor.last_update(), stamp);
    }

    #[test]
    fn process_after_stop_is_noop() {
        let monitor = Monitor::new();
        monitor.stop();
        monitor.stop();

        assert!(monitor.is_stopped());
        assert!(!monitor.process(&report(r#"{"print":{"mc_percent":10}}"#)));
        assert!(monitor.current_state().is_none());
    }

    #[tokio::test]
    async fn process_fires_lifecycle_signals() {
        let monitor = Monitor::new();
        monitor.process(&report(r#"{"print":{"gcode_state":"IDLE"}}"#));

        let updated = monitor.updated().notified();
        let started = monitor.print_started().notified();
        let finished = monitor.print_finished().notified();

        monitor.process(&report(r#"{"print":{"gcode_state":"RUNNING"}}"#));

        tokio::time::timeout(WAIT, updated).await.expect("updated");
        tokio::time::timeout(WAIT, started).await.expect("started");
        assert!(tokio::time::timeout(WAIT, finished).await.is_err());
    }

    #[tokio::test]
    async fn cancelled_refires_while_code_is_set() {
        let monitor = Monitor::new();
        let cancelled = format!(r#"{{"print":{{"print_error":{CANCELLED_ERROR_CODE}}}}}"#);

        let first = monitor.print_cancelled().notified();
        monitor.process(&report(&cancelled));
        tokio::time::timeout(WAIT, first).await.expect("first");

        let second = monitor.print_cancelled().notified();
        monitor.process(&report(r#"{"print":{"mc_percent":3}}"#));
        tokio::time::timeout(WAIT, second).await.expect("second");
    }

    #[tokio::test]
    async fn stopped_monitor_fires_nothing() {
        let monitor = Monitor::new();
        let updated = monitor.updated().notified();

        monitor.stop();
        monitor.process(&report(r#"{"print":{"mc_percent":3}}"#));

        assert!(tokio::time::timeout(WAIT, updated).await.is_err());
    }

    #[tokio::test]
    async fn run_ends_when_source_closes() {
        let monitor = Monitor::new();
        let (tx, rx) = mpsc::channel(4);

        tx.send(report(r#"{"print":{"gcode_state":"IDLE"}}"#)).await.unwrap();
        tx.send(report(r#"{"print":{"gcode_state":"FINISH"}}"#)).await.unwrap();
        drop(tx);

        monitor.run(rx).await.unwrap();

        assert!(!monitor.is_running());
        assert!(!monitor.is_stopped());
        assert_eq!(
            monitor.current_state().unwrap().gcode.state,
            Some(GcodeState::Finish)
        );
    }

    #[tokio::test]
    async fn run_ends_on_stop() {
        let monitor = Arc::new(Monitor::new());
        let (_tx, rx) = mpsc::channel::<Report>(4);

        let worker = Arc::clone(&monitor);
        let handle = tokio::spawn(async move { worker.run(rx).await });

        tokio::task::yield_now().await;
        monitor.stop();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("run should return")
            .expect("task should not panic")
            .expect("run should succeed");
    }

    #[tokio::test]
    async fn second_run_is_rejected() {
        let monitor = Arc::new(Monitor::new());
        let (_tx, rx) = mpsc::channel::<Report>(1);

        let worker = Arc::clone(&monitor);
        let handle = tokio::spawn(async move { worker.run(rx).await });

        while !monitor.is_running() {
            tokio::task::yield_now().await;
        }

        let (_tx2, rx2) = mpsc::channel::<Report>(1);
        assert!(matches!(monitor.run(rx2).await, Err(Error::AlreadyRunning)));

        monitor.stop();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn run_after_stop_returns_immediately() {
        let monitor = Monitor::new();
        let (tx, rx) = mpsc::channel(1);
        tx.send(report(r#"{"print":{"mc_percent":1}}"#)).await.unwrap();

        monitor.stop();
        monitor.run(rx).await.unwrap();

        assert!(monitor.current_state().is_none());
    }
}
