#![forbid(unsafe_code)]

//! The per-device update coordinator.
//!
//! One tokio task per device runs the state machine
//! {Idle, Debouncing, Rendering, Uploading, Faulted}:
//!
//! - a refresh tick or a data-change event touching the screen's
//!   dependency set moves Idle → Debouncing, and resets the debounce
//!   deadline while already Debouncing;
//! - the debounce window collapses any burst of triggers into exactly
//!   one render/upload cycle;
//! - cycles are strictly sequential per device - triggers arriving
//!   while Rendering/Uploading fold into a single superseding request
//!   that re-enters Debouncing when the cycle completes (the in-flight
//!   cycle is never aborted, so uploads cannot be corrupted);
//! - a failed cycle moves to Faulted, and an exponential backoff timer
//!   schedules the retry; the device keeps its last good image.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use glimpse_core::config::Screen;
use glimpse_core::data::{DataSource, EntityId};
use glimpse_device::DisplayTarget;
use glimpse_widgets::BuiltWidget;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior, sleep_until};

use crate::error::RuntimeError;
use crate::pipeline::{CycleReport, Pipeline};

/// Filename used for every upload; the device only ever shows the
/// latest dashboard frame.
pub const UPLOAD_FILENAME: &str = "dashboard.jpg";

/// Rendering seam the coordinator drives. `Pipeline` is the real
/// implementation; tests substitute counters and failure scripts.
pub trait RenderPipeline: Send + Sync {
    /// Compose and encode the screen for upload.
    fn render(
        &self,
        screen: &Screen,
        data: &dyn DataSource,
    ) -> Result<(Vec<u8>, CycleReport), RuntimeError>;
}

impl RenderPipeline for Pipeline {
    fn render(
        &self,
        screen: &Screen,
        data: &dyn DataSource,
    ) -> Result<(Vec<u8>, CycleReport), RuntimeError> {
        self.render_jpeg(screen, data)
    }
}

/// Timing knobs for one coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Debounce window collapsing trigger bursts.
    pub debounce: Duration,
    /// Periodic re-render (clocks tick even when no data changes).
    /// `None` disables the timer.
    pub refresh_interval: Option<Duration>,
    /// First fault backoff delay; doubles per consecutive fault.
    pub fault_backoff: Duration,
    /// Upper bound for the fault backoff.
    pub fault_backoff_cap: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            refresh_interval: Some(Duration::from_secs(10)),
            fault_backoff: Duration::from_secs(2),
            fault_backoff_cap: Duration::from_secs(60),
        }
    }
}

/// Externally visible coordinator state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Debouncing,
    Rendering,
    Uploading,
    Faulted {
        /// Human-readable cause of the last fault.
        error: String,
    },
}

impl CoordinatorState {
    /// Whether the coordinator is waiting out a fault backoff.
    #[must_use]
    pub const fn is_faulted(&self) -> bool {
        matches!(self, Self::Faulted { .. })
    }
}

/// Why a render was requested.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// Periodic or manual refresh.
    Refresh,
    /// An external data value changed.
    DataChanged(EntityId),
}

enum Command {
    Trigger(Trigger),
    SetScreen(Screen),
    SetBrightness(u8),
    Shutdown,
}

/// Handle to a running coordinator task.
///
/// Dropping the handle does not stop the task; use
/// [`CoordinatorHandle::shutdown`] (the registry does this on device
/// removal).
#[derive(Debug)]
pub struct CoordinatorHandle {
    device_id: String,
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<CoordinatorState>,
    task: tokio::task::JoinHandle<()>,
}

impl CoordinatorHandle {
    /// Spawn the coordinator task for one device.
    #[must_use]
    pub fn spawn(
        device_id: impl Into<String>,
        screen: Screen,
        pipeline: Arc<dyn RenderPipeline>,
        target: Arc<dyn DisplayTarget>,
        data: Arc<dyn DataSource>,
        config: CoordinatorConfig,
    ) -> Self {
        let device_id = device_id.into();
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(CoordinatorState::Idle);
        let runner = Runner {
            device_id: device_id.clone(),
            deps: screen_dependencies(&screen),
            desired_brightness: screen.brightness,
            pushed_brightness: None,
            screen,
            pending: true,
            backoff: config.fault_backoff,
            config,
            pipeline,
            target,
            data,
            commands: command_rx,
            state: state_tx,
            running: true,
        };
        let task = tokio::spawn(runner.run());
        Self {
            device_id,
            commands,
            state,
            task,
        }
    }

    /// The device this coordinator drives.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Request a render. Bursts collapse through the debounce window.
    pub fn trigger(&self, trigger: Trigger) {
        let _ = self.commands.send(Command::Trigger(trigger));
    }

    /// Swap the active screen configuration.
    pub fn set_screen(&self, screen: Screen) {
        let _ = self.commands.send(Command::SetScreen(screen));
    }

    /// Change panel brightness (pushed on the next cycle).
    pub fn set_brightness(&self, percent: u8) {
        let _ = self.commands.send(Command::SetBrightness(percent));
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> CoordinatorState {
        self.state.borrow().clone()
    }

    /// Watch state transitions (device offline/faulted notification).
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<CoordinatorState> {
        self.state.clone()
    }

    /// Stop the task and wait for it to finish. An in-flight cycle is
    /// allowed to complete.
    pub async fn shutdown(self) {
        let _ = self.commands.send(Command::Shutdown);
        let _ = self.task.await;
    }
}

/// Union of every widget's dependency set.
fn screen_dependencies(screen: &Screen) -> BTreeSet<EntityId> {
    screen
        .widgets
        .iter()
        .map(BuiltWidget::from_config)
        .flat_map(|widget| widget.dependencies())
        .collect()
}

/// Task-side state.
struct Runner {
    device_id: String,
    screen: Screen,
    deps: BTreeSet<EntityId>,
    desired_brightness: Option<u8>,
    pushed_brightness: Option<u8>,
    /// A render has been requested and not yet served.
    pending: bool,
    /// Next fault backoff delay.
    backoff: Duration,
    config: CoordinatorConfig,
    pipeline: Arc<dyn RenderPipeline>,
    target: Arc<dyn DisplayTarget>,
    data: Arc<dyn DataSource>,
    commands: mpsc::UnboundedReceiver<Command>,
    state: watch::Sender<CoordinatorState>,
    running: bool,
}

impl Runner {
    fn set_state(&self, state: CoordinatorState) {
        self.state.send_replace(state);
    }

    /// Apply one command; may mark a render pending or stop the task.
    fn apply(&mut self, command: Command) {
        match command {
            Command::Trigger(Trigger::Refresh) => self.pending = true,
            Command::Trigger(Trigger::DataChanged(id)) => {
                if self.deps.contains(&id) {
                    self.pending = true;
                } else {
                    tracing::trace!(device = %self.device_id, entity = %id, "ignoring unrelated data change");
                }
            }
            Command::SetScreen(screen) => {
                self.deps = screen_dependencies(&screen);
                self.desired_brightness = screen.brightness.or(self.desired_brightness);
                self.screen = screen;
                self.pending = true;
            }
            Command::SetBrightness(percent) => {
                self.desired_brightness = Some(percent.min(100));
                self.pending = true;
            }
            Command::Shutdown => self.running = false,
        }
    }

    /// Apply everything already queued without waiting.
    fn drain(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            self.apply(command);
        }
    }

    async fn run(mut self) {
        tracing::info!(device = %self.device_id, "coordinator started");
        let mut refresh = self.config.refresh_interval.map(tokio::time::interval);
        if let Some(interval) = &mut refresh {
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The spawn itself renders a first frame; push the first
            // tick a full period out.
            interval.reset();
        }

        while self.running {
            if !self.pending {
                self.set_state(CoordinatorState::Idle);
                match &mut refresh {
                    Some(interval) => tokio::select! {
                        command = self.commands.recv() => match command {
                            Some(command) => self.apply(command),
                            None => break,
                        },
                        _ = interval.tick() => self.pending = true,
                    },
                    None => match self.commands.recv().await {
                        Some(command) => self.apply(command),
                        None => break,
                    },
                }
                continue;
            }

            // Debounce: collapse the burst, resetting the deadline on
            // every relevant trigger.
            self.set_state(CoordinatorState::Debouncing);
            let mut deadline = Instant::now() + self.config.debounce;
            loop {
                tokio::select! {
                    _ = sleep_until(deadline) => break,
                    command = self.commands.recv() => match command {
                        Some(command) => {
                            let was_pending = self.pending;
                            self.pending = false;
                            self.apply(command);
                            if self.pending {
                                deadline = Instant::now() + self.config.debounce;
                            }
                            self.pending |= was_pending;
                            if !self.running {
                                break;
                            }
                        }
                        None => {
                            self.running = false;
                            break;
                        }
                    },
                }
            }
            if !self.running {
                break;
            }
            self.pending = false;

            match self.cycle().await {
                Ok(()) => {
                    self.backoff = self.config.fault_backoff;
                }
                Err(err) => {
                    tracing::warn!(device = %self.device_id, error = %err, "render cycle faulted");
                    self.set_state(CoordinatorState::Faulted {
                        error: err.to_string(),
                    });
                    let retry_at = Instant::now() + self.backoff;
                    loop {
                        tokio::select! {
                            _ = sleep_until(retry_at) => break,
                            command = self.commands.recv() => match command {
                                Some(command) => {
                                    self.apply(command);
                                    if !self.running {
                                        break;
                                    }
                                }
                                None => {
                                    self.running = false;
                                    break;
                                }
                            },
                        }
                    }
                    self.backoff = (self.backoff * 2).min(self.config.fault_backoff_cap);
                    // The retry re-enters Debouncing like any trigger.
                    self.pending = true;
                    continue;
                }
            }

            // Supersession: triggers that arrived mid-cycle fold into
            // one immediate re-entry into Debouncing.
            self.drain();
            if self.pending {
                tracing::debug!(device = %self.device_id, "superseding request queued during cycle");
            } else {
                self.set_state(CoordinatorState::Idle);
            }
        }
        tracing::info!(device = %self.device_id, "coordinator stopped");
    }

    /// One render + upload cycle.
    async fn cycle(&mut self) -> Result<(), RuntimeError> {
        let span = tracing::debug_span!("cycle", device = %self.device_id);
        use tracing::Instrument;
        async move {
            self.set_state(CoordinatorState::Rendering);
            let (jpeg, report) = self.pipeline.render(&self.screen, self.data.as_ref())?;
            if !report.missing.is_empty() {
                tracing::debug!(
                    device = %self.device_id,
                    missing = report.missing.len(),
                    "cycle rendered with missing data"
                );
            }

            self.set_state(CoordinatorState::Uploading);
            self.target.push_frame(&jpeg, UPLOAD_FILENAME).await?;

            if let Some(brightness) = self.desired_brightness
                && self.pushed_brightness != Some(brightness)
            {
                self.target.set_brightness(brightness).await?;
                self.pushed_brightness = Some(brightness);
            }
            Ok(())
        }
        .instrument(span)
        .await
    }
}
