//! Session engine
//!
//! The control loop driving actuators from the controller's intensity
//! signal. Runs as an async actor: [`SessionCommand`]s in, [`SessionEvent`]s
//! out, display strings published through a watch channel.
//!
//! # Architecture
//!
//! One session owns its transport handles for its whole lifetime. The
//! running tick executes a fixed sub-step order — advance pulse, read
//! signal, compute output, trigger check, write on change — then yields, so
//! an independent render task can run between iterations. Any device I/O
//! failure is fatal: the engine drains (zero-intensity to every actuator),
//! releases every handle and stops. There are no retries anywhere.

use std::sync::Arc;

use hap_discover::{run_discovery, DeviceLists};
use hap_protocol::{decode_signal, registry, trigger, CONTROLLER_SIGNAL_UUID, STIMULATOR_CTRL_UUID};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::connection::{connect_all, ConnectionSet};
use crate::error::SessionError;
use crate::events::{SessionCommand, SessionEvent};
use crate::state::{output_level, DisplayState, PulseOscillator, SessionPhase};
use crate::transport::Transport;

/// Capacity of the session event channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Handles to a spawned session actor
pub struct SessionHandle {
    /// Command sender (stop requests)
    pub commands: mpsc::Sender<SessionCommand>,
    /// Event stream
    pub events: mpsc::Receiver<SessionEvent>,
    /// Latest display strings
    pub display: watch::Receiver<DisplayState>,
    /// The actor task itself
    pub task: JoinHandle<Result<(), SessionError>>,
}

/// Spawn a session actor on the current runtime
pub fn spawn_session<T: Transport>(transport: Arc<T>, config: SessionConfig) -> SessionHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (display_tx, display_rx) = watch::channel(DisplayState::default());

    let task = tokio::spawn(run_session(transport, config, cmd_rx, event_tx, display_tx));

    SessionHandle {
        commands: cmd_tx,
        events: event_rx,
        display: display_rx,
        task,
    }
}

/// Run one session to completion
///
/// Drives the state machine `Idle → Discovering → Connecting → Running →
/// Draining → Stopped`. Returns `Ok(())` after an orderly stop, or the
/// fatal error that ended the session; in both cases every handle the
/// session opened has been released.
pub async fn run_session<T: Transport>(
    transport: Arc<T>,
    config: SessionConfig,
    cmd_rx: mpsc::Receiver<SessionCommand>,
    event_tx: mpsc::Sender<SessionEvent>,
    display_tx: watch::Sender<DisplayState>,
) -> Result<(), SessionError> {
    let mut session = Session {
        transport,
        config,
        phase: SessionPhase::Idle,
        cmd_rx,
        event_tx,
        display_tx,
    };

    let result = session.run().await;
    if let Err(err) = &result {
        warn!("Session ended with error: {err}");
        session.emit(SessionEvent::Error {
            message: err.to_string(),
        });
    }
    result
}

struct Session<T: Transport> {
    transport: Arc<T>,
    config: SessionConfig,
    phase: SessionPhase,
    cmd_rx: mpsc::Receiver<SessionCommand>,
    event_tx: mpsc::Sender<SessionEvent>,
    display_tx: watch::Sender<DisplayState>,
}

impl<T: Transport> Session<T> {
    async fn run(&mut self) -> Result<(), SessionError> {
        let lists = match self.discover().await? {
            Some(lists) => lists,
            // Stopped externally before anything connected
            None => {
                self.clear_display();
                self.set_phase(SessionPhase::Stopped);
                return Ok(());
            }
        };

        if lists.controllers.is_empty() {
            self.clear_display();
            self.set_phase(SessionPhase::Stopped);
            return Err(SessionError::NoControllerFound);
        }

        self.set_phase(SessionPhase::Connecting);
        let mut connections = match connect_all(&self.transport, &lists).await {
            Ok(connections) => connections,
            Err(err) => {
                // connect_all already released anything it opened
                self.clear_display();
                self.set_phase(SessionPhase::Stopped);
                return Err(err);
            }
        };
        for conn in connections
            .controllers
            .iter()
            .chain(&connections.stimulators)
            .chain(&connections.actuators)
        {
            self.emit(SessionEvent::DeviceConnected {
                role: conn.device.role(),
                address: conn.device.address.clone(),
            });
        }

        self.set_phase(SessionPhase::Running);
        let run_result = self.run_loop(&mut connections).await;

        self.set_phase(SessionPhase::Draining);
        self.drain(&mut connections).await;
        self.clear_display();

        connections.close_all(self.transport.as_ref()).await;
        self.set_phase(SessionPhase::Stopped);

        run_result
    }

    /// Scan for devices; `None` means an external stop arrived first
    async fn discover(&mut self) -> Result<Option<DeviceLists>, SessionError> {
        self.set_phase(SessionPhase::Discovering);
        self.set_heading("Waiting for connections");

        let subscription = self.transport.scan()?;
        let timeout = self.config.discovery_timeout();
        let discovery = run_discovery(subscription.into_events(), timeout);
        tokio::pin!(discovery);

        let lists = tokio::select! {
            lists = &mut discovery => lists,
            cmd = self.cmd_rx.recv() => {
                debug!("Stop during discovery ({cmd:?})");
                return Ok(None);
            }
        };

        self.set_heading("");
        self.emit(SessionEvent::DevicesDiscovered {
            controllers: lists.controllers.len(),
            stimulators: lists.stimulators.len(),
            actuators: lists.actuators.len(),
        });
        Ok(Some(lists))
    }

    /// The running-state loop; returns `Ok` on external stop, `Err` on
    /// device I/O failure
    async fn run_loop(
        &mut self,
        connections: &mut ConnectionSet<T::Handle>,
    ) -> Result<(), SessionError> {
        let mut pulse = PulseOscillator::new(
            self.config.pulse_step,
            self.config.pulse_modulo,
            self.config.pulse_interval(),
            Instant::now(),
        );
        // -1 = never written; only mutated after a successful write
        let mut last_levels: Vec<i16> = vec![-1; connections.actuators.len()];

        loop {
            // Stop is observed at the top of the iteration, never mid-step
            match self.cmd_rx.try_recv() {
                Ok(SessionCommand::Stop) | Err(TryRecvError::Disconnected) => {
                    info!("Stop requested");
                    return Ok(());
                }
                Err(TryRecvError::Empty) => {}
            }

            self.step(connections, &mut pulse, &mut last_levels).await?;

            if self.config.tick_interval_ms > 0 {
                tokio::time::sleep(self.config.tick_interval()).await;
            } else {
                tokio::task::yield_now().await;
            }
        }
    }

    /// One running-state tick, fixed sub-step order
    async fn step(
        &mut self,
        connections: &mut ConnectionSet<T::Handle>,
        pulse: &mut PulseOscillator,
        last_levels: &mut [i16],
    ) -> Result<(), SessionError> {
        let phase = pulse.advance(Instant::now());

        let controller = &mut connections.controllers[0];
        let frame = match self
            .transport
            .read(&mut controller.handle, CONTROLLER_SIGNAL_UUID)
            .await
        {
            Ok(frame) => frame,
            Err(err) => {
                return Err(SessionError::DeviceIo {
                    device: controller.device.address.to_string(),
                    source: err,
                })
            }
        };
        let raw = decode_signal(&frame)?;
        let level = output_level(raw, phase);

        // Only actuator slot 0 is driven; further actuators stay connected
        // but idle (reference behavior)
        let Some(last) = last_levels.first().copied() else {
            return Ok(());
        };

        if last > 0 && level == 0 {
            self.fire_stimulator(connections).await?;
        }

        if last != i16::from(level) {
            self.write_level(connections, level).await?;
            last_levels[0] = i16::from(level);

            self.emit(SessionEvent::LevelChanged { level });
            if level > 0 {
                self.set_level_text(format!("Level {level}"));
            } else {
                self.set_level_text(String::new());
            }
        }

        Ok(())
    }

    /// Encode and write a level to actuator slot 0
    async fn write_level(
        &mut self,
        connections: &mut ConnectionSet<T::Handle>,
        level: u8,
    ) -> Result<(), SessionError> {
        let actuator = &mut connections.actuators[0];
        let Some(variant) = actuator.device.variant() else {
            return Ok(());
        };
        let entry = registry::entry(variant);
        let frame = (entry.encode)(level);

        debug!("Level {level} -> {}", actuator.device.address);
        match self
            .transport
            .write(&mut actuator.handle, entry.control_uuid, &frame)
            .await
        {
            Ok(()) => Ok(()),
            Err(err) => Err(SessionError::DeviceIo {
                device: actuator.device.address.to_string(),
                source: err,
            }),
        }
    }

    /// Fire one stimulation trigger at the first stimulator, if any
    async fn fire_stimulator(
        &mut self,
        connections: &mut ConnectionSet<T::Handle>,
    ) -> Result<(), SessionError> {
        let Some(stimulator) = connections.stimulators.first_mut() else {
            return Ok(());
        };

        info!("Stimulus trigger -> {}", stimulator.device.address);
        match self
            .transport
            .write(
                &mut stimulator.handle,
                STIMULATOR_CTRL_UUID,
                &trigger::trigger_frame(),
            )
            .await
        {
            Ok(()) => {
                self.emit(SessionEvent::StimulusTriggered);
                Ok(())
            }
            Err(err) => Err(SessionError::DeviceIo {
                device: stimulator.device.address.to_string(),
                source: err,
            }),
        }
    }

    /// Best-effort zero-intensity to every actuator before teardown
    async fn drain(&mut self, connections: &mut ConnectionSet<T::Handle>) {
        for actuator in connections.actuators.iter_mut() {
            let Some(variant) = actuator.device.variant() else {
                continue;
            };
            let entry = registry::entry(variant);
            let frame = (entry.encode)(0);
            if let Err(err) = self
                .transport
                .write(&mut actuator.handle, entry.control_uuid, &frame)
                .await
            {
                warn!("Stop command to {} failed: {err}", actuator.device.address);
            }
        }
    }

    fn set_phase(&mut self, to: SessionPhase) {
        if self.phase == to {
            return;
        }
        let from = self.phase;
        self.phase = to;
        info!("Session phase: {} -> {}", from.name(), to.name());
        self.emit(SessionEvent::PhaseChanged { from, to });
    }

    fn emit(&self, event: SessionEvent) {
        // Observers are optional; a full or closed channel never blocks the loop
        let _ = self.event_tx.try_send(event);
    }

    fn set_heading(&self, heading: &str) {
        self.display_tx
            .send_modify(|d| heading.clone_into(&mut d.heading));
    }

    fn set_level_text(&self, level: String) {
        self.display_tx.send_modify(|d| d.level = level);
    }

    fn clear_display(&self) {
        self.display_tx.send_replace(DisplayState::default());
    }
}
