//! Haptlink Console Runner
//!
//! A headless front end for the session engine: starts a session over the
//! simulated transport, logs session events, and renders the two display
//! strings (status heading and current level) to stdout once per frame
//! tick. Ctrl-C requests an orderly stop; the process exits once the
//! session reaches its terminal state.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use hap_protocol::ProtocolVariant;
use hap_session::{spawn_session, DisplayState, SessionCommand, SessionConfig, SessionEvent};
use hap_sim::SimTransport;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Render cadence for the display consumer (~30 fps)
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

#[tokio::main]
async fn main() -> Result<()> {
    // Include all our crates in the default filter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "haptlink=info,hap_protocol=info,hap_discover=info,hap_session=info,hap_sim=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Haptlink session runner");

    let transport = Arc::new(demo_fleet());
    // Pace the demo loop; with hardware the read latency paces it instead
    let config = SessionConfig {
        tick_interval_ms: 100,
        ..Default::default()
    };
    let mut handle = spawn_session(transport, config);

    let mut frame = tokio::time::interval(FRAME_INTERVAL);
    let mut shown = DisplayState::default();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stop requested (Ctrl-C)");
                let _ = handle.commands.send(SessionCommand::Stop).await;
            }
            event = handle.events.recv() => match event {
                Some(event) => log_event(&event),
                // Engine dropped its sender; the session is over
                None => break,
            },
            _ = frame.tick() => {
                let display = handle.display.borrow_and_update().clone();
                if display != shown {
                    render(&display);
                    shown = display;
                }
            }
        }
    }

    handle.task.await??;
    tracing::info!("Session ended");
    Ok(())
}

/// A small scripted fleet so the runner works without hardware
fn demo_fleet() -> SimTransport {
    let sim = SimTransport::new();
    sim.add_controller(
        "sim:controller",
        "Simon Game",
        &[
            "LVL:0", "LVL:1", "LVL:2", "LVL:3", "LVL:4", "LVL:5", "LVL:3", "LVL:0",
        ],
    );
    sim.add_actuator("sim:vibe", "MB Controller", ProtocolVariant::Motorbunny);
    sim.add_stimulator("sim:shocker", "Shocker v2");
    sim
}

fn render(display: &DisplayState) {
    if !display.heading.is_empty() {
        println!("-- {}", display.heading);
    }
    if !display.level.is_empty() {
        println!("   {}", display.level);
    }
}

fn log_event(event: &SessionEvent) {
    match event {
        SessionEvent::PhaseChanged { from, to } => {
            tracing::debug!("Phase {} -> {}", from.name(), to.name());
        }
        SessionEvent::DevicesDiscovered {
            controllers,
            stimulators,
            actuators,
        } => {
            tracing::info!(
                "Discovered {controllers} controller(s), {stimulators} stimulator(s), {actuators} actuator(s)"
            );
        }
        SessionEvent::DeviceConnected { role, address } => {
            tracing::info!("Connected {} {address}", role.name());
        }
        SessionEvent::LevelChanged { level } => {
            tracing::debug!("Level {level}");
        }
        SessionEvent::StimulusTriggered => {
            tracing::info!("Stimulus trigger fired");
        }
        SessionEvent::Error { message } => {
            tracing::error!("Session error: {message}");
        }
    }
}
