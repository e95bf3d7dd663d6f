//! Connection lifecycle management
//!
//! Opens one connection per classified device, concurrently, and guarantees
//! that every handle it ever opened is released exactly once, whether the
//! session ends normally or not. A single connection failure is fatal for
//! the whole session: remaining attempts are aborted and anything already
//! open is released before the error surfaces.

use std::sync::Arc;

use hap_discover::{Device, DeviceLists, Role};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::error::SessionError;
use crate::transport::{Transport, TransportError};

/// One live device link
#[derive(Debug)]
pub struct Connection<H> {
    /// The classified device this link belongs to
    pub device: Device,
    /// Transport handle, owned until disconnect
    pub handle: H,
}

/// All live links of a session, per role, preserving discovery order
#[derive(Debug)]
pub struct ConnectionSet<H> {
    /// Controller links
    pub controllers: Vec<Connection<H>>,
    /// Stimulator links
    pub stimulators: Vec<Connection<H>>,
    /// Actuator links
    pub actuators: Vec<Connection<H>>,
}

impl<H> ConnectionSet<H> {
    /// Total number of live links
    pub fn len(&self) -> usize {
        self.controllers.len() + self.stimulators.len() + self.actuators.len()
    }

    /// True if the set holds no links
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Release every handle exactly once, order-independent
    ///
    /// Consumes the set; a handle release never skips the remaining handles.
    pub async fn close_all<T>(self, transport: &T)
    where
        T: Transport<Handle = H>,
    {
        for conn in self
            .controllers
            .into_iter()
            .chain(self.stimulators)
            .chain(self.actuators)
        {
            info!("Disconnecting {}", conn.device.address);
            transport.disconnect(conn.handle).await;
        }
    }
}

type ConnectOutcome<H> = Result<(Role, usize, Device, H), (Device, TransportError)>;

/// Open a connection to every device in the lists, concurrently
///
/// Per-role list order is preserved in the returned set. The first failure
/// aborts the remaining attempts, releases every handle opened so far and
/// surfaces as [`SessionError::ConnectionFailed`].
pub async fn connect_all<T: Transport>(
    transport: &Arc<T>,
    lists: &DeviceLists,
) -> Result<ConnectionSet<T::Handle>, SessionError> {
    let mut join_set: JoinSet<ConnectOutcome<T::Handle>> = JoinSet::new();

    let roles = [
        (Role::Controller, &lists.controllers),
        (Role::Stimulator, &lists.stimulators),
        (Role::Actuator, &lists.actuators),
    ];
    for (role, devices) in roles {
        for (index, device) in devices.iter().enumerate() {
            let transport = Arc::clone(transport);
            let device = device.clone();
            join_set.spawn(async move {
                match transport.connect(&device.address).await {
                    Ok(handle) => Ok((role, index, device, handle)),
                    Err(err) => Err((device, err)),
                }
            });
        }
    }

    // Slots keep per-role ordering independent of completion order
    let mut controllers: Vec<Option<Connection<T::Handle>>> =
        std::iter::repeat_with(|| None).take(lists.controllers.len()).collect();
    let mut stimulators: Vec<Option<Connection<T::Handle>>> =
        std::iter::repeat_with(|| None).take(lists.stimulators.len()).collect();
    let mut actuators: Vec<Option<Connection<T::Handle>>> =
        std::iter::repeat_with(|| None).take(lists.actuators.len()).collect();

    while let Some(joined) = join_set.join_next().await {
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(err) => {
                // A connect task panicked; treat it like a failed connection
                warn!("Connection task failed: {err}");
                let failure = TransportError::ConnectFailed {
                    address: "<unknown>".to_string(),
                    reason: err.to_string(),
                };
                release_partial(transport, join_set, controllers, stimulators, actuators).await;
                return Err(SessionError::Transport(failure));
            }
        };

        match outcome {
            Ok((role, index, device, handle)) => {
                info!("Connected {} {}", role.name(), device.address);
                let slot = match role {
                    Role::Controller => &mut controllers,
                    Role::Stimulator => &mut stimulators,
                    Role::Actuator => &mut actuators,
                };
                slot[index] = Some(Connection { device, handle });
            }
            Err((device, err)) => {
                warn!("Connection to {} failed: {err}", device.address);
                let address = device.address.to_string();
                release_partial(transport, join_set, controllers, stimulators, actuators).await;
                return Err(SessionError::ConnectionFailed {
                    device: address,
                    source: err,
                });
            }
        }
    }

    Ok(ConnectionSet {
        controllers: controllers.into_iter().flatten().collect(),
        stimulators: stimulators.into_iter().flatten().collect(),
        actuators: actuators.into_iter().flatten().collect(),
    })
}

/// Abort outstanding connection attempts and release everything already open
async fn release_partial<T: Transport>(
    transport: &Arc<T>,
    mut join_set: JoinSet<ConnectOutcome<T::Handle>>,
    controllers: Vec<Option<Connection<T::Handle>>>,
    stimulators: Vec<Option<Connection<T::Handle>>>,
    actuators: Vec<Option<Connection<T::Handle>>>,
) {
    join_set.abort_all();

    // Tasks that completed before the abort landed may still carry handles
    while let Some(joined) = join_set.join_next().await {
        if let Ok(Ok((_, _, device, handle))) = joined {
            info!("Releasing {} opened before abort", device.address);
            transport.disconnect(handle).await;
        }
    }

    for conn in controllers
        .into_iter()
        .chain(stimulators)
        .chain(actuators)
        .flatten()
    {
        info!("Releasing {}", conn.device.address);
        transport.disconnect(conn.handle).await;
    }
}
