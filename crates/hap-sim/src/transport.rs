//! Simulated transport backend
//!
//! Implements the session engine's [`Transport`] capability entirely
//! in-process. Advertisements are replayed on a short interval while a scan
//! subscription is alive; connections, reads and writes go against the
//! shared virtual device table.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use hap_discover::{Advertisement, DeviceAddress};
use hap_protocol::{registry, ProtocolVariant, STIMULATOR_CTRL_UUID};
use hap_session::{ScanSubscription, Transport, TransportError};
use tokio::sync::mpsc;
use tracing::debug;

use crate::device::{DeviceKind, DeviceStats, FaultPlan, VirtualDevice};

/// How often the scan task replays the advertisement set
const ADVERTISE_INTERVAL: Duration = Duration::from_millis(25);

/// Handle to one simulated connection
#[derive(Debug)]
pub struct SimHandle {
    address: DeviceAddress,
}

/// In-process transport over a table of virtual devices
///
/// Clone-free by design: wrap it in an [`Arc`] and share it between the
/// session engine and the test observing it.
#[derive(Debug, Default)]
pub struct SimTransport {
    devices: Mutex<Vec<VirtualDevice>>,
}

impl SimTransport {
    /// Create an empty transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a virtual controller replaying the given signal frames
    pub fn add_controller(&self, address: &str, name: &str, script: &[&str]) {
        self.add_device(
            address,
            name,
            DeviceKind::Controller {
                script: script.iter().map(|s| s.as_bytes().to_vec()).collect(),
                cursor: 0,
            },
        );
    }

    /// Add a virtual actuator speaking the given protocol variant
    pub fn add_actuator(&self, address: &str, name: &str, variant: ProtocolVariant) {
        self.add_device(
            address,
            name,
            DeviceKind::Actuator {
                variant,
                writes: Vec::new(),
            },
        );
    }

    /// Add a virtual stimulator
    pub fn add_stimulator(&self, address: &str, name: &str) {
        self.add_device(
            address,
            name,
            DeviceKind::Stimulator {
                triggers: Vec::new(),
            },
        );
    }

    /// Make future connection attempts to this device fail
    pub fn fail_connect(&self, address: &str) {
        self.with_device(address, |d| d.faults.fail_connect = true);
    }

    /// Make reads fail after `n` have succeeded
    pub fn fail_read_after(&self, address: &str, n: usize) {
        self.with_device(address, |d| d.faults.fail_read_after = Some(n));
    }

    /// Make writes fail after `n` have succeeded
    pub fn fail_write_after(&self, address: &str, n: usize) {
        self.with_device(address, |d| d.faults.fail_write_after = Some(n));
    }

    /// Operation counters for a device
    pub fn stats(&self, address: &str) -> DeviceStats {
        self.devices()
            .iter()
            .find(|d| d.address.as_str() == address)
            .map(|d| d.stats)
            .unwrap_or_default()
    }

    /// Frames written to an actuator's control characteristic, in order
    pub fn written_frames(&self, address: &str) -> Vec<Vec<u8>> {
        self.devices()
            .iter()
            .find(|d| d.address.as_str() == address)
            .and_then(|d| match &d.kind {
                DeviceKind::Actuator { writes, .. } => Some(writes.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Number of trigger frames a stimulator has received
    pub fn trigger_count(&self, address: &str) -> usize {
        self.devices()
            .iter()
            .find(|d| d.address.as_str() == address)
            .map(|d| match &d.kind {
                DeviceKind::Stimulator { triggers } => triggers.len(),
                _ => 0,
            })
            .unwrap_or_default()
    }

    /// Connections opened and never released, across all devices
    pub fn open_handles(&self) -> usize {
        self.devices()
            .iter()
            .map(|d| d.stats.connects - d.stats.disconnects)
            .sum()
    }

    fn add_device(&self, address: &str, name: &str, kind: DeviceKind) {
        self.devices().push(VirtualDevice {
            address: DeviceAddress::new(address),
            name: name.to_string(),
            kind,
            faults: FaultPlan::default(),
            stats: DeviceStats::default(),
        });
    }

    fn with_device(&self, address: &str, f: impl FnOnce(&mut VirtualDevice)) {
        let mut devices = self.devices();
        if let Some(device) = devices.iter_mut().find(|d| d.address.as_str() == address) {
            f(device);
        }
    }

    fn devices(&self) -> MutexGuard<'_, Vec<VirtualDevice>> {
        self.devices.lock().expect("sim device table poisoned")
    }
}

impl Transport for SimTransport {
    type Handle = SimHandle;

    fn scan(&self) -> Result<ScanSubscription, TransportError> {
        let advertisements: Vec<Advertisement> = self
            .devices()
            .iter()
            .map(|d| Advertisement {
                address: d.address.clone(),
                name: d.name.clone(),
            })
            .collect();

        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(async move {
            // Replay until the subscription is dropped
            loop {
                for adv in &advertisements {
                    if tx.send(adv.clone()).await.is_err() {
                        return;
                    }
                }
                tokio::time::sleep(ADVERTISE_INTERVAL).await;
            }
        });

        Ok(ScanSubscription::new(rx))
    }

    async fn connect(&self, address: &DeviceAddress) -> Result<SimHandle, TransportError> {
        let mut devices = self.devices();
        let Some(device) = devices.iter_mut().find(|d| d.address == *address) else {
            return Err(TransportError::ConnectFailed {
                address: address.to_string(),
                reason: "no such device".to_string(),
            });
        };

        if device.faults.fail_connect {
            return Err(TransportError::ConnectFailed {
                address: address.to_string(),
                reason: "connection refused".to_string(),
            });
        }

        device.stats.connects += 1;
        debug!("Sim connect {}", address);
        Ok(SimHandle {
            address: address.clone(),
        })
    }

    async fn read(
        &self,
        handle: &mut SimHandle,
        characteristic: &str,
    ) -> Result<Vec<u8>, TransportError> {
        let mut devices = self.devices();
        let Some(device) = devices.iter_mut().find(|d| d.address == handle.address) else {
            return Err(TransportError::NotConnected);
        };

        if let Some(limit) = device.faults.fail_read_after {
            if device.stats.reads >= limit {
                return Err(TransportError::ReadFailed {
                    characteristic: characteristic.to_string(),
                    reason: "link lost".to_string(),
                });
            }
        }

        let Some(frame) = device.next_signal_frame() else {
            return Err(TransportError::ReadFailed {
                characteristic: characteristic.to_string(),
                reason: "device has no readable characteristic".to_string(),
            });
        };
        device.stats.reads += 1;
        Ok(frame)
    }

    async fn write(
        &self,
        handle: &mut SimHandle,
        characteristic: &str,
        data: &[u8],
    ) -> Result<(), TransportError> {
        let mut devices = self.devices();
        let Some(device) = devices.iter_mut().find(|d| d.address == handle.address) else {
            return Err(TransportError::NotConnected);
        };

        if let Some(limit) = device.faults.fail_write_after {
            if device.stats.writes >= limit {
                return Err(TransportError::WriteFailed {
                    characteristic: characteristic.to_string(),
                    reason: "link lost".to_string(),
                });
            }
        }

        match &mut device.kind {
            DeviceKind::Actuator { variant, writes } => {
                let expected = registry::entry(*variant).control_uuid;
                if characteristic != expected {
                    return Err(TransportError::WriteFailed {
                        characteristic: characteristic.to_string(),
                        reason: format!("expected control characteristic {expected}"),
                    });
                }
                writes.push(data.to_vec());
            }
            DeviceKind::Stimulator { triggers } => {
                if characteristic != STIMULATOR_CTRL_UUID {
                    return Err(TransportError::WriteFailed {
                        characteristic: characteristic.to_string(),
                        reason: format!("expected control characteristic {STIMULATOR_CTRL_UUID}"),
                    });
                }
                triggers.push(data.to_vec());
            }
            DeviceKind::Controller { .. } => {
                return Err(TransportError::WriteFailed {
                    characteristic: characteristic.to_string(),
                    reason: "controller is read-only".to_string(),
                });
            }
        }

        device.stats.writes += 1;
        Ok(())
    }

    async fn disconnect(&self, handle: SimHandle) {
        let mut devices = self.devices();
        if let Some(device) = devices.iter_mut().find(|d| d.address == handle.address) {
            device.stats.disconnects += 1;
            debug!("Sim disconnect {}", handle.address);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hap_protocol::CONTROLLER_SIGNAL_UUID;

    fn sim_with_controller() -> SimTransport {
        let sim = SimTransport::new();
        sim.add_controller("aa:01", "Simon Game", &["LVL:1", "LVL:2"]);
        sim
    }

    #[tokio::test]
    async fn scripted_frames_replay_and_the_last_repeats() {
        let sim = sim_with_controller();
        let mut handle = sim.connect(&"aa:01".into()).await.unwrap();

        let reads: Vec<Vec<u8>> = [
            sim.read(&mut handle, CONTROLLER_SIGNAL_UUID).await.unwrap(),
            sim.read(&mut handle, CONTROLLER_SIGNAL_UUID).await.unwrap(),
            sim.read(&mut handle, CONTROLLER_SIGNAL_UUID).await.unwrap(),
        ]
        .to_vec();

        assert_eq!(reads[0], b"LVL:1");
        assert_eq!(reads[1], b"LVL:2");
        assert_eq!(reads[2], b"LVL:2");
    }

    #[tokio::test]
    async fn connect_fault_refuses_the_connection() {
        let sim = sim_with_controller();
        sim.fail_connect("aa:01");

        let err = sim.connect(&"aa:01".into()).await.unwrap_err();
        assert!(matches!(err, TransportError::ConnectFailed { .. }));
        assert_eq!(sim.open_handles(), 0);
    }

    #[tokio::test]
    async fn read_fault_trips_after_the_limit() {
        let sim = sim_with_controller();
        sim.fail_read_after("aa:01", 1);
        let mut handle = sim.connect(&"aa:01".into()).await.unwrap();

        assert!(sim.read(&mut handle, CONTROLLER_SIGNAL_UUID).await.is_ok());
        assert!(sim.read(&mut handle, CONTROLLER_SIGNAL_UUID).await.is_err());
    }

    #[tokio::test]
    async fn actuator_rejects_the_wrong_characteristic() {
        let sim = SimTransport::new();
        sim.add_actuator("aa:02", "MB Controller", ProtocolVariant::Motorbunny);
        let mut handle = sim.connect(&"aa:02".into()).await.unwrap();

        let err = sim
            .write(&mut handle, "0000beef-0000-1000-8000-00805f9b34fb", b"x")
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::WriteFailed { .. }));
        assert!(sim.written_frames("aa:02").is_empty());
    }

    #[tokio::test]
    async fn disconnect_balances_the_counters() {
        let sim = sim_with_controller();
        let handle = sim.connect(&"aa:01".into()).await.unwrap();
        assert_eq!(sim.open_handles(), 1);

        sim.disconnect(handle).await;
        assert_eq!(sim.open_handles(), 0);
        assert_eq!(sim.stats("aa:01").connects, 1);
        assert_eq!(sim.stats("aa:01").disconnects, 1);
    }

    #[tokio::test]
    async fn scan_replays_all_devices() {
        let sim = SimTransport::new();
        sim.add_controller("aa:01", "Simon Game", &[]);
        sim.add_stimulator("aa:03", "Shocker v2");

        let mut events = sim.scan().unwrap().into_events();
        let first = events.recv().await.unwrap();
        let second = events.recv().await.unwrap();

        assert_eq!(first.name, "Simon Game");
        assert_eq!(second.name, "Shocker v2");
    }
}
