//! Discovery scanner
//!
//! Consumes advertisement events from the transport's scan subscription,
//! classifies them, and accumulates per-role device lists. Returns as soon
//! as the minimum device set is observed, or with whatever was accumulated
//! when the scan window closes. A short window with no devices is not an
//! error; the caller decides whether the result is enough for a session.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::device::{Advertisement, DeviceLists};

/// Run discovery over an advertisement event stream
///
/// Consumes events until readiness (at least one controller and one
/// actuator), the timeout, or the end of the stream, whichever comes first.
/// The receiver is dropped on return, ending the scan subscription.
pub async fn run_discovery(
    mut events: mpsc::Receiver<Advertisement>,
    timeout: Duration,
) -> DeviceLists {
    let deadline = Instant::now() + timeout;
    let mut lists = DeviceLists::default();

    info!("Scanning for devices ({}s window)", timeout.as_secs_f32());

    loop {
        let adv = tokio::select! {
            _ = tokio::time::sleep_until(deadline) => {
                debug!("Scan window elapsed with {} device(s)", lists.len());
                break;
            }
            adv = events.recv() => match adv {
                Some(adv) => adv,
                None => {
                    debug!("Advertisement stream ended during scan");
                    break;
                }
            },
        };

        lists.observe(&adv);
        if lists.is_ready() {
            info!("Minimum device set observed, ending scan early");
            break;
        }
    }

    lists
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceAddress;

    fn adv(address: &str, name: &str) -> Advertisement {
        Advertisement {
            address: DeviceAddress::new(address),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn returns_early_once_ready() {
        let (tx, rx) = mpsc::channel(16);
        tx.send(adv("aa:01", "Simon Game")).await.unwrap();
        tx.send(adv("aa:02", "LVS-J44")).await.unwrap();

        // A long timeout that would hang the test if readiness did not fire
        let lists = run_discovery(rx, Duration::from_secs(3600)).await;

        assert!(lists.is_ready());
        assert_eq!(lists.controllers.len(), 1);
        assert_eq!(lists.actuators.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_returns_whatever_was_accumulated() {
        let (tx, rx) = mpsc::channel(16);
        tx.send(adv("aa:01", "Simon Game")).await.unwrap();
        tx.send(adv("aa:02", "Shocker v2")).await.unwrap();

        let lists = run_discovery(rx, Duration::from_secs(10)).await;

        assert!(!lists.is_ready());
        assert_eq!(lists.controllers.len(), 1);
        assert_eq!(lists.stimulators.len(), 1);
        assert!(lists.actuators.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_scan_window_is_not_an_error() {
        let (_tx, rx) = mpsc::channel::<Advertisement>(1);
        let lists = run_discovery(rx, Duration::from_secs(10)).await;
        assert!(lists.is_empty());
    }

    #[tokio::test]
    async fn closed_stream_ends_the_scan() {
        let (tx, rx) = mpsc::channel(16);
        tx.send(adv("aa:01", "Simon Game")).await.unwrap();
        drop(tx);

        let lists = run_discovery(rx, Duration::from_secs(3600)).await;

        assert_eq!(lists.controllers.len(), 1);
        assert!(!lists.is_ready());
    }

    #[tokio::test]
    async fn duplicate_advertisements_do_not_duplicate_devices() {
        let (tx, rx) = mpsc::channel(16);
        for _ in 0..3 {
            tx.send(adv("aa:01", "Simon Game")).await.unwrap();
        }
        tx.send(adv("aa:02", "MB Controller")).await.unwrap();

        let lists = run_discovery(rx, Duration::from_secs(3600)).await;

        assert_eq!(lists.controllers.len(), 1);
        assert_eq!(lists.actuators.len(), 1);
    }
}
