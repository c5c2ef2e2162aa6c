//! One-way snapshot streaming from the solving thread to an observer.
//!
//! The solver pushes a full-grid snapshot after every real (non-speculative)
//! assignment. There is no close signal; observers learn the solve is over
//! from its terminal result.

use serde::{Deserialize, Serialize};
use std::sync::mpsc::SyncSender;
use std::sync::Mutex;

/// One cell as an observer sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    /// 0 = empty, 1-9 = assigned
    pub value: u8,
    /// Whether the digit came from a guess rather than a deduction
    pub uncertain: bool,
}

/// The full 9x9 grid pushed downstream after each assignment
pub type Snapshot = [[CellView; 9]; 9];

/// Anything that can receive grid snapshots. Console, graphical and
/// test-harness observers all attach through this one method.
pub trait StateSink {
    fn push(&self, snapshot: Snapshot);
}

/// Rendezvous-style delivery: with a zero-capacity channel the solving
/// thread blocks on each frame until the consumer takes it, keeping the
/// two in lock-step. A consumer that has hung up simply stops observing;
/// the solve carries on.
impl StateSink for SyncSender<Snapshot> {
    fn push(&self, snapshot: Snapshot) {
        let _ = self.send(snapshot);
    }
}

/// Sampling delivery: holds only the newest frame, so a slow consumer
/// sees the latest board state and missed frames are dropped.
#[derive(Debug, Default)]
pub struct LatestSnapshot {
    slot: Mutex<Option<Snapshot>>,
}

impl LatestSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the newest frame, if one arrived since the
    /// last call
    pub fn take(&self) -> Option<Snapshot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).take()
    }
}

impl StateSink for LatestSnapshot {
    fn push(&self, snapshot: Snapshot) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;

    fn frame_with_value(value: u8) -> Snapshot {
        let mut frame = [[CellView {
            value: 0,
            uncertain: false,
        }; 9]; 9];
        frame[0][0].value = value;
        frame
    }

    #[test]
    fn latest_snapshot_keeps_only_the_newest_frame() {
        let sink = LatestSnapshot::new();
        assert!(sink.take().is_none());

        sink.push(frame_with_value(1));
        sink.push(frame_with_value(2));

        let frame = sink.take().unwrap();
        assert_eq!(frame[0][0].value, 2);
        assert!(sink.take().is_none());
    }

    #[test]
    fn sync_channel_delivers_frames_in_order() {
        let (tx, rx) = mpsc::sync_channel::<Snapshot>(0);
        let producer = thread::spawn(move || {
            tx.push(frame_with_value(3));
            tx.push(frame_with_value(4));
        });

        assert_eq!(rx.recv().unwrap()[0][0].value, 3);
        assert_eq!(rx.recv().unwrap()[0][0].value, 4);
        producer.join().unwrap();
        assert!(rx.recv().is_err());
    }

    #[test]
    fn departed_consumer_does_not_block_the_producer() {
        let (tx, rx) = mpsc::sync_channel::<Snapshot>(0);
        drop(rx);
        tx.push(frame_with_value(5));
    }

    #[test]
    fn cell_view_serializes_round_trip() {
        let view = CellView {
            value: 7,
            uncertain: true,
        };
        let json = serde_json::to_string(&view).unwrap();
        let back: CellView = serde_json::from_str(&json).unwrap();
        assert_eq!(back, view);
    }
}
