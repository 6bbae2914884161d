use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};

use crate::camera::domain::frame_source::{FramePoll, FrameSource, SourceError};
use crate::shared::frame::{Frame, FrameError};

const DEFAULT_CAPACITY: usize = 2;

/// Producer half handed to the host's camera callback.
///
/// When the queue is full the oldest frame is dropped, so the session
/// always sees recent data no matter how fast the camera pushes.
pub struct FrameFeeder {
    tx: Sender<Frame>,
    overflow: Receiver<Frame>,
    next_index: AtomicUsize,
}

impl FrameFeeder {
    /// Queues a frame, renumbering it in arrival order.
    pub fn push(&self, frame: Frame) {
        let index = self.next_index.fetch_add(1, Ordering::Relaxed);
        let mut frame = frame.with_index(index);
        loop {
            match self.tx.try_send(frame) {
                Ok(()) | Err(TrySendError::Disconnected(_)) => return,
                Err(TrySendError::Full(rejected)) => {
                    let _ = self.overflow.try_recv();
                    frame = rejected;
                }
            }
        }
    }

    /// Wraps a raw RGBA readback and queues it.
    pub fn push_rgba(&self, data: Vec<u8>, width: u32, height: u32) -> Result<(), FrameError> {
        self.push(Frame::from_rgba(data, width, height)?);
        Ok(())
    }
}

/// Consumer half: a [`FrameSource`] fed by a [`FrameFeeder`].
pub struct ChannelFrameSource {
    rx: Receiver<Frame>,
}

impl ChannelFrameSource {
    pub fn new() -> (Self, FrameFeeder) {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> (Self, FrameFeeder) {
        let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
        let feeder = FrameFeeder {
            tx,
            overflow: rx.clone(),
            next_index: AtomicUsize::new(0),
        };
        (Self { rx }, feeder)
    }
}

impl FrameSource for ChannelFrameSource {
    fn start(&mut self) -> Result<(), SourceError> {
        Ok(())
    }

    fn poll(&mut self) -> Result<FramePoll, SourceError> {
        let mut latest = None;
        loop {
            match self.rx.try_recv() {
                Ok(frame) => latest = Some(frame),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    return Ok(latest.map_or(FramePoll::Ended, FramePoll::Ready));
                }
            }
        }
        Ok(latest.map_or(FramePoll::Pending, FramePoll::Ready))
    }

    fn stop(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(value: u8) -> Frame {
        Frame::new(vec![value; 2 * 2 * 4], 2, 2, 4, 0)
    }

    fn ready(poll: FramePoll) -> Frame {
        match poll {
            FramePoll::Ready(frame) => frame,
            other => panic!("expected a frame, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_queue_is_pending() {
        let (mut source, _feeder) = ChannelFrameSource::new();
        source.start().unwrap();
        assert!(matches!(source.poll().unwrap(), FramePoll::Pending));
    }

    #[test]
    fn test_poll_returns_latest_frame() {
        let (mut source, feeder) = ChannelFrameSource::with_capacity(4);
        feeder.push(frame(1));
        feeder.push(frame(2));
        feeder.push(frame(3));

        let latest = ready(source.poll().unwrap());
        assert_eq!(latest.data()[0], 3);
        assert_eq!(latest.index(), 2);
        assert!(matches!(source.poll().unwrap(), FramePoll::Pending));
    }

    #[test]
    fn test_full_queue_drops_oldest() {
        let (mut source, feeder) = ChannelFrameSource::with_capacity(1);
        feeder.push(frame(1));
        feeder.push(frame(2));
        assert_eq!(ready(source.poll().unwrap()).data()[0], 2);
    }

    #[test]
    fn test_dropped_feeder_ends_after_last_frame() {
        let (mut source, feeder) = ChannelFrameSource::new();
        feeder.push(frame(9));
        drop(feeder);

        assert_eq!(ready(source.poll().unwrap()).data()[0], 9);
        assert!(matches!(source.poll().unwrap(), FramePoll::Ended));
    }

    #[test]
    fn test_push_rgba_validates_buffer() {
        let (mut source, feeder) = ChannelFrameSource::new();
        assert!(feeder.push_rgba(vec![0u8; 3], 2, 2).is_err());
        feeder.push_rgba(vec![7u8; 16], 2, 2).unwrap();
        assert_eq!(ready(source.poll().unwrap()).data()[0], 7);
    }

    #[test]
    fn test_stop_discards_queued_frames() {
        let (mut source, feeder) = ChannelFrameSource::new();
        feeder.push(frame(1));
        source.stop();
        assert!(matches!(source.poll().unwrap(), FramePoll::Pending));
    }
}
