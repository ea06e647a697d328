//! Reassembly of complete `F0 .. F7` messages from transport chunks.
//!
//! [`FrameAssembler`] is the synchronous state machine. [`FrameReceiver`]
//! drives one on a background thread from a channel of chunks and lets
//! the caller wait for frames with a timeout and a [`CancelToken`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{after, bounded, select, unbounded, Receiver, Sender};
use log::{debug, trace};

use crate::bank::{SYSEX_END, SYSEX_START};
use crate::error::{Error, Result};

/// Where the assembler is within a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Waiting for `0xF0`; other bytes are dropped
    Idle,
    /// Collecting bytes until `0xF7`
    Receiving,
    /// A single-shot assembler has delivered its frame
    Complete,
}

/// What happens after a frame completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Deliver one frame, then ignore all further input
    SingleShot,
    /// Go back to waiting for the next `0xF0`
    Continuous,
}

type Callback = Box<dyn FnMut(Vec<u8>) + Send>;

/// Byte level SYSEX frame reassembly.
///
/// Payload content is not validated; that is left to
/// [`crate::Bank::decode`].
pub struct FrameAssembler {
    state: State,
    mode: Mode,
    buf: Vec<u8>,
    callback: Option<Callback>,
}

impl FrameAssembler {
    /// Creates an idle assembler with no callback
    pub fn new(mode: Mode) -> Self {
        Self {
            state: State::Idle,
            mode,
            buf: Vec::new(),
            callback: None,
        }
    }

    /// Registers the function called with each complete frame
    pub fn on_complete(&mut self, callback: impl FnMut(Vec<u8>) + Send + 'static) {
        self.callback = Some(Box::new(callback));
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Bytes collected for the frame in progress
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Feeds one chunk, invoking the callback for every frame it completes.
    /// Returns how many frames completed.
    pub fn feed(&mut self, chunk: &[u8]) -> usize {
        let mut completed = 0;
        for &byte in chunk {
            match self.state {
                State::Complete => break,
                State::Idle => {
                    if byte == SYSEX_START {
                        self.buf.clear();
                        self.buf.push(byte);
                        self.state = State::Receiving;
                    } else {
                        trace!("frame: dropping 0x{:02X} outside SYSEX", byte);
                    }
                }
                State::Receiving => {
                    self.buf.push(byte);
                    if byte == SYSEX_END {
                        let frame = std::mem::take(&mut self.buf);
                        debug!("frame: complete, {} bytes", frame.len());
                        if let Some(callback) = self.callback.as_mut() {
                            callback(frame);
                        }
                        completed += 1;
                        self.state = match self.mode {
                            Mode::SingleShot => State::Complete,
                            Mode::Continuous => State::Idle,
                        };
                    }
                }
            }
        }
        completed
    }

    /// Drops any partial frame and returns to [`State::Idle`]
    pub fn reset(&mut self) {
        self.buf.clear();
        self.state = State::Idle;
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new(Mode::Continuous)
    }
}

impl std::fmt::Debug for FrameAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameAssembler")
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("pending", &self.buf.len())
            .finish()
    }
}

/// Cloneable flag that aborts waits in [`FrameReceiver::recv_frame`].
#[derive(Debug, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

impl CancelToken {
    /// Creates a token that is not cancelled
    pub fn new() -> Self {
        let (wake_tx, wake_rx) = bounded(1);
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            wake_tx,
            wake_rx,
        }
    }

    /// Cancels every current and future wait using this token
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        let _ = self.wake_tx.try_send(());
    }

    /// Whether [`CancelToken::cancel`] has been called
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Continuous frame assembly over a channel of transport chunks.
///
/// A background thread feeds every chunk to a [`FrameAssembler`]. It exits
/// when the sending side hangs up or the receiver is dropped; dropping
/// waits for it.
#[derive(Debug)]
pub struct FrameReceiver {
    frames: Receiver<Vec<u8>>,
    reset: Arc<AtomicBool>,
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl FrameReceiver {
    /// Starts assembling frames from `chunks`
    pub fn spawn(chunks: Receiver<Vec<u8>>) -> Self {
        let (frame_tx, frames) = unbounded();
        let (stop, stop_rx) = bounded::<()>(0);
        let reset = Arc::new(AtomicBool::new(false));
        let pending_reset = reset.clone();

        let worker = thread::spawn(move || {
            let mut assembler = FrameAssembler::new(Mode::Continuous);
            assembler.on_complete(move |frame| {
                let _ = frame_tx.send(frame);
            });

            loop {
                select! {
                    recv(chunks) -> chunk => match chunk {
                        Ok(chunk) => {
                            if pending_reset.swap(false, Ordering::SeqCst) {
                                if !assembler.pending().is_empty() {
                                    debug!("frame: dropping {} stale bytes", assembler.pending().len());
                                }
                                assembler.reset();
                            }
                            assembler.feed(&chunk);
                        }
                        Err(_) => break,
                    },
                    recv(stop_rx) -> _ => break,
                }
            }
            debug!("frame: transport closed, assembler stopping");
        });

        Self {
            frames,
            reset,
            stop: Some(stop),
            worker: Some(worker),
        }
    }

    /// Waits for the next complete frame.
    ///
    /// Fails with [`Error::Timeout`] when nothing completes within
    /// `timeout`, [`Error::Cancelled`] when `cancel` fires first and
    /// [`Error::Disconnected`] when the transport hangs up. After a timeout
    /// or cancellation the partial frame is dropped before the next chunk
    /// is assembled.
    pub fn recv_frame(&self, timeout: Duration, cancel: &CancelToken) -> Result<Vec<u8>> {
        let deadline = after(timeout);
        loop {
            if cancel.is_cancelled() {
                self.abandon();
                return Err(Error::Cancelled);
            }
            select! {
                recv(self.frames) -> frame => match frame {
                    Ok(frame) => return Ok(frame),
                    Err(_) => return Err(Error::Disconnected),
                },
                recv(cancel.wake_rx) -> _ => {
                    if cancel.is_cancelled() {
                        // leave the wakeup for other waiters on this token
                        let _ = cancel.wake_tx.try_send(());
                        self.abandon();
                        return Err(Error::Cancelled);
                    }
                },
                recv(deadline) -> _ => {
                    self.abandon();
                    return Err(Error::Timeout(timeout));
                },
            }
        }
    }

    /// Drops completed frames nobody has received yet, and the partial
    /// frame in progress. Returns how many complete frames were dropped.
    pub fn clear(&self) -> usize {
        self.abandon();
        let dropped = self.frames.try_iter().count();
        if dropped > 0 {
            debug!("frame: discarded {} stale frame(s)", dropped);
        }
        dropped
    }

    fn abandon(&self) {
        self.reset.store(true, Ordering::SeqCst);
    }
}

impl Drop for FrameReceiver {
    fn drop(&mut self) {
        self.stop.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn collecting(mode: Mode) -> (FrameAssembler, Arc<Mutex<Vec<Vec<u8>>>>) {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let sink = frames.clone();
        let mut assembler = FrameAssembler::new(mode);
        assembler.on_complete(move |frame| sink.lock().unwrap().push(frame));
        (assembler, frames)
    }

    #[test]
    fn test_discards_bytes_outside_frame() {
        let (mut assembler, frames) = collecting(Mode::Continuous);
        for chunk in [&[0x01, 0x02][..], &[0xF0, 0x43], &[0x20, 0xF7], &[0x99]] {
            assembler.feed(chunk);
        }
        assert_eq!(*frames.lock().unwrap(), vec![vec![0xF0, 0x43, 0x20, 0xF7]]);
        assert_eq!(assembler.state(), State::Idle);
    }

    #[test]
    fn test_single_shot_stops() {
        let (mut assembler, frames) = collecting(Mode::SingleShot);
        assert_eq!(assembler.feed(&[0xF0, 0x01, 0xF7, 0xF0, 0x02, 0xF7]), 1);
        assert_eq!(assembler.state(), State::Complete);
        assert_eq!(frames.lock().unwrap().len(), 1);

        assembler.reset();
        assert_eq!(assembler.feed(&[0xF0, 0x02, 0xF7]), 1);
        assert_eq!(frames.lock().unwrap()[1], vec![0xF0, 0x02, 0xF7]);
    }

    #[test]
    fn test_continuous_many_frames_in_one_chunk() {
        let (mut assembler, frames) = collecting(Mode::Continuous);
        assert_eq!(assembler.feed(&[0xF0, 0x01, 0xF7, 0x55, 0xF0, 0x02, 0xF7, 0xF0, 0x03]), 2);
        assert_eq!(assembler.state(), State::Receiving);
        assert_eq!(assembler.pending(), &[0xF0, 0x03]);
        assert_eq!(frames.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_start_byte_inside_frame_is_payload() {
        let (mut assembler, frames) = collecting(Mode::Continuous);
        assembler.feed(&[0xF0, 0xF0, 0xF7]);
        assert_eq!(frames.lock().unwrap()[0], vec![0xF0, 0xF0, 0xF7]);
    }

    #[test]
    fn test_receiver_delivers_frame() {
        let (tx, rx) = unbounded();
        let receiver = FrameReceiver::spawn(rx);
        tx.send(vec![0x01, 0xF0, 0x43]).unwrap();
        tx.send(vec![0x20, 0xF7]).unwrap();

        let frame = receiver
            .recv_frame(Duration::from_secs(5), &CancelToken::new())
            .unwrap();
        assert_eq!(frame, vec![0xF0, 0x43, 0x20, 0xF7]);
    }

    #[test]
    fn test_receiver_times_out() {
        let (tx, rx) = unbounded();
        let receiver = FrameReceiver::spawn(rx);
        tx.send(vec![0xF0, 0x43]).unwrap();

        let err = receiver
            .recv_frame(Duration::from_millis(50), &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
    }

    #[test]
    fn test_timeout_drops_partial_frame() {
        let (tx, rx) = unbounded();
        let receiver = FrameReceiver::spawn(rx);
        tx.send(vec![0xF0, 0x43, 0x00, 0x09]).unwrap();
        let err = receiver
            .recv_frame(Duration::from_millis(50), &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));

        tx.send(vec![0x01, 0xF7, 0xF0, 0x02, 0xF7]).unwrap();
        let frame = receiver
            .recv_frame(Duration::from_secs(5), &CancelToken::new())
            .unwrap();
        assert_eq!(frame, vec![0xF0, 0x02, 0xF7]);
    }

    #[test]
    fn test_clear_discards_unread_frames() {
        let (tx, rx) = unbounded();
        let receiver = FrameReceiver::spawn(rx);
        tx.send(vec![0xF0, 0x01, 0xF7, 0xF0, 0x02, 0xF7]).unwrap();
        thread::sleep(Duration::from_millis(50));

        assert_eq!(receiver.clear(), 2);
        tx.send(vec![0xF0, 0x03, 0xF7]).unwrap();
        let frame = receiver
            .recv_frame(Duration::from_secs(5), &CancelToken::new())
            .unwrap();
        assert_eq!(frame, vec![0xF0, 0x03, 0xF7]);
    }

    #[test]
    fn test_drop_stops_worker() {
        let (tx, rx) = unbounded::<Vec<u8>>();
        let receiver = FrameReceiver::spawn(rx);
        drop(receiver);
        // the worker has exited and released the chunk receiver
        assert!(tx.send(vec![0xF0]).is_err());
    }

    #[test]
    fn test_receiver_cancelled() {
        let (_tx, rx) = unbounded::<Vec<u8>>();
        let receiver = FrameReceiver::spawn(rx);
        let cancel = CancelToken::new();
        let remote = cancel.clone();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.cancel();
        });

        let err = receiver.recv_frame(Duration::from_secs(10), &cancel).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
        canceller.join().unwrap();

        assert!(matches!(
            receiver.recv_frame(Duration::from_secs(10), &cancel),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn test_receiver_disconnected() {
        let (tx, rx) = unbounded::<Vec<u8>>();
        let receiver = FrameReceiver::spawn(rx);
        drop(tx);
        let err = receiver
            .recv_frame(Duration::from_secs(5), &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, Error::Disconnected));
    }
}
