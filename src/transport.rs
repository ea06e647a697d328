//! The core's side of the MIDI transport: sending messages out and
//! turning incoming chunks into banks.

use std::time::Duration;

use crossbeam_channel::Sender;
use log::{debug, info};

use crate::bank::{dump_request, Bank};
use crate::codec::Format;
use crate::error::{Error, Result};
use crate::frame::{CancelToken, FrameReceiver};

/// Something that accepts outgoing SYSEX messages.
pub trait SysexSink {
    /// Writes one complete message
    fn send(&mut self, message: &[u8]) -> Result<()>;
}

impl SysexSink for Sender<Vec<u8>> {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        Sender::send(self, message.to_vec()).map_err(|_| Error::Disconnected)
    }
}

impl SysexSink for Vec<u8> {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        self.extend_from_slice(message);
        Ok(())
    }
}

/// Sends an encoded voice or bank. No acknowledgement is awaited.
pub fn upload(sink: &mut impl SysexSink, message: &[u8]) -> Result<()> {
    debug!("transport: sending {} bytes", message.len());
    sink.send(message)
}

/// Asks the instrument on `channel` for a dump and decodes the reply.
///
/// Frames left over from earlier traffic are discarded, then the dump
/// request for `format` is sent and `download` waits up to `timeout` for
/// one complete frame from `frames`.
pub fn download(
    sink: &mut impl SysexSink,
    frames: &FrameReceiver,
    format: Format,
    channel: u8,
    timeout: Duration,
    cancel: &CancelToken,
) -> Result<Bank> {
    frames.clear();
    sink.send(&dump_request(format, channel))?;
    let frame = frames.recv_frame(timeout, cancel)?;
    info!("transport: received {} byte dump", frame.len());
    Bank::decode(frame)
}
