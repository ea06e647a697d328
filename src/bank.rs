//! Decoding SYSEX buffers into banks of voices and encoding voices back
//! into transmittable messages.

use log::debug;

use crate::checksum::checksum;
use crate::codec::{self, bulk, single, Format};
use crate::dedup::DedupTable;
use crate::error::{Error, Result};
use crate::patch::Voice;

/// Start of a system exclusive message
pub const SYSEX_START: u8 = 0xF0;

/// End of a system exclusive message
pub const SYSEX_END: u8 = 0xF7;

/// Yamaha manufacturer ID
pub const YAMAHA_ID: u8 = 0x43;

/// Bytes before the payload: start, manufacturer, status, format, size (2)
pub const HEADER_SIZE: usize = 6;

/// Header sent by [`encode_voice`]. It declares a single voice dump of 155
/// bytes while the payload that follows uses the 128-byte bulk layout.
pub const HEADER_VOICE_SEND: [u8; HEADER_SIZE] = [0xF0, 0x43, 0x00, 0x00, 0x01, 0x1B];

/// Length of a complete 32 voice bulk dump
pub const BULK_FULL_SYSEX_SIZE: usize = HEADER_SIZE + bulk::VOICE_SIZE * 32 + 2;

/// Length of a complete single voice dump
pub const SINGLE_FULL_SYSEX_SIZE: usize = HEADER_SIZE + single::VOICE_SIZE + 2;

/// Fixed header fields of a voice dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Always `0xF0` for a decoded bank
    pub start: u8,
    /// Manufacturer ID, `0x43` for Yamaha
    pub manufacturer: u8,
    /// Sub-status in the high nibble, MIDI channel in the low nibble
    pub status_and_channel: u8,
    /// Format code
    pub format: u8,
    /// Payload length from the 14-bit size field
    pub size: u16,
}

impl Header {
    /// MIDI channel (0-15) from the status byte
    pub fn channel(&self) -> u8 {
        self.status_and_channel & 0x0f
    }
}

/// One decoded SYSEX container holding 1 or 32 voices.
#[derive(Debug, Clone)]
pub struct Bank {
    header: Header,
    /// Layout the voices were decoded with
    pub format: Format,
    /// Voices in dump order, minus any dropped as duplicates
    pub voices: Vec<Voice>,
    /// Checksum byte found after the payload
    pub checksum: u8,
    /// Byte found after the checksum, normally `0xF7`
    pub end: u8,
    /// Voices dropped as duplicates while decoding with a [`DedupTable`]
    pub duplicates: usize,
    /// Name of the file the bank was read from
    pub file_name: Option<String>,
    raw: Vec<u8>,
}

impl Bank {
    /// Decodes a complete SYSEX buffer.
    ///
    /// Fails with [`Error::MalformedHeader`] when the buffer does not start
    /// with `0xF0` or the format is neither single nor bulk, and with
    /// [`Error::Truncated`] when the declared size does not fit. The
    /// checksum is read but never used to reject the buffer.
    pub fn decode(raw: impl Into<Vec<u8>>) -> Result<Bank> {
        let raw = raw.into();

        let start = raw.first().copied().unwrap_or(0);
        if start != SYSEX_START {
            return Err(Error::MalformedHeader { start, format: raw.get(3).copied().unwrap_or(0) });
        }
        if raw.len() < HEADER_SIZE {
            return Err(Error::Truncated { declared: 0, actual: raw.len() });
        }

        let header = Header {
            start,
            manufacturer: raw[1],
            status_and_channel: raw[2],
            format: raw[3],
            size: (u16::from(raw[4]) << 7) | u16::from(raw[5]),
        };

        let format = Format::from_code(header.format)
            .ok_or(Error::MalformedHeader { start, format: header.format })?;

        let size = usize::from(header.size);
        if raw.len() < size + HEADER_SIZE + 2 {
            return Err(Error::Truncated { declared: size, actual: raw.len() });
        }
        if size != format.payload_size() {
            debug!(
                "SYSEX: format {:?} declares {} payload bytes, expected {}",
                format,
                size,
                format.payload_size()
            );
        }

        let voices = codec::decode_voices(format, &raw[HEADER_SIZE..HEADER_SIZE + size]);

        let bank = Bank {
            header,
            format,
            voices,
            checksum: raw[size + HEADER_SIZE],
            end: raw[size + HEADER_SIZE + 1],
            duplicates: 0,
            file_name: None,
            raw,
        };

        debug!(
            "SYSEX: decoded {} voice(s), format 0x{:02X}, size {}, checksum 0x{:02X}",
            bank.voices.len(),
            bank.header.format,
            size,
            bank.checksum
        );
        if !bank.checksum_ok() {
            debug!(
                "SYSEX: checksum mismatch, found 0x{:02X}, computed 0x{:02X}",
                bank.checksum,
                checksum(bank.payload())
            );
        }

        Ok(bank)
    }

    /// Decodes a buffer and drops every voice `table` has already seen,
    /// recording it there otherwise. The first occurrence wins.
    pub fn decode_dedup(raw: impl Into<Vec<u8>>, table: &mut DedupTable) -> Result<Bank> {
        let mut bank = Bank::decode(raw)?;
        let before = bank.voices.len();
        bank.voices.retain(|voice| table.insert(voice));
        bank.duplicates = before - bank.voices.len();
        Ok(bank)
    }

    /// Tags the bank and every voice in it with the file it came from.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        for voice in &mut self.voices {
            voice.source = Some(file_name.clone());
        }
        self.file_name = Some(file_name);
        self
    }

    /// Header fields as decoded
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The buffer the bank was decoded from
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// The payload region the checksum covers
    pub fn payload(&self) -> &[u8] {
        &self.raw[HEADER_SIZE..HEADER_SIZE + usize::from(self.header.size)]
    }

    /// Whether the checksum byte matches the payload
    pub fn checksum_ok(&self) -> bool {
        checksum(self.payload()) == self.checksum
    }
}

/// Builds a message that sends one voice to the instrument.
///
/// The header declares a single voice dump (`F0 43 00 00 01 1B`) but the
/// voice is written in the 128-byte bulk layout, followed by the checksum
/// of those 128 bytes and `F7`. Existing captures depend on this exact
/// output; use [`encode_single`] for a dump that decodes as format `0x00`.
pub fn encode_voice(voice: &Voice) -> Vec<u8> {
    let payload = bulk::encode(voice);
    let mut data = Vec::with_capacity(HEADER_SIZE + payload.len() + 2);
    data.extend_from_slice(&HEADER_VOICE_SEND);
    data.extend_from_slice(&payload);
    data.push(checksum(&payload));
    data.push(SYSEX_END);
    data
}

/// Builds a well formed single voice dump (format `0x00`, 155 unpacked bytes).
pub fn encode_single(voice: &Voice, channel: u8) -> Vec<u8> {
    frame(Format::Single, channel, &single::encode(voice))
}

/// Builds a 32 voice bulk dump, padding with [`Voice::init`] when fewer
/// than 32 voices are given.
pub fn encode_bulk(voices: &[Voice], channel: u8) -> Result<Vec<u8>> {
    let count = Format::Bulk.voice_count();
    if voices.len() > count {
        return Err(Error::TooManyVoices(voices.len()));
    }

    let init = Voice::init();
    let mut payload = Vec::with_capacity(Format::Bulk.payload_size());
    for i in 0..count {
        payload.extend_from_slice(&bulk::encode(voices.get(i).unwrap_or(&init)));
    }

    Ok(frame(Format::Bulk, channel, &payload))
}

fn frame(format: Format, channel: u8, payload: &[u8]) -> Vec<u8> {
    let size = payload.len();
    let mut data = Vec::with_capacity(HEADER_SIZE + size + 2);
    data.extend_from_slice(&[
        SYSEX_START,
        YAMAHA_ID,
        channel & 0x0f,
        format.code(),
        ((size >> 7) & 0x7f) as u8,
        (size & 0x7f) as u8,
    ]);
    data.extend_from_slice(payload);
    data.push(checksum(payload));
    data.push(SYSEX_END);
    data
}

/// Message asking the instrument to dump its current voice (`Single`) or
/// its 32 voice memory (`Bulk`): `F0 43 2n ff 00 F7`.
pub fn dump_request(format: Format, channel: u8) -> [u8; 6] {
    [
        SYSEX_START,
        YAMAHA_ID,
        0x20 | (channel & 0x0f),
        format.code(),
        0x00,
        SYSEX_END,
    ]
}
