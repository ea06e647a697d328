//! Field level codec for the two DX7 voice layouts.
//!
//! The single voice dump stores every parameter in its own byte. The 32
//! voice bulk dump squeezes a voice into 128 bytes by sharing some bytes
//! between parameters, see [`packing`].

pub mod bulk;
pub mod packing;
pub mod single;

use serde::Serialize;

use crate::patch::Voice;

/// SYSEX format code, the byte at offset 3 of a voice dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Format {
    /// One voice, 155 unpacked bytes (`0x00`)
    Single,
    /// 32 voices, 128 packed bytes each (`0x09`)
    Bulk,
}

impl Format {
    /// Maps a format code to a known format.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Format::Single),
            0x09 => Some(Format::Bulk),
            _ => None,
        }
    }

    /// Format code as sent on the wire
    pub fn code(self) -> u8 {
        match self {
            Format::Single => 0x00,
            Format::Bulk => 0x09,
        }
    }

    /// Number of voices carried by a dump of this format
    pub fn voice_count(self) -> usize {
        match self {
            Format::Single => 1,
            Format::Bulk => 32,
        }
    }

    /// Bytes per voice in this format
    pub fn voice_size(self) -> usize {
        match self {
            Format::Single => single::VOICE_SIZE,
            Format::Bulk => bulk::VOICE_SIZE,
        }
    }

    /// Payload size (the 14-bit size field) of a complete dump
    pub fn payload_size(self) -> usize {
        self.voice_count() * self.voice_size()
    }
}

/// Decodes every voice in `payload` using the layout of `format`.
///
/// Reads at most `format.voice_count()` voices; a short payload yields
/// fewer voices.
pub fn decode_voices(format: Format, payload: &[u8]) -> Vec<Voice> {
    match format {
        Format::Single => payload
            .first_chunk::<{ single::VOICE_SIZE }>()
            .map(single::decode)
            .into_iter()
            .collect(),
        Format::Bulk => payload
            .chunks_exact(bulk::VOICE_SIZE)
            .take(format.voice_count())
            .filter_map(|chunk| chunk.first_chunk::<{ bulk::VOICE_SIZE }>())
            .map(bulk::decode)
            .collect(),
    }
}

/// Encodes one voice using the layout of `format`.
pub fn encode_voice(format: Format, voice: &Voice) -> Vec<u8> {
    match format {
        Format::Single => single::encode(voice).to_vec(),
        Format::Bulk => bulk::encode(voice).to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_codes() {
        assert_eq!(Format::from_code(0x00), Some(Format::Single));
        assert_eq!(Format::from_code(0x09), Some(Format::Bulk));
        assert_eq!(Format::from_code(0x01), None);
        assert_eq!(Format::Bulk.code(), 0x09);
        assert_eq!(Format::Single.payload_size(), 155);
        assert_eq!(Format::Bulk.payload_size(), 4096);
    }

    #[test]
    fn test_decode_voice_counts() {
        let bulk = vec![0u8; 4096];
        assert_eq!(decode_voices(Format::Bulk, &bulk).len(), 32);

        let single = vec![0u8; 155];
        assert_eq!(decode_voices(Format::Single, &single).len(), 1);

        assert!(decode_voices(Format::Single, &single[..100]).is_empty());
    }

    #[test]
    fn test_layouts_differ() {
        let mut voice = Voice::init();
        voice.feedback = 7;
        let single = encode_voice(Format::Single, &voice);
        let bulk = encode_voice(Format::Bulk, &voice);
        assert_eq!(single.len(), 155);
        assert_eq!(bulk.len(), 128);
        assert_eq!(single[135], 7);
        assert_eq!(bulk[111] & 0x07, 7);
    }
}
