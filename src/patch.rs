// Copyright 2025 Tyler Neely (tylerneely@gmail.com).
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.
//
// See http://creativecommons.org/licenses/MIT/ for more information.

//! DX7 voice data structures

use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

/// Number of operators in a voice
pub const NUM_OPERATORS: usize = 6;

/// Length of a voice name in bytes
pub const NAME_LEN: usize = 10;

/// DX7 envelope parameters (4-stage)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Envelope {
    /// Rate for each of the 4 envelope stages
    pub rate: [u8; 4],
    /// Level for each of the 4 envelope stages
    pub level: [u8; 4],
}

/// Keyboard level scaling parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct KeyboardScaling {
    /// Break point key (0-99)
    pub break_point: u8,
    /// Depth of scaling on the left side of break point
    pub left_depth: u8,
    /// Depth of scaling on the right side of break point
    pub right_depth: u8,
    /// Curve type for left side (0-3)
    pub left_curve: u8,
    /// Curve type for right side (0-3)
    pub right_curve: u8,
}

/// DX7 operator parameters.
///
/// Operators have no identity beyond their position in [`Voice::op`];
/// position 0 is the first operator on the wire (OP6 on the front panel).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Operator {
    /// Amplitude envelope
    pub envelope: Envelope,
    /// Keyboard scaling settings
    pub keyboard_scaling: KeyboardScaling,
    /// Rate scaling (0-7)
    pub rate_scaling: u8,
    /// Amplitude modulation sensitivity (0-3)
    pub amp_mod_sensitivity: u8,
    /// Key velocity sensitivity (0-7)
    pub velocity_sensitivity: u8,
    /// Output level (0-99)
    pub level: u8,
    /// Oscillator mode: 0 = ratio, 1 = fixed frequency
    pub mode: u8,
    /// Coarse frequency (0-31)
    pub coarse: u8,
    /// Fine frequency (0-99)
    pub fine: u8,
    /// Detune (0-14, 7 is centre)
    pub detune: u8,
}

/// LFO parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Lfo {
    /// LFO speed (0-99)
    pub speed: u8,
    /// LFO delay (0-99)
    pub delay: u8,
    /// Pitch modulation depth (0-99)
    pub pitch_mod_depth: u8,
    /// Amplitude modulation depth (0-99)
    pub amp_mod_depth: u8,
    /// Key sync (0-1)
    pub sync: u8,
    /// Waveform (0-5)
    pub waveform: u8,
    /// Pitch modulation sensitivity (0-7)
    pub pitch_mod_sensitivity: u8,
}

/// One DX7 voice.
///
/// Equality and hashing cover every synthesis parameter and the name, but
/// not [`Voice::source`]: the same voice found in two files is the same
/// voice.
#[derive(Debug, Clone, Serialize)]
pub struct Voice {
    /// Six operators
    pub op: [Operator; NUM_OPERATORS],
    /// Pitch envelope
    pub pitch_envelope: Envelope,
    /// Algorithm number (0-31)
    pub algorithm: u8,
    /// Feedback amount (0-7)
    pub feedback: u8,
    /// Oscillator key sync (0-1)
    pub osc_key_sync: u8,
    /// LFO settings
    pub lfo: Lfo,
    /// Transpose (0-48, 24 is C3)
    pub transpose: u8,
    /// Raw name bytes, space padded
    #[serde(serialize_with = "serialize_name")]
    pub name: [u8; NAME_LEN],
    /// File the voice was read from, for display only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

fn serialize_name<S: Serializer>(name: &[u8; NAME_LEN], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&String::from_utf8_lossy(name))
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            op: [Operator::default(); NUM_OPERATORS],
            pitch_envelope: Envelope::default(),
            algorithm: 0,
            feedback: 0,
            osc_key_sync: 0,
            lfo: Lfo::default(),
            transpose: 0,
            name: [b' '; NAME_LEN],
            source: None,
        }
    }
}

impl Voice {
    /// The DX7 "INIT VOICE": a single sine carrier at full level.
    pub fn init() -> Self {
        let mut op = Operator {
            envelope: Envelope {
                rate: [99, 99, 99, 99],
                level: [99, 99, 99, 0],
            },
            keyboard_scaling: KeyboardScaling {
                break_point: 39,
                ..KeyboardScaling::default()
            },
            coarse: 1,
            detune: 7,
            ..Operator::default()
        };
        let mut ops = [op; NUM_OPERATORS];
        op.level = 99;
        // Wire position 5 is OP1, the only carrier in algorithm 1
        ops[NUM_OPERATORS - 1] = op;

        let mut voice = Self {
            op: ops,
            pitch_envelope: Envelope {
                rate: [99, 99, 99, 99],
                level: [50, 50, 50, 50],
            },
            osc_key_sync: 1,
            lfo: Lfo {
                speed: 35,
                pitch_mod_sensitivity: 3,
                sync: 1,
                ..Lfo::default()
            },
            transpose: 24,
            ..Self::default()
        };
        voice.set_name("INIT VOICE");
        voice
    }

    /// Voice name as text with trailing padding removed.
    pub fn name(&self) -> String {
        String::from_utf8_lossy(&self.name)
            .trim_end_matches(|c| c == ' ' || c == '\0')
            .to_string()
    }

    /// Sets the name, truncating to 10 bytes or padding with spaces.
    pub fn set_name(&mut self, name: &str) {
        self.name = [b' '; NAME_LEN];
        for (dst, src) in self.name.iter_mut().zip(name.bytes()) {
            *dst = src;
        }
    }

    /// Returns a copy tagged with the file it came from.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl PartialEq for Voice {
    fn eq(&self, other: &Self) -> bool {
        self.op == other.op
            && self.pitch_envelope == other.pitch_envelope
            && self.algorithm == other.algorithm
            && self.feedback == other.feedback
            && self.osc_key_sync == other.osc_key_sync
            && self.lfo == other.lfo
            && self.transpose == other.transpose
            && self.name == other.name
    }
}

impl Eq for Voice {}

impl Hash for Voice {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.op.hash(state);
        self.pitch_envelope.hash(state);
        self.algorithm.hash(state);
        self.feedback.hash(state);
        self.osc_key_sync.hash(state);
        self.lfo.hash(state);
        self.transpose.hash(state);
        self.name.hash(state);
    }
}
