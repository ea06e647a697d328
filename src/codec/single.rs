//! 155-byte unpacked layout of a single voice dump. Every parameter has a
//! byte of its own.

use crate::patch::{Envelope, KeyboardScaling, Lfo, Operator, Voice, NAME_LEN, NUM_OPERATORS};

/// Size of one unpacked voice
pub const VOICE_SIZE: usize = 155;

/// Size of one unpacked operator
pub const OPERATOR_SIZE: usize = 21;

const GLOBAL: usize = NUM_OPERATORS * OPERATOR_SIZE;
const NAME: usize = VOICE_SIZE - NAME_LEN;

/// Reads one voice from its 155-byte single voice representation.
pub fn decode(data: &[u8; VOICE_SIZE]) -> Voice {
    let mut voice = Voice::default();

    for (i, o) in voice.op.iter_mut().enumerate() {
        let d = &data[i * OPERATOR_SIZE..(i + 1) * OPERATOR_SIZE];
        *o = Operator {
            envelope: Envelope {
                rate: [d[0], d[1], d[2], d[3]],
                level: [d[4], d[5], d[6], d[7]],
            },
            keyboard_scaling: KeyboardScaling {
                break_point: d[8],
                left_depth: d[9],
                right_depth: d[10],
                left_curve: d[11],
                right_curve: d[12],
            },
            rate_scaling: d[13],
            amp_mod_sensitivity: d[14],
            velocity_sensitivity: d[15],
            level: d[16],
            mode: d[17],
            coarse: d[18],
            fine: d[19],
            detune: d[20],
        };
    }

    let g = &data[GLOBAL..NAME];
    voice.pitch_envelope = Envelope {
        rate: [g[0], g[1], g[2], g[3]],
        level: [g[4], g[5], g[6], g[7]],
    };
    voice.algorithm = g[8];
    voice.feedback = g[9];
    voice.osc_key_sync = g[10];
    voice.lfo = Lfo {
        speed: g[11],
        delay: g[12],
        pitch_mod_depth: g[13],
        amp_mod_depth: g[14],
        sync: g[15],
        waveform: g[16],
        pitch_mod_sensitivity: g[17],
    };
    voice.transpose = g[18];
    voice.name.copy_from_slice(&data[NAME..]);

    voice
}

/// Writes one voice in the 155-byte single voice representation.
pub fn encode(voice: &Voice) -> [u8; VOICE_SIZE] {
    let mut data = [0u8; VOICE_SIZE];

    for (i, o) in voice.op.iter().enumerate() {
        let d = &mut data[i * OPERATOR_SIZE..(i + 1) * OPERATOR_SIZE];
        d[0..4].copy_from_slice(&o.envelope.rate);
        d[4..8].copy_from_slice(&o.envelope.level);
        d[8] = o.keyboard_scaling.break_point;
        d[9] = o.keyboard_scaling.left_depth;
        d[10] = o.keyboard_scaling.right_depth;
        d[11] = o.keyboard_scaling.left_curve;
        d[12] = o.keyboard_scaling.right_curve;
        d[13] = o.rate_scaling;
        d[14] = o.amp_mod_sensitivity;
        d[15] = o.velocity_sensitivity;
        d[16] = o.level;
        d[17] = o.mode;
        d[18] = o.coarse;
        d[19] = o.fine;
        d[20] = o.detune;
    }

    let g = &mut data[GLOBAL..NAME];
    g[0..4].copy_from_slice(&voice.pitch_envelope.rate);
    g[4..8].copy_from_slice(&voice.pitch_envelope.level);
    g[8] = voice.algorithm;
    g[9] = voice.feedback;
    g[10] = voice.osc_key_sync;
    g[11] = voice.lfo.speed;
    g[12] = voice.lfo.delay;
    g[13] = voice.lfo.pitch_mod_depth;
    g[14] = voice.lfo.amp_mod_depth;
    g[15] = voice.lfo.sync;
    g[16] = voice.lfo.waveform;
    g[17] = voice.lfo.pitch_mod_sensitivity;
    g[18] = voice.transpose;

    data[NAME..].copy_from_slice(&voice.name);

    data
}
