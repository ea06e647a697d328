//! 128-byte packed voice layout used inside 32-voice bulk dumps.

use super::packing::*;
use crate::patch::{Envelope, KeyboardScaling, Lfo, Operator, Voice, NAME_LEN, NUM_OPERATORS};

/// Size of one packed voice
pub const VOICE_SIZE: usize = 128;

/// Size of one packed operator
pub const OPERATOR_SIZE: usize = 17;

const GLOBAL: usize = NUM_OPERATORS * OPERATOR_SIZE;
const NAME: usize = VOICE_SIZE - NAME_LEN;

/// Unpacks one voice from its 128-byte bulk representation.
pub fn decode(data: &[u8; VOICE_SIZE]) -> Voice {
    let mut voice = Voice::default();

    for (i, o) in voice.op.iter_mut().enumerate() {
        *o = decode_operator(&data[i * OPERATOR_SIZE..(i + 1) * OPERATOR_SIZE]);
    }

    let g = &data[GLOBAL..];
    voice.pitch_envelope = Envelope {
        rate: [g[0], g[1], g[2], g[3]],
        level: [g[4], g[5], g[6], g[7]],
    };
    voice.algorithm = g[8];
    (voice.feedback, voice.osc_key_sync) = unpack_feedback_sync(g[9]);

    let (sync, waveform, pitch_mod_sensitivity) = unpack_lfo_flags(g[14]);
    voice.lfo = Lfo {
        speed: g[10],
        delay: g[11],
        pitch_mod_depth: g[12],
        amp_mod_depth: g[13],
        sync,
        waveform,
        pitch_mod_sensitivity,
    };
    voice.transpose = g[15];
    voice.name.copy_from_slice(&data[NAME..]);

    voice
}

fn decode_operator(op_data: &[u8]) -> Operator {
    let (left_curve, right_curve) = unpack_curves(op_data[11]);
    let (rate_scaling, detune) = unpack_rate_scale_detune(op_data[12]);
    let (amp_mod_sensitivity, velocity_sensitivity) = unpack_sensitivity(op_data[13]);
    let (mode, coarse) = unpack_mode_coarse(op_data[15]);

    Operator {
        envelope: Envelope {
            rate: [op_data[0], op_data[1], op_data[2], op_data[3]],
            level: [op_data[4], op_data[5], op_data[6], op_data[7]],
        },
        keyboard_scaling: KeyboardScaling {
            break_point: op_data[8],
            left_depth: op_data[9],
            right_depth: op_data[10],
            left_curve,
            right_curve,
        },
        rate_scaling,
        amp_mod_sensitivity,
        velocity_sensitivity,
        level: op_data[14],
        mode,
        coarse,
        fine: op_data[16],
        detune,
    }
}

/// Packs one voice into its 128-byte bulk representation.
pub fn encode(voice: &Voice) -> [u8; VOICE_SIZE] {
    let mut data = [0u8; VOICE_SIZE];

    for (i, o) in voice.op.iter().enumerate() {
        let op_data = &mut data[i * OPERATOR_SIZE..(i + 1) * OPERATOR_SIZE];
        op_data[0..4].copy_from_slice(&o.envelope.rate);
        op_data[4..8].copy_from_slice(&o.envelope.level);
        op_data[8] = o.keyboard_scaling.break_point;
        op_data[9] = o.keyboard_scaling.left_depth;
        op_data[10] = o.keyboard_scaling.right_depth;
        op_data[11] = pack_curves(o.keyboard_scaling.left_curve, o.keyboard_scaling.right_curve);
        op_data[12] = pack_rate_scale_detune(o.rate_scaling, o.detune);
        op_data[13] = pack_sensitivity(o.amp_mod_sensitivity, o.velocity_sensitivity);
        op_data[14] = o.level;
        op_data[15] = pack_mode_coarse(o.mode, o.coarse);
        op_data[16] = o.fine;
    }

    let g = &mut data[GLOBAL..NAME];
    g[0..4].copy_from_slice(&voice.pitch_envelope.rate);
    g[4..8].copy_from_slice(&voice.pitch_envelope.level);
    g[8] = voice.algorithm;
    g[9] = pack_feedback_sync(voice.feedback, voice.osc_key_sync);
    g[10] = voice.lfo.speed;
    g[11] = voice.lfo.delay;
    g[12] = voice.lfo.pitch_mod_depth;
    g[13] = voice.lfo.amp_mod_depth;
    g[14] = pack_lfo_flags(voice.lfo.sync, voice.lfo.waveform, voice.lfo.pitch_mod_sensitivity);
    g[15] = voice.transpose;

    data[NAME..].copy_from_slice(&voice.name);

    data
}
