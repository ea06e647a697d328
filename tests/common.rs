#![allow(dead_code)]

use std::path::Path;

use oorandom::Rand32;
use tx7patch::{Envelope, KeyboardScaling, Lfo, Operator, Voice};

pub const SEED: u64 = 0x7e57_da7a_d0c5_0001;

/// A voice with every field inside the range its bulk bit field can hold.
pub fn random_voice(rng: &mut Rand32) -> Voice {
    let mut r = |n: u32| rng.rand_range(0..n) as u8;

    let mut op = [Operator::default(); 6];
    for o in op.iter_mut() {
        *o = Operator {
            envelope: Envelope {
                rate: [r(100), r(100), r(100), r(100)],
                level: [r(100), r(100), r(100), r(100)],
            },
            keyboard_scaling: KeyboardScaling {
                break_point: r(100),
                left_depth: r(100),
                right_depth: r(100),
                left_curve: r(4),
                right_curve: r(4),
            },
            rate_scaling: r(8),
            amp_mod_sensitivity: r(4),
            velocity_sensitivity: r(8),
            level: r(100),
            mode: r(2),
            coarse: r(32),
            fine: r(100),
            detune: r(15),
        };
    }

    let mut name = [b' '; 10];
    for b in name.iter_mut() {
        *b = 0x20 + r(0x5f);
    }

    Voice {
        op,
        pitch_envelope: Envelope {
            rate: [r(100), r(100), r(100), r(100)],
            level: [r(100), r(100), r(100), r(100)],
        },
        algorithm: r(32),
        feedback: r(8),
        osc_key_sync: r(2),
        lfo: Lfo {
            speed: r(100),
            delay: r(100),
            pitch_mod_depth: r(100),
            amp_mod_depth: r(100),
            sync: r(2),
            waveform: r(6),
            pitch_mod_sensitivity: r(4),
        },
        transpose: r(49),
        name,
        source: None,
    }
}

pub fn random_voices(rng: &mut Rand32, n: usize) -> Vec<Voice> {
    (0..n).map(|_| random_voice(rng)).collect()
}

pub fn named_voice(name: &str) -> Voice {
    let mut voice = Voice::init();
    voice.set_name(name);
    voice
}

/// A bulk dump assembled byte by byte, without going through the encoder.
pub fn handmade_bulk_dump() -> Vec<u8> {
    let mut data = vec![0xF0, 0x43, 0x00, 0x09, 0x20, 0x00];
    for v in 0..32u8 {
        let mut voice = [0u8; 128];
        for op in 0..6 {
            let base = op * 17;
            voice[base] = 90 + op as u8; // R1
            voice[base + 11] = 0b1001; // left curve 1, right curve 2
            voice[base + 12] = (7 << 3) | 2; // detune 7, rate scaling 2
            voice[base + 13] = (3 << 2) | 1; // kvs 3, ams 1
            voice[base + 14] = 99 - op as u8; // output level
            voice[base + 15] = 0b10; // coarse 1, ratio mode
            voice[base + 16] = v; // fine
        }
        voice[110] = v; // algorithm
        voice[111] = (1 << 3) | 6; // key sync, feedback 6
        voice[116] = (2 << 5) | (4 << 1) | 1; // pms 2, wave 4, sync
        voice[117] = 24;
        let name = format!("HAND {:02}   ", v);
        voice[118..128].copy_from_slice(&name.as_bytes()[..10]);
        data.extend_from_slice(&voice);
    }
    let sum: u32 = data[6..].iter().map(|&b| u32::from(b & 0x7f)).sum();
    data.push((sum.wrapping_neg() & 0x7f) as u8);
    data.push(0xF7);
    data
}

pub fn write_syx(dir: &Path, name: &str, data: &[u8]) {
    std::fs::write(dir.join(name), data).expect("unable to write test sysex file");
}
