//! Pack/unpack pairs for the bytes the bulk format shares between
//! parameters.
//!
//! Each pair is an exact inverse over the bits it owns: unpacking then
//! packing a byte reproduces it with any unused bits cleared.

/// Byte 11 of a bulk operator: left curve in bits 0-1, right curve in bits 2-3.
pub fn pack_curves(left: u8, right: u8) -> u8 {
    (left & 0x03) | ((right & 0x03) << 2)
}

/// Inverse of [`pack_curves`], returns `(left, right)`.
pub fn unpack_curves(byte: u8) -> (u8, u8) {
    (byte & 0x03, (byte & 0x0c) >> 2)
}

/// Byte 12 of a bulk operator: rate scaling in bits 0-2, detune in bits 3-6.
pub fn pack_rate_scale_detune(rate_scaling: u8, detune: u8) -> u8 {
    (rate_scaling & 0x07) | ((detune & 0x0f) << 3)
}

/// Inverse of [`pack_rate_scale_detune`], returns `(rate_scaling, detune)`.
pub fn unpack_rate_scale_detune(byte: u8) -> (u8, u8) {
    (byte & 0x07, (byte & 0x78) >> 3)
}

/// Byte 13 of a bulk operator: amplitude modulation sensitivity in bits
/// 0-1, key velocity sensitivity in bits 2-4.
pub fn pack_sensitivity(amp_mod: u8, velocity: u8) -> u8 {
    (amp_mod & 0x03) | ((velocity & 0x07) << 2)
}

/// Inverse of [`pack_sensitivity`], returns `(amp_mod, velocity)`.
pub fn unpack_sensitivity(byte: u8) -> (u8, u8) {
    (byte & 0x03, (byte & 0x1c) >> 2)
}

/// Byte 15 of a bulk operator: oscillator mode in bit 0, coarse
/// frequency in bits 1-5.
pub fn pack_mode_coarse(mode: u8, coarse: u8) -> u8 {
    (mode & 0x01) | ((coarse & 0x1f) << 1)
}

/// Inverse of [`pack_mode_coarse`], returns `(mode, coarse)`.
pub fn unpack_mode_coarse(byte: u8) -> (u8, u8) {
    (byte & 0x01, (byte & 0x3e) >> 1)
}

/// Byte 111 of a bulk voice: feedback in bits 0-2, oscillator key sync in bit 3.
pub fn pack_feedback_sync(feedback: u8, osc_key_sync: u8) -> u8 {
    (feedback & 0x07) | ((osc_key_sync & 0x01) << 3)
}

/// Inverse of [`pack_feedback_sync`], returns `(feedback, osc_key_sync)`.
pub fn unpack_feedback_sync(byte: u8) -> (u8, u8) {
    (byte & 0x07, (byte & 0x08) >> 3)
}

/// Byte 116 of a bulk voice: LFO sync in bit 0, waveform in bits 1-4,
/// pitch modulation sensitivity in bits 5-6.
pub fn pack_lfo_flags(sync: u8, waveform: u8, pitch_mod_sensitivity: u8) -> u8 {
    (sync & 0x01) | ((waveform & 0x0f) << 1) | ((pitch_mod_sensitivity & 0x03) << 5)
}

/// Inverse of [`pack_lfo_flags`], returns `(sync, waveform, pitch_mod_sensitivity)`.
pub fn unpack_lfo_flags(byte: u8) -> (u8, u8, u8) {
    (byte & 0x01, (byte & 0x1e) >> 1, (byte & 0x60) >> 5)
}
