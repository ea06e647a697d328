//! DX7 SYSEX checksum.

/// 7-bit two's complement checksum: the low 7 bits of the negated sum of
/// every byte masked to 7 bits.
///
/// Adding the result to the masked sum of `data` always gives a multiple
/// of 128.
pub fn checksum(data: &[u8]) -> u8 {
    let sum = data
        .iter()
        .fold(0u32, |acc, &b| acc.wrapping_add(u32::from(b & 0x7f)));
    (sum.wrapping_neg() & 0x7f) as u8
}
