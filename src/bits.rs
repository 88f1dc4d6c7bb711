//! Fixed-width bit packing.
//!
//! Bytes are read as one MSB-first bit stream and sliced into groups of
//! `bits_per_group` bits. Packing right-pads the stream with zero bits so the
//! last group is full; unpacking emits whole bytes only and silently drops
//! any trailing bits that cannot form one. The same code serves every
//! alphabet width.

/// Largest group width supported by the packer.
pub const MAX_GROUP_BITS: u8 = 16;

fn check_width(bits_per_group: u8) {
    assert!(
        (1..=MAX_GROUP_BITS).contains(&bits_per_group),
        "group width must be 1..={MAX_GROUP_BITS} bits, got {bits_per_group}"
    );
}

fn saturate(value: u128) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

/// Number of groups produced by packing `byte_len` bytes.
///
/// Saturates at `usize::MAX`.
pub fn packed_len(byte_len: usize, bits_per_group: u8) -> usize {
    check_width(bits_per_group);
    saturate((byte_len as u128 * 8).div_ceil(u128::from(bits_per_group)))
}

/// Number of whole bytes recovered by unpacking `group_count` groups.
///
/// Saturates at `usize::MAX`.
pub fn unpacked_len(group_count: usize, bits_per_group: u8) -> usize {
    check_width(bits_per_group);
    saturate(group_count as u128 * u128::from(bits_per_group) / 8)
}

/// Packs bytes into `bits_per_group`-bit groups, most significant bit first.
///
/// # Panics
/// If `bits_per_group` is outside `1..=16`.
pub fn pack(bytes: &[u8], bits_per_group: u8) -> Vec<u16> {
    let width = u32::from(bits_per_group);
    let mut groups = Vec::with_capacity(packed_len(bytes.len(), bits_per_group));
    let mask = (1u32 << width) - 1;

    let mut acc: u32 = 0;
    let mut acc_bits: u32 = 0;

    for &byte in bytes {
        acc = (acc << 8) | u32::from(byte);
        acc_bits += 8;

        while acc_bits >= width {
            acc_bits -= width;
            groups.push(((acc >> acc_bits) & mask) as u16);
        }
        acc &= (1u32 << acc_bits) - 1;
    }

    if acc_bits > 0 {
        // Zero padding on the right
        groups.push(((acc << (width - acc_bits)) & mask) as u16);
    }

    groups
}

/// Unpacks `bits_per_group`-bit groups back into bytes.
///
/// Only the low `bits_per_group` bits of each group are used. Trailing bits
/// that do not fill a byte are discarded.
///
/// # Panics
/// If `bits_per_group` is outside `1..=16`.
pub fn unpack(groups: &[u16], bits_per_group: u8) -> Vec<u8> {
    let width = u32::from(bits_per_group);
    let mut bytes = Vec::with_capacity(unpacked_len(groups.len(), bits_per_group));
    let mask = (1u32 << width) - 1;

    let mut acc: u32 = 0;
    let mut acc_bits: u32 = 0;

    for &group in groups {
        acc = (acc << width) | (u32::from(group) & mask);
        acc_bits += width;

        while acc_bits >= 8 {
            acc_bits -= 8;
            bytes.push((acc >> acc_bits) as u8);
        }
        acc &= (1u32 << acc_bits) - 1;
    }

    bytes
}
