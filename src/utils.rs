//! Utility functions for cipher modes

/// XOR two byte slices together.
///
/// The result is as long as the shorter input. CFB relies on this to cut
/// a full keystream block down to one feedback unit.
pub fn xor_blocks(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect()
}
