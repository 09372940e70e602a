use std::ops::RangeInclusive;

/// Helper methods to pick apart and assemble instruction words.
/// Bit indexes go from lsb to msb (right to left).
pub trait Bits: Copy {
    /// Returns the bits in `bits_range`, moved down to position 0.
    fn get_bits(self, bits_range: RangeInclusive<u8>) -> Self;

    /// Returns a copy with the bits in `bits_range` replaced by the low bits of `value`.
    fn with_bits(self, bits_range: RangeInclusive<u8>, value: Self) -> Self;

    /// Interprets the low `number_of_bits` as a two's complement number.
    fn sign_extended(self, number_of_bits: u8) -> i64;
}

/// A mask with the bits of `bits_range` set.
#[must_use]
pub const fn range_mask(bits_range: &RangeInclusive<u8>) -> u32 {
    let length = *bits_range.end() - *bits_range.start() + 1;
    let ones = if length >= 32 {
        u32::MAX
    } else {
        (1 << length) - 1
    };
    ones << *bits_range.start()
}

impl Bits for u32 {
    fn get_bits(self, bits_range: RangeInclusive<u8>) -> Self {
        debug_assert!(*bits_range.end() < 32);
        (self & range_mask(&bits_range)) >> bits_range.start()
    }

    fn with_bits(self, bits_range: RangeInclusive<u8>, value: Self) -> Self {
        debug_assert!(*bits_range.end() < 32);
        let mask = range_mask(&bits_range);
        (self & !mask) | ((value << bits_range.start()) & mask)
    }

    fn sign_extended(self, number_of_bits: u8) -> i64 {
        debug_assert!((1..=32).contains(&number_of_bits));
        // Same trick as the classic xor/sub: flip the sign bit, then subtract it back.
        let value = i64::from(self.get_bits(0..=number_of_bits - 1));
        let sign = 1_i64 << (number_of_bits - 1);
        (value ^ sign) - sign
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::Rng;

    #[test]
    fn get_bits() {
        let b = 0b10_1100_1110_u32;
        assert_eq!(b.get_bits(0..=3), 0b1110);
        assert_eq!(b.get_bits(1..=1), 0b1);
        assert_eq!(b.get_bits(4..=7), 0b1100);
        assert_eq!(b.get_bits(8..=9), 0b10);
        assert_eq!(b.get_bits(0..=31), 0b10_1100_1110);
        assert_eq!(b.get_bits(28..=31), 0b0);
    }

    #[test]
    fn with_bits() {
        let b = 0xE000_0000_u32;
        assert_eq!(b.with_bits(20..=27, 0x28), 0xE280_0000);
        assert_eq!(b.with_bits(28..=31, 0x1), 0x1000_0000);
        // Extra high bits of the value are dropped.
        assert_eq!(0_u32.with_bits(0..=3, 0xFF), 0xF);
    }

    #[test]
    fn with_then_get_is_identity() {
        let mut rng = rand::thread_rng();
        for _ in 0..64 {
            let word: u32 = rng.gen_range(0..=u32::MAX);
            let value: u32 = rng.gen_range(0..=0xFFF);
            assert_eq!(word.with_bits(8..=19, value).get_bits(8..=19), value);
        }
    }

    #[test]
    fn range_mask_covers_whole_word() {
        assert_eq!(range_mask(&(0..=31)), u32::MAX);
        assert_eq!(range_mask(&(28..=31)), 0xF000_0000);
    }

    #[test]
    fn check_sign_extended() {
        assert_eq!(0b1001_u32.sign_extended(4), -7);
        assert_eq!(0b0111_u32.sign_extended(4), 7);
        assert_eq!(0x00FF_FFFF_u32.sign_extended(24), -1);
        assert_eq!(0xFFFF_FFFF_u32.sign_extended(32), -1);
    }
}
