/// Supplies raw instruction words to the decoder.
pub trait WordSource {
    /// Next word, or `None` once fewer than four bytes remain.
    fn next_word(&mut self) -> Option<u32>;

    /// Byte offset of the next word.
    fn offset(&self) -> usize;
}

/// Little-endian words over a byte slice.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Bytes left over after the last whole word.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        self.bytes.get(self.offset..).unwrap_or_default()
    }
}

impl<S: WordSource + ?Sized> WordSource for &mut S {
    fn next_word(&mut self) -> Option<u32> {
        (**self).next_word()
    }

    fn offset(&self) -> usize {
        (**self).offset()
    }
}

impl WordSource for ByteCursor<'_> {
    fn next_word(&mut self) -> Option<u32> {
        let chunk = self.bytes.get(self.offset..self.offset + 4)?;
        let word = u32::from_le_bytes(chunk.try_into().ok()?);
        self.offset += 4;
        Some(word)
    }

    fn offset(&self) -> usize {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_little_endian_words() {
        let bytes = [0x02, 0x00, 0x81, 0xE0, 0x01, 0x02];
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.offset(), 0);
        assert_eq!(cursor.next_word(), Some(0xE081_0002));
        assert_eq!(cursor.offset(), 4);
        assert_eq!(cursor.next_word(), None);
        assert_eq!(cursor.remaining(), &[0x01, 0x02]);
    }

    #[test]
    fn borrowed_cursor_keeps_its_position() {
        let bytes = [0x1E, 0xFF, 0x2F, 0xE1, 0xAA, 0xBB, 0xCC];
        fn drain(mut source: impl WordSource) -> Vec<u32> {
            std::iter::from_fn(|| source.next_word()).collect()
        }

        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(drain(&mut cursor), vec![0xE12F_FF1E]);
        assert_eq!(cursor.offset(), 4);
        assert_eq!(cursor.remaining(), &[0xAA, 0xBB, 0xCC]);
    }
}
