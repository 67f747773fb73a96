
//! ASCII strings and the fixed-width "int-encoded" name codec.
//!
//! Name fields in a map file occupy a fixed number of `i32` words.
//! Inside each word the byte order is reversed and every byte is
//! biased by `+128`; the low byte of the final word is forced to zero
//! so that a terminator always exists.

use std::fmt;

use smallvec::SmallVec;

use crate::compress::ByteVec;
use crate::error::{Error, Result, UnitResult};
use crate::io::{Data, SliceRead, Write};


/// The bytes that make up a text.
/// Stored inline for the short names that appear in map files.
pub type TextBytes = SmallVec<[u8; 24]>;


/// A byte string with each byte being an ASCII char.
/// Used for names, info strings and server settings.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Text {
    bytes: TextBytes,
}

impl Text {

    /// The internal ASCII bytes this text is made of.
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Whether this text contains no characters at all.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Create a `Text` from an `str` reference.
    /// Returns `None` if the string contains non-ASCII chars or embedded NUL bytes.
    pub fn from(str: impl AsRef<str>) -> Option<Self> {
        let bytes = str.as_ref().bytes()
            .map(|byte| if byte != 0 && byte.is_ascii() { Some(byte) } else { None })
            .collect::<Option<TextBytes>>();

        bytes.map(Self::from_bytes_unchecked)
    }

    /// Create a `Text` from a slice of bytes,
    /// without checking any of the bytes.
    pub fn from_slice_unchecked(text: &[u8]) -> Self {
        Self::from_bytes_unchecked(SmallVec::from_slice(text))
    }

    /// Create a `Text` from the specified bytes object,
    /// without checking any of the bytes.
    pub fn from_bytes_unchecked(bytes: TextBytes) -> Self {
        Text { bytes }
    }

    /// Interpret a decompressed data-pool blob as a NUL-terminated string,
    /// dropping the terminator.
    pub fn from_null_terminated_blob(blob: &[u8]) -> Result<Self> {
        match blob.split_last() {
            None => Ok(Text::default()),
            Some((&0, contents)) => Ok(Text::from_bytes_unchecked(SmallVec::from_slice(contents))),
            Some(_) => Err(Error::corrupt_blob("string blob misses its terminator")),
        }
    }

    /// The bytes of this text followed by a NUL terminator,
    /// ready to be registered as a data-pool blob.
    pub fn to_null_terminated_bytes(&self) -> ByteVec {
        let mut bytes = Vec::with_capacity(self.bytes.len() + 1);
        bytes.extend_from_slice(&self.bytes);
        bytes.push(0);
        bytes
    }

    /// Whether this text can be stored in a name field of `word_count` words.
    /// A field of `n` words holds at most `4 * n - 1` chars plus the forced terminator.
    pub fn fits_int_encoded(&self, word_count: usize) -> bool {
        self.bytes.len() < word_count * i32::BYTE_SIZE
    }

    /// Read a name field of the specified width.
    /// Un-biases each byte, saturating into the ASCII range,
    /// then drops the terminator and any trailing NUL padding.
    pub fn read_int_encoded(read: &mut SliceRead<'_>, word_count: usize) -> Result<Self> {
        let encoded = read.read_bytes(word_count * i32::BYTE_SIZE)?;

        let mut bytes = TextBytes::new();
        for word in encoded.chunks_exact(i32::BYTE_SIZE) {
            for &byte in word.iter().rev() {
                bytes.push((i16::from(byte) - 128).clamp(0, 127) as u8);
            }
        }

        bytes.pop(); // the forced terminator
        while bytes.last() == Some(&0) {
            bytes.pop();
        }

        Ok(Text { bytes })
    }

    /// Write this text as a name field of the specified width,
    /// failing if the text does not fit.
    pub fn write_int_encoded(&self, write: &mut impl Write, word_count: usize) -> UnitResult {
        if !self.fits_int_encoded(word_count) {
            return Err(Error::out_of_range("name does not fit its field"));
        }

        let mut padded = vec![0_u8; word_count * i32::BYTE_SIZE];
        padded[.. self.bytes.len()].copy_from_slice(&self.bytes);

        for word in padded.chunks_exact(i32::BYTE_SIZE) {
            for &byte in word.iter().rev() {
                (byte.wrapping_add(128)).write(write)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Text {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;

        for &byte in self.bytes() {
            formatter.write_char(byte as char)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "\"{}\"", self)
    }
}


#[cfg(test)]
mod test {
    use super::*;

    fn encode(text: &Text, word_count: usize) -> Vec<u8> {
        let mut bytes = Vec::new();
        text.write_int_encoded(&mut bytes, word_count).unwrap();
        bytes
    }

    #[test]
    fn known_byte_layout() {
        let text = Text::from("AB").unwrap();

        // bytes within each word are reversed, then biased by 128
        assert_eq!(encode(&text, 1), &[128, 128, 'B' as u8 + 128, 'A' as u8 + 128]);
    }

    #[test]
    fn roundtrip_all_lengths() {
        for length in 0 .. 12 {
            let name: String = "abcdefghijk".chars().take(length).collect();
            let text = Text::from(&name).unwrap();

            let bytes = encode(&text, 3);
            assert_eq!(bytes.len(), 12);

            let decoded = Text::read_int_encoded(&mut SliceRead::new(&bytes), 3).unwrap();
            assert_eq!(decoded, text);
        }
    }

    #[test]
    fn fits_is_the_encode_law() {
        assert!(Text::from("abcdefghijk").unwrap().fits_int_encoded(3)); // 11 chars fit 3 words
        assert!(!Text::from("abcdefghijkl").unwrap().fits_int_encoded(3)); // 12 chars do not

        let mut bytes = Vec::new();
        assert!(Text::from("abcdefghijkl").unwrap().write_int_encoded(&mut bytes, 3).is_err());
    }

    #[test]
    fn maximum_capacity_keeps_the_terminator() {
        let text = Text::from("abcdefghijk").unwrap();
        let bytes = encode(&text, 3);

        // the low byte of the final word is the biased NUL
        assert_eq!(bytes[8], 128);

        let decoded = Text::read_int_encoded(&mut SliceRead::new(&bytes), 3).unwrap();
        assert_eq!(decoded, text);
    }

    #[test]
    fn rejects_non_ascii() {
        assert!(Text::from("ok").is_some());
        assert!(Text::from("höhe").is_none());
        assert!(Text::from("a\0b").is_none());
    }

    #[test]
    fn null_terminated_blob_forms() {
        let text = Text::from("sv_foo 1").unwrap();
        let blob = text.to_null_terminated_bytes();

        assert_eq!(blob.last(), Some(&0));
        assert_eq!(Text::from_null_terminated_blob(&blob).unwrap(), text);

        assert!(Text::from_null_terminated_blob(b"missing terminator").is_err());
        assert!(Text::from_null_terminated_blob(b"").unwrap().is_empty());
    }
}
