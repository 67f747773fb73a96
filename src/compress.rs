
//! zlib compression and decompression for the data pool.
//! Every out-of-line blob in a map file is stored as one zlib stream.

use crate::error::{Error, Result};


/// A byte vector.
pub type ByteVec = Vec<u8>;

/// A byte slice.
pub type Bytes<'s> = &'s [u8];


/// Compress a data-pool blob with zlib at the default level.
pub fn compress_bytes(bytes: Bytes<'_>) -> ByteVec {
    miniz_oxide::deflate::compress_to_vec_zlib(bytes, 6)
}

/// Decompress a data-pool blob.
/// Accepts any valid zlib stream, but validates that the result
/// has exactly the uncompressed length declared in the container.
pub fn decompress_bytes(compressed: Bytes<'_>, expected_byte_size: usize) -> Result<ByteVec> {
    // the hint is advisory, so a forged huge size cannot
    // force a huge allocation before decoding even starts
    let options = zune_inflate::DeflateOptions::default()
        .set_limit(expected_byte_size)
        .set_size_hint(expected_byte_size.min(1 << 20));

    let mut decoder = zune_inflate::DeflateDecoder::new_with_options(compressed, options);

    let bytes = decoder.decode_zlib()
        .map_err(|_| Error::corrupt_blob("invalid zlib stream"))?;

    if bytes.len() != expected_byte_size {
        return Err(Error::corrupt_blob("uncompressed length does not match the declared size"));
    }

    Ok(bytes)
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn roundtrip() {
        let data: Vec<u8> = (0..4096_u32).map(|index| (index % 251) as u8).collect();

        let compressed = compress_bytes(&data);
        assert!(compressed.len() < data.len());

        let decompressed = decompress_bytes(&compressed, data.len()).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn empty_blob_roundtrips() {
        let compressed = compress_bytes(&[]);
        assert_eq!(decompress_bytes(&compressed, 0).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(decompress_bytes(&[0xde, 0xad, 0xbe, 0xef], 16).is_err());
    }

    #[test]
    fn wrong_declared_size_is_rejected() {
        let compressed = compress_bytes(&[1, 2, 3, 4]);
        assert!(decompress_bytes(&compressed, 5).is_err());
    }
}
