//! Decompression of the plaintext stream.
//!
//! Only the `decompress` direction is implemented — this is a read-only
//! crate, so there is no caller for a compression path.

use std::io::Read;

use flate2::read::GzDecoder;

use crate::config::Compression;

/// Decompresses `data` according to the header's declared `compression_flags`.
pub(crate) fn decompress(compression: Compression, data: &[u8]) -> Result<Vec<u8>, std::io::Error> {
    match compression {
        Compression::None => Ok(data.to_vec()),
        Compression::GZip => {
            let mut out = Vec::new();
            GzDecoder::new(data).read_to_end(&mut out)?;
            Ok(out)
        }
    }
}
