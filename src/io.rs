//! Little-endian primitive reads from an in-memory byte source.
//!
//! The rest of the crate works against fully-buffered `&[u8]` slices. This
//! module wraps a `std::io::Cursor` so that a short read at any point becomes
//! a [`TruncationError`] rather than an out-of-bounds panic.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Read;

/// The byte source ended before a required field could be read.
#[derive(Debug, thiserror::Error)]
#[error("unexpected end of input while reading {context}")]
pub struct TruncationError {
    pub context: &'static str,
}

/// A cursor over an in-memory buffer with length-checked little-endian reads.
pub(crate) struct BinaryReader<'a> {
    cursor: std::io::Cursor<&'a [u8]>,
}

impl<'a> BinaryReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        BinaryReader {
            cursor: std::io::Cursor::new(data),
        }
    }

    fn wrap<T>(r: std::io::Result<T>, context: &'static str) -> Result<T, TruncationError> {
        r.map_err(|_| TruncationError { context })
    }

    pub(crate) fn read_u8(&mut self, context: &'static str) -> Result<u8, TruncationError> {
        Self::wrap(self.cursor.read_u8(), context)
    }

    pub(crate) fn read_u16(&mut self, context: &'static str) -> Result<u16, TruncationError> {
        Self::wrap(self.cursor.read_u16::<LittleEndian>(), context)
    }

    pub(crate) fn read_u32(&mut self, context: &'static str) -> Result<u32, TruncationError> {
        Self::wrap(self.cursor.read_u32::<LittleEndian>(), context)
    }

    pub(crate) fn read_u64(&mut self, context: &'static str) -> Result<u64, TruncationError> {
        Self::wrap(self.cursor.read_u64::<LittleEndian>(), context)
    }

    pub(crate) fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<Vec<u8>, TruncationError> {
        let mut buf = vec![0u8; n];
        Self::wrap(self.cursor.read_exact(&mut buf), context)?;
        Ok(buf)
    }

    pub(crate) fn skip(&mut self, n: usize, context: &'static str) -> Result<(), TruncationError> {
        self.read_bytes(n, context).map(|_| ())
    }

    /// Current byte offset from the start of the underlying buffer.
    pub(crate) fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Consume and return every remaining byte. Never fails; returns an empty
    /// vector if the cursor is already at the end.
    pub(crate) fn read_to_end(&mut self) -> Vec<u8> {
        let mut buf = Vec::new();
        // A Cursor<&[u8]> is infallible to read from.
        #[allow(clippy::expect_used)]
        self.cursor
            .read_to_end(&mut buf)
            .expect("reading from an in-memory cursor cannot fail");
        buf
    }
}
