//! Hashed-block integrity stream: a pull-based `Read` adapter over a
//! sequence of `(index, sha256, length, data)` blocks.
//!
//! Each call to [`HashedBlockReader::read`] pulls exactly as many blocks
//! from the underlying source as needed to satisfy the request, validating
//! each block's digest and sequential index as it goes, refilling an
//! internal buffer on demand rather than requiring the caller to size reads
//! to block boundaries. Callers that need the whole stream (e.g. to hand it
//! to an XML parser as one buffer, so a mid-stream integrity failure can't
//! be reinterpreted as that parser's own I/O error) should drive it with
//! `read_to_end` rather than parsing directly off of it.

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};
use sha2::{Digest, Sha256};

use crate::error::BlockStreamError;

/// Wraps a byte source whose contents are laid out as a sequence of
/// integrity-checked blocks, exposing the concatenated `block_data` as a
/// plain `Read` stream.
pub(crate) struct HashedBlockReader<R> {
    inner: R,
    next_block_index: u64,
    /// Bytes already pulled and validated, not yet returned to the caller.
    pending: Vec<u8>,
    pending_pos: usize,
    finished: bool,
}

impl<R: Read> HashedBlockReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        HashedBlockReader {
            inner,
            next_block_index: 0,
            pending: Vec::new(),
            pending_pos: 0,
            finished: false,
        }
    }

    /// Pulls and validates the next block, refilling `self.pending`.
    /// Sets `self.finished` once the terminal zero-length block is seen.
    fn refill(&mut self) -> Result<(), BlockStreamError> {
        let block_index = self.inner.read_u32::<LittleEndian>()?;
        if u64::from(block_index) != self.next_block_index {
            return Err(BlockStreamError::OutOfSequence {
                expected: self.next_block_index,
                actual: u64::from(block_index),
            });
        }

        let mut block_hash = [0u8; 32];
        self.inner.read_exact(&mut block_hash)?;

        let block_len = self.inner.read_u32::<LittleEndian>()? as usize;

        if block_len == 0 {
            self.finished = true;
            return Ok(());
        }

        let mut block_data = vec![0u8; block_len];
        self.inner.read_exact(&mut block_data)?;

        let mut digest = Sha256::new();
        digest.update(&block_data);
        if digest.finalize().as_slice() != block_hash {
            return Err(BlockStreamError::BlockHashMismatch {
                block_index: self.next_block_index,
            });
        }

        self.next_block_index += 1;
        self.pending = block_data;
        self.pending_pos = 0;
        Ok(())
    }
}

impl<R: Read> Read for HashedBlockReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.pending_pos >= self.pending.len() && !self.finished {
            self.refill().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        }

        if self.pending_pos >= self.pending.len() {
            return Ok(0);
        }

        let available = &self.pending[self.pending_pos..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.pending_pos += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(index: u32, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&index.to_le_bytes());
        if data.is_empty() {
            out.extend_from_slice(&[0u8; 32]);
        } else {
            let mut digest = Sha256::new();
            digest.update(data);
            out.extend_from_slice(digest.finalize().as_slice());
        }
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(data);
        out
    }

    fn terminal_block(index: u32) -> Vec<u8> {
        block(index, &[])
    }

    #[test]
    fn reads_concatenated_block_data() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&block(0, b"hello "));
        stream.extend_from_slice(&block(1, b"world"));
        stream.extend_from_slice(&terminal_block(2));

        let mut reader = HashedBlockReader::new(stream.as_slice());
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"hello world");
    }

    #[test]
    fn detects_corrupted_block() {
        let mut stream = block(0, b"hello");
        // Flip a payload byte after its hash was computed.
        let payload_start = stream.len() - 5;
        stream[payload_start] ^= 0xFF;
        stream.extend_from_slice(&terminal_block(1));

        let mut reader = HashedBlockReader::new(stream.as_slice());
        let mut out = Vec::new();
        assert!(reader.read_to_end(&mut out).is_err());
    }

    #[test]
    fn detects_out_of_sequence_index() {
        let mut stream = block(1, b"hello");
        stream.extend_from_slice(&terminal_block(2));

        let mut reader = HashedBlockReader::new(stream.as_slice());
        let mut out = Vec::new();
        assert!(reader.read_to_end(&mut out).is_err());
    }

    #[test]
    fn empty_stream_is_immediate_eof() {
        let stream = terminal_block(0);
        let mut reader = HashedBlockReader::new(stream.as_slice());
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert!(out.is_empty());
    }
}
