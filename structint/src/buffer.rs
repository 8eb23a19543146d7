//! Word buffer with sticky capacity
//!
//! `WordBuffer` owns the `u64` words of a single value. Its byte capacity only
//! ever grows: requests for less storage than already held are no-ops, and
//! nothing here truncates or shrinks the backing vector.

use crate::error::{Result, StructIntError};
use crate::width::{checked_round_size, WORD_BYTES};

/// Growable array of 64-bit words, least significant first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordBuffer {
    /// Always `capacity_bytes / 8` words long
    words: Vec<u64>,
}

impl WordBuffer {
    /// Create an empty buffer (no storage)
    pub const fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Create a zeroed buffer holding at least `bytes` bytes
    pub fn with_capacity(bytes: usize) -> Result<Self> {
        let mut buffer = Self::new();
        buffer.ensure_capacity(bytes)?;
        Ok(buffer)
    }

    /// Allocated capacity in bytes (multiple of 8)
    #[inline]
    pub fn capacity_bytes(&self) -> usize {
        self.words.len() * WORD_BYTES
    }

    /// Number of allocated words
    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.words
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u64] {
        &mut self.words
    }

    /// Grow to at least `required_bytes`, preserving contents.
    ///
    /// Returns the resulting capacity, which is never smaller than before.
    /// New words are zero. On allocation failure the buffer is untouched.
    pub fn ensure_capacity(&mut self, required_bytes: usize) -> Result<usize> {
        let existing = self.capacity_bytes();
        if required_bytes <= existing {
            return Ok(existing);
        }

        let alloc_bytes = checked_round_size(required_bytes, WORD_BYTES).ok_or(
            StructIntError::OutOfMemory {
                requested_bytes: required_bytes,
            },
        )?;
        let new_words = alloc_bytes / WORD_BYTES;
        self.words
            .try_reserve_exact(new_words - self.words.len())
            .map_err(|_| StructIntError::OutOfMemory {
                requested_bytes: alloc_bytes,
            })?;
        self.words.resize(new_words, 0);

        tracing::trace!(from = existing, to = alloc_bytes, "grew word buffer");
        Ok(alloc_bytes)
    }

    /// Copy `src_bytes` worth of words from `src`, growing to
    /// `max(capacity, src_bytes)` and zero-filling everything past the copy.
    pub fn copy_from(&mut self, src: &[u64], src_bytes: usize) -> Result<usize> {
        let target = self.capacity_bytes().max(src_bytes);
        self.ensure_capacity(target)?;

        let copy_words = (src_bytes / WORD_BYTES).min(src.len());
        let target_words = target / WORD_BYTES;
        for (i, word) in self.words[..target_words].iter_mut().enumerate() {
            *word = if i < copy_words { src[i] } else { 0 };
        }
        Ok(target)
    }

    /// Zero the first `count` words
    pub fn zero(&mut self, count: usize) {
        let count = count.min(self.words.len());
        self.words[..count].fill(0);
    }

    /// Free the storage. The buffer may be reused afterwards.
    pub fn release(&mut self) {
        if !self.words.is_empty() {
            tracing::trace!(bytes = self.capacity_bytes(), "released word buffer");
        }
        self.words = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let buffer = WordBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity_bytes(), 0);
    }

    #[test]
    fn test_ensure_capacity_rounds_to_words() {
        let mut buffer = WordBuffer::new();
        assert_eq!(buffer.ensure_capacity(3).unwrap(), 8);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.ensure_capacity(17).unwrap(), 24);
        assert_eq!(buffer.as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn test_capacity_is_sticky() {
        let mut buffer = WordBuffer::with_capacity(32).unwrap();
        buffer.as_mut_slice()[0] = 0xDEAD;
        assert_eq!(buffer.ensure_capacity(8).unwrap(), 32);
        assert_eq!(buffer.capacity_bytes(), 32);
        assert_eq!(buffer.as_slice()[0], 0xDEAD);
    }

    #[test]
    fn test_growth_preserves_contents() {
        let mut buffer = WordBuffer::with_capacity(8).unwrap();
        buffer.as_mut_slice()[0] = 0x1234;
        buffer.ensure_capacity(24).unwrap();
        assert_eq!(buffer.as_slice(), &[0x1234, 0, 0]);
    }

    #[test]
    fn test_out_of_memory_leaves_buffer_intact() {
        let mut buffer = WordBuffer::with_capacity(8).unwrap();
        buffer.as_mut_slice()[0] = 7;
        let err = buffer.ensure_capacity(usize::MAX - 7).unwrap_err();
        assert!(matches!(err, StructIntError::OutOfMemory { .. }));
        assert_eq!(buffer.as_slice(), &[7]);

        // Rounding the request up to a whole word would overflow
        let err = buffer.ensure_capacity(usize::MAX).unwrap_err();
        assert_eq!(
            err,
            StructIntError::OutOfMemory {
                requested_bytes: usize::MAX
            }
        );
        assert_eq!(buffer.as_slice(), &[7]);
    }

    #[test]
    fn test_copy_from_widens_and_zero_fills() {
        let mut buffer = WordBuffer::with_capacity(32).unwrap();
        buffer.as_mut_slice().fill(u64::MAX);
        let target = buffer.copy_from(&[1, 2], 16).unwrap();
        assert_eq!(target, 32);
        assert_eq!(buffer.as_slice(), &[1, 2, 0, 0]);
    }

    #[test]
    fn test_copy_from_grows_destination() {
        let mut buffer = WordBuffer::new();
        let target = buffer.copy_from(&[5, 6, 7], 24).unwrap();
        assert_eq!(target, 24);
        assert_eq!(buffer.as_slice(), &[5, 6, 7]);
    }

    #[test]
    fn test_release() {
        let mut buffer = WordBuffer::with_capacity(16).unwrap();
        buffer.release();
        assert!(buffer.is_empty());
        // Releasing an empty buffer is a no-op
        buffer.release();
        assert_eq!(buffer.capacity_bytes(), 0);
    }
}
