use std::fmt;

/// Reason a chunk was refused by [`ResponseBuffer::try_append`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// Growing the backing storage failed.
    AllocationFailed,
    /// Appending the chunk would exceed the configured byte cap.
    LimitExceeded { limit: usize },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed => write!(f, "failed to grow response buffer"),
            Self::LimitExceeded { limit } => {
                write!(f, "response body exceeds the {limit} byte limit")
            }
        }
    }
}

impl std::error::Error for BufferError {}

/// Append-only accumulator for response body chunks.
///
/// After every accepted chunk the backing storage keeps one spare byte past
/// [`len`](Self::len). That slot is reserved for callers that want to hand the
/// payload to NUL-terminated consumers and is never counted in the length.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    data: Vec<u8>,
    limit: Option<usize>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer that refuses to grow beyond `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            limit: Some(limit),
        }
    }

    /// Appends `chunk` and returns the number of bytes consumed.
    ///
    /// Returns `0` for a non-empty chunk that could not be stored; the chunk is
    /// dropped and the length is left unchanged. A short count tells the
    /// caller to abort the transfer.
    pub fn write(&mut self, chunk: &[u8]) -> usize {
        match self.try_append(chunk) {
            Ok(()) => chunk.len(),
            Err(_) => 0,
        }
    }

    /// Appends `chunk`, reporting why it was refused on failure.
    pub fn try_append(&mut self, chunk: &[u8]) -> Result<(), BufferError> {
        if let Some(limit) = self.limit {
            let next = self.data.len().saturating_add(chunk.len());
            if next > limit {
                return Err(BufferError::LimitExceeded { limit });
            }
        }

        self.data
            .try_reserve(chunk.len().saturating_add(1))
            .map_err(|_| BufferError::AllocationFailed)?;
        self.data.extend_from_slice(chunk);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::{BufferError, ResponseBuffer};

    #[test]
    fn capacity_keeps_sentinel_slot_after_each_chunk() {
        let mut buffer = ResponseBuffer::new();
        for chunk in [&b""[..], b"hello", b"abc", b"", b"0123456789"] {
            let before = buffer.len();
            assert_eq!(buffer.write(chunk), chunk.len());
            assert!(buffer.capacity() >= before + chunk.len() + 1);
        }
    }

    #[test]
    fn limit_refuses_chunk_without_advancing_length() {
        let mut buffer = ResponseBuffer::with_limit(4);
        assert_eq!(buffer.write(b"abc"), 3);
        assert_eq!(
            buffer.try_append(b"de"),
            Err(BufferError::LimitExceeded { limit: 4 })
        );
        assert_eq!(buffer.write(b"de"), 0);
        assert_eq!(buffer.as_bytes(), b"abc");
        assert_eq!(buffer.write(b"d"), 1);
        assert_eq!(buffer.len(), 4);
    }
}
