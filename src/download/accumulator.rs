use std::fmt::Display;

use size::Size;

/// Upper bound on the buffer reserved up front, the rest grows as bytes arrive.
const INITIAL_CAPACITY: usize = 64 * 1024;

/// Buffers the bytes of one logical transfer.
///
/// Progress is published once per batch rather than once per network chunk, so the number of
/// registry updates depends on the batch threshold and not on how the server chunks the body.
#[derive(Debug)]
pub struct ByteAccumulator {
    name: String,
    target_size: usize,
    data: Vec<u8>,
    batch_threshold: usize,
    batch_received: usize,
}

impl ByteAccumulator {
    /// Creates an accumulator that completes a batch roughly `batches` times per transfer.
    pub fn new(name: impl Into<String>, target_size: usize, batches: usize) -> Self {
        let threshold = target_size / batches.max(1);
        Self::with_batch_threshold(name, target_size, threshold)
    }

    pub fn with_batch_threshold(name: impl Into<String>, target_size: usize, threshold: usize) -> Self {
        Self {
            name: name.into(),
            target_size,
            data: Vec::with_capacity(target_size.min(INITIAL_CAPACITY)),
            batch_threshold: threshold.max(1),
            batch_received: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target_size(&self) -> usize {
        self.target_size
    }

    /// Appends as much of `chunk` as fits and returns the number of bytes accepted.
    pub fn append(&mut self, chunk: &[u8]) -> usize {
        let accepted = chunk.len().min(self.remaining());
        self.data.extend_from_slice(&chunk[..accepted]);
        self.batch_received += accepted;
        accepted
    }

    pub fn start_batch(&mut self) {
        self.batch_received = 0;
    }

    pub fn is_batch_completed(&self) -> bool {
        self.batch_received >= self.batch_threshold
    }

    pub fn check_completed(&self) -> bool {
        self.data.len() == self.target_size
    }

    pub fn remaining(&self) -> usize {
        self.target_size - self.data.len()
    }

    pub fn progress(&self) -> f64 {
        if self.target_size == 0 {
            return 1.0;
        }
        self.data.len() as f64 / self.target_size as f64
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl Display for ByteAccumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} of {}",
            self.name,
            Size::from_bytes(self.data.len()),
            Size::from_bytes(self.target_size)
        )
    }
}
