//! # Byte Buffer Assembly
//!
//! Concatenates byte buffers into one contiguous buffer. The total length
//! is computed up front so the output is allocated exactly once.

/// Concatenate `buffers` in order.
///
/// The result length is the sum of the input lengths. An empty slice
/// yields an empty buffer. Inputs are borrowed and never modified.
pub fn concat<B: AsRef<[u8]>>(buffers: &[B]) -> Vec<u8> {
    let total: usize = buffers.iter().map(|b| b.as_ref().len()).sum();
    let mut out = Vec::with_capacity(total);
    for buffer in buffers {
        out.extend_from_slice(buffer.as_ref());
    }
    out
}
