//! Easy2 handler that drains response bodies without keeping them.

/// Per-worker transfer state. Implements curl's Handler for Easy2.
#[derive(Debug, Default)]
pub struct DiscardHandler {
    /// Body bytes drained during the current request.
    pub(super) bytes: u64,
}

impl DiscardHandler {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Bytes of the request that just finished; resets for the next one.
    pub(super) fn take_bytes(&mut self) -> u64 {
        std::mem::take(&mut self.bytes)
    }
}

impl curl::easy::Handler for DiscardHandler {
    fn write(&mut self, data: &[u8]) -> Result<usize, curl::easy::WriteError> {
        self.bytes += data.len() as u64;
        Ok(data.len())
    }
}
