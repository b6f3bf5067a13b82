//! In-memory provider

use std::collections::VecDeque;

use crate::Result;
use crate::capture::RawFrame;
use crate::provider::CaptureProvider;

/// Provider over frames that are already decoded, e.g. by another capture
/// library
pub struct MemoryProvider {
    frames: VecDeque<RawFrame>,
}

impl MemoryProvider {
    pub fn new(frames: impl IntoIterator<Item = RawFrame>) -> Self {
        Self { frames: frames.into_iter().collect() }
    }

    /// Frames not yet handed out
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

#[async_trait::async_trait]
impl CaptureProvider for MemoryProvider {
    async fn next_frame(&mut self) -> Result<Option<RawFrame>> {
        Ok(self.frames.pop_front())
    }

    fn source_name(&self) -> String {
        "<memory>".to_string()
    }
}
