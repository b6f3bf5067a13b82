//! Provider trait for capture sources

use crate::Result;
use crate::capture::RawFrame;

/// Trait for sources of captured frames
///
/// Providers abstract over where frames come from (capture files, frames
/// already held in memory) so the pipeline only sees an ordered, finite
/// sequence.
#[async_trait::async_trait]
pub trait CaptureProvider: Send + 'static {
    /// Get the next captured frame
    ///
    /// Returns:
    /// - `Ok(Some(frame))` - Next frame in capture order
    /// - `Ok(None)` - Capture exhausted (normal termination)
    /// - `Err(e)` - The capture cannot be decoded; the run must abort
    async fn next_frame(&mut self) -> Result<Option<RawFrame>>;

    /// Human readable name of the source, for logging
    fn source_name(&self) -> String;
}
