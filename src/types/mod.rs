//! Core types flowing through the extraction pipeline.
//!
//! - [`Timestamp`] is the capture time attached to every frame
//! - [`StreamRecord`] is one classified chunk of a streamed image
//! - [`ReconstructedImage`] is the reassembled output of one stream
//!
//! All of them are immutable once built. Records are owned by whichever stage
//! currently holds them and are never shared between streams.

mod image;
mod record;
mod timestamp;

pub use image::ReconstructedImage;
pub(crate) use record::hex_bytes;
pub use record::StreamRecord;
pub use timestamp::Timestamp;
