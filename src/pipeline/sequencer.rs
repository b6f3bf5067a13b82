//! Frame sequencing

use crate::types::ReconstructedImage;

/// Order images by capture time at one-second granularity.
///
/// The sort is stable: images captured within the same second keep the order
/// in which they were produced.
pub fn sequence(mut images: Vec<ReconstructedImage>) -> Vec<ReconstructedImage> {
    images.sort_by_key(|image| image.timestamp.unix_seconds());
    images
}
