use crate::error::{RasterError, Result};
use crate::metadata::{Metadata, BAND_NAME};

/// Position of the first band whose `NAME` metadata equals `name`.
///
/// Bands are scanned in order, so a duplicated name always resolves to the
/// lowest index and later bands with the same name are unreachable by name.
pub fn get_band_id(band_metadata: &[Metadata], name: &str) -> Result<usize> {
    band_metadata
        .iter()
        .position(|meta| meta.get(BAND_NAME).is_some_and(|n| n == name))
        .ok_or_else(|| RasterError::NameNotFound(name.to_string()))
}
