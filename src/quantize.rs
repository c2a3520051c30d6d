use num_traits::Float;

use crate::metadata::{Metadata, BAND_NAME, INITIAL_MAX, INITIAL_MIN};
use crate::sample::Sample;

/// Minimum and maximum of a band in a single pass, skipping NaN samples.
pub fn min_max<T: Sample>(band: &[T]) -> Option<(T, T)> {
    band.iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((min, max)) => Some((
                if v < min { v } else { min },
                if v > max { v } else { max },
            )),
        })
}

/// Stretches a band linearly so that its minimum maps to 0 and its maximum to 255.
///
/// Each byte is `floor(255 / (max - min) * (sample - min))`. A flat band,
/// where the stretch is undefined, yields all zeros.
pub fn quantize_to_bytes<T: Sample>(band: &[T]) -> Vec<u8> {
    let mut bytes = vec![0u8; band.len()];
    let Some((min, max)) = min_max(band) else {
        return bytes;
    };
    let (min, max) = (min.to_f64_lossy(), max.to_f64_lossy());
    let diff = max - min;
    if diff == 0.0 {
        return bytes;
    }

    let coef = 255.0 / diff;
    for (byte, sample) in bytes.iter_mut().zip(band) {
        // `as` saturates and maps NaN to 0
        *byte = (coef * (sample.to_f64_lossy() - min)).floor() as u8;
    }
    bytes
}

/// Rescales a float band in place to `[0, 1]`; a flat band is left as is.
pub fn normalize<F: Sample + Float>(band: &mut [F]) {
    let Some((min, max)) = min_max(&*band) else {
        return;
    };
    let diff = max - min;
    if diff == F::zero() {
        return;
    }
    for value in band.iter_mut() {
        *value = (*value - min) / diff;
    }
}

/// A byte-stretched band ready for preview export.
///
/// The metadata keeps the band name and the original value range under
/// `INITIAL_MIN` / `INITIAL_MAX` so the stretch can be undone.
#[derive(Debug, Clone, PartialEq)]
pub struct ByteBand {
    pub bytes: Vec<u8>,
    pub metadata: Metadata,
}

impl ByteBand {
    pub fn from_band<T: Sample>(band: &[T], name: Option<&str>) -> Self {
        let mut metadata = Metadata::new();
        if let Some(name) = name {
            metadata.insert(BAND_NAME.to_string(), name.to_string());
        }
        if let Some((min, max)) = min_max(band) {
            metadata.insert(INITIAL_MIN.to_string(), min.to_f64_lossy().to_string());
            metadata.insert(INITIAL_MAX.to_string(), max.to_f64_lossy().to_string());
        }
        Self {
            bytes: quantize_to_bytes(band),
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stretch_truncates() {
        assert_eq!(quantize_to_bytes(&[0.0f32, 10.0, 20.0]), vec![0, 127, 255]);
    }

    #[test]
    fn test_flat_band_is_all_zero() {
        assert_eq!(quantize_to_bytes(&[3.5f64; 7]), vec![0; 7]);
        assert_eq!(quantize_to_bytes::<u16>(&[]), Vec::<u8>::new());
    }

    #[test]
    fn test_integer_band() {
        assert_eq!(quantize_to_bytes(&[20i16, -20, 0]), vec![255, 0, 127]);
        assert_eq!(quantize_to_bytes(&[0u8, 255, 17]), vec![0, 255, 17]);
    }

    #[test]
    fn test_nan_samples_are_ignored() {
        let band = [f32::NAN, 1.0, 3.0];
        assert_eq!(min_max(&band), Some((1.0, 3.0)));
        assert_eq!(quantize_to_bytes(&band), vec![0, 0, 255]);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min_max(&[4u32, 9, 1, 7]), Some((1, 9)));
        assert_eq!(min_max::<f64>(&[]), None);
    }

    #[test]
    fn test_normalize() {
        let mut band = vec![2.0f64, 4.0, 6.0];
        normalize(&mut band);
        assert_eq!(band, vec![0.0, 0.5, 1.0]);

        let mut flat = vec![5.0f32; 3];
        normalize(&mut flat);
        assert_eq!(flat, vec![5.0; 3]);
    }

    #[test]
    fn test_byte_band_records_range() {
        let band = ByteBand::from_band(&[-2.5f32, 0.0, 7.5], Some("z_max"));
        assert_eq!(band.bytes, vec![0, 63, 255]);
        assert_eq!(band.metadata[BAND_NAME], "z_max");
        assert_eq!(band.metadata[INITIAL_MIN], "-2.5");
        assert_eq!(band.metadata[INITIAL_MAX], "7.5");
    }
}
