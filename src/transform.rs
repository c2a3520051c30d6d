use std::fmt;

/// Affine transform between pixel (col, row) space and the UTM frame.
///
/// Coefficients follow the GDAL order:
/// `[origin_x, scale_x, 0, origin_y, 0, scale_y]`. Rotation terms are kept
/// at zero; `scale_y` is usually negative for north-up grids.
#[derive(Clone, Copy, PartialEq)]
pub struct GeoTransform([f64; 6]);

impl GeoTransform {
    pub const fn new(origin_x: f64, origin_y: f64, scale_x: f64, scale_y: f64) -> Self {
        GeoTransform([origin_x, scale_x, 0.0, origin_y, 0.0, scale_y])
    }

    /// Builds a transform from GDAL coefficients, dropping any rotation.
    pub fn from_coefficients(coefficients: [f64; 6]) -> Self {
        Self::new(coefficients[0], coefficients[3], coefficients[1], coefficients[5])
    }

    pub fn coefficients(&self) -> [f64; 6] {
        self.0
    }

    /// Upper left pixel position x
    pub fn origin_x(&self) -> f64 {
        self.0[0]
    }

    /// Upper left pixel position y
    pub fn origin_y(&self) -> f64 {
        self.0[3]
    }

    /// Pixel width, negative when the origin is on the right.
    pub fn scale_x(&self) -> f64 {
        self.0[1]
    }

    /// Pixel height, negative when the origin is at the top.
    pub fn scale_y(&self) -> f64 {
        self.0[5]
    }

    pub fn is_invertible(&self) -> bool {
        self.scale_x() != 0.0 && self.scale_y() != 0.0
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

impl fmt::Debug for GeoTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GeoTransform(origin: ({}, {}), scale: ({}, {}))",
            self.origin_x(),
            self.origin_y(),
            self.scale_x(),
            self.scale_y()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficient_layout() {
        let transform = GeoTransform::new(500_000.0, 4_800_000.0, 0.5, -0.5);
        assert_eq!(
            transform.coefficients(),
            [500_000.0, 0.5, 0.0, 4_800_000.0, 0.0, -0.5]
        );
        assert_eq!(transform.origin_y(), 4_800_000.0);
        assert_eq!(transform.scale_y(), -0.5);
    }

    #[test]
    fn test_rotation_is_dropped() {
        let transform = GeoTransform::from_coefficients([10.0, 2.0, 0.3, 20.0, 0.4, -2.0]);
        assert_eq!(transform.coefficients(), [10.0, 2.0, 0.0, 20.0, 0.0, -2.0]);
    }

    #[test]
    fn test_invertible() {
        assert!(GeoTransform::default().is_invertible());
        assert!(!GeoTransform::new(0.0, 0.0, 0.0, 1.0).is_invertible());
        assert!(!GeoTransform::new(0.0, 0.0, 1.0, 0.0).is_invertible());
    }
}
