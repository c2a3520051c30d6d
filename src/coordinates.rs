use crate::error::{RasterError, Result};
use crate::metadata::CustomOrigin;
use crate::transform::GeoTransform;

/// A 2-D position in pixel, UTM or custom coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Conversions between the pixel, UTM and custom frames of one grid.
///
/// The custom frame is the UTM frame translated by `-origin` on x and y;
/// the z component of the origin is carried but never used for indexing.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    transform: GeoTransform,
    origin: CustomOrigin,
    width: usize,
    height: usize,
}

impl CoordinateMapper {
    pub fn new(transform: GeoTransform, origin: CustomOrigin, width: usize, height: usize) -> Self {
        Self {
            transform,
            origin,
            width,
            height,
        }
    }

    pub fn pixel_to_utm(&self, col: f64, row: f64) -> Point {
        Point::new(
            col * self.transform.scale_x() + self.transform.origin_x(),
            row * self.transform.scale_y() + self.transform.origin_y(),
        )
    }

    pub fn utm_to_pixel(&self, x: f64, y: f64) -> Result<Point> {
        if !self.transform.is_invertible() {
            return Err(RasterError::DegenerateTransform {
                scale_x: self.transform.scale_x(),
                scale_y: self.transform.scale_y(),
            });
        }
        Ok(Point::new(
            (x - self.transform.origin_x()) / self.transform.scale_x(),
            (y - self.transform.origin_y()) / self.transform.scale_y(),
        ))
    }

    pub fn pixel_to_custom(&self, col: f64, row: f64) -> Point {
        let utm = self.pixel_to_utm(col, row);
        self.utm_to_custom(utm.x, utm.y)
    }

    pub fn custom_to_pixel(&self, x: f64, y: f64) -> Result<Point> {
        let utm = self.custom_to_utm(x, y);
        self.utm_to_pixel(utm.x, utm.y)
    }

    pub fn custom_to_utm(&self, x: f64, y: f64) -> Point {
        Point::new(x + self.origin.x, y + self.origin.y)
    }

    pub fn utm_to_custom(&self, x: f64, y: f64) -> Point {
        Point::new(x - self.origin.x, y - self.origin.y)
    }

    /// Linear index of the pixel nearest to `(col, row)`.
    ///
    /// Fractional coordinates are rounded half away from zero. Returns `None`
    /// when the rounded position falls outside the grid.
    pub fn index_of(&self, col: f64, row: f64) -> Option<usize> {
        let (col, row) = (col.round(), row.round());
        // NaN fails both comparisons as well
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        if col >= self.width as f64 || row >= self.height as f64 {
            return None;
        }
        self.index_of_cell(col as usize, row as usize)
    }

    pub fn index_of_cell(&self, col: usize, row: usize) -> Option<usize> {
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(col + row * self.width)
    }

    pub fn index_of_utm(&self, x: f64, y: f64) -> Option<usize> {
        let pixel = self.utm_to_pixel(x, y).ok()?;
        self.index_of(pixel.x, pixel.y)
    }

    pub fn index_of_custom(&self, x: f64, y: f64) -> Option<usize> {
        let pixel = self.custom_to_pixel(x, y).ok()?;
        self.index_of(pixel.x, pixel.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(
            GeoTransform::new(377_000.0, 4_826_000.0, 0.5, -0.5),
            CustomOrigin::new(377_100.0, 4_825_900.0, 150.0),
            40,
            30,
        )
    }

    fn assert_close(actual: Point, expected: Point) {
        assert!(
            (actual.x - expected.x).abs() < EPS && (actual.y - expected.y).abs() < EPS,
            "{:?} != {:?}",
            actual,
            expected
        );
    }

    #[test]
    fn test_pixel_to_utm() {
        let m = mapper();
        assert_close(m.pixel_to_utm(0.0, 0.0), Point::new(377_000.0, 4_826_000.0));
        assert_close(m.pixel_to_utm(10.0, 4.0), Point::new(377_005.0, 4_825_998.0));
    }

    #[test]
    fn test_utm_round_trip() {
        let m = mapper();
        for row in 0..30 {
            for col in 0..40 {
                let utm = m.pixel_to_utm(col as f64, row as f64);
                let pixel = m.utm_to_pixel(utm.x, utm.y).unwrap();
                assert_close(pixel, Point::new(col as f64, row as f64));
            }
        }
    }

    #[test]
    fn test_custom_round_trip() {
        let m = mapper();
        for (col, row) in [(0.0, 0.0), (3.0, 17.0), (39.0, 29.0), (12.5, 7.25)] {
            let custom = m.pixel_to_custom(col, row);
            let pixel = m.custom_to_pixel(custom.x, custom.y).unwrap();
            assert_close(pixel, Point::new(col, row));
        }
    }

    #[test]
    fn test_custom_frame_is_a_translation() {
        let m = mapper();
        assert_close(m.pixel_to_custom(0.0, 0.0), Point::new(-100.0, 100.0));
        assert_close(m.custom_to_utm(1.0, 2.0), Point::new(377_101.0, 4_825_902.0));
        assert_close(m.utm_to_custom(377_101.0, 4_825_902.0), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_degenerate_transform() {
        let m = CoordinateMapper::new(
            GeoTransform::new(0.0, 0.0, 1.0, 0.0),
            CustomOrigin::default(),
            4,
            4,
        );
        assert!(matches!(
            m.utm_to_pixel(1.0, 1.0),
            Err(RasterError::DegenerateTransform { .. })
        ));
        assert_eq!(m.index_of_utm(1.0, 1.0), None);
    }

    #[test]
    fn test_index_rounding() {
        let m = mapper();
        assert_eq!(m.index_of(0.0, 0.0), Some(0));
        assert_eq!(m.index_of(2.5, 0.0), Some(3));
        assert_eq!(m.index_of(2.49, 1.0), Some(42));
        assert_eq!(m.index_of(-0.4, 0.0), Some(0));
        assert_eq!(m.index_of(39.0, 29.0), Some(39 + 29 * 40));
    }

    #[test]
    fn test_index_out_of_bounds() {
        let m = mapper();
        assert_eq!(m.index_of(40.0, 0.0), None);
        assert_eq!(m.index_of(0.0, 30.0), None);
        assert_eq!(m.index_of(39.5, 0.0), None);
        assert_eq!(m.index_of(-0.5, 0.0), None);
        assert_eq!(m.index_of(f64::NAN, 0.0), None);
        assert_eq!(m.index_of_cell(40, 0), None);
    }

    #[test]
    fn test_index_of_utm_and_custom() {
        let m = mapper();
        assert_eq!(m.index_of_utm(377_005.0, 4_825_998.0), Some(10 + 4 * 40));
        assert_eq!(m.index_of_custom(-95.0, 98.0), Some(10 + 4 * 40));
        assert_eq!(m.index_of_utm(376_000.0, 4_825_998.0), None);
    }
}
