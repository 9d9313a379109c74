use serde::{Deserialize, Serialize};

/// One grid cell address. `x` grows east, `y` grows south (image order).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A position on the floor-plan raster, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &PixelPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Total polyline length of a pixel path.
pub fn path_length(path: &[PixelPoint]) -> f64 {
    path.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_length_sums_segments() {
        let p = [PixelPoint::new(0.0, 0.0), PixelPoint::new(3.0, 4.0), PixelPoint::new(3.0, 10.0)];
        assert!((path_length(&p) - 11.0).abs() < 1e-9);
        assert_eq!(path_length(&p[..1]), 0.0);
        assert_eq!(path_length(&[]), 0.0);
    }

    #[test]
    fn grid_coord_serializes_as_object() {
        let v = serde_json::to_value(GridCoord::new(3, 4)).unwrap();
        assert_eq!(v["x"], 3);
        assert_eq!(v["y"], 4);
    }
}
