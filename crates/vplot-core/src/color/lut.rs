//! Lookup tables mapping scalars to colors.

use crate::error::PlotResult;

use super::{ColorInput, process_color};

/// A scalar-to-color lookup table.
///
/// Scalars are clamped to `range` and mapped linearly onto `colors`.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    colors: Vec<[f64; 4]>,
    range: [f64; 2],
    nan_color: [f64; 4],
}

impl Default for LookupTable {
    fn default() -> Self {
        Self::rainbow(256)
    }
}

impl LookupTable {
    /// Number of entries in the default tables.
    pub const DEFAULT_SIZE: usize = 256;

    /// Create a table from explicit RGBA entries.
    pub fn new(colors: Vec<[f64; 4]>) -> Self {
        Self {
            colors,
            range: [0.0, 1.0],
            nan_color: [0.5, 0.5, 0.5, 1.0],
        }
    }

    /// Blue at the bottom of the range, red at the top.
    pub fn rainbow(size: usize) -> Self {
        let size = size.max(2);
        let colors = (0..size)
            .map(|i| {
                let t = i as f64 / (size - 1) as f64;
                let [r, g, b] = hsv_to_rgb((1.0 - t) * 2.0 / 3.0, 1.0, 1.0);
                [r, g, b, 1.0]
            })
            .collect();
        Self::new(colors)
    }

    /// Black at the bottom of the range, white at the top.
    pub fn grayscale(size: usize) -> Self {
        let size = size.max(2);
        let colors = (0..size)
            .map(|i| {
                let v = i as f64 / (size - 1) as f64;
                [v, v, v, 1.0]
            })
            .collect();
        Self::new(colors)
    }

    /// Build a table from a list of colors, each resolved like a plot color.
    pub fn from_colors(colors: &[ColorInput]) -> PlotResult<Self> {
        let colors = colors
            .iter()
            .map(|c| {
                let spec = process_color(Some(c))?;
                let ([r, g, b], a) = spec.or([1.0, 1.0, 1.0], 1.0);
                Ok([r, g, b, a])
            })
            .collect::<PlotResult<Vec<_>>>()?;
        Ok(Self::new(colors))
    }

    pub fn colors(&self) -> &[[f64; 4]] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn set_range(&mut self, range: [f64; 2]) {
        self.range = range;
    }

    pub fn nan_color(&self) -> [f64; 4] {
        self.nan_color
    }

    pub fn set_nan_color(&mut self, color: [f64; 4]) {
        self.nan_color = color;
    }

    /// Map a scalar to an RGBA color.
    pub fn map(&self, value: f64) -> [f64; 4] {
        if value.is_nan() || self.colors.is_empty() {
            return self.nan_color;
        }
        let [lo, hi] = self.range;
        let t = if hi > lo {
            ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let index = (t * (self.colors.len() - 1) as f64).round() as usize;
        self.colors[index.min(self.colors.len() - 1)]
    }
}

/// HSV (all components in 0..1) to RGB.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [f64; 3] {
    let h = (h.rem_euclid(1.0)) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector as u8 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

/// The `[min, max]` of the finite values, ignoring NaN.
pub fn nan_range<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<[f64; 2]> {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, &v| match acc {
            None => Some([v, v]),
            Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rainbow_endpoints() {
        let mut lut = LookupTable::rainbow(256);
        lut.set_range([0.0, 10.0]);
        let close = |a: [f64; 4], b: [f64; 4]| a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9);
        assert!(close(lut.map(0.0), [0.0, 0.0, 1.0, 1.0]));
        assert!(close(lut.map(10.0), [1.0, 0.0, 0.0, 1.0]));
        assert_eq!(lut.map(100.0), lut.map(10.0));
    }

    #[test]
    fn test_nan_maps_to_nan_color() {
        let lut = LookupTable::grayscale(8);
        assert_eq!(lut.map(f64::NAN), lut.nan_color());
    }

    #[test]
    fn test_nan_range() {
        let values = [3.0, f64::NAN, -1.0, 2.0];
        assert_eq!(nan_range(&values), Some([-1.0, 3.0]));
        assert_eq!(nan_range(&[f64::NAN]), None);
    }

    #[test]
    fn test_from_colors() {
        let lut = LookupTable::from_colors(&["black".into(), [1.0, 1.0, 1.0, 0.5].into()]).unwrap();
        assert_eq!(lut.colors(), &[[0.0, 0.0, 0.0, 1.0], [1.0, 1.0, 1.0, 0.5]]);
    }
}
