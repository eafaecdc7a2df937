//! Color resolution.
//!
//! Turns the many ways a caller can spell a color (a name, an RGB or RGBA
//! tuple, a list of names, an array of rows) into RGB + alpha values.
//! Components are not clipped.

mod lut;
mod table;

pub use lut::*;
pub use table::{lookup as lookup_name, names as color_names, normalize_name, parse_hex};

use ndarray::{ArrayD, IxDyn};

use crate::error::{PlotError, PlotResult};

/// A color argument as passed to a plot constructor.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorInput {
    /// A name from the color table, e.g. `"red"` or `"tab:blue"`.
    Named(String),
    Rgb([f64; 3]),
    Rgba([f64; 4]),
    /// One name per broadcast element.
    Names(Vec<String>),
    /// An array whose last axis has length 3 or 4.
    Array(ArrayD<f64>),
}

impl From<&str> for ColorInput {
    fn from(name: &str) -> Self {
        ColorInput::Named(name.to_string())
    }
}

impl From<String> for ColorInput {
    fn from(name: String) -> Self {
        ColorInput::Named(name)
    }
}

impl From<[f64; 3]> for ColorInput {
    fn from(rgb: [f64; 3]) -> Self {
        ColorInput::Rgb(rgb)
    }
}

impl From<[f64; 4]> for ColorInput {
    fn from(rgba: [f64; 4]) -> Self {
        ColorInput::Rgba(rgba)
    }
}

impl From<(f64, f64, f64)> for ColorInput {
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        ColorInput::Rgb([r, g, b])
    }
}

impl From<(f64, f64, f64, f64)> for ColorInput {
    fn from((r, g, b, a): (f64, f64, f64, f64)) -> Self {
        ColorInput::Rgba([r, g, b, a])
    }
}

impl From<Vec<&str>> for ColorInput {
    fn from(names: Vec<&str>) -> Self {
        ColorInput::Names(names.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<[f64; 3]>> for ColorInput {
    fn from(rows: Vec<[f64; 3]>) -> Self {
        let n = rows.len();
        let data = rows.into_iter().flatten().collect();
        // n x 3 always matches its data length
        let array = ArrayD::from_shape_vec(IxDyn(&[n, 3]), data)
            .unwrap_or_else(|_| ArrayD::zeros(IxDyn(&[0, 3])));
        ColorInput::Array(array)
    }
}

impl From<ArrayD<f64>> for ColorInput {
    fn from(array: ArrayD<f64>) -> Self {
        ColorInput::Array(array)
    }
}

impl From<ndarray::Array2<f64>> for ColorInput {
    fn from(array: ndarray::Array2<f64>) -> Self {
        ColorInput::Array(array.into_dyn())
    }
}

/// The result of resolving a color: RGB and alpha, either of which may be unset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorSpec {
    pub rgb: Option<[f64; 3]>,
    pub alpha: Option<f64>,
}

impl ColorSpec {
    pub fn new(rgb: Option<[f64; 3]>, alpha: Option<f64>) -> Self {
        Self { rgb, alpha }
    }

    /// Override the alpha with an explicit opacity, if one was given.
    pub fn with_opacity(mut self, opacity: Option<f64>) -> Self {
        if opacity.is_some() {
            self.alpha = opacity;
        }
        self
    }

    /// Fill unset parts with defaults.
    pub fn or(self, rgb: [f64; 3], alpha: f64) -> ([f64; 3], f64) {
        (self.rgb.unwrap_or(rgb), self.alpha.unwrap_or(alpha))
    }
}

/// Resolve a color name.
pub fn from_name(name: &str) -> PlotResult<[f64; 3]> {
    table::lookup(name).ok_or_else(|| PlotError::UnknownColor(name.to_string()))
}

fn from_components(values: &[f64]) -> PlotResult<ColorSpec> {
    match values {
        [r, g, b] => Ok(ColorSpec::new(Some([*r, *g, *b]), None)),
        [r, g, b, a] => Ok(ColorSpec::new(Some([*r, *g, *b]), Some(*a))),
        _ => Err(PlotError::shape("color", &[values.len()], "(3,) or (4,)")),
    }
}

/// Resolve a single color.
///
/// `None` resolves to an unset [`ColorSpec`]. Arrays must be 1-D of length 3
/// or 4; per-element inputs go through [`broadcast_colors`].
pub fn process_color(color: Option<&ColorInput>) -> PlotResult<ColorSpec> {
    let Some(color) = color else {
        return Ok(ColorSpec::default());
    };

    match color {
        ColorInput::Named(name) => Ok(ColorSpec::new(Some(from_name(name)?), None)),
        ColorInput::Rgb(rgb) => Ok(ColorSpec::new(Some(*rgb), None)),
        ColorInput::Rgba([r, g, b, a]) => Ok(ColorSpec::new(Some([*r, *g, *b]), Some(*a))),
        ColorInput::Names(names) => match names.as_slice() {
            [name] => Ok(ColorSpec::new(Some(from_name(name)?), None)),
            _ => Err(PlotError::shape("color names", &[names.len()], "a single name")),
        },
        ColorInput::Array(array) => {
            if array.ndim() != 1 {
                return Err(PlotError::shape("color", array.shape(), "(3,) or (4,)"));
            }
            let values: Vec<f64> = array.iter().copied().collect();
            from_components(&values)
        }
    }
}

/// Resolve a color together with an explicit opacity.
pub fn process_color_opacity(
    color: Option<&ColorInput>,
    opacity: Option<f64>,
) -> PlotResult<ColorSpec> {
    Ok(process_color(color)?.with_opacity(opacity))
}

/// Resolve a color argument for `prod(shape)` elements.
///
/// Single colors repeat. A list of names must have one name per element.
/// An array of shape `(*shape, 3|4)` gives one color per element.
pub fn broadcast_colors(color: Option<&ColorInput>, shape: &[usize]) -> PlotResult<Vec<ColorSpec>> {
    let count: usize = shape.iter().product();

    match color {
        Some(ColorInput::Names(names)) if names.len() != 1 || count == 1 => {
            if names.len() != count {
                return Err(PlotError::shape(
                    "color names",
                    &[names.len()],
                    format!("{count} names"),
                ));
            }
            names
                .iter()
                .map(|name| Ok(ColorSpec::new(Some(from_name(name)?), None)))
                .collect()
        }
        Some(ColorInput::Array(array)) if array.ndim() > 1 => {
            let (lead, last) = array.shape().split_at(array.ndim() - 1);
            if lead != shape || !matches!(last, [3] | [4]) {
                return Err(PlotError::shape(
                    "color",
                    array.shape(),
                    format!("(3,), (4,), {:?} + (3,) or {:?} + (4,)", shape, shape),
                ));
            }
            let width = last[0];
            let flat: Vec<f64> = array.iter().copied().collect();
            flat.chunks(width).map(from_components).collect()
        }
        other => {
            let single = process_color(other)?;
            Ok(vec![single; count])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_process_named_color() {
        let spec = process_color(Some(&"red".into())).unwrap();
        assert_eq!(spec.rgb, Some([1.0, 0.0, 0.0]));
        assert_eq!(spec.alpha, None);
    }

    #[test]
    fn test_rgba_splits_alpha() {
        let spec = process_color(Some(&[0.1, 0.2, 0.3, 0.4].into())).unwrap();
        assert_eq!(spec.rgb, Some([0.1, 0.2, 0.3]));
        assert_relative_eq!(spec.alpha.unwrap(), 0.4);
    }

    #[test]
    fn test_none_is_unset() {
        assert_eq!(process_color(None).unwrap(), ColorSpec::default());
    }

    #[test]
    fn test_unknown_color() {
        let err = process_color(Some(&"not a color".into())).unwrap_err();
        assert!(matches!(err, PlotError::UnknownColor(_)));
    }

    #[test]
    fn test_explicit_opacity_overrides_alpha() {
        let spec = process_color_opacity(Some(&[1.0, 1.0, 1.0, 0.2].into()), Some(0.7)).unwrap();
        assert_eq!(spec.alpha, Some(0.7));
        let spec = process_color_opacity(Some(&[1.0, 1.0, 1.0, 0.2].into()), None).unwrap();
        assert_eq!(spec.alpha, Some(0.2));
    }

    #[test]
    fn test_out_of_range_not_clipped() {
        let spec = process_color(Some(&[2.0, -1.0, 0.5].into())).unwrap();
        assert_eq!(spec.rgb, Some([2.0, -1.0, 0.5]));
    }

    #[test]
    fn test_broadcast_single_color() {
        let colors = broadcast_colors(Some(&"blue".into()), &[2, 3]).unwrap();
        assert_eq!(colors.len(), 6);
        assert!(colors.iter().all(|c| c.rgb == Some([0.0, 0.0, 1.0])));
    }

    #[test]
    fn test_broadcast_per_element_rows() {
        let color = ColorInput::from(vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let colors = broadcast_colors(Some(&color), &[2]).unwrap();
        assert_eq!(colors[0].rgb, Some([1.0, 0.0, 0.0]));
        assert_eq!(colors[1].rgb, Some([0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_broadcast_rejects_wrong_leading_shape() {
        let color = ColorInput::from(vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let err = broadcast_colors(Some(&color), &[3]).unwrap_err();
        assert!(matches!(err, PlotError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_broadcast_names() {
        let color = ColorInput::from(vec!["red", "green", "blue"]);
        let colors = broadcast_colors(Some(&color), &[3]).unwrap();
        assert_eq!(colors[2].rgb, Some([0.0, 0.0, 1.0]));
        assert!(broadcast_colors(Some(&color), &[2]).is_err());
    }

    #[test]
    fn test_rgb_finite_in_unit_range() {
        for name in color_names() {
            let rgb = from_name(name).unwrap();
            assert!(rgb.iter().all(|c| (0.0..=1.0).contains(c)), "{name}");
        }
    }
}
