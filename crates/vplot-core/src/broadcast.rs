//! Broadcasting of array-shaped plot arguments.
//!
//! A plot constructor that accepts arrays declares an element shape `S`
//! (usually the leading shape of its point argument) and produces
//! `prod(S)` plot objects. Every other array argument is then matched
//! against `S` with the same rules:
//!
//! - a scalar repeats for every element,
//! - an array of shape `S` gives one value per element,
//! - for row-valued arguments (points, vectors), shape `(*S, k)` gives one
//!   row per element and a single row of shape `(k,)` repeats,
//! - anything else is a shape error.

use glam::DVec3;
use ndarray::{ArrayD, IxDyn};

use crate::error::{PlotError, PlotResult};

/// A dense array argument, stored in logical (row-major) order.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayArg {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl ArrayArg {
    /// Build from a shape and row-major data.
    pub fn from_shape_vec(shape: Vec<usize>, data: Vec<f64>) -> PlotResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(PlotError::shape(
                "array data",
                &[data.len()],
                format!("{expected} values for shape {shape:?}"),
            ));
        }
        Ok(Self { shape, data })
    }

    pub(crate) fn from_parts(shape: Vec<usize>, data: Vec<f64>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());
        Self { shape, data }
    }

    /// A 0-d array.
    pub fn scalar(value: f64) -> Self {
        Self {
            shape: Vec::new(),
            data: vec![value],
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// The value of a 0-d or single-element array.
    pub fn as_scalar(&self) -> Option<f64> {
        match self.data.as_slice() {
            [v] => Some(*v),
            _ => None,
        }
    }

    /// Convert to an `ndarray` array.
    pub fn to_array(&self) -> ArrayD<f64> {
        ArrayD::from_shape_vec(IxDyn(&self.shape), self.data.clone())
            .unwrap_or_else(|_| ArrayD::zeros(IxDyn(&[0])))
    }

    /// Iterate the array as rows of its last axis, flattening all leading axes.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        let width = self.shape.last().copied().unwrap_or(1).max(1);
        self.data.chunks(width)
    }

    /// The leading shape of a point array `(*S, 3)`.
    pub fn points_shape(&self, what: &str) -> PlotResult<Vec<usize>> {
        match self.shape.split_last() {
            Some((3, lead)) => Ok(lead.to_vec()),
            _ => Err(PlotError::shape(what, &self.shape, "(..., 3)")),
        }
    }

    /// All rows of a point array `(*S, 3)` as vectors.
    pub fn to_points(&self, what: &str) -> PlotResult<Vec<DVec3>> {
        self.points_shape(what)?;
        Ok(self
            .data
            .chunks(3)
            .map(|p| DVec3::new(p[0], p[1], p[2]))
            .collect())
    }
}

impl From<f64> for ArrayArg {
    fn from(value: f64) -> Self {
        Self::scalar(value)
    }
}

impl From<[f64; 3]> for ArrayArg {
    fn from(p: [f64; 3]) -> Self {
        Self {
            shape: vec![3],
            data: p.to_vec(),
        }
    }
}

impl From<DVec3> for ArrayArg {
    fn from(p: DVec3) -> Self {
        p.to_array().into()
    }
}

impl From<Vec<f64>> for ArrayArg {
    fn from(values: Vec<f64>) -> Self {
        Self {
            shape: vec![values.len()],
            data: values,
        }
    }
}

impl From<&[[f64; 3]]> for ArrayArg {
    fn from(rows: &[[f64; 3]]) -> Self {
        Self {
            shape: vec![rows.len(), 3],
            data: rows.iter().flatten().copied().collect(),
        }
    }
}

impl From<Vec<[f64; 3]>> for ArrayArg {
    fn from(rows: Vec<[f64; 3]>) -> Self {
        rows.as_slice().into()
    }
}

impl<const N: usize> From<[[f64; 3]; N]> for ArrayArg {
    fn from(rows: [[f64; 3]; N]) -> Self {
        rows.as_slice().into()
    }
}

impl From<Vec<DVec3>> for ArrayArg {
    fn from(points: Vec<DVec3>) -> Self {
        Self {
            shape: vec![points.len(), 3],
            data: points.iter().flat_map(|p| p.to_array()).collect(),
        }
    }
}

impl<D: ndarray::Dimension> From<ndarray::Array<f64, D>> for ArrayArg {
    fn from(array: ndarray::Array<f64, D>) -> Self {
        Self {
            shape: array.shape().to_vec(),
            data: array.iter().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Repeat,
    Elements,
    Rows,
}

/// A lazy sequence of `prod(S)` elements drawn from an [`ArrayArg`].
///
/// Each item is a slice: one value for scalar arguments, one row for
/// row-valued arguments.
#[derive(Debug, Clone)]
pub struct Broadcast<'a> {
    data: &'a [f64],
    mode: Mode,
    width: usize,
    index: usize,
    len: usize,
}

impl<'a> Iterator for Broadcast<'a> {
    type Item = &'a [f64];

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.len {
            return None;
        }
        let i = self.index;
        self.index += 1;
        let start = match self.mode {
            Mode::Repeat => 0,
            Mode::Elements | Mode::Rows => i * self.width,
        };
        self.data.get(start..start + self.width)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Broadcast<'_> {}

/// Broadcast `x` against the element shape `shape`.
///
/// `row_width` is `Some(k)` for row-valued arguments such as points.
pub fn broadcast<'a>(
    x: &'a ArrayArg,
    shape: &[usize],
    row_width: Option<usize>,
    what: &str,
) -> PlotResult<Broadcast<'a>> {
    let len: usize = shape.iter().product();
    let make = |mode, width| Broadcast {
        data: &x.data,
        mode,
        width,
        index: 0,
        len,
    };

    match row_width {
        None if x.shape.is_empty() => Ok(make(Mode::Repeat, 1)),
        None if x.shape == shape => Ok(make(Mode::Elements, 1)),
        Some(k) if x.shape == [k] => Ok(make(Mode::Repeat, k)),
        Some(k) if x.shape.split_last() == Some((&k, shape)) => Ok(make(Mode::Rows, k)),
        None => Err(PlotError::shape(what, &x.shape, format!("() or {shape:?}"))),
        Some(k) => Err(PlotError::shape(
            what,
            &x.shape,
            format!("({k},) or {shape:?} + ({k},)"),
        )),
    }
}

/// Broadcast a scalar-valued argument.
pub fn broadcast_scalars<'a>(
    x: &'a ArrayArg,
    shape: &[usize],
    what: &str,
) -> PlotResult<impl ExactSizeIterator<Item = f64> + 'a> {
    Ok(broadcast(x, shape, None, what)?.map(|v| v[0]))
}

/// Broadcast a point- or vector-valued argument.
pub fn broadcast_points<'a>(
    x: &'a ArrayArg,
    shape: &[usize],
    what: &str,
) -> PlotResult<impl ExactSizeIterator<Item = DVec3> + 'a> {
    Ok(broadcast(x, shape, Some(3), what)?.map(|p| DVec3::new(p[0], p[1], p[2])))
}

/// Build one object per element of `shape`.
///
/// `make` receives the flat element index. Construction stops at the first
/// error.
pub fn broadcast_construct<T>(
    shape: &[usize],
    mut make: impl FnMut(usize) -> PlotResult<T>,
) -> PlotResult<Vec<T>> {
    let len: usize = shape.iter().product();
    (0..len).map(&mut make).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_scalar_repeats() {
        let x = ArrayArg::scalar(2.5);
        let values: Vec<f64> = broadcast_scalars(&x, &[2, 3], "radius").unwrap().collect();
        assert_eq!(values, vec![2.5; 6]);
    }

    #[test]
    fn test_matching_shape_flattens() {
        let x = ArrayArg::from_shape_vec(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let values: Vec<f64> = broadcast_scalars(&x, &[2, 2], "length").unwrap().collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_rows_rolled_into_flat_axis() {
        let x: ArrayArg = Array3::<f64>::zeros((2, 4, 3)).into();
        let rows = broadcast(&x, &[2, 4], Some(3), "points").unwrap();
        assert_eq!(rows.len(), 8);
        assert!(rows.clone().all(|r| r.len() == 3));
    }

    #[test]
    fn test_single_row_repeats() {
        let x: ArrayArg = [1.0, 2.0, 3.0].into();
        let points: Vec<DVec3> = broadcast_points(&x, &[3], "direction").unwrap().collect();
        assert_eq!(points, vec![DVec3::new(1.0, 2.0, 3.0); 3]);
    }

    #[test]
    fn test_wrong_shape_is_error() {
        let x = ArrayArg::from(vec![1.0, 2.0]);
        assert!(matches!(
            broadcast(&x, &[3], None, "length"),
            Err(PlotError::ShapeMismatch { .. })
        ));
        let p = ArrayArg::from(vec![[0.0; 3]; 2]);
        assert!(broadcast(&p, &[3], Some(3), "points").is_err());
    }

    #[test]
    fn test_rows_are_permutation_of_input() {
        let input = vec![[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]];
        let x = ArrayArg::from(input.clone());
        let mut seen: Vec<[f64; 3]> = broadcast_points(&x, &[3], "points")
            .unwrap()
            .map(|p| p.to_array())
            .collect();
        let mut expected = input;
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_points_shape() {
        let x: ArrayArg = Array3::<f64>::zeros((5, 2, 3)).into();
        assert_eq!(x.points_shape("points").unwrap(), vec![5, 2]);
        let single: ArrayArg = [0.0, 0.0, 1.0].into();
        assert_eq!(single.points_shape("points").unwrap(), Vec::<usize>::new());
        assert!(ArrayArg::scalar(1.0).points_shape("points").is_err());
    }

    #[test]
    fn test_broadcast_construct_counts() {
        let built = broadcast_construct(&[2, 3], |i| Ok(i * 2)).unwrap();
        assert_eq!(built, vec![0, 2, 4, 6, 8, 10]);
        let empty = broadcast_construct(&[], |i| Ok(i)).unwrap();
        assert_eq!(empty, vec![0]);
    }
}
