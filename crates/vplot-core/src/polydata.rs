//! Explicit vertex + cell geometry.

use glam::DVec3;

use crate::error::{PlotError, PlotResult};
use crate::geometry::BoundingBox;

/// A list of cells in the flat `(n, id0, .., id_{n-1}, n, ..)` layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellArray {
    data: Vec<usize>,
    count: usize,
}

impl CellArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list of cells.
    pub fn from_cells<'a>(cells: impl IntoIterator<Item = &'a [usize]>) -> Self {
        let mut array = Self::new();
        for cell in cells {
            array.push_cell(cell);
        }
        array
    }

    /// Build from the raw flat layout, checking that it is well formed.
    pub fn from_raw(data: Vec<usize>) -> PlotResult<Self> {
        let malformed = || {
            PlotError::shape(
                "cell array",
                &[data.len()],
                "a sequence of (n, id0, .., id_{n-1}) records",
            )
        };
        let mut count = 0;
        let mut i = 0usize;
        while i < data.len() {
            i = data[i]
                .checked_add(1)
                .and_then(|n| i.checked_add(n))
                .ok_or_else(malformed)?;
            count += 1;
        }
        if i != data.len() {
            return Err(malformed());
        }
        Ok(Self { data, count })
    }

    pub fn push_cell(&mut self, ids: &[usize]) {
        self.data.push(ids.len());
        self.data.extend_from_slice(ids);
        self.count += 1;
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The flat connectivity data.
    pub fn raw(&self) -> &[usize] {
        &self.data
    }

    /// Iterate the cells as index slices.
    pub fn iter(&self) -> CellIter<'_> {
        CellIter {
            data: &self.data,
            pos: 0,
        }
    }

    /// Largest referenced index, if any.
    pub fn max_index(&self) -> Option<usize> {
        self.iter().flat_map(|c| c.iter().copied()).max()
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.count = 0;
    }
}

/// Iterator over the cells of a [`CellArray`].
pub struct CellIter<'a> {
    data: &'a [usize],
    pos: usize,
}

impl<'a> Iterator for CellIter<'a> {
    type Item = &'a [usize];

    fn next(&mut self) -> Option<Self::Item> {
        let n = *self.data.get(self.pos)?;
        let cell = self.data.get(self.pos + 1..self.pos + 1 + n)?;
        self.pos += n + 1;
        Some(cell)
    }
}

/// Per-vertex data attached to a [`PolyData`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PointData {
    #[default]
    None,
    /// One scalar per vertex, colored through a lookup table.
    Scalars(Vec<f64>),
    /// One RGBA color per vertex, used directly.
    Colors(Vec<[f64; 4]>),
}

/// Vertices plus up to three cell lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyData {
    pub points: Vec<DVec3>,
    pub point_data: PointData,
    pub verts: CellArray,
    pub lines: CellArray,
    pub polys: CellArray,
}

impl PolyData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_points(points: Vec<DVec3>) -> Self {
        Self {
            points,
            ..Default::default()
        }
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_cells(&self) -> usize {
        self.verts.len() + self.lines.len() + self.polys.len()
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points)
    }

    /// Attach per-vertex scalars.
    pub fn set_scalars(&mut self, scalars: Vec<f64>) -> PlotResult<()> {
        if scalars.len() != self.points.len() {
            return Err(PlotError::shape(
                "scalars",
                &[scalars.len()],
                format!("({},)", self.points.len()),
            ));
        }
        self.point_data = PointData::Scalars(scalars);
        Ok(())
    }

    /// Attach per-vertex RGBA colors.
    pub fn set_colors(&mut self, colors: Vec<[f64; 4]>) -> PlotResult<()> {
        if colors.len() != self.points.len() {
            return Err(PlotError::shape(
                "colors",
                &[colors.len()],
                format!("({}, 4)", self.points.len()),
            ));
        }
        self.point_data = PointData::Colors(colors);
        Ok(())
    }

    /// Check that every cell index is within the vertex list.
    pub fn validate(&self) -> PlotResult<()> {
        for (name, cells) in [
            ("verts", &self.verts),
            ("lines", &self.lines),
            ("polys", &self.polys),
        ] {
            if let Some(max) = cells.max_index()
                && max >= self.points.len()
            {
                return Err(PlotError::shape(
                    name,
                    &[max],
                    format!("indices below {}", self.points.len()),
                ));
            }
        }
        Ok(())
    }

    /// Append another polydata, offsetting its indices.
    pub fn append(&mut self, other: &PolyData) {
        let offset = self.points.len();
        self.points.extend_from_slice(&other.points);
        for (dst, src) in [
            (&mut self.verts, &other.verts),
            (&mut self.lines, &other.lines),
            (&mut self.polys, &other.polys),
        ] {
            for cell in src.iter() {
                let shifted: Vec<usize> = cell.iter().map(|i| i + offset).collect();
                dst.push_cell(&shifted);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_array_layout() {
        let cells = CellArray::from_cells([&[0usize, 1, 2][..], &[2, 3][..]]);
        assert_eq!(cells.raw(), &[3, 0, 1, 2, 2, 2, 3]);
        assert_eq!(cells.len(), 2);
        let collected: Vec<&[usize]> = cells.iter().collect();
        assert_eq!(collected, vec![&[0, 1, 2][..], &[2, 3][..]]);
    }

    #[test]
    fn test_from_raw_rejects_truncated() {
        assert!(CellArray::from_raw(vec![3, 0, 1]).is_err());
        assert_eq!(CellArray::from_raw(vec![1, 4, 2, 0, 1]).unwrap().len(), 2);
    }

    #[test]
    fn test_from_raw_rejects_huge_counts() {
        assert!(CellArray::from_raw(vec![usize::MAX, 0]).is_err());
        assert!(CellArray::from_raw(vec![1, 0, usize::MAX - 1]).is_err());
        let cells = CellArray::from_raw(vec![2, 0, 1, 1, 3]).unwrap();
        assert_eq!(cells.len(), 2);
    }

    #[test]
    fn test_validate_indices() {
        let mut pd = PolyData::with_points(vec![DVec3::ZERO, DVec3::X]);
        pd.lines.push_cell(&[0, 1]);
        assert!(pd.validate().is_ok());
        pd.polys.push_cell(&[0, 1, 2]);
        assert!(pd.validate().is_err());
    }

    #[test]
    fn test_append_offsets() {
        let mut a = PolyData::with_points(vec![DVec3::ZERO, DVec3::X]);
        a.lines.push_cell(&[0, 1]);
        let b = a.clone();
        a.append(&b);
        assert_eq!(a.num_points(), 4);
        assert_eq!(a.lines.raw(), &[2, 0, 1, 2, 2, 3]);
    }

    #[test]
    fn test_scalar_length_checked() {
        let mut pd = PolyData::with_points(vec![DVec3::ZERO]);
        assert!(pd.set_scalars(vec![1.0, 2.0]).is_err());
        assert!(pd.set_scalars(vec![1.0]).is_ok());
    }
}
