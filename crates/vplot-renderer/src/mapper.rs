//! Mapper: turns source output or explicit polydata into drawable geometry.

use std::borrow::Cow;
use std::sync::Arc;

use parking_lot::RwLock;
use vplot_core::{BoundingBox, LookupTable, PointData, PolyData};

use crate::source::Source;

/// Lookup table shared between a mapper and any scalar bar showing it
pub type SharedLookupTable = Arc<RwLock<LookupTable>>;

pub fn shared_lookup_table(table: LookupTable) -> SharedLookupTable {
    Arc::new(RwLock::new(table))
}

/// Where a mapper gets its geometry from
#[derive(Debug, Clone, PartialEq)]
pub enum MapperInput {
    Source(Source),
    PolyData(PolyData),
}

/// Geometry plus the rules for coloring it
#[derive(Debug, Clone)]
pub struct Mapper {
    input: MapperInput,
    lookup_table: SharedLookupTable,
    /// Color by point scalars/colors when present instead of the actor color
    pub scalar_visibility: bool,
}

impl Mapper {
    pub fn new(input: MapperInput) -> Self {
        Self {
            input,
            lookup_table: shared_lookup_table(LookupTable::default()),
            scalar_visibility: true,
        }
    }

    pub fn from_source(source: Source) -> Self {
        Self::new(MapperInput::Source(source))
    }

    pub fn from_polydata(polydata: PolyData) -> Self {
        Self::new(MapperInput::PolyData(polydata))
    }

    pub fn input(&self) -> &MapperInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut MapperInput {
        &mut self.input
    }

    pub fn source(&self) -> Option<&Source> {
        match &self.input {
            MapperInput::Source(s) => Some(s),
            MapperInput::PolyData(_) => None,
        }
    }

    pub fn source_mut(&mut self) -> Option<&mut Source> {
        match &mut self.input {
            MapperInput::Source(s) => Some(s),
            MapperInput::PolyData(_) => None,
        }
    }

    pub fn polydata(&self) -> Option<&PolyData> {
        match &self.input {
            MapperInput::PolyData(p) => Some(p),
            MapperInput::Source(_) => None,
        }
    }

    pub fn polydata_mut(&mut self) -> Option<&mut PolyData> {
        match &mut self.input {
            MapperInput::PolyData(p) => Some(p),
            MapperInput::Source(_) => None,
        }
    }

    /// The geometry to draw, generated on demand for sources.
    pub fn output(&self) -> Cow<'_, PolyData> {
        match &self.input {
            MapperInput::Source(s) => Cow::Owned(s.output()),
            MapperInput::PolyData(p) => Cow::Borrowed(p),
        }
    }

    /// Model-space bounds of the output
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.output().bounds()
    }

    pub fn lookup_table(&self) -> &SharedLookupTable {
        &self.lookup_table
    }

    pub fn set_lookup_table(&mut self, table: SharedLookupTable) {
        self.lookup_table = table;
    }

    pub fn scalar_range(&self) -> [f64; 2] {
        self.lookup_table.read().range()
    }

    pub fn set_scalar_range(&self, range: [f64; 2]) {
        self.lookup_table.write().set_range(range);
    }

    /// Whether point data will color the output
    pub fn uses_scalars(&self, output: &PolyData) -> bool {
        self.scalar_visibility && !matches!(output.point_data, PointData::None)
    }

    /// Per-point RGBA colors, or `None` when the actor color applies.
    pub fn point_colors(&self, output: &PolyData) -> Option<Vec<[f64; 4]>> {
        if !self.scalar_visibility {
            return None;
        }
        match &output.point_data {
            PointData::None => None,
            PointData::Colors(colors) => Some(colors.clone()),
            PointData::Scalars(scalars) => {
                let table = self.lookup_table.read();
                Some(scalars.iter().map(|&s| table.map(s)).collect())
            }
        }
    }
}
