//! Pairs per-feature triangles with the attribute table and encodes a tile

use super::attributes::{aggregate_attributes, AggregationOptions, AttributeTable};
use super::encoder::TileEncoder;
use super::error::ContentResult;
use super::record::{GeometryRecord, ShaderColors, Triangle};
use super::style::TileStyle;

/// Geometry to triangles, optionally relative to a recentring point.
///
/// Implemented for closures with the matching signature.
pub trait Triangulator<G> {
    fn triangulate(
        &self,
        geometry: &G,
        batch_id: u32,
        shader: Option<&ShaderColors>,
        center: Option<[f64; 3]>,
    ) -> ContentResult<Vec<Triangle>>;
}

impl<G, F> Triangulator<G> for F
where
    F: Fn(&G, u32, Option<&ShaderColors>, Option<[f64; 3]>) -> ContentResult<Vec<Triangle>>,
{
    fn triangulate(
        &self,
        geometry: &G,
        batch_id: u32,
        shader: Option<&ShaderColors>,
        center: Option<[f64; 3]>,
    ) -> ContentResult<Vec<Triangle>> {
        self(geometry, batch_id, shader, center)
    }
}

impl<G> GeometryRecord<G> {
    /// This record's triangles
    pub fn triangles<T: Triangulator<G> + ?Sized>(
        &self,
        triangulator: &T,
        center: Option<[f64; 3]>,
    ) -> ContentResult<Vec<Triangle>> {
        triangulator.triangulate(&self.geometry, self.batch_id, self.shader.as_ref(), center)
    }
}

/// Stateless tile content pipeline: triangulate, aggregate, encode.
#[derive(Debug, Clone, Default)]
pub struct TileContentAssembler<T, E> {
    triangulator: T,
    encoder: E,
    aggregation: AggregationOptions,
}

impl<T, E: TileEncoder> TileContentAssembler<T, E> {
    pub fn new(triangulator: T, encoder: E) -> Self {
        Self {
            triangulator,
            encoder,
            aggregation: AggregationOptions::default(),
        }
    }

    pub fn with_aggregation(mut self, aggregation: AggregationOptions) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// One triangle group per record, in record order
    pub fn triangle_groups<G>(
        &self,
        records: &[GeometryRecord<G>],
        center: Option<[f64; 3]>,
    ) -> ContentResult<Vec<Vec<Triangle>>>
    where
        T: Triangulator<G>,
    {
        records
            .iter()
            .map(|r| r.triangles(&self.triangulator, center))
            .collect()
    }

    pub fn attributes<G>(&self, records: &[GeometryRecord<G>]) -> ContentResult<AttributeTable> {
        aggregate_attributes(records, &self.aggregation)
    }

    /// Encode `records` into one tile payload. The encoder's bytes are
    /// returned unmodified; an empty record list is passed through as-is.
    pub fn assemble<G>(
        &self,
        records: &[GeometryRecord<G>],
        center: Option<[f64; 3]>,
        style: &TileStyle,
    ) -> ContentResult<Vec<u8>>
    where
        T: Triangulator<G>,
    {
        let triangles = self.triangle_groups(records, center)?;
        let attributes = self.attributes(records)?;
        log::debug!(
            "assembling tile: {} records, {} triangles, {} attribute columns",
            records.len(),
            triangles.iter().map(Vec::len).sum::<usize>(),
            attributes.len()
        );
        self.encoder.encode(&attributes, &triangles, style)
    }
}

/// Borrowed triangulator, so [`to_tile`] can run through an assembler
struct ByRef<'a, T: ?Sized>(&'a T);

impl<G, T: Triangulator<G> + ?Sized> Triangulator<G> for ByRef<'_, T> {
    fn triangulate(
        &self,
        geometry: &G,
        batch_id: u32,
        shader: Option<&ShaderColors>,
        center: Option<[f64; 3]>,
    ) -> ContentResult<Vec<Triangle>> {
        self.0.triangulate(geometry, batch_id, shader, center)
    }
}

/// One-shot form of [`TileContentAssembler::assemble`] with the default
/// aggregation policy.
pub fn to_tile<G, T, E>(
    records: &[GeometryRecord<G>],
    center: Option<[f64; 3]>,
    style: &TileStyle,
    triangulator: &T,
    encoder: &E,
) -> ContentResult<Vec<u8>>
where
    T: Triangulator<G> + ?Sized,
    E: TileEncoder + ?Sized,
{
    TileContentAssembler::new(ByRef(triangulator), encoder).assemble(records, center, style)
}
