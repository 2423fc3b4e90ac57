//! Clip-and-project over many features at once.
//!
//! Each polygon is independent, so the parallel variants spread them over
//! rayon's global pool. Workers share the projection and the clip box by
//! reference and keep their own [`ClipEngine`] scratch buffers. Output order
//! always matches input order, with dropped polygons removed.

use log::debug;
use rayon::prelude::*;

use crate::bbox::BoundingBox;
use crate::clip::{ClipEngine, ClipVertex};
use crate::coord::{Coordinate, Point};
use crate::proj::Projection;
use crate::transform::TransformMatrix;

/// Clip every polygon to `bbox`. Polygons that vanish are dropped.
pub fn clip_polygons<V: ClipVertex>(bbox: &BoundingBox, polygons: &[Vec<V>]) -> Vec<Vec<V>> {
    let mut engine = ClipEngine::new();
    let clipped: Vec<Vec<V>> = polygons
        .iter()
        .filter_map(|poly| engine.clip(bbox, poly).map(<[V]>::to_vec))
        .collect();
    debug!("clipped {} of {} polygons", clipped.len(), polygons.len());
    clipped
}

pub fn clip_polygons_par<V>(bbox: &BoundingBox, polygons: &[Vec<V>]) -> Vec<Vec<V>>
where
    V: ClipVertex + Send + Sync,
{
    let clipped: Vec<Vec<V>> = polygons
        .par_iter()
        .map_init(ClipEngine::new, |engine, poly| {
            engine.clip(bbox, poly).map(<[V]>::to_vec)
        })
        .flatten()
        .collect();
    debug!("clipped {} of {} polygons", clipped.len(), polygons.len());
    clipped
}

fn project_one(
    engine: &mut ClipEngine<Coordinate>,
    projection: &Projection,
    polygon: &[Coordinate],
) -> Option<Vec<Point>> {
    let clipped = engine.clip(projection.larger_bounding_box(), polygon)?;
    Some(clipped.iter().map(|&c| projection.point(c)).collect())
}

/// Clip geographic polygons to the projection's padded area and convert the
/// survivors to pixels.
pub fn project_polygons(projection: &Projection, polygons: &[Vec<Coordinate>]) -> Vec<Vec<Point>> {
    let mut engine = ClipEngine::new();
    polygons
        .iter()
        .filter_map(|poly| project_one(&mut engine, projection, poly))
        .collect()
}

pub fn project_polygons_par(
    projection: &Projection,
    polygons: &[Vec<Coordinate>],
) -> Vec<Vec<Point>> {
    polygons
        .par_iter()
        .map_init(ClipEngine::new, |engine, poly| project_one(engine, projection, poly))
        .flatten()
        .collect()
}

/// Integer fast path over a vertex slice.
pub fn transform_points(matrix: &TransformMatrix, coords: &[Coordinate]) -> Vec<Point> {
    coords
        .iter()
        .map(|&c| matrix.transform_point_internal_cos_lat(c))
        .collect()
}

pub fn transform_points_par(matrix: &TransformMatrix, coords: &[Coordinate]) -> Vec<Point> {
    coords
        .par_iter()
        .map(|&c| matrix.transform_point_internal_cos_lat(c))
        .collect()
}
