//! Physics domain: collision queries answered by avian's spatial query pipeline.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::physics::{CollisionWorld, GameLayer, RayHit, ShapeHit, SurfaceFilter, SurfaceKind};

/// Upper bound on contacts gathered per surface kind in one sweep.
const MAX_SWEEP_HITS: u32 = 8;

/// [`CollisionWorld`] backed by a [`SpatialQuery`].
///
/// Each surface kind lives on its own [`GameLayer`], so a query is issued per
/// kind in the filter and the kind of every hit is known without looking the
/// entity up.
pub struct AvianGeometry<'a, 'w, 's> {
    spatial_query: &'a SpatialQuery<'w, 's>,
    excluded: Option<Entity>,
}

impl<'a, 'w, 's> AvianGeometry<'a, 'w, 's> {
    pub fn new(spatial_query: &'a SpatialQuery<'w, 's>) -> Self {
        Self {
            spatial_query,
            excluded: None,
        }
    }

    /// Ignore the querying character's own colliders.
    pub fn excluding(mut self, entity: Entity) -> Self {
        self.excluded = Some(entity);
        self
    }

    fn query_filter(&self, kind: SurfaceKind) -> SpatialQueryFilter {
        let filter = SpatialQueryFilter::from_mask(GameLayer::from(kind));
        match self.excluded {
            Some(entity) => filter.with_excluded_entities([entity]),
            None => filter,
        }
    }
}

impl CollisionWorld for AvianGeometry<'_, '_, '_> {
    fn cast_box(
        &self,
        center: Vec2,
        half_extents: Vec2,
        direction: Dir2,
        max_distance: f32,
        filter: SurfaceFilter,
    ) -> Vec<ShapeHit> {
        let shape = Collider::rectangle(half_extents.x * 2.0, half_extents.y * 2.0);
        let config = ShapeCastConfig {
            max_distance,
            ..default()
        };

        let mut hits: Vec<ShapeHit> = filter
            .kinds()
            .flat_map(|kind| {
                self.spatial_query
                    .shape_hits(
                        &shape,
                        center,
                        0.0,
                        direction,
                        MAX_SWEEP_HITS,
                        &config,
                        &self.query_filter(kind),
                    )
                    .into_iter()
                    .map(move |hit| ShapeHit {
                        distance: hit.distance,
                        normal: hit.normal1,
                        kind,
                    })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn overlaps_box(&self, center: Vec2, half_extents: Vec2, filter: SurfaceFilter) -> bool {
        let shape = Collider::rectangle(half_extents.x * 2.0, half_extents.y * 2.0);
        filter.kinds().any(|kind| {
            !self
                .spatial_query
                .shape_intersections(&shape, center, 0.0, &self.query_filter(kind))
                .is_empty()
        })
    }

    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        filter: SurfaceFilter,
    ) -> Option<RayHit> {
        filter
            .kinds()
            .filter_map(|kind| {
                self.spatial_query
                    .cast_ray(
                        origin,
                        direction,
                        max_distance,
                        true,
                        &self.query_filter(kind),
                    )
                    .map(|hit| RayHit {
                        distance: hit.distance,
                        point: origin + *direction * hit.distance,
                        normal: hit.normal,
                        kind,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
