//! Level Collision Geometry
//!
//! Builds the static collision index for a level from the solid cells of
//! its collision layer, and answers overlap queries for entity AABBs.
//!
//! The build merges the raster grid into a minimal set of axis-aligned
//! rectangles: a row pass collects 1-tall horizontal runs, then a vertical
//! merge pass repeatedly fuses rects with identical x-range until a fixed
//! point is reached. The query returns the *first* overlapping rect in
//! build order, not the nearest; the physics resolver compensates by
//! re-querying after each push-out. Do not change this to a
//! minimum-penetration search - resolution order in dense corners is part
//! of the game feel.

use glam::Vec2;
use tracing::{debug, warn};

use crate::core::rect::{Rect, TileRect};
use crate::resources::config::TileGrid;
use crate::sim::entity::EntityId;

/// Reference id that marks a colour mapping as impassable terrain.
pub const SOLID_REF_ID: &str = "Solid";

/// Result of a collision query.
///
/// Produced and consumed within a single physics step; never stored.
#[derive(Clone, Copy, Debug)]
pub struct CollisionHit {
    /// The entity that was tested.
    pub entity: EntityId,
    /// The rect it overlaps.
    pub rect: TileRect,
    /// Minimum-magnitude axis-aligned push-out separating the entity.
    pub push: Vec2,
    /// Entity position after applying `push`.
    pub resolved_pos: Vec2,
}

/// Static level collision geometry.
///
/// Built once per level load; immutable (and freely shareable) during
/// simulation.
#[derive(Clone, Debug, Default)]
pub struct CollisionIndex {
    rects: Vec<TileRect>,
}

impl CollisionIndex {
    /// An index with no geometry. Entities fall through the world, which
    /// is the accepted degraded state for malformed levels.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a collision layer, locating the solid id from the
    /// grid's colour mappings.
    pub fn build(grid: &TileGrid) -> Self {
        let Some(solid_id) = grid.map_id_for(SOLID_REF_ID) else {
            warn!("no Solid mapping found in collision layer; level has no geometry");
            return Self::empty();
        };
        Self::build_with_solid_id(grid, solid_id)
    }

    /// Build from a collision layer with an explicit solid cell id.
    pub fn build_with_solid_id(grid: &TileGrid, solid_id: i32) -> Self {
        let mut rects = Vec::new();

        // Row pass: merge contiguous solid cells into 1-tall runs.
        for y in 0..grid.height() {
            let mut run_start: Option<usize> = None;

            for x in 0..grid.width() {
                let is_solid = grid.cell_id(x, y) == solid_id;

                if is_solid {
                    if run_start.is_none() {
                        run_start = Some(x);
                    }
                } else if let Some(start) = run_start.take() {
                    rects.push(TileRect::new(start as i32, y as i32, (x - start) as i32, 1));
                }
            }

            if let Some(start) = run_start {
                rects.push(TileRect::new(
                    start as i32,
                    y as i32,
                    (grid.width() - start) as i32,
                    1,
                ));
            }
        }

        let rects = merge_rects(rects);
        debug!(count = rects.len(), "generated merged collision rects");

        Self { rects }
    }

    /// The merged rects, in build order.
    pub fn rects(&self) -> &[TileRect] {
        &self.rects
    }

    /// Whether the index holds no geometry.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Test an entity AABB (bottom-left corner at `pos`) against the
    /// geometry. Returns the first overlapping rect in build order with
    /// its minimum push-out, or `None` when clear.
    pub fn query(&self, entity: EntityId, pos: Vec2, size: Vec2) -> Option<CollisionHit> {
        let ent_rect = Rect::new(pos, size.x, size.y);

        for rect in &self.rects {
            let col = rect.to_rect();
            if !ent_rect.overlaps(&col) {
                continue;
            }

            // Penetration depths along the four axis directions
            let dx_left = col.x_max() - ent_rect.x_min(); // push right
            let dx_right = ent_rect.x_max() - col.x_min(); // push left
            let dy_down = col.y_max() - ent_rect.y_min(); // push up
            let dy_up = ent_rect.y_max() - col.y_min(); // push down

            let min_dist = dx_left.min(dx_right).min(dy_down).min(dy_up);

            let push = if min_dist == dx_left {
                Vec2::new(dx_left, 0.0)
            } else if min_dist == dx_right {
                Vec2::new(-dx_right, 0.0)
            } else if min_dist == dy_down {
                Vec2::new(0.0, dy_down)
            } else {
                Vec2::new(0.0, -dy_up)
            };

            return Some(CollisionHit {
                entity,
                rect: *rect,
                push,
                resolved_pos: pos + push,
            });
        }

        None
    }
}

/// Fuse vertically adjacent rects with identical x-range and width until
/// a full pass produces no merge.
fn merge_rects(mut rects: Vec<TileRect>) -> Vec<TileRect> {
    loop {
        let mut merged_something = false;
        let mut out: Vec<TileRect> = Vec::with_capacity(rects.len());
        let mut used = vec![false; rects.len()];

        for i in 0..rects.len() {
            if used[i] {
                continue;
            }
            let a = rects[i];

            let mut merged = false;
            for j in (i + 1)..rects.len() {
                if used[j] {
                    continue;
                }
                let b = rects[j];

                // Same x-range and width, touching top-to-bottom
                if a.x == b.x && a.w == b.w && (a.y_max() == b.y || b.y_max() == a.y) {
                    out.push(TileRect::new(a.x, a.y.min(b.y), a.w, a.h + b.h));
                    used[i] = true;
                    used[j] = true;
                    merged_something = true;
                    merged = true;
                    break;
                }
            }

            if !merged {
                out.push(a);
            }
        }

        rects = out;
        if !merged_something {
            return rects;
        }
    }
}
