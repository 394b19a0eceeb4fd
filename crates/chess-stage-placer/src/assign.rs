use std::collections::HashMap;

use log::{debug, warn};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use chess_stage_core::{BoardGeometry, Piece, Square};
use chess_stage_fen::TargetPosition;

use crate::catalog::Catalog;

/// Strategy used to match catalog instances to target squares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPolicy {
    /// Move each required piece from its current square to the nearest
    /// matching target by Manhattan distance, as a relative offset. Suits
    /// the interactive renderer, where pieces start from a real position.
    #[default]
    Displacement,
    /// Draw instances from per-type pools and place them at absolute square
    /// centers, ignoring prior position. Suits the batch generator, where
    /// every frame starts from a cleared board.
    Pool,
}

/// How one instance reaches its target square.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MoveKind {
    /// World-space offset added to the instance's current position.
    Translate(Vector3<f64>),
    /// Absolute world-space destination.
    Place(Point3<f64>),
}

/// A resolved instance-to-square move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieceMove {
    pub id: String,
    pub target: Square,
    pub kind: MoveKind,
}

/// An instance left out of the position: hidden, and for the pool strategy
/// also parked off the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HiddenPiece {
    pub id: String,
    pub park: Option<Point3<f64>>,
}

/// Output of the resolver: the moves to apply, the instances to hide, and
/// the targets no instance could fill.
///
/// An instance appears in at most one move; a target square receives at most
/// one instance. Unfulfilled targets are diagnostics, not errors.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentPlan {
    pub moves: Vec<PieceMove>,
    pub hidden: Vec<HiddenPiece>,
    pub unfulfilled: Vec<(Square, Piece)>,
}

/// Resolve `target` against `catalog` under the chosen policy.
///
/// Pure function over the snapshots; scene mutation happens in
/// [`crate::apply`].
pub fn resolve(
    catalog: &Catalog,
    target: &TargetPosition,
    geometry: &BoardGeometry,
    policy: PlacementPolicy,
) -> AssignmentPlan {
    let plan = match policy {
        PlacementPolicy::Displacement => resolve_displacement(catalog, target, geometry),
        PlacementPolicy::Pool => resolve_pool(catalog, target, geometry),
    };
    debug!(
        "resolved {} moves, {} hidden, {} unfulfilled ({policy:?})",
        plan.moves.len(),
        plan.hidden.len(),
        plan.unfulfilled.len()
    );
    plan
}

/// Nearest-match strategy. Targets are processed in parser scan order; for
/// each one the unused instance of the required type with minimum Manhattan
/// distance from its origin square wins, ties broken by catalog order.
fn resolve_displacement(
    catalog: &Catalog,
    target: &TargetPosition,
    geometry: &BoardGeometry,
) -> AssignmentPlan {
    let instances = catalog.instances();
    let mut used = vec![false; instances.len()];
    let mut moves = Vec::with_capacity(target.len());
    let mut unfulfilled = Vec::new();

    for &(square, piece) in target.placements() {
        let candidate = instances
            .iter()
            .enumerate()
            .filter(|(idx, inst)| !used[*idx] && inst.piece == piece)
            .min_by_key(|(idx, inst)| (inst.origin.manhattan(square), *idx));
        let Some((idx, inst)) = candidate else {
            warn!("no {piece} instance left for {square}");
            unfulfilled.push((square, piece));
            continue;
        };
        used[idx] = true;

        let file_delta = f64::from(square.file()) - f64::from(inst.origin.file());
        let rank_delta = f64::from(square.rank()) - f64::from(inst.origin.rank());
        // File grows toward -x and rank toward -y in the calibrated frame,
        // so the world offset negates both deltas. The offset is relative:
        // it accumulates onto wherever the instance currently sits.
        let delta = Vector3::new(
            -file_delta * geometry.square_size(),
            -rank_delta * geometry.square_size(),
            0.0,
        );
        moves.push(PieceMove {
            id: inst.id.clone(),
            target: square,
            kind: MoveKind::Translate(delta),
        });
    }

    let hidden = instances
        .iter()
        .zip(&used)
        .filter(|(_, used)| !**used)
        .map(|(inst, _)| HiddenPiece {
            id: inst.id.clone(),
            park: None,
        })
        .collect();

    AssignmentPlan {
        moves,
        hidden,
        unfulfilled,
    }
}

/// Pool strategy. Instances are bucketed by type; each target pops the most
/// recently cataloged instance of its type (LIFO) and places it at the
/// absolute square center at the instance's own base height. Everything not
/// drawn is parked off-board and hidden.
fn resolve_pool(
    catalog: &Catalog,
    target: &TargetPosition,
    geometry: &BoardGeometry,
) -> AssignmentPlan {
    let instances = catalog.instances();
    let mut pools: HashMap<Piece, Vec<usize>> = HashMap::new();
    for (idx, inst) in instances.iter().enumerate() {
        pools.entry(inst.piece).or_default().push(idx);
    }

    let mut used = vec![false; instances.len()];
    let mut moves = Vec::with_capacity(target.len());
    let mut unfulfilled = Vec::new();

    for &(square, piece) in target.placements() {
        let Some(idx) = pools.get_mut(&piece).and_then(Vec::pop) else {
            // Promotion overflow lands here: more targets than instances.
            warn!("pool exhausted for {piece}, skipping {square}");
            unfulfilled.push((square, piece));
            continue;
        };
        let inst = &instances[idx];
        used[idx] = true;
        moves.push(PieceMove {
            id: inst.id.clone(),
            target: square,
            kind: MoveKind::Place(geometry.square_center(square, inst.base_height)),
        });
    }

    let hidden = instances
        .iter()
        .zip(&used)
        .filter(|(_, used)| !**used)
        .map(|(inst, _)| HiddenPiece {
            id: inst.id.clone(),
            park: Some(park_point(geometry, inst.base_height)),
        })
        .collect();

    AssignmentPlan {
        moves,
        hidden,
        unfulfilled,
    }
}

/// Off-board parking spot for pooled-out instances: one board width past the
/// frame center along +x, at the instance's own base height.
fn park_point(geometry: &BoardGeometry, base_height: f64) -> Point3<f64> {
    let center = geometry.center();
    Point3::new(
        center.x + 8.0 * geometry.square_size(),
        center.y,
        base_height,
    )
}
