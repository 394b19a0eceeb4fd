use log::warn;

use crate::assign::{AssignmentPlan, MoveKind};
use crate::scene::{SceneError, SceneHost};

/// Result of applying a plan to the scene.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    /// Instances moved and made visible.
    pub applied: usize,
    /// Instances hidden (and parked, under the pool strategy).
    pub hidden: usize,
    /// Instances the scene no longer accepted, with the error.
    pub failures: Vec<(String, SceneError)>,
    /// Targets the resolver could not fill, copied from the plan.
    pub unfulfilled: usize,
}

/// Execute a resolved plan against the scene.
///
/// This is the only component that mutates scene state. A failure on one
/// instance (e.g. an object deleted between catalog and apply) is recorded
/// and the rest of the plan still runs.
pub fn apply<S: SceneHost + ?Sized>(scene: &mut S, plan: &AssignmentPlan) -> ApplyReport {
    let mut report = ApplyReport {
        unfulfilled: plan.unfulfilled.len(),
        ..ApplyReport::default()
    };

    for mv in &plan.moves {
        let result = match mv.kind {
            MoveKind::Translate(delta) => scene.translate(&mv.id, delta),
            MoveKind::Place(point) => scene.set_position(&mv.id, point),
        }
        .and_then(|()| scene.set_hidden(&mv.id, false));
        match result {
            Ok(()) => report.applied += 1,
            Err(err) => {
                warn!("placing {:?} on {} failed: {err}", mv.id, mv.target);
                report.failures.push((mv.id.clone(), err));
            }
        }
    }

    for piece in &plan.hidden {
        let result = match piece.park {
            Some(park) => scene
                .set_position(&piece.id, park)
                .and_then(|()| scene.set_hidden(&piece.id, true)),
            None => scene.set_hidden(&piece.id, true),
        };
        match result {
            Ok(()) => report.hidden += 1,
            Err(err) => {
                warn!("hiding {:?} failed: {err}", piece.id);
                report.failures.push((piece.id.clone(), err));
            }
        }
    }

    report
}
