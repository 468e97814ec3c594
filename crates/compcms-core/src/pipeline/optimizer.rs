//! Pipeline optimizer
//!
//! Repeats two passes until neither changes anything:
//!
//! - matrix pass: consecutive zero-offset matrices become `next × prev`,
//!   identity matrices are dropped
//! - curve pass: consecutive curve sets that invert each other are both
//!   dropped, other consecutive curve sets are joined, identity curve sets
//!   are dropped
//!
//! Removing a curve set with clamped input also removes the [0, 1] clamping
//! it did; [`Optimized::clamp_output`] records that so the caller can clamp
//! the final values instead.

use tracing::debug;

use crate::curve::ToneCurve;
use crate::math::Matrix3x3;
use crate::pipeline::stages::{Stage, describe_stages};

/// Result of [`optimize`]
#[derive(Debug, Clone)]
pub struct Optimized {
    pub stages: Vec<Stage>,
    /// A clamping curve set was removed
    pub clamp_output: bool,
}

/// Shape of an optimized pipeline
#[derive(Debug, Clone)]
pub enum PipelineShape {
    Identity,
    /// `[curve]? [matrix]? [curve]?`, with at least one present
    Simple {
        pre_curve: Option<[ToneCurve; 3]>,
        matrix: Option<Matrix3x3>,
        post_curve: Option<[ToneCurve; 3]>,
    },
    /// Needs a 3D LUT
    Complex,
}

/// Optimize `stages`; `points` is the sample count for joined curves
pub fn optimize(stages: Vec<Stage>, points: usize) -> Optimized {
    let before = describe_stages(&stages);
    let mut stages = stages;
    let mut clamp_output = false;

    loop {
        let (merged, matrices_changed) = merge_matrices(stages);
        let (merged, curves_changed, removed_clamp) = merge_curvesets(merged, points);
        stages = merged;
        clamp_output |= removed_clamp;
        if !matrices_changed && !curves_changed {
            break;
        }
    }

    debug!(
        target: "compcms::optimizer",
        "optimized [{}] to [{}]{}",
        before,
        describe_stages(&stages),
        if clamp_output { ", clamping output" } else { "" }
    );

    Optimized { stages, clamp_output }
}

/// One matrix pass
pub fn merge_matrices(stages: Vec<Stage>) -> (Vec<Stage>, bool) {
    let mut out: Vec<Stage> = Vec::with_capacity(stages.len());
    let mut modified = false;

    for stage in stages {
        let merged = match (out.last().and_then(Stage::as_linear_matrix), stage.as_linear_matrix()) {
            (Some(prev), Some(next)) => Some(next.multiply(prev)),
            _ => None,
        };

        match merged {
            Some(m) => {
                out.pop();
                out.push(Stage::matrix(m));
                modified = true;
            }
            None => out.push(stage),
        }
    }

    let before = out.len();
    out.retain(|stage| !stage.as_linear_matrix().is_some_and(Matrix3x3::is_identity));
    modified |= out.len() != before;

    (out, modified)
}

/// One curve set pass; also reports whether a clamping curve set was removed
pub fn merge_curvesets(stages: Vec<Stage>, points: usize) -> (Vec<Stage>, bool, bool) {
    let mut out: Vec<Stage> = Vec::with_capacity(stages.len());
    let mut modified = false;
    let mut removed_clamp = false;

    for stage in stages {
        let joined = match (out.last().and_then(Stage::as_curve_set), stage.as_curve_set()) {
            (Some(prev), Some(next)) => {
                if curvesets_are_inverse(prev, next) {
                    removed_clamp |= clamps(prev) || clamps(next);
                    Some(None)
                } else {
                    Some(Some(join_curvesets(prev, next, points)))
                }
            }
            _ => None,
        };

        match joined {
            Some(replacement) => {
                out.pop();
                out.extend(replacement);
                modified = true;
            }
            None => out.push(stage),
        }
    }

    let mut kept = Vec::with_capacity(out.len());
    for stage in out {
        match stage.as_curve_set() {
            Some(curves) if curves.iter().all(ToneCurve::is_identity) => {
                removed_clamp |= clamps(curves);
                modified = true;
            }
            _ => kept.push(stage),
        }
    }

    (kept, modified, removed_clamp)
}

fn curvesets_are_inverse(prev: &[ToneCurve; 3], next: &[ToneCurve; 3]) -> bool {
    prev.iter().zip(next.iter()).all(|(a, b)| a.is_inverse_of(b))
}

fn join_curvesets(prev: &[ToneCurve; 3], next: &[ToneCurve; 3], points: usize) -> Stage {
    Stage::curves([
        prev[0].join(&next[0], points),
        prev[1].join(&next[1], points),
        prev[2].join(&next[2], points),
    ])
}

/// Pop a leading curve set off `rest`
fn take_curves(rest: &mut &[Stage]) -> Option<[ToneCurve; 3]> {
    let curves = rest.first()?.as_curve_set()?.clone();
    *rest = &rest[1..];
    Some(curves)
}

fn clamps(curves: &[ToneCurve; 3]) -> bool {
    curves.iter().any(ToneCurve::clamped_input)
}

/// Classify an optimized pipeline
pub fn classify(stages: &[Stage]) -> PipelineShape {
    if stages.is_empty() {
        return PipelineShape::Identity;
    }

    let mut rest = stages;
    let pre_curve = take_curves(&mut rest);
    let matrix = match rest.first() {
        Some(Stage::Matrix { .. }) => {
            let Some(m) = rest[0].as_linear_matrix() else {
                return PipelineShape::Complex;
            };
            rest = &rest[1..];
            Some(*m)
        }
        _ => None,
    };
    let post_curve = take_curves(&mut rest);

    if !rest.is_empty() {
        return PipelineShape::Complex;
    }

    PipelineShape::Simple {
        pre_curve,
        matrix,
        post_curve,
    }
}
