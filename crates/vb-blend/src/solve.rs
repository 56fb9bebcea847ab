//! High-level complex-blend interface.

use crate::config::BlendConfig;
use crate::constraint::{BlendComponent, Constraint, Objective};
use crate::engine::Engine;
use crate::error::{BlendError, BlendResult};
use crate::problem::{BlendProblem, MixtureMode, VariableShare};
use crate::solution::{BlendDiagnostics, BlendSolution, BlendStatus, FractionRange};
use rayon::prelude::*;
use tracing::{debug, warn};
use vb_core::percent_2dp;
use vb_walther::{inverse_walther_x, walther_x};

/// Find component shares that satisfy every component constraint and the
/// mixture constraint, using default tolerances.
pub fn solve_complex_blend(
    components: &[BlendComponent],
    mixture: &Constraint,
) -> BlendResult<BlendSolution> {
    solve_complex_blend_with_config(components, mixture, &BlendConfig::default())
}

pub fn solve_complex_blend_with_config(
    components: &[BlendComponent],
    mixture: &Constraint,
    config: &BlendConfig,
) -> BlendResult<BlendSolution> {
    let problem = BlendProblem::new(components, mixture, config)?;

    if problem.variable.is_empty() {
        return solve_all_fixed(&problem, config);
    }

    let engine = Engine::new(&problem, config);
    let remaining = problem.remaining();
    if remaining < problem.total_lb() - config.eps || remaining > problem.total_ub() + config.eps {
        return Err(BlendError::BoundsCannotSum);
    }

    let skipped_pairs = engine.skipped_pairs();
    if skipped_pairs > 0 {
        warn!(
            variables = problem.variable.len(),
            cap = config.combination_cap,
            skipped_pairs,
            "bound combinations per pair exceed the cap; vertex enumeration skipped"
        );
    }
    let limit_error = || BlendError::EnumerationLimit {
        variables: problem.variable.len(),
        cap: config.combination_cap,
    };

    let window = resolve_window(&engine, config)?;
    let fractions = match window {
        Window::Target { x } => {
            debug!(target_x = x, "solving for exact blend viscosity");
            engine
                .solve_with_target(x, problem.objective)
                .ok_or_else(|| {
                    if skipped_pairs > 0 {
                        limit_error()
                    } else {
                        BlendError::NoSolutionForTarget
                    }
                })?
        }
        Window::Range { min_x, max_x } => {
            debug!(?min_x, ?max_x, "solving for blend viscosity window");
            solve_in_range(&engine, config, min_x, max_x).ok_or_else(|| {
                if skipped_pairs > 0 {
                    limit_error()
                } else {
                    BlendError::NoSolutionForRange
                }
            })?
        }
        Window::Open => {
            debug!(objective = ?problem.objective, "solving without viscosity target");
            engine.solve_without_target(problem.objective)
        }
    };

    let viscosity = inverse_walther_x(problem.x_total(&fractions));
    let status = if problem.variable.len() <= 1 || matches!(window, Window::Target { .. }) {
        BlendStatus::Unique
    } else {
        BlendStatus::Multiple
    };

    let ranges: Vec<FractionRange> = problem
        .variable
        .par_iter()
        .map(|v| component_range(&engine, config, window, v))
        .collect();

    Ok(BlendSolution {
        fractions: fractions.iter().copied().map(percent_2dp).collect(),
        viscosity,
        status,
        ranges,
        diagnostics: BlendDiagnostics {
            fixed_components: problem.fixed.len(),
            variable_components: problem.variable.len(),
            skipped_pairs,
        },
    })
}

/// Every share is pinned: the blend is fully determined and only checked.
fn solve_all_fixed(problem: &BlendProblem, config: &BlendConfig) -> BlendResult<BlendSolution> {
    if (problem.fixed_sum - 1.0).abs() > config.match_tol {
        return Err(BlendError::FixedSumNotComplete);
    }
    let viscosity = inverse_walther_x(problem.fixed_x);

    match problem.mixture {
        MixtureMode::Target { viscosity: target } => {
            if (viscosity - target).abs() > config.match_tol {
                return Err(BlendError::MixtureTargetMismatch);
            }
        }
        MixtureMode::Range { min, max } => {
            let below = min.is_some_and(|lo| viscosity < lo - config.match_tol);
            let above = max.is_some_and(|hi| viscosity > hi + config.match_tol);
            if below || above {
                return Err(BlendError::MixtureOutOfRange);
            }
        }
        MixtureMode::Unconstrained => {}
    }

    Ok(BlendSolution {
        fractions: problem
            .initial_fractions()
            .into_iter()
            .map(percent_2dp)
            .collect(),
        viscosity,
        status: BlendStatus::Unique,
        ranges: Vec::new(),
        diagnostics: BlendDiagnostics {
            fixed_components: problem.fixed.len(),
            variable_components: 0,
            skipped_pairs: 0,
        },
    })
}

/// Mixture constraint expressed as total Walther coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Window {
    Target { x: f64 },
    /// Requested bounds. An endpoint outside the reachable interval has no
    /// exact-target solution, so the solve lands on the other one.
    Range {
        min_x: Option<f64>,
        max_x: Option<f64>,
    },
    Open,
}

impl Window {
    fn contains(&self, x: f64, eps: f64) -> bool {
        match *self {
            Window::Target { x: target } => (x - target).abs() <= eps,
            Window::Range { min_x, max_x } => {
                min_x.is_none_or(|lo| x >= lo - eps) && max_x.is_none_or(|hi| x <= hi + eps)
            }
            Window::Open => true,
        }
    }
}

fn resolve_window(engine: &Engine<'_>, config: &BlendConfig) -> BlendResult<Window> {
    let problem = engine.problem();
    match problem.mixture {
        MixtureMode::Unconstrained => Ok(Window::Open),
        MixtureMode::Target { viscosity } => {
            let x = walther_x(viscosity);
            let xr = engine.x_range();
            let needed = x - problem.fixed_x;
            if needed < xr.min - config.eps || needed > xr.max + config.eps {
                return Err(BlendError::TargetNotAchievable);
            }
            Ok(Window::Target { x })
        }
        MixtureMode::Range { min, max } => {
            let xr = engine.x_range();
            let reach_min = xr.min + problem.fixed_x;
            let reach_max = xr.max + problem.fixed_x;
            let min_x = min.map(walther_x);
            let max_x = max.map(walther_x);

            let lo = min_x.unwrap_or(f64::NEG_INFINITY);
            let hi = max_x.unwrap_or(f64::INFINITY);
            if lo > reach_max + config.eps || hi < reach_min - config.eps {
                return Err(BlendError::TargetNotAchievable);
            }
            Ok(Window::Range { min_x, max_x })
        }
    }
}

fn solve_in_range(
    engine: &Engine<'_>,
    config: &BlendConfig,
    min_x: Option<f64>,
    max_x: Option<f64>,
) -> Option<Vec<f64>> {
    let problem = engine.problem();
    let window = Window::Range { min_x, max_x };
    let objective = match problem.objective {
        Objective::Component { .. } => problem.objective,
        Objective::None | Objective::Mixture(_) => Objective::None,
    };

    let base = engine.solve_without_target(objective);
    let base_x = problem.x_total(&base);

    let mut candidates = Vec::with_capacity(3);
    if window.contains(base_x, config.eps) {
        candidates.push(base);
    }
    if let Some(lo) = min_x {
        candidates.extend(engine.solve_with_target(lo, objective));
    }
    if let Some(hi) = max_x {
        if min_x != Some(hi) {
            candidates.extend(engine.solve_with_target(hi, objective));
        }
    }
    debug!(candidates = candidates.len(), "range candidates");

    if let Some(best) = engine.select_best(candidates, objective) {
        return Some(best);
    }

    let mut fallback = base_x;
    if let Some(lo) = min_x {
        fallback = fallback.max(lo);
    }
    if let Some(hi) = max_x {
        fallback = fallback.min(hi);
    }
    engine.solve_with_target(fallback, objective)
}

/// Feasible share interval of one variable component, in percent.
fn component_range(
    engine: &Engine<'_>,
    config: &BlendConfig,
    window: Window,
    share: &VariableShare,
) -> FractionRange {
    let problem = engine.problem();
    let index = share.index;
    let lowest = Objective::minimize(index);
    let highest = Objective::maximize(index);

    let (min_choice, max_choice) = match window {
        Window::Target { x } => (
            engine.solve_with_target(x, lowest),
            engine.solve_with_target(x, highest),
        ),
        Window::Range { min_x, max_x } => {
            let mut min_candidates = Vec::new();
            let mut max_candidates = Vec::new();
            for bound in [min_x, max_x].into_iter().flatten() {
                min_candidates.extend(engine.solve_with_target(bound, lowest));
                max_candidates.extend(engine.solve_with_target(bound, highest));
            }
            let open_min = engine.solve_without_target(lowest);
            if window.contains(problem.x_total(&open_min), config.eps) {
                min_candidates.push(open_min);
            }
            let open_max = engine.solve_without_target(highest);
            if window.contains(problem.x_total(&open_max), config.eps) {
                max_candidates.push(open_max);
            }
            (
                engine.select_best(min_candidates, lowest),
                engine.select_best(max_candidates, highest),
            )
        }
        Window::Open => (
            Some(engine.solve_without_target(lowest)),
            Some(engine.solve_without_target(highest)),
        ),
    };

    FractionRange {
        index,
        min: min_choice.map_or(share.lb, |f| f[index]) * 100.0,
        max: max_choice.map_or(share.ub, |f| f[index]) * 100.0,
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn component(viscosity: f64, bounds: Option<(f64, f64)>) -> BlendComponent {
        match bounds {
            Some((a, b)) => BlendComponent::new(viscosity, Constraint::range(a.min(b), a.max(b))),
            None => BlendComponent::new(viscosity, Constraint::Free),
        }
    }

    proptest! {
        #[test]
        fn open_blend_fills_and_respects_bounds(
            parts in prop::collection::vec(
                (2.0_f64..500.0, prop::option::of((0.0_f64..40.0, 0.0_f64..40.0))),
                2..5,
            ),
            fixed in 0.0_f64..30.0,
        ) {
            let mut comps: Vec<BlendComponent> =
                parts.iter().map(|&(v, b)| component(v, b)).collect();
            // A free component guarantees the upper bounds can absorb the mass
            comps.push(BlendComponent::new(46.0, Constraint::Free));
            comps.push(BlendComponent::new(5.0, Constraint::set(fixed)));

            let solution = match solve_complex_blend(&comps, &Constraint::Free) {
                Ok(s) => s,
                Err(BlendError::BoundsCannotSum) => return Ok(()),
                Err(e) => return Err(TestCaseError::fail(e.to_string())),
            };

            let total: f64 = solution.fractions.iter().sum();
            prop_assert!((total - 100.0).abs() <= 0.01 * comps.len() as f64);
            for (f, c) in solution.fractions.iter().zip(&comps) {
                if let Constraint::Range { min: Some(lo), max: Some(hi) } = c.constraint {
                    prop_assert!(*f >= lo - 0.01 && *f <= hi + 0.01);
                }
            }
        }

        #[test]
        fn reachable_target_is_hit(
            viscosities in prop::collection::vec(2.0_f64..500.0, 2..5),
            weights in prop::collection::vec(0.01_f64..1.0, 4),
        ) {
            let n = viscosities.len();
            let total: f64 = weights[..n].iter().sum();
            let shares: Vec<f64> = weights[..n].iter().map(|w| w / total).collect();
            let target = vb_walther::mixture_viscosity(&viscosities, &shares);

            let comps: Vec<BlendComponent> = viscosities
                .iter()
                .map(|&v| BlendComponent::new(v, Constraint::Free))
                .collect();
            let solution = solve_complex_blend(&comps, &Constraint::set(target))
                .map_err(|e| TestCaseError::fail(e.to_string()))?;

            prop_assert!((solution.viscosity - target).abs() <= 1e-6 * target.max(1.0));
            prop_assert_eq!(solution.status, BlendStatus::Unique);
            for range in &solution.ranges {
                prop_assert!(range.min <= range.max + 1e-6);
            }
        }
    }
}
