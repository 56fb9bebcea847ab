//! Target/range resolution over the variable components.
//!
//! Every query here is a pure function of the [`BlendProblem`]. A query
//! returns full fraction vectors (fixed shares included, in input order) so
//! callers can compare candidates without re-assembling them.

use crate::config::BlendConfig;
use crate::constraint::{Direction, Objective};
use crate::problem::{BlendProblem, VariableShare};
use std::cmp::Ordering;
use tracing::trace;

/// Extreme Walther contributions the variable components can reach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XRange {
    pub min: f64,
    pub max: f64,
}

/// Read-only solver over one problem.
#[derive(Debug, Clone, Copy)]
pub struct Engine<'a> {
    problem: &'a BlendProblem,
    config: &'a BlendConfig,
}

impl<'a> Engine<'a> {
    pub fn new(problem: &'a BlendProblem, config: &'a BlendConfig) -> Self {
        Self { problem, config }
    }

    pub fn problem(&self) -> &BlendProblem {
        self.problem
    }

    /// Lowest and highest variable-only Walther contribution.
    ///
    /// Everyone starts at the lower bound; the rest of the mass goes to the
    /// lowest-`x` (or highest-`x`) components first.
    pub fn x_range(&self) -> XRange {
        let vars = &self.problem.variable;
        let base_x: f64 = vars.iter().map(|v| v.lb * v.x).sum();
        let free_mass = self.problem.remaining() - self.problem.total_lb();

        let mut ascending: Vec<&VariableShare> = vars.iter().collect();
        ascending.sort_by(|a, b| a.x.total_cmp(&b.x));

        let fill = |order: &mut dyn Iterator<Item = &&VariableShare>| {
            let mut rem = free_mass;
            let mut x_total = base_x;
            for v in order {
                if rem <= self.config.eps {
                    break;
                }
                let add = v.capacity().min(rem);
                x_total += add * v.x;
                rem -= add;
            }
            x_total
        };

        XRange {
            min: fill(&mut ascending.iter()),
            max: fill(&mut ascending.iter().rev()),
        }
    }

    /// Assignment ignoring any viscosity target.
    ///
    /// Without an objective the mass is spread evenly; with one, components
    /// are filled greedily in objective order.
    pub fn solve_without_target(&self, objective: Objective) -> Vec<f64> {
        let mut fractions = self.problem.initial_fractions();
        let vars = &self.problem.variable;

        let coefficient = |v: &VariableShare| match objective {
            Objective::None => 0.0,
            Objective::Mixture(_) => v.x,
            Objective::Component { index, .. } => {
                if v.index == index {
                    1.0
                } else {
                    0.0
                }
            }
        };
        let direction = match objective {
            Objective::None => {
                self.distribute_evenly(&mut fractions);
                return fractions;
            }
            Objective::Mixture(direction) | Objective::Component { direction, .. } => direction,
        };

        let mut order: Vec<&VariableShare> = vars.iter().collect();
        order.sort_by(|a, b| {
            let ord = coefficient(a)
                .partial_cmp(&coefficient(b))
                .unwrap_or(Ordering::Equal);
            match direction {
                Direction::Min => ord,
                Direction::Max => ord.reverse(),
            }
        });

        for v in &order {
            fractions[v.index] = v.lb;
        }
        let mut rem = self.problem.remaining() - self.problem.total_lb();
        for v in &order {
            if rem <= self.config.eps {
                break;
            }
            let add = v.capacity().min(rem);
            fractions[v.index] += add;
            rem -= add;
        }
        fractions
    }

    /// Round-robin equal shares until the mass is placed or capacity runs out.
    fn distribute_evenly(&self, fractions: &mut [f64]) {
        let eps = self.config.eps;
        let vars = &self.problem.variable;
        let mut rem = self.problem.remaining() - self.problem.total_lb();
        let mut capacity: Vec<f64> = vars.iter().map(|v| v.capacity()).collect();
        for v in vars {
            fractions[v.index] = v.lb;
        }

        let mut active: Vec<usize> = (0..vars.len()).collect();
        while rem > eps && !active.is_empty() {
            let share = rem / active.len() as f64;
            for &k in &active {
                let add = capacity[k].min(share);
                fractions[vars[k].index] += add;
                rem -= add;
                capacity[k] -= add;
            }
            active.retain(|&k| capacity[k] > eps);
        }
    }

    /// Assignment whose total Walther coordinate equals `target_x`.
    ///
    /// Enumerates polytope vertices: two components solve the mass and `x`
    /// balances while every other variable component sits at one of its
    /// bounds. Returns `None` when no vertex is feasible.
    pub fn solve_with_target(&self, target_x: f64, objective: Objective) -> Option<Vec<f64>> {
        let eps = self.config.eps;
        let problem = self.problem;
        let vars = &problem.variable;
        let remaining = problem.remaining();
        let target_var_x = target_x - problem.fixed_x;

        if let [v] = vars.as_slice() {
            let p = remaining;
            if p < v.lb - eps || p > v.ub + eps {
                return None;
            }
            if (p * v.x - target_var_x).abs() > self.config.match_tol {
                return None;
            }
            let mut fractions = problem.initial_fractions();
            fractions[v.index] = p;
            return Some(fractions);
        }

        let mut best: Option<(f64, Vec<f64>)> = None;
        let mut feasible = 0usize;

        for i in 0..vars.len() {
            for j in (i + 1)..vars.len() {
                let others: Vec<&VariableShare> = vars
                    .iter()
                    .enumerate()
                    .filter(|&(k, _)| k != i && k != j)
                    .map(|(_, v)| v)
                    .collect();
                let Some(combos) = self.config.combinations_for(others.len()) else {
                    continue;
                };

                for mask in 0..combos {
                    let pinned = |k: usize, v: &VariableShare| {
                        if (mask >> k) & 1 == 1 { v.ub } else { v.lb }
                    };
                    let mut sum_p = 0.0;
                    let mut sum_x = 0.0;
                    for (k, v) in others.iter().enumerate() {
                        let val = pinned(k, v);
                        sum_p += val;
                        sum_x += val * v.x;
                    }

                    let residual_p = remaining - sum_p;
                    let residual_x = target_var_x - sum_x;
                    if residual_p < -eps {
                        continue;
                    }

                    let Some((p_a, p_b)) =
                        self.solve_pair(&vars[i], &vars[j], residual_p, residual_x, objective)
                    else {
                        continue;
                    };

                    let (a, b) = (&vars[i], &vars[j]);
                    if p_a < a.lb - eps || p_a > a.ub + eps {
                        continue;
                    }
                    if p_b < b.lb - eps || p_b > b.ub + eps {
                        continue;
                    }

                    let mut candidate = problem.initial_fractions();
                    for (k, v) in others.iter().enumerate() {
                        candidate[v.index] = pinned(k, v);
                    }
                    candidate[a.index] = p_a;
                    candidate[b.index] = p_b;
                    feasible += 1;

                    let score = self.score(&candidate, objective);
                    if best.as_ref().is_none_or(|(s, _)| score < *s) {
                        best = Some((score, candidate));
                    }
                }
            }
        }

        trace!(target_x, feasible, "vertex enumeration finished");
        best.map(|(_, fractions)| fractions)
    }

    /// Shares for pair (A, B) given the residual mass and Walther contribution.
    fn solve_pair(
        &self,
        a: &VariableShare,
        b: &VariableShare,
        residual_p: f64,
        residual_x: f64,
        objective: Objective,
    ) -> Option<(f64, f64)> {
        let denom = a.x - b.x;
        if denom.abs() > self.config.singular_tol {
            let p_a = (residual_x - residual_p * b.x) / denom;
            return Some((p_a, residual_p - p_a));
        }

        // Same fluid in Walther terms: only the split is free.
        if (residual_x - residual_p * a.x).abs() > self.config.match_tol {
            return None;
        }
        let min_a = a.lb.max(residual_p - b.ub);
        let max_a = a.ub.min(residual_p - b.lb);
        if min_a > max_a + self.config.eps {
            return None;
        }
        let p_a = match objective {
            Objective::Component { index, direction } if index == a.index => match direction {
                Direction::Min => min_a,
                Direction::Max => max_a,
            },
            Objective::Component { index, direction } if index == b.index => match direction {
                Direction::Min => max_a,
                Direction::Max => min_a,
            },
            _ => a.midpoint().max(min_a).min(max_a),
        };
        Some((p_a, residual_p - p_a))
    }

    /// Lower is better.
    fn score(&self, candidate: &[f64], objective: Objective) -> f64 {
        match objective {
            Objective::Component { index, direction } => match direction {
                Direction::Min => candidate[index],
                Direction::Max => -candidate[index],
            },
            Objective::None | Objective::Mixture(_) => self
                .problem
                .variable
                .iter()
                .map(|v| {
                    let diff = candidate[v.index] - v.midpoint();
                    diff * diff
                })
                .sum(),
        }
    }

    /// Pick among feasible candidates: the extremizing one for a component
    /// objective, otherwise the first.
    pub fn select_best(&self, candidates: Vec<Vec<f64>>, objective: Objective) -> Option<Vec<f64>> {
        match objective {
            Objective::Component { index, direction } => {
                candidates.into_iter().reduce(|best, candidate| {
                    let better = match direction {
                        Direction::Max => candidate[index] > best[index],
                        Direction::Min => candidate[index] < best[index],
                    };
                    if better { candidate } else { best }
                })
            }
            Objective::None | Objective::Mixture(_) => candidates.into_iter().next(),
        }
    }

    /// Pairs each vertex enumeration skips because their bound combinations
    /// exceed the cap. Every pair pins the same number of others, so this is
    /// either zero or all of them.
    pub fn skipped_pairs(&self) -> usize {
        let vars = self.problem.variable.len();
        if vars >= 2 && self.config.combinations_for(vars - 2).is_none() {
            vars * (vars - 1) / 2
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{BlendComponent, Constraint};
    use vb_walther::walther_x;

    fn problem(components: &[BlendComponent]) -> BlendProblem {
        BlendProblem::new(components, &Constraint::Free, &BlendConfig::default()).unwrap()
    }

    #[test]
    fn x_range_spans_lightest_to_heaviest() {
        let p = problem(&[
            BlendComponent::new(100.0, Constraint::Free),
            BlendComponent::new(10.0, Constraint::Free),
        ]);
        let cfg = BlendConfig::default();
        let xr = Engine::new(&p, &cfg).x_range();
        assert!((xr.min - walther_x(10.0)).abs() < 1e-12);
        assert!((xr.max - walther_x(100.0)).abs() < 1e-12);
    }

    #[test]
    fn even_distribution_respects_capacity() {
        let p = problem(&[
            BlendComponent::new(100.0, Constraint::range(10.0, 30.0)),
            BlendComponent::new(
                10.0,
                Constraint::Range {
                    min: Some(10.0),
                    max: None,
                },
            ),
        ]);
        let cfg = BlendConfig::default();
        let f = Engine::new(&p, &cfg).solve_without_target(Objective::None);
        assert!((f[0] - 0.3).abs() < 1e-12);
        assert!((f[1] - 0.7).abs() < 1e-12);
    }

    #[test]
    fn greedy_fill_follows_objective() {
        let p = problem(&[
            BlendComponent::new(100.0, Constraint::Free),
            BlendComponent::new(10.0, Constraint::Free),
        ]);
        let cfg = BlendConfig::default();
        let engine = Engine::new(&p, &cfg);
        assert_eq!(
            engine.solve_without_target(Objective::Mixture(Direction::Min)),
            vec![0.0, 1.0]
        );
        assert_eq!(
            engine.solve_without_target(Objective::Mixture(Direction::Max)),
            vec![1.0, 0.0]
        );
        assert_eq!(engine.solve_without_target(Objective::maximize(1)), vec![0.0, 1.0]);
    }

    #[test]
    fn singular_pair_honors_direction() {
        let p = problem(&[
            BlendComponent::new(50.0, Constraint::Free),
            BlendComponent::new(50.0, Constraint::Free),
        ]);
        let cfg = BlendConfig::default();
        let engine = Engine::new(&p, &cfg);
        let x = walther_x(50.0);

        assert_eq!(
            engine.solve_with_target(x, Objective::minimize(1)),
            Some(vec![1.0, 0.0])
        );
        assert_eq!(
            engine.solve_with_target(x, Objective::maximize(1)),
            Some(vec![0.0, 1.0])
        );
        assert_eq!(
            engine.solve_with_target(x, Objective::None),
            Some(vec![0.5, 0.5])
        );
        assert_eq!(engine.solve_with_target(walther_x(60.0), Objective::None), None);
    }

    #[test]
    fn single_variable_is_forced() {
        let p = problem(&[
            BlendComponent::new(100.0, Constraint::set(40.0)),
            BlendComponent::new(10.0, Constraint::Free),
        ]);
        let cfg = BlendConfig::default();
        let engine = Engine::new(&p, &cfg);
        let x = 0.4 * walther_x(100.0) + 0.6 * walther_x(10.0);
        let f = engine.solve_with_target(x, Objective::None).unwrap();
        assert_eq!(f[0], 0.4);
        assert!((f[1] - 0.6).abs() < 1e-12);
        assert!(engine.solve_with_target(x + 0.01, Objective::None).is_none());
    }

    #[test]
    fn select_best_prefers_extreme_then_first() {
        let p = problem(&[
            BlendComponent::new(100.0, Constraint::Free),
            BlendComponent::new(10.0, Constraint::Free),
        ]);
        let cfg = BlendConfig::default();
        let engine = Engine::new(&p, &cfg);
        let candidates = vec![vec![0.2, 0.8], vec![0.6, 0.4], vec![0.6, 0.4]];
        assert_eq!(
            engine.select_best(candidates.clone(), Objective::maximize(0)),
            Some(vec![0.6, 0.4])
        );
        assert_eq!(
            engine.select_best(candidates, Objective::None),
            Some(vec![0.2, 0.8])
        );
        assert_eq!(engine.select_best(Vec::new(), Objective::None), None);
    }

    #[test]
    fn skipped_pairs_under_cap() {
        let cfg = BlendConfig::default();
        let small = problem(&vec![BlendComponent::new(20.0, Constraint::Free); 3]);
        assert_eq!(Engine::new(&small, &cfg).skipped_pairs(), 0);

        let large = problem(&vec![BlendComponent::new(20.0, Constraint::Free); 20]);
        assert_eq!(Engine::new(&large, &cfg).skipped_pairs(), 190);
    }
}
