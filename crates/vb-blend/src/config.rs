//! Solver tolerances and limits.

/// Blend solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendConfig {
    /// Slack on bounds and mass balances.
    pub eps: f64,
    /// Tolerance when matching a required Walther contribution or a fixed-only
    /// blend against the mixture constraint.
    pub match_tol: f64,
    /// Two components whose Walther coordinates differ by less than this are
    /// treated as the same fluid when solving a pair.
    pub singular_tol: f64,
    /// Maximum bound combinations enumerated per component pair.
    pub combination_cap: u64,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            eps: 1e-9,
            match_tol: 1e-6,
            singular_tol: 1e-12,
            combination_cap: 200_000,
        }
    }
}

impl BlendConfig {
    /// Number of bound combinations for a pair when `others` components are
    /// pinned to a bound, or `None` when that exceeds the cap.
    pub fn combinations_for(&self, others: usize) -> Option<u64> {
        if others >= 64 {
            return None;
        }
        let combos = 1u64 << others;
        (combos <= self.combination_cap).then_some(combos)
    }
}
