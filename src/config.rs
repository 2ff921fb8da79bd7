use std::time::Duration;

/// Search limits for `TwoPhaseSolver`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Deepest phase-1 bound tried before giving up.
    pub phase1_max_depth: usize,
    /// Deepest phase-2 bound tried for one phase-1 candidate.
    pub phase2_max_depth: usize,
    /// Once a solution exists, keep looking for shorter ones this long.
    pub timeout: Duration,
    /// Stop as soon as a solution this short is found.
    pub max_length: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            phase1_max_depth: 12,
            phase2_max_depth: 18,
            timeout: Duration::from_secs(1),
            max_length: None,
        }
    }
}

impl SolverConfig {
    /// Plain phase 1 then phase 2: return the first complete solution.
    ///
    /// Phase 2 starts afresh, so the two halves may meet on one face: a single
    /// `R` comes back as `R R2` where a longer search finds `R'`.
    pub fn first_solution() -> Self {
        Self {
            timeout: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }
}
