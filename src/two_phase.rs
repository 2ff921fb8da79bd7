use super::*;
use log::{debug, warn};
use std::cell::Cell;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

/// Outcome of one solve, with the statistics of how it was found.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub phase1: Vec<Move>,
    pub phase2: Vec<Move>,
    pub phase1_time: Duration,
    pub phase2_time: Duration,
    /// Phase-1 candidates handed to phase 2.
    pub probes: usize,
    /// Search nodes expanded over both phases.
    pub nodes: u64,
    pub success: bool,
}

impl Solution {
    pub fn moves(&self) -> Vec<Move> {
        self.phase1.iter().chain(&self.phase2).copied().collect()
    }

    pub fn len(&self) -> usize {
        self.phase1.len() + self.phase2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_time(&self) -> Duration {
        self.phase1_time + self.phase2_time
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", format_moves(&self.moves()))
    }
}

/// Anything able to turn a cube state into a solving move sequence.
pub trait Solver {
    fn solve_detailed(&self, cube: &CubeState) -> Solution;

    /// Solving moves, or an empty sequence when the cube is already solved or
    /// no solution was found; `solve_detailed` tells the two apart.
    fn solve(&self, cube: &CubeState) -> Vec<Move> {
        let solution = self.solve_detailed(cube);

        if solution.success {
            solution.moves()
        } else {
            Vec::new()
        }
    }
}

/// Time allowed for improving on the first solution, counted from the moment
/// it is found.
struct Deadline {
    timeout: Duration,
    at: Cell<Option<Instant>>,
}

impl Deadline {
    fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            at: Cell::new(None),
        }
    }

    fn start(&self) {
        if self.at.get().is_none() {
            self.at.set(Some(Instant::now() + self.timeout));
        }
    }

    fn started(&self) -> bool {
        self.at.get().is_some()
    }

    fn expired(&self) -> bool {
        self.at.get().is_some_and(|at| Instant::now() >= at)
    }
}

pub struct TwoPhaseSolver<'a> {
    tables: &'a Tables,
    config: SolverConfig,
}

impl<'a> TwoPhaseSolver<'a> {
    pub fn new(tables: &'a Tables, config: SolverConfig) -> Self {
        Self { tables, config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Validates `cube` before solving it.
    pub fn try_solve(&self, cube: &CubeState) -> Result<Solution, SolveError> {
        cube.validate()?;
        let solution = self.search(cube);

        if solution.success {
            Ok(solution)
        } else {
            Err(SolveError::DepthExhausted(
                self.config.phase1_max_depth + self.config.phase2_max_depth,
            ))
        }
    }

    /// Phase-1 solutions come in order of increasing length; each is finished
    /// by phase 2 within the length of the best solution so far. The first
    /// complete one is kept unless a strictly shorter one turns up within
    /// `timeout` of it.
    fn search(&self, cube: &CubeState) -> Solution {
        let start = Instant::now();
        let deadline = Deadline::new(self.config.timeout);
        let stop = || deadline.expired();
        let phase1 = Phase1Solver::new(self.tables, self.config.phase1_max_depth);
        let phase2 = Phase2Solver::new(self.tables, self.config.phase2_max_depth);
        let mut result = Solution::default();
        let mut best_len = usize::MAX;
        let mut done = false;

        for depth in phase1.bound(cube)..=self.config.phase1_max_depth {
            if done || depth >= best_len || stop() {
                break;
            }
            let search = phase1.search_depth(cube, depth, &stop, &mut |movs, g1_cube| {
                // Ending on a G1 move means the prefix was already in G1.
                if movs.last().is_some_and(|mv| mv.is_g1()) {
                    return ControlFlow::Continue(());
                }
                if best_len <= depth || stop() {
                    done = true;
                    return ControlFlow::Break(());
                }
                let budget = self.config.phase2_max_depth.min(best_len - depth - 1);
                let timer = Instant::now();
                let (found_p2, p2_search) = phase2.first_solution(g1_cube, budget, &stop);

                result.phase2_time += timer.elapsed();
                result.nodes += p2_search.nodes;
                result.probes += 1;
                if let Some(p2) = found_p2 {
                    best_len = depth + p2.len();
                    debug!(
                        "solution of {} moves ({} + {}) after {:?}",
                        best_len,
                        depth,
                        p2.len(),
                        start.elapsed()
                    );
                    result.phase1 = movs.to_vec();
                    result.phase2 = p2;
                    deadline.start();
                    if best_len <= depth || self.config.max_length.is_some_and(|max| best_len <= max) {
                        done = true;
                        return ControlFlow::Break(());
                    }
                }
                ControlFlow::Continue(())
            });
            result.nodes += search.nodes;
        }

        result.success = deadline.started();
        result.phase1_time = start.elapsed().saturating_sub(result.phase2_time);
        if !result.success {
            debug!("no solution after {} probes", result.probes);
        }
        result
    }
}

impl Solver for TwoPhaseSolver<'_> {
    fn solve_detailed(&self, cube: &CubeState) -> Solution {
        if let Err(err) = cube.validate() {
            warn!("refusing to solve: {}", err);
            return Solution::default();
        }
        self.search(cube)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solver() -> TwoPhaseSolver<'static> {
        TwoPhaseSolver::new(Tables::global(), SolverConfig::default())
    }

    fn scrambled(s: &str) -> CubeState {
        CubeState::from_moves(&parse_moves(s).unwrap())
    }

    #[test]
    fn solved_cube() {
        let solution = solver().solve_detailed(&CubeState::SOLVED);

        assert!(solution.success);
        assert!(solution.is_empty());
        assert_eq!(solution.probes, 1);
        assert_eq!(solver().solve(&CubeState::SOLVED), vec![]);
    }

    #[test]
    fn invalid_cube() {
        let mut cube = CubeState::SOLVED;
        cube.eo[0] = 1;

        assert!(!solver().solve_detailed(&cube).success);
        assert_eq!(solver().solve(&cube), vec![]);
        assert_eq!(
            solver().try_solve(&cube),
            Err(SolveError::InvalidState(InvalidStateError::EdgeOrientation))
        );
    }

    #[test]
    fn keeps_shorter_candidate() {
        // R leaves R2 for phase 2, R' solves outright.
        let cube = CubeState::SOLVED.apply(Move(Right, Cw));
        let solution = solver().solve_detailed(&cube);

        assert_eq!(solution.phase1, vec![Move(Right, Ccw)]);
        assert!(solution.phase2.is_empty());
        assert_eq!(solution.probes, 2);
    }

    #[test]
    fn first_solution_config() {
        let cube = scrambled("R U2 F'");
        let solver = TwoPhaseSolver::new(Tables::global(), SolverConfig::first_solution());
        let solution = solver.solve_detailed(&cube);

        assert!(solution.success);
        assert_eq!(solution.probes, 1);
        assert!(cube.apply_all(&solution.phase1).is_in_g1());
        assert!(cube.apply_all(&solution.moves()).is_solved());
    }

    #[test]
    fn deadline_starts_with_first_solution() {
        let deadline = Deadline::new(Duration::ZERO);

        assert!(!deadline.started());
        assert!(!deadline.expired());
        deadline.start();
        assert!(deadline.started());
        assert!(deadline.expired());

        let deadline = Deadline::new(Duration::from_secs(3_600));
        deadline.start();
        assert!(!deadline.expired());
    }

    #[test]
    fn timeout_counts_from_first_solution() {
        let timeout = Duration::from_millis(50);
        let solver = TwoPhaseSolver::new(
            Tables::global(),
            SolverConfig::default().with_timeout(timeout),
        );
        let solution = solver.solve_detailed(&scrambled("F2 R' B L2 D' R U F' L B2 U' R2"));

        assert!(solution.success);
        assert!(solution.total_time() >= timeout);
    }

    #[test]
    fn phase_limits() {
        let cube = scrambled("R U F D");
        let config = SolverConfig {
            phase1_max_depth: 1,
            ..SolverConfig::default()
        };
        let solver = TwoPhaseSolver::new(Tables::global(), config);

        assert!(!solver.solve_detailed(&cube).success);
        assert_eq!(solver.try_solve(&cube), Err(SolveError::DepthExhausted(19)));
    }
}
