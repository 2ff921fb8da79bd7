use super::*;
use log::{debug, trace};
use std::ops::ControlFlow;

/// Nodes expanded between two calls to the stop callback.
const STOP_CHECK: u64 = 0x400;

/// Counters of one or more bounded searches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Search {
    pub nodes: u64,
    pub stopped: bool,
}

/// One phase of the two-phase algorithm: a move set, an admissible distance
/// bound and a goal test. The provided methods run IDA* over them.
pub trait Phase {
    fn name(&self) -> &'static str;
    fn movs(&self) -> &'static [Move];
    fn bound(&self, cube: &CubeState) -> usize;
    fn is_goal(&self, cube: &CubeState) -> bool;

    /// Depth-first search for sequences of exactly `depth` moves reaching the
    /// goal. Every one found is handed to `visit` until it breaks or `stop`
    /// returns true.
    fn search_depth(
        &self,
        cube: &CubeState,
        depth: usize,
        stop: &dyn Fn() -> bool,
        visit: &mut dyn FnMut(&[Move], &CubeState) -> ControlFlow<()>,
    ) -> Search {
        let mut ida = Ida {
            phase: self,
            cube: *cube,
            mov_stack: Vec::with_capacity(depth),
            stop,
            nodes: 0,
            stopped: false,
        };

        let _ = ida.rec_search(depth, visit);
        Search {
            nodes: ida.nodes,
            stopped: ida.stopped,
        }
    }

    /// IDA*: the first sequence found at the smallest depth up to `max_depth`.
    fn first_solution(
        &self,
        cube: &CubeState,
        max_depth: usize,
        stop: &dyn Fn() -> bool,
    ) -> (Option<Vec<Move>>, Search) {
        let mut total = Search::default();

        for depth in self.bound(cube)..=max_depth {
            if stop() {
                total.stopped = true;
                break;
            }
            let mut found = None;
            let search = self.search_depth(cube, depth, stop, &mut |movs, _| {
                found = Some(movs.to_vec());
                ControlFlow::Break(())
            });
            trace!("{} depth {}: {} nodes", self.name(), depth, search.nodes);
            total.nodes += search.nodes;
            if found.is_some() {
                return (found, total);
            }
            if search.stopped {
                total.stopped = true;
                break;
            }
        }
        (None, total)
    }
}

struct Ida<'a, P: Phase + ?Sized> {
    phase: &'a P,
    cube: CubeState,
    mov_stack: Vec<Move>,
    stop: &'a dyn Fn() -> bool,
    nodes: u64,
    stopped: bool,
}

impl<'a, P: Phase + ?Sized> Ida<'a, P> {
    fn do_mov(&mut self, mv: Move) {
        self.mov_stack.push(mv);
        self.cube.rotate(mv);
    }

    fn undo_mov(&mut self) {
        if let Some(mv) = self.mov_stack.pop() {
            self.cube.rotate(mv.inverse());
        }
    }

    fn rec_search(
        &mut self,
        depth: usize,
        visit: &mut dyn FnMut(&[Move], &CubeState) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        self.nodes += 1;
        if self.nodes % STOP_CHECK == 0 && (self.stop)() {
            self.stopped = true;
            return ControlFlow::Break(());
        }
        if depth == 0 {
            return if self.phase.is_goal(&self.cube) {
                visit(&self.mov_stack, &self.cube)
            } else {
                ControlFlow::Continue(())
            };
        }
        if self.phase.bound(&self.cube) > depth {
            return ControlFlow::Continue(());
        }
        for &mv in self.phase.movs() {
            if !mv.follows(self.mov_stack.last().copied()) {
                continue;
            }
            self.do_mov(mv);
            let flow = self.rec_search(depth - 1, visit);
            self.undo_mov();
            if flow.is_break() {
                return flow;
            }
        }
        ControlFlow::Continue(())
    }
}

/// Reduces any cube to G1 using all 18 moves.
pub struct Phase1Solver<'a> {
    tables: &'a Tables,
    max_depth: usize,
}

impl<'a> Phase1Solver<'a> {
    pub fn new(tables: &'a Tables, max_depth: usize) -> Self {
        Self { tables, max_depth }
    }

    /// Lower bound on the number of moves needed to reach G1.
    pub fn heuristic(&self, cube: &CubeState) -> usize {
        self.bound(cube)
    }

    pub fn solve(&self, cube: &CubeState) -> Result<Vec<Move>, SolveError> {
        let (found, search) = self.first_solution(cube, self.max_depth, &|| false);

        debug!("phase 1: {} nodes", search.nodes);
        found.ok_or(SolveError::DepthExhausted(self.max_depth))
    }
}

impl Phase for Phase1Solver<'_> {
    fn name(&self) -> &'static str {
        "phase 1"
    }

    fn movs(&self) -> &'static [Move] {
        &Move::MOV_SET
    }

    fn bound(&self, cube: &CubeState) -> usize {
        self.tables.phase1_bound(cube)
    }

    fn is_goal(&self, cube: &CubeState) -> bool {
        cube.is_in_g1()
    }
}

/// Solves a cube already in G1 using G1 moves only.
pub struct Phase2Solver<'a> {
    tables: &'a Tables,
    max_depth: usize,
}

impl<'a> Phase2Solver<'a> {
    pub fn new(tables: &'a Tables, max_depth: usize) -> Self {
        Self { tables, max_depth }
    }

    pub fn heuristic(&self, cube: &CubeState) -> usize {
        self.bound(cube)
    }

    pub fn solve(&self, cube: &CubeState) -> Result<Vec<Move>, SolveError> {
        if !cube.is_in_g1() {
            return Err(SolveError::Phase2PreconditionViolated);
        }
        let (found, search) = self.first_solution(cube, self.max_depth, &|| false);

        debug!("phase 2: {} nodes", search.nodes);
        found.ok_or(SolveError::DepthExhausted(self.max_depth))
    }
}

impl Phase for Phase2Solver<'_> {
    fn name(&self) -> &'static str {
        "phase 2"
    }

    fn movs(&self) -> &'static [Move] {
        &Move::G1_SET
    }

    fn bound(&self, cube: &CubeState) -> usize {
        self.tables.phase2_bound(cube)
    }

    fn is_goal(&self, cube: &CubeState) -> bool {
        cube.is_solved()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scrambled(s: &str) -> CubeState {
        CubeState::from_moves(&parse_moves(s).unwrap())
    }

    #[test]
    fn phase1_single_move() {
        let phase1 = Phase1Solver::new(Tables::global(), 12);
        let movs = phase1.solve(&scrambled("R")).unwrap();

        assert_eq!(movs.len(), 1);
        assert!(scrambled("R").apply_all(&movs).is_in_g1());
        assert_eq!(phase1.solve(&CubeState::SOLVED).unwrap(), vec![]);
    }

    #[test]
    fn phase1_reaches_g1() {
        let phase1 = Phase1Solver::new(Tables::global(), 12);
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..10 {
            let (cube, movs) = CubeState::scramble(&mut rng, 6, 0);
            let sol = phase1.solve(&cube).unwrap();
            assert!(cube.apply_all(&sol).is_in_g1());
            assert!(sol.len() <= movs.len());
        }
    }

    #[test]
    fn phase1_depth_exhausted() {
        let phase1 = Phase1Solver::new(Tables::global(), 2);

        assert_eq!(
            phase1.solve(&scrambled("R U F")),
            Err(SolveError::DepthExhausted(2))
        );
    }

    #[test]
    fn heuristic_never_overestimates() {
        let tables = Tables::global();
        let phase1 = Phase1Solver::new(tables, 12);
        let phase2 = Phase2Solver::new(tables, 18);
        let mut rng = StdRng::seed_from_u64(17);

        for len in 0..12 {
            for _ in 0..20 {
                let (cube, _) = CubeState::scramble(&mut rng, len, 0);
                assert!(phase1.heuristic(&cube) <= len);
                let (g1_cube, _) = CubeState::scramble(&mut rng, len, 1);
                assert!(phase2.heuristic(&g1_cube) <= len);
            }
        }
    }

    #[test]
    fn phase2_precondition() {
        let phase2 = Phase2Solver::new(Tables::global(), 18);

        assert_eq!(
            phase2.solve(&scrambled("F")),
            Err(SolveError::Phase2PreconditionViolated)
        );
        assert_eq!(phase2.solve(&CubeState::SOLVED).unwrap(), vec![]);
    }

    #[test]
    fn phase2_uses_g1_moves() {
        let phase2 = Phase2Solver::new(Tables::global(), 18);
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..10 {
            let (cube, movs) = CubeState::scramble(&mut rng, 8, 1);
            let sol = phase2.solve(&cube).unwrap();
            assert!(cube.apply_all(&sol).is_solved());
            assert!(sol.len() <= movs.len());
            assert!(sol.iter().all(|mv| Move::G1_SET.contains(mv)));
            assert!(sol.windows(2).all(|w| w[1].follows(Some(w[0]))));
        }
    }

    #[test]
    fn search_depth_enumerates() {
        let phase1 = Phase1Solver::new(Tables::global(), 12);
        let mut found = Vec::new();

        phase1.search_depth(&scrambled("R"), 1, &|| false, &mut |movs, _| {
            found.push(format_moves(movs));
            ControlFlow::Continue(())
        });
        assert_eq!(found, vec!["R", "R'"]);
    }

    #[test]
    fn stop_interrupts() {
        let phase1 = Phase1Solver::new(Tables::global(), 12);
        let cube = scrambled("R U F D L B R2 F' U2 L'");

        let search = phase1.search_depth(&cube, 9, &|| true, &mut |_, _| {
            ControlFlow::Continue(())
        });
        assert!(search.nodes <= STOP_CHECK);
        assert_eq!(search.stopped, search.nodes == STOP_CHECK);

        let (found, search) = phase1.first_solution(&cube, 12, &|| true);
        assert_eq!(found, None);
        assert_eq!(search, Search { nodes: 0, stopped: true });
    }
}
