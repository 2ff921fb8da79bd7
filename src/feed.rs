use super::*;
use crossbeam::channel::{self, Receiver, Sender};
use log::trace;

/// Queue through which a front end hands moves to the core. Producers push
/// from any thread; the owner drains them, in order, into the cube it tracks.
pub struct MoveFeed {
    tx: Sender<Move>,
    rx: Receiver<Move>,
    cube: CubeState,
    history: Vec<Move>,
}

impl Default for MoveFeed {
    fn default() -> Self {
        Self::new(CubeState::SOLVED)
    }
}

impl MoveFeed {
    pub fn new(cube: CubeState) -> Self {
        let (tx, rx) = channel::unbounded();

        Self {
            tx,
            rx,
            cube,
            history: Vec::new(),
        }
    }

    /// A handle for another thread to push moves with.
    pub fn producer(&self) -> Sender<Move> {
        self.tx.clone()
    }

    pub fn push(&self, mv: Move) {
        // The feed holds a receiver, so the channel is never disconnected.
        let _ = self.tx.send(mv);
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Applies every queued move and returns how many there were.
    pub fn drain(&mut self) -> usize {
        let mut count = 0;

        for mv in self.rx.try_iter() {
            trace!("feed: {}", mv);
            self.cube.rotate(mv);
            self.history.push(mv);
            count += 1;
        }
        count
    }

    pub fn cube(&self) -> &CubeState {
        &self.cube
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Drains the queue and solves the resulting cube.
    pub fn solve_with(&mut self, solver: &dyn Solver) -> Solution {
        self.drain();
        solver.solve_detailed(&self.cube)
    }
}
