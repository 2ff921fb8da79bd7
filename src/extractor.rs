use super::*;
use crossbeam::thread;
use log::{debug, info, warn};
use std::time::Instant;

pub struct TableInfos {
    pub id: Id,
    pub name: &'static str,
    pub key_gen: fn(&CubeState) -> usize,
    pub size: usize,
    pub movs: &'static [Move],
    /// Largest distance in the finished table. Every entry is reachable.
    pub max_depth: u8,
}

pub static TAB_INF: [TableInfos; 7] = [
    TableInfos {
        id: 1,
        name: "corner orientation",
        key_gen: coord::corner_orientation,
        size: coord::N_TWIST,
        movs: &Move::MOV_SET,
        max_depth: 6,
    },
    TableInfos {
        id: 2,
        name: "edge orientation",
        key_gen: coord::edge_orientation,
        size: coord::N_FLIP,
        movs: &Move::MOV_SET,
        max_depth: 7,
    },
    TableInfos {
        id: 3,
        name: "UD-slice",
        key_gen: coord::ud_slice,
        size: coord::N_SLICE,
        movs: &Move::MOV_SET,
        max_depth: 5,
    },
    TableInfos {
        id: 4,
        name: "corner permutation",
        key_gen: coord::corner_permutation,
        size: coord::N_CORNER_PERM,
        movs: &Move::G1_SET,
        max_depth: 13,
    },
    TableInfos {
        id: 5,
        name: "UD edge permutation",
        key_gen: coord::ud_edge_permutation,
        size: coord::N_UD_EDGE_PERM,
        movs: &Move::G1_SET,
        max_depth: 8,
    },
    TableInfos {
        id: 6,
        name: "slice edge permutation",
        key_gen: coord::slice_edge_permutation,
        size: coord::N_SLICE_PERM,
        movs: &Move::G1_SET,
        max_depth: 4,
    },
    TableInfos {
        id: 7,
        name: "corner and slice permutation",
        key_gen: coord::corner_slice_permutation,
        size: coord::N_CORNER_SLICE_PERM,
        movs: &Move::G1_SET,
        max_depth: 14,
    },
];

/// Breadth-first search over the move graph a coordinate induces, starting
/// from the solved cube. One representative state is kept per newly reached
/// coordinate value; any other state with that value leads to the same
/// successor values.
pub struct Extractor<'a> {
    inf: &'a TableInfos,
    dists: Vec<u8>,
    frontier: Vec<CubeState>,
}

impl<'a> Extractor<'a> {
    pub fn infos(id: Id) -> Option<&'static TableInfos> {
        TAB_INF.iter().find(|inf| inf.id == id)
    }

    pub fn new(inf: &'a TableInfos) -> Self {
        let mut dists = vec![UNSEEN; inf.size];

        dists[(inf.key_gen)(&CubeState::SOLVED)] = 0;
        Self {
            inf,
            dists,
            frontier: vec![CubeState::SOLVED],
        }
    }

    /// Expands the current frontier by one move and returns how many
    /// coordinate values were reached for the first time.
    fn expand(&mut self, depth: u8) -> usize {
        let mut next = Vec::with_capacity(self.frontier.len() * 2);

        for cube in &self.frontier {
            for mv in self.inf.movs {
                let child = cube.apply(*mv);
                let key = (self.inf.key_gen)(&child);
                if self.dists[key] == UNSEEN {
                    self.dists[key] = depth;
                    next.push(child);
                }
            }
        }
        let found = next.len();
        self.frontier = next;
        found
    }

    pub fn bfs_search(inf: &TableInfos) -> PruneTable {
        let start = Instant::now();
        let mut extractor = Extractor::new(inf);
        let mut depth = 0;

        while !extractor.frontier.is_empty() {
            depth += 1;
            let found = extractor.expand(depth);
            debug!("table {} depth {}: {} new entries", inf.id, depth, found);
        }

        let unseen = extractor.dists.iter().filter(|&&d| d == UNSEEN).count();
        if unseen > 0 {
            warn!("table {} ({}): {} unreachable entries", inf.id, inf.name, unseen);
        }
        let table = PruneTable::new(inf, extractor.dists);
        info!(
            "table {} ({}) built: {} entries, max depth {} in {:?}",
            inf.id,
            inf.name,
            table.len(),
            table.max_depth(),
            start.elapsed()
        );
        table
    }

    /// Builds every requested table on its own scoped thread.
    pub fn mt_search(infos: &[&TableInfos]) -> Vec<PruneTable> {
        thread::scope(|s| {
            let thrds: Vec<_> = infos
                .iter()
                .map(|inf| s.spawn(move |_| Self::bfs_search(inf)))
                .collect();

            thrds
                .into_iter()
                .map(|thrd| {
                    thrd.join()
                        .unwrap_or_else(|err| std::panic::resume_unwind(err))
                })
                .collect()
        })
        .unwrap_or_else(|err| std::panic::resume_unwind(err))
    }
}
