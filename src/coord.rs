//! Integer projections of a `CubeState` used to index pruning tables.
//!
//! Every coordinate is 0 on the solved cube. The three phase-1 coordinates are
//! defined on any state; the permutation coordinates of the edges only make
//! sense once the UD-slice edges are back in the UD-slice (in G1).

use super::*;

pub const N_TWIST: usize = 2_187;
pub const N_FLIP: usize = 2_048;
pub const N_SLICE: usize = 495;
pub const N_CORNER_PERM: usize = 40_320;
pub const N_UD_EDGE_PERM: usize = 40_320;
pub const N_SLICE_PERM: usize = 24;
pub const N_CORNER_SLICE_PERM: usize = N_CORNER_PERM * N_SLICE_PERM;

const fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let mut result = 1;
    let mut i = 0;
    while i < k {
        result = result * (n - i) / (i + 1);
        i += 1;
    }
    result
}

/// Lehmer rank of a permutation of `0..perm.len()`.
fn perm_rank(perm: &[u8]) -> usize {
    let mut result = 0;

    for (i, &p) in perm.iter().enumerate() {
        let smaller = perm[i + 1..].iter().filter(|&&q| q < p).count();
        result = result * (perm.len() - i) + smaller;
    }
    result
}

/// Base-3 twists of corners URF..DBL; the DRB twist follows from the others.
pub fn corner_orientation(cube: &CubeState) -> usize {
    cube.co[..7]
        .iter()
        .fold(0, |acc, &o| acc * 3 + o as usize)
}

/// Base-2 flips of edges UR..BL; the BR flip follows from the others.
pub fn edge_orientation(cube: &CubeState) -> usize {
    cube.eo[..11]
        .iter()
        .fold(0, |acc, &o| acc * 2 + o as usize)
}

/// Which four slots hold the UD-slice edges, regardless of their order.
pub fn ud_slice(cube: &CubeState) -> usize {
    let mut result = 0;
    let mut found = 0;

    for j in (0..12).rev() {
        if cube.ep[j] >= 8 {
            found += 1;
            result += binomial(11 - j, found);
        }
    }
    result
}

pub fn corner_permutation(cube: &CubeState) -> usize {
    perm_rank(&cube.cp)
}

/// Order of the eight U/D-layer edges within slots UR..DB.
pub fn ud_edge_permutation(cube: &CubeState) -> usize {
    perm_rank(&cube.ep[..8])
}

/// Order of the four UD-slice edges within slots FR..BR.
pub fn slice_edge_permutation(cube: &CubeState) -> usize {
    let mut slice = [0u8; 4];

    for (dst, &e) in slice.iter_mut().zip(&cube.ep[8..]) {
        *dst = e.saturating_sub(8);
    }
    perm_rank(&slice)
}

/// Corner permutation and slice edge permutation taken together. Phase 2
/// needs both solved at once, so this bound is far tighter than either one.
pub fn corner_slice_permutation(cube: &CubeState) -> usize {
    corner_permutation(cube) * N_SLICE_PERM + slice_edge_permutation(cube)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn solved_is_zero() {
        let cube = CubeState::SOLVED;

        assert_eq!(corner_orientation(&cube), 0);
        assert_eq!(edge_orientation(&cube), 0);
        assert_eq!(ud_slice(&cube), 0);
        assert_eq!(corner_permutation(&cube), 0);
        assert_eq!(ud_edge_permutation(&cube), 0);
        assert_eq!(slice_edge_permutation(&cube), 0);
        assert_eq!(corner_slice_permutation(&cube), 0);
    }

    #[test]
    fn ranks() {
        assert_eq!(binomial(12, 4), N_SLICE);
        assert_eq!(binomial(3, 4), 0);
        assert_eq!(perm_rank(&[0, 1, 2]), 0);
        assert_eq!(perm_rank(&[2, 1, 0]), 5);
        assert_eq!(perm_rank(&[7, 6, 5, 4, 3, 2, 1, 0]), N_CORNER_PERM - 1);
    }

    #[test]
    fn coordinates_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut slices = HashSet::new();

        for _ in 0..2_000 {
            let (cube, _) = CubeState::scramble(&mut rng, 20, 0);
            assert!(corner_orientation(&cube) < N_TWIST);
            assert!(edge_orientation(&cube) < N_FLIP);
            assert!(corner_permutation(&cube) < N_CORNER_PERM);
            let slice = ud_slice(&cube);
            assert!(slice < N_SLICE);
            slices.insert(slice);
        }
        assert!(slices.len() > 400);
    }

    #[test]
    fn g1_coordinates() {
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..200 {
            let (cube, _) = CubeState::scramble(&mut rng, 15, 1);
            assert_eq!(corner_orientation(&cube), 0);
            assert_eq!(edge_orientation(&cube), 0);
            assert_eq!(ud_slice(&cube), 0);
            assert!(ud_edge_permutation(&cube) < N_UD_EDGE_PERM);
            assert!(slice_edge_permutation(&cube) < N_SLICE_PERM);
            assert_eq!(
                corner_slice_permutation(&cube) / N_SLICE_PERM,
                corner_permutation(&cube)
            );
            assert!(corner_slice_permutation(&cube) < N_CORNER_SLICE_PERM);
        }
    }

    #[test]
    fn coordinates_follow_moves() {
        // States sharing a coordinate value must share it after any move.
        let mut rng = StdRng::seed_from_u64(13);
        const KEY_GENS: [fn(&CubeState) -> usize; 3] =
            [corner_orientation, edge_orientation, ud_slice];
        let mut seen: HashMap<(usize, usize), [usize; 18]> = HashMap::new();

        for _ in 0..3_000 {
            let (cube, _) = CubeState::scramble(&mut rng, 20, 0);
            for (id, key_gen) in KEY_GENS.iter().enumerate() {
                let next: [usize; 18] =
                    std::array::from_fn(|i| key_gen(&cube.apply(Move::MOV_SET[i])));
                assert_eq!(*seen.entry((id, key_gen(&cube))).or_insert(next), next);
            }
        }
    }
}
