use super::*;
use rand::seq::SliceRandom;
use rand::Rng;

/// Combinatorial state of the 20 movable pieces.
///
/// Slot `i` of `cp` holds the corner piece currently sitting in corner slot
/// `i` and `co[i]` its twist; `ep`/`eo` do the same for edges. Corners are
/// numbered URF, UFL, ULB, UBR, DFR, DLF, DBL, DRB and edges UR, UF, UL, UB,
/// DR, DF, DL, DB, FR, FL, BL, BR, so the last four edges form the UD-slice.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct CubeState {
    pub cp: [u8; 8],
    pub co: [u8; 8],
    pub ep: [u8; 12],
    pub eo: [u8; 12],
}

/// Effect of a clockwise quarter turn of one face, in "replaced by" form.
struct FaceTurn {
    cp: [u8; 8],
    co: [u8; 8],
    ep: [u8; 12],
    eo: [u8; 12],
}

impl std::fmt::Display for CubeState {
    fn fmt(&self, fm: &mut std::fmt::Formatter) -> std::fmt::Result {
        let facelets = self.facelet_faces();
        let mut result = String::with_capacity(0x400);

        for line in Self::net_face(&facelets, Up).chunks(3) {
            result.push_str(&format!("         {}\n", Self::row_2_str(line)));
        }
        result.push('\n');
        for row in 0..3 {
            result.push(' ');
            for face in [Left, Front, Right, Back] {
                result.push_str(&format!(
                    "{}  ",
                    Self::row_2_str(&Self::net_face(&facelets, face)[row * 3..row * 3 + 3])
                ));
            }
            result.push('\n');
        }
        result.push('\n');
        for line in Self::net_face(&facelets, Down).chunks(3) {
            result.push_str(&format!("         {}\n", Self::row_2_str(line)));
        }
        write!(fm, "{}", result)
    }
}

impl Default for CubeState {
    fn default() -> Self {
        Self::SOLVED
    }
}

impl CubeState {
    pub const SOLVED: CubeState = CubeState {
        cp: [0, 1, 2, 3, 4, 5, 6, 7],
        co: [0; 8],
        ep: [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        eo: [0; 12],
    };

    const FACE_TURNS: [FaceTurn; 6] = [
        FaceTurn {
            cp: [3, 0, 1, 2, 4, 5, 6, 7],
            co: [0; 8],
            ep: [3, 0, 1, 2, 4, 5, 6, 7, 8, 9, 10, 11],
            eo: [0; 12],
        },
        FaceTurn {
            cp: [4, 1, 2, 0, 7, 5, 6, 3],
            co: [2, 0, 0, 1, 1, 0, 0, 2],
            ep: [8, 1, 2, 3, 11, 5, 6, 7, 4, 9, 10, 0],
            eo: [0; 12],
        },
        FaceTurn {
            cp: [1, 5, 2, 3, 0, 4, 6, 7],
            co: [1, 2, 0, 0, 2, 1, 0, 0],
            ep: [0, 9, 2, 3, 4, 8, 6, 7, 1, 5, 10, 11],
            eo: [0, 1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0],
        },
        FaceTurn {
            cp: [0, 1, 2, 3, 5, 6, 7, 4],
            co: [0; 8],
            ep: [0, 1, 2, 3, 5, 6, 7, 4, 8, 9, 10, 11],
            eo: [0; 12],
        },
        FaceTurn {
            cp: [0, 2, 6, 3, 4, 1, 5, 7],
            co: [0, 1, 2, 0, 0, 2, 1, 0],
            ep: [0, 1, 10, 3, 4, 5, 9, 7, 8, 2, 6, 11],
            eo: [0; 12],
        },
        FaceTurn {
            cp: [0, 1, 3, 7, 4, 5, 2, 6],
            co: [0, 0, 1, 2, 0, 0, 2, 1],
            ep: [0, 1, 2, 11, 4, 5, 6, 10, 8, 9, 3, 7],
            eo: [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 1],
        },
    ];

    /// Facelets touched by each corner slot, starting with its U/D sticker.
    const CORNER_FACELETS: [[Id; 3]; 8] = [
        [8, 9, 20],
        [6, 18, 38],
        [0, 36, 47],
        [2, 45, 11],
        [29, 26, 15],
        [27, 44, 24],
        [33, 53, 42],
        [35, 17, 51],
    ];

    const EDGE_FACELETS: [[Id; 2]; 12] = [
        [5, 10],
        [7, 19],
        [3, 37],
        [1, 46],
        [32, 16],
        [28, 25],
        [30, 43],
        [34, 52],
        [23, 12],
        [21, 41],
        [50, 39],
        [48, 14],
    ];

    const CORNER_COLORS: [[Face; 3]; 8] = [
        [Up, Right, Front],
        [Up, Front, Left],
        [Up, Left, Back],
        [Up, Back, Right],
        [Down, Front, Right],
        [Down, Left, Front],
        [Down, Back, Left],
        [Down, Right, Back],
    ];

    const EDGE_COLORS: [[Face; 2]; 12] = [
        [Up, Right],
        [Up, Front],
        [Up, Left],
        [Up, Back],
        [Down, Right],
        [Down, Front],
        [Down, Left],
        [Down, Back],
        [Front, Right],
        [Front, Left],
        [Back, Left],
        [Back, Right],
    ];

    pub fn new() -> Self {
        Self::SOLVED
    }

    pub fn from_moves(movs: &[Move]) -> Self {
        let mut result = Self::new();

        for mv in movs {
            result.rotate(*mv);
        }
        result
    }

    /// Applies one clockwise quarter turn of `face` in place.
    fn quarter_turn(&mut self, face: Face) {
        let turn = &Self::FACE_TURNS[face as usize];
        let (cp, co, ep, eo) = (self.cp, self.co, self.ep, self.eo);

        for i in 0..8 {
            let from = turn.cp[i] as usize;
            self.cp[i] = cp[from];
            self.co[i] = (co[from] + turn.co[i]) % 3;
        }
        for i in 0..12 {
            let from = turn.ep[i] as usize;
            self.ep[i] = ep[from];
            self.eo[i] = (eo[from] + turn.eo[i]) % 2;
        }
    }

    pub fn rotate(&mut self, mov: Move) {
        let Move(face, rot) = mov;

        for _ in 0..rot.quarters() {
            self.quarter_turn(face);
        }
    }

    pub fn apply(&self, mov: Move) -> CubeState {
        let mut result = *self;

        result.rotate(mov);
        result
    }

    pub fn apply_all(&self, movs: &[Move]) -> CubeState {
        let mut result = *self;

        for mv in movs {
            result.rotate(*mv);
        }
        result
    }

    pub fn is_solved(&self) -> bool {
        *self == Self::SOLVED
    }

    /// True when every piece is oriented and the four UD-slice edges sit in
    /// UD-slice slots.
    pub fn is_in_g1(&self) -> bool {
        self.co.iter().all(|&o| o == 0)
            && self.eo.iter().all(|&o| o == 0)
            && self.ep[8..].iter().all(|&e| e >= 8)
    }

    fn is_permutation(perm: &[u8]) -> bool {
        let mut seen = [false; 12];

        perm.iter().all(|&p| {
            let p = p as usize;
            p < perm.len() && !std::mem::replace(&mut seen[p], true)
        })
    }

    /// Parity of a permutation: `true` when odd.
    pub fn parity(perm: &[u8]) -> bool {
        let mut odd = false;

        for i in 0..perm.len() {
            for j in i + 1..perm.len() {
                if perm[i] > perm[j] {
                    odd = !odd;
                }
            }
        }
        odd
    }

    pub fn validate(&self) -> Result<(), InvalidStateError> {
        if !Self::is_permutation(&self.cp) {
            return Err(InvalidStateError::CornerPermutation);
        }
        if !Self::is_permutation(&self.ep) {
            return Err(InvalidStateError::EdgePermutation);
        }
        if let Some(&twist) = self.co.iter().find(|&&o| o > 2) {
            return Err(InvalidStateError::Value {
                piece: "corner",
                value: twist,
            });
        }
        if let Some(&flip) = self.eo.iter().find(|&&o| o > 1) {
            return Err(InvalidStateError::Value {
                piece: "edge",
                value: flip,
            });
        }
        if self.co.iter().map(|&o| o as u32).sum::<u32>() % 3 != 0 {
            return Err(InvalidStateError::CornerOrientation);
        }
        if self.eo.iter().map(|&o| o as u32).sum::<u32>() % 2 != 0 {
            return Err(InvalidStateError::EdgeOrientation);
        }
        if Self::parity(&self.cp) != Self::parity(&self.ep) {
            return Err(InvalidStateError::Parity);
        }
        Ok(())
    }

    fn facelet_faces(&self) -> [Face; 54] {
        let mut result = [Up; 54];

        for (i, face) in Face::FACE_SET.iter().enumerate() {
            result[9 * i + 4] = *face;
        }
        for (i, facelets) in Self::CORNER_FACELETS.iter().enumerate() {
            let (piece, ori) = (self.cp[i] as usize, self.co[i] as usize);
            for k in 0..3 {
                result[facelets[(k + ori) % 3]] = Self::CORNER_COLORS[piece][k];
            }
        }
        for (i, facelets) in Self::EDGE_FACELETS.iter().enumerate() {
            let (piece, ori) = (self.ep[i] as usize, self.eo[i] as usize);
            for k in 0..2 {
                result[facelets[(k + ori) % 2]] = Self::EDGE_COLORS[piece][k];
            }
        }
        result
    }

    /// 54 facelets in U, R, F, D, L, B face order, each face row by row,
    /// named after the face whose centre shares their colour.
    pub fn to_facelets(&self) -> String {
        self.facelet_faces().iter().map(Face::to_string).collect()
    }

    fn net_face(facelets: &[Face; 54], face: Face) -> &[Face] {
        let start = face as usize * 9;

        &facelets[start..start + 9]
    }

    fn row_2_str(row: &[Face]) -> String {
        row.iter()
            .map(|face| MyColor::COL_SET[*face as usize].to_string())
            .collect()
    }

    /// Random scramble of `mov_nb` moves with no two consecutive moves on the
    /// same face. Group 0 draws from every move, group 1 from G1 moves only.
    pub fn scramble<R: Rng + ?Sized>(
        rng: &mut R,
        mov_nb: usize,
        group: usize,
    ) -> (CubeState, Vec<Move>) {
        let set: &[Move] = if group == 0 {
            &Move::MOV_SET
        } else {
            &Move::G1_SET
        };
        let mut result = Self::new();
        let mut movs: Vec<Move> = Vec::with_capacity(mov_nb);

        while movs.len() < mov_nb {
            if let Some(&mv) = set.choose(rng) {
                if let Some(Move(face, _)) = movs.last() {
                    if *face == mv.0 {
                        continue;
                    }
                }
                result.rotate(mv);
                movs.push(mv);
            }
        }
        (result, movs)
    }
}
