use super::*;

pub type Id = usize;

#[derive(Clone, Copy, PartialEq)]
pub enum MyColor {
    Green,
    Blue,
    Orange,
    Yellow,
    Red,
    White,
}

impl MyColor {
    /// Sticker colour of each face, indexed like `Face::FACE_SET`.
    pub const COL_SET: [MyColor; 6] = [Blue, Red, White, Green, Orange, Yellow];
}

impl std::fmt::Display for MyColor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Green => "  ".on_bright_green(),
            Blue => "  ".on_bright_blue(),
            Orange => "  ".on_yellow(),
            Yellow => "  ".on_bright_yellow(),
            Red => "  ".on_bright_red(),
            White => "  ".on_bright_white(),
        }
        .fmt(f)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Face {
    Up,
    Right,
    Front,
    Down,
    Left,
    Back,
}

impl Face {
    pub const FACE_SET: [Face; 6] = [Up, Right, Front, Down, Left, Back];

    /// 0 for U/D, 1 for R/L, 2 for F/B.
    pub fn axis(self) -> usize {
        self as usize % 3
    }

    pub fn from_char(c: char) -> Option<Face> {
        match c {
            'U' => Some(Up),
            'R' => Some(Right),
            'F' => Some(Front),
            'D' => Some(Down),
            'L' => Some(Left),
            'B' => Some(Back),
            _ => None,
        }
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Up => "U",
            Right => "R",
            Front => "F",
            Down => "D",
            Left => "L",
            Back => "B",
        }
        .fmt(f)
    }
}

/// Amount of clockwise quarter turns, in encoding order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Rotation {
    Cw,
    Dual,
    Ccw,
}

impl Rotation {
    pub const ROT_SET: [Rotation; 3] = [Cw, Dual, Ccw];

    pub fn quarters(self) -> usize {
        self as usize + 1
    }

    pub fn inverse(self) -> Rotation {
        match self {
            Cw => Ccw,
            Dual => Dual,
            Ccw => Cw,
        }
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Cw => Ok(()),
            Dual => "2".fmt(f),
            Ccw => "'".fmt(f),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Move(pub Face, pub Rotation);

impl Move {
    /// Every face move, indexed by `Move::index`.
    pub const MOV_SET: [Move; 18] = [
        Move(Up, Cw),
        Move(Up, Dual),
        Move(Up, Ccw),
        Move(Right, Cw),
        Move(Right, Dual),
        Move(Right, Ccw),
        Move(Front, Cw),
        Move(Front, Dual),
        Move(Front, Ccw),
        Move(Down, Cw),
        Move(Down, Dual),
        Move(Down, Ccw),
        Move(Left, Cw),
        Move(Left, Dual),
        Move(Left, Ccw),
        Move(Back, Cw),
        Move(Back, Dual),
        Move(Back, Ccw),
    ];

    /// Generators of G1: quarter turns of U and D, half turns of the rest.
    pub const G1_SET: [Move; 10] = [
        Move(Up, Cw),
        Move(Up, Dual),
        Move(Up, Ccw),
        Move(Right, Dual),
        Move(Front, Dual),
        Move(Down, Cw),
        Move(Down, Dual),
        Move(Down, Ccw),
        Move(Left, Dual),
        Move(Back, Dual),
    ];

    pub fn face(self) -> Face {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize * 3 + self.1 as usize
    }

    pub fn from_index(idx: usize) -> Option<Move> {
        Self::MOV_SET.get(idx).copied()
    }

    pub fn inverse(self) -> Move {
        Move(self.0, self.1.inverse())
    }

    pub fn is_g1(self) -> bool {
        matches!(self, Move(Up | Down, _) | Move(_, Dual))
    }

    /// Canonical ordering rule: no two moves of the same face in a row, and
    /// two moves on one axis only in increasing face order (`U D`, never
    /// `D U`).
    pub fn follows(self, prev: Option<Move>) -> bool {
        match prev {
            Some(Move(face, _)) => {
                !(face.axis() == self.0.axis() && self.0 as usize <= face as usize)
            }
            None => true,
        }
    }

    /// Terminal rendering used by the CLI.
    pub fn painted(self) -> String {
        format!(
            "{}{}",
            self.0.to_string().bright_yellow(),
            self.1.to_string().bright_red()
        )
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, fm: &mut std::fmt::Formatter) -> std::fmt::Result {
        let Move(face, rot) = self;

        write!(fm, "{}{}", face, rot)
    }
}

impl std::str::FromStr for Move {
    type Err = ParseError;

    fn from_str(mov: &str) -> Result<Self, Self::Err> {
        let mut chars = mov.chars();
        let face = chars
            .next()
            .and_then(Face::from_char)
            .ok_or_else(|| ParseError::UnknownMove(mov.to_string()))?;
        let rot = match chars.as_str() {
            "" => Cw,
            "2" => Dual,
            "'" => Ccw,
            _ => return Err(ParseError::UnknownMove(mov.to_string())),
        };

        Ok(Move(face, rot))
    }
}

pub fn parse_moves(s: &str) -> Result<Vec<Move>, ParseError> {
    s.split_whitespace().map(str::parse).collect()
}

pub fn format_moves(movs: &[Move]) -> String {
    movs.iter()
        .map(Move::to_string)
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn invert_moves(movs: &[Move]) -> Vec<Move> {
    movs.iter().rev().map(|mv| mv.inverse()).collect()
}
