use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidStateError {
    #[error("Corner permutation is not a permutation of 0..8")]
    CornerPermutation,
    #[error("Edge permutation is not a permutation of 0..12")]
    EdgePermutation,
    #[error("Invalid {piece} orientation value {value}")]
    Value { piece: &'static str, value: u8 },
    #[error("Corner twists do not sum to a multiple of 3")]
    CornerOrientation,
    #[error("Edge flips do not sum to a multiple of 2")]
    EdgeOrientation,
    #[error("Corner and edge permutations have different parities")]
    Parity,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("Invalid cube state: {0}")]
    InvalidState(#[from] InvalidStateError),
    #[error("Phase 2 requires a cube in G1")]
    Phase2PreconditionViolated,
    #[error("No solution within {0} moves")]
    DepthExhausted(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Move \"{0}\" is not recognized")]
    UnknownMove(String),
}

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Table I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Table file could not be decoded: {0}")]
    Decode(#[from] bincode::Error),
    #[error("Table file for table {id} is corrupt: {reason}")]
    Corrupt { id: usize, reason: String },
    #[error("Unknown table id {0}")]
    UnknownId(usize),
}
