mod compressor;
pub mod config;
pub mod coord;
pub mod cube;
pub mod error;
pub mod extractor;
pub mod feed;
pub mod solver;
pub mod table;
pub mod two_phase;
pub mod utils;

use colored::*;
use serde::{Deserialize, Serialize};
use Face::*;
use MyColor::*;
use Rotation::*;

pub use config::*;
pub use cube::*;
pub use error::*;
pub use extractor::{Extractor, TableInfos, TAB_INF};
pub use feed::*;
pub use solver::*;
pub use table::*;
pub use two_phase::*;
pub use utils::*;
