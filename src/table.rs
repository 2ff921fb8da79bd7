use super::*;
use compressor::*;
use extractor::{Extractor, TableInfos, TAB_INF};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const UNSEEN: u8 = u8::MAX;

/// Width of one packed distance in a table file; the top value marks UNSEEN.
const DIST_SZ: usize = 4;
const PACKED_UNSEEN: u8 = (1 << DIST_SZ) - 1;

/// Minimum move count from solved for every value of one coordinate.
#[derive(Clone)]
pub struct PruneTable {
    id: Id,
    key_gen: fn(&CubeState) -> usize,
    dists: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
struct TableFile {
    id: u32,
    len: u32,
    packed: Vec<u8>,
}

impl std::fmt::Debug for PruneTable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("PruneTable")
            .field("id", &self.id)
            .field("len", &self.dists.len())
            .field("max_depth", &self.max_depth())
            .finish()
    }
}

impl PruneTable {
    pub fn new(inf: &TableInfos, dists: Vec<u8>) -> Self {
        Self {
            id: inf.id,
            key_gen: inf.key_gen,
            dists,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn len(&self) -> usize {
        self.dists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dists.is_empty()
    }

    #[inline]
    pub fn dist(&self, key: usize) -> usize {
        self.dists[key] as usize
    }

    /// Distance bound for `cube`, looked up through this table's coordinate.
    #[inline]
    pub fn lookup(&self, cube: &CubeState) -> usize {
        self.dist((self.key_gen)(cube))
    }

    pub fn max_depth(&self) -> usize {
        self.dists
            .iter()
            .filter(|&&d| d != UNSEEN)
            .max()
            .copied()
            .unwrap_or(0) as usize
    }

    pub fn unseen(&self) -> usize {
        self.dists.iter().filter(|&&d| d == UNSEEN).count()
    }

    pub fn save(&self, file: &Path) -> Result<(), TableError> {
        let mut compressor = Compressor::with_capacity(self.dists.len() / 2 + 1);

        for d in &self.dists {
            compressor.push((*d).min(PACKED_UNSEEN), DIST_SZ);
        }
        let bin = bincode::serialize(&TableFile {
            id: self.id as u32,
            len: self.dists.len() as u32,
            packed: compressor.finish(),
        })?;
        fs::write(file, bin)?;
        Ok(())
    }

    pub fn load(file: &Path, inf: &TableInfos) -> Result<Self, TableError> {
        let corrupt = |reason: &str| TableError::Corrupt {
            id: inf.id,
            reason: reason.to_string(),
        };
        let table: TableFile = bincode::deserialize(&fs::read(file)?)?;

        if table.id as usize != inf.id {
            return Err(corrupt("table id mismatch"));
        }
        if table.len as usize != inf.size {
            return Err(corrupt("table size mismatch"));
        }

        let mut decompressor = Decompressor::new(table.packed);
        let mut dists = Vec::with_capacity(inf.size);
        for _ in 0..inf.size {
            let d: u8 = decompressor
                .pop(DIST_SZ)
                .ok_or_else(|| corrupt("truncated data"))?;
            dists.push(if d == PACKED_UNSEEN { UNSEEN } else { d });
        }

        let result = Self::new(inf, dists);
        if result.lookup(&CubeState::SOLVED) != 0 {
            return Err(corrupt("solved state is not at distance 0"));
        }
        if result.unseen() != 0 {
            return Err(corrupt("unreached entries"));
        }
        if result.max_depth() != inf.max_depth as usize {
            return Err(corrupt("unexpected max depth"));
        }
        Ok(result)
    }

    pub fn file_name(dir: &Path, id: Id) -> PathBuf {
        dir.join(format!("mt_table_{}", id))
    }
}

/// The pruning tables of both phases. Built once, then only read; share it
/// by reference (or use `Tables::global`) across every solver and thread.
#[derive(Debug)]
pub struct Tables {
    tabs: Vec<PruneTable>,
}

impl Tables {
    /// Builds every table in parallel.
    pub fn build() -> Tables {
        let infos: Vec<&TableInfos> = TAB_INF.iter().collect();

        Tables {
            tabs: Extractor::mt_search(&infos),
        }
    }

    /// Process-wide tables, built on first use.
    pub fn global() -> &'static Tables {
        static TABLES: OnceLock<Tables> = OnceLock::new();

        TABLES.get_or_init(Tables::build)
    }

    /// Loads every table found in `dir`, builds the missing or unreadable
    /// ones and tries to save those back.
    pub fn load_or_build(dir: &Path) -> Tables {
        let mut loaded: Vec<Option<PruneTable>> = TAB_INF
            .iter()
            .map(|inf| match PruneTable::load(&PruneTable::file_name(dir, inf.id), inf) {
                Ok(table) => {
                    info!("table {} loaded from {}", inf.id, dir.display());
                    Some(table)
                }
                Err(TableError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => None,
                Err(err) => {
                    warn!("table {} ignored: {}", inf.id, err);
                    None
                }
            })
            .collect();

        let missing: Vec<&TableInfos> = TAB_INF
            .iter()
            .zip(&loaded)
            .filter(|(_, table)| table.is_none())
            .map(|(inf, _)| inf)
            .collect();
        if !missing.is_empty() {
            let built = Extractor::mt_search(&missing);
            if let Err(err) = Self::save_all(dir, &built) {
                warn!("could not cache tables in {}: {}", dir.display(), err);
            }
            for table in built {
                let idx = table.id() - 1;
                loaded[idx] = Some(table);
            }
        }

        Tables {
            tabs: loaded.into_iter().flatten().collect(),
        }
    }

    /// Builds the tables with the given ids and writes them to `dir`.
    pub fn table_search(dir: &Path, ids: &[Id]) -> Result<Vec<PathBuf>, TableError> {
        let infos = ids
            .iter()
            .map(|id| Extractor::infos(*id).ok_or(TableError::UnknownId(*id)))
            .collect::<Result<Vec<_>, _>>()?;

        Self::save_all(dir, &Extractor::mt_search(&infos))
    }

    fn save_all(dir: &Path, tables: &[PruneTable]) -> Result<Vec<PathBuf>, TableError> {
        fs::create_dir_all(dir)?;
        tables
            .iter()
            .map(|table| -> Result<PathBuf, TableError> {
                let file = PruneTable::file_name(dir, table.id());
                table.save(&file)?;
                info!("table {} saved to {}", table.id(), file.display());
                Ok(file)
            })
            .collect()
    }

    pub fn get(&self, id: Id) -> Option<&PruneTable> {
        self.tabs.iter().find(|table| table.id() == id)
    }

    /// Admissible distance-to-G1 bound: the largest of the three phase-1
    /// table lookups.
    pub fn phase1_bound(&self, cube: &CubeState) -> usize {
        self.tabs[..3]
            .iter()
            .map(|table| table.lookup(cube))
            .max()
            .unwrap_or(0)
    }

    /// Admissible distance-to-solved bound for a cube in G1: the largest of
    /// the phase-2 table lookups.
    pub fn phase2_bound(&self, cube: &CubeState) -> usize {
        self.tabs[3..]
            .iter()
            .map(|table| table.lookup(cube))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "rubik_twophase_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn save_then_load() {
        let dir = tmp_dir("save_then_load");
        let files = Tables::table_search(&dir, &[3, 6]).unwrap();

        assert_eq!(files.len(), 2);
        for (file, id) in files.iter().zip([3, 6]) {
            let inf = Extractor::infos(id).unwrap();
            let loaded = PruneTable::load(file, inf).unwrap();
            let built = Extractor::bfs_search(inf);
            assert_eq!(loaded.dists, built.dists);
        }
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn rejects_wrong_table() {
        let dir = tmp_dir("rejects_wrong_table");
        Tables::table_search(&dir, &[6]).unwrap();

        let err = PruneTable::load(
            &PruneTable::file_name(&dir, 6),
            Extractor::infos(3).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, TableError::Corrupt { id: 3, .. }));

        fs::write(PruneTable::file_name(&dir, 6), b"garbage").unwrap();
        assert!(PruneTable::load(
            &PruneTable::file_name(&dir, 6),
            Extractor::infos(6).unwrap()
        )
        .is_err());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn rejects_damaged_table() {
        let dir = tmp_dir("rejects_damaged_table");
        let inf = Extractor::infos(1).unwrap();
        let file = PruneTable::file_name(&dir, 1);
        let mut dists = vec![UNSEEN; inf.size];
        dists[(inf.key_gen)(&CubeState::SOLVED)] = 0;

        fs::create_dir_all(&dir).unwrap();
        PruneTable::new(inf, dists).save(&file).unwrap();
        assert!(matches!(
            PruneTable::load(&file, inf),
            Err(TableError::Corrupt { id: 1, .. })
        ));

        let mut dists = Extractor::bfs_search(inf).dists;
        dists[1] = 9;
        PruneTable::new(inf, dists).save(&file).unwrap();
        assert!(matches!(
            PruneTable::load(&file, inf),
            Err(TableError::Corrupt { id: 1, .. })
        ));

        let tables = Tables::load_or_build(&dir);
        assert_eq!(tables.get(1).unwrap().unseen(), 0);
        assert_eq!(tables.phase1_bound(&CubeState::SOLVED.apply(Move(Right, Cw))), 1);
        let reloaded = PruneTable::load(&file, inf).unwrap();
        assert_eq!(reloaded.dists, tables.get(1).unwrap().dists);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unknown_table_id() {
        let dir = tmp_dir("unknown_table_id");

        assert!(matches!(
            Tables::table_search(&dir, &[9]),
            Err(TableError::UnknownId(9))
        ));
    }

    #[test]
    fn load_or_build_fills_cache() {
        let dir = tmp_dir("load_or_build");
        let built = Tables::load_or_build(&dir);

        for id in 1..=TAB_INF.len() {
            assert!(PruneTable::file_name(&dir, id).exists());
            assert_eq!(built.get(id).unwrap().id(), id);
        }

        let loaded = Tables::load_or_build(&dir);
        for id in 1..=TAB_INF.len() {
            assert_eq!(loaded.get(id).unwrap().dists, built.get(id).unwrap().dists);
        }
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn bounds() {
        let tables = Tables::global();
        let r = CubeState::SOLVED.apply(Move(Right, Cw));

        assert_eq!(tables.phase1_bound(&CubeState::SOLVED), 0);
        assert_eq!(tables.phase2_bound(&CubeState::SOLVED), 0);
        assert_eq!(tables.phase1_bound(&r), 1);
        assert_eq!(tables.phase2_bound(&r.apply(Move(Right, Cw))), 1);
    }
}
