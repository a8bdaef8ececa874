//! Table registry: data directories, the phonetic dictionary, and the cache
//! of loaded GTAB tables.
//!
//! The registry is an explicit owned object built once at startup. Loading
//! needs `&mut Registry`; lookups only need `&Registry`. The dictionary and
//! loaded tables are handed out as `Arc` handles so contexts can keep them
//! past the borrow.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{LoadError, LoadResult};
use crate::tables::{GtabTable, PhoDictionary, TsinHeader};

/// Environment variable holding extra data directories (path-list syntax).
pub const DATA_DIR_ENV: &str = "LIBCOMPOSE_DATA_DIR";

/// Default phonetic dictionary filename.
pub const PHO_FILE: &str = "pho.tab2";

/// Default phrase database filename.
pub const TSIN_FILE: &str = "tsin32";

/// Id reported for tables loaded by filename that are not in the well-known list.
pub const CUSTOM_TABLE_ID: u32 = 99;

/// A table the registry knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WellKnownTable {
    pub name: &'static str,
    pub filename: &'static str,
    pub icon: &'static str,
    pub id: u32,
}

const fn table(
    name: &'static str,
    filename: &'static str,
    icon: &'static str,
    id: u32,
) -> WellKnownTable {
    WellKnownTable {
        name,
        filename,
        icon,
        id,
    }
}

pub const WELL_KNOWN_TABLES: [WellKnownTable; 21] = [
    table("倉頡", "cj.gtab", "cj.png", 0),
    table("倉五", "cj5.gtab", "cj5.png", 1),
    table("五四三倉頡", "cj543.gtab", "cj5.png", 2),
    table("標點倉頡", "cj-punc.gtab", "cj-punc.png", 3),
    table("速成", "simplex.gtab", "simplex.png", 10),
    table("標點簡易", "simplex-punc.gtab", "simplex.png", 11),
    table("大易", "dayi3.gtab", "dayi3.png", 20),
    table("行列30", "ar30.gtab", "ar30.png", 30),
    table("行列40", "array40.gtab", "ar30.png", 31),
    table("行列大字集", "ar30-big.gtab", "ar30.png", 32),
    table("嘸蝦米", "noseeing.gtab", "noseeing.png", 40),
    table("拼音", "pinyin.gtab", "pinyin.png", 50),
    table("粵拼", "jyutping.gtab", "jyutping.png", 51),
    table("韓諺", "hangul.gtab", "hangul.png", 60),
    table("韓羅", "hangul-roman.gtab", "hangul.png", 61),
    table("越南文", "vims.gtab", "vims.png", 70),
    table("符號", "symbols.gtab", "symbols.png", 80),
    table("希臘文", "greek.gtab", "greek.png", 81),
    table("俄文", "russian.gtab", "russian.png", 82),
    table("世界文", "esperanto.gtab", "esperanto.png", 83),
    table("拉丁字母", "latin-letters.gtab", "latin-letters.png", 84),
];

/// Look up a well-known table by id.
pub fn well_known_by_id(id: u32) -> Option<&'static WellKnownTable> {
    WELL_KNOWN_TABLES.iter().find(|t| t.id == id)
}

/// Look up a well-known table by filename.
pub fn well_known_by_filename(filename: &str) -> Option<&'static WellKnownTable> {
    WELL_KNOWN_TABLES.iter().find(|t| t.filename == filename)
}

/// Registry entry plus whether the table is currently loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    pub name: &'static str,
    pub filename: &'static str,
    pub icon: &'static str,
    pub id: u32,
    pub loaded: bool,
}

/// Owner of every loaded data file.
#[derive(Debug, Default)]
pub struct Registry {
    data_dirs: Vec<PathBuf>,
    pho: Option<Arc<PhoDictionary>>,
    tsin: Option<TsinHeader>,
    tables: AHashMap<String, Arc<GtabTable>>,
}

impl Registry {
    /// Create a registry searching `data_dirs` in order.
    pub fn new<I, P>(data_dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            data_dirs: data_dirs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Create a registry from `LIBCOMPOSE_DATA_DIR` (empty when unset).
    pub fn from_env() -> Self {
        let dirs: Vec<PathBuf> = std::env::var_os(DATA_DIR_ENV)
            .map(|value| std::env::split_paths(&value).collect())
            .unwrap_or_default();
        debug!(?dirs, "data directories from environment");
        Self::new(dirs)
    }

    pub fn add_data_dir<P: Into<PathBuf>>(&mut self, dir: P) {
        self.data_dirs.push(dir.into());
    }

    pub fn data_dirs(&self) -> &[PathBuf] {
        &self.data_dirs
    }

    /// Paths tried for `file`: `<dir>/<file>` then `<dir>/data/<file>` for
    /// each data directory in order.
    pub fn candidate_paths(&self, file: &str) -> Vec<PathBuf> {
        self.data_dirs
            .iter()
            .flat_map(|dir| [dir.join(file), dir.join("data").join(file)])
            .collect()
    }

    /// Try every candidate path for `file` with `load`.
    ///
    /// Missing files are skipped quietly. If no path works, the first parse
    /// failure is returned, or `NotFound` when the file was never present.
    fn load_first<T>(&self, file: &str, load: impl Fn(&Path) -> LoadResult<T>) -> LoadResult<T> {
        let mut parse_error = None;
        for path in self.candidate_paths(file) {
            match load(&path) {
                Ok(value) => return Ok(value),
                Err(LoadError::Io { path, source }) => {
                    debug!(path = %path.display(), error = %source, "candidate path unavailable");
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to parse table, trying next path");
                    parse_error.get_or_insert(err);
                }
            }
        }
        Err(parse_error.unwrap_or_else(|| LoadError::NotFound {
            file: file.to_string(),
        }))
    }

    // ========== Phonetic dictionary ==========

    /// Load the phonetic dictionary from the data directories.
    pub fn load_pho(&mut self, file: &str) -> LoadResult<()> {
        let dict = self.load_first(file, |path| PhoDictionary::load(path))?;
        self.pho = Some(Arc::new(dict));
        Ok(())
    }

    /// Install an already-built dictionary.
    pub fn set_pho_dictionary(&mut self, dict: PhoDictionary) {
        self.pho = Some(Arc::new(dict));
    }

    /// Shared handle to the phonetic dictionary, if one is loaded.
    pub fn pho_dictionary(&self) -> Option<Arc<PhoDictionary>> {
        self.pho.clone()
    }

    pub fn has_pho_dictionary(&self) -> bool {
        self.pho.is_some()
    }

    // ========== Phrase database ==========

    pub fn load_tsin(&mut self, file: &str) -> LoadResult<TsinHeader> {
        let header = self.load_first(file, |path| TsinHeader::load(path))?;
        self.tsin = Some(header);
        Ok(header)
    }

    pub fn tsin_header(&self) -> Option<TsinHeader> {
        self.tsin
    }

    // ========== GTAB tables ==========

    /// Load a table by filename, reusing the cached copy when present.
    pub fn load_gtab(&mut self, filename: &str) -> LoadResult<Arc<GtabTable>> {
        if let Some(table) = self.tables.get(filename) {
            debug!(filename, "gtab cache hit");
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(self.load_first(filename, |path| GtabTable::load(path))?);
        self.tables
            .insert(filename.to_string(), Arc::clone(&table));
        Ok(table)
    }

    /// Load a well-known table by id.
    pub fn load_gtab_by_id(&mut self, id: u32) -> LoadResult<Arc<GtabTable>> {
        let entry = well_known_by_id(id).ok_or(LoadError::UnknownTable(id))?;
        self.load_gtab(entry.filename)
    }

    /// Cache an already-built table under `filename`.
    pub fn insert_gtab(&mut self, filename: &str, table: GtabTable) -> Arc<GtabTable> {
        let table = Arc::new(table);
        self.tables
            .insert(filename.to_string(), Arc::clone(&table));
        table
    }

    pub fn gtab(&self, filename: &str) -> Option<Arc<GtabTable>> {
        self.tables.get(filename).cloned()
    }

    pub fn is_table_loaded(&self, filename: &str) -> bool {
        self.tables.contains_key(filename)
    }

    /// Info for the well-known table at `index`.
    pub fn table_info(&self, index: usize) -> Option<TableInfo> {
        WELL_KNOWN_TABLES.get(index).map(|t| self.info_for(t))
    }

    /// Info for every well-known table, in registry order.
    pub fn tables(&self) -> Vec<TableInfo> {
        WELL_KNOWN_TABLES.iter().map(|t| self.info_for(t)).collect()
    }

    /// Id of a table filename: its well-known id, or the custom id.
    pub fn table_id(&self, filename: &str) -> u32 {
        well_known_by_filename(filename).map_or(CUSTOM_TABLE_ID, |t| t.id)
    }

    fn info_for(&self, t: &WellKnownTable) -> TableInfo {
        TableInfo {
            name: t.name,
            filename: t.filename,
            icon: t.icon,
            id: t.id,
            loaded: self.is_table_loaded(t.filename),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_ids_are_unique() {
        let mut ids: Vec<u32> = WELL_KNOWN_TABLES.iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), WELL_KNOWN_TABLES.len());
        assert!(!ids.contains(&CUSTOM_TABLE_ID));
    }

    #[test]
    fn lookup_by_id_and_filename() {
        assert_eq!(well_known_by_id(0).unwrap().filename, "cj.gtab");
        assert_eq!(well_known_by_id(84).unwrap().name, "拉丁字母");
        assert!(well_known_by_id(5).is_none());
        assert_eq!(well_known_by_filename("noseeing.gtab").unwrap().id, 40);
    }

    #[test]
    fn candidate_paths_order() {
        let registry = Registry::new(["/a", "/b"]);
        let paths = registry.candidate_paths("cj.gtab");
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/a/cj.gtab"),
                PathBuf::from("/a/data/cj.gtab"),
                PathBuf::from("/b/cj.gtab"),
                PathBuf::from("/b/data/cj.gtab"),
            ]
        );
    }

    #[test]
    fn missing_files_report_not_found() {
        let mut registry = Registry::new(["/nonexistent-libcompose-dir"]);
        assert!(matches!(
            registry.load_pho(PHO_FILE),
            Err(LoadError::NotFound { .. })
        ));
        assert!(!registry.has_pho_dictionary());
        assert!(matches!(
            registry.load_gtab_by_id(7),
            Err(LoadError::UnknownTable(7))
        ));
    }

    #[test]
    fn inserted_tables_show_as_loaded() {
        let mut registry = Registry::default();
        let table = GtabTable::new("倉頡", "abc", 5).unwrap();
        registry.insert_gtab("cj.gtab", table);
        assert!(registry.table_info(0).unwrap().loaded);
        assert!(!registry.table_info(1).unwrap().loaded);
        assert_eq!(registry.table_id("cj.gtab"), 0);
        assert_eq!(registry.table_id("mine.gtab"), CUSTOM_TABLE_ID);
        // Cached copy is returned without touching the filesystem
        assert!(registry.load_gtab("cj.gtab").is_ok());
    }
}
