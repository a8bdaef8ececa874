//! Generic input table (`.gtab`) loader.
//!
//! Layout, little-endian unless noted:
//!
//! ```text
//! 584-byte header:
//!   i32 version, u32 flag, char cname[32], char selkey[12],
//!   i32 space_style, i32 key_count, i32 max_press, i32 dup_sel,
//!   i32 def_chars, u8 reserved[512]
//! u8  keymap[128]
//! u32 index[64]
//! def_chars x { u8 key[4], u8 ch[4] }   when max_press <= 5
//! def_chars x { u8 key[8], u8 ch[4] }   when max_press >  5
//! ```
//!
//! Item keys are big-endian and hold `max_press` key indices of `KEY_BITS`
//! bits each, first key in the most significant position.

use std::borrow::Cow;
use std::path::Path;

use tracing::{debug, info};

use super::reader::ByteReader;
use crate::candidate::{Candidate, MAX_CANDIDATES};
use crate::error::{LoadError, LoadResult};

/// Bits per key index in a packed item key.
pub const KEY_BITS: u32 = 6;

/// Upper bound on keys per composition, regardless of the table.
pub const MAX_GTAB_KEYS: usize = 8;

/// Largest `max_press` a table may declare (10 keys fit a 64-bit key).
pub const MAX_PRESS_LIMIT: u32 = 10;

pub const HEADER_LEN: usize = 584;
const KEYMAP_LEN: usize = 128;
const INDEX_LEN: usize = 1 << KEY_BITS;

/// One table item: packed key and output text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GtabItem {
    pub key: u64,
    pub ch: [u8; 4],
}

impl GtabItem {
    pub fn text(&self) -> Cow<'_, str> {
        nul_terminated_lossy(&self.ch)
    }
}

/// A loaded generic input table.
#[derive(Debug, Clone)]
pub struct GtabTable {
    pub version: i32,
    pub flag: u32,
    /// Display name from the header
    pub name: String,
    /// Table-specific selection keys (may be empty)
    pub selection_keys: String,
    pub space_style: i32,
    pub key_count: u32,
    pub max_press: u32,
    pub dup_sel: i32,
    keymap: [u8; KEYMAP_LEN],
    index: Vec<u32>,
    items: Vec<GtabItem>,
}

impl GtabTable {
    /// Create an empty table whose keys are the characters of `keys`, in
    /// order (index 0 is the first character).
    pub fn new(name: &str, keys: &str, max_press: u32) -> LoadResult<Self> {
        if !(1..=MAX_PRESS_LIMIT).contains(&max_press) {
            return Err(LoadError::Implausible {
                field: "max_press",
                value: i64::from(max_press),
            });
        }
        if !keys.is_ascii() || keys.len() > KEYMAP_LEN || keys.as_bytes().contains(&0) {
            return Err(LoadError::Implausible {
                field: "key_count",
                value: keys.len() as i64,
            });
        }
        let mut keymap = [0u8; KEYMAP_LEN];
        keymap[..keys.len()].copy_from_slice(keys.as_bytes());
        Ok(Self {
            version: 0,
            flag: 0,
            name: name.to_string(),
            selection_keys: String::new(),
            space_style: 0,
            key_count: keys.len() as u32,
            max_press,
            dup_sel: 0,
            keymap,
            index: vec![0; INDEX_LEN],
            items: Vec::new(),
        })
    }

    /// Read and parse a table file.
    pub fn load<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse(&data)?;
        info!(
            path = %path.display(),
            name = %table.name,
            items = table.items.len(),
            max_press = table.max_press,
            "loaded gtab table"
        );
        Ok(table)
    }

    /// Parse a table from its on-disk bytes.
    pub fn parse(data: &[u8]) -> LoadResult<Self> {
        let mut r = ByteReader::new(data, "gtab table");
        let version = r.i32()?;
        let flag = r.u32()?;
        let cname = r.array::<32>()?;
        let selkey = r.array::<12>()?;
        let space_style = r.i32()?;
        let key_count = r.i32()?;
        let max_press = r.i32()?;
        let dup_sel = r.i32()?;
        let def_chars = r.i32()?;
        r.take(512)?;

        if !(1..=MAX_PRESS_LIMIT as i32).contains(&max_press) {
            return Err(LoadError::Implausible {
                field: "max_press",
                value: i64::from(max_press),
            });
        }
        let key_count = u32::try_from(key_count).map_err(|_| LoadError::Implausible {
            field: "key_count",
            value: i64::from(key_count),
        })?;
        let def_chars = usize::try_from(def_chars).map_err(|_| LoadError::Implausible {
            field: "def_chars",
            value: i64::from(def_chars),
        })?;
        let max_press = max_press as u32;

        let keymap = r.array::<KEYMAP_LEN>()?;
        let mut index = Vec::with_capacity(INDEX_LEN);
        for _ in 0..INDEX_LEN {
            index.push(r.u32()?);
        }

        let wide = is_wide(max_press);
        let key_len = if wide { 8 } else { 4 };
        r.ensure_records("def_chars", def_chars, key_len + 4)?;
        let mut items = Vec::with_capacity(def_chars);
        for _ in 0..def_chars {
            let key = r
                .take(key_len)?
                .iter()
                .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
            let ch = r.array::<4>()?;
            items.push(GtabItem { key, ch });
        }
        if r.remaining() > 0 {
            debug!(trailing = r.remaining(), "ignoring trailing bytes after gtab items");
        }

        Ok(Self {
            version,
            flag,
            name: nul_terminated_lossy(&cname).into_owned(),
            selection_keys: nul_terminated_lossy(&selkey).into_owned(),
            space_style,
            key_count,
            max_press,
            dup_sel,
            keymap,
            index,
            items,
        })
    }

    /// Serialize to the on-disk layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let wide = self.is_wide();
        let record_len = if wide { 12 } else { 8 };
        let mut out = Vec::with_capacity(
            HEADER_LEN + KEYMAP_LEN + INDEX_LEN * 4 + self.items.len() * record_len,
        );
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.flag.to_le_bytes());
        out.extend_from_slice(&fixed_field::<32>(&self.name));
        out.extend_from_slice(&fixed_field::<12>(&self.selection_keys));
        out.extend_from_slice(&self.space_style.to_le_bytes());
        out.extend_from_slice(&(self.key_count as i32).to_le_bytes());
        out.extend_from_slice(&(self.max_press as i32).to_le_bytes());
        out.extend_from_slice(&self.dup_sel.to_le_bytes());
        out.extend_from_slice(&(self.items.len() as i32).to_le_bytes());
        out.extend_from_slice(&[0u8; 512]);
        out.extend_from_slice(&self.keymap);
        for slot in &self.index {
            out.extend_from_slice(&slot.to_le_bytes());
        }
        for item in &self.items {
            if wide {
                out.extend_from_slice(&item.key.to_be_bytes());
            } else {
                out.extend_from_slice(&(item.key as u32).to_be_bytes());
            }
            out.extend_from_slice(&item.ch);
        }
        out
    }

    /// Whether item keys are stored as 64-bit values.
    pub fn is_wide(&self) -> bool {
        is_wide(self.max_press)
    }

    pub fn items(&self) -> &[GtabItem] {
        &self.items
    }

    /// The key characters, in index order.
    pub fn keys(&self) -> Cow<'_, str> {
        nul_terminated_lossy(&self.keymap)
    }

    /// Index of `key` in the keymap, or `None` when unmapped.
    ///
    /// Only the leading run of non-zero keymap bytes is searched, and
    /// positions that do not fit in `KEY_BITS` count as unmapped.
    pub fn key_index(&self, key: char) -> Option<u8> {
        let key = u8::try_from(key).ok().filter(|&b| b != 0)?;
        let position = self
            .keymap
            .iter()
            .take_while(|&&b| b != 0)
            .position(|&b| b == key)?;
        (position < INDEX_LEN).then_some(position as u8)
    }

    /// Pack `keys` left-aligned into a full-width item key.
    pub fn pack_keys(&self, keys: &[u8]) -> Option<u64> {
        if keys.is_empty() || keys.len() > self.max_press as usize {
            return None;
        }
        let composed = keys
            .iter()
            .fold(0u64, |acc, &k| (acc << KEY_BITS) | u64::from(k));
        Some(composed << ((self.max_press as usize - keys.len()) as u32 * KEY_BITS))
    }

    /// Append an item keyed by the key characters in `key_chars`.
    pub fn push_item(&mut self, key_chars: &str, text: &str) -> LoadResult<()> {
        let indices: Option<Vec<u8>> = key_chars.chars().map(|c| self.key_index(c)).collect();
        let key = indices
            .as_deref()
            .and_then(|keys| self.pack_keys(keys))
            .ok_or(LoadError::Implausible {
                field: "item key",
                value: key_chars.len() as i64,
            })?;
        if text.len() > 4 {
            return Err(LoadError::Implausible {
                field: "item text",
                value: text.len() as i64,
            });
        }
        let mut ch = [0u8; 4];
        ch[..text.len()].copy_from_slice(text.as_bytes());
        self.items.push(GtabItem { key, ch });
        self.rebuild_index();
        Ok(())
    }

    fn rebuild_index(&mut self) {
        self.items.sort_by_key(|item| item.key);
        let first_shift = (self.max_press - 1) * KEY_BITS;
        for (slot, entry) in self.index.iter_mut().enumerate() {
            *entry = self
                .items
                .iter()
                .position(|item| (item.key >> first_shift) as usize >= slot)
                .unwrap_or(self.items.len()) as u32;
        }
    }

    /// Candidates whose key starts with the typed key indices, in table
    /// order, capped at 100.
    ///
    /// Matching is `item_key >> ((max_press - n) * KEY_BITS) == composed`,
    /// so every item sharing the typed prefix is returned, including longer
    /// keys. Items with blank text are skipped.
    pub fn lookup(&self, keys: &[u8]) -> Vec<Candidate> {
        if keys.is_empty() || keys.len() > self.max_press as usize {
            return Vec::new();
        }
        let composed = keys
            .iter()
            .fold(0u64, |acc, &k| (acc << KEY_BITS) | u64::from(k));
        let shift = (self.max_press as usize - keys.len()) as u32 * KEY_BITS;
        self.items
            .iter()
            .filter(|item| item.key >> shift == composed)
            .filter_map(|item| {
                let text = item.text();
                (!text.is_empty()).then(|| Candidate::new(text.into_owned(), 0))
            })
            .take(MAX_CANDIDATES)
            .collect()
    }
}

fn is_wide(max_press: u32) -> bool {
    max_press > 5
}

fn nul_terminated_lossy(bytes: &[u8]) -> Cow<'_, str> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end])
}

fn fixed_field<const N: usize>(text: &str) -> [u8; N] {
    let mut out = [0u8; N];
    let mut len = text.len().min(N - 1);
    while !text.is_char_boundary(len) {
        len -= 1;
    }
    out[..len].copy_from_slice(&text.as_bytes()[..len]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abcd_table() -> GtabTable {
        let mut table = GtabTable::new("test", "abcd", 2).unwrap();
        table.push_item("aa", "P").unwrap();
        table.push_item("ab", "Q").unwrap();
        table.push_item("ac", "R").unwrap();
        table.push_item("ba", "S").unwrap();
        table
    }

    #[test]
    fn key_index_is_keymap_position() {
        let table = abcd_table();
        assert_eq!(table.key_index('a'), Some(0));
        assert_eq!(table.key_index('d'), Some(3));
        assert_eq!(table.key_index('z'), None);
        assert_eq!(table.key_index('\0'), None);
        assert_eq!(table.key_index('中'), None);
    }

    #[test]
    fn prefix_lookup_returns_all_extensions() {
        let table = abcd_table();
        let texts: Vec<_> = table.lookup(&[0]).into_iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["P", "Q", "R"]);
    }

    #[test]
    fn exact_lookup() {
        let table = abcd_table();
        let found = table.lookup(&[0, 1]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Q");
        assert!(table.lookup(&[3]).is_empty());
        assert!(table.lookup(&[]).is_empty());
        assert!(table.lookup(&[0, 0, 0]).is_empty());
    }

    #[test]
    fn narrow_roundtrip() {
        let table = abcd_table();
        let bytes = table.to_bytes();
        assert_eq!(bytes.len(), HEADER_LEN + 128 + 256 + 4 * 8);
        let parsed = GtabTable::parse(&bytes).unwrap();
        assert_eq!(parsed.name, "test");
        assert_eq!(parsed.max_press, 2);
        assert!(!parsed.is_wide());
        assert_eq!(parsed.keys(), "abcd");
        assert_eq!(parsed.items(), table.items());
        assert_eq!(parsed.index[1], 3);
    }

    #[test]
    fn wide_keys_roundtrip_and_lookup() {
        let mut table = GtabTable::new("長碼", "abcdefgh", 7).unwrap();
        table.push_item("abcdefg", "長").unwrap();
        table.push_item("abc", "短").unwrap();
        let parsed = GtabTable::parse(&table.to_bytes()).unwrap();
        assert!(parsed.is_wide());
        assert_eq!(parsed.name, "長碼");
        let texts: Vec<_> = parsed.lookup(&[0, 1, 2]).into_iter().map(|c| c.text).collect();
        assert_eq!(texts.len(), 2);
        assert!(texts.contains(&"長".to_string()));
        assert_eq!(parsed.lookup(&[0, 1, 2, 3, 4, 5, 6])[0].text, "長");
    }

    #[test]
    fn implausible_headers_are_rejected() {
        let mut bytes = abcd_table().to_bytes();
        bytes[60..64].copy_from_slice(&0i32.to_le_bytes());
        assert!(matches!(
            GtabTable::parse(&bytes),
            Err(LoadError::Implausible { field: "max_press", .. })
        ));

        let mut bytes = abcd_table().to_bytes();
        bytes[68..72].copy_from_slice(&1_000_000i32.to_le_bytes());
        assert!(GtabTable::parse(&bytes).is_err());

        let bytes = abcd_table().to_bytes();
        assert!(GtabTable::parse(&bytes[..HEADER_LEN - 1]).is_err());
        assert!(GtabTable::parse(&bytes[..bytes.len() - 1]).is_err());
    }

    /// A table written byte by byte: keys "abcd", one record per item.
    fn raw_table(max_press: i32, items: &[(&[u8], &str)]) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes[56..60].copy_from_slice(&4i32.to_le_bytes());
        bytes[60..64].copy_from_slice(&max_press.to_le_bytes());
        bytes[68..72].copy_from_slice(&(items.len() as i32).to_le_bytes());
        let mut keymap = [0u8; KEYMAP_LEN];
        keymap[..4].copy_from_slice(b"abcd");
        bytes.extend_from_slice(&keymap);
        bytes.extend_from_slice(&[0u8; INDEX_LEN * 4]);
        for (key, text) in items {
            bytes.extend_from_slice(key);
            let mut ch = [0u8; 4];
            ch[..text.len()].copy_from_slice(text.as_bytes());
            bytes.extend_from_slice(&ch);
        }
        bytes
    }

    fn texts(table: &GtabTable, keys: &[u8]) -> Vec<String> {
        table.lookup(keys).into_iter().map(|c| c.text).collect()
    }

    #[test]
    fn narrow_item_keys_are_big_endian_and_left_aligned() {
        // keys 1, 2, 3 in a three-key table: (1 << 12) | (2 << 6) | 3
        let bytes = raw_table(3, &[(&[0x00, 0x00, 0x10, 0x83], "日")]);
        let table = GtabTable::parse(&bytes).unwrap();
        assert!(!table.is_wide());
        assert_eq!(table.items()[0].key, 0x1083);
        assert_eq!(texts(&table, &[1]), vec!["日"]);
        assert_eq!(texts(&table, &[1, 2]), vec!["日"]);
        assert_eq!(texts(&table, &[1, 2, 3]), vec!["日"]);
        assert!(table.lookup(&[2]).is_empty());
        assert!(table.lookup(&[1, 3]).is_empty());
        assert!(table.lookup(&[3]).is_empty());
    }

    #[test]
    fn wide_item_keys_are_big_endian_and_left_aligned() {
        // keys 1, 2, 3 in a six-key table: (1 << 30) | (2 << 24) | (3 << 18)
        let key = [0x00, 0x00, 0x00, 0x00, 0x42, 0x0C, 0x00, 0x00];
        let bytes = raw_table(6, &[(&key, "月")]);
        let table = GtabTable::parse(&bytes).unwrap();
        assert!(table.is_wide());
        assert_eq!(table.items()[0].key, 0x420C_0000);
        assert_eq!(texts(&table, &[1]), vec!["月"]);
        assert_eq!(texts(&table, &[1, 2]), vec!["月"]);
        assert_eq!(texts(&table, &[1, 2, 3]), vec!["月"]);
        assert!(table.lookup(&[2]).is_empty());
        assert!(table.lookup(&[1, 2, 3, 0, 0, 1]).is_empty());
    }

    #[test]
    fn packed_keys_match_the_file_layout() {
        let mut table = GtabTable::new("t", "abcd", 3).unwrap();
        assert_eq!(table.pack_keys(&[1, 2, 3]), Some(0x1083));
        table.push_item("bcd", "日").unwrap();
        let bytes = table.to_bytes();
        let record = &bytes[HEADER_LEN + KEYMAP_LEN + INDEX_LEN * 4..];
        assert_eq!(&record[..4], &[0x00, 0x00, 0x10, 0x83]);
        assert_eq!(&record[4..8], &[0xE6, 0x97, 0xA5, 0x00]);
    }

    #[test]
    fn push_item_rejects_unknown_keys() {
        let mut table = GtabTable::new("t", "ab", 2).unwrap();
        assert!(table.push_item("az", "X").is_err());
        assert!(table.push_item("aaa", "X").is_err());
        assert!(table.push_item("a", "五個字節字").is_err());
    }
}
