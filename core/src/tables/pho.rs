//! Phonetic dictionary (`pho.tab2`) loader and writer.
//!
//! Layout, all little-endian:
//!
//! ```text
//! u16 idx_count            (stored twice; the second copy is authoritative)
//! u16 idx_count
//! i32 item_count
//! i32 phrase_size
//! idx_count  x { u16 key, u16 start }
//! item_count x { u8 ch[4], i32 count }
//! phrase_size bytes of NUL-separated UTF-8
//! ```
//!
//! An item whose first byte is `0x1B` is a phrase reference: `ch[1..4]` holds
//! a 24-bit little-endian offset into the phrase area.

use std::path::Path;

use tracing::{debug, info, warn};

use super::reader::{c_str, ByteReader};
use crate::candidate::{Candidate, MAX_CANDIDATES};
use crate::error::{LoadError, LoadResult};

/// Key of the sentinel index entry appended after load.
pub const SENTINEL_KEY: u16 = 0xFFFF;

const PHRASE_ESCAPE: u8 = 0x1B;
const HEADER_LEN: usize = 12;
const INDEX_RECORD_LEN: usize = 4;
const ITEM_RECORD_LEN: usize = 8;
const MAX_PHRASE_OFFSET: usize = 0xFF_FFFF;

/// One `(packed key, first item)` pair of the sorted index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoIndexEntry {
    pub key: u16,
    pub start: u32,
}

/// One dictionary item: an inline character or a phrase reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoItem {
    pub ch: [u8; 4],
    pub count: i32,
}

impl PhoItem {
    fn is_phrase(&self) -> bool {
        self.ch[0] == PHRASE_ESCAPE
    }

    fn phrase_offset(&self) -> usize {
        usize::from(self.ch[1]) | usize::from(self.ch[2]) << 8 | usize::from(self.ch[3]) << 16
    }
}

/// In-memory phonetic dictionary. Never mutated after load.
#[derive(Debug, Clone, Default)]
pub struct PhoDictionary {
    /// Sorted by key, always terminated by the sentinel
    index: Vec<PhoIndexEntry>,
    items: Vec<PhoItem>,
    phrases: Vec<u8>,
}

impl PhoDictionary {
    /// Read and parse a dictionary file.
    pub fn load<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dict = Self::parse(&data)?;
        info!(
            path = %path.display(),
            keys = dict.key_count(),
            items = dict.item_count(),
            "loaded phonetic dictionary"
        );
        Ok(dict)
    }

    /// Parse a dictionary from its on-disk bytes.
    pub fn parse(data: &[u8]) -> LoadResult<Self> {
        let mut r = ByteReader::new(data, "phonetic dictionary");
        let first_idx_count = r.u16()?;
        let idx_count = r.u16()?;
        if first_idx_count != idx_count {
            debug!(first_idx_count, idx_count, "header index counts differ, using the second");
        }
        let item_count = r.i32()?;
        let phrase_size = r.i32()?;
        let item_count = usize::try_from(item_count).map_err(|_| LoadError::Implausible {
            field: "item_count",
            value: i64::from(item_count),
        })?;
        let phrase_size = usize::try_from(phrase_size).map_err(|_| LoadError::Implausible {
            field: "phrase_size",
            value: i64::from(phrase_size),
        })?;
        let idx_count = usize::from(idx_count);

        r.ensure_records("idx_count", idx_count, INDEX_RECORD_LEN)?;
        let mut index = Vec::with_capacity(idx_count + 1);
        for _ in 0..idx_count {
            let key = r.u16()?;
            let start = u32::from(r.u16()?);
            index.push(PhoIndexEntry { key, start });
        }
        index.push(PhoIndexEntry {
            key: SENTINEL_KEY,
            start: item_count as u32,
        });

        r.ensure_records("item_count", item_count, ITEM_RECORD_LEN)?;
        let mut items = Vec::with_capacity(item_count);
        for _ in 0..item_count {
            let ch = r.array::<4>()?;
            let count = r.i32()?;
            items.push(PhoItem { ch, count });
        }

        let phrases = r.take(phrase_size)?.to_vec();
        if r.remaining() > 0 {
            debug!(trailing = r.remaining(), "ignoring trailing bytes after phrase area");
        }

        Ok(Self {
            index,
            items,
            phrases,
        })
    }

    /// Build a dictionary from `(key, text, count)` entries.
    ///
    /// Entries are grouped by key (stable within a key). Text that does not
    /// fit in four bytes goes to the phrase area.
    pub fn from_entries<'a, I>(entries: I) -> LoadResult<Self>
    where
        I: IntoIterator<Item = (u16, &'a str, i32)>,
    {
        let mut entries: Vec<(u16, &str, i32)> = entries.into_iter().collect();
        entries.sort_by_key(|&(key, _, _)| key);

        let mut index: Vec<PhoIndexEntry> = Vec::new();
        let mut items = Vec::with_capacity(entries.len());
        let mut phrases = Vec::new();

        for (key, text, count) in entries {
            if key == SENTINEL_KEY {
                return Err(LoadError::Implausible {
                    field: "key",
                    value: i64::from(key),
                });
            }
            if index.last().map(|e| e.key) != Some(key) {
                if items.len() > usize::from(u16::MAX) {
                    return Err(LoadError::Implausible {
                        field: "item_count",
                        value: items.len() as i64,
                    });
                }
                index.push(PhoIndexEntry {
                    key,
                    start: items.len() as u32,
                });
            }
            let ch = if text.len() <= 4 && !text.as_bytes().starts_with(&[PHRASE_ESCAPE]) {
                let mut ch = [0u8; 4];
                ch[..text.len()].copy_from_slice(text.as_bytes());
                ch
            } else {
                let offset = phrases.len();
                if offset > MAX_PHRASE_OFFSET {
                    return Err(LoadError::Implausible {
                        field: "phrase_size",
                        value: offset as i64,
                    });
                }
                phrases.extend_from_slice(text.as_bytes());
                phrases.push(0);
                [
                    PHRASE_ESCAPE,
                    (offset & 0xFF) as u8,
                    ((offset >> 8) & 0xFF) as u8,
                    ((offset >> 16) & 0xFF) as u8,
                ]
            };
            items.push(PhoItem { ch, count });
        }
        index.push(PhoIndexEntry {
            key: SENTINEL_KEY,
            start: items.len() as u32,
        });

        Ok(Self {
            index,
            items,
            phrases,
        })
    }

    /// Serialize to the on-disk layout. The sentinel is not written.
    pub fn to_bytes(&self) -> Vec<u8> {
        let entries = self.index_entries();
        let mut out = Vec::with_capacity(
            HEADER_LEN
                + entries.len() * INDEX_RECORD_LEN
                + self.items.len() * ITEM_RECORD_LEN
                + self.phrases.len(),
        );
        let idx_count = entries.len() as u16;
        out.extend_from_slice(&idx_count.to_le_bytes());
        out.extend_from_slice(&idx_count.to_le_bytes());
        out.extend_from_slice(&(self.items.len() as i32).to_le_bytes());
        out.extend_from_slice(&(self.phrases.len() as i32).to_le_bytes());
        for entry in entries {
            out.extend_from_slice(&entry.key.to_le_bytes());
            out.extend_from_slice(&(entry.start as u16).to_le_bytes());
        }
        for item in &self.items {
            out.extend_from_slice(&item.ch);
            out.extend_from_slice(&item.count.to_le_bytes());
        }
        out.extend_from_slice(&self.phrases);
        out
    }

    /// Index entries without the sentinel.
    pub fn index_entries(&self) -> &[PhoIndexEntry] {
        &self.index[..self.index.len().saturating_sub(1)]
    }

    /// Number of distinct keys (sentinel excluded).
    pub fn key_count(&self) -> usize {
        self.index_entries().len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn phrase_area_len(&self) -> usize {
        self.phrases.len()
    }

    /// Text of one item; empty when the item is blank or malformed.
    pub fn item_text(&self, item: &PhoItem) -> String {
        if !item.is_phrase() {
            return c_str(&item.ch).unwrap_or_default().to_string();
        }
        let offset = item.phrase_offset();
        let Some(tail) = self.phrases.get(offset..) else {
            warn!(offset, area = self.phrases.len(), "phrase offset outside phrase area");
            return String::new();
        };
        match c_str(tail) {
            Some(text) => text.to_string(),
            None => {
                warn!(offset, "phrase is not valid UTF-8");
                String::new()
            }
        }
    }

    /// Items stored under `key`, in file order.
    pub fn items_for(&self, key: u16) -> &[PhoItem] {
        for (i, entry) in self.index_entries().iter().enumerate() {
            if entry.key > key {
                break;
            }
            if entry.key == key {
                let next = self.index[i + 1].start as usize;
                let end = next.min(self.items.len());
                let start = (entry.start as usize).min(end);
                return &self.items[start..end];
            }
        }
        &[]
    }

    /// Candidates for a packed phonetic key, in file order, capped at 100.
    /// Blank items are skipped.
    pub fn lookup(&self, key: u16) -> Vec<Candidate> {
        self.items_for(key)
            .iter()
            .filter_map(|item| {
                let text = self.item_text(item);
                (!text.is_empty()).then(|| Candidate::new(text, item.count))
            })
            .take(MAX_CANDIDATES)
            .collect()
    }
}
