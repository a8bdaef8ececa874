//! Phrase database (`tsin`) header.
//!
//! Only the header is read: `u16 idx_count` (stored twice, the second copy
//! is authoritative) followed by `i32 phrase_count`. The counts are reported
//! to the host; phrase composition itself runs on the phonetic dictionary.

use std::path::Path;

use tracing::info;

use super::reader::ByteReader;
use crate::error::{LoadError, LoadResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TsinHeader {
    pub idx_count: u16,
    pub phrase_count: u32,
}

impl TsinHeader {
    pub fn load<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let header = Self::parse(&data)?;
        info!(
            path = %path.display(),
            idx_count = header.idx_count,
            phrase_count = header.phrase_count,
            "loaded phrase database header"
        );
        Ok(header)
    }

    pub fn parse(data: &[u8]) -> LoadResult<Self> {
        let mut r = ByteReader::new(data, "phrase database");
        r.u16()?;
        let idx_count = r.u16()?;
        let phrase_count = r.i32()?;
        let phrase_count = u32::try_from(phrase_count).map_err(|_| LoadError::Implausible {
            field: "phrase_count",
            value: i64::from(phrase_count),
        })?;
        Ok(Self {
            idx_count,
            phrase_count,
        })
    }
}
