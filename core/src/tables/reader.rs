//! Bounded little-endian cursor over an in-memory table file.

use crate::error::{LoadError, LoadResult};

pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    what: &'static str,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8], what: &'static str) -> Self {
        Self { data, pos: 0, what }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub(crate) fn take(&mut self, len: usize) -> LoadResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(LoadError::Truncated {
                what: self.what,
                offset: self.pos,
                needed: len,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub(crate) fn array<const N: usize>(&mut self) -> LoadResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub(crate) fn u16(&mut self) -> LoadResult<u16> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    pub(crate) fn u32(&mut self) -> LoadResult<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    pub(crate) fn i32(&mut self) -> LoadResult<i32> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    /// Check that `count` records of `record_size` bytes fit in what is left,
    /// before anything is allocated for them.
    pub(crate) fn ensure_records(
        &self,
        field: &'static str,
        count: usize,
        record_size: usize,
    ) -> LoadResult<()> {
        match count.checked_mul(record_size) {
            Some(total) if total <= self.remaining() => Ok(()),
            _ => Err(LoadError::Implausible {
                field,
                value: count as i64,
            }),
        }
    }
}

/// Interpret a fixed-size field as a NUL-terminated UTF-8 string.
pub(crate) fn c_str(bytes: &[u8]) -> Option<&str> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    std::str::from_utf8(&bytes[..end]).ok()
}
