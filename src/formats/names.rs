//! Street-name stream codec.
//!
//! Stream layout: `count: u32`, then for each string `len: u32` followed
//! by its raw bytes. Decoding packs everything into a flat character
//! array with a parallel cumulative-offset index (`offsets[0] = 0`,
//! `offsets[i+1] = offsets[i] + len_i`), so substring lookup by name id
//! is O(1).

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Flat pack of all street names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTable {
    pub chars: Vec<u8>,
    /// `number_of_names + 1` entries.
    pub offsets: Vec<u32>,
}

impl NameTable {
    pub fn number_of_names(&self) -> u32 {
        self.offsets.len() as u32 - 1
    }

    /// Name bytes for `name_id`. Panics on an out-of-range id.
    pub fn get(&self, name_id: u32) -> &[u8] {
        let begin = self.offsets[name_id as usize] as usize;
        let end = self.offsets[name_id as usize + 1] as usize;
        &self.chars[begin..end]
    }
}

pub struct NamesFile;

impl NamesFile {
    pub fn write<P: AsRef<Path>>(path: P, names: &[&str]) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("failed to create {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        writer.write_all(&(names.len() as u32).to_le_bytes())?;
        for name in names {
            writer.write_all(&(name.len() as u32).to_le_bytes())?;
            writer.write_all(name.as_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<NameTable> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("failed to open {}", path.as_ref().display()))?;
        let mut reader = BufReader::new(file);

        let mut count_buf = [0u8; 4];
        reader
            .read_exact(&mut count_buf)
            .context("truncated name stream: count")?;
        let count = u32::from_le_bytes(count_buf);

        let mut chars = Vec::new();
        let mut offsets = Vec::with_capacity(count as usize + 1);
        offsets.push(0u32);
        for i in 0..count {
            let mut len_buf = [0u8; 4];
            reader
                .read_exact(&mut len_buf)
                .with_context(|| format!("truncated name stream: length of string {i}"))?;
            let len = u32::from_le_bytes(len_buf);

            let begin = chars.len();
            chars.resize(begin + len as usize, 0);
            reader
                .read_exact(&mut chars[begin..])
                .with_context(|| format!("truncated name stream: bytes of string {i}"))?;
            offsets.push(chars.len() as u32);
        }

        Ok(NameTable { chars, offsets })
    }
}
