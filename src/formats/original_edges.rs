//! Original-edge metadata stream codec.
//!
//! One fixed-size record per original (pre-expansion) edge, carrying the
//! via node used for shortcut unpacking and the street name id. Layout:
//! `count: u32`, then `count` records.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use zerocopy::{AsBytes, FromBytes, FromZeroes};

use crate::NodeId;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromZeroes, FromBytes, AsBytes)]
pub struct OriginalEdgeData {
    pub via_node: NodeId,
    pub name_id: u32,
}

pub struct OriginalEdgesFile;

impl OriginalEdgesFile {
    pub fn write<P: AsRef<Path>>(path: P, records: &[OriginalEdgeData]) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("failed to create {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&(records.len() as u32).to_le_bytes())?;
        writer.write_all(records.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<OriginalEdgeData>> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("failed to open {}", path.as_ref().display()))?;
        let mut reader = BufReader::new(file);

        let mut count_buf = [0u8; 4];
        reader
            .read_exact(&mut count_buf)
            .context("truncated original-edge stream: count")?;
        let count = u32::from_le_bytes(count_buf);

        let mut records = Vec::with_capacity(count as usize);
        let mut buf = [0u8; std::mem::size_of::<OriginalEdgeData>()];
        for i in 0..count {
            reader
                .read_exact(&mut buf)
                .with_context(|| format!("truncated original-edge stream: record {i}"))?;
            records.push(
                OriginalEdgeData::read_from(&buf[..])
                    .with_context(|| format!("undecodable original-edge record {i}"))?,
            );
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.bin");

        let records = vec![
            OriginalEdgeData {
                via_node: 7,
                name_id: 1,
            },
            OriginalEdgeData {
                via_node: 9,
                name_id: 2,
            },
        ];
        OriginalEdgesFile::write(&path, &records).unwrap();
        assert_eq!(OriginalEdgesFile::read(&path).unwrap(), records);
    }

    #[test]
    fn truncated_stream_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.bin");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 8]);
        std::fs::write(&path, bytes).unwrap();
        assert!(OriginalEdgesFile::read(&path).is_err());
    }
}
