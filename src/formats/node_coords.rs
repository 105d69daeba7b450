//! Coordinate stream codec.
//!
//! A bare sequence of fixed-size `{ lat: i32, lon: i32 }` records, one per
//! node; the record count comes from the graph blob, not from this stream.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use zerocopy::{AsBytes, FromBytes};

use crate::geo::Coordinate;

pub struct NodeCoordsFile;

impl NodeCoordsFile {
    pub fn write<P: AsRef<Path>>(path: P, coordinates: &[Coordinate]) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("failed to create {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(coordinates.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    pub fn read<P: AsRef<Path>>(path: P, number_of_nodes: u32) -> Result<Vec<Coordinate>> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("failed to open {}", path.as_ref().display()))?;
        let mut reader = BufReader::new(file);

        let mut coordinates = Vec::with_capacity(number_of_nodes as usize);
        let mut buf = [0u8; std::mem::size_of::<Coordinate>()];
        for i in 0..number_of_nodes {
            reader
                .read_exact(&mut buf)
                .with_context(|| format!("truncated coordinate stream: record {i}"))?;
            coordinates.push(
                Coordinate::read_from(&buf[..])
                    .with_context(|| format!("undecodable coordinate record {i}"))?,
            );
        }
        Ok(coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nodes.bin");

        let coordinates = vec![
            Coordinate::from_degrees(52.5, 13.4),
            Coordinate::from_degrees(48.1, 11.6),
        ];
        NodeCoordsFile::write(&path, &coordinates).unwrap();
        assert_eq!(NodeCoordsFile::read(&path, 2).unwrap(), coordinates);
    }

    #[test]
    fn short_stream_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nodes.bin");
        NodeCoordsFile::write(&path, &[Coordinate::new(1, 2)]).unwrap();
        assert!(NodeCoordsFile::read(&path, 2).is_err());
    }
}
