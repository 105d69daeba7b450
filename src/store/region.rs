//! Named shared region: one memory-mappable file holding several named,
//! 8-byte-aligned sub-allocations.
//!
//! File layout (little-endian):
//!
//! ```text
//! header (16 bytes):  magic u32 "RGN1", version u16, reserved u16,
//!                     entry_count u32, reserved u32
//! directory:          entry_count x { name [32]u8 NUL-padded,
//!                                     offset u64, len u64 }
//! payload:            sub-region bytes, each padded to 8-byte alignment
//! footer (8 bytes):   crc64 over header + directory + payload
//! ```
//!
//! The builder stages into `<path>.partial` and renames on `finish()`;
//! the rename is the publication signal, so readers can never map a
//! half-written region. Readers attach with a read-only map and hold it
//! for the life of the `Region`; unlinking the file (teardown) leaves
//! existing maps valid until their owners drop them.

use std::fs::File;
use std::io::Write;
use std::ops::Range;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use rustc_hash::FxHashMap;

use crate::formats::crc;
use crate::store::StoreError;

const MAGIC: u32 = 0x52474E31; // "RGN1"
const VERSION: u16 = 1;
const HEADER_SIZE: usize = 16;
const NAME_SIZE: usize = 32;
const DIR_ENTRY_SIZE: usize = NAME_SIZE + 8 + 8;
const FOOTER_SIZE: usize = 8;

fn align8(len: usize) -> usize {
    (len + 7) & !7
}

/// Write side: collects named sub-regions and publishes them atomically.
pub struct RegionBuilder {
    path: PathBuf,
    entries: Vec<(String, Vec<u8>)>,
}

impl RegionBuilder {
    pub fn create<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            entries: Vec::new(),
        }
    }

    /// Stage a named sub-region. Names are unique and at most 31 bytes.
    pub fn append(&mut self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        if name.is_empty() || name.len() >= NAME_SIZE {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        if self.entries.iter().any(|(existing, _)| existing == name) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        self.entries.push((name.to_string(), bytes.to_vec()));
        Ok(())
    }

    /// Assemble, checksum, fsync and atomically rename into place.
    pub fn finish(self) -> Result<(), StoreError> {
        let dir_len = self.entries.len() * DIR_ENTRY_SIZE;
        let payload_base = HEADER_SIZE + dir_len;

        let mut image = Vec::with_capacity(
            payload_base
                + self
                    .entries
                    .iter()
                    .map(|(_, bytes)| align8(bytes.len()))
                    .sum::<usize>()
                + FOOTER_SIZE,
        );
        image.extend_from_slice(&MAGIC.to_le_bytes());
        image.extend_from_slice(&VERSION.to_le_bytes());
        image.extend_from_slice(&0u16.to_le_bytes());
        image.extend_from_slice(&(self.entries.len() as u32).to_le_bytes());
        image.extend_from_slice(&0u32.to_le_bytes());

        let mut offset = payload_base as u64;
        for (name, bytes) in &self.entries {
            let mut name_field = [0u8; NAME_SIZE];
            name_field[..name.len()].copy_from_slice(name.as_bytes());
            image.extend_from_slice(&name_field);
            image.extend_from_slice(&offset.to_le_bytes());
            image.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
            offset += align8(bytes.len()) as u64;
        }
        debug_assert_eq!(image.len(), payload_base);

        for (_, bytes) in &self.entries {
            image.extend_from_slice(bytes);
            image.resize(align8(image.len()), 0);
        }

        let body_crc = crc::checksum(&image);
        image.extend_from_slice(&body_crc.to_le_bytes());

        let staging = self.path.with_extension("partial");
        let mut file = File::create(&staging)?;
        file.write_all(&image)?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

/// Read side: a read-only map over a published region with name-keyed
/// access to its sub-allocations.
pub struct Region {
    map: Mmap,
    directory: FxHashMap<String, Range<usize>>,
}

impl Region {
    /// Attach to a published region file. Fails when the file is absent
    /// (not yet published, or torn down) or structurally invalid.
    pub fn attach<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let file = File::open(path.as_ref())?;
        // Published regions are immutable by protocol; the map stays
        // coherent because nobody writes after the rename.
        let map = unsafe { Mmap::map(&file)? };

        if map.len() < HEADER_SIZE + FOOTER_SIZE {
            return Err(StoreError::Corrupt("file shorter than header".into()));
        }
        let magic = u32::from_le_bytes(map[0..4].try_into().unwrap());
        if magic != MAGIC {
            return Err(StoreError::Corrupt(format!("bad magic {magic:#010x}")));
        }
        let version = u16::from_le_bytes(map[4..6].try_into().unwrap());
        if version != VERSION {
            return Err(StoreError::Corrupt(format!("unsupported version {version}")));
        }
        let entry_count = u32::from_le_bytes(map[8..12].try_into().unwrap()) as usize;

        let payload_base = HEADER_SIZE + entry_count * DIR_ENTRY_SIZE;
        let payload_end = map.len() - FOOTER_SIZE;
        if payload_base > payload_end {
            return Err(StoreError::Corrupt("directory exceeds file".into()));
        }

        let mut directory = FxHashMap::default();
        for index in 0..entry_count {
            let entry = &map[HEADER_SIZE + index * DIR_ENTRY_SIZE..][..DIR_ENTRY_SIZE];
            let name_end = entry[..NAME_SIZE]
                .iter()
                .position(|&b| b == 0)
                .unwrap_or(NAME_SIZE);
            let name = std::str::from_utf8(&entry[..name_end])
                .map_err(|_| StoreError::Corrupt(format!("non-utf8 name in entry {index}")))?
                .to_string();
            let offset = u64::from_le_bytes(entry[NAME_SIZE..NAME_SIZE + 8].try_into().unwrap());
            let len = u64::from_le_bytes(entry[NAME_SIZE + 8..].try_into().unwrap());

            let begin = offset as usize;
            let end = begin
                .checked_add(len as usize)
                .ok_or_else(|| StoreError::Corrupt(format!("overflowing entry {index}")))?;
            if begin < payload_base || end > payload_end {
                return Err(StoreError::Corrupt(format!(
                    "sub-region `{name}` outside the payload"
                )));
            }
            directory.insert(name, begin..end);
        }

        Ok(Self { map, directory })
    }

    /// Locate a sub-region by name.
    pub fn find(&self, name: &str) -> Result<&[u8], StoreError> {
        self.directory
            .get(name)
            .map(|range| &self.map[range.clone()])
            .ok_or_else(|| StoreError::RegionNotFound(name.to_string()))
    }

    pub fn sub_region_names(&self) -> impl Iterator<Item = &str> {
        self.directory.keys().map(String::as_str)
    }

    /// Re-checksum the whole region against its footer.
    pub fn verify(&self) -> Result<(), StoreError> {
        let body = &self.map[..self.map.len() - FOOTER_SIZE];
        let footer = &self.map[self.map.len() - FOOTER_SIZE..];
        let stored = u64::from_le_bytes(footer.try_into().unwrap());
        if crc::checksum(body) != stored {
            return Err(StoreError::Corrupt("checksum mismatch".into()));
        }
        Ok(())
    }

    /// Operator-triggered teardown: unlink the region file. Outstanding
    /// maps stay valid until their readers drop them.
    pub fn remove<P: AsRef<Path>>(path: P) -> Result<(), StoreError> {
        std::fs::remove_file(path.as_ref())?;
        Ok(())
    }
}
