//! Zero-copy views over the auxiliary sub-regions (coordinates, street
//! names, original-edge metadata).

use zerocopy::FromBytes;

use crate::formats::OriginalEdgeData;
use crate::geo::Coordinate;
use crate::store::{
    Region, StoreError, COORDINATE_LIST, NAME_CHAR_LIST, NAME_OFFSET_LIST, ORIGINAL_EDGE_LIST,
};

/// Per-node coordinates, indexed by `NodeId`.
pub fn coordinate_list(region: &Region) -> Result<&[Coordinate], StoreError> {
    Coordinate::slice_from(region.find(COORDINATE_LIST)?)
        .ok_or_else(|| StoreError::Corrupt("coordinate list is not a coordinate array".into()))
}

/// Original-edge metadata, indexed by original edge id.
pub fn original_edge_list(region: &Region) -> Result<&[OriginalEdgeData], StoreError> {
    OriginalEdgeData::slice_from(region.find(ORIGINAL_EDGE_LIST)?)
        .ok_or_else(|| StoreError::Corrupt("original-edge list is malformed".into()))
}

/// Street-name lookup over the flat character array and its cumulative
/// offset index.
pub struct NameView<'a> {
    chars: &'a [u8],
    offsets: &'a [u32],
}

impl<'a> NameView<'a> {
    pub fn attach(region: &'a Region) -> Result<Self, StoreError> {
        let chars = region.find(NAME_CHAR_LIST)?;
        let offsets = u32::slice_from(region.find(NAME_OFFSET_LIST)?)
            .ok_or_else(|| StoreError::Corrupt("name offset list is malformed".into()))?;
        if offsets.first() != Some(&0) {
            return Err(StoreError::Corrupt("name offsets must start at 0".into()));
        }
        if offsets.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(StoreError::Corrupt(
                "name offsets must be non-decreasing".into(),
            ));
        }
        if offsets[offsets.len() - 1] as usize > chars.len() {
            return Err(StoreError::Corrupt(
                "name offsets point past the character array".into(),
            ));
        }
        Ok(Self { chars, offsets })
    }

    pub fn number_of_names(&self) -> u32 {
        self.offsets.len() as u32 - 1
    }

    /// Raw bytes of the name with the given id.
    pub fn get(&self, name_id: u32) -> &'a [u8] {
        let begin = self.offsets[name_id as usize] as usize;
        let end = self.offsets[name_id as usize + 1] as usize;
        &self.chars[begin..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{RegionBuilder, NAME_CHAR_LIST, NAME_OFFSET_LIST};
    use zerocopy::AsBytes;

    fn name_region(dir: &std::path::Path, offsets: &[u32]) -> Region {
        let path = dir.join("region.bin");
        let mut builder = RegionBuilder::create(&path);
        builder.append(NAME_CHAR_LIST, b"abcde").unwrap();
        builder.append(NAME_OFFSET_LIST, offsets.as_bytes()).unwrap();
        builder.finish().unwrap();
        Region::attach(&path).unwrap()
    }

    #[test]
    fn well_formed_offsets_attach_and_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let region = name_region(dir.path(), &[0, 2, 2, 5]);
        let names = NameView::attach(&region).unwrap();
        assert_eq!(names.number_of_names(), 3);
        assert_eq!(names.get(0), b"ab");
        assert_eq!(names.get(1), b"");
        assert_eq!(names.get(2), b"cde");
    }

    #[test]
    fn non_monotonic_offsets_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let region = name_region(dir.path(), &[0, 3, 2, 5]);
        assert!(matches!(
            NameView::attach(&region),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn offsets_past_the_character_array_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let region = name_region(dir.path(), &[0, 2, 99]);
        assert!(matches!(
            NameView::attach(&region),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn offsets_not_starting_at_zero_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let region = name_region(dir.path(), &[1, 2, 5]);
        assert!(matches!(
            NameView::attach(&region),
            Err(StoreError::Corrupt(_))
        ));
    }
}
