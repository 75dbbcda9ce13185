use crate::enums::Encoding;
use crate::volume::{ChannelSelector, VolumeArtifact, VolumeExtents, VoxelRecord};

pub(crate) struct VolumeAssembler;

impl VolumeAssembler {
    /// Wrap records into an artifact without reordering.
    ///
    /// `records` must already be in source order with the first axis fastest
    /// varying, one record per element of `extents`.
    pub(crate) fn assemble(
        records: Vec<VoxelRecord>,
        extents: VolumeExtents,
        encoding: Encoding,
        selector: ChannelSelector,
    ) -> VolumeArtifact {
        VolumeArtifact::new(records, extents, encoding, selector)
    }
}
