use crate::enums::Encoding;
use crate::volume::{ChannelSelector, VoxelRecord};

use rayon::prelude::*;

pub(crate) struct ChannelMapper;

impl ChannelMapper {
    /// Route every scalar into the encoding's target channel.
    ///
    /// Output order matches input order.
    pub(crate) fn map(scalars: &[f32], encoding: Encoding) -> (Vec<VoxelRecord>, ChannelSelector) {
        let channel = encoding.target_channel();
        let records = scalars
            .par_iter()
            .map(|&scalar| VoxelRecord::with_scalar(channel, scalar))
            .collect();
        (records, ChannelSelector::for_encoding(encoding))
    }
}
