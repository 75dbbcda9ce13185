use crate::enums::{Channel, Encoding};
use crate::error::VolumeLoaderError;

use image::{GrayImage, ImageBuffer};
use ndarray::Array3;
use rayon::prelude::*;

/// Declared size of a volume along its three axes.
///
/// The first axis (`nx`) varies fastest in the raw source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VolumeExtents {
    nx: usize,
    ny: usize,
    nz: usize,
}

impl VolumeExtents {
    /// # Errors
    ///
    /// Returns [`VolumeLoaderError::InvalidExtents`] if any axis is zero or the
    /// element count does not fit in `usize`.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Result<Self, VolumeLoaderError> {
        let valid = nx > 0
            && ny > 0
            && nz > 0
            && nx.checked_mul(ny).and_then(|n| n.checked_mul(nz)).is_some();
        if !valid {
            return Err(VolumeLoaderError::InvalidExtents((nx, ny, nz)));
        }
        Ok(Self { nx, ny, nz })
    }

    pub fn cube(n: usize) -> Result<Self, VolumeLoaderError> {
        Self::new(n, n, n)
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn nz(&self) -> usize {
        self.nz
    }

    /// `(nx, ny, nz)`
    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    /// Get the dimensions as (depth, height, width)
    pub fn dim(&self) -> (usize, usize, usize) {
        (self.nz, self.ny, self.nx)
    }

    pub fn element_count(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Bytes a source needs to hold every element under `encoding`, or
    /// `None` if that does not fit in `usize`.
    pub fn byte_len(&self, encoding: Encoding) -> Option<usize> {
        self.element_count().checked_mul(encoding.bytes_per_element())
    }

    /// Linear index of `(x, y, z)` with `x` fastest.
    #[inline]
    pub fn linear_index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.nx * (y + self.ny * z)
    }
}

/// Four parallel channels of one voxel, laid out as RGBA32F.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VoxelRecord {
    pub channels: [f32; 4],
}

impl VoxelRecord {
    /// A record holding `value` in `channel` and zero everywhere else.
    #[inline]
    pub fn with_scalar(channel: Channel, value: f32) -> Self {
        let mut channels = [0.0; 4];
        channels[channel.index()] = value;
        Self { channels }
    }

    #[inline]
    pub fn get(&self, channel: Channel) -> f32 {
        self.channels[channel.index()]
    }
}

/// One-hot vector telling downstream materials which channel holds data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelSelector(Channel);

impl ChannelSelector {
    pub fn for_encoding(encoding: Encoding) -> Self {
        Self(encoding.target_channel())
    }

    pub fn as_array(&self) -> [f32; 4] {
        let mut flags = [0.0; 4];
        flags[self.0.index()] = 1.0;
        flags
    }

    pub fn active_channel(&self) -> Channel {
        self.0
    }
}

/// Decoded volume, ready for texture construction. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeArtifact {
    records: Vec<VoxelRecord>,
    extents: VolumeExtents,
    encoding: Encoding,
    selector: ChannelSelector,
}

impl VolumeArtifact {
    /// Callers must pass `records.len() == extents.element_count()`; the
    /// assembler is the only producer.
    pub(crate) fn new(
        records: Vec<VoxelRecord>,
        extents: VolumeExtents,
        encoding: Encoding,
        selector: ChannelSelector,
    ) -> Self {
        debug_assert_eq!(records.len(), extents.element_count());
        Self {
            records,
            extents,
            encoding,
            selector,
        }
    }

    pub fn records(&self) -> &[VoxelRecord] {
        &self.records
    }

    pub fn extents(&self) -> VolumeExtents {
        self.extents
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn suffix(&self) -> &'static str {
        self.encoding.suffix()
    }

    pub fn selector(&self) -> ChannelSelector {
        self.selector
    }

    /// Name under which the built texture is persisted: `{base}-{suffix}`.
    pub fn asset_name(&self, base: &str) -> String {
        format!("{base}-{}", self.suffix())
    }

    /// Records as tightly packed RGBA32F bytes, x fastest.
    pub fn texel_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.records)
    }

    /// One channel as an array of shape (depth, height, width).
    pub fn channel_array(&self, channel: Channel) -> Array3<f32> {
        let extents = self.extents;
        Array3::from_shape_fn(extents.dim(), |(z, y, x)| {
            self.records[extents.linear_index(x, y, z)].get(channel)
        })
    }

    pub fn active_array(&self) -> Array3<f32> {
        self.channel_array(self.selector.active_channel())
    }

    #[inline]
    fn normalize_to_u8(value: f32) -> u8 {
        (value.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    /// Render axial slice `z` of the active channel as a grayscale image.
    pub fn axial_image(&self, z: usize) -> Option<GrayImage> {
        let (depth, height, width) = self.extents.dim();
        if z >= depth {
            return None;
        }
        let channel = self.selector.active_channel();
        let start = z * width * height;
        let pixel_data: Vec<u8> = self.records[start..start + width * height]
            .par_iter()
            .map(|record| Self::normalize_to_u8(record.get(channel)))
            .collect();
        ImageBuffer::from_raw(width as u32, height as u32, pixel_data)
    }
}
