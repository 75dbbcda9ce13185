use crate::enums::Encoding;
use crate::error::VolumeLoaderError;
use crate::volume::VolumeExtents;

use byteorder::{ByteOrder, LittleEndian};
use std::io::Read;

pub(crate) struct ScalarDecoder;

impl ScalarDecoder {
    /// Bytes required for `extents` under `encoding`, saturating at
    /// `usize::MAX` so that no source can satisfy an unrepresentable length.
    pub(crate) fn required_len(extents: &VolumeExtents, encoding: Encoding) -> usize {
        extents.byte_len(encoding).unwrap_or(usize::MAX)
    }

    /// Decode one normalized scalar per element of `extents` from `source`,
    /// in source order.
    ///
    /// Bytes past the required length are ignored.
    pub(crate) fn decode_bytes(
        source: &[u8],
        extents: &VolumeExtents,
        encoding: Encoding,
    ) -> Result<Vec<f32>, VolumeLoaderError> {
        let expected = Self::required_len(extents, encoding);
        let bytes = source.get(..expected).ok_or(VolumeLoaderError::Read {
            expected,
            available: source.len(),
        })?;

        let scalars = match encoding {
            Encoding::UnsignedByte => Self::decode_unsigned_bytes(bytes),
            Encoding::Float32 => Self::decode_float32(bytes),
        };
        Ok(scalars)
    }

    /// Read the bytes required for `extents` from `reader` into memory, then
    /// decode them.
    ///
    /// `len_hint` is the known source length; the buffer never reserves more
    /// than that up front.
    pub(crate) fn decode_reader(
        reader: impl Read,
        extents: &VolumeExtents,
        encoding: Encoding,
        len_hint: usize,
    ) -> Result<Vec<f32>, VolumeLoaderError> {
        let expected = Self::required_len(extents, encoding);
        let mut buffer = Vec::with_capacity(expected.min(len_hint));
        reader
            .take(u64::try_from(expected).unwrap_or(u64::MAX))
            .read_to_end(&mut buffer)?;
        Self::decode_bytes(&buffer, extents, encoding)
    }

    #[inline]
    fn decode_unsigned_bytes(bytes: &[u8]) -> Vec<f32> {
        bytes
            .iter()
            .map(|&value| value as f32 / u8::MAX as f32)
            .collect()
    }

    // No range check: values outside [0, 1] pass through.
    #[inline]
    fn decode_float32(bytes: &[u8]) -> Vec<f32> {
        let mut scalars = vec![0.0; bytes.len() / 4];
        LittleEndian::read_f32_into(bytes, &mut scalars);
        scalars
    }
}
