use crate::{
    assembler::VolumeAssembler,
    decoder::ScalarDecoder,
    enums::{Encoding, SizePolicy},
    error::{VolumeLoaderError, VolumeWarning},
    mapper::ChannelMapper,
    validator::{DimensionCheck, DimensionValidator},
    volume::{VolumeArtifact, VolumeExtents},
};

use std::{fs::File, io::BufReader, path::Path};
use web_time::Instant;

/// Parameters of one decode pass.
#[derive(Clone, Copy, Debug)]
pub struct LoadOptions {
    pub extents: VolumeExtents,
    pub encoding: Encoding,
    /// Forwarded to texture construction, not read by the decoder.
    pub mipmap: bool,
    pub size_policy: SizePolicy,
}

impl LoadOptions {
    pub fn new(extents: VolumeExtents, encoding: Encoding) -> Self {
        Self {
            extents,
            encoding,
            mipmap: false,
            size_policy: SizePolicy::default(),
        }
    }

    pub fn with_mipmap(mut self, mipmap: bool) -> Self {
        self.mipmap = mipmap;
        self
    }

    pub fn with_size_policy(mut self, size_policy: SizePolicy) -> Self {
        self.size_policy = size_policy;
        self
    }
}

/// Output of a successful decode: the artifact plus everything that was
/// noticed along the way.
#[derive(Debug)]
pub struct DecodedVolume {
    pub artifact: VolumeArtifact,
    pub check: DimensionCheck,
    pub warnings: Vec<VolumeWarning>,
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// Decode a raw volume held in memory
    ///
    /// # Errors
    ///
    /// Returns [`VolumeLoaderError::Read`] if `bytes` is shorter than the
    /// extents and encoding require. No artifact is produced in that case.
    pub fn load_from_bytes(
        bytes: &[u8],
        options: &LoadOptions,
    ) -> Result<DecodedVolume, VolumeLoaderError> {
        let (check, warning) = Self::validate(bytes.len(), options)?;
        let started = Instant::now();
        let scalars = ScalarDecoder::decode_bytes(bytes, &options.extents, options.encoding)?;
        log::debug!("Decoded {} scalars in {:?}", scalars.len(), started.elapsed());
        Ok(Self::finish(&scalars, check, warning, options))
    }

    /// Decode a raw volume file
    ///
    /// Only the bytes the extents require are read; a longer file is
    /// accepted.
    pub fn load_from_path(
        path: impl AsRef<Path>,
        options: &LoadOptions,
    ) -> Result<DecodedVolume, VolumeLoaderError> {
        let path = path.as_ref();
        log::info!("Opening file {}", path.display());
        let file = File::open(path)?;
        let source_len = usize::try_from(file.metadata()?.len()).unwrap_or(usize::MAX);

        let (check, warning) = Self::validate(source_len, options)?;
        let expected = ScalarDecoder::required_len(&options.extents, options.encoding);
        if source_len < expected {
            return Err(VolumeLoaderError::Read {
                expected,
                available: source_len,
            });
        }

        let started = Instant::now();
        let scalars = ScalarDecoder::decode_reader(
            BufReader::new(file),
            &options.extents,
            options.encoding,
            source_len,
        )?;
        log::debug!("Decoded {} scalars in {:?}", scalars.len(), started.elapsed());
        Ok(Self::finish(&scalars, check, warning, options))
    }

    /// Read a raw volume file without blocking the runtime, then decode it
    pub async fn load_from_path_async(
        path: impl AsRef<Path>,
        options: &LoadOptions,
    ) -> Result<DecodedVolume, VolumeLoaderError> {
        let path = path.as_ref();
        log::info!("Opening file {}", path.display());
        let bytes = tokio::fs::read(path).await?;
        Self::load_from_bytes(&bytes, options)
    }

    fn validate(
        source_len: usize,
        options: &LoadOptions,
    ) -> Result<(DimensionCheck, Option<VolumeWarning>), VolumeLoaderError> {
        DimensionValidator::validate(
            &options.extents,
            source_len,
            options.encoding,
            options.size_policy,
        )
    }

    fn finish(
        scalars: &[f32],
        check: DimensionCheck,
        warning: Option<VolumeWarning>,
        options: &LoadOptions,
    ) -> DecodedVolume {
        let (records, selector) = ChannelMapper::map(scalars, options.encoding);
        let artifact =
            VolumeAssembler::assemble(records, options.extents, options.encoding, selector);
        DecodedVolume {
            artifact,
            check,
            warnings: warning.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Channel;

    fn options(nx: usize, ny: usize, nz: usize, encoding: Encoding) -> LoadOptions {
        LoadOptions::new(VolumeExtents::new(nx, ny, nz).unwrap(), encoding)
    }

    #[test]
    fn two_bytes_to_alpha() {
        let decoded =
            VolumeLoader::load_from_bytes(&[0x00, 0xFF], &options(2, 1, 1, Encoding::UnsignedByte))
                .unwrap();
        let records = decoded.artifact.records();
        assert_eq!(records[0].channels, [0.0, 0.0, 0.0, 0.0]);
        assert_eq!(records[1].channels, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(decoded.artifact.selector().as_array(), [0.0, 0.0, 0.0, 1.0]);
        assert!(decoded.warnings.is_empty());
    }

    #[test]
    fn single_float_to_red() {
        let decoded = VolumeLoader::load_from_bytes(
            &0.5f32.to_le_bytes(),
            &options(1, 1, 1, Encoding::Float32),
        )
        .unwrap();
        assert_eq!(decoded.artifact.records()[0].channels, [0.5, 0.0, 0.0, 0.0]);
        assert_eq!(decoded.artifact.selector().as_array(), [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(decoded.artifact.suffix(), "R32");
    }

    #[test]
    fn one_byte_short_is_a_read_error() {
        let bytes = vec![0u8; 256 * 256 * 256 - 1];
        let result =
            VolumeLoader::load_from_bytes(&bytes, &options(256, 256, 256, Encoding::UnsignedByte));
        assert!(matches!(
            result,
            Err(VolumeLoaderError::Read {
                expected: 16_777_216,
                available: 16_777_215
            })
        ));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn unrepresentable_float_length_yields_no_artifact() {
        let result =
            VolumeLoader::load_from_bytes(&[0u8; 4], &options((1 << 62) + 1, 1, 1, Encoding::Float32));
        assert!(matches!(
            result,
            Err(VolumeLoaderError::Read {
                expected: usize::MAX,
                available: 4
            })
        ));
    }

    #[test]
    fn mismatched_width_still_decodes() {
        // Eight bytes read as UnsignedByte for four declared elements.
        let bytes = [0u8, 51, 102, 153, 204, 255, 1, 2];
        let decoded =
            VolumeLoader::load_from_bytes(&bytes, &options(2, 2, 1, Encoding::UnsignedByte))
                .unwrap();
        assert_eq!(decoded.artifact.records().len(), 4);
        assert_eq!(decoded.artifact.records()[3].get(Channel::Alpha), 0.6);
        assert_eq!(
            decoded.warnings,
            vec![VolumeWarning::SizeMismatch {
                derived: 2,
                expected: 1
            }]
        );
    }

    #[test]
    fn strict_policy_rejects_mismatch() {
        let bytes = [0u8; 8];
        let options = options(2, 2, 1, Encoding::UnsignedByte).with_size_policy(SizePolicy::Strict);
        assert!(matches!(
            VolumeLoader::load_from_bytes(&bytes, &options),
            Err(VolumeLoaderError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn repeated_decodes_are_identical() {
        let bytes: Vec<u8> = (0..=255).collect();
        let options = options(4, 8, 8, Encoding::UnsignedByte);
        let first = VolumeLoader::load_from_bytes(&bytes, &options).unwrap();
        let second = VolumeLoader::load_from_bytes(&bytes, &options).unwrap();
        assert_eq!(first.artifact.texel_bytes(), second.artifact.texel_bytes());
        assert_eq!(first.artifact, second.artifact);
    }
}
