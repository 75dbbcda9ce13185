use crate::decoder::ScalarDecoder;
use crate::enums::{Encoding, SizePolicy};
use crate::error::{VolumeLoaderError, VolumeWarning};
use crate::volume::VolumeExtents;

/// Result of comparing a source length against declared extents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DimensionCheck {
    pub source_len: usize,
    pub element_count: usize,
    /// `source_len / element_count`, integer division. Diagnostic only.
    pub bytes_per_element: usize,
}

impl DimensionCheck {
    pub fn new(extents: &VolumeExtents, source_len: usize) -> Self {
        let element_count = extents.element_count();
        Self {
            source_len,
            element_count,
            bytes_per_element: source_len / element_count,
        }
    }

    pub fn matches(&self, encoding: Encoding) -> bool {
        self.bytes_per_element == encoding.bytes_per_element()
    }
}

pub(crate) struct DimensionValidator;

impl DimensionValidator {
    /// Derive the per-element width of a source and compare it to `encoding`.
    ///
    /// A mismatch yields a warning under [`SizePolicy::Advisory`] and an
    /// error under [`SizePolicy::Strict`]. Under the advisory policy short
    /// sources are left to the decoder; under the strict one they fail here
    /// with the same [`VolumeLoaderError::Read`].
    pub(crate) fn validate(
        extents: &VolumeExtents,
        source_len: usize,
        encoding: Encoding,
        policy: SizePolicy,
    ) -> Result<(DimensionCheck, Option<VolumeWarning>), VolumeLoaderError> {
        let check = DimensionCheck::new(extents, source_len);
        log::info!(
            "File length = {} bytes, Data size = {} points -> {} byte(s) per point",
            check.source_len,
            check.element_count,
            check.bytes_per_element
        );

        if check.matches(encoding) {
            return Ok((check, None));
        }

        let derived = check.bytes_per_element;
        let expected = encoding.bytes_per_element();
        match policy {
            SizePolicy::Advisory => {
                log::warn!(
                    "Source holds {derived} byte(s) per point but {encoding} expects {expected}, decoding anyway"
                );
                Ok((check, Some(VolumeWarning::SizeMismatch { derived, expected })))
            }
            SizePolicy::Strict if derived < expected => Err(VolumeLoaderError::Read {
                expected: ScalarDecoder::required_len(extents, encoding),
                available: check.source_len,
            }),
            SizePolicy::Strict => Err(VolumeLoaderError::SizeMismatch { derived, expected }),
        }
    }
}
