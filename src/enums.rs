use std::fmt;

/// Channel slot of a [`VoxelRecord`](crate::volume::VoxelRecord).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
    Alpha = 3,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Red, Channel::Green, Channel::Blue, Channel::Alpha];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Byte interpretation of one voxel in a raw source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// One byte per voxel, scaled by 1/255, routed to alpha.
    #[default]
    UnsignedByte,
    /// Little-endian IEEE-754 single per voxel, taken as-is, routed to red.
    Float32,
}

impl Encoding {
    pub fn bytes_per_element(self) -> usize {
        match self {
            Encoding::UnsignedByte => 1,
            Encoding::Float32 => 4,
        }
    }

    pub fn target_channel(self) -> Channel {
        match self {
            Encoding::UnsignedByte => Channel::Alpha,
            Encoding::Float32 => Channel::Red,
        }
    }

    /// Tag appended to asset names, e.g. `skull-A8`.
    pub fn suffix(self) -> &'static str {
        match self {
            Encoding::UnsignedByte => "A8",
            Encoding::Float32 => "R32",
        }
    }

    /// Bit width used by `.binN` cube file extensions.
    pub fn bits(self) -> usize {
        self.bytes_per_element() * 8
    }

    pub fn from_bits(bits: usize) -> Option<Self> {
        match bits {
            8 => Some(Encoding::UnsignedByte),
            32 => Some(Encoding::Float32),
            _ => None,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// What to do when the byte width derived from the file length disagrees
/// with the declared [`Encoding`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SizePolicy {
    /// Log and report a warning, keep decoding.
    #[default]
    Advisory,
    /// Abort with [`VolumeLoaderError::SizeMismatch`](crate::error::VolumeLoaderError::SizeMismatch).
    Strict,
}
