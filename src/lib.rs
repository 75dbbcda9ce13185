//! # raw-volume library
//!
//! This crate decodes headerless binary files holding a regularly sampled 3D
//! scalar field into channel-tagged texel arrays ready for GPU upload.
//!
//! A raw file carries no header: its layout is given entirely by the
//! declared extents `(nx, ny, nz)` and an [`Encoding`]:
//!  - `UnsignedByte` (suffix `A8`): one byte per voxel, scaled to [0, 1] and
//!    placed in the alpha channel
//!  - `Float32` (suffix `R32`): one little-endian `f32` per voxel, taken as
//!    already normalized and placed in the red channel
//!
//! The first axis varies fastest in the file. Decoding runs
//! `validate → decode → map → assemble` and yields an immutable
//! [`VolumeArtifact`] together with a one-hot [`ChannelSelector`] telling
//! shaders which channel to read. Texture construction, persistence and
//! attachment are left to the caller; [`handoff`] describes them as traits
//! and [`gpu_texture`] provides a wgpu texture builder.
//!
//! Files whose length does not match the encoding are decoded anyway and
//! reported with a [`VolumeWarning`] unless [`SizePolicy::Strict`] is set.
//! Files that are too short always fail with [`VolumeLoaderError::Read`].
//!
//! # Examples
//!
//! ## Decoding an 8-bit volume
//!
//! ```no_run
//! # use raw_volume::{Encoding, LoadOptions, VolumeExtents, VolumeLoader};
//! let extents = VolumeExtents::new(256, 256, 256).expect("extents are positive");
//! let options = LoadOptions::new(extents, Encoding::UnsignedByte);
//! let decoded = VolumeLoader::load_from_path("skull.raw", &options)
//!     .expect("should have decoded the raw file");
//! let image = decoded
//!     .artifact
//!     .axial_image(128)
//!     .expect("slice should be inside the volume");
//! image.save("result.png").expect("should have written the preview");
//! ```

mod assembler;
pub mod cube;
mod decoder;
pub mod enums;
pub mod error;
pub mod gpu_texture;
pub mod handoff;
mod mapper;
pub mod validator;
pub mod volume;
pub mod volume_loader;

pub use enums::{Channel, Encoding, SizePolicy};
pub use error::{VolumeLoaderError, VolumeWarning};
pub use volume::{ChannelSelector, VolumeArtifact, VolumeExtents, VoxelRecord};
pub use volume_loader::{DecodedVolume, LoadOptions, VolumeLoader};
