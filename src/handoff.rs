//! Hand-off of a decoded [`VolumeArtifact`] to texture construction,
//! persistence and attachment.
//!
//! The decoder never touches these collaborators itself. Callers decide
//! which of them are available and drive them through [`hand_off`].

use crate::error::{VolumeLoaderError, VolumeWarning};
use crate::volume::{ChannelSelector, VolumeArtifact};

use std::collections::HashMap;

/// Builds a texture from an artifact.
pub trait TextureBuilder {
    type Handle;

    /// `mipmap` is opaque to the decoder and only interpreted here.
    fn build(
        &self,
        artifact: &VolumeArtifact,
        mipmap: bool,
    ) -> Result<Self::Handle, VolumeLoaderError>;
}

/// Store-once persistence of built textures under a name.
pub trait TextureStore<H> {
    fn store(&mut self, name: &str, handle: &H) -> Result<(), VolumeLoaderError>;
}

/// Binds a texture and its channel selector to a render target.
pub trait TextureBinder<H> {
    /// Returns a description of the failure if no target accepts the texture.
    fn bind(&mut self, handle: &H, selector: ChannelSelector) -> Result<(), String>;
}

/// In-process [`TextureStore`] keeping the first handle stored per name.
#[derive(Debug)]
pub struct MemoryStore<H> {
    entries: HashMap<String, H>,
}

impl<H> Default for MemoryStore<H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<H> MemoryStore<H> {
    pub fn get(&self, name: &str) -> Option<&H> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H: Clone> TextureStore<H> for MemoryStore<H> {
    fn store(&mut self, name: &str, handle: &H) -> Result<(), VolumeLoaderError> {
        self.entries
            .entry(name.to_owned())
            .or_insert_with(|| handle.clone());
        Ok(())
    }
}

/// Result of a hand-off: the built texture and any non-fatal problems.
#[derive(Debug)]
pub struct HandOff<H> {
    pub handle: H,
    pub asset_name: String,
    pub warnings: Vec<VolumeWarning>,
}

/// Build, optionally persist, then attach a texture for `artifact`.
///
/// # Errors
///
/// Fails if texture construction or persistence fails. Attachment failures
/// are logged and returned as [`VolumeWarning::AttachmentFailed`].
pub fn hand_off<B, S, A>(
    artifact: &VolumeArtifact,
    base_name: &str,
    mipmap: bool,
    builder: &B,
    store: Option<&mut S>,
    binder: &mut A,
) -> Result<HandOff<B::Handle>, VolumeLoaderError>
where
    B: TextureBuilder,
    S: TextureStore<B::Handle>,
    A: TextureBinder<B::Handle>,
{
    let handle = builder.build(artifact, mipmap)?;
    let asset_name = artifact.asset_name(base_name);

    if let Some(store) = store {
        store.store(&asset_name, &handle)?;
        log::info!("Stored texture as {asset_name}");
    }

    let mut warnings = Vec::new();
    if let Err(reason) = binder.bind(&handle, artifact.selector()) {
        log::warn!("Could not attach {asset_name}: {reason}");
        warnings.push(VolumeWarning::AttachmentFailed(reason));
    }

    Ok(HandOff {
        handle,
        asset_name,
        warnings,
    })
}
