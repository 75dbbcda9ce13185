use crate::error::VolumeLoaderError;
use crate::handoff::TextureBuilder;
use crate::volume::{VolumeArtifact, VolumeExtents};

pub struct WGPU {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl WGPU {
    /// Open the default adapter and device.
    pub async fn request() -> Result<Self, VolumeLoaderError> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .map_err(|e| VolumeLoaderError::Texture(e.to_string()))?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .map_err(|e| VolumeLoaderError::Texture(e.to_string()))?;
        Ok(Self { device, queue })
    }
}

/// A 3D RGBA32F texture holding one artifact at mip level 0.
#[derive(Clone, Debug)]
pub struct VolumeTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub extents: VolumeExtents,
    pub mip_level_count: u32,
}

pub struct WgpuTextureBuilder {
    wgpu: WGPU,
}

impl WgpuTextureBuilder {
    pub fn new(wgpu: WGPU) -> Self {
        Self { wgpu }
    }

    /// Full chain length for the largest axis, or 1 without mipmaps.
    pub fn mip_level_count(extents: &VolumeExtents, mipmap: bool) -> u32 {
        if !mipmap {
            return 1;
        }
        let (nx, ny, nz) = extents.as_tuple();
        let largest = nx.max(ny).max(nz);
        usize::BITS - largest.leading_zeros()
    }

    fn texture_size(&self, extents: &VolumeExtents) -> Result<wgpu::Extent3d, VolumeLoaderError> {
        let max = self.wgpu.device.limits().max_texture_dimension_3d;
        let (nx, ny, nz) = extents.as_tuple();
        let axis = |n: usize| {
            u32::try_from(n)
                .ok()
                .filter(|&n| n <= max)
                .ok_or_else(|| {
                    VolumeLoaderError::Texture(format!(
                        "extent {n} exceeds the 3D texture limit of {max}"
                    ))
                })
        };
        Ok(wgpu::Extent3d {
            width: axis(nx)?,
            height: axis(ny)?,
            depth_or_array_layers: axis(nz)?,
        })
    }
}

impl TextureBuilder for WgpuTextureBuilder {
    type Handle = VolumeTexture;

    fn build(
        &self,
        artifact: &VolumeArtifact,
        mipmap: bool,
    ) -> Result<VolumeTexture, VolumeLoaderError> {
        let extents = artifact.extents();
        let texture_size = self.texture_size(&extents)?;
        let mip_level_count = Self::mip_level_count(&extents, mipmap);
        let WGPU { device, queue } = &self.wgpu;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Volume 3D Texture"),
            size: texture_size,
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D3,
            format: wgpu::TextureFormat::Rgba32Float,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        // Level 0 only; lower levels belong to the mip post-step.
        queue.write_texture(
            wgpu::TexelCopyTextureInfoBase {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            artifact.texel_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(
                    texture_size.width * std::mem::size_of::<[f32; 4]>() as u32,
                ),
                rows_per_image: Some(texture_size.height),
            },
            texture_size,
        );
        log::debug!(
            "Uploaded {} texels ({} mip levels)",
            extents.element_count(),
            mip_level_count
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(VolumeTexture {
            texture,
            view,
            extents,
            mip_level_count,
        })
    }
}
