use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use raw_volume::{
    ChannelSelector, Encoding, LoadOptions, SizePolicy, VolumeExtents, VolumeLoader,
    VolumeLoaderError, cube,
    gpu_texture::{VolumeTexture, WGPU, WgpuTextureBuilder},
    handoff::{MemoryStore, TextureBinder, hand_off},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// 8-bit unsigned, alpha channel
    A8,
    /// 32-bit float, red channel
    R32,
}

impl From<Format> for Encoding {
    fn from(format: Format) -> Self {
        match format {
            Format::A8 => Encoding::UnsignedByte,
            Format::R32 => Encoding::Float32,
        }
    }
}

/// Decode a headerless raw volume file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raw volume file
    path: PathBuf,

    /// Extents as NX NY NZ; inferred from `*_NXxNYxNZ.binN` names if omitted
    #[arg(long, num_args = 3, value_names = ["NX", "NY", "NZ"])]
    size: Option<Vec<usize>>,

    /// Voxel encoding; inferred from `.bin8`/`.bin32` names if omitted
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Request a mip chain for the GPU texture
    #[arg(long)]
    mipmap: bool,

    /// Fail if the file length does not match the encoding
    #[arg(long)]
    strict: bool,

    /// Write the centre axial slice to this PNG
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Upload the volume to a 3D texture on the default GPU
    #[arg(long)]
    gpu: bool,
}

/// No render target exists in a headless run.
struct Headless;

impl TextureBinder<VolumeTexture> for Headless {
    fn bind(&mut self, _handle: &VolumeTexture, _selector: ChannelSelector) -> Result<(), String> {
        Err("no render target in headless mode".to_owned())
    }
}

fn options(args: &Args) -> Result<LoadOptions, VolumeLoaderError> {
    let inferred = args
        .path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(cube::parse_cube_file_name);

    let extents = match (&args.size, inferred) {
        (Some(size), _) => VolumeExtents::new(size[0], size[1], size[2])?,
        (None, Some((extents, _))) => extents,
        (None, None) => VolumeExtents::cube(256)?,
    };
    let encoding = args
        .format
        .map(Encoding::from)
        .or(inferred.map(|(_, encoding)| encoding))
        .unwrap_or_default();
    let size_policy = if args.strict {
        SizePolicy::Strict
    } else {
        SizePolicy::Advisory
    };

    Ok(LoadOptions::new(extents, encoding)
        .with_mipmap(args.mipmap)
        .with_size_policy(size_policy))
}

async fn run(args: Args) -> Result<(), VolumeLoaderError> {
    let options = options(&args)?;
    let decoded = VolumeLoader::load_from_path_async(&args.path, &options).await?;
    let artifact = &decoded.artifact;
    log::info!(
        "Decoded {:?} as {} ({} warning(s))",
        artifact.extents().as_tuple(),
        artifact.suffix(),
        decoded.warnings.len()
    );

    if let Some(preview) = &args.preview {
        let (depth, _, _) = artifact.extents().dim();
        if let Some(image) = artifact.axial_image(depth / 2) {
            image
                .save(preview)
                .map_err(|e| VolumeLoaderError::Io(std::io::Error::other(e)))?;
        }
    }

    if args.gpu {
        let base_name = args
            .path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("volume");
        let builder = WgpuTextureBuilder::new(WGPU::request().await?);
        let mut store = MemoryStore::default();
        let result = hand_off(
            artifact,
            base_name,
            options.mipmap,
            &builder,
            Some(&mut store),
            &mut Headless,
        )?;
        log::info!(
            "Built {} with {} mip level(s)",
            result.asset_name,
            result.handle.mip_level_count
        );
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(args).await {
        log::error!("{e}");
        std::process::exit(1);
    }
}
