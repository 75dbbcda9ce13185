//! Synthetic data cubes for exercising the loader, and the `.binN` file
//! naming they are written under.

use crate::enums::Encoding;
use crate::volume::VolumeExtents;

use byteorder::{ByteOrder, LittleEndian};
use ndarray::{Array3, s};
use rand::Rng;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

const AXIS_RADIUS: usize = 2;

/// Three orthogonal segments starting at the cube centre, long along the
/// first axis, medium along the second and short along the third.
///
/// Values are 1 on the segments and 0 elsewhere. Indexed `[x, y, z]`.
pub fn axes_cube(n: usize) -> Array3<f32> {
    let mut cube = Array3::<f32>::zeros((n, n, n));
    let half = n / 2;
    let lo = half.saturating_sub(AXIS_RADIUS);
    let hi = (half + AXIS_RADIUS + 1).min(n);
    let end = |fraction: f64| ((half as f64 * (1.0 + fraction)) as usize + 1).min(n);

    cube.slice_mut(s![half..end(3.0 / 3.0), lo..hi, lo..hi]).fill(1.0);
    cube.slice_mut(s![lo..hi, half..end(2.0 / 3.0), lo..hi]).fill(1.0);
    cube.slice_mut(s![lo..hi, lo..hi, half..end(1.0 / 3.0)]).fill(1.0);
    cube
}

/// Value and placement parameters of [`random_sparse_cube`].
#[derive(Clone, Copy, Debug)]
pub struct SparseDots {
    /// Number of dots; `n * n` when `None`.
    pub count: Option<usize>,
    /// Uniform values are raised to this power before scaling.
    pub power: f32,
    pub min: f32,
    pub max: f32,
    /// Centre of the Gaussian weighting as a fraction of the cube size.
    pub gauss_centre: f32,
    /// Width of the Gaussian weighting as a fraction of the cube size; 0 disables it.
    pub gauss_width: f32,
}

impl Default for SparseDots {
    fn default() -> Self {
        Self {
            count: None,
            power: 0.0,
            min: 0.0,
            max: 1.0,
            gauss_centre: 0.5,
            gauss_width: 0.0,
        }
    }
}

/// Scatter random dots into cells, average those landing in the same cell
/// and normalize by the maximum.
///
/// Each dot takes `min + u^power * (max - min)` for a uniform `u`, damped by
/// a Gaussian around the centre when `gauss_width > 0`.
pub fn random_sparse_cube<R: Rng>(n: usize, dots: &SparseDots, rng: &mut R) -> Array3<f32> {
    let mut cube = Array3::<f32>::zeros((n, n, n));
    let mut weight = Array3::<f32>::zeros((n, n, n));
    if n == 0 {
        return cube;
    }

    let count = dots.count.unwrap_or(n * n);
    let size = n as f32;
    let centre = dots.gauss_centre * size;
    let width = dots.gauss_width * size;
    for _ in 0..count {
        let position = [
            rng.gen_range(0.0..size),
            rng.gen_range(0.0..size),
            rng.gen_range(0.0..size),
        ];
        let mut value = dots.min + rng.r#gen::<f32>().powf(dots.power) * (dots.max - dots.min);
        if width > 0.0 {
            let distance: f32 = position.iter().map(|p| ((p - centre) / width).powi(2)).sum();
            value *= (-distance).exp();
        }
        let cell = position.map(|p| (p as usize).min(n - 1));
        cube[cell] += value;
        weight[cell] += 1.0;
    }

    cube.zip_mut_with(&weight, |value, &w| {
        if w >= 1.0 {
            *value /= w;
        }
    });
    let occupied = weight.iter().filter(|&&w| w >= 1.0).count();
    log::info!("{count} dots put in the cube at {occupied} locations");

    let max = cube.fold(0.0f32, |acc, &v| acc.max(v));
    if max > 0.0 {
        cube.mapv_inplace(|v| v / max);
    }
    cube
}

/// `{name}_T321_{nx}x{ny}x{nz}.bin{bits}`
pub fn cube_file_name(name: &str, extents: &VolumeExtents, encoding: Encoding) -> String {
    let (nx, ny, nz) = extents.as_tuple();
    format!("{name}_T321_{nx}x{ny}x{nz}.bin{}", encoding.bits())
}

/// Recover extents and encoding from a name built by [`cube_file_name`].
pub fn parse_cube_file_name(file_name: &str) -> Option<(VolumeExtents, Encoding)> {
    let (stem, bits) = file_name.rsplit_once(".bin")?;
    let encoding = Encoding::from_bits(bits.parse().ok()?)?;
    let (_, dims) = stem.rsplit_once('_')?;

    let mut axes = dims.split('x').map(str::parse::<usize>);
    let (Some(Ok(nx)), Some(Ok(ny)), Some(Ok(nz)), None) =
        (axes.next(), axes.next(), axes.next(), axes.next())
    else {
        return None;
    };
    let extents = VolumeExtents::new(nx, ny, nz).ok()?;
    Some((extents, encoding))
}

/// Write `cube` headerless, first axis fastest.
///
/// Values are expected in [0, 1]. Bytes store `trunc(v * 255)`, floats are
/// little-endian.
pub fn write_cube(mut writer: impl Write, cube: &Array3<f32>, encoding: Encoding) -> io::Result<()> {
    let ordered = cube.t();
    let bytes: Vec<u8> = match encoding {
        Encoding::UnsignedByte => ordered.iter().map(|&v| (v * 255.0) as u8).collect(),
        Encoding::Float32 => {
            let values: Vec<f32> = ordered.iter().copied().collect();
            let mut bytes = vec![0; values.len() * 4];
            LittleEndian::write_f32_into(&values, &mut bytes);
            bytes
        }
    };
    writer.write_all(&bytes)?;
    writer.flush()
}

/// Write `cube` into `dir` under its [`cube_file_name`] and return the path.
pub fn write_cube_file(
    dir: impl AsRef<Path>,
    name: &str,
    cube: &Array3<f32>,
    encoding: Encoding,
) -> io::Result<PathBuf> {
    let (nx, ny, nz) = cube.dim();
    let extents = VolumeExtents::new(nx, ny, nz)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    let path = dir.as_ref().join(cube_file_name(name, &extents, encoding));
    log::info!("writing {}", path.display());
    write_cube(BufWriter::new(File::create(&path)?), cube, encoding)?;
    Ok(path)
}
