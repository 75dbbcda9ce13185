use std::fs;

use ndarray::Array3;
use raw_volume::{
    Channel, Encoding, LoadOptions, SizePolicy, VolumeExtents, VolumeLoader, VolumeLoaderError,
    VolumeWarning, cube,
};

#[test]
fn decodes_8bit_file_into_alpha() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ramp.raw");
    let bytes: Vec<u8> = (0..=255).collect();
    fs::write(&path, &bytes).unwrap();

    let extents = VolumeExtents::new(8, 8, 4).unwrap();
    let decoded =
        VolumeLoader::load_from_path(&path, &LoadOptions::new(extents, Encoding::UnsignedByte))
            .unwrap();

    assert_eq!(decoded.check.bytes_per_element, 1);
    assert!(decoded.warnings.is_empty());
    let records = decoded.artifact.records();
    assert_eq!(records.len(), 256);
    for (record, &byte) in records.iter().zip(&bytes) {
        assert_eq!(record.get(Channel::Alpha), byte as f32 / 255.0);
        assert_eq!(record.channels[..3], [0.0, 0.0, 0.0]);
    }
}

#[test]
fn decodes_float_file_into_red_without_clamping() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("floats.raw");
    let values = [0.0f32, 0.25, -1.0, 3.5, 1.0, 0.5, 0.75, 2.0];
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    fs::write(&path, bytes).unwrap();

    let extents = VolumeExtents::new(2, 2, 2).unwrap();
    let decoded =
        VolumeLoader::load_from_path(&path, &LoadOptions::new(extents, Encoding::Float32))
            .unwrap();

    let red: Vec<f32> = decoded
        .artifact
        .records()
        .iter()
        .map(|r| r.get(Channel::Red))
        .collect();
    assert_eq!(red, values);
    assert_eq!(decoded.artifact.selector().as_array(), [1.0, 0.0, 0.0, 0.0]);
    assert_eq!(decoded.artifact.asset_name("floats"), "floats-R32");
}

#[test]
fn short_file_yields_no_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.raw");
    fs::write(&path, [0u8; 63]).unwrap();

    let extents = VolumeExtents::cube(4).unwrap();
    for policy in [SizePolicy::Advisory, SizePolicy::Strict] {
        let options = LoadOptions::new(extents, Encoding::UnsignedByte).with_size_policy(policy);
        let result = VolumeLoader::load_from_path(&path, &options);
        assert!(matches!(
            result,
            Err(VolumeLoaderError::Read {
                expected: 64,
                available: 63
            })
        ));
    }
}

#[test]
#[cfg(target_pointer_width = "64")]
fn tiny_file_with_huge_extents_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny.raw");
    fs::write(&path, [0u8; 10]).unwrap();

    let extents = VolumeExtents::cube(65_536).unwrap();
    let result =
        VolumeLoader::load_from_path(&path, &LoadOptions::new(extents, Encoding::UnsignedByte));
    assert!(matches!(
        result,
        Err(VolumeLoaderError::Read {
            expected: 281_474_976_710_656,
            available: 10
        })
    ));
}

#[test]
fn float_file_read_as_bytes_warns_but_decodes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mismatch.raw");
    fs::write(&path, [0u8; 32]).unwrap();

    let extents = VolumeExtents::new(2, 2, 2).unwrap();
    let decoded =
        VolumeLoader::load_from_path(&path, &LoadOptions::new(extents, Encoding::UnsignedByte))
            .unwrap();
    assert_eq!(decoded.artifact.records().len(), 8);
    assert_eq!(
        decoded.warnings,
        vec![VolumeWarning::SizeMismatch {
            derived: 4,
            expected: 1
        }]
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let extents = VolumeExtents::cube(2).unwrap();
    let result = VolumeLoader::load_from_path(
        dir.path().join("absent.raw"),
        &LoadOptions::new(extents, Encoding::UnsignedByte),
    );
    assert!(matches!(result, Err(VolumeLoaderError::Io(_))));
}

#[test]
fn written_float_cube_loads_back_in_depth_height_width_order() {
    let dir = tempfile::tempdir().unwrap();
    let source = Array3::from_shape_fn((4, 3, 2), |(x, y, z)| (x + 4 * y + 12 * z) as f32 / 24.0);
    let path = cube::write_cube_file(dir.path(), "ramp", &source, Encoding::Float32).unwrap();

    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap();
    assert_eq!(file_name, "ramp_T321_4x3x2.bin32");
    let (extents, encoding) = cube::parse_cube_file_name(file_name).unwrap();

    let decoded = VolumeLoader::load_from_path(&path, &LoadOptions::new(extents, encoding)).unwrap();
    let active = decoded.artifact.active_array();
    assert_eq!(active.dim(), (2, 3, 4));
    assert_eq!(active, source.t());
    // x fastest in the file means the raw records are already a linear ramp.
    assert!(decoded
        .artifact
        .records()
        .iter()
        .enumerate()
        .all(|(i, r)| r.get(Channel::Red) == i as f32 / 24.0));
}

#[test]
fn written_axes_cube_loads_as_8bit() {
    let dir = tempfile::tempdir().unwrap();
    let source = cube::axes_cube(16);
    let path = cube::write_cube_file(dir.path(), "cube_axes", &source, Encoding::UnsignedByte)
        .unwrap();
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap();
    let (extents, encoding) = cube::parse_cube_file_name(file_name).unwrap();

    let decoded = VolumeLoader::load_from_path(&path, &LoadOptions::new(extents, encoding)).unwrap();
    let alpha = decoded.artifact.channel_array(Channel::Alpha);
    assert_eq!(alpha, source.t());
    let image = decoded.artifact.axial_image(8).unwrap();
    assert_eq!(image.dimensions(), (16, 16));
    assert_eq!(image.get_pixel(15, 8).0, [255]);
}

#[tokio::test(flavor = "current_thread")]
async fn async_load_matches_sync_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noise.raw");
    let bytes: Vec<u8> = (0..512u32).map(|i| (i * 37 % 256) as u8).collect();
    fs::write(&path, bytes).unwrap();

    let options = LoadOptions::new(VolumeExtents::cube(8).unwrap(), Encoding::UnsignedByte);
    let sync = VolumeLoader::load_from_path(&path, &options).unwrap();
    let async_ = VolumeLoader::load_from_path_async(&path, &options).await.unwrap();
    assert_eq!(sync.artifact, async_.artifact);
}
