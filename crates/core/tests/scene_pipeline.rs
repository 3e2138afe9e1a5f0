//! End-to-end: encode an image, decode it as a heightmap, assemble the scene
//! and drive a few frames.

use approx::assert_relative_eq;
use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma};
use std::io::Cursor;
use terrain_core::heightmap::decode_heightmap;
use terrain_core::scene::TreeConfig;
use terrain_core::{
    BrightnessMode, PixelSource, SceneConfig, SceneContext, TerrainBuilder, Viewport,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Radial hill: bright in the middle, dark at the rim (odd sizes put a pixel on the peak)
fn hill_png(size: u32) -> Vec<u8> {
    let c = (size - 1) as f32 / 2.0;
    let img = GrayImage::from_fn(size, size, |x, y| {
        let d = ((x as f32 - c).powi(2) + (y as f32 - c).powi(2)).sqrt() / c;
        Luma([((1.0 - d).max(0.0) * 255.0).round() as u8])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn test_decoded_png_drives_terrain() {
    let heightmap = decode_heightmap(&hill_png(65), BrightnessMode::Luminance).unwrap();
    assert_eq!(heightmap.width(), 65);
    assert_relative_eq!(heightmap.max_sample(), 1.0, epsilon = 1e-5);

    let mesh = TerrainBuilder::new(50.0, 65, 8.0).build(&heightmap).unwrap();

    // Peak in the centre, rim at zero
    assert_relative_eq!(mesh.elevation_at(0.0, 0.0).unwrap(), 8.0, epsilon = 1e-4);
    assert_eq!(mesh.vertex(0, 0).y, 0.0);
    assert_relative_eq!(mesh.max_elevation(), 8.0, epsilon = 1e-4);

    // Slopes lean away from the peak
    let n = mesh.normal_at(10.0, 0.0).unwrap();
    assert!(n.x > 0.0, "normal {n:?} should lean outward");
    assert!(n.y > 0.0);
}

#[test]
fn test_default_scene_from_decoded_heightmap() {
    let heightmap = decode_heightmap(&hill_png(97), BrightnessMode::Average).unwrap();
    let mut scene = SceneContext::init(SceneConfig::default(), &heightmap).unwrap();

    assert_eq!(scene.terrain().vertex_count(), 128 * 128);
    assert_eq!(scene.water().vertex_count(), 128 * 128);
    assert_relative_eq!(scene.water().max_elevation(), 0.1, epsilon = 1e-6);
    assert!(scene.water().size() > scene.terrain().size());

    let band = scene.config().trees;
    assert_eq!(scene.trees().len(), band.count);
    for tree in scene.trees() {
        assert!(tree.position.y >= band.min_elevation && tree.position.y <= band.max_elevation);
    }

    for (w, h) in [(800, 600), (800, 600), (1024, 768), (1920, 1080)] {
        scene.frame(Viewport::new(w, h));
    }
    assert_relative_eq!(scene.camera().aspect(), 1920.0 / 1080.0);

    let stats = scene.teardown();
    assert_eq!(stats.frames, 4);
    assert_eq!(stats.resizes, 3);
    assert_eq!(stats.terrain_triangles, 127 * 127 * 2);
}

#[test]
fn test_scene_config_json_round_trip() {
    let config = SceneConfig {
        terrain: TerrainBuilder::new(20.0, 33, 3.0),
        trees: TreeConfig {
            count: 5,
            ..TreeConfig::default()
        },
        ..SceneConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(SceneConfig::from_json(&json).unwrap(), config);
}
