use anyhow::Result;
use std::time::Instant;

use posture_watch::camera::OpenCvCamera;
use posture_watch::config::Config;
use posture_watch::landmark::{preprocess_for_blazepose, LandmarkDetector};
use posture_watch::render::{draw_snapshot_points, MinifbRenderer};

const CONFIG_PATH: &str = "config.toml";

/// ランドマークだけを表示するデバッグビューア。採点もアラートもしない。
fn main() -> Result<()> {
    env_logger::init();
    let config = Config::load_or_default(CONFIG_PATH);

    println!("Landmark Viewer");
    println!("Press ESC to exit");

    let mut camera = OpenCvCamera::open(
        config.camera.index,
        Some(config.camera.width),
        Some(config.camera.height),
    )?;
    let (width, height) = camera.resolution();

    println!("Loading model from {}...", config.model.path);
    let mut detector = LandmarkDetector::with_presence_threshold(
        &config.model.path,
        config.model.presence_threshold,
    )?;
    println!("Model loaded");

    let mut renderer = MinifbRenderer::new("Landmark Viewer", width as usize, height as usize)?;

    let mut frame_count = 0u32;
    let mut detection_count = 0u32;
    let mut fps_timer = Instant::now();

    while renderer.is_open() {
        let frame = match camera.read_frame() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Frame capture error: {}", e);
                continue;
            }
        };

        let input = preprocess_for_blazepose(&frame)?;
        let snapshot = detector.detect(input, width, height)?;

        renderer.draw_frame_mirrored(&frame)?;
        if let Some(ref snap) = snapshot {
            draw_snapshot_points(&mut renderer, snap, 0x00FF00);
            renderer.draw_circle(
                (width as f32 - snap.head_top_left.x) as i32,
                snap.head_top_left.y as i32,
                4,
                0xFFFF00,
            );
            detection_count += 1;
        }
        renderer.update()?;

        frame_count += 1;
        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            println!(
                "FPS: {:.1}, detections: {}/{}",
                frame_count as f32 / elapsed,
                detection_count,
                frame_count
            );
            frame_count = 0;
            detection_count = 0;
            fps_timer = Instant::now();
        }
    }

    println!("Shutting down...");
    Ok(())
}
