use anyhow::Result;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use posture_watch::alert::{DesktopNotifier, NotificationSink, SlouchAlarm};
use posture_watch::camera::ThreadedCamera;
use posture_watch::config::Config;
use posture_watch::control::{spawn_ctrlc_handler, window_commands, Command};
use posture_watch::landmark::{preprocess_for_blazepose, LandmarkDetector, LandmarkSnapshot};
use posture_watch::render::{
    draw_head_box, draw_posture_meter, draw_snapshot_points, MinifbRenderer,
};
use posture_watch::scoring::{
    classify, gradient_color, CalibrationBaseline, CalibrationEngine, CalibrationError,
    PostureRating, PostureScorer,
};

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::load_or_default(CONFIG_PATH);

    println!("=== Posture Watch {} ===", env!("GIT_VERSION"));
    println!("Calibration window: {:.0}s", config.calibration.duration_secs);
    println!(
        "Alert: allowance {:.0}s, regain {:.0}s, threshold {}",
        config.alert.allowance_secs, config.alert.regain_secs, config.scoring.slouch_threshold
    );
    println!();
    println!("操作: [S] スヌーズ  [C] 再キャリブレーション  [Esc] 終了");
    println!();

    let camera = ThreadedCamera::start(
        config.camera.index,
        Some(config.camera.width),
        Some(config.camera.height),
    )?;
    let (width, height) = camera.resolution();
    println!("Camera: {}x{}", width, height);

    let mut detector =
        LandmarkDetector::with_presence_threshold(&config.model.path, config.model.presence_threshold)?;
    println!("Model loaded: {}", config.model.path);

    let mut renderer = MinifbRenderer::new("Posture Watch", width as usize, height as usize)?;

    let (tx, rx) = mpsc::channel::<Command>();
    spawn_ctrlc_handler(tx)?;

    // キャリブレーションが確定するまで採点器は存在しない
    let baseline = match calibrate_with_retry(&camera, &mut detector, &mut renderer, &config, &rx)? {
        Some(baseline) => baseline,
        None => {
            camera.stop();
            return Ok(());
        }
    };
    let mut scorer = PostureScorer::with_sensitivity(baseline, config.scoring.sensitivity);

    let mut alarm = SlouchAlarm::new(
        Duration::from_secs_f32(config.alert.allowance_secs),
        Duration::from_secs_f32(config.alert.regain_secs),
    );
    let notifier = DesktopNotifier::new()?;

    let frame_duration = Duration::from_secs_f64(1.0 / config.app.target_fps as f64);
    let mut last_snapshot: Option<LandmarkSnapshot> = None;
    let mut last_frame_id = camera.frame_id();
    let mut frame_count = 0u32;
    let mut fps_timer = Instant::now();
    let mut status: Option<(f32, PostureRating)> = None;

    'session: loop {
        let loop_start = Instant::now();

        let mut recalibrate = false;
        let mut commands = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            commands.push(cmd);
        }
        commands.extend(window_commands(&renderer));
        for cmd in commands {
            match cmd {
                Command::Stop => break 'session,
                Command::SnoozeToggle => {
                    let snoozed = alarm.toggle_snooze();
                    println!("Snooze: {}", if snoozed { "ON" } else { "OFF" });
                }
                Command::Recalibrate => recalibrate = true,
            }
        }

        if recalibrate {
            match calibrate_with_retry(&camera, &mut detector, &mut renderer, &config, &rx)? {
                Some(baseline) => {
                    scorer = PostureScorer::with_sensitivity(baseline, config.scoring.sensitivity);
                    last_snapshot = None;
                    last_frame_id = camera.frame_id();
                }
                None => break 'session,
            }
        }

        let current_frame_id = camera.frame_id();
        if current_frame_id != last_frame_id {
            last_frame_id = current_frame_id;
            if let Some(frame) = camera.latest_frame() {
                let input = preprocess_for_blazepose(&frame)?;
                // 検出なしはエラーではない: 前回のスナップショットで採点を続ける
                if let Some(snapshot) = detector.detect(input, width, height)? {
                    last_snapshot = Some(snapshot);
                }

                renderer.draw_frame_mirrored(&frame)?;
                if let Some(ref snapshot) = last_snapshot {
                    let score = scorer.score(snapshot);
                    let composite = score.composite();
                    let color = gradient_color(composite)?;
                    let rating = classify(composite)?;

                    draw_head_box(&mut renderer, snapshot, scorer.baseline(), color);
                    draw_posture_meter(&mut renderer, composite, height as i32, color);

                    let is_slouching = score.is_slouching(config.scoring.slouch_threshold);
                    if alarm.on_tick(is_slouching, Instant::now()) {
                        log::info!("alert fired (composite {:.2})", composite);
                        notifier.popup(rating.message());
                        notifier.play_sound();
                    }
                    status = Some((composite, rating));
                }
                renderer.update()?;
            }
        }

        // ステータス（1秒に1回）
        frame_count += 1;
        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            match status {
                Some((composite, rating)) => println!(
                    "FPS: {:.1} | score {:.2} ({}) | {:?}{}",
                    frame_count as f32 / elapsed,
                    composite,
                    rating.message(),
                    alarm.phase(),
                    if alarm.is_snoozed() { " [snoozed]" } else { "" }
                ),
                None => println!("FPS: {:.1} | no detection yet", frame_count as f32 / elapsed),
            }
            frame_count = 0;
            fps_timer = Instant::now();
        }

        if let Some(remaining) = frame_duration.checked_sub(loop_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    camera.stop();
    println!("Shutting down...");
    Ok(())
}

/// 成功するまでキャリブレーションウィンドウを丸ごとやり直す
///
/// 戻り値 None は停止要求。ウィンドウ中はフレームとランドマークを
/// 表示し続ける（ユーザーが姿勢を確認できるように）。
fn calibrate_with_retry(
    camera: &ThreadedCamera,
    detector: &mut LandmarkDetector,
    renderer: &mut MinifbRenderer,
    config: &Config,
    rx: &Receiver<Command>,
) -> Result<Option<CalibrationBaseline>> {
    let engine = CalibrationEngine::new(Duration::from_secs_f32(config.calibration.duration_secs));
    let (width, height) = camera.resolution();

    loop {
        if drain_stop(rx) || !renderer.is_open() {
            return Ok(None);
        }

        for s in (1..=config.calibration.countdown_secs).rev() {
            println!("キャリブレーション開始まで {}s... 良い姿勢で座ってください", s);
            std::thread::sleep(Duration::from_secs(1));
        }
        println!(
            "Calibrating for {:.0}s, hold your best posture",
            config.calibration.duration_secs
        );

        let mut last_frame_id = camera.frame_id();
        let mut source = || -> Result<Option<LandmarkSnapshot>> {
            // 新フレーム待ち
            loop {
                let id = camera.frame_id();
                if id != last_frame_id {
                    last_frame_id = id;
                    break;
                }
                std::thread::sleep(Duration::from_millis(1));
            }
            let frame = match camera.latest_frame() {
                Some(f) => f,
                None => return Ok(None),
            };
            let input = preprocess_for_blazepose(&frame)?;
            let snapshot = detector.detect(input, width, height)?;

            renderer.draw_frame_mirrored(&frame)?;
            if let Some(ref snap) = snapshot {
                draw_snapshot_points(renderer, snap, 0x00FF00);
            }
            renderer.update()?;
            Ok(snapshot)
        };

        match engine.run(&mut source) {
            Ok(baseline) => {
                println!(
                    "Calibrated: shoulder_width {:.1}, vertical_gap {:.1}, depth {:.2}",
                    baseline.shoulder_width, baseline.vertical_gap, baseline.depth
                );
                return Ok(Some(baseline));
            }
            Err(e) if e.downcast_ref::<CalibrationError>().is_some() => {
                log::warn!("calibration attempt failed: {}", e);
                println!("Calibration failed ({}), retrying...", e);
            }
            Err(e) => return Err(e),
        }
    }
}

fn drain_stop(rx: &Receiver<Command>) -> bool {
    let mut stop = false;
    while let Ok(cmd) = rx.try_recv() {
        if cmd == Command::Stop {
            stop = true;
        }
    }
    stop
}
