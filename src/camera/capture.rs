use anyhow::{Context, Result};
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureAPIs, VideoCaptureTrait},
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// OpenCVを使用したウェブカメラキャプチャ
pub struct OpenCvCamera {
    capture: VideoCapture,
    width: u32,
    height: u32,
}

impl OpenCvCamera {
    /// 解像度を指定してカメラを開く
    pub fn open(index: i32, width: Option<u32>, height: Option<u32>) -> Result<Self> {
        let mut capture =
            VideoCapture::new(index, VideoCaptureAPIs::CAP_ANY as i32).context("Failed to open camera")?;

        if !capture.is_opened()? {
            anyhow::bail!("Camera {} is not available", index);
        }

        if let Some(w) = width {
            capture.set(videoio::CAP_PROP_FRAME_WIDTH, w as f64)?;
        }
        if let Some(h) = height {
            capture.set(videoio::CAP_PROP_FRAME_HEIGHT, h as f64)?;
        }
        // 古いフレームを溜め込まない
        capture.set(videoio::CAP_PROP_BUFFERSIZE, 1.0)?;

        let actual_width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let actual_height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        log::info!(
            "camera {} opened at {}x{} ({} fps reported)",
            index,
            actual_width,
            actual_height,
            capture.get(videoio::CAP_PROP_FPS)?
        );

        Ok(Self {
            capture,
            width: actual_width,
            height: actual_height,
        })
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// フレームを読み込む（BGR形式）
    pub fn read_frame(&mut self) -> Result<Mat> {
        let mut frame = Mat::default();
        self.capture
            .read(&mut frame)
            .context("Failed to read frame")?;

        if frame.empty() {
            anyhow::bail!("Empty frame received");
        }

        Ok(frame)
    }
}

/// 別スレッドでキャプチャし、常に最新フレームだけを保持する
///
/// 評価ループはフレームIDの変化で「新しいフレームが来たか」を判定する。
pub struct ThreadedCamera {
    latest: Arc<Mutex<Option<Mat>>>,
    frame_id: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    width: u32,
    height: u32,
    _handle: thread::JoinHandle<()>,
}

impl ThreadedCamera {
    pub fn start(index: i32, width: Option<u32>, height: Option<u32>) -> Result<Self> {
        let mut camera = OpenCvCamera::open(index, width, height)?;
        let (w, h) = camera.resolution();
        let latest = Arc::new(Mutex::new(None::<Mat>));
        let frame_id = Arc::new(AtomicU64::new(0));
        let running = Arc::new(AtomicBool::new(true));

        let latest_ref = latest.clone();
        let frame_id_ref = frame_id.clone();
        let running_ref = running.clone();
        let handle = thread::Builder::new()
            .name("camera-capture".to_string())
            .spawn(move || {
                while running_ref.load(Ordering::Relaxed) {
                    match camera.read_frame() {
                        Ok(frame) => {
                            *latest_ref.lock().unwrap() = Some(frame);
                            frame_id_ref.fetch_add(1, Ordering::Release);
                        }
                        Err(e) => {
                            log::debug!("frame capture failed: {}", e);
                        }
                    }
                }
            })?;

        Ok(Self {
            latest,
            frame_id,
            running,
            width: w,
            height: h,
            _handle: handle,
        })
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// 現在のフレームID。新フレームが到着するたびにインクリメントされる。
    pub fn frame_id(&self) -> u64 {
        self.frame_id.load(Ordering::Acquire)
    }

    /// 最新フレームを取得。初回フレーム到着前のみNone。
    pub fn latest_frame(&self) -> Option<Mat> {
        self.latest.lock().unwrap().as_ref().map(|m| m.clone())
    }

    /// キャプチャスレッドを止める
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}
