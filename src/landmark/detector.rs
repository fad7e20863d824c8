use anyhow::{Context, Result};
use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;

use super::preprocess::BLAZEPOSE_INPUT_SIZE;
use super::schema::LandmarkIndex;
use super::snapshot::{derive_head_top_left, LandmarkSnapshot, Point3};

/// 人物検出スコアのデフォルト閾値
pub const DEFAULT_PRESENCE_THRESHOLD: f32 = 0.5;

/// BlazePose を使用したランドマーク検出器
pub struct LandmarkDetector {
    session: Session,
    presence_threshold: f32,
}

impl LandmarkDetector {
    /// ONNXモデルを読み込んで初期化
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        Self::with_presence_threshold(model_path, DEFAULT_PRESENCE_THRESHOLD)
    }

    pub fn with_presence_threshold<P: AsRef<Path>>(model_path: P, presence_threshold: f32) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path.as_ref())
            .context("Failed to load ONNX model")?;

        Ok(Self {
            session,
            presence_threshold,
        })
    }

    /// 前処理済みテンソルからランドマークを検出
    ///
    /// 入力: [1, 256, 256, 3] の f32 テンソル (0.0-1.0)
    /// 出力: 人物が写っていれば Some(スナップショット)、いなければ None
    ///
    /// 座標は入力256px空間からフレームのピクセル座標へ変換して返す。
    /// zはモデル固有の単位のまま。
    pub fn detect(
        &mut self,
        input: Array4<f32>,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<Option<LandmarkSnapshot>> {
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs!["input_1" => input_tensor])
            .context("Inference failed")?;

        // Identity_1 は [1, 1] の人物存在ロジット
        let presence: ndarray::ArrayViewD<f32> = outputs["Identity_1"]
            .try_extract_array()
            .context("Failed to extract presence tensor")?;
        if sigmoid(presence[[0, 0]]) < self.presence_threshold {
            return Ok(None);
        }

        // Identity は [1, 195] (33ランドマーク × x, y, z, visibility, presence)
        let landmarks: ndarray::ArrayViewD<f32> = outputs["Identity"]
            .try_extract_array()
            .context("Failed to extract landmark tensor")?;

        let sx = frame_width as f32 / BLAZEPOSE_INPUT_SIZE as f32;
        let sy = frame_height as f32 / BLAZEPOSE_INPUT_SIZE as f32;
        let point = |idx: LandmarkIndex| -> Point3 {
            let base = idx.offset();
            Point3::new(
                landmarks[[0, base]] * sx,
                landmarks[[0, base + 1]] * sy,
                landmarks[[0, base + 2]],
            )
        };

        let left_shoulder = point(LandmarkIndex::LeftShoulder);
        let right_shoulder = point(LandmarkIndex::RightShoulder);
        let left_eye = point(LandmarkIndex::LeftEye);
        let right_eye = point(LandmarkIndex::RightEye);
        let nose = point(LandmarkIndex::Nose);

        Ok(Some(LandmarkSnapshot {
            left_shoulder,
            right_shoulder,
            left_eye,
            right_eye,
            head_top_left: derive_head_top_left(left_eye, right_eye, nose, right_shoulder),
        }))
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
