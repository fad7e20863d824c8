use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub alert: AlertConfig,
    #[serde(default)]
    pub app: AppConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    /// カメラデバイス番号
    #[serde(default = "default_camera_index")]
    pub index: i32,
    #[serde(default = "default_camera_width")]
    pub width: u32,
    #[serde(default = "default_camera_height")]
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// ランドマークモデルのパス
    #[serde(default = "default_model_path")]
    pub path: String,
    /// 人物検出スコアの閾値
    #[serde(default = "default_presence_threshold")]
    pub presence_threshold: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CalibrationConfig {
    /// キャリブレーションウィンドウ長（秒）
    #[serde(default = "default_calibration_secs")]
    pub duration_secs: f32,
    /// 開始前カウントダウン（秒）
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    /// tanh飽和の感度係数
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// 「前かがみ」と判定する合成スコアの閾値
    #[serde(default = "default_slouch_threshold")]
    pub slouch_threshold: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertConfig {
    /// 猶予ウィンドウ（秒）: 発火までの連続悪姿勢時間
    #[serde(default = "default_allowance_secs")]
    pub allowance_secs: f32,
    /// 回復ウィンドウ（秒）: 完全リセットまでの連続良姿勢時間
    #[serde(default = "default_regain_secs")]
    pub regain_secs: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

fn default_camera_index() -> i32 { 0 }
fn default_camera_width() -> u32 { 640 }
fn default_camera_height() -> u32 { 480 }
fn default_model_path() -> String { "models/pose_landmark_full.onnx".to_string() }
fn default_presence_threshold() -> f32 { 0.5 }
fn default_calibration_secs() -> f32 { 10.0 }
fn default_countdown_secs() -> u64 { 3 }
fn default_sensitivity() -> f32 { 5.0 }
fn default_slouch_threshold() -> f32 { 0.5 }
fn default_allowance_secs() -> f32 { 4.0 }
fn default_regain_secs() -> f32 { 1.0 }
fn default_target_fps() -> u32 { 30 }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: default_camera_index(),
            width: default_camera_width(),
            height: default_camera_height(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            presence_threshold: default_presence_threshold(),
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_calibration_secs(),
            countdown_secs: default_countdown_secs(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            slouch_threshold: default_slouch_threshold(),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            allowance_secs: default_allowance_secs(),
            regain_secs: default_regain_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 設定ファイルが無い・壊れている場合はデフォルトで続行する
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!(
                    "config {} not loaded ({}), using defaults",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }
}
