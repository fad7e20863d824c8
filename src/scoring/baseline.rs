use anyhow::Result;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::landmark::{LandmarkSnapshot, LandmarkSource};

/// キャリブレーション失敗
#[derive(Debug, Error, PartialEq)]
pub enum CalibrationError {
    /// ウィンドウ中に1フレームも検出できなかった。丸ごとやり直すしかない。
    #[error("no landmark detections during the calibration window")]
    NoDetections,
    /// 平均幅か平均ギャップがゼロ。採点の除数に使えない。
    #[error("degenerate calibration geometry (width {width}, gap {gap})")]
    DegenerateGeometry { width: f32, gap: f32 },
}

/// キャリブレーションで確定した基準ジオメトリ
///
/// セッション中は読み取り専用。更新は無く、再キャリブレーションで丸ごと作り直す。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationBaseline {
    /// 肩幅の平均（ピクセル）。非ゼロ。
    pub shoulder_width: f32,
    /// 目のラインと肩のラインの縦差の平均（ピクセル）。非ゼロ。
    pub vertical_gap: f32,
    /// 深度集約値の平均。カメラに近いほど大きい。
    pub depth: f32,
}

/// ウィンドウ内の検出フレームを集計する純粋なアキュムレータ
///
/// 時計に触らないので、クロック付きドライバとは別にテストできる。
#[derive(Debug, Default)]
pub struct BaselineAccumulator {
    width_sum: f64,
    gap_sum: f64,
    depth_sum: f64,
    count: u32,
}

impl BaselineAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, snapshot: &LandmarkSnapshot) {
        self.width_sum += snapshot.shoulder_width() as f64;
        self.gap_sum += snapshot.vertical_gap() as f64;
        self.depth_sum += snapshot.depth_scale() as f64;
        self.count += 1;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// 平均を取って基準ジオメトリを確定する
    pub fn finish(self) -> Result<CalibrationBaseline, CalibrationError> {
        if self.count == 0 {
            return Err(CalibrationError::NoDetections);
        }
        let n = self.count as f64;
        let shoulder_width = (self.width_sum / n) as f32;
        let vertical_gap = (self.gap_sum / n) as f32;
        if shoulder_width.abs() < f32::EPSILON || vertical_gap.abs() < f32::EPSILON {
            return Err(CalibrationError::DegenerateGeometry {
                width: shoulder_width,
                gap: vertical_gap,
            });
        }
        Ok(CalibrationBaseline {
            shoulder_width,
            vertical_gap,
            depth: (self.depth_sum / n) as f32,
        })
    }
}

/// 固定時間ウィンドウでキャリブレーションを実行するドライバ
///
/// ウィンドウは一括計算で、途中再開はしない。失敗時は呼び出し側が
/// ウィンドウ全体をやり直す（距離や姿勢の違うジオメトリを混ぜないため）。
pub struct CalibrationEngine {
    duration: Duration,
}

impl CalibrationEngine {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// ウィンドウ満了までスナップショットを集計し、基準ジオメトリを返す
    ///
    /// 供給元のエラーはそのまま伝播する。検出なしフレームは読み飛ばす。
    pub fn run(&self, source: &mut impl LandmarkSource) -> Result<CalibrationBaseline> {
        let mut acc = BaselineAccumulator::new();
        let start = Instant::now();
        while start.elapsed() < self.duration {
            if let Some(snapshot) = source.next_snapshot()? {
                acc.add(&snapshot);
            }
        }
        log::info!("calibration window closed: {} frames accumulated", acc.count());
        Ok(acc.finish()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Point3;

    fn make_snapshot(width: f32, gap: f32, z: f32) -> LandmarkSnapshot {
        LandmarkSnapshot {
            left_shoulder: Point3::new(400.0 + width / 2.0, 400.0, z),
            right_shoulder: Point3::new(400.0 - width / 2.0, 400.0, z),
            left_eye: Point3::new(420.0, 400.0 - gap, z),
            right_eye: Point3::new(380.0, 400.0 - gap, z),
            head_top_left: Point3::new(380.0, 300.0, z),
        }
    }

    #[test]
    fn test_accumulator_means() {
        let mut acc = BaselineAccumulator::new();
        acc.add(&make_snapshot(90.0, 40.0, -0.4));
        acc.add(&make_snapshot(110.0, 60.0, -0.6));
        assert_eq!(acc.count(), 2);

        let baseline = acc.finish().expect("two frames accumulated");
        assert!((baseline.shoulder_width - 100.0).abs() < 1e-4);
        assert!((baseline.vertical_gap - 50.0).abs() < 1e-4);
        assert!((baseline.depth - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_empty_window_is_no_detections() {
        let acc = BaselineAccumulator::new();
        assert_eq!(acc.finish(), Err(CalibrationError::NoDetections));
    }

    #[test]
    fn test_degenerate_geometry_rejected() {
        // 両肩が同一x座標: 平均肩幅ゼロは基準にできない
        let mut acc = BaselineAccumulator::new();
        acc.add(&make_snapshot(0.0, 50.0, 0.0));
        match acc.finish() {
            Err(CalibrationError::DegenerateGeometry { width, .. }) => {
                assert_eq!(width, 0.0);
            }
            other => panic!("expected DegenerateGeometry, got {:?}", other),
        }
    }

    #[test]
    fn test_engine_zero_detection_window_fails() {
        let engine = CalibrationEngine::new(Duration::from_millis(20));
        let mut source = || -> Result<Option<LandmarkSnapshot>> { Ok(None) };
        let err = engine.run(&mut source).expect_err("no detections");
        assert_eq!(
            err.downcast_ref::<CalibrationError>(),
            Some(&CalibrationError::NoDetections)
        );
    }

    #[test]
    fn test_engine_accumulates_over_window() {
        let engine = CalibrationEngine::new(Duration::from_millis(20));
        let mut source =
            || -> Result<Option<LandmarkSnapshot>> { Ok(Some(make_snapshot(100.0, 50.0, -0.5))) };
        let baseline = engine.run(&mut source).expect("detections every frame");
        assert!((baseline.shoulder_width - 100.0).abs() < 1e-3);
        assert!((baseline.vertical_gap - 50.0).abs() < 1e-3);
        assert!((baseline.depth - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_engine_propagates_source_error() {
        let engine = CalibrationEngine::new(Duration::from_millis(20));
        let mut source = || -> Result<Option<LandmarkSnapshot>> { anyhow::bail!("camera unplugged") };
        let err = engine.run(&mut source).expect_err("source failed");
        assert!(err.to_string().contains("camera unplugged"));
    }
}
