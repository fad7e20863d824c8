use crate::landmark::LandmarkSnapshot;
use crate::scoring::baseline::CalibrationBaseline;

/// tanh飽和の感度係数デフォルト
pub const DEFAULT_SENSITIVITY: f32 = 5.0;

/// 「前かがみ」と判定する合成スコアの閾値デフォルト
pub const DEFAULT_SLOUCH_THRESHOLD: f32 = 0.5;

/// 1フレーム分の姿勢スコア
///
/// 毎フレーム作り直す使い捨ての値。保持しない。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostureScore {
    /// 肩の巻き込み [0,1]。0=基準通り、1に近いほど悪い。
    pub shoulder_deviation: f32,
    /// 首・背中の丸まり [0,1]
    pub vertical_deviation: f32,
    /// 深度の集約値（非正規化、参考情報）
    pub depth_scale: f32,
}

impl PostureScore {
    /// アラート判定に使う合成シグナル: 2軸の算術平均
    pub fn composite(&self) -> f32 {
        (self.shoulder_deviation + self.vertical_deviation) / 2.0
    }

    pub fn is_slouching(&self, threshold: f32) -> bool {
        self.composite() > threshold
    }
}

/// 基準ジオメトリに対する毎フレームの採点器
///
/// 基準なしでは構築できないので、キャリブレーション前の採点は型レベルで起こらない。
pub struct PostureScorer {
    baseline: CalibrationBaseline,
    sensitivity: f32,
}

impl PostureScorer {
    pub fn new(baseline: CalibrationBaseline) -> Self {
        Self::with_sensitivity(baseline, DEFAULT_SENSITIVITY)
    }

    pub fn with_sensitivity(baseline: CalibrationBaseline, sensitivity: f32) -> Self {
        Self { baseline, sensitivity }
    }

    pub fn baseline(&self) -> &CalibrationBaseline {
        &self.baseline
    }

    /// 現在のスナップショットを採点する。純粋関数。
    ///
    /// どちらの軸も「画面上の距離が基準より縮んだか」を測る。
    /// 前かがみは目-肩の縦ギャップを潰し、肩の巻き込みは見かけの肩幅を潰す。
    /// 基準より開いている（より直立している）場合は0にクランプする。
    pub fn score(&self, snapshot: &LandmarkSnapshot) -> PostureScore {
        PostureScore {
            shoulder_deviation: self.deviation(self.baseline.shoulder_width, snapshot.shoulder_width()),
            vertical_deviation: self.deviation(self.baseline.vertical_gap, snapshot.vertical_gap()),
            depth_scale: snapshot.depth_scale(),
        }
    }

    /// clamp-then-tanh: 縮み幅を基準値で正規化し、滑らかに1へ飽和させる
    fn deviation(&self, reference: f32, current: f32) -> f32 {
        let delta = reference - current;
        if delta <= 0.0 {
            0.0
        } else {
            (self.sensitivity / reference * delta).tanh()
        }
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

    fn make_baseline() -> CalibrationBaseline {
        CalibrationBaseline {
            shoulder_width: 100.0,
            vertical_gap: 50.0,
            depth: 0.0,
        }
    }

    #[test]
    fn test_score_zero_at_calibration_geometry() {
        let scorer = PostureScorer::new(make_baseline());
        let score = scorer.score(&make_snapshot(100.0, 50.0, 0.0));
        assert_eq!(score.shoulder_deviation, 0.0);
        assert_eq!(score.vertical_deviation, 0.0);
        assert_eq!(score.composite(), 0.0);
    }

    #[test]
    fn test_score_collapsed_vertical_gap() {
        // ギャップが半分(25)に潰れると tanh(5/50*25) = tanh(2.5) ≈ 0.9866
        let scorer = PostureScorer::new(make_baseline());
        let score = scorer.score(&make_snapshot(100.0, 25.0, 0.0));
        assert!((score.vertical_deviation - 2.5f32.tanh()).abs() < 1e-6);
        assert!((score.vertical_deviation - 0.9866).abs() < 1e-3);
    }

    #[test]
    fn test_score_more_upright_clamps_to_zero() {
        // 基準よりギャップが開いた = より直立。負のスコアにはしない。
        let scorer = PostureScorer::new(make_baseline());
        let score = scorer.score(&make_snapshot(120.0, 70.0, 0.0));
        assert_eq!(score.shoulder_deviation, 0.0);
        assert_eq!(score.vertical_deviation, 0.0);
    }

    #[test]
    fn test_score_depth_scale_reported() {
        let scorer = PostureScorer::new(make_baseline());
        let score = scorer.score(&make_snapshot(100.0, 50.0, -0.8));
        assert!((score.depth_scale - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_score_idempotent_bit_identical() {
        let scorer = PostureScorer::new(make_baseline());
        let snap = make_snapshot(83.0, 31.0, -0.37);
        let a = scorer.score(&snap);
        let b = scorer.score(&snap);
        assert_eq!(a.shoulder_deviation.to_bits(), b.shoulder_deviation.to_bits());
        assert_eq!(a.vertical_deviation.to_bits(), b.vertical_deviation.to_bits());
        assert_eq!(a.depth_scale.to_bits(), b.depth_scale.to_bits());
    }

    #[test]
    fn test_slouch_threshold() {
        let scorer = PostureScorer::new(make_baseline());
        let good = scorer.score(&make_snapshot(100.0, 50.0, 0.0));
        assert!(!good.is_slouching(DEFAULT_SLOUCH_THRESHOLD));

        let bad = scorer.score(&make_snapshot(50.0, 25.0, 0.0));
        assert!(bad.composite() > DEFAULT_SLOUCH_THRESHOLD);
        assert!(bad.is_slouching(DEFAULT_SLOUCH_THRESHOLD));
    }
}
