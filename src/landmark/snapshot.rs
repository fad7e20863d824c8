use anyhow::Result;

/// 空間上のランドマーク1点
///
/// x/y はフレームのピクセル座標、z はモデル固有の深度単位。
/// 「未検出」はこの型ではなくスナップショット境界の `Option` で表す。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// 1フレーム分のランドマーク
///
/// 検出器が返すスナップショットは常に全点が埋まっている。
/// 「このフレームは検出なし」は検出器境界の `None` で表現する。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkSnapshot {
    pub left_shoulder: Point3,
    pub right_shoulder: Point3,
    pub left_eye: Point3,
    pub right_eye: Point3,
    /// 頭部ボックス描画用の左上基準点。採点には使わない。
    pub head_top_left: Point3,
}

impl LandmarkSnapshot {
    /// 肩幅（ピクセル）
    ///
    /// 正面向きの被写体では解剖学的な左肩が画像の右側に写るため正の値。
    /// キャリブレーションと採点の両方がこの定義を使う。
    pub fn shoulder_width(&self) -> f32 {
        self.left_shoulder.x - self.right_shoulder.x
    }

    /// 目のラインと肩のラインの縦方向の差（ピクセル）
    ///
    /// ピクセルのyは下向きに増えるので、目が肩より上にある限り正の値。
    pub fn vertical_gap(&self) -> f32 {
        let shoulder_y = (self.left_shoulder.y + self.right_shoulder.y) / 2.0;
        let eye_y = (self.left_eye.y + self.right_eye.y) / 2.0;
        shoulder_y - eye_y
    }

    /// 深度の集約値。符号を反転し、カメラに近いほど大きくなるよう揃える。
    pub fn depth_scale(&self) -> f32 {
        -(self.left_shoulder.z + self.right_shoulder.z + self.left_eye.z + self.right_eye.z) / 4.0
    }
}

/// 頭部ボックスの左上基準点を導出する
///
/// モデルの33点に額のランドマークは無いため、目のラインから
/// 目→鼻の落差の1.5倍だけ上へ外挿する。xは右肩に揃える（画像上の頭の左端）。
pub fn derive_head_top_left(
    left_eye: Point3,
    right_eye: Point3,
    nose: Point3,
    right_shoulder: Point3,
) -> Point3 {
    let eye_y = (left_eye.y + right_eye.y) / 2.0;
    let eye_to_nose = nose.y - eye_y;
    Point3::new(right_shoulder.x, eye_y - 1.5 * eye_to_nose, nose.z)
}

/// スナップショットの供給元
///
/// キャリブレーションエンジンはこの seam 越しにフレームを受け取る。
/// `Ok(None)` は「このフレームは検出なし」で、エラーではない。
pub trait LandmarkSource {
    fn next_snapshot(&mut self) -> Result<Option<LandmarkSnapshot>>;
}

impl<F> LandmarkSource for F
where
    F: FnMut() -> Result<Option<LandmarkSnapshot>>,
{
    fn next_snapshot(&mut self) -> Result<Option<LandmarkSnapshot>> {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_snapshot(width: f32, gap: f32, z: f32) -> LandmarkSnapshot {
        // 肩のラインを y=400、目のラインをその gap 分上に置く
        LandmarkSnapshot {
            left_shoulder: Point3::new(400.0 + width / 2.0, 400.0, z),
            right_shoulder: Point3::new(400.0 - width / 2.0, 400.0, z),
            left_eye: Point3::new(420.0, 400.0 - gap, z),
            right_eye: Point3::new(380.0, 400.0 - gap, z),
            head_top_left: Point3::new(380.0, 300.0, z),
        }
    }

    #[test]
    fn test_shoulder_width_positive_for_facing_subject() {
        let snap = make_snapshot(100.0, 50.0, 0.0);
        assert!((snap.shoulder_width() - 100.0).abs() < 1e-5);
    }

    #[test]
    fn test_vertical_gap_positive_when_eyes_above_shoulders() {
        let snap = make_snapshot(100.0, 50.0, 0.0);
        assert!((snap.vertical_gap() - 50.0).abs() < 1e-5);
    }

    #[test]
    fn test_depth_scale_sign_normalized() {
        // MediaPipe系モデルはカメラに近いほど z が負になる
        let snap = make_snapshot(100.0, 50.0, -0.8);
        assert!((snap.depth_scale() - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_derive_head_top_left() {
        let left_eye = Point3::new(420.0, 300.0, -0.5);
        let right_eye = Point3::new(380.0, 300.0, -0.5);
        let nose = Point3::new(400.0, 320.0, -0.6);
        let right_shoulder = Point3::new(350.0, 400.0, -0.4);

        let head = derive_head_top_left(left_eye, right_eye, nose, right_shoulder);
        assert_eq!(head.x, 350.0);
        // 目のライン(300)から落差(20)の1.5倍上 = 270
        assert!((head.y - 270.0).abs() < 1e-5);
    }
}
