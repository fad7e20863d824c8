use crate::landmark::LandmarkSnapshot;
use crate::scoring::CalibrationBaseline;

use super::window::MinifbRenderer;

/// 頭部ボックスの枠線幅
pub const BOX_THICKNESS: i32 = 5;

/// 姿勢メーターの高さ（ピクセル）
const METER_HEIGHT: i32 = 14;
const METER_MARGIN: i32 = 10;
const METER_BACKGROUND: u32 = 0x202020;

/// スナップショットの採点対象4点を描画（デバッグ用）
pub fn draw_snapshot_points(renderer: &mut MinifbRenderer, snapshot: &LandmarkSnapshot, color: u32) {
    let w = renderer.width() as f32;
    for p in [
        snapshot.left_shoulder,
        snapshot.right_shoulder,
        snapshot.left_eye,
        snapshot.right_eye,
    ] {
        // 表示は左右反転なのでオーバーレイ座標も反転する
        renderer.draw_circle((w - p.x) as i32, p.y as i32, 4, color);
    }
}

/// 頭部を囲むボックスを描画
///
/// `head_top_left` に基準ジオメトリ由来のサイズで固定し、色で姿勢を伝える。
pub fn draw_head_box(
    renderer: &mut MinifbRenderer,
    snapshot: &LandmarkSnapshot,
    baseline: &CalibrationBaseline,
    color: u32,
) {
    let box_w = baseline.shoulder_width;
    let box_h = baseline.vertical_gap * 2.0;
    // 生フレームのx座標をミラー表示系へ変換（右端がボックスの左端になる）
    let mirrored_x = renderer.width() as f32 - (snapshot.head_top_left.x + box_w);
    renderer.draw_rect(
        mirrored_x as i32,
        snapshot.head_top_left.y as i32,
        box_w as i32,
        box_h as i32,
        BOX_THICKNESS,
        color,
    );
}

/// 画面下部の姿勢メーター: 合成スコアぶんだけバーが伸びる
pub fn draw_posture_meter(
    renderer: &mut MinifbRenderer,
    composite: f32,
    frame_height: i32,
    color: u32,
) {
    let full_w = renderer.width() as i32 - 2 * METER_MARGIN;
    let y = frame_height - METER_HEIGHT - METER_MARGIN;
    renderer.fill_rect(METER_MARGIN, y, full_w, METER_HEIGHT, METER_BACKGROUND);
    let fill_w = (full_w as f32 * composite.clamp(0.0, 1.0)) as i32;
    renderer.fill_rect(METER_MARGIN, y, fill_w, METER_HEIGHT, color);
}
