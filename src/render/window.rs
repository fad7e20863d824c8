use anyhow::Result;
pub use minifb::Key;
use minifb::{KeyRepeat, Window, WindowOptions};
use opencv::core::Mat;
use opencv::prelude::*;

/// minifbを使用したデバッグビュー
pub struct MinifbRenderer {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl MinifbRenderer {
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        let buffer = vec![0u32; width * height];

        Ok(Self {
            window,
            buffer,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// ウィンドウが開いているか（Escで閉じる）
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// このフレームで新たに押されたか（押しっぱなしでは発火しない）
    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    /// BGR Mat を左右反転（セルフィービュー）でバッファにコピー
    ///
    /// 検出は生フレームで行い、表示だけを反転する。
    pub fn draw_frame_mirrored(&mut self, frame: &Mat) -> Result<()> {
        let frame_width = frame.cols() as usize;
        let frame_height = frame.rows() as usize;

        for y in 0..self.height.min(frame_height) {
            for x in 0..self.width.min(frame_width) {
                let pixel = frame.at_2d::<opencv::core::Vec3b>(y as i32, x as i32)?;
                // BGR -> RGB -> u32
                let r = pixel[2] as u32;
                let g = pixel[1] as u32;
                let b = pixel[0] as u32;
                let mx = self.width - 1 - x;
                self.buffer[y * self.width + mx] = (r << 16) | (g << 8) | b;
            }
        }

        Ok(())
    }

    /// バッファをウィンドウに表示
    pub fn update(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }

    /// 矩形の枠線を描画
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, thickness: i32, color: u32) {
        for t in 0..thickness {
            self.draw_line(x + t, y + t, x + w - t, y + t, color);
            self.draw_line(x + t, y + h - t, x + w - t, y + h - t, color);
            self.draw_line(x + t, y + t, x + t, y + h - t, color);
            self.draw_line(x + w - t, y + t, x + w - t, y + h - t, color);
        }
    }

    /// 矩形を塗りつぶす
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.set_pixel(xx, yy, color);
            }
        }
    }

    /// 円を描画（塗りつぶし）
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Bresenhamのアルゴリズムで線を描画
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// ピクセルをセット（境界チェック付き）
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }
}
