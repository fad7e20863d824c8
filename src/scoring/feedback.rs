use thiserror::Error;

/// 偏差値が [0,1] の外だった。上流でクランプし損ねた計算バグの兆候。
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("deviation value {0} is outside [0, 1]")]
pub struct OutOfRange(pub f32);

/// 表示用の姿勢レーティング
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostureRating {
    Good,
    Ok,
    Bad,
}

impl PostureRating {
    pub fn message(self) -> &'static str {
        match self {
            PostureRating::Good => "Good Posture",
            PostureRating::Ok => "OK Posture",
            PostureRating::Bad => "Bad Posture",
        }
    }
}

/// 偏差値をレーティングに割り当てる
pub fn classify(v: f32) -> Result<PostureRating, OutOfRange> {
    check_range(v)?;
    if v <= 0.33 {
        Ok(PostureRating::Good)
    } else if v <= 0.66 {
        Ok(PostureRating::Ok)
    } else {
        Ok(PostureRating::Bad)
    }
}

/// 緑→黄→赤のグラデーション (0xRRGGBB)
///
/// [0, 0.5] で緑→黄、(0.5, 1] で黄→赤。0.5で連続。
pub fn gradient_color(v: f32) -> Result<u32, OutOfRange> {
    check_range(v)?;
    let (r, g) = if v <= 0.5 {
        ((255.0 * (v / 0.5)).round() as u32, 255)
    } else {
        (255, (255.0 * (1.0 - (v - 0.5) / 0.5)).round() as u32)
    };
    Ok((r << 16) | (g << 8))
}

fn check_range(v: f32) -> Result<(), OutOfRange> {
    // NaN も contains が偽になるのでここで弾ける
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(OutOfRange(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(color: u32) -> (u32, u32, u32) {
        ((color >> 16) & 0xFF, (color >> 8) & 0xFF, color & 0xFF)
    }

    #[test]
    fn test_gradient_endpoints() {
        assert_eq!(gradient_color(0.0), Ok(0x00FF00));
        assert_eq!(gradient_color(0.5), Ok(0xFFFF00));
        assert_eq!(gradient_color(1.0), Ok(0xFF0000));
    }

    #[test]
    fn test_gradient_continuous_at_half() {
        let below = gradient_color(0.4999).unwrap();
        let at = gradient_color(0.5).unwrap();
        let above = gradient_color(0.5001).unwrap();
        let (r0, g0, _) = rgb(below);
        let (r1, g1, _) = rgb(at);
        let (r2, g2, _) = rgb(above);
        assert!(r1.abs_diff(r0) <= 1 && g1.abs_diff(g0) <= 1, "jump below 0.5: {:06x} vs {:06x}", below, at);
        assert!(r1.abs_diff(r2) <= 1 && g1.abs_diff(g2) <= 1, "jump above 0.5: {:06x} vs {:06x}", at, above);
    }

    #[test]
    fn test_gradient_monotone_green_to_red() {
        // 赤成分は非減少、緑成分は非増加
        let mut prev = rgb(gradient_color(0.0).unwrap());
        for i in 1..=100 {
            let v = i as f32 / 100.0;
            let cur = rgb(gradient_color(v).unwrap());
            assert!(cur.0 >= prev.0, "red decreased at v={}", v);
            assert!(cur.1 <= prev.1, "green increased at v={}", v);
            assert_eq!(cur.2, 0);
            prev = cur;
        }
    }

    #[test]
    fn test_gradient_rejects_out_of_range() {
        assert_eq!(gradient_color(-0.01), Err(OutOfRange(-0.01)));
        assert_eq!(gradient_color(1.01), Err(OutOfRange(1.01)));
        assert!(gradient_color(f32::NAN).is_err());
    }

    #[test]
    fn test_classify_bands() {
        assert_eq!(classify(0.0), Ok(PostureRating::Good));
        assert_eq!(classify(0.33), Ok(PostureRating::Good));
        assert_eq!(classify(0.34), Ok(PostureRating::Ok));
        assert_eq!(classify(0.66), Ok(PostureRating::Ok));
        assert_eq!(classify(0.67), Ok(PostureRating::Bad));
        assert_eq!(classify(1.0), Ok(PostureRating::Bad));
    }

    #[test]
    fn test_classify_rejects_out_of_range() {
        assert_eq!(classify(-1.0), Err(OutOfRange(-1.0)));
        assert_eq!(classify(2.0), Err(OutOfRange(2.0)));
        assert!(classify(f32::NAN).is_err());
    }

    #[test]
    fn test_rating_messages() {
        assert_eq!(PostureRating::Good.message(), "Good Posture");
        assert_eq!(PostureRating::Ok.message(), "OK Posture");
        assert_eq!(PostureRating::Bad.message(), "Bad Posture");
    }
}
