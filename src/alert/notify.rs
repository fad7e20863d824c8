#[cfg(feature = "desktop")]
use anyhow::Result;
#[cfg(feature = "desktop")]
use rodio::{OutputStream, Sink, Source};
#[cfg(feature = "desktop")]
use std::sync::mpsc::{self, Sender};
#[cfg(feature = "desktop")]
use std::thread;
#[cfg(feature = "desktop")]
use std::time::Duration;

/// 通知の出口。発火は投げっぱなしで、戻り値は見ない。
pub trait NotificationSink {
    fn popup(&self, message: &str);
    fn play_sound(&self);
}

/// OSデスクトップ通知 + チャイム再生
///
/// rodioの出力ストリームは `Send` でないため、専用スレッドに持たせて
/// チャネル越しに再生コマンドを送る。
#[cfg(feature = "desktop")]
pub struct DesktopNotifier {
    chime_tx: Sender<()>,
}

#[cfg(feature = "desktop")]
impl DesktopNotifier {
    pub fn new() -> Result<Self> {
        let (chime_tx, chime_rx) = mpsc::channel::<()>();

        thread::Builder::new()
            .name("alert-audio".to_string())
            .spawn(move || {
                // 初回再生時に開き、以降はスレッドが持ち続ける
                let mut stream: Option<(OutputStream, Sink)> = None;

                while chime_rx.recv().is_ok() {
                    if stream.is_none() {
                        match OutputStream::try_default() {
                            Ok((s, handle)) => match Sink::try_new(&handle) {
                                Ok(sink) => stream = Some((s, sink)),
                                Err(e) => {
                                    log::warn!("audio sink unavailable: {}", e);
                                    continue;
                                }
                            },
                            Err(e) => {
                                log::warn!("audio output unavailable: {}", e);
                                continue;
                            }
                        }
                    }
                    if let Some((_, ref sink)) = stream {
                        sink.append(Chime::new());
                    }
                }
            })?;

        Ok(Self { chime_tx })
    }
}

#[cfg(feature = "desktop")]
impl NotificationSink for DesktopNotifier {
    fn popup(&self, message: &str) {
        if let Err(e) = notify_rust::Notification::new()
            .summary("FIX UP")
            .body(message)
            .show()
        {
            log::warn!("desktop notification failed: {}", e);
        }
    }

    fn play_sound(&self) {
        // 音声スレッドが死んでいても通知自体は続行する
        if self.chime_tx.send(()).is_err() {
            log::warn!("audio thread is gone, skipping chime");
        }
    }
}

/// 合成チャイム: 880Hzの正弦波を指数減衰させた0.6秒のワンショット
#[cfg(feature = "desktop")]
struct Chime {
    sample: u32,
    total: u32,
    sample_rate: u32,
}

#[cfg(feature = "desktop")]
impl Chime {
    const FREQ: f32 = 880.0;
    const SECONDS: f32 = 0.6;

    fn new() -> Self {
        let sample_rate = 44100;
        Self {
            sample: 0,
            total: (sample_rate as f32 * Self::SECONDS) as u32,
            sample_rate,
        }
    }
}

#[cfg(feature = "desktop")]
impl Iterator for Chime {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.sample >= self.total {
            return None;
        }
        let t = self.sample as f32 / self.sample_rate as f32;
        self.sample += 1;
        let envelope = (-6.0 * t / Self::SECONDS).exp();
        Some((t * Self::FREQ * 2.0 * std::f32::consts::PI).sin() * envelope * 0.4)
    }
}

#[cfg(feature = "desktop")]
impl Source for Chime {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(Self::SECONDS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// 呼び出しを記録するだけのシンク
    struct RecordingSink {
        popups: RefCell<Vec<String>>,
        sounds: RefCell<u32>,
    }

    impl NotificationSink for RecordingSink {
        fn popup(&self, message: &str) {
            self.popups.borrow_mut().push(message.to_string());
        }

        fn play_sound(&self) {
            *self.sounds.borrow_mut() += 1;
        }
    }

    #[test]
    fn test_sink_trait_is_object_safe() {
        let sink = RecordingSink {
            popups: RefCell::new(Vec::new()),
            sounds: RefCell::new(0),
        };
        let dyn_sink: &dyn NotificationSink = &sink;
        dyn_sink.popup("Bad Posture");
        dyn_sink.play_sound();
        assert_eq!(sink.popups.borrow().as_slice(), ["Bad Posture"]);
        assert_eq!(*sink.sounds.borrow(), 1);
    }

    #[cfg(feature = "desktop")]
    #[test]
    fn test_chime_is_finite_and_bounded() {
        let samples: Vec<f32> = Chime::new().collect();
        assert_eq!(samples.len(), (44100.0 * 0.6) as usize);
        assert!(samples.iter().all(|s| s.abs() <= 0.4));
    }
}
