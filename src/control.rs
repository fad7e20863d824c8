//! 評価ループへのコマンド配送
//!
//! キー入力やCtrl-Cはここでコマンドに変換してチャネルで届ける。
//! 採点コアはキーボード状態を一切ポーリングしない。

#[cfg(feature = "desktop")]
use anyhow::Result;
#[cfg(feature = "desktop")]
use std::sync::mpsc::Sender;

#[cfg(feature = "desktop")]
use crate::render::{Key, MinifbRenderer};

/// 評価ループが受け取るコマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// ループを終了する
    Stop,
    /// スヌーズの反転 (Sキー)
    SnoozeToggle,
    /// キャリブレーションのやり直し (Cキー)
    Recalibrate,
}

/// Ctrl-C を Stop コマンドに変換するハンドラを登録する
#[cfg(feature = "desktop")]
pub fn spawn_ctrlc_handler(tx: Sender<Command>) -> Result<()> {
    ctrlc::set_handler(move || {
        let _ = tx.send(Command::Stop);
    })?;
    Ok(())
}

/// ウィンドウのキーエッジをコマンドに変換する。ティックごとに1回呼ぶ。
#[cfg(feature = "desktop")]
pub fn window_commands(renderer: &MinifbRenderer) -> Vec<Command> {
    let mut commands = Vec::new();
    if !renderer.is_open() {
        commands.push(Command::Stop);
        return commands;
    }
    if renderer.is_key_pressed(Key::S) {
        commands.push(Command::SnoozeToggle);
    }
    if renderer.is_key_pressed(Key::C) {
        commands.push(Command::Recalibrate);
    }
    commands
}
