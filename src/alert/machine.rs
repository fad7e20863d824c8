use std::time::{Duration, Instant};

/// 猶予ウィンドウのデフォルト: 姿勢が悪い状態がこれだけ続いたら警告
pub const DEFAULT_ALLOWANCE: Duration = Duration::from_secs(4);

/// 回復ウィンドウのデフォルト: 良い姿勢がこれだけ続いたら完全リセット
pub const DEFAULT_REGAIN: Duration = Duration::from_secs(1);

/// アラームの現在フェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmPhase {
    Idle,
    Armed,
    Regaining,
}

/// アラームの内部状態
///
/// このモジュールの外からは書き換えない。グローバル変数は置かない。
#[derive(Debug, Default)]
struct AlertState {
    armed_at: Option<Instant>,
    regain_started_at: Option<Instant>,
    snoozed: bool,
}

/// 前かがみシグナルをデバウンスして通知に変換する状態機械
///
/// 合成スコアが閾値付近で毎フレーム揺れてもアラートがばたつかないよう、
/// 発火前の猶予ウィンドウと復帰確認の回復ウィンドウを別々に持つ。
/// 時計は `on_tick` の引数で渡す。テストで時間を自由に進めるため。
pub struct SlouchAlarm {
    state: AlertState,
    allowance: Duration,
    regain: Duration,
}

impl SlouchAlarm {
    pub fn new(allowance: Duration, regain: Duration) -> Self {
        Self {
            state: AlertState::default(),
            allowance,
            regain,
        }
    }

    pub fn phase(&self) -> AlarmPhase {
        if self.state.regain_started_at.is_some() {
            AlarmPhase::Regaining
        } else if self.state.armed_at.is_some() {
            AlarmPhase::Armed
        } else {
            AlarmPhase::Idle
        }
    }

    pub fn is_snoozed(&self) -> bool {
        self.state.snoozed
    }

    /// スヌーズを反転し、新しい値を返す。スヌーズ中はタイマーを全部落とす。
    pub fn toggle_snooze(&mut self) -> bool {
        self.state.snoozed = !self.state.snoozed;
        if self.state.snoozed {
            self.state.armed_at = None;
            self.state.regain_started_at = None;
        }
        self.state.snoozed
    }

    /// 評価ティックごとに1回呼ぶ。戻り値 true でアラートを1回発火する。
    ///
    /// 発火後は即 Idle に戻り、前かがみが続けば次のティックで再アーム、
    /// もう一度猶予ウィンドウぶん継続すれば再度発火する。
    /// 回復ウィンドウ完了前に前かがみへ戻った場合は元の `armed_at` を
    /// 保持したまま Armed に復帰する（短い姿勢直しはノイズ扱い）。
    pub fn on_tick(&mut self, is_slouching: bool, now: Instant) -> bool {
        if self.state.snoozed {
            return false;
        }

        match (is_slouching, self.phase()) {
            (true, AlarmPhase::Idle) => {
                self.state.armed_at = Some(now);
                false
            }
            (true, AlarmPhase::Armed) => match self.state.armed_at {
                Some(armed_at) if now.saturating_duration_since(armed_at) >= self.allowance => {
                    self.state.armed_at = None;
                    true
                }
                _ => false,
            },
            (true, AlarmPhase::Regaining) => {
                // armed_at はそのまま。猶予カウントは仕切り直さない。
                self.state.regain_started_at = None;
                false
            }
            (false, AlarmPhase::Armed) => {
                self.state.regain_started_at = Some(now);
                false
            }
            (false, AlarmPhase::Regaining) => {
                if let Some(regain_started) = self.state.regain_started_at {
                    if now.saturating_duration_since(regain_started) >= self.regain {
                        self.state.armed_at = None;
                        self.state.regain_started_at = None;
                    }
                }
                false
            }
            (false, AlarmPhase::Idle) => false,
        }
    }
}

impl Default for SlouchAlarm {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWANCE, DEFAULT_REGAIN)
    }
}
