pub mod machine;
pub mod notify;

pub use machine::{AlarmPhase, SlouchAlarm, DEFAULT_ALLOWANCE, DEFAULT_REGAIN};
#[cfg(feature = "desktop")]
pub use notify::DesktopNotifier;
pub use notify::NotificationSink;
