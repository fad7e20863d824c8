pub mod alert;
#[cfg(feature = "desktop")]
pub mod camera;
pub mod config;
pub mod control;
pub mod landmark;
#[cfg(feature = "desktop")]
pub mod render;
pub mod scoring;
