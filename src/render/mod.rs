pub mod overlay;
pub mod window;

pub use overlay::{draw_head_box, draw_posture_meter, draw_snapshot_points};
pub use window::{Key, MinifbRenderer};
