pub mod baseline;
pub mod feedback;
pub mod score;

pub use baseline::{BaselineAccumulator, CalibrationBaseline, CalibrationEngine, CalibrationError};
pub use feedback::{classify, gradient_color, OutOfRange, PostureRating};
pub use score::{PostureScore, PostureScorer, DEFAULT_SENSITIVITY, DEFAULT_SLOUCH_THRESHOLD};
