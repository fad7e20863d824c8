#[cfg(feature = "desktop")]
pub mod detector;
#[cfg(feature = "desktop")]
pub mod preprocess;
pub mod schema;
pub mod snapshot;

#[cfg(feature = "desktop")]
pub use detector::LandmarkDetector;
#[cfg(feature = "desktop")]
pub use preprocess::{preprocess_for_blazepose, BLAZEPOSE_INPUT_SIZE};
pub use schema::LandmarkIndex;
pub use snapshot::{derive_head_top_left, LandmarkSnapshot, LandmarkSource, Point3};
