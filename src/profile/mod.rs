//! Profile data model: thermal categories, per-app touch tuning and the
//! persisted package-to-category mapping.

pub mod category;
pub mod store;
pub mod tuning;

// Re-export commonly used types
pub use category::ThermalCategory;
pub use store::{ProfileStore, StoreError};
pub use tuning::TouchTuning;
