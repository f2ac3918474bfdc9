//! # dedupx Storage
//!
//! Persistence for the artifacts that outlive a run:
//!
//! - learned settings: an opaque bincode blob with a format header
//! - training examples: labeled record pairs as JSON
//!
//! Both are written atomically (temp file + rename).

pub mod settings;
pub mod store;
pub mod training;

pub use settings::{read_settings, write_settings};
pub use store::ArtifactStore;
pub use training::{read_training, write_training};
