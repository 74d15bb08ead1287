// Pure VRVP core: profile construction and signal classification.
// Nothing in here performs I/O or keeps state between calls.

pub mod signal;
pub mod volume_profile;

// Re-export key types for convenience
pub use signal::{BoundaryDistance, Signal, SignalKind, classify, distance_scale};
pub use volume_profile::{VolumeProfile, compute_profile};
