//! Value types produced by classification.
//!
//! Everything here is plain data: a [`Verdict`] is built once per file and
//! never mutated afterwards.

pub mod format;
pub mod verdict;

pub use format::DeclaredFormat;
pub use verdict::Anomaly;
pub use verdict::AvStatus;
pub use verdict::Integrity;
pub use verdict::NO_INDICATORS;
pub use verdict::Verdict;
