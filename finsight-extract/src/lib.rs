//! finsight-extract: adapter for the external statement-extraction model.

pub mod client;
pub mod insights;
pub mod parts;
pub mod prompt;

pub use client::{DEFAULT_MODEL, ExtractClient};
pub use insights::{ActionableTip, DeepInsight, InsightMetric, TipPriority};
pub use parts::FilePart;
