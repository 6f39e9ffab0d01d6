pub mod normalizer;
pub mod pipeline;
pub mod signature;

pub use normalizer::normalize;
pub use pipeline::{process_batch, PipelineContext};
pub use signature::{verify, VerifyOutcome};
