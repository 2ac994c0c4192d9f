pub mod executor;
pub mod sampler;

pub use executor::TransferExecutor;
pub use sampler::ProgressSampler;
