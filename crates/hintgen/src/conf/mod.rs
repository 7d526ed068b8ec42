//! Conf module — builder configuration model and loading.

pub mod model;
pub mod load;

pub use model::BuilderConfig;
