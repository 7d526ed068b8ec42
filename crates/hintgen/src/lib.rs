// Module structure for the hint-driven log config builder.

// Core infrastructure
pub mod docker;
pub mod client;
pub mod error;

// Domain modules
pub mod event;
pub mod hints;
pub mod conf;
pub mod compose;
pub mod builder;
pub mod runtime;

pub use builder::HintBuilder;
pub use compose::ConfigDocument;
pub use error::BuildError;
pub use event::DiscoveryEvent;
