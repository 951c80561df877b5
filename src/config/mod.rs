//! Configuration loading, parsing, and validation
//!
//! All retry, identity, and concurrency knobs live in an explicit [`Config`]
//! that is passed into the fetch client and coordinator constructors; there
//! is no process-wide mutable state.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Config, DownloadConfig, FetchConfig, OutputConfig, VolumesConfig};
pub use validation::validate;
