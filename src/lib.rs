pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::calculator::{CalculatorConfig, HttpCalculator};
pub use adapters::web::{router, start_server, AppState};
pub use core::{form::decode_urlencoded, forwarder::AllocationForwarder};
pub use domain::model::{AllocationForm, AllocationResult, RatingKind};
pub use utils::error::{AppError, ForwardError, Result};
