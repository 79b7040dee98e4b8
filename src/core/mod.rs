pub mod form;
pub mod forwarder;

pub use crate::domain::model::{AllocationForm, AllocationRequest, AllocationResult, RatingKind};
pub use crate::domain::ports::{AllocationCalculator, ConfigProvider};
pub use crate::utils::error::Result;
