use crate::domain::model::{AllocationRequest, Environment, RatingKind};
use crate::utils::error::ForwardError;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn calculator_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn calculator_enabled(&self) -> bool;
    fn rating_kind(&self) -> RatingKind;
    fn environment(&self) -> Environment;
}

/// The external service that turns agents, chores and ratings into an allocation.
#[async_trait]
pub trait AllocationCalculator: Send + Sync {
    /// One attempt, no retries. `Ok` carries the parsed JSON reply of a 2xx response.
    async fn allocate(
        &self,
        request: &AllocationRequest<'_>,
    ) -> Result<serde_json::Value, ForwardError>;
}
