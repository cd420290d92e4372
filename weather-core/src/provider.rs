use async_trait::async_trait;
use std::fmt::Debug;

use crate::{LookupError, Query, WeatherResult};

pub mod openweather;

/// Source of current conditions for a city.
///
/// One call issues exactly one upstream request; there are no retries.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, query: &Query) -> Result<WeatherResult, LookupError>;
}
