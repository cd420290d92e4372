//! Core library for the `weather` city lookup.
//!
//! This crate defines:
//! - Configuration handling
//! - The typed error taxonomy shown to users
//! - Abstraction over the weather data source
//! - The request lifecycle (`RequestController`) and its UI state machine
//! - The pure presentation mapping (`render`)
//!
//! It is used by `weather-cli`, but the controller only talks to a [`View`] handle,
//! so any other front end can drive it.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod provider;
pub mod render;

pub use config::Config;
pub use controller::{MessageKind, RequestController, Submission, UiState, View};
pub use error::{LookupError, TransportError};
pub use model::{Query, WeatherResult};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use render::{DisplayUpdate, render};
