//! Core library for the `rps` companion.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - An HTTP seam and the weather / quote provider clients built on it
//! - The weather suitability verdict
//! - Presenters that drive a fetch and publish loading / success / failure
//! - The text of the settings screen
//!
//! It is used by `rps-cli`, but any display surface can subscribe to the
//! presenters instead.

pub mod account;
pub mod config;
pub mod display;
pub mod error;
pub mod http;
pub mod model;
pub mod presenter;
pub mod provider;
pub mod suitability;

pub use account::{Credential, Session};
pub use config::{Config, LocationConfig, ProviderConfig};
pub use error::{ErrorKind, FetchError};
pub use http::{HttpResponse, HttpTransport, ReqwestTransport};
pub use model::{Coordinates, WeatherSnapshot};
pub use presenter::{
    FetchFailure, FetchPresenter, FetchState, QuotePresenter, StartOutcome, WeatherPresenter,
};
pub use provider::{ProviderId, QuoteProvider, WeatherProvider};
