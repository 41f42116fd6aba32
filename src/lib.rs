pub mod client;
pub mod config;
pub mod error;
pub mod helpers;
pub mod models;
pub mod prelude;
pub mod sign;
pub mod transport;

static UA: &str = concat!("quickchart-rs/", env!("CARGO_PKG_VERSION"));

/// The public service. Short urls are only issued here.
pub const DEFAULT_HOST: &str = "quickchart.io";
pub const DEFAULT_SCHEME: &str = "https";
/// Chart.js version requested when none is set.
pub const DEFAULT_VERSION: &str = "2.9.4";

pub use crate::client::QuickChart;
pub use crate::config::{ChartSpec, ChartValue, stringify};
pub use crate::helpers::{
    GradientDimensions, GradientStop, Helper, gradient_fill, gradient_fill_helper, image_fill,
    pattern,
};
pub use crate::models::PostData;
pub use crate::transport::{HttpTransport, Transport, TransportResponse};

pub type Result<T> = std::result::Result<T, Error>;

pub use error::Error;

// Re-exported for custom transports
pub use async_trait::async_trait;
pub use reqwest::StatusCode;
