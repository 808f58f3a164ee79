//! SolarEdge Monitoring API Client
//!
//! Typed access to the read-only monitoring API: site listings, energy and
//! power telemetry, and storage data. Every call goes through one dispatcher
//! per client that caps the number of in-flight requests (3 by default, the
//! API's documented limit).
//!
//! # Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use solaredge_client::{MonitoringClient, SiteListQuery};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = MonitoringClient::new("YOUR_API_KEY")?;
//!
//!     // List sites
//!     let sites = client.get_list(&SiteListQuery::default()).await?;
//!
//!     // Daily energy for January
//!     let energy = client
//!         .get_energy(
//!             123,
//!             NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
//!             NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
//!             None,
//!         )
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Blocking
//!
//! The same methods are available without an async runtime:
//!
//! ```rust,no_run
//! use solaredge_client::BlockingMonitoringClient;
//!
//! let client = BlockingMonitoringClient::new("YOUR_API_KEY")?;
//! let overview = client.get_overview(123)?;
//! # Ok::<(), solaredge_client::MonitoringError>(())
//! ```
//!
//! # Errors
//!
//! Transport failures, non-2xx statuses and undecodable bodies surface as
//! distinct [`MonitoringError`] variants. Nothing is retried.

mod client;
mod config;
mod dispatcher;
pub mod endpoints;
mod error;
mod execution;
mod lifecycle;
mod limiter;
mod request;
pub mod testing;
mod transport;
mod types;
mod url_builder;

pub use client::{BlockingMonitoringClient, Client, ClientBuilder, MonitoringClient};
pub use config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_TIMEOUT,
};
pub use dispatcher::{decode_response, Dispatcher};
pub use error::{MonitoringError, Result, TransportError};
pub use execution::{Async, Blocking, Execution};
pub use lifecycle::Ownership;
pub use limiter::ConcurrencyLimiter;
pub use request::{merge_params, ApiRequest, Method, RequestDescriptor, API_KEY_PARAM};
pub use transport::{HttpTransport, RawResponse, Transport};
pub use types::*;
pub use url_builder::{build_url, join_path, UrlSegment};
