//! Monitoring API client facade

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::dispatcher::Dispatcher;
use crate::endpoints;
use crate::error::Result;
use crate::execution::{Async, Blocking, Execution};
use crate::lifecycle::{Ownership, TransportHandle};
use crate::request::ApiRequest;
use crate::transport::{HttpTransport, Transport};
use crate::types::{SiteListQuery, TimeUnit};

/// Client whose methods return futures
pub type MonitoringClient = Client<Async>;

/// Client whose methods block the calling thread
pub type BlockingMonitoringClient = Client<Blocking>;

/// Monitoring API client
///
/// Generic over the calling convention; use the [`MonitoringClient`] or
/// [`BlockingMonitoringClient`] aliases. All calls made through one client
/// share a pool of `max_concurrent_requests` permits (3 by default, the
/// API's documented limit). Clients never share state with each other.
///
/// A transport the client built itself is closed by [`Client::close`] or
/// when the client is dropped, whichever comes first. A transport supplied
/// through the builder is never closed.
///
/// # Panics
///
/// Every method of a [`BlockingMonitoringClient`] panics when called from
/// within an async runtime, and dropping one there panics as well.
pub struct Client<E: Execution> {
    // Field order matters: the transport is released before the
    // execution strategy (and a blocking runtime) goes away.
    dispatcher: Dispatcher,
    execution: E,
}

impl<E: Execution> Client<E> {
    /// Start configuring a client
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder<E> {
        ClientBuilder::new(api_key)
    }

    pub fn config(&self) -> &ClientConfig {
        self.dispatcher.config()
    }

    /// Configured size of the permit pool
    pub fn max_concurrent_requests(&self) -> usize {
        self.dispatcher.limiter().limit()
    }

    /// Permits not currently held by an in-flight request
    pub fn available_permits(&self) -> usize {
        self.dispatcher.limiter().available()
    }

    /// Whether the client built (and will close) its own transport
    pub fn owns_transport(&self) -> bool {
        self.dispatcher.transport().ownership() == Ownership::Owned
    }

    /// Release the owned transport. Safe to call repeatedly; later requests
    /// fail with a transport error.
    pub fn close(&self) {
        self.dispatcher.transport().close();
    }

    pub fn is_closed(&self) -> bool {
        self.dispatcher.transport().is_closed()
    }

    /// Send an arbitrary request through the shared dispatcher
    pub fn request<T>(&self, request: ApiRequest) -> E::Output<'_, T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.execution.execute(self.dispatcher.dispatch(request))
    }

    // =========================================================================
    // Site Operations
    // =========================================================================

    /// List the account's sites, paged and filtered by `query`
    pub fn get_list(&self, query: &SiteListQuery) -> E::Output<'_, Value> {
        self.request(endpoints::site_list(query))
    }

    /// Site details: name, location, status, peak power
    pub fn get_details(&self, site_id: u64) -> E::Output<'_, Value> {
        self.request(endpoints::site_details(site_id))
    }

    /// First and last dates with production data
    pub fn get_data_period(&self, site_id: u64) -> E::Output<'_, Value> {
        self.request(endpoints::data_period(site_id))
    }

    /// Site overview: lifetime, yearly, monthly and daily energy plus current power
    pub fn get_overview(&self, site_id: u64) -> E::Output<'_, Value> {
        self.request(endpoints::overview(site_id))
    }

    // =========================================================================
    // Energy Operations
    // =========================================================================

    /// Energy production between two dates, aggregated by `time_unit`
    /// (`DAY` when omitted)
    pub fn get_energy(
        &self,
        site_id: u64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        time_unit: Option<TimeUnit>,
    ) -> E::Output<'_, Value> {
        self.request(endpoints::energy(site_id, start_date, end_date, time_unit))
    }

    /// Total energy produced over a period
    pub fn get_time_frame_energy(
        &self,
        site_id: u64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        time_unit: Option<TimeUnit>,
    ) -> E::Output<'_, Value> {
        self.request(endpoints::time_frame_energy(
            site_id, start_date, end_date, time_unit,
        ))
    }

    /// Per-meter energy breakdown. An empty `meters` slice requests all meters.
    pub fn get_energy_details<S: AsRef<str>>(
        &self,
        site_id: u64,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        meters: &[S],
        time_unit: Option<TimeUnit>,
    ) -> E::Output<'_, Value> {
        self.request(endpoints::energy_details(
            site_id, start_time, end_time, meters, time_unit,
        ))
    }

    // =========================================================================
    // Power Operations
    // =========================================================================

    /// Power measurements in 15 minute resolution
    pub fn get_power(
        &self,
        site_id: u64,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> E::Output<'_, Value> {
        self.request(endpoints::power(site_id, start_time, end_time))
    }

    /// Per-meter power measurements. An empty `meters` slice requests all meters.
    pub fn get_power_details<S: AsRef<str>>(
        &self,
        site_id: u64,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        meters: &[S],
    ) -> E::Output<'_, Value> {
        self.request(endpoints::power_details(
            site_id, start_time, end_time, meters,
        ))
    }

    /// Current flow between PV, storage, load and grid
    pub fn get_current_power_flow(&self, site_id: u64) -> E::Output<'_, Value> {
        self.request(endpoints::current_power_flow(site_id))
    }

    // =========================================================================
    // Storage Operations
    // =========================================================================

    /// Battery measurements. An empty `serials` slice requests all batteries.
    pub fn get_storage_data<S: AsRef<str>>(
        &self,
        site_id: u64,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        serials: &[S],
    ) -> E::Output<'_, Value> {
        self.request(endpoints::storage_data(
            site_id, start_time, end_time, serials,
        ))
    }
}

impl MonitoringClient {
    /// Create an async client with default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }
}

impl BlockingMonitoringClient {
    /// Create a blocking client with default settings
    ///
    /// # Panics
    ///
    /// The returned client owns its own runtime. Calling its methods, or
    /// dropping it, from inside another tokio runtime panics; use
    /// [`MonitoringClient`] there instead.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }
}

impl<E: Execution> fmt::Debug for Client<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", self.config())
            .field("available_permits", &self.available_permits())
            .field("owns_transport", &self.owns_transport())
            .finish()
    }
}

/// Builder for [`Client`]
///
/// Configuration is validated before any transport or runtime is created.
pub struct ClientBuilder<E: Execution = Async> {
    api_key: String,
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_concurrent_requests: Option<usize>,
    transport: Option<Arc<dyn Transport>>,
    _execution: PhantomData<fn() -> E>,
}

impl<E: Execution> ClientBuilder<E> {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout: None,
            max_concurrent_requests: None,
            transport: None,
            _execution: PhantomData,
        }
    }

    /// Override the API endpoint
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Per-request timeout (default 10 seconds)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Size of the permit pool (default 3)
    pub fn max_concurrent_requests(mut self, max: usize) -> Self {
        self.max_concurrent_requests = Some(max);
        self
    }

    /// Reuse an existing reqwest client. The client will not close it.
    pub fn http_client(self, client: reqwest::Client) -> Self {
        self.transport(Arc::new(HttpTransport::from_client(client)))
    }

    /// Use a custom transport. The client will not close it.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    fn validate(&self) -> Result<ClientConfig> {
        ClientConfig::new(
            self.api_key.clone(),
            self.base_url.as_deref(),
            self.timeout,
            self.max_concurrent_requests,
        )
    }

    fn assemble(self, config: ClientConfig, execution: E) -> Result<Client<E>> {
        let transport = match self.transport {
            Some(transport) => TransportHandle::borrowed(transport),
            None => TransportHandle::owned(Arc::new(HttpTransport::new(config.timeout())?)),
        };

        tracing::debug!(
            base_url = config.base_url(),
            max_concurrent_requests = config.max_concurrent_requests(),
            "Created monitoring client"
        );

        Ok(Client {
            dispatcher: Dispatcher::new(config, transport),
            execution,
        })
    }
}

impl ClientBuilder<Async> {
    pub fn build(self) -> Result<MonitoringClient> {
        let config = self.validate()?;
        self.assemble(config, Async)
    }
}

impl ClientBuilder<Blocking> {
    pub fn build(self) -> Result<BlockingMonitoringClient> {
        let config = self.validate()?;
        let execution = Blocking::new()?;
        self.assemble(config, execution)
    }
}

impl<E: Execution> fmt::Debug for ClientBuilder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}
