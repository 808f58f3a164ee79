//! Request values passed between the facade, dispatcher and transport

use std::fmt;

use url::Url;

/// Query parameter carrying the API key on every request
pub const API_KEY_PARAM: &str = "api_key";

/// HTTP verbs used by the monitoring API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
        }
    }
}

/// One endpoint call as seen by the facade: a relative path plus the
/// operation-specific query parameters, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Add a parameter, replacing the value of an existing key in place
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        set_param(&mut self.params, key.into(), value.to_string());
        self
    }

    /// Add a parameter only when `value` is present and not empty
    pub fn param_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value.map(|v| v.to_string()) {
            Some(v) if !v.is_empty() => self.param(key, v),
            _ => self,
        }
    }

    /// Add a comma-joined multi-value parameter; an empty list adds nothing.
    /// Entries are joined verbatim, in input order.
    pub fn param_list<I, S>(self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values: Vec<String> = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect();
        if values.is_empty() {
            return self;
        }
        self.param(key, values.join(","))
    }

    /// Value of a parameter, if set
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Fully resolved outbound request handed to a transport
#[derive(Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl RequestDescriptor {
    /// Value of a query parameter, if set
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// URL including the encoded query string
    pub fn full_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.url)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }
}

// Debug output leaves out the query, which holds the API key.
impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.query.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("RequestDescriptor")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("query_keys", &keys)
            .finish()
    }
}

/// Build the outbound query: the API key first, then the caller's
/// parameters in order. Callers override each other's keys but can never
/// replace or duplicate `api_key`.
pub fn merge_params(api_key: &str, params: &[(String, String)]) -> Vec<(String, String)> {
    let mut merged = vec![(API_KEY_PARAM.to_string(), api_key.to_string())];
    for (key, value) in params {
        if key == API_KEY_PARAM {
            tracing::warn!("Ignoring caller-supplied {} parameter", API_KEY_PARAM);
            continue;
        }
        set_param(&mut merged, key.clone(), value.clone());
    }
    merged
}

fn set_param(params: &mut Vec<(String, String)>, key: String, value: String) {
    match params.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => params.push((key, value)),
    }
}
