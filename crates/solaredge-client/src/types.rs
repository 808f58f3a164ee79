//! Parameter types for monitoring API requests

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Date format for `startDate` / `endDate`
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Date-time format for `startTime` / `endTime`
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default `status` filter for the site list
pub const DEFAULT_SITE_STATUS: &str = "Active,Pending";

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn format_date_time(time: NaiveDateTime) -> String {
    time.format(DATE_TIME_FORMAT).to_string()
}

/// Aggregation granularity for energy endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeUnit {
    QuarterOfAnHour,
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::QuarterOfAnHour => "QUARTER_OF_AN_HOUR",
            TimeUnit::Hour => "HOUR",
            TimeUnit::Day => "DAY",
            TimeUnit::Week => "WEEK",
            TimeUnit::Month => "MONTH",
            TimeUnit::Year => "YEAR",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "QUARTER_OF_AN_HOUR" => Ok(TimeUnit::QuarterOfAnHour),
            "HOUR" => Ok(TimeUnit::Hour),
            "DAY" => Ok(TimeUnit::Day),
            "WEEK" => Ok(TimeUnit::Week),
            "MONTH" => Ok(TimeUnit::Month),
            "YEAR" => Ok(TimeUnit::Year),
            _ => Err(format!("Unknown time unit: {}", s)),
        }
    }
}

/// Sort direction for the site list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

/// Paging, search and filter options for `sites/list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteListQuery {
    /// Page size (the API caps this at 100)
    pub size: u32,
    /// Index of the first site to return
    pub start_index: u32,
    /// Free-text search; omitted when empty
    pub search_text: Option<String>,
    /// Sort property, e.g. `Name` or `CreationDate`; omitted when empty
    pub sort_property: Option<String>,
    pub sort_order: SortOrder,
    /// Comma-separated status filter
    pub status: String,
}

impl Default for SiteListQuery {
    fn default() -> Self {
        Self {
            size: 100,
            start_index: 0,
            search_text: None,
            sort_property: None,
            sort_order: SortOrder::Asc,
            status: DEFAULT_SITE_STATUS.to_string(),
        }
    }
}

impl SiteListQuery {
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_start_index(mut self, start_index: u32) -> Self {
        self.start_index = start_index;
        self
    }

    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn with_sort(mut self, property: impl Into<String>, order: SortOrder) -> Self {
        self.sort_property = Some(property.into());
        self.sort_order = order;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}
