//! Path and parameter mapping for every monitoring API operation
//!
//! Each function turns typed arguments into an [`ApiRequest`]. They hold no
//! state and know nothing about how the request is executed, so the async
//! and blocking clients share them unchanged.

use chrono::{NaiveDate, NaiveDateTime};

use crate::request::ApiRequest;
use crate::types::{format_date, format_date_time, SiteListQuery, TimeUnit};
use crate::url_builder::join_path;

fn site_path(site_id: u64, resource: &str) -> String {
    join_path(&[&"site", &site_id, &resource])
}

fn time_window(path: String, start: NaiveDateTime, end: NaiveDateTime) -> ApiRequest {
    ApiRequest::get(path)
        .param("startTime", format_date_time(start))
        .param("endTime", format_date_time(end))
}

fn date_window(
    path: String,
    start: NaiveDate,
    end: NaiveDate,
    time_unit: Option<TimeUnit>,
) -> ApiRequest {
    ApiRequest::get(path)
        .param("startDate", format_date(start))
        .param("endDate", format_date(end))
        .param("timeUnit", time_unit.unwrap_or_default())
}

/// `GET sites/list`
pub fn site_list(query: &SiteListQuery) -> ApiRequest {
    ApiRequest::get("sites/list")
        .param("size", query.size)
        .param("startIndex", query.start_index)
        .param_opt("searchText", query.search_text.as_deref())
        .param_opt("sortProperty", query.sort_property.as_deref())
        .param("sortOrder", query.sort_order)
        .param("status", &query.status)
}

/// `GET site/{id}/details`
pub fn site_details(site_id: u64) -> ApiRequest {
    ApiRequest::get(site_path(site_id, "details"))
}

/// `GET site/{id}/dataPeriod`
pub fn data_period(site_id: u64) -> ApiRequest {
    ApiRequest::get(site_path(site_id, "dataPeriod"))
}

/// `GET site/{id}/energy`
pub fn energy(
    site_id: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    time_unit: Option<TimeUnit>,
) -> ApiRequest {
    date_window(site_path(site_id, "energy"), start_date, end_date, time_unit)
}

/// `GET site/{id}/timeFrameEnergy`
pub fn time_frame_energy(
    site_id: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    time_unit: Option<TimeUnit>,
) -> ApiRequest {
    date_window(
        site_path(site_id, "timeFrameEnergy"),
        start_date,
        end_date,
        time_unit,
    )
}

/// `GET site/{id}/power`
pub fn power(site_id: u64, start_time: NaiveDateTime, end_time: NaiveDateTime) -> ApiRequest {
    time_window(site_path(site_id, "power"), start_time, end_time)
}

/// `GET site/{id}/overview`
pub fn overview(site_id: u64) -> ApiRequest {
    ApiRequest::get(site_path(site_id, "overview"))
}

/// `GET site/{id}/powerDetails`
pub fn power_details<S: AsRef<str>>(
    site_id: u64,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    meters: &[S],
) -> ApiRequest {
    time_window(site_path(site_id, "powerDetails"), start_time, end_time)
        .param_list("meters", meters)
}

/// `GET site/{id}/energyDetails`
pub fn energy_details<S: AsRef<str>>(
    site_id: u64,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    meters: &[S],
    time_unit: Option<TimeUnit>,
) -> ApiRequest {
    time_window(site_path(site_id, "energyDetails"), start_time, end_time)
        .param("timeUnit", time_unit.unwrap_or_default())
        .param_list("meters", meters)
}

/// `GET site/{id}/currentPowerFlow`
pub fn current_power_flow(site_id: u64) -> ApiRequest {
    ApiRequest::get(site_path(site_id, "currentPowerFlow"))
}

/// `GET site/{id}/storageData`
pub fn storage_data<S: AsRef<str>>(
    site_id: u64,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    serials: &[S],
) -> ApiRequest {
    time_window(site_path(site_id, "storageData"), start_time, end_time)
        .param_list("serials", serials)
}
