//! Aggregation engine.
//!
//! Pure reduction of a time window of page-view events into the summary
//! shapes the dashboard and the email digest consume. No suspension, no
//! store access; callers fetch and materialize the event list first.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::events::{DeviceClass, PageViewEvent};

/// Number of peak-hour entries retained in a report.
pub const PEAK_HOURS_LIMIT: usize = 5;

/// Per-page view count, in first-occurrence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCount {
    /// Normalized page label (see [`normalize_page`]).
    pub page: String,
    pub views: u64,
}

/// Mobile/desktop split. Every event falls into exactly one class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStats {
    pub mobile: u64,
    pub desktop: u64,
}

/// Views for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    /// dd/mm chart label.
    pub label: String,
    pub views: u64,
}

/// Summed views for one distinct (latitude, longitude) pair, labeled with
/// the first-seen city/region/country for that pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCount {
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub views: u64,
}

/// Views for one hour of day (0-23).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourCount {
    pub hour: u32,
    pub views: u64,
}

/// Aggregated statistics over one window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub total_visits: u64,
    pub page_views: Vec<PageCount>,
    pub device_stats: DeviceStats,
    /// Sorted chronologically, not in first-occurrence order, so charts get
    /// a monotonic x-axis.
    pub daily_stats: Vec<DailyCount>,
    pub locations: Vec<LocationCount>,
    /// Mean of per-event session-duration-at-record-time, in seconds.
    pub average_session_duration_secs: f64,
    /// At most [`PEAK_HOURS_LIMIT`] entries, descending by count, ties kept
    /// in first-encountered order.
    pub peak_hours: Vec<HourCount>,
}

impl Report {
    /// Report for a window with no events: all-zero/empty fields.
    pub fn empty(window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> Self {
        Self {
            window_start,
            window_end,
            total_visits: 0,
            page_views: Vec::new(),
            device_stats: DeviceStats::default(),
            daily_stats: Vec::new(),
            locations: Vec::new(),
            average_session_duration_secs: 0.0,
            peak_hours: Vec::new(),
        }
    }
}

/// Normalizes a raw page identifier into a display label.
///
/// Strips a leading path separator, title-cases the remainder, and maps
/// unknown/empty pages to "Home".
pub fn normalize_page(raw: &str) -> String {
    let trimmed = raw.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        return "Home".to_string();
    }

    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => "Home".to_string(),
    }
}

/// Reduces the events with `created_at` in `[window_start, window_end)` into
/// a [`Report`]. Events outside the window are ignored; an empty selection
/// yields [`Report::empty`].
pub fn aggregate(
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    events: &[PageViewEvent],
) -> Report {
    let mut report = Report::empty(window_start, window_end);

    let mut page_index: HashMap<String, usize> = HashMap::new();
    let mut daily: HashMap<NaiveDate, u64> = HashMap::new();
    let mut location_index: HashMap<(u64, u64), usize> = HashMap::new();
    let mut hour_index: HashMap<u32, usize> = HashMap::new();
    let mut hours: Vec<HourCount> = Vec::new();
    let mut duration_sum: i64 = 0;
    let mut event_count: u64 = 0;

    for event in events {
        if event.created_at < window_start || event.created_at >= window_end {
            continue;
        }

        let views = event.view_count;
        report.total_visits += views;
        event_count += 1;
        duration_sum += event.session_duration_secs;

        let page = normalize_page(&event.page);
        match page_index.get(&page) {
            Some(&i) => report.page_views[i].views += views,
            None => {
                page_index.insert(page.clone(), report.page_views.len());
                report.page_views.push(PageCount { page, views });
            }
        }

        match event.device_class() {
            DeviceClass::Mobile => report.device_stats.mobile += views,
            DeviceClass::Desktop => report.device_stats.desktop += views,
        }

        *daily.entry(event.created_at.date_naive()).or_insert(0) += views;

        if let (Some(lat), Some(lon)) = (event.latitude, event.longitude) {
            let key = (lat.to_bits(), lon.to_bits());
            match location_index.get(&key) {
                Some(&i) => report.locations[i].views += views,
                None => {
                    location_index.insert(key, report.locations.len());
                    report.locations.push(LocationCount {
                        latitude: lat,
                        longitude: lon,
                        city: event.city.clone(),
                        region: event.region.clone(),
                        country: event.country.clone(),
                        views,
                    });
                }
            }
        }

        let hour = event.created_at.hour();
        match hour_index.get(&hour) {
            Some(&i) => hours[i].views += views,
            None => {
                hour_index.insert(hour, hours.len());
                hours.push(HourCount { hour, views });
            }
        }
    }

    // Chronological order for the time series; map iteration order would
    // scramble the chart's x-axis.
    let mut daily: Vec<DailyCount> = daily
        .into_iter()
        .map(|(date, views)| DailyCount {
            date,
            label: date.format("%d/%m").to_string(),
            views,
        })
        .collect();
    daily.sort_by_key(|d| d.date);
    report.daily_stats = daily;

    // Stable sort keeps first-encountered order among equal counts.
    hours.sort_by(|a, b| b.views.cmp(&a.views));
    hours.truncate(PEAK_HOURS_LIMIT);
    report.peak_hours = hours;

    if event_count > 0 {
        report.average_session_duration_secs = duration_sum as f64 / event_count as f64;
    }

    report
}
