//! Dashboard view model.
//!
//! Pure formatting over an aggregated [`Report`]: each field maps onto one
//! widget (line chart, bar chart, pie chart, map). The renderer never
//! touches the event store.

use analytics_core::Report;
use serde::{Deserialize, Serialize};

/// One labeled data point in a chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: u64,
}

/// One map marker, sized by view count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
    pub views: u64,
}

/// Everything the admin dashboard needs to draw its widgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub total_visits: u64,
    pub average_session_duration_secs: f64,
    /// Line chart, chronological.
    pub daily_series: Vec<ChartPoint>,
    /// Bar chart, first-occurrence order.
    pub page_series: Vec<ChartPoint>,
    /// Pie chart: mobile/desktop.
    pub device_series: Vec<ChartPoint>,
    /// Bar chart of the busiest hours, descending.
    pub peak_hours: Vec<ChartPoint>,
    pub markers: Vec<MapMarker>,
}

impl Dashboard {
    pub fn from_report(report: &Report) -> Self {
        let daily_series = report
            .daily_stats
            .iter()
            .map(|d| ChartPoint {
                label: d.label.clone(),
                value: d.views,
            })
            .collect();

        let page_series = report
            .page_views
            .iter()
            .map(|p| ChartPoint {
                label: p.page.clone(),
                value: p.views,
            })
            .collect();

        let device_series = vec![
            ChartPoint {
                label: "Mobile".to_string(),
                value: report.device_stats.mobile,
            },
            ChartPoint {
                label: "Desktop".to_string(),
                value: report.device_stats.desktop,
            },
        ];

        let peak_hours = report
            .peak_hours
            .iter()
            .map(|h| ChartPoint {
                label: format!("{:02}h", h.hour),
                value: h.views,
            })
            .collect();

        let markers = report
            .locations
            .iter()
            .map(|l| MapMarker {
                latitude: l.latitude,
                longitude: l.longitude,
                label: l
                    .city
                    .clone()
                    .or_else(|| l.region.clone())
                    .or_else(|| l.country.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                views: l.views,
            })
            .collect();

        Self {
            total_visits: report.total_visits,
            average_session_duration_secs: report.average_session_duration_secs,
            daily_series,
            page_series,
            device_series,
            peak_hours,
            markers,
        }
    }
}
