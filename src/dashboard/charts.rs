//! Chart model for the runtime sparklines

use super::buffers::StatsHistory;
use crate::models::StatsMetric;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub metric: StatsMetric,
    /// e.g. "goroutines (12)"
    pub title: String,
    /// Buffer contents as drawn, sentinel included
    pub values: Vec<f32>,
}

/// Everything needed to draw one frame of charts.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub series: Vec<ChartSeries>,
    /// Shared Y-axis maximum: the session's running max
    pub range_max: f32,
}

impl ChartModel {
    pub fn from_history(history: &StatsHistory) -> Self {
        let series = StatsMetric::all()
            .into_iter()
            .map(|metric| {
                let buffer = history.buffer(metric);
                let title = match buffer.latest() {
                    Some(latest) => format!("{} ({})", metric.label(), latest as u64),
                    None => metric.label().to_string(),
                };
                ChartSeries {
                    metric,
                    title,
                    values: buffer.chart_series(),
                }
            })
            .collect();

        Self {
            series,
            range_max: history.max() as f32,
        }
    }
}
