//! Core data types for pprof Dashboard.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Profile kinds served by the backend's `/p` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileKind {
    #[serde(rename = "heap")]
    Heap,
    #[serde(rename = "profile")]
    Cpu,
}

impl ProfileKind {
    /// Value sent in the `profile` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::Heap => "heap",
            ProfileKind::Cpu => "profile",
        }
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            ProfileKind::Heap => "Heap",
            ProfileKind::Cpu => "CPU",
        }
    }

    pub fn all() -> [ProfileKind; 2] {
        [ProfileKind::Cpu, ProfileKind::Heap]
    }
}

impl Default for ProfileKind {
    fn default() -> Self {
        ProfileKind::Heap
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProfileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "heap" => Ok(ProfileKind::Heap),
            "profile" | "cpu" => Ok(ProfileKind::Cpu),
            _ => Err(format!("Unknown profile kind: {}", s)),
        }
    }
}

/// A report cell value. The backend sends either raw numbers or
/// preformatted strings (e.g. "12.5%", "3.20MB").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    Number(f64),
    Text(String),
}

impl Default for Metric {
    fn default() -> Self {
        Metric::Text(String::new())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Integral values print without a trailing ".0"
            Metric::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Metric::Number(n) => write!(f, "{}", n),
            Metric::Text(s) => f.write_str(s),
        }
    }
}

/// One row of a profile report, in server order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportRow {
    /// Relative weight in [0, 1], drives the bar width
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub flat: Metric,
    #[serde(default)]
    pub flat_perc: Metric,
    #[serde(default)]
    pub flatsum_perc: Metric,
    #[serde(default)]
    pub cum: Metric,
    #[serde(default)]
    pub cum_perc: Metric,
    /// Symbol or function label
    #[serde(default)]
    pub name: String,
}

impl ReportRow {
    /// Score clamped to [0, 1]; non-finite scores draw an empty bar.
    pub fn bar_fraction(&self) -> f32 {
        if self.score.is_finite() {
            self.score.clamp(0.0, 1.0) as f32
        } else {
            0.0
        }
    }
}

/// Body of a successful `/p` response.
#[derive(Debug, Clone, PartialEq)]
pub enum TableResponse {
    /// JSON array of rows
    Rows(Vec<ReportRow>),
    /// Non-JSON body; shown as plain text
    Fragment(String),
}

/// Parameters of a `/p` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub profile: ProfileKind,
    pub filter: String,
    pub cumsort: bool,
    pub force: bool,
}

impl TableQuery {
    /// Query pairs in the order the backend documents them.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("profile", self.profile.as_str().to_string()),
            ("filter", self.filter.clone()),
            ("cumsort", self.cumsort.to_string()),
            ("force", self.force.to_string()),
        ]
    }
}

/// Runtime counters reported by `/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSample {
    pub goroutine: u64,
    pub thread: u64,
    /// Older backends do not report block counts
    #[serde(default)]
    pub block: u64,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// The runtime counters tracked by the sparklines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatsMetric {
    Goroutine,
    Thread,
    Block,
}

impl StatsMetric {
    pub fn all() -> [StatsMetric; 3] {
        [StatsMetric::Goroutine, StatsMetric::Thread, StatsMetric::Block]
    }

    /// Plural label used in chart titles
    pub fn label(&self) -> &'static str {
        match self {
            StatsMetric::Goroutine => "goroutines",
            StatsMetric::Thread => "threads",
            StatsMetric::Block => "blocking events",
        }
    }

    pub fn value_of(&self, sample: &StatsSample) -> u64 {
        match self {
            StatsMetric::Goroutine => sample.goroutine,
            StatsMetric::Thread => sample.thread,
            StatsMetric::Block => sample.block,
        }
    }
}
