//! Configuration type definitions

use serde::{Deserialize, Serialize};

/// Current store format version
pub const STORE_FORMAT_VERSION: u32 = 1;

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store format version for compatibility checking
    #[serde(default = "default_version")]
    pub version: u32,

    /// Ledger and event settings
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Report layout settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// Ledger and event settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// How long a writer waits on a competing writer's transaction (milliseconds)
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Name given to the event created when no event is active
    #[serde(default = "default_event_name")]
    pub default_event_name: String,
}

/// Body font size override once criteria or rows pass a threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontStep {
    /// Applies when the criteria count exceeds this
    pub criteria_over: usize,
    /// Applies when the row count exceeds this
    pub rows_over: usize,
    /// Body font size in points
    pub size: f64,
}

/// Report layout settings. Lengths are millimetres, font sizes points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// First line of every report
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_margin")]
    pub margin: f64,

    #[serde(default = "default_rank_width")]
    pub rank_width: f64,

    #[serde(default = "default_name_width")]
    pub name_width: f64,

    #[serde(default = "default_total_width")]
    pub total_width: f64,

    /// Floor for each criterion column
    #[serde(default = "default_min_criterion_width")]
    pub min_criterion_width: f64,

    /// Landscape when the criteria count exceeds this
    #[serde(default = "default_landscape_criteria")]
    pub landscape_criteria_over: usize,

    /// Landscape when the row count exceeds this
    #[serde(default = "default_landscape_rows")]
    pub landscape_rows_over: usize,

    #[serde(default = "default_base_font_size")]
    pub base_font_size: f64,

    /// Applied in order; the last matching step wins
    #[serde(default = "default_font_steps")]
    pub font_steps: Vec<FontStep>,

    /// Floor of the header-fit search
    #[serde(default = "default_min_font_size")]
    pub min_font_size: f64,

    #[serde(default = "default_max_header_font_size")]
    pub max_header_font_size: f64,
}

fn default_version() -> u32 {
    STORE_FORMAT_VERSION
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_event_name() -> String {
    "Main Event".to_string()
}

fn default_title() -> String {
    "Event Results".to_string()
}

fn default_margin() -> f64 {
    10.0
}

fn default_rank_width() -> f64 {
    14.0
}

fn default_name_width() -> f64 {
    50.0
}

fn default_total_width() -> f64 {
    22.0
}

fn default_min_criterion_width() -> f64 {
    18.0
}

fn default_landscape_criteria() -> usize {
    4
}

fn default_landscape_rows() -> usize {
    15
}

fn default_base_font_size() -> f64 {
    10.0
}

fn default_font_steps() -> Vec<FontStep> {
    vec![
        FontStep {
            criteria_over: 5,
            rows_over: 25,
            size: 9.0,
        },
        FontStep {
            criteria_over: 7,
            rows_over: 40,
            size: 8.0,
        },
        FontStep {
            criteria_over: 9,
            rows_over: 60,
            size: 7.0,
        },
    ]
}

fn default_min_font_size() -> f64 {
    6.0
}

fn default_max_header_font_size() -> f64 {
    11.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            busy_timeout_ms: default_busy_timeout_ms(),
            default_event_name: default_event_name(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            title: default_title(),
            margin: default_margin(),
            rank_width: default_rank_width(),
            name_width: default_name_width(),
            total_width: default_total_width(),
            min_criterion_width: default_min_criterion_width(),
            landscape_criteria_over: default_landscape_criteria(),
            landscape_rows_over: default_landscape_rows(),
            base_font_size: default_base_font_size(),
            font_steps: default_font_steps(),
            min_font_size: default_min_font_size(),
            max_header_font_size: default_max_header_font_size(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            version: STORE_FORMAT_VERSION,
            scoring: ScoringConfig::default(),
            report: ReportConfig::default(),
        }
    }
}
