//! Actor statistics
//!
//! Distributions by country, gender, age and life status, reported either as
//! a json summary or as one stacked chart image.

pub mod aggregate;
pub mod chart;

use chrono::{Datelike, NaiveDateTime};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::db::Actor;
use aggregate::{LifeStatus, Share};

/// Statistics request errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("unknown statistics category: {0:?}")]
    UnknownCategory(String),

    #[error("unknown output format: {0:?}")]
    UnknownFormat(String),

    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("chart rendering failed: {0}")]
    Render(String),
}

/// Grouping categories, in reporting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Country,
    Gender,
    Birthday,
    LifeStatus,
}

impl Category {
    pub fn parse(token: &str) -> Result<Self, StatsError> {
        match token {
            "country" => Ok(Self::Country),
            "gender" => Ok(Self::Gender),
            "birthday" => Ok(Self::Birthday),
            "life_status" => Ok(Self::LifeStatus),
            other => Err(StatsError::UnknownCategory(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Image,
}

impl OutputFormat {
    pub fn parse(token: &str) -> Result<Self, StatsError> {
        match token {
            "json" => Ok(Self::Json),
            "image" => Ok(Self::Image),
            other => Err(StatsError::UnknownFormat(other.to_string())),
        }
    }
}

/// Raw statistics parameters from the query string
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct StatsParams {
    pub format: Option<String>,
    pub by: Option<String>,
}

/// Validated statistics request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsRequest {
    pub format: OutputFormat,
    /// Distinct categories in reporting order
    pub categories: Vec<Category>,
}

impl StatsRequest {
    pub fn parse(params: &StatsParams) -> Result<Self, StatsError> {
        let format = params
            .format
            .as_deref()
            .ok_or(StatsError::MissingParameter("format"))?;
        let by = params
            .by
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .ok_or(StatsError::MissingParameter("by"))?;

        let mut categories = by
            .split(',')
            .map(|token| Category::parse(token.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        categories.sort();
        categories.dedup();

        Ok(Self {
            format: OutputFormat::parse(format.trim())?,
            categories,
        })
    }
}

/// Computed distribution for one category
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Country(Vec<Share>),
    Gender(Vec<Share>),
    Age(Vec<i32>),
    LifeStatus(Option<LifeStatus>),
}

/// Everything needed to answer a statistics request
#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    pub total: usize,
    pub total_updated: usize,
    pub sections: Vec<Section>,
}

impl StatsReport {
    pub fn compute(actors: &[Actor], categories: &[Category], now: NaiveDateTime) -> Self {
        let sections = categories
            .iter()
            .map(|category| match category {
                Category::Country => Section::Country(aggregate::country_shares(actors)),
                Category::Gender => Section::Gender(aggregate::gender_shares(actors)),
                Category::Birthday => Section::Age(aggregate::ages(actors, now.year())),
                Category::LifeStatus => Section::LifeStatus(aggregate::life_status(actors)),
            })
            .collect();

        Self {
            total: actors.len(),
            total_updated: aggregate::updated_within_day(actors, now),
            sections,
        }
    }

    /// Numeric summary
    ///
    /// The gender summary only reports `Female` and `Male`; other stored
    /// values appear in the chart but not here.
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("total".to_string(), json!(self.total));
        out.insert("total-updated".to_string(), json!(self.total_updated));

        for section in &self.sections {
            let (key, value) = match section {
                Section::Country(shares) => (
                    "by-country",
                    Value::Object(
                        shares
                            .iter()
                            .map(|s| (s.label.clone(), json!(s.percent)))
                            .collect(),
                    ),
                ),
                Section::Gender(shares) => {
                    let pct = |label: &str| {
                        shares
                            .iter()
                            .find(|s| s.label == label)
                            .map_or(0.0, |s| s.percent)
                    };
                    ("by-gender", json!({ "Female": pct("Female"), "Male": pct("Male") }))
                }
                Section::Age(ages) => (
                    "by-birthday",
                    match aggregate::age_summary(ages) {
                        Some(summary) => json!(summary),
                        None => json!({
                            "max_age": null,
                            "min_age": null,
                            "average_age": null,
                            "median_age": null,
                        }),
                    },
                ),
                Section::LifeStatus(status) => (
                    "by-life_status",
                    match status {
                        Some(s) => json!(s),
                        None => json!({ "alive": null, "dead": null }),
                    },
                ),
            };
            out.insert(key.to_string(), value);
        }

        Value::Object(out)
    }
}
