//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Provenance of a piece of environmental data
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Fetched from an upstream provider
    #[default]
    Live,
    /// Synthesized locally because the provider was unavailable
    Estimated,
}

impl DataSource {
    /// Combine provenance tags: any estimated input makes the result estimated
    pub fn combine<I>(sources: I) -> DataSource
    where
        I: IntoIterator<Item = DataSource>,
    {
        if sources.into_iter().any(|s| s.is_estimated()) {
            DataSource::Estimated
        } else {
            DataSource::Live
        }
    }

    pub fn is_estimated(&self) -> bool {
        matches!(self, DataSource::Estimated)
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Live => write!(f, "live"),
            DataSource::Estimated => write!(f, "estimated"),
        }
    }
}

/// Standard response envelope for the dust monitoring API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
