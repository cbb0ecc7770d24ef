//! Information theoretic metrics of annotations
//!
//! Every concept gets a usage frequency, an information content and an
//! entropy, based on how many tools are annotated with it ([`ConceptMetrics`]).
//! The metrics of all annotations of a tool are summed up into the tool scores
//! ([`ToolMetricTable`]).
//!
//! Metrics are always calculated from one [`crate::table::AnnotationTable`].
//! The transitive table includes all ancestors of the direct annotations, the
//! direct table only the asserted ones. Both variants are kept apart and
//! never mixed.
use std::fmt::Display;
use std::str::FromStr;

use crate::EdamError;

mod concept;
mod mutual_information;
mod tool;

pub use concept::{ConceptMetric, ConceptMetrics};
pub use mutual_information::MutualInformation;
pub use tool::{tool_metrics, tool_score, ToolMetric, ToolMetricTable};

/// The value of a [`ConceptMetric`] that is used as score of a concept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricKind {
    /// Number of tools annotated with the concept
    Count,
    /// `-log2(frequence)`
    #[default]
    InformationContent,
    /// `frequence * IC`
    Entropy,
}

impl Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricKind::Count => write!(f, "nbTools"),
            MetricKind::InformationContent => write!(f, "IC"),
            MetricKind::Entropy => write!(f, "entropy"),
        }
    }
}

impl FromStr for MetricKind {
    type Err = EdamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "count" | "nbtools" => Ok(MetricKind::Count),
            "ic" | "information-content" => Ok(MetricKind::InformationContent),
            "entropy" => Ok(MetricKind::Entropy),
            _ => Err(EdamError::InvalidInput(format!(
                "unknown metric `{s}`, expected `count`, `ic` or `entropy`"
            ))),
        }
    }
}
