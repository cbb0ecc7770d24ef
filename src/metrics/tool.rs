use std::collections::HashMap;

use tracing::debug;

use crate::metrics::ConceptMetrics;
use crate::table::{expect_fields, expect_header, AnnotationTable, ToolTable, TsvTable};
use crate::{AnnotationKind, ConceptId, EdamError, EdamResult, ToolId};

/// Aggregated metrics of all annotations of a tool
#[derive(Debug, Clone, PartialEq)]
pub struct ToolMetric {
    /// The tool
    pub tool: ToolId,
    /// The `sc:name` of the tool
    pub label: String,
    /// Number of topic annotations
    pub nb_topics: usize,
    /// Number of operation annotations
    pub nb_operations: usize,
    /// Sum of the IC of all topics
    pub topic_score: f64,
    /// Sum of the IC of all operations
    pub operation_score: f64,
    /// `topic_score + operation_score`
    pub score: f64,
    /// Sum of the entropy of all topics
    pub topic_entropy: f64,
    /// Sum of the entropy of all operations
    pub operation_entropy: f64,
    /// `topic_entropy + operation_entropy`
    pub entropy: f64,
}

/// Metrics of all tools (`dfToolallmetrics`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolMetricTable {
    rows: Vec<ToolMetric>,
    index: HashMap<ToolId, usize>,
}

impl ToolMetricTable {
    fn new(rows: Vec<ToolMetric>) -> Self {
        let index = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| (row.tool.clone(), idx))
            .collect();
        Self { rows, index }
    }

    /// Returns the metrics of the tool
    pub fn get(&self, tool: &ToolId) -> Option<&ToolMetric> {
        self.index.get(tool).map(|idx| &self.rows[*idx])
    }

    /// All rows, in the order of the tool table
    pub fn rows(&self) -> &[ToolMetric] {
        &self.rows
    }

    /// Number of tools
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no tools
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Default)]
struct Sums {
    count: usize,
    ic: f64,
    entropy: f64,
}

fn sum_by_tool<'a>(
    annotations: &'a AnnotationTable,
    metrics: &ConceptMetrics,
) -> HashMap<&'a ToolId, Sums> {
    let mut sums: HashMap<&ToolId, Sums> = HashMap::new();
    for row in annotations.iter() {
        let entry = sums.entry(&row.tool).or_default();
        entry.count += 1;
        if let Some(metric) = metrics.get(&row.concept) {
            entry.ic += metric.ic;
            entry.entropy += metric.entropy;
        }
    }
    sums
}

fn check_kind(table: AnnotationKind, metrics: AnnotationKind, expected: AnnotationKind) -> EdamResult<()> {
    if table == expected && metrics == expected {
        Ok(())
    } else {
        Err(EdamError::InvalidInput(format!(
            "expected {expected} annotations and metrics, got {table} annotations and {metrics} metrics"
        )))
    }
}

/// Calculates the scores and entropies of every tool of `tools`
///
/// The annotations of each tool are joined with the concept metrics and summed
/// up. Tools without annotations, and concepts without metrics, contribute 0.
///
/// Use the transitive annotation tables with the transitive metrics, or the
/// direct tables with the direct metrics.
///
/// # Errors
///
/// [`EdamError::InvalidInput`] if a table or metric holds the wrong kind of concepts
pub fn tool_metrics(
    tools: &ToolTable,
    topics: &AnnotationTable,
    operations: &AnnotationTable,
    topic_metrics: &ConceptMetrics,
    operation_metrics: &ConceptMetrics,
) -> EdamResult<ToolMetricTable> {
    check_kind(topics.kind(), topic_metrics.kind(), AnnotationKind::Topic)?;
    check_kind(
        operations.kind(),
        operation_metrics.kind(),
        AnnotationKind::Operation,
    )?;

    let topic_sums = sum_by_tool(topics, topic_metrics);
    let operation_sums = sum_by_tool(operations, operation_metrics);
    let empty = Sums::default();

    let rows = tools
        .rows()
        .iter()
        .map(|row| {
            let topic = topic_sums.get(&row.tool).unwrap_or(&empty);
            let operation = operation_sums.get(&row.tool).unwrap_or(&empty);
            ToolMetric {
                tool: row.tool.clone(),
                label: row.label.clone(),
                nb_topics: topic.count,
                nb_operations: operation.count,
                topic_score: topic.ic,
                operation_score: operation.ic,
                score: topic.ic + operation.ic,
                topic_entropy: topic.entropy,
                operation_entropy: operation.entropy,
                entropy: topic.entropy + operation.entropy,
            }
        })
        .collect();
    debug!("Calculated metrics of {} tools", tools.len());
    Ok(ToolMetricTable::new(rows))
}

/// Sums the scores of all annotations of a tool
///
/// `topic_scores` and `operation_scores` map concepts to an arbitrary score,
/// e.g. from [`ConceptMetrics::scores`]. Pass the annotation tables the scores
/// were calculated from, e.g. [`crate::table::Tables::metric_annotations`].
/// Concepts without a score are ignored. A tool without annotations has a
/// score of 0.
pub fn tool_score<S: std::hash::BuildHasher>(
    tool: &ToolId,
    topics: &AnnotationTable,
    operations: &AnnotationTable,
    topic_scores: &HashMap<ConceptId, f64, S>,
    operation_scores: &HashMap<ConceptId, f64, S>,
) -> f64 {
    let sum = |table: &AnnotationTable, scores: &HashMap<ConceptId, f64, S>| -> f64 {
        table
            .concepts_of(tool)
            .filter_map(|id| scores.get(id))
            .sum()
    };
    sum(topics, topic_scores) + sum(operations, operation_scores)
}

const TOOL_METRIC_HEADER: [&str; 10] = [
    "tool",
    "toolLabel",
    "nbTopics",
    "nbOperations",
    "topicScore",
    "operationScore",
    "score",
    "topicEntropy",
    "operationEntropy",
    "entropy",
];

impl TsvTable for ToolMetricTable {
    fn header(&self) -> Vec<&'static str> {
        TOOL_METRIC_HEADER.to_vec()
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                vec![
                    row.tool.as_str().to_string(),
                    row.label.clone(),
                    row.nb_topics.to_string(),
                    row.nb_operations.to_string(),
                    row.topic_score.to_string(),
                    row.operation_score.to_string(),
                    row.score.to_string(),
                    row.topic_entropy.to_string(),
                    row.operation_entropy.to_string(),
                    row.entropy.to_string(),
                ]
            })
            .collect()
    }

    fn from_records(header: &[&str], records: &[Vec<&str>]) -> EdamResult<Self> {
        expect_fields(header, records)?;
        expect_header(header, &TOOL_METRIC_HEADER)?;
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            rows.push(ToolMetric {
                tool: ToolId::from_name(record[0]),
                label: record[1].to_string(),
                nb_topics: record[2].parse()?,
                nb_operations: record[3].parse()?,
                topic_score: record[4].parse()?,
                operation_score: record[5].parse()?,
                score: record[6].parse()?,
                topic_entropy: record[7].parse()?,
                operation_entropy: record[8].parse()?,
                entropy: record[9].parse()?,
            });
        }
        Ok(Self::new(rows))
    }
}
