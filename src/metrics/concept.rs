use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::metrics::MetricKind;
use crate::table::{expect_fields, expect_header, AnnotationTable, TsvTable};
use crate::{AnnotationKind, ConceptId, EdamError, EdamResult, ToolId};

/// Usage metrics of a single concept
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptMetric {
    /// The concept
    pub concept: ConceptId,
    /// Label of the concept
    pub label: String,
    /// Number of tools annotated with the concept
    pub nb_tools: usize,
    /// Fraction of all annotated tools, `(0, 1]`
    pub frequence: f64,
    /// Information content, `-log2(frequence)`
    pub ic: f64,
    /// `frequence * ic`
    pub entropy: f64,
}

impl ConceptMetric {
    /// Returns the value of the given metric
    pub fn value(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Count => self.nb_tools as f64,
            MetricKind::InformationContent => self.ic,
            MetricKind::Entropy => self.entropy,
        }
    }
}

/// Metrics of all concepts of one [`AnnotationTable`] (`dfTopicmetrics` and friends)
///
/// Sorted by decreasing number of tools.
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptMetrics {
    kind: AnnotationKind,
    n_tools: usize,
    metrics: Vec<ConceptMetric>,
    index: HashMap<ConceptId, usize>,
}

impl ConceptMetrics {
    /// Calculates the metrics of all concepts of the table
    ///
    /// The frequency of a concept is the number of tools annotated with it,
    /// divided by the number of tools that have at least one annotation in
    /// the table.
    ///
    /// # Errors
    ///
    /// [`EdamError::UndefinedMetric`] if the table does not contain any annotations
    ///
    /// # Examples
    ///
    /// ```
    /// use edamannot::metrics::ConceptMetrics;
    /// use edamannot::table::AnnotationTable;
    /// use edamannot::{AnnotationKind, ConceptId, ToolId};
    ///
    /// let mut table = AnnotationTable::new(AnnotationKind::Topic);
    /// for idx in 0..4 {
    ///     table.push(ToolId::from_name(&format!("tool{idx}")), ConceptId::from("topic_0003"), "Topic");
    /// }
    /// table.push(ToolId::from_name("tool0"), ConceptId::from("topic_0080"), "Sequence analysis");
    ///
    /// let metrics = ConceptMetrics::calculate(&table).unwrap();
    /// let analysis = metrics.get(&ConceptId::from("topic_0080")).unwrap();
    /// assert_eq!(analysis.frequence, 0.25);
    /// assert_eq!(analysis.ic, 2.0);
    /// assert_eq!(analysis.entropy, 0.5);
    ///
    /// let empty = AnnotationTable::new(AnnotationKind::Topic);
    /// assert!(ConceptMetrics::calculate(&empty).is_err());
    /// ```
    pub fn calculate(table: &AnnotationTable) -> EdamResult<Self> {
        let n_tools = table.n_tools();
        if n_tools == 0 {
            return Err(EdamError::UndefinedMetric(format!(
                "no tool has a {} annotation",
                table.kind()
            )));
        }

        let mut usage: BTreeMap<&ConceptId, (&str, HashSet<&ToolId>)> = BTreeMap::new();
        for row in table.iter() {
            usage
                .entry(&row.concept)
                .or_insert_with(|| (row.label.as_str(), HashSet::new()))
                .1
                .insert(&row.tool);
        }

        let metrics: Vec<ConceptMetric> = usage
            .into_iter()
            .map(|(concept, (label, tools))| {
                let nb_tools = tools.len();
                let frequence = nb_tools as f64 / n_tools as f64;
                let ic = 0.0 - frequence.log2();
                ConceptMetric {
                    concept: concept.clone(),
                    label: label.to_string(),
                    nb_tools,
                    frequence,
                    ic,
                    entropy: frequence * ic,
                }
            })
            .collect();
        debug!("Calculated metrics of {} {} concepts", metrics.len(), table.kind());
        Ok(Self::from_metrics(table.kind(), n_tools, metrics))
    }

    fn from_metrics(kind: AnnotationKind, n_tools: usize, mut metrics: Vec<ConceptMetric>) -> Self {
        metrics.sort_by(|a, b| {
            b.nb_tools
                .cmp(&a.nb_tools)
                .then_with(|| a.concept.cmp(&b.concept))
        });
        let index = metrics
            .iter()
            .enumerate()
            .map(|(idx, metric)| (metric.concept.clone(), idx))
            .collect();
        Self {
            kind,
            n_tools,
            metrics,
            index,
        }
    }

    /// The kind of all concepts
    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    /// Number of tools with at least one annotation, the denominator of all frequencies
    pub fn n_tools(&self) -> usize {
        self.n_tools
    }

    /// Returns the metrics of a concept, `None` if no tool is annotated with it
    pub fn get(&self, concept: &ConceptId) -> Option<&ConceptMetric> {
        self.index.get(concept).map(|idx| &self.metrics[*idx])
    }

    /// Iterates all concept metrics, most used concepts first
    pub fn iter(&self) -> std::slice::Iter<'_, ConceptMetric> {
        self.metrics.iter()
    }

    /// Number of concepts
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Returns `true` if there are no concepts
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Returns a concept -> score mapping of the given metric
    ///
    /// The mapping is used to color graphs and to score tools on demand.
    pub fn scores(&self, kind: MetricKind) -> HashMap<ConceptId, f64> {
        self.metrics
            .iter()
            .map(|metric| (metric.concept.clone(), metric.value(kind)))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ConceptMetrics {
    type Item = &'a ConceptMetric;
    type IntoIter = std::slice::Iter<'a, ConceptMetric>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TsvTable for ConceptMetrics {
    fn header(&self) -> Vec<&'static str> {
        vec![
            self.kind.column(),
            self.kind.label_column(),
            "nbTools",
            "frequence",
            "IC",
            "entropy",
        ]
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.metrics
            .iter()
            .map(|metric| {
                vec![
                    metric.concept.as_str().to_string(),
                    metric.label.clone(),
                    metric.nb_tools.to_string(),
                    metric.frequence.to_string(),
                    metric.ic.to_string(),
                    metric.entropy.to_string(),
                ]
            })
            .collect()
    }

    /// The number of annotated tools is not part of the table. It is
    /// restored from `nbTools / frequence` of the first row.
    fn from_records(header: &[&str], records: &[Vec<&str>]) -> EdamResult<Self> {
        expect_fields(header, records)?;
        let kind = header
            .first()
            .and_then(|column| AnnotationKind::from_column(column))
            .ok_or_else(|| EdamError::ParseTableError(header.join("\t")))?;
        expect_header(
            header,
            &[
                kind.column(),
                kind.label_column(),
                "nbTools",
                "frequence",
                "IC",
                "entropy",
            ],
        )?;
        let mut metrics = Vec::with_capacity(records.len());
        for record in records {
            metrics.push(ConceptMetric {
                concept: ConceptId::from(record[0]),
                label: record[1].to_string(),
                nb_tools: record[2].parse()?,
                frequence: record[3].parse()?,
                ic: record[4].parse()?,
                entropy: record[5].parse()?,
            });
        }
        let n_tools = metrics
            .first()
            .map_or(0, |first| (first.nb_tools as f64 / first.frequence).round() as usize);
        Ok(Self::from_metrics(kind, n_tools, metrics))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures::ontology;
    use crate::Closure;

    #[test]
    fn five_of_hundred() {
        let mut table = AnnotationTable::new(AnnotationKind::Topic);
        for idx in 0..100 {
            let tool = ToolId::from_name(&format!("tool{idx}"));
            table.push(tool.clone(), ConceptId::from("topic_0003"), "Topic");
            if idx < 5 {
                table.push(tool, ConceptId::from("topic_0080"), "Sequence analysis");
            }
        }
        let metrics = ConceptMetrics::calculate(&table).unwrap();
        assert_eq!(metrics.n_tools(), 100);

        let metric = metrics.get(&ConceptId::from("topic_0080")).unwrap();
        assert_eq!(metric.nb_tools, 5);
        assert!((metric.frequence - 0.05).abs() < 1e-12);
        assert!((metric.ic - 4.3219).abs() < 1e-4);
        assert!((metric.entropy - 0.2161).abs() < 1e-4);

        let root = metrics.get(&ConceptId::from("topic_0003")).unwrap();
        assert_eq!(root.frequence, 1.0);
        assert_eq!(root.ic, 0.0);
        assert!(root.ic.is_sign_positive());
    }

    #[test]
    fn transitive_topics() {
        let ont = ontology();
        let table = ont.annotation_table(AnnotationKind::Topic, Closure::Transitive);
        let metrics = ConceptMetrics::calculate(&table).unwrap();
        // blast, bowtie and star
        assert_eq!(metrics.n_tools(), 3);
        assert_eq!(metrics.len(), 3);
        let first = metrics.iter().next().unwrap();
        assert_eq!(first.concept, ConceptId::from("topic_0003"));
        let sequencing = metrics.get(&ConceptId::from("topic_3168")).unwrap();
        assert_eq!(sequencing.nb_tools, 2);
        assert!(metrics.get(&ConceptId::from("topic_0622")).is_none());
    }

    #[test]
    fn scores() {
        let ont = ontology();
        let table = ont.annotation_table(AnnotationKind::Operation, Closure::Direct);
        let metrics = ConceptMetrics::calculate(&table).unwrap();
        let counts = metrics.scores(MetricKind::Count);
        assert_eq!(counts[&ConceptId::from("operation_3198")], 2.0);
        assert_eq!(counts.len(), metrics.len());
    }

    #[test]
    fn from_tsv() {
        let ont = ontology();
        let table = ont.annotation_table(AnnotationKind::Topic, Closure::Transitive);
        let metrics = ConceptMetrics::calculate(&table).unwrap();
        let parsed = ConceptMetrics::read_tsv(metrics.to_tsv_string().as_bytes()).unwrap();
        assert_eq!(parsed, metrics);
        assert!(metrics
            .to_tsv_string()
            .starts_with("topic\ttopicLabel\tnbTools\tfrequence\tIC\tentropy\n"));
    }
}

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn metric_bounds(annotations in prop::collection::vec((0usize..30, 0usize..10), 1..200)) {
            let mut table = AnnotationTable::new(AnnotationKind::Operation);
            for (tool, concept) in annotations {
                table.push(
                    ToolId::from_name(&format!("tool{tool}")),
                    ConceptId::from(format!("operation_{concept:04}")),
                    "",
                );
            }
            table.sort();
            let metrics = ConceptMetrics::calculate(&table).unwrap();
            for metric in &metrics {
                prop_assert!(metric.frequence > 0.0 && metric.frequence <= 1.0);
                prop_assert!(metric.ic >= 0.0);
                prop_assert_eq!(metric.ic, 0.0 - metric.frequence.log2());
                prop_assert_eq!(metric.entropy, metric.frequence * metric.ic);
                prop_assert!(metric.nb_tools <= metrics.n_tools());
            }
            let mut sorted: Vec<&ConceptMetric> = metrics.iter().collect();
            sorted.sort_by(|a, b| a.frequence.total_cmp(&b.frequence));
            for pair in sorted.windows(2) {
                prop_assert!(pair[0].ic >= pair[1].ic);
            }
        }
    }
}
