use std::collections::{HashMap, HashSet};

use crate::table::AnnotationTable;
use crate::{ConceptId, EdamError, EdamResult, ToolId};

/// Mutual information between the annotations of two tools
///
/// For every pair of annotations `(a1, a2)` of tool 1 and tool 2:
///
/// ```text
/// p(a)      = tools annotated with a / all annotated tools
/// p(a1, a2) = tools annotated with a1 and a2 / all annotated tools
/// mi        = Σ p(a1, a2) * log2(p(a1, a2) / (p(a1) * p(a2)))
/// ```
///
/// Pairs with a probability of 0 don't contribute. The contribution of every
/// annotation pair is cached, so comparing many tools is cheap.
///
/// Topics and operations are pooled, the transitive tables are used in general.
pub struct MutualInformation {
    annotations: HashMap<ToolId, Vec<ConceptId>>,
    tools: HashMap<ConceptId, HashSet<ToolId>>,
    n_tools: usize,
    cache: HashMap<(ConceptId, ConceptId), f64>,
}

impl MutualInformation {
    /// Indexes the annotations of both tables
    ///
    /// # Errors
    ///
    /// [`EdamError::UndefinedMetric`] if no tool has an annotation
    pub fn new(topics: &AnnotationTable, operations: &AnnotationTable) -> EdamResult<Self> {
        let mut annotations: HashMap<ToolId, Vec<ConceptId>> = HashMap::new();
        let mut tools: HashMap<ConceptId, HashSet<ToolId>> = HashMap::new();
        for row in topics.iter().chain(operations.iter()) {
            annotations
                .entry(row.tool.clone())
                .or_default()
                .push(row.concept.clone());
            tools
                .entry(row.concept.clone())
                .or_default()
                .insert(row.tool.clone());
        }
        let n_tools = annotations.len();
        if n_tools == 0 {
            return Err(EdamError::UndefinedMetric(
                "no tool has an annotation".to_string(),
            ));
        }
        Ok(Self {
            annotations,
            tools,
            n_tools,
            cache: HashMap::new(),
        })
    }

    /// Returns the mutual information of two tools
    ///
    /// Tools without annotations have a mutual information of 0.
    pub fn between(&mut self, tool1: &ToolId, tool2: &ToolId) -> f64 {
        let (Some(annotations1), Some(annotations2)) =
            (self.annotations.get(tool1), self.annotations.get(tool2))
        else {
            return 0.0;
        };

        let mut mi: f64 = 0.0;
        for a1 in annotations1 {
            for a2 in annotations2 {
                let key = (a1.clone(), a2.clone());
                if let Some(value) = self.cache.get(&key) {
                    mi += *value;
                    continue;
                }
                let value = pair_information(&self.tools, self.n_tools, a1, a2);
                self.cache.insert((a2.clone(), a1.clone()), value);
                self.cache.insert(key, value);
                mi += value;
            }
        }
        mi
    }

    /// Number of annotation pairs in the cache
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

fn pair_information(
    tools: &HashMap<ConceptId, HashSet<ToolId>>,
    n_tools: usize,
    a1: &ConceptId,
    a2: &ConceptId,
) -> f64 {
    let (Some(tools1), Some(tools2)) = (tools.get(a1), tools.get(a2)) else {
        return 0.0;
    };
    let n = n_tools as f64;
    let p1 = tools1.len() as f64 / n;
    let p2 = tools2.len() as f64 / n;
    let p12 = tools1.intersection(tools2).count() as f64 / n;
    if p1 * p2 * p12 == 0.0 {
        0.0
    } else {
        p12 * (p12 / (p1 * p2)).log2()
    }
}
