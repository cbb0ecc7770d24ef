use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::table::{expect_fields, expect_header, TsvTable};
use crate::{AnnotationKind, ConceptId, EdamError, EdamResult, ToolId};

/// A tool and its label
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ToolRow {
    /// The tool
    pub tool: ToolId,
    /// The `sc:name` of the tool
    pub label: String,
}

/// All tools (`dfTool`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolTable {
    rows: Vec<ToolRow>,
}

impl ToolTable {
    /// Appends a tool
    pub fn push(&mut self, tool: ToolId, label: &str) {
        self.rows.push(ToolRow {
            tool,
            label: label.to_string(),
        });
    }

    /// All rows
    pub fn rows(&self) -> &[ToolRow] {
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

impl TsvTable for ToolTable {
    fn header(&self) -> Vec<&'static str> {
        vec!["tool", "toolLabel"]
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| vec![row.tool.as_str().to_string(), row.label.clone()])
            .collect()
    }

    fn from_records(header: &[&str], records: &[Vec<&str>]) -> EdamResult<Self> {
        expect_fields(header, records)?;
        expect_header(header, &["tool", "toolLabel"])?;
        let mut table = ToolTable::default();
        for record in records {
            table.push(ToolId::from_name(record[0]), record[1]);
        }
        Ok(table)
    }
}

/// One annotation of a tool with a concept
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AnnotationRow {
    /// The annotated tool
    pub tool: ToolId,
    /// The annotating concept
    pub concept: ConceptId,
    /// The label of the concept
    pub label: String,
}

/// Annotations of tools with topics or operations
///
/// Depending on the source, the table contains only direct annotations
/// (`dfToolTopic`), direct annotations without redundancy
/// (`df_topic_no_redundancy`) or the transitive closure (`dfToolTopicTransitive`).
///
/// Every (tool, concept) pair is present only once.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationTable {
    kind: AnnotationKind,
    rows: Vec<AnnotationRow>,
}

impl AnnotationTable {
    /// Constructs a new, empty table
    pub fn new(kind: AnnotationKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
        }
    }

    /// The kind of all concepts in the table
    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    /// Appends an annotation
    pub fn push(&mut self, tool: ToolId, concept: ConceptId, label: &str) {
        self.rows.push(AnnotationRow {
            tool,
            concept,
            label: label.to_string(),
        });
    }

    /// All rows
    pub fn rows(&self) -> &[AnnotationRow] {
        &self.rows
    }

    /// Iterates all rows
    pub fn iter(&self) -> std::slice::Iter<'_, AnnotationRow> {
        self.rows.iter()
    }

    /// Number of annotations
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no annotations
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct tools with at least one annotation
    pub fn n_tools(&self) -> usize {
        self.rows.iter().map(|row| &row.tool).collect::<HashSet<_>>().len()
    }

    /// All rows grouped by tool, sorted by tool
    pub fn by_tool(&self) -> BTreeMap<&ToolId, Vec<&AnnotationRow>> {
        let mut groups: BTreeMap<&ToolId, Vec<&AnnotationRow>> = BTreeMap::new();
        for row in &self.rows {
            groups.entry(&row.tool).or_default().push(row);
        }
        groups
    }

    /// The concepts of one tool
    pub fn concepts_of<'a>(&'a self, tool: &'a ToolId) -> impl Iterator<Item = &'a ConceptId> {
        self.rows
            .iter()
            .filter(move |row| &row.tool == tool)
            .map(|row| &row.concept)
    }

    /// Keeps only the rows for which `keep` returns `true`
    pub fn retain<F: FnMut(&AnnotationRow) -> bool>(&mut self, keep: F) {
        self.rows.retain(keep);
    }

    /// Sorts by tool and concept and removes duplicate pairs
    pub fn sort(&mut self) {
        self.rows.sort();
        self.rows
            .dedup_by(|a, b| a.tool == b.tool && a.concept == b.concept);
    }
}

impl TsvTable for AnnotationTable {
    fn header(&self) -> Vec<&'static str> {
        vec!["tool", self.kind.column(), self.kind.label_column()]
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                vec![
                    row.tool.as_str().to_string(),
                    row.concept.as_str().to_string(),
                    row.label.clone(),
                ]
            })
            .collect()
    }

    fn from_records(header: &[&str], records: &[Vec<&str>]) -> EdamResult<Self> {
        expect_fields(header, records)?;
        let kind = header
            .get(1)
            .and_then(|column| AnnotationKind::from_column(column))
            .ok_or_else(|| EdamError::ParseTableError(header.join("\t")))?;
        expect_header(header, &["tool", kind.column(), kind.label_column()])?;
        let mut table = AnnotationTable::new(kind);
        for record in records {
            table.push(
                ToolId::from_name(record[0]),
                ConceptId::from(record[1]),
                record[2],
            );
        }
        Ok(table)
    }
}

/// A direct annotation that is an ancestor of another direct annotation of the same tool
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RedundantAnnotation {
    /// The annotated tool
    pub tool: ToolId,
    /// The more specific annotation
    pub direct: ConceptId,
    /// Label of the more specific annotation
    pub direct_label: String,
    /// The redundant ancestor annotation
    pub redundant: ConceptId,
    /// Label of the redundant annotation
    pub redundant_label: String,
}

/// All redundant annotations of one kind (`dfToolTopic_redundancy`)
///
/// A redundant annotation is listed once for every more specific annotation
/// that makes it redundant.
#[derive(Debug, Clone, PartialEq)]
pub struct RedundancyTable {
    kind: AnnotationKind,
    rows: Vec<RedundantAnnotation>,
}

impl RedundancyTable {
    /// Constructs a new, empty table
    pub fn new(kind: AnnotationKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
        }
    }

    /// The kind of all concepts in the table
    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    /// Appends a redundant annotation
    pub fn push(&mut self, row: RedundantAnnotation) {
        self.rows.push(row);
    }

    /// All rows
    pub fn rows(&self) -> &[RedundantAnnotation] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if nothing is redundant
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The distinct (tool, redundant concept) pairs
    pub fn redundant_pairs(&self) -> HashSet<(&ToolId, &ConceptId)> {
        self.rows
            .iter()
            .map(|row| (&row.tool, &row.redundant))
            .collect()
    }

    /// Sorts the rows and removes duplicates
    pub fn sort(&mut self) {
        self.rows.sort();
        self.rows.dedup();
    }
}

impl TsvTable for RedundancyTable {
    fn header(&self) -> Vec<&'static str> {
        vec![
            "tool",
            self.kind.column(),
            self.kind.label_column(),
            self.kind.redundant_column(),
            self.kind.redundant_label_column(),
        ]
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                vec![
                    row.tool.as_str().to_string(),
                    row.direct.as_str().to_string(),
                    row.direct_label.clone(),
                    row.redundant.as_str().to_string(),
                    row.redundant_label.clone(),
                ]
            })
            .collect()
    }

    fn from_records(header: &[&str], records: &[Vec<&str>]) -> EdamResult<Self> {
        expect_fields(header, records)?;
        let kind = header
            .get(1)
            .and_then(|column| AnnotationKind::from_column(column))
            .ok_or_else(|| EdamError::ParseTableError(header.join("\t")))?;
        let mut table = RedundancyTable::new(kind);
        expect_header(header, &table.header())?;
        for record in records {
            table.push(RedundantAnnotation {
                tool: ToolId::from_name(record[0]),
                direct: ConceptId::from(record[1]),
                direct_label: record[2].to_string(),
                redundant: ConceptId::from(record[3]),
                redundant_label: record[4].to_string(),
            });
        }
        Ok(table)
    }
}

/// Number of topics and operations of a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCount {
    /// The tool
    pub tool: ToolId,
    /// The `sc:name` of the tool
    pub label: String,
    /// Number of topics
    pub nb_topics: usize,
    /// Number of operations
    pub nb_operations: usize,
}

/// Annotation counts for all tools (`dfTool_Transitive` and friends)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolCountTable {
    rows: Vec<ToolCount>,
}

impl ToolCountTable {
    /// Counts the annotations of every tool of `tools`
    ///
    /// Tools without annotations get a count of 0.
    ///
    /// # Errors
    ///
    /// [`EdamError::InvalidInput`] if `topics` or `operations` hold the wrong kind
    pub fn count(
        tools: &ToolTable,
        topics: &AnnotationTable,
        operations: &AnnotationTable,
    ) -> EdamResult<Self> {
        expect_kind(topics, AnnotationKind::Topic)?;
        expect_kind(operations, AnnotationKind::Operation)?;
        let topic_counts = count_by_tool(topics);
        let operation_counts = count_by_tool(operations);
        let rows = tools
            .rows()
            .iter()
            .map(|row| ToolCount {
                tool: row.tool.clone(),
                label: row.label.clone(),
                nb_topics: topic_counts.get(&row.tool).copied().unwrap_or(0),
                nb_operations: operation_counts.get(&row.tool).copied().unwrap_or(0),
            })
            .collect();
        Ok(Self { rows })
    }

    /// All rows
    pub fn rows(&self) -> &[ToolCount] {
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

pub(crate) fn expect_kind(table: &AnnotationTable, kind: AnnotationKind) -> EdamResult<()> {
    if table.kind() == kind {
        Ok(())
    } else {
        Err(EdamError::InvalidInput(format!(
            "expected a {kind} table, got a {} table",
            table.kind()
        )))
    }
}

fn count_by_tool(table: &AnnotationTable) -> BTreeMap<ToolId, usize> {
    let mut counts = BTreeMap::new();
    for row in table.iter() {
        *counts.entry(row.tool.clone()).or_insert(0) += 1;
    }
    counts
}

impl TsvTable for ToolCountTable {
    fn header(&self) -> Vec<&'static str> {
        vec!["tool", "toolLabel", "nbTopics", "nbOperations"]
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
                ]
            })
            .collect()
    }

    fn from_records(header: &[&str], records: &[Vec<&str>]) -> EdamResult<Self> {
        expect_fields(header, records)?;
        expect_header(header, &["tool", "toolLabel", "nbTopics", "nbOperations"])?;
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            rows.push(ToolCount {
                tool: ToolId::from_name(record[0]),
                label: record[1].to_string(),
                nb_topics: record[2].parse()?,
                nb_operations: record[3].parse()?,
            });
        }
        Ok(Self { rows })
    }
}

/// Annotations with concepts that are not declared as `owl:Class` (`dfToolTopic_NotOWLClass`)
#[derive(Debug, Clone, PartialEq)]
pub struct UndeclaredTable {
    kind: AnnotationKind,
    rows: BTreeSet<(ToolId, ConceptId)>,
}

impl UndeclaredTable {
    /// Constructs a new, empty table
    pub fn new(kind: AnnotationKind) -> Self {
        Self {
            kind,
            rows: BTreeSet::new(),
        }
    }

    /// Adds an annotation
    pub fn insert(&mut self, tool: ToolId, concept: ConceptId) {
        self.rows.insert((tool, concept));
    }

    /// Iterates all (tool, concept) pairs, sorted
    pub fn iter(&self) -> impl Iterator<Item = &(ToolId, ConceptId)> {
        self.rows.iter()
    }

    /// Number of annotations
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if all annotations are declared
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TsvTable for UndeclaredTable {
    fn header(&self) -> Vec<&'static str> {
        vec!["tool", self.kind.column()]
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|(tool, concept)| vec![tool.as_str().to_string(), concept.as_str().to_string()])
            .collect()
    }

    fn from_records(header: &[&str], records: &[Vec<&str>]) -> EdamResult<Self> {
        expect_fields(header, records)?;
        let kind = header
            .get(1)
            .and_then(|column| AnnotationKind::from_column(column))
            .ok_or_else(|| EdamError::ParseTableError(header.join("\t")))?;
        expect_header(header, &["tool", kind.column()])?;
        let mut table = UndeclaredTable::new(kind);
        for record in records {
            table.insert(ToolId::from_name(record[0]), ConceptId::from(record[1]));
        }
        Ok(table)
    }
}

/// A plain list of tools (`dfTool_ObsoleteOperation`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolList {
    tools: BTreeSet<ToolId>,
}

impl ToolList {
    /// Adds a tool
    pub fn insert(&mut self, tool: ToolId) -> bool {
        self.tools.insert(tool)
    }

    /// Returns `true` if the tool is part of the list
    pub fn contains(&self, tool: &ToolId) -> bool {
        self.tools.contains(tool)
    }

    /// Iterates all tools, sorted
    pub fn iter(&self) -> impl Iterator<Item = &ToolId> {
        self.tools.iter()
    }

    /// Number of tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if the list is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl TsvTable for ToolList {
    fn header(&self) -> Vec<&'static str> {
        vec!["tool"]
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.tools
            .iter()
            .map(|tool| vec![tool.as_str().to_string()])
            .collect()
    }

    fn from_records(header: &[&str], records: &[Vec<&str>]) -> EdamResult<Self> {
        expect_fields(header, records)?;
        expect_header(header, &["tool"])?;
        let mut list = ToolList::default();
        for record in records {
            list.insert(ToolId::from_name(record[0]));
        }
        Ok(list)
    }
}
