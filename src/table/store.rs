use std::fmt::Display;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::metrics::{tool_metrics, ConceptMetrics, ToolMetricTable};
use crate::redundancy;
use crate::table::{
    read_gz, write_gz, AnnotationTable, RedundancyTable, ToolCountTable, ToolTable, TsvTable,
};
use crate::{AnnotationKind, Closure, EdamError, EdamResult, Ontology};

/// The fixed set of materialized tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableName {
    /// All tools
    Tools,
    /// Direct topic annotations
    ToolTopic,
    /// Transitive topic annotations
    ToolTopicTransitive,
    /// Direct operation annotations
    ToolOperation,
    /// Transitive operation annotations
    ToolOperationTransitive,
    /// Redundant direct topics
    TopicRedundancy,
    /// Redundant direct operations
    OperationRedundancy,
    /// Direct topics without redundant ones
    TopicNoRedundancy,
    /// Direct operations without redundant ones
    OperationNoRedundancy,
    /// Topic metrics from transitive annotations
    TopicMetrics,
    /// Topic metrics from direct annotations
    TopicMetricsDirect,
    /// Operation metrics from transitive annotations
    OperationMetrics,
    /// Operation metrics from direct annotations
    OperationMetricsDirect,
    /// Tool metrics from transitive annotations
    ToolMetrics,
    /// Tool metrics from direct annotations
    ToolMetricsDirect,
    /// Annotation counts from transitive annotations
    ToolCountTransitive,
    /// Annotation counts from direct annotations
    ToolCountDirect,
    /// Annotation counts from direct annotations without redundancy
    ToolCountNoRedundancy,
    /// Topics that are not declared in EDAM
    ToolTopicNotOwlClass,
    /// Tools with obsolete operations
    ToolObsoleteOperation,
}

impl TableName {
    /// All tables that `init` always writes, in the order of their creation
    pub const CORE: [TableName; 18] = [
        TableName::Tools,
        TableName::ToolTopic,
        TableName::ToolTopicTransitive,
        TableName::ToolOperation,
        TableName::ToolOperationTransitive,
        TableName::TopicRedundancy,
        TableName::OperationRedundancy,
        TableName::TopicNoRedundancy,
        TableName::OperationNoRedundancy,
        TableName::ToolCountTransitive,
        TableName::ToolCountDirect,
        TableName::ToolCountNoRedundancy,
        TableName::TopicMetrics,
        TableName::TopicMetricsDirect,
        TableName::OperationMetrics,
        TableName::OperationMetricsDirect,
        TableName::ToolMetrics,
        TableName::ToolMetricsDirect,
    ];

    /// Optional diagnostic tables
    pub const DIAGNOSTICS: [TableName; 2] = [
        TableName::ToolTopicNotOwlClass,
        TableName::ToolObsoleteOperation,
    ];

    /// Name of the table without file extension
    pub fn name(&self) -> &'static str {
        match self {
            TableName::Tools => "dfTool",
            TableName::ToolTopic => "dfToolTopic",
            TableName::ToolTopicTransitive => "dfToolTopicTransitive",
            TableName::ToolOperation => "dfToolOperation",
            TableName::ToolOperationTransitive => "dfToolOperationTransitive",
            TableName::TopicRedundancy => "dfToolTopic_redundancy",
            TableName::OperationRedundancy => "dfToolOperation_redundancy",
            TableName::TopicNoRedundancy => "df_topic_no_redundancy",
            TableName::OperationNoRedundancy => "df_operation_no_redundancy",
            TableName::TopicMetrics => "dfTopicmetrics",
            TableName::TopicMetricsDirect => "dfTopicmetrics_NT",
            TableName::OperationMetrics => "dfOperationmetrics",
            TableName::OperationMetricsDirect => "dfOperationmetrics_NT",
            TableName::ToolMetrics => "dfToolallmetrics",
            TableName::ToolMetricsDirect => "dfToolallmetrics_NT",
            TableName::ToolCountTransitive => "dfTool_Transitive",
            TableName::ToolCountDirect => "dfTool_NoTransitive",
            TableName::ToolCountNoRedundancy => "dfTool_NoTransitive_NoRedundancy",
            TableName::ToolTopicNotOwlClass => "dfToolTopic_NotOWLClass",
            TableName::ToolObsoleteOperation => "dfTool_ObsoleteOperation",
        }
    }

    /// File name of the compressed table, e.g. `dfTool.tsv.gz`
    pub fn file_name(&self) -> String {
        format!("{}.tsv.gz", self.name())
    }

    fn annotations(kind: AnnotationKind, closure: Closure) -> Self {
        match (kind, closure) {
            (AnnotationKind::Topic, Closure::Direct) => TableName::ToolTopic,
            (AnnotationKind::Topic, Closure::Transitive) => TableName::ToolTopicTransitive,
            (AnnotationKind::Operation, Closure::Direct) => TableName::ToolOperation,
            (AnnotationKind::Operation, Closure::Transitive) => TableName::ToolOperationTransitive,
        }
    }

    fn redundancy(kind: AnnotationKind) -> Self {
        match kind {
            AnnotationKind::Topic => TableName::TopicRedundancy,
            AnnotationKind::Operation => TableName::OperationRedundancy,
        }
    }

    fn no_redundancy(kind: AnnotationKind) -> Self {
        match kind {
            AnnotationKind::Topic => TableName::TopicNoRedundancy,
            AnnotationKind::Operation => TableName::OperationNoRedundancy,
        }
    }

    fn concept_metrics(kind: AnnotationKind, closure: Closure) -> Self {
        match (kind, closure) {
            (AnnotationKind::Topic, Closure::Direct) => TableName::TopicMetricsDirect,
            (AnnotationKind::Topic, Closure::Transitive) => TableName::TopicMetrics,
            (AnnotationKind::Operation, Closure::Direct) => TableName::OperationMetricsDirect,
            (AnnotationKind::Operation, Closure::Transitive) => TableName::OperationMetrics,
        }
    }

    fn tool_metrics(closure: Closure) -> Self {
        match closure {
            Closure::Direct => TableName::ToolMetricsDirect,
            Closure::Transitive => TableName::ToolMetrics,
        }
    }
}

impl Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// All derived tables of one [`Ontology`]
///
/// `Tables` is created once per invocation, either by calculating everything
/// from the ontology ([`Tables::compute`]) or by loading a previously
/// materialized cache ([`TableStore::load_tables`]), and passed to everything
/// that needs annotations or metrics.
///
/// The direct (non-transitive) metrics are calculated from the direct
/// annotations without redundancy.
#[derive(Debug, Clone)]
pub struct Tables {
    tools: ToolTable,
    topics: AnnotationTable,
    topics_transitive: AnnotationTable,
    operations: AnnotationTable,
    operations_transitive: AnnotationTable,
    topic_redundancy: RedundancyTable,
    operation_redundancy: RedundancyTable,
    topics_no_redundancy: AnnotationTable,
    operations_no_redundancy: AnnotationTable,
    counts_transitive: ToolCountTable,
    counts_direct: ToolCountTable,
    counts_no_redundancy: ToolCountTable,
    topic_metrics: ConceptMetrics,
    topic_metrics_direct: ConceptMetrics,
    operation_metrics: ConceptMetrics,
    operation_metrics_direct: ConceptMetrics,
    tool_metrics: ToolMetricTable,
    tool_metrics_direct: ToolMetricTable,
}

impl Tables {
    /// Calculates all tables from the ontology
    ///
    /// # Errors
    ///
    /// - [`EdamError::UndefinedMetric`] if no tool has a topic or an operation
    /// - [`EdamError::CyclicHierarchy`] if the hierarchy is invalid
    pub fn compute(ontology: &Ontology) -> EdamResult<Self> {
        Self::materialize(ontology, |_, _| Ok(()))
    }

    /// Calculates all tables in the order of their dependencies and hands
    /// every table to `sink` as soon as it is ready
    ///
    /// If a step or the `sink` fails, the remaining tables are not calculated.
    ///
    /// # Errors
    ///
    /// See [`Tables::compute`] and all errors of `sink`
    pub fn materialize<F>(ontology: &Ontology, mut sink: F) -> EdamResult<Self>
    where
        F: FnMut(TableName, &dyn TsvTable) -> EdamResult<()>,
    {
        let tools = ontology.tool_table();
        sink(TableName::Tools, &tools)?;

        let topics = ontology.annotation_table(AnnotationKind::Topic, Closure::Direct);
        sink(TableName::ToolTopic, &topics)?;
        let topics_transitive = ontology.annotation_table(AnnotationKind::Topic, Closure::Transitive);
        sink(TableName::ToolTopicTransitive, &topics_transitive)?;
        let operations = ontology.annotation_table(AnnotationKind::Operation, Closure::Direct);
        sink(TableName::ToolOperation, &operations)?;
        let operations_transitive =
            ontology.annotation_table(AnnotationKind::Operation, Closure::Transitive);
        sink(TableName::ToolOperationTransitive, &operations_transitive)?;

        let topic_redundancy = redundancy::find_redundant(ontology, &topics)?;
        sink(TableName::TopicRedundancy, &topic_redundancy)?;
        let operation_redundancy = redundancy::find_redundant(ontology, &operations)?;
        sink(TableName::OperationRedundancy, &operation_redundancy)?;

        let topics_no_redundancy = redundancy::remove_redundant(&topics, &topic_redundancy)?;
        sink(TableName::TopicNoRedundancy, &topics_no_redundancy)?;
        let operations_no_redundancy =
            redundancy::remove_redundant(&operations, &operation_redundancy)?;
        sink(TableName::OperationNoRedundancy, &operations_no_redundancy)?;

        let counts_transitive =
            ToolCountTable::count(&tools, &topics_transitive, &operations_transitive)?;
        sink(TableName::ToolCountTransitive, &counts_transitive)?;
        let counts_direct = ToolCountTable::count(&tools, &topics, &operations)?;
        sink(TableName::ToolCountDirect, &counts_direct)?;
        let counts_no_redundancy =
            ToolCountTable::count(&tools, &topics_no_redundancy, &operations_no_redundancy)?;
        sink(TableName::ToolCountNoRedundancy, &counts_no_redundancy)?;

        let topic_metrics = ConceptMetrics::calculate(&topics_transitive)?;
        sink(TableName::TopicMetrics, &topic_metrics)?;
        let topic_metrics_direct = ConceptMetrics::calculate(&topics_no_redundancy)?;
        sink(TableName::TopicMetricsDirect, &topic_metrics_direct)?;
        let operation_metrics = ConceptMetrics::calculate(&operations_transitive)?;
        sink(TableName::OperationMetrics, &operation_metrics)?;
        let operation_metrics_direct = ConceptMetrics::calculate(&operations_no_redundancy)?;
        sink(TableName::OperationMetricsDirect, &operation_metrics_direct)?;

        let tool_metrics_transitive = tool_metrics(
            &tools,
            &topics_transitive,
            &operations_transitive,
            &topic_metrics,
            &operation_metrics,
        )?;
        sink(TableName::ToolMetrics, &tool_metrics_transitive)?;
        let tool_metrics_direct = tool_metrics(
            &tools,
            &topics_no_redundancy,
            &operations_no_redundancy,
            &topic_metrics_direct,
            &operation_metrics_direct,
        )?;
        sink(TableName::ToolMetricsDirect, &tool_metrics_direct)?;

        Ok(Self {
            tools,
            topics,
            topics_transitive,
            operations,
            operations_transitive,
            topic_redundancy,
            operation_redundancy,
            topics_no_redundancy,
            operations_no_redundancy,
            counts_transitive,
            counts_direct,
            counts_no_redundancy,
            topic_metrics,
            topic_metrics_direct,
            operation_metrics,
            operation_metrics_direct,
            tool_metrics: tool_metrics_transitive,
            tool_metrics_direct,
        })
    }

    /// All tools
    pub fn tools(&self) -> &ToolTable {
        &self.tools
    }

    /// Direct or transitive annotations
    pub fn annotations(&self, kind: AnnotationKind, closure: Closure) -> &AnnotationTable {
        match (kind, closure) {
            (AnnotationKind::Topic, Closure::Direct) => &self.topics,
            (AnnotationKind::Topic, Closure::Transitive) => &self.topics_transitive,
            (AnnotationKind::Operation, Closure::Direct) => &self.operations,
            (AnnotationKind::Operation, Closure::Transitive) => &self.operations_transitive,
        }
    }

    /// Redundant direct annotations
    pub fn redundancy(&self, kind: AnnotationKind) -> &RedundancyTable {
        match kind {
            AnnotationKind::Topic => &self.topic_redundancy,
            AnnotationKind::Operation => &self.operation_redundancy,
        }
    }

    /// Direct annotations without redundancy
    pub fn no_redundancy(&self, kind: AnnotationKind) -> &AnnotationTable {
        match kind {
            AnnotationKind::Topic => &self.topics_no_redundancy,
            AnnotationKind::Operation => &self.operations_no_redundancy,
        }
    }

    /// Annotation counts per tool
    pub fn tool_counts(&self, closure: Closure) -> &ToolCountTable {
        match closure {
            Closure::Direct => &self.counts_direct,
            Closure::Transitive => &self.counts_transitive,
        }
    }

    /// Annotation counts per tool without redundant annotations
    pub fn tool_counts_no_redundancy(&self) -> &ToolCountTable {
        &self.counts_no_redundancy
    }

    /// The annotations the metrics of `closure` are calculated from
    ///
    /// Direct metrics use the annotations without redundancy.
    pub fn metric_annotations(&self, kind: AnnotationKind, closure: Closure) -> &AnnotationTable {
        match closure {
            Closure::Direct => self.no_redundancy(kind),
            Closure::Transitive => self.annotations(kind, closure),
        }
    }

    /// Concept metrics from transitive or direct annotations
    pub fn concept_metrics(&self, kind: AnnotationKind, closure: Closure) -> &ConceptMetrics {
        match (kind, closure) {
            (AnnotationKind::Topic, Closure::Direct) => &self.topic_metrics_direct,
            (AnnotationKind::Topic, Closure::Transitive) => &self.topic_metrics,
            (AnnotationKind::Operation, Closure::Direct) => &self.operation_metrics_direct,
            (AnnotationKind::Operation, Closure::Transitive) => &self.operation_metrics,
        }
    }

    /// Tool metrics from transitive or direct annotations
    pub fn tool_metrics(&self, closure: Closure) -> &ToolMetricTable {
        match closure {
            Closure::Direct => &self.tool_metrics_direct,
            Closure::Transitive => &self.tool_metrics,
        }
    }
}

/// A directory that holds the materialized tables
///
/// # Examples
///
/// ```no_run
/// use edamannot::table::TableStore;
/// use edamannot::Ontology;
///
/// let ontology = Ontology::from_files("data/bioschemas.ttl", "data/EDAM.owl").unwrap();
/// let store = TableStore::new("Dataframe");
/// store.init(&ontology).unwrap();
///
/// // later, in another process
/// let tables = store.load_tables().unwrap();
/// println!("{} tools", tables.tools().len());
/// ```
#[derive(Debug, Clone)]
pub struct TableStore {
    dir: PathBuf,
}

impl TableStore {
    /// Creates a store for the given directory
    ///
    /// The directory is created on the first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// The cache directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the table file
    pub fn path(&self, name: TableName) -> PathBuf {
        self.dir.join(name.file_name())
    }

    /// Returns `true` if the table file exists
    pub fn exists(&self, name: TableName) -> bool {
        self.path(name).is_file()
    }

    /// Returns `true` if all core tables exist
    pub fn is_complete(&self) -> bool {
        TableName::CORE.iter().all(|name| self.exists(*name))
    }

    /// Writes a table, replacing an existing file
    ///
    /// # Errors
    ///
    /// [`EdamError::CannotOpenFile`] if the directory or file can't be written
    pub fn save<T: TsvTable + ?Sized>(&self, name: TableName, table: &T) -> EdamResult<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|err| EdamError::CannotOpenFile(format!("{}: {err}", self.dir.display())))?;
        write_gz(&self.path(name), table)?;
        info!("Saved {name}");
        Ok(())
    }

    /// Reads a table
    ///
    /// # Errors
    ///
    /// - [`EdamError::CannotOpenFile`] if the table was not materialized
    /// - [`EdamError::ParseTableError`] if the file is not a valid table
    pub fn load<T: TsvTable>(&self, name: TableName) -> EdamResult<T> {
        read_gz(&self.path(name))
    }

    /// Calculates all core tables and writes every table as soon as it is ready
    ///
    /// A failing step stops the process. The tables that were written before stay.
    ///
    /// # Errors
    ///
    /// See [`Tables::materialize`] and [`TableStore::save`]
    pub fn init(&self, ontology: &Ontology) -> EdamResult<Tables> {
        info!("Materializing tables into {}", self.dir.display());
        Tables::materialize(ontology, |name, table| self.save(name, table))
    }

    /// Writes the diagnostic tables
    ///
    /// # Errors
    ///
    /// See [`TableStore::save`]
    pub fn init_diagnostics(&self, ontology: &Ontology) -> EdamResult<()> {
        self.save(
            TableName::ToolTopicNotOwlClass,
            &ontology.undeclared_table(AnnotationKind::Topic),
        )?;
        self.save(
            TableName::ToolObsoleteOperation,
            &ontology.obsolete_operation_tools(),
        )
    }

    /// Loads all core tables
    ///
    /// # Errors
    ///
    /// See [`TableStore::load`]
    pub fn load_tables(&self) -> EdamResult<Tables> {
        let tables = Tables {
            tools: self.load(TableName::Tools)?,
            topics: self.load(TableName::annotations(AnnotationKind::Topic, Closure::Direct))?,
            topics_transitive: self.load(TableName::annotations(
                AnnotationKind::Topic,
                Closure::Transitive,
            ))?,
            operations: self.load(TableName::annotations(
                AnnotationKind::Operation,
                Closure::Direct,
            ))?,
            operations_transitive: self.load(TableName::annotations(
                AnnotationKind::Operation,
                Closure::Transitive,
            ))?,
            topic_redundancy: self.load(TableName::redundancy(AnnotationKind::Topic))?,
            operation_redundancy: self.load(TableName::redundancy(AnnotationKind::Operation))?,
            topics_no_redundancy: self.load(TableName::no_redundancy(AnnotationKind::Topic))?,
            operations_no_redundancy: self
                .load(TableName::no_redundancy(AnnotationKind::Operation))?,
            counts_transitive: self.load(TableName::ToolCountTransitive)?,
            counts_direct: self.load(TableName::ToolCountDirect)?,
            counts_no_redundancy: self.load(TableName::ToolCountNoRedundancy)?,
            topic_metrics: self.load(TableName::concept_metrics(
                AnnotationKind::Topic,
                Closure::Transitive,
            ))?,
            topic_metrics_direct: self.load(TableName::concept_metrics(
                AnnotationKind::Topic,
                Closure::Direct,
            ))?,
            operation_metrics: self.load(TableName::concept_metrics(
                AnnotationKind::Operation,
                Closure::Transitive,
            ))?,
            operation_metrics_direct: self.load(TableName::concept_metrics(
                AnnotationKind::Operation,
                Closure::Direct,
            ))?,
            tool_metrics: self.load(TableName::tool_metrics(Closure::Transitive))?,
            tool_metrics_direct: self.load(TableName::tool_metrics(Closure::Direct))?,
        };
        info!("Loaded tables from {}", self.dir.display());
        Ok(tables)
    }
}
