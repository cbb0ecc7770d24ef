//! Runtime configuration
//!
//! The configuration is read from an optional TOML file. Every field has a
//! default, so a file only needs to contain the values that differ:
//!
//! ```toml
//! endpoint = "http://localhost:3030/biotoolsEdam/query"
//! cache_dir = "Dataframe/"
//! timeout_secs = 120
//!
//! # load RDF dumps instead of querying the endpoint
//! bioschemas_file = "data/bioschemas-dump.ttl"
//! edam_file = "data/EDAM.owl"
//! ```
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sparql::{SparqlEndpoint, DEFAULT_ENDPOINT};
use crate::table::TableStore;
use crate::{EdamError, EdamResult, Ontology};

/// Where the bio.tools and EDAM data come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Local RDF dumps
    Files {
        /// bio.tools Bioschemas dump
        bioschemas: PathBuf,
        /// EDAM ontology
        edam: PathBuf,
    },
    /// A SPARQL endpoint that holds both
    Endpoint(String),
}

/// Settings of the `edamannot` tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL of the SPARQL endpoint
    pub endpoint: String,
    /// bio.tools Bioschemas dump, used instead of the endpoint together with `edam_file`
    pub bioschemas_file: Option<PathBuf>,
    /// EDAM ontology file, used instead of the endpoint together with `bioschemas_file`
    pub edam_file: Option<PathBuf>,
    /// Directory of the materialized tables
    pub cache_dir: PathBuf,
    /// Timeout of a single SPARQL request
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            bioschemas_file: None,
            edam_file: None,
            cache_dir: PathBuf::from("Dataframe/"),
            timeout_secs: 120,
        }
    }
}

impl Config {
    /// Reads the configuration from a TOML file
    ///
    /// # Errors
    ///
    /// - The file can't be read: [`EdamError::CannotOpenFile`]
    /// - The file is not valid TOML: [`EdamError::InvalidInput`]
    pub fn load<P: AsRef<Path>>(path: P) -> EdamResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| EdamError::CannotOpenFile(path.display().to_string()))?;
        let config: Self = toml::from_str(&content)
            .map_err(|err| EdamError::InvalidInput(format!("{}: {err}", path.display())))?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Writes the configuration as TOML file
    ///
    /// # Errors
    ///
    /// [`EdamError::CannotOpenFile`] if the file can't be written
    pub fn save<P: AsRef<Path>>(&self, path: P) -> EdamResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|err| EdamError::InvalidInput(err.to_string()))?;
        std::fs::write(path, content)
            .map_err(|_| EdamError::CannotOpenFile(path.display().to_string()))
    }

    /// Local files if both are configured, the endpoint otherwise
    pub fn source(&self) -> DataSource {
        match (&self.bioschemas_file, &self.edam_file) {
            (Some(bioschemas), Some(edam)) => DataSource::Files {
                bioschemas: bioschemas.clone(),
                edam: edam.clone(),
            },
            _ => DataSource::Endpoint(self.endpoint.clone()),
        }
    }

    /// Timeout of a single SPARQL request
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Loads the [`Ontology`] from the configured source
    ///
    /// # Errors
    ///
    /// See [`Ontology::from_files`] and [`Ontology::from_endpoint`]
    pub fn load_ontology(&self) -> EdamResult<Ontology> {
        match self.source() {
            DataSource::Files { bioschemas, edam } => Ontology::from_files(bioschemas, edam),
            DataSource::Endpoint(url) => {
                let endpoint = SparqlEndpoint::with_timeout(&url, self.timeout())?;
                Ontology::from_endpoint(&endpoint)
            }
        }
    }

    /// The store of the materialized tables
    pub fn table_store(&self) -> TableStore {
        TableStore::new(&self.cache_dir)
    }
}
