//! Client for SPARQL endpoints that hold bio.tools and EDAM
//!
//! Only `SELECT` queries are supported. Results are requested as
//! `application/sparql-results+json` and parsed into a [`ResultSet`].
use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{EdamError, EdamResult};

pub mod templates;

/// Default endpoint of a local Fuseki server
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3030/biotoolsEdam/query";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const RESULTS_JSON: &str = "application/sparql-results+json";

/// Anything that answers SPARQL `SELECT` queries
///
/// Implemented by [`SparqlEndpoint`]. The loaders only depend on this trait,
/// so they can be used with other query services as well.
pub trait Select {
    /// Runs the query and returns all result rows
    ///
    /// # Errors
    ///
    /// [`EdamError::Endpoint`] if the query fails or returns malformed results
    fn select(&self, query: &str) -> EdamResult<ResultSet>;
}

/// A remote SPARQL endpoint
///
/// # Examples
///
/// ```no_run
/// use edamannot::sparql::{templates, Select, SparqlEndpoint};
///
/// let endpoint = SparqlEndpoint::new("http://localhost:3030/biotoolsEdam/query").unwrap();
/// let results = endpoint.select(&templates::tool_count()).unwrap();
/// println!("{:?}", results.rows()[0].get("nbTools"));
/// ```
#[derive(Debug, Clone)]
pub struct SparqlEndpoint {
    url: String,
    client: Client,
}

impl SparqlEndpoint {
    /// Creates a client for the endpoint with the default timeout
    ///
    /// # Errors
    ///
    /// [`EdamError::Endpoint`] if the HTTP client can't be created
    pub fn new(url: &str) -> EdamResult<Self> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    /// Creates a client for the endpoint with a custom request timeout
    ///
    /// # Errors
    ///
    /// [`EdamError::Endpoint`] if the HTTP client can't be created
    pub fn with_timeout(url: &str, timeout: Duration) -> EdamResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    /// The URL of the endpoint
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Select for SparqlEndpoint {
    fn select(&self, query: &str) -> EdamResult<ResultSet> {
        debug!("Querying {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::ACCEPT, RESULTS_JSON)
            .form(&[("query", query)])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(EdamError::Endpoint(format!(
                "{} returned {}: {}",
                self.url,
                status.as_u16(),
                message.trim()
            )));
        }
        let body = response.text()?;
        let results = ResultSet::from_json(&body)?;
        debug!("Received {} rows", results.len());
        Ok(results)
    }
}

#[derive(Deserialize)]
struct Response {
    head: Head,
    results: Results,
}

#[derive(Deserialize)]
struct Head {
    #[serde(default)]
    vars: Vec<String>,
}

#[derive(Deserialize)]
struct Results {
    bindings: Vec<HashMap<String, Binding>>,
}

/// A single value of a result row
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Binding {
    /// `uri`, `literal`, `typed-literal` or `bnode`
    #[serde(rename = "type")]
    pub kind: String,
    /// The IRI or the lexical form of a literal
    pub value: String,
}

impl Binding {
    /// Returns `true` if the value is an IRI
    pub fn is_iri(&self) -> bool {
        self.kind == "uri"
    }
}

/// A row of a [`ResultSet`], variables without a value are missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    bindings: HashMap<String, Binding>,
}

impl Row {
    /// Returns the value of the variable
    pub fn get(&self, var: &str) -> Option<&str> {
        self.bindings.get(var).map(|binding| binding.value.as_str())
    }

    /// Returns the binding of the variable, including its type
    pub fn binding(&self, var: &str) -> Option<&Binding> {
        self.bindings.get(var)
    }

    /// Returns the value of a variable that must be bound
    ///
    /// # Errors
    ///
    /// [`EdamError::Endpoint`] if the variable is not bound
    pub fn require(&self, var: &str) -> EdamResult<&str> {
        self.get(var)
            .ok_or_else(|| EdamError::Endpoint(format!("missing variable `{var}` in result row")))
    }
}

/// The rows of a `SELECT` query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    vars: Vec<String>,
    rows: Vec<Row>,
}

impl ResultSet {
    /// Parses SPARQL 1.1 query results in JSON format
    ///
    /// # Errors
    ///
    /// [`EdamError::Endpoint`] if the document is not valid
    ///
    /// # Examples
    ///
    /// ```
    /// use edamannot::sparql::ResultSet;
    ///
    /// let json = r#"{
    ///     "head": {"vars": ["tool", "toolLabel"]},
    ///     "results": {"bindings": [
    ///         {"tool": {"type": "uri", "value": "https://bio.tools/star"},
    ///          "toolLabel": {"type": "literal", "value": "STAR"}}
    ///     ]}
    /// }"#;
    /// let results = ResultSet::from_json(json).unwrap();
    /// assert_eq!(results.len(), 1);
    /// assert_eq!(results.rows()[0].get("toolLabel"), Some("STAR"));
    /// ```
    pub fn from_json(json: &str) -> EdamResult<Self> {
        let response: Response = serde_json::from_str(json)
            .map_err(|err| EdamError::Endpoint(format!("malformed query results: {err}")))?;
        Ok(Self {
            vars: response.head.vars,
            rows: response
                .results
                .bindings
                .into_iter()
                .map(|bindings| Row { bindings })
                .collect(),
        })
    }

    /// The selected variables
    pub fn vars(&self) -> &[String] {
        &self.vars
    }

    /// All rows
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;
    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
