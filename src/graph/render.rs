use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;

use tracing::{debug, info};

use crate::graph::{AnnotationGraph, Node, NodeCategory};
use crate::{EdamError, EdamResult};

/// Name of the Graphviz layout program
const DOT_PROGRAM: &str = "dot";

/// Output formats of an [`AnnotationGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Graphviz source
    Dot,
    /// Rendered by Graphviz
    #[default]
    Svg,
    /// Rendered by Graphviz
    Png,
    /// Rendered by Graphviz
    Pdf,
    /// One line per node
    Csv,
    /// Mermaid flowchart
    Mermaid,
}

impl OutputFormat {
    /// File extension of the format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Dot => "dot",
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Csv => "csv",
            OutputFormat::Mermaid => "mmd",
        }
    }

    /// Returns `true` if the format requires the Graphviz `dot` program
    pub fn needs_renderer(&self) -> bool {
        matches!(self, OutputFormat::Svg | OutputFormat::Png | OutputFormat::Pdf)
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = EdamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" | "gv" => Ok(OutputFormat::Dot),
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            "csv" => Ok(OutputFormat::Csv),
            "mermaid" | "mmd" => Ok(OutputFormat::Mermaid),
            _ => Err(EdamError::InvalidInput(format!(
                "unknown output format `{s}`, expected one of dot, svg, png, pdf, csv, mermaid"
            ))),
        }
    }
}

fn quote(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{escaped}\"")
}

fn node_statement(node: &Node) -> String {
    let mut attributes = vec![
        ("label", node.label().to_string()),
        ("shape", node.category().shape().to_string()),
        ("style", node.style().to_string()),
        ("color", node.color().to_string()),
        ("fillcolor", node.fillcolor().to_string()),
        ("nodeType", node.category().name().to_string()),
    ];
    if let Some(penwidth) = node.penwidth() {
        attributes.push(("penwidth", penwidth.to_string()));
    }
    if node.is_highlighted() {
        attributes.push(("highlighted", "true".to_string()));
    }
    let attributes: Vec<String> = attributes
        .into_iter()
        .map(|(key, value)| format!("{key}={}", quote(&value)))
        .collect();
    format!("{} [{}]", quote(node.key()), attributes.join(", "))
}

/// Returns the Graphviz source of the graph
///
/// Concepts are drawn bottom to top, all tools share the same rank.
pub fn to_dot(graph: &AnnotationGraph) -> String {
    let mut dot = String::from("digraph {\n    rankdir=BT\n");
    dot.push_str("    subgraph cluster_tools {\n        rank=same\n        style=invis\n");
    for node in graph
        .nodes()
        .iter()
        .filter(|node| node.category() == NodeCategory::Tool)
    {
        dot.push_str(&format!("        {}\n", node_statement(node)));
    }
    dot.push_str("    }\n");
    for node in graph
        .nodes()
        .iter()
        .filter(|node| node.category() != NodeCategory::Tool)
    {
        dot.push_str(&format!("    {}\n", node_statement(node)));
    }
    for edge in graph.edges() {
        let attributes: Vec<String> = edge
            .category
            .attributes()
            .iter()
            .map(|(key, value)| format!("{key}={}", quote(value)))
            .collect();
        dot.push_str(&format!(
            "    {} -> {} [{}]\n",
            quote(&edge.from),
            quote(&edge.to),
            attributes.join(", ")
        ));
    }
    dot.push_str("}\n");
    dot
}

/// Returns the code of a Mermaid flowchart of the graph
pub fn to_mermaid(graph: &AnnotationGraph) -> String {
    let mut code = String::from("graph BT\n");
    for node in graph.nodes() {
        let label = node.label().replace('"', "'").replace('\n', "<br>");
        if node.category() == NodeCategory::Tool {
            code.push_str(&format!("{}([\"{}\"])\n", node.key(), label));
        } else {
            code.push_str(&format!("{}[\"{}\"]\n", node.key(), label));
        }
    }
    for edge in graph.edges() {
        let arrow = if edge.category.is_dotted() {
            "-.->"
        } else {
            "-->"
        };
        code.push_str(&format!("{} {} {}\n", edge.from, arrow, edge.to));
    }
    code
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Returns a CSV summary with one line per node
///
/// Columns: `node,label,nodeType,fillcolor,highlighted`
pub fn to_csv(graph: &AnnotationGraph) -> String {
    let mut csv = String::from("node,label,nodeType,fillcolor,highlighted\n");
    for node in graph.nodes() {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            csv_field(node.uri()),
            csv_field(&node.label().replace('\n', " ")),
            node.category().name(),
            node.fillcolor(),
            node.is_highlighted()
        ));
    }
    csv
}

fn run_dot(source: &str, format: OutputFormat) -> EdamResult<Vec<u8>> {
    debug!("Running {} -T{}", DOT_PROGRAM, format.extension());
    let mut child = Command::new(DOT_PROGRAM)
        .arg(format!("-T{}", format.extension()))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| EdamError::Renderer(format!("failed to start `{DOT_PROGRAM}`: {err}")))?;

    {
        let stdin = child
            .stdin
            .as_mut()
            .ok_or_else(|| EdamError::Renderer(format!("failed to open stdin of `{DOT_PROGRAM}`")))?;
        stdin
            .write_all(source.as_bytes())
            .map_err(|err| EdamError::Renderer(err.to_string()))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|err| EdamError::Renderer(err.to_string()))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(EdamError::Renderer(format!(
            "`{DOT_PROGRAM}` failed with exit code {:?}: {}",
            output.status.code(),
            stderr.trim()
        )));
    }
    Ok(output.stdout)
}

/// Renders the graph in the given format
///
/// SVG, PNG and PDF are rendered by the Graphviz `dot` program, which must be
/// available in `PATH`.
///
/// # Errors
///
/// [`EdamError::Renderer`] if `dot` is not available or fails
pub fn render(graph: &AnnotationGraph, format: OutputFormat) -> EdamResult<Vec<u8>> {
    match format {
        OutputFormat::Dot => Ok(to_dot(graph).into_bytes()),
        OutputFormat::Csv => Ok(to_csv(graph).into_bytes()),
        OutputFormat::Mermaid => Ok(to_mermaid(graph).into_bytes()),
        OutputFormat::Svg | OutputFormat::Png | OutputFormat::Pdf => {
            run_dot(&to_dot(graph), format)
        }
    }
}

/// Renders the graph and saves it as `{output}.{extension}`
///
/// Returns the path of the created file.
///
/// # Errors
///
/// - [`EdamError::Renderer`] if rendering fails
/// - [`EdamError::CannotOpenFile`] if the file can't be written
pub fn save<P: AsRef<Path>>(
    graph: &AnnotationGraph,
    output: P,
    format: OutputFormat,
) -> EdamResult<PathBuf> {
    let mut path = output.as_ref().as_os_str().to_owned();
    path.push(".");
    path.push(format.extension());
    let path = PathBuf::from(path);

    let content = render(graph, format)?;
    std::fs::write(&path, content)
        .map_err(|_| EdamError::CannotOpenFile(path.display().to_string()))?;
    info!("Saved graph as {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures::ontology;
    use crate::graph::{GraphBuilder, GraphOptions};
    use crate::ToolId;

    fn graph() -> AnnotationGraph {
        let ont = ontology();
        let options = GraphOptions {
            operations: false,
            deprecated: true,
            ..Default::default()
        };
        let mut builder = GraphBuilder::new(&ont, options);
        builder.add_tool(&ToolId::from_name("blast"));
        builder.build()
    }

    #[test]
    fn parse_format() {
        assert_eq!("SVG".parse::<OutputFormat>().unwrap(), OutputFormat::Svg);
        assert_eq!("mmd".parse::<OutputFormat>().unwrap(), OutputFormat::Mermaid);
        let err = "jpeg".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, EdamError::InvalidInput(_)));
        assert!(OutputFormat::Pdf.needs_renderer());
        assert!(!OutputFormat::Csv.needs_renderer());
    }

    #[test]
    fn dot_source() {
        let dot = to_dot(&graph());
        assert!(dot.starts_with("digraph {\n    rankdir=BT\n    subgraph cluster_tools {\n"));
        assert!(dot.contains(
            "        \"blast\" [label=\"BLAST\", shape=\"ellipse\", style=\"filled\", color=\"blue\""
        ));
        assert!(dot.contains("label=\"Sequence analysis\\n(topic_0080)\""));
        assert!(dot.contains("nodeType=\"TopicDeprecated\""));
        assert!(dot.contains(
            "    \"blast\" -> \"topic_0080\" [arrowhead=\"vee\", color=\"blue\", fontcolor=\"blue\", style=\"dashed\"]\n"
        ));
        assert!(dot.contains("    \"topic_0080\" -> \"topic_0003\" [arrowhead=\"onormal\"]\n"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn quoting() {
        assert_eq!(quote("a \"b\"\nc"), "\"a \\\"b\\\"\\nc\"");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("ab"), "ab");
    }

    #[test]
    fn mermaid() {
        let code = to_mermaid(&graph());
        assert!(code.starts_with("graph BT\n"));
        assert!(code.contains("blast([\"BLAST\"])\n"));
        assert!(code.contains("topic_0080 --> topic_0003\n"));
        assert!(code.contains("topic_0156 -.-> topic_0080\n"));
    }

    #[test]
    fn csv_summary() {
        let csv = to_csv(&graph());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "node,label,nodeType,fillcolor,highlighted");
        assert_eq!(lines[1], "https://bio.tools/blast,BLAST,Tool,#ffffff,false");
        // tool, 0080, 0003, 0156
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn save_text_formats() {
        let dir = tempfile::tempdir().unwrap();
        let path = save(&graph(), dir.path().join("blast"), OutputFormat::Dot).unwrap();
        assert_eq!(path, dir.path().join("blast.dot"));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("digraph {"));
    }
}
