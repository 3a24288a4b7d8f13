//! Loader for the `Graph { ... }` text format.

use crate::builder::{BuildError, TopologyBuilder};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use stp_types::{Topology, TopologyError, Weight};
use tracing::debug;

/// Errors from parsing topology text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No `Graph` block in the input.
    #[error("no 'Graph {{' block found")]
    MissingGraph,

    /// A `Graph` block was opened but never closed.
    #[error("line {line}: 'Graph' block is never closed")]
    Unterminated { line: usize },

    /// A line inside the block is neither a node nor a link declaration.
    #[error("line {line}: malformed declaration '{content}'")]
    Malformed { line: usize, content: String },

    /// A node name does not start with a letter or has other characters than
    /// letters, digits and `_`.
    #[error("line {line}: invalid node name '{name}'")]
    InvalidName { line: usize, name: String },

    /// An id or weight is not a non-negative integer.
    #[error("line {line}: '{value}' is not a non-negative integer")]
    InvalidNumber { line: usize, value: String },

    /// A link references a node that has not been declared above it.
    #[error("line {line}: link references undeclared node '{name}'")]
    UndeclaredNode { line: usize, name: String },

    /// The declaration is well-formed but conflicts with an earlier one.
    #[error("line {line}: {source}")]
    Topology {
        line: usize,
        #[source]
        source: TopologyError,
    },
}

/// Errors from loading a topology file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read topology file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid topology file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Read and parse a topology file.
pub fn load_topology(path: impl AsRef<Path>) -> Result<Topology, LoadError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_topology(&contents).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse topology text.
pub fn parse_topology(input: &str) -> Result<Topology, ParseError> {
    let mut builder = TopologyBuilder::new();
    let mut open_block: Option<usize> = None;
    let mut seen_block = false;

    for (i, raw) in input.lines().enumerate() {
        let line = i + 1;
        let content = strip_comment(raw).trim();

        if open_block.is_none() {
            if let Some(rest) = content.strip_prefix("Graph") {
                let rest = rest.trim();
                if !(rest.is_empty() || rest == "{") {
                    return Err(ParseError::Malformed {
                        line,
                        content: content.to_string(),
                    });
                }
                open_block = Some(line);
                seen_block = true;
            }
            continue;
        }

        match content {
            "" | "{" => {}
            "}" => open_block = None,
            _ => parse_declaration(&mut builder, content, line)?,
        }
    }

    if let Some(line) = open_block {
        return Err(ParseError::Unterminated { line });
    }
    if !seen_block {
        return Err(ParseError::MissingGraph);
    }

    let topology = builder.finish();
    debug!(
        nodes = topology.len(),
        links = topology.links().len(),
        "Topology parsed"
    );
    Ok(topology)
}

/// Render a topology back into the text format.
///
/// Unnamed nodes are written as `N<id>`.
pub fn render_topology(topology: &Topology) -> String {
    let name_of = |index: usize| {
        let node = &topology.nodes()[index];
        node.name.clone().unwrap_or_else(|| format!("N{}", node.id))
    };

    let mut out = String::from("Graph {\n");
    for i in 0..topology.len() {
        let _ = writeln!(out, "    {} = {};", name_of(i), topology.nodes()[i].id);
    }
    for link in topology.links() {
        let _ = writeln!(
            out,
            "    {}-{}: {};",
            name_of(link.a.as_usize()),
            name_of(link.b.as_usize()),
            link.weight
        );
    }
    out.push_str("}\n");
    out
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_declaration(
    builder: &mut TopologyBuilder,
    content: &str,
    line: usize,
) -> Result<(), ParseError> {
    let malformed = || ParseError::Malformed {
        line,
        content: content.to_string(),
    };

    let statement = content.strip_suffix(';').ok_or_else(malformed)?.trim();

    if let Some((name, id)) = statement.split_once('=') {
        let name = parse_name(name, line)?;
        let id = parse_number(id, line)?;
        builder
            .declare(name, id)
            .map_err(|e| build_error(e, line))?;
        return Ok(());
    }

    if let Some((pair, weight)) = statement.split_once(':') {
        let (a, b) = pair.split_once('-').ok_or_else(malformed)?;
        let a = parse_name(a, line)?;
        let b = parse_name(b, line)?;
        let weight: Weight = parse_number(weight, line)?;
        builder
            .connect(a, b, weight)
            .map_err(|e| build_error(e, line))?;
        return Ok(());
    }

    Err(malformed())
}

fn parse_name(raw: &str, line: usize) -> Result<&str, ParseError> {
    let name = raw.trim();
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(ParseError::InvalidName {
            line,
            name: name.to_string(),
        })
    }
}

fn parse_number(raw: &str, line: usize) -> Result<u64, ParseError> {
    let value = raw.trim();
    value.parse::<u64>().map_err(|_| ParseError::InvalidNumber {
        line,
        value: value.to_string(),
    })
}

fn build_error(err: BuildError, line: usize) -> ParseError {
    match err {
        BuildError::UndeclaredNode { name } => ParseError::UndeclaredNode { line, name },
        BuildError::Topology(source) => ParseError::Topology { line, source },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stp_types::NodeId;

    #[test]
    fn test_parse_minimal_block() {
        let topology = parse_topology("Graph {\n  A = 2;\n  B = 1;\n  A-B: 7;\n}\n").unwrap();
        assert_eq!(topology.len(), 2);
        assert_eq!(topology.nodes()[0].name.as_deref(), Some("A"));
        assert_eq!(topology.nodes()[1].id, NodeId(1));
        assert_eq!(topology.links()[0].weight, 7);
    }

    #[test]
    fn test_whitespace_comments_and_outer_lines() {
        let input = "preamble text\nGraph\n{\n  // nodes\n  A=2;   \n\n  B  =  1 ; // trailing\n  A - B :3;\n}\nepilogue";
        let topology = parse_topology(input).unwrap();
        assert_eq!(topology.len(), 2);
        assert_eq!(topology.links()[0].weight, 3);
    }

    #[test]
    fn test_missing_and_unterminated_block() {
        assert_eq!(parse_topology("A = 1;"), Err(ParseError::MissingGraph));
        assert_eq!(
            parse_topology("x\nGraph {\n A = 1;\n"),
            Err(ParseError::Unterminated { line: 2 })
        );
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let err = parse_topology("Graph {\n A = 1;\n A B 3\n}").unwrap_err();
        assert_eq!(
            err,
            ParseError::Malformed {
                line: 3,
                content: "A B 3".into()
            }
        );
        assert!(err.to_string().starts_with("line 3:"));
    }

    #[test]
    fn test_invalid_numbers_and_names() {
        assert_eq!(
            parse_topology("Graph {\n A = x;\n}"),
            Err(ParseError::InvalidNumber {
                line: 2,
                value: "x".into()
            })
        );
        assert_eq!(
            parse_topology("Graph {\n A = 1;\n B = 2;\n A-B: -4;\n}"),
            Err(ParseError::InvalidNumber {
                line: 4,
                value: "-4".into()
            })
        );
        assert_eq!(
            parse_topology("Graph {\n 1A = 1;\n}"),
            Err(ParseError::InvalidName {
                line: 2,
                name: "1A".into()
            })
        );
    }

    #[test]
    fn test_link_before_declaration_is_rejected() {
        let err = parse_topology("Graph {\n A = 1;\n A-B: 2;\n B = 2;\n}").unwrap_err();
        assert_eq!(
            err,
            ParseError::UndeclaredNode {
                line: 3,
                name: "B".into()
            }
        );
    }

    #[test]
    fn test_conflicting_declarations() {
        let err = parse_topology("Graph {\n A = 1;\n B = 1;\n}").unwrap_err();
        assert_eq!(
            err,
            ParseError::Topology {
                line: 3,
                source: TopologyError::DuplicateId { id: NodeId(1) }
            }
        );
        let err = parse_topology("Graph {\n A = 1;\n A-A: 1;\n}").unwrap_err();
        assert!(matches!(err, ParseError::Topology { line: 3, .. }));
    }

    #[test]
    fn test_render_then_parse() {
        let input = "Graph {\n    A = 5;\n    B = 1;\n    C = 3;\n    A-B: 10;\n    B-C: 0;\n}\n";
        let topology = parse_topology(input).unwrap();
        assert_eq!(render_topology(&topology), input);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_topology("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
