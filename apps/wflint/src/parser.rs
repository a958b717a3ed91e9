//! Best-effort structural parser for workflow documents.
//!
//! Recovers a tree of mappings, sequences and scalars from indentation alone.
//! It understands block mappings, block sequences (including the compact form
//! where `- ` sits at the same column as its key), inline single-key mapping
//! items, quoted scalars and block-scalar indicators. Anchors, flow
//! collections and multi-document streams are not interpreted.
//!
//! Parsing never fails: lines that cannot be placed are skipped and the
//! partial tree built so far is returned. Raw-line rules in `rules::content`
//! cover anything a mis-parse could hide.

use crate::models::node::{Mapping, Node, Scalar};
use tracing::trace;

/// One step from a container to a child.
#[derive(Debug, Clone)]
enum Seg {
    Key(String),
    Index(usize),
}

/// An open scope: lines indented deeper than `indent` land in the container
/// at `path`. `key` is the most recent key written into that container.
#[derive(Debug)]
struct Frame {
    indent: isize,
    path: Vec<Seg>,
    key: Option<String>,
}

/// Parsed right-hand side of a `key: value` pair.
enum Value {
    Nested,
    Block,
    Scalar(Scalar),
}

/// Parse `text` into a tree rooted at a mapping.
pub fn parse(text: &str) -> Node {
    let mut root = Node::empty_mapping();
    let mut stack = vec![Frame {
        indent: -1,
        path: Vec::new(),
        key: None,
    }];
    // Column of the key that opened a block scalar; deeper lines are its body.
    let mut block: Option<isize> = None;

    for (idx, raw) in text.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let indent = indent_of(raw) as isize;
        if let Some(col) = block {
            if indent > col {
                continue;
            }
            block = None;
        }
        while stack.len() > 1 && stack.last().is_some_and(|f| f.indent >= indent) {
            stack.pop();
        }

        if let Some(rest) = sequence_item(trimmed) {
            let col = indent + (trimmed.len() - rest.len()) as isize;
            if !push_item(&mut root, &mut stack, indent, col, rest, &mut block) {
                trace!(line = idx + 1, "sequence item has no enclosing key");
            }
        } else if let Some((key, value)) = split_key_value(trimmed) {
            if !insert_pair(&mut root, &mut stack, indent, key, value, &mut block) {
                trace!(line = idx + 1, "key outside of a mapping");
            }
        } else {
            trace!(line = idx + 1, "skipping unrecognized line");
        }
    }
    root
}

/// Width of leading whitespace.
pub fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn sequence_item(trimmed: &str) -> Option<&str> {
    if trimmed == "-" {
        return Some("");
    }
    trimmed.strip_prefix("- ").map(str::trim_start)
}

fn node_mut<'a>(root: &'a mut Node, path: &[Seg]) -> Option<&'a mut Node> {
    path.iter().try_fold(root, |node, seg| match (node, seg) {
        (Node::Mapping(m), Seg::Key(k)) => m.get_mut(k),
        (Node::Sequence(s), Seg::Index(i)) => s.get_mut(*i),
        _ => None,
    })
}

fn ensure_sequence(node: &mut Node) -> &mut Vec<Node> {
    if !matches!(node, Node::Sequence(_)) {
        *node = Node::Sequence(Vec::new());
    }
    match node {
        Node::Sequence(items) => items,
        _ => unreachable!("node was converted to a sequence"),
    }
}

fn insert_pair(
    root: &mut Node,
    stack: &mut Vec<Frame>,
    indent: isize,
    key: String,
    value: Value,
    block: &mut Option<isize>,
) -> bool {
    let Some(frame) = stack.last_mut() else {
        return false;
    };
    let Some(Node::Mapping(map)) = node_mut(root, &frame.path) else {
        return false;
    };
    let opened = match value {
        Value::Nested => {
            map.insert(key.clone(), Node::empty_mapping());
            let mut path = frame.path.clone();
            path.push(Seg::Key(key.clone()));
            Some(Frame {
                indent,
                path,
                key: None,
            })
        }
        Value::Block => {
            map.insert(key.clone(), Node::str(""));
            *block = Some(indent);
            None
        }
        Value::Scalar(s) => {
            map.insert(key.clone(), Node::Scalar(s));
            None
        }
    };
    frame.key = Some(key);
    stack.extend(opened);
    true
}

/// Append a sequence item to the value of the nearest enclosing key.
///
/// `indent` is the column of the dash and `col` the column of the item text.
fn push_item(
    root: &mut Node,
    stack: &mut Vec<Frame>,
    indent: isize,
    col: isize,
    text: &str,
    block: &mut Option<isize>,
) -> bool {
    let Some(frame) = stack.last() else {
        return false;
    };
    let mut target = frame.path.clone();
    if let Some(k) = &frame.key {
        target.push(Seg::Key(k.clone()));
    }
    if target.is_empty() {
        return false;
    }
    let Some(node) = node_mut(root, &target) else {
        return false;
    };
    let items = ensure_sequence(node);
    let mut item_path = target;
    item_path.push(Seg::Index(items.len()));

    if text.is_empty() {
        items.push(Node::empty_mapping());
        stack.push(Frame {
            indent,
            path: item_path,
            key: None,
        });
        return true;
    }
    let Some((key, value)) = split_key_value(text) else {
        items.push(Node::Scalar(coerce(strip_comment(text).trim())));
        return true;
    };

    let mut map = Mapping::new();
    let nested = match value {
        Value::Nested => {
            map.insert(key.clone(), Node::empty_mapping());
            true
        }
        Value::Block => {
            map.insert(key.clone(), Node::str(""));
            *block = Some(col);
            false
        }
        Value::Scalar(s) => {
            map.insert(key.clone(), Node::Scalar(s));
            false
        }
    };
    items.push(Node::Mapping(map));
    if nested {
        let mut key_path = item_path.clone();
        key_path.push(Seg::Key(key.clone()));
        stack.push(Frame {
            indent,
            path: item_path,
            key: Some(key),
        });
        stack.push(Frame {
            indent: col,
            path: key_path,
            key: None,
        });
    } else {
        stack.push(Frame {
            indent,
            path: item_path,
            key: Some(key),
        });
    }
    true
}

/// Split `key: value`, returning the unquoted key and the parsed value.
fn split_key_value(text: &str) -> Option<(String, Value)> {
    let end = key_end(text)?;
    let key = strip_quotes(text[..end].trim());
    if key.is_empty() {
        return None;
    }
    let value = strip_comment(text[end + 1..].trim_start()).trim();
    let value = if value.is_empty() {
        Value::Nested
    } else if is_block_indicator(value) {
        Value::Block
    } else {
        Value::Scalar(coerce(value))
    };
    Some((key.to_string(), value))
}

/// Byte offset of the colon separating key from value.
///
/// The colon must be followed by whitespace or end the line. A quoted key is
/// skipped as a unit, and an unquoted ` #` ends the search.
fn key_end(text: &str) -> Option<usize> {
    let start = match text.chars().next() {
        Some(q @ ('"' | '\'')) => 1 + text[1..].find(q)? + 1,
        _ => 0,
    };
    let bytes = text.as_bytes();
    for i in start..bytes.len() {
        match bytes[i] {
            b'#' if i > 0 && bytes[i - 1].is_ascii_whitespace() => return None,
            b':' if bytes.get(i + 1).map_or(true, u8::is_ascii_whitespace) => return Some(i),
            _ => {}
        }
    }
    None
}

/// Split one raw line into its key and value text without building a tree.
///
/// A leading `- ` is ignored, quotes around key and value are removed and an
/// inline comment is dropped from the value.
pub fn key_value(line: &str) -> Option<(&str, &str)> {
    let text = line.trim();
    let text = sequence_item(text).unwrap_or(text);
    let end = key_end(text)?;
    let key = strip_quotes(text[..end].trim());
    let value = strip_quotes(strip_comment(text[end + 1..].trim_start()).trim());
    Some((key, value))
}

fn strip_comment(value: &str) -> &str {
    let bytes = value.as_bytes();
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate() {
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'"' | b'\'' if i == 0 => quote = Some(b),
                b'#' if i == 0 || bytes[i - 1].is_ascii_whitespace() => return &value[..i],
                _ => {}
            },
        }
    }
    value
}

fn is_quoted(s: &str) -> bool {
    s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
}

/// Remove one pair of matching surrounding quotes.
pub fn strip_quotes(s: &str) -> &str {
    if is_quoted(s) {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn is_block_indicator(v: &str) -> bool {
    let mut chars = v.chars();
    matches!(chars.next(), Some('|' | '>')) && chars.all(|c| matches!(c, '+' | '-' | '1'..='9'))
}

/// Coerce a value token. Quoted tokens always stay strings.
fn coerce(v: &str) -> Scalar {
    if is_quoted(v) {
        return Scalar::Str(strip_quotes(v).to_string());
    }
    match v {
        "true" => Scalar::Bool(true),
        "false" => Scalar::Bool(false),
        _ if v.bytes().all(|b| b.is_ascii_digit()) => v
            .parse()
            .map(Scalar::Int)
            .unwrap_or_else(|_| Scalar::Str(v.to_string())),
        _ => Scalar::Str(v.to_string()),
    }
}
