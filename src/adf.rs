//! Conversions between plain text and Atlassian Document Format (ADF).
//!
//! Jira Cloud's v3 API stores descriptions and comments as ADF trees. We only
//! need to write simple prose, but reading has to cope with whatever the web
//! editor produced, so rendering walks the full node vocabulary and falls back
//! to child text for anything unknown.

use serde_json::{json, Value};

/// Build an ADF document from plain text.
///
/// Blank lines separate paragraphs; single newlines become hard breaks.
pub fn from_text(text: &str) -> Value {
    let normalized = text.replace("\r\n", "\n");
    let content: Vec<Value> = normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(paragraph)
        .collect();

    json!({
        "type": "doc",
        "version": 1,
        "content": content,
    })
}

fn paragraph(block: &str) -> Value {
    let mut inline = Vec::new();
    for (i, line) in block.lines().enumerate() {
        if i > 0 {
            inline.push(json!({ "type": "hardBreak" }));
        }
        if !line.is_empty() {
            inline.push(json!({ "type": "text", "text": line }));
        }
    }
    json!({ "type": "paragraph", "content": inline })
}

/// Render an ADF document (or any ADF node) as plain text.
pub fn to_text(node: &Value) -> String {
    let mut out = String::new();
    render_block(node, &mut out, "");
    out.trim_end().to_string()
}

fn children(node: &Value) -> &[Value] {
    node.get("content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn node_type(node: &Value) -> &str {
    node.get("type").and_then(Value::as_str).unwrap_or("")
}

fn attr<'a>(node: &'a Value, name: &str) -> Option<&'a Value> {
    node.get("attrs").and_then(|attrs| attrs.get(name))
}

/// Block-level rendering. `indent` prefixes every emitted line.
fn render_block(node: &Value, out: &mut String, indent: &str) {
    match node_type(node) {
        "doc" => {
            for child in children(node) {
                render_block(child, out, indent);
            }
        }
        "paragraph" => {
            push_lines(out, indent, &inline_text(node));
            out.push('\n');
        }
        "heading" => {
            let level = attr(node, "level").and_then(Value::as_u64).unwrap_or(1) as usize;
            let text = format!("{} {}", "#".repeat(level.clamp(1, 6)), inline_text(node));
            push_lines(out, indent, &text);
            out.push('\n');
        }
        "bulletList" => {
            render_list(node, out, indent, |_| "- ".to_string());
        }
        "orderedList" => {
            let start = attr(node, "order").and_then(Value::as_u64).unwrap_or(1);
            render_list(node, out, indent, |i| {
                format!("{}. ", start.saturating_add(i as u64))
            });
        }
        "codeBlock" => {
            let language = attr(node, "language").and_then(Value::as_str).unwrap_or("");
            push_lines(out, indent, &format!("```{language}"));
            push_lines(out, indent, &inline_text(node));
            push_lines(out, indent, "```");
            out.push('\n');
        }
        "blockquote" => {
            let mut inner = String::new();
            for child in children(node) {
                render_block(child, &mut inner, "");
            }
            push_lines(out, &format!("{indent}> "), inner.trim_end());
            out.push('\n');
        }
        "rule" => {
            push_lines(out, indent, "---");
            out.push('\n');
        }
        "panel" | "expand" | "nestedExpand" | "layoutSection" | "layoutColumn" | "listItem"
        | "tableCell" | "tableHeader" => {
            for child in children(node) {
                render_block(child, out, indent);
            }
        }
        "table" => {
            for row in children(node) {
                let cells: Vec<String> = children(row)
                    .iter()
                    .map(|cell| {
                        let mut text = String::new();
                        render_block(cell, &mut text, "");
                        text.split_whitespace().collect::<Vec<_>>().join(" ")
                    })
                    .collect();
                push_lines(out, indent, &format!("| {} |", cells.join(" | ")));
            }
            out.push('\n');
        }
        "mediaSingle" | "mediaGroup" => {
            push_lines(out, indent, "[attachment]");
            out.push('\n');
        }
        _ => {
            let text = inline_text(node);
            if !text.is_empty() {
                push_lines(out, indent, &text);
                out.push('\n');
            }
        }
    }
}

fn render_list(node: &Value, out: &mut String, indent: &str, marker: impl Fn(usize) -> String) {
    for (i, item) in children(node).iter().enumerate() {
        let mut inner = String::new();
        render_block(item, &mut inner, "");
        let inner = collapse_blank_lines(inner.trim_end());

        let marker = marker(i);
        let continuation = " ".repeat(marker.len());
        for (j, line) in inner.lines().enumerate() {
            let prefix = if j == 0 { &marker } else { &continuation };
            out.push_str(indent);
            out.push_str(prefix);
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push('\n');
}

fn collapse_blank_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_lines(out: &mut String, indent: &str, text: &str) {
    for line in text.split('\n') {
        out.push_str(indent);
        out.push_str(line);
        out.push('\n');
    }
}

/// Concatenate inline content of a node.
fn inline_text(node: &Value) -> String {
    let mut out = String::new();
    for child in children(node) {
        push_inline(child, &mut out);
    }
    out
}

fn push_inline(node: &Value, out: &mut String) {
    match node_type(node) {
        "text" => {
            let text = node.get("text").and_then(Value::as_str).unwrap_or("");
            let href = node
                .get("marks")
                .and_then(Value::as_array)
                .and_then(|marks| {
                    marks
                        .iter()
                        .find(|m| node_type(m) == "link")
                        .and_then(|m| attr(m, "href"))
                        .and_then(Value::as_str)
                });
            match href {
                Some(href) if href != text => out.push_str(&format!("{text} ({href})")),
                _ => out.push_str(text),
            }
        }
        "hardBreak" => out.push('\n'),
        "mention" => {
            let name = attr(node, "text").and_then(Value::as_str).unwrap_or("@unknown");
            if name.starts_with('@') {
                out.push_str(name);
            } else {
                out.push('@');
                out.push_str(name);
            }
        }
        "emoji" => {
            let text = attr(node, "text")
                .or_else(|| attr(node, "shortName"))
                .and_then(Value::as_str)
                .unwrap_or("");
            out.push_str(text);
        }
        "inlineCard" | "blockCard" => {
            if let Some(url) = attr(node, "url").and_then(Value::as_str) {
                out.push_str(url);
            }
        }
        "status" | "date" => {
            if let Some(text) = attr(node, "text").and_then(Value::as_str) {
                out.push_str(text);
            }
        }
        _ => {
            for child in children(node) {
                push_inline(child, out);
            }
        }
    }
}
