// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Result rendering for `--json` and human output.

use serde_json::Value;

use crate::config::OutputFormat;

const INDENT: usize = 2;

/// Render a report body in the requested format.
pub fn render(body: &Value, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(body),
        OutputFormat::Human => Ok(render_human(body)),
    }
}

/// Indented `key: value` lines, `- item` for lists.
fn render_human(body: &Value) -> String {
    let mut out = String::new();
    match body {
        Value::Object(_) | Value::Array(_) => write_nested(body, 0, &mut out),
        scalar => out.push_str(&scalar_text(scalar)),
    }
    out.trim_end().to_string()
}

fn write_nested(value: &Value, depth: usize, out: &mut String) {
    let pad = " ".repeat(depth * INDENT);
    match value {
        Value::Object(map) => {
            for (key, item) in map {
                match inline_text(item) {
                    Some(text) => out.push_str(&format!("{pad}{key}: {text}\n")),
                    None => {
                        out.push_str(&format!("{pad}{key}:\n"));
                        write_nested(item, depth + 1, out);
                    }
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                match inline_text(item) {
                    Some(text) => out.push_str(&format!("{pad}- {text}\n")),
                    None => {
                        out.push_str(&format!("{pad}-\n"));
                        write_nested(item, depth + 1, out);
                    }
                }
            }
        }
        scalar => out.push_str(&format!("{pad}{}\n", scalar_text(scalar))),
    }
}

/// Text for values printed on the same line as their key.
fn inline_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) if map.is_empty() => Some("{}".to_string()),
        Value::Array(items) if items.is_empty() => Some("[]".to_string()),
        Value::Object(_) | Value::Array(_) => None,
        scalar => Some(scalar_text(scalar)),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_output_is_pretty_json() {
        let body = json!({"ok": true});
        assert_eq!(
            render(&body, OutputFormat::Json).unwrap(),
            "{\n  \"ok\": true\n}"
        );
    }

    #[test]
    fn human_output_nests_objects_and_lists() {
        // Keys in sorted order so the expectation holds with or without
        // serde_json's `preserve_order`.
        let body = json!({
            "address": "45R2pfjQUW2s9PQRHU48HQKLKHVMaDja7N3wpBtmF28UYDs2",
            "empty": {},
            "head": {"hash": "0xab", "number": 12},
            "none": null,
            "peers": [1, {"id": "x"}],
        });

        let text = render(&body, OutputFormat::Human).unwrap();
        let expected = "\
address: 45R2pfjQUW2s9PQRHU48HQKLKHVMaDja7N3wpBtmF28UYDs2
empty: {}
head:
  hash: 0xab
  number: 12
none: null
peers:
  - 1
  -
    id: x";
        assert_eq!(text, expected);
    }

    #[test]
    fn human_output_of_scalars_is_bare() {
        assert_eq!(render(&json!("hello"), OutputFormat::Human).unwrap(), "hello");
        assert_eq!(render(&json!(42), OutputFormat::Human).unwrap(), "42");
    }
}
