//! Renders a [`Body`] as canonically formatted HCL text.
//!
//! Expressions are formatted by `hcl-rs`; this module only lays out bodies:
//! indentation, blank lines, and `=` alignment over runs of attributes.

use hcl::{
    Expression,
    format::{Format, Formatter},
};

use crate::{
    body::{Attribute, Block, Body, Element},
    error::Result,
};

const INDENT: &str = "  ";

/// Writes `body` at nesting `depth`.
///
/// Consecutive attributes have their `=` aligned; a block or a blank line
/// ends the run.
pub(crate) fn write_body(out: &mut String, body: &Body, depth: usize) -> Result<()> {
    let elements = body.elements();
    let mut i = 0;

    while i < elements.len() {
        match &elements[i] {
            Element::Attribute(_) => {
                let end = elements[i..]
                    .iter()
                    .position(|e| !matches!(e, Element::Attribute(_)))
                    .map_or(elements.len(), |offset| i + offset);
                let run: Vec<&Attribute> = elements[i..end]
                    .iter()
                    .filter_map(|e| match e {
                        Element::Attribute(a) => Some(a),
                        _ => None,
                    })
                    .collect();
                let width = run.iter().map(|a| a.key.chars().count()).max().unwrap_or(0);
                for attribute in run {
                    write_attribute(out, attribute, depth, width)?;
                }
                i = end;
            }
            Element::Block(block) => {
                write_block(out, block, depth)?;
                i += 1;
            }
            Element::Newline => {
                out.push('\n');
                i += 1;
            }
        }
    }

    Ok(())
}

fn write_attribute(out: &mut String, attribute: &Attribute, depth: usize, width: usize) -> Result<()> {
    indent(out, depth);
    out.push_str(&attribute.key);
    for _ in attribute.key.chars().count()..width {
        out.push(' ');
    }
    out.push_str(" = ");

    let text = format_expression(&attribute.expr)?;
    match &attribute.expr {
        // Heredoc bodies and their closing delimiter stay flat.
        Expression::TemplateExpr(_) => out.push_str(&text),
        _ => {
            for (n, line) in text.split('\n').enumerate() {
                if n > 0 {
                    out.push('\n');
                    indent(out, depth);
                }
                out.push_str(line);
            }
        }
    }

    out.push('\n');
    Ok(())
}

fn write_block(out: &mut String, block: &Block, depth: usize) -> Result<()> {
    indent(out, depth);
    out.push_str(&block.ident);
    for label in &block.labels {
        out.push(' ');
        out.push_str(&format_expression(&Expression::String(label.clone()))?);
    }
    out.push_str(" {\n");
    write_body(out, &block.body, depth + 1)?;
    indent(out, depth);
    out.push_str("}\n");
    Ok(())
}

/// Formats one expression starting at column zero.
///
/// Lists stay on one line; object keys that are identifiers are written bare.
fn format_expression(expr: &Expression) -> Result<String> {
    let mut fmt = Formatter::builder()
        .compact_arrays(true)
        .prefer_ident_keys(true)
        .build_vec();
    Ok(expr.format_string(&mut fmt)?)
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use indoc::indoc;

    use super::*;
    use crate::{emit::expression, value::Value};

    fn render(body: &Body) -> String {
        let mut out = String::new();
        write_body(&mut out, body, 0).unwrap();
        out
    }

    #[test]
    fn aligns_consecutive_attributes() {
        let mut body = Body::new();
        let job = body.append_block("job", vec!["mysql".to_string()]);
        job.push_attribute("region", expression(Value::from("eu")));
        job.push_attribute("all_at_once", expression(Value::Bool(true)));
        job.append_newline();
        job.append_block("meta", vec![])
            .push_attribute("hi", expression(Value::from("there")));
        job.push_attribute("priority", expression(Value::Integer(50)));

        assert_eq!(
            render(&body),
            indoc! {r#"
                job "mysql" {
                  region      = "eu"
                  all_at_once = true

                  meta {
                    hi = "there"
                  }
                  priority = 50
                }
            "#}
        );
    }

    #[test]
    fn heredocs_stay_flat() {
        let mut body = Body::new();
        body.append_block("group", vec![])
            .append_block("template", vec![])
            .push_attribute("data", expression(Value::from("line one\nline two")));

        assert_eq!(
            render(&body),
            "group {\n  template {\n    data = <<HEREDOC\nline one\nline two\nHEREDOC\n  }\n}\n"
        );
    }

    #[test]
    fn empty_blocks_keep_their_braces() {
        let mut body = Body::new();
        body.append_block("sidecar_service", vec![]);
        assert_eq!(render(&body), "sidecar_service {\n}\n");
    }

    #[test]
    fn labels_are_escaped() {
        let mut body = Body::new();
        body.append_block("group", vec![r#"a "b""#.to_string()]);
        assert_eq!(render(&body), "group \"a \\\"b\\\"\" {\n}\n");
    }

    #[test]
    fn nested_values_are_indented_with_their_attribute() {
        let mut logging = BTreeMap::new();
        logging.insert("tag-name".to_string(), Value::from("web"));

        let mut body = Body::new();
        let config = body
            .append_block("task", vec![])
            .append_block("config", vec![]);
        config.push_attribute(
            "ports",
            expression(Value::List(vec![Value::from("http"), Value::from("a\"b")])),
        );
        config.push_attribute("logging", expression(Value::Map(logging)));

        assert_eq!(
            render(&body),
            indoc! {r#"
                task {
                  config {
                    ports   = ["http", "a\"b"]
                    logging = {
                      tag-name = "web"
                    }
                  }
                }
            "#}
        );
    }
}
