//! Turns resolved scalars into attribute expressions.

use hcl::{
    Expression, Identifier, Number, ObjectKey,
    expr::{Heredoc, RawExpression, TemplateExpr},
};

use crate::{body::Body, value::Value};

/// Delimiter of the heredocs multi-line strings are written as.
pub const HEREDOC_DELIMITER: &str = "HEREDOC";

/// Appends `key = value` to `body`.
///
/// Strings spanning several lines become heredocs. Their content is written
/// flat: indenting it would need the nesting depth threaded through every
/// call. Single-line strings are quoted with only `"` escaped, so
/// `${...}` interpolations reach the scheduler untouched.
pub fn set_attribute(body: &mut Body, key: &str, value: Value) {
    log::trace!("Setting attribute {key}");
    body.push_attribute(key, expression(value));
}

/// The expression a resolved scalar is written as.
pub fn expression(value: Value) -> Expression {
    match value {
        Value::String(s) if s.contains('\n') => heredoc(s),
        Value::String(s) => {
            Expression::Raw(RawExpression::new(format!("\"{}\"", s.replace('"', "\\\""))))
        }
        other => nested(other),
    }
}

/// The expression for a value inside a list or object, or any non-string value.
///
/// Strings here are literals: the formatter escapes quotes, backslashes,
/// control characters and `${`/`%{` markers.
pub fn nested(value: Value) -> Expression {
    match value {
        Value::Null => Expression::Null,
        Value::Bool(b) => Expression::Bool(b),
        Value::Integer(n) => integer(n),
        Value::Float(f) => match Number::from_f64(f) {
            Some(n) => Expression::Number(n),
            None => {
                log::debug!("Writing non-finite float {f} as null");
                Expression::Null
            }
        },
        Value::String(s) => Expression::String(s),
        Value::List(items) => Expression::Array(items.into_iter().map(nested).collect()),
        Value::Map(entries) => Expression::Object(
            entries
                .into_iter()
                .map(|(k, v)| (ObjectKey::Expression(Expression::String(k)), nested(v)))
                .collect(),
        ),
    }
}

fn integer(n: i128) -> Expression {
    if let Ok(n) = i64::try_from(n) {
        Expression::Number(Number::from(n))
    } else if let Ok(n) = u64::try_from(n) {
        Expression::Number(Number::from(n))
    } else {
        Expression::Raw(RawExpression::new(n.to_string()))
    }
}

fn heredoc(mut s: String) -> Expression {
    if !s.ends_with('\n') {
        s.push('\n');
    }
    let heredoc = Heredoc::new(Identifier::from(HEREDOC_DELIMITER), s);
    Expression::TemplateExpr(Box::new(TemplateExpr::Heredoc(heredoc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heredoc_text(expr: Expression) -> String {
        match expr {
            Expression::TemplateExpr(template) => match *template {
                TemplateExpr::Heredoc(heredoc) => heredoc.template,
                other => panic!("expected a heredoc, got {other:?}"),
            },
            other => panic!("expected a heredoc, got {other:?}"),
        }
    }

    #[test]
    fn multi_line_strings_become_heredocs_with_trailing_newline() {
        assert_eq!(heredoc_text(expression(Value::from("a\nb"))), "a\nb\n");
        assert_eq!(heredoc_text(expression(Value::from("a\nb\n"))), "a\nb\n");
    }

    #[test]
    fn single_line_strings_escape_quotes_only() {
        assert_eq!(
            expression(Value::from(r#"say "hi" to ${NOMAD_JOB_ID}\"#)),
            Expression::Raw(RawExpression::new(r#""say \"hi\" to ${NOMAD_JOB_ID}\""#))
        );
    }

    #[test]
    fn nested_strings_stay_literal() {
        assert_eq!(
            expression(Value::List(vec![Value::from("${x}")])),
            Expression::Array(vec![Expression::String("${x}".to_string())])
        );
    }

    #[test]
    fn wide_integers_keep_every_digit() {
        assert_eq!(expression(Value::Integer(-3)), Expression::Number(Number::from(-3i64)));
        assert_eq!(
            expression(Value::Integer(i128::from(u64::MAX) + 1)),
            Expression::Raw(RawExpression::new("18446744073709551616"))
        );
    }

    #[test]
    fn other_values_pass_through() {
        assert_eq!(expression(Value::Bool(true)), Expression::Bool(true));
    }
}
