//! Named parameters and placeholder rewriting.
//!
//! `:name` parameters are compiled to the engine's positional style. The
//! scanner skips string literals, quoted identifiers, comments and
//! PostgreSQL dollar-quoted bodies, and leaves `::` casts alone.

use crate::db::engine::Placeholder;
use crate::db::{Engine, Value};
use crate::error::{DbError, DbResult};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// A statement with `:name` parameters rewritten to positional ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedQuery {
    engine: Engine,
    sql: String,
    /// One entry per placeholder, in order; repeated names repeat.
    names: Vec<String>,
}

impl NamedQuery {
    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Produce positional arguments from a struct or map.
    ///
    /// `arg` must serialize to a JSON object; every name in the statement
    /// has to be present in it.
    pub fn bind<A: Serialize + ?Sized>(&self, arg: &A) -> DbResult<Vec<Value>> {
        let fields = match serde_json::to_value(arg) {
            Ok(JsonValue::Object(fields)) => fields,
            Ok(other) => {
                return Err(DbError::bind(format!(
                    "named arguments must be a struct or map, got {}",
                    json_kind(&other)
                )));
            }
            Err(e) => return Err(DbError::bind(e.to_string())),
        };

        self.names
            .iter()
            .map(|name| {
                fields
                    .get(name)
                    .cloned()
                    .map(Value::from_json)
                    .ok_or_else(|| DbError::bind(format!("could not find name {name} in argument")))
            })
            .collect()
    }
}

/// Compile `:name` parameters in `sql` for `engine`.
pub fn compile(engine: Engine, sql: &str) -> NamedQuery {
    let mut names = Vec::new();
    let rewritten = rewrite(engine, sql, |bytes, idx| {
        if bytes[idx] != b':' {
            return None;
        }
        if bytes.get(idx + 1) == Some(&b':') {
            return Some((idx + 2, "::".to_string()));
        }
        let end = scan_ident(sql, idx + 1)?;
        names.push(sql[idx + 1..end].to_string());
        Some((end, placeholder(engine, names.len())))
    });
    NamedQuery {
        engine,
        sql: rewritten,
        names,
    }
}

/// Compile `sql` and bind `arg` in one step.
pub fn bind_named<A: Serialize + ?Sized>(
    engine: Engine,
    sql: &str,
    arg: &A,
) -> DbResult<(String, Vec<Value>)> {
    let query = compile(engine, sql);
    let args = query.bind(arg)?;
    Ok((query.sql, args))
}

/// Rewrite `?` placeholders into the engine's style.
///
/// A no-op for engines that already use `?`.
pub fn rebind(engine: Engine, sql: &str) -> String {
    match engine.placeholder() {
        Placeholder::Question => sql.to_string(),
        Placeholder::Dollar => {
            let mut n = 0;
            rewrite(engine, sql, |bytes, idx| {
                (bytes[idx] == b'?').then(|| {
                    n += 1;
                    (idx + 1, format!("${n}"))
                })
            })
        }
    }
}

fn placeholder(engine: Engine, n: usize) -> String {
    match engine.placeholder() {
        Placeholder::Question => "?".to_string(),
        Placeholder::Dollar => format!("${n}"),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a sequence",
        JsonValue::Object(_) => "a map",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    Backtick,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

/// Walk `sql`, offering every byte in plain SQL to `replace`.
///
/// `replace(bytes, idx)` returns the end of the consumed span and its
/// replacement text, or `None` to keep the byte. Spans start on an ASCII
/// byte and end on a character boundary, so slicing never splits a character.
fn rewrite<F>(engine: Engine, sql: &str, mut replace: F) -> String
where
    F: FnMut(&[u8], usize) -> Option<(usize, String)>,
{
    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len());
    let mut state = State::Normal;
    let mut copied = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'`' if engine != Engine::Postgres => state = State::Backtick,
                b'-' if bytes.get(idx + 1) == Some(&b'-') => state = State::LineComment,
                b'#' if engine == Engine::MySql => state = State::LineComment,
                b'/' if bytes.get(idx + 1) == Some(&b'*') => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'$' if engine == Engine::Postgres => {
                    if let Some((tag, tag_end)) = dollar_tag(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        idx = tag_end;
                    }
                }
                _ => {
                    if let Some((end, text)) = replace(bytes, idx) {
                        out.push_str(&sql[copied..idx]);
                        out.push_str(&text);
                        copied = end;
                        idx = end;
                        continue;
                    }
                }
            },
            State::SingleQuoted | State::DoubleQuoted | State::Backtick => {
                let quote = match state {
                    State::SingleQuoted => b'\'',
                    State::DoubleQuoted => b'"',
                    _ => b'`',
                };
                if b == b'\\' && engine == Engine::MySql && quote != b'`' {
                    idx += 1;
                } else if b == quote {
                    if bytes.get(idx + 1) == Some(&quote) {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if b == b'/' && bytes.get(idx + 1) == Some(&b'*') {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if b == b'*' && bytes.get(idx + 1) == Some(&b'/') {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && closes_tag(bytes, idx, tag) {
                    idx += tag.len() + 1;
                    state = State::Normal;
                }
            }
        }
        idx += 1;
    }

    out.push_str(&sql[copied.min(sql.len())..]);
    out
}

/// End index (exclusive) of an identifier starting at `start`. Identifiers
/// are Unicode letters, digits and `_`, not starting with a digit.
fn scan_ident(sql: &str, start: usize) -> Option<usize> {
    let rest = sql.get(start..)?;
    let first = rest.chars().next()?;
    if !(first.is_alphabetic() || first == '_') {
        return None;
    }
    let len = rest
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map_or(rest.len(), |(i, _)| i);
    Some(start + len)
}

/// Parse an opening `$tag$` at `start`; returns the tag and the index of
/// its closing `$`.
fn dollar_tag(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    if bytes.get(start + 1).is_some_and(u8::is_ascii_digit) {
        return None;
    }
    let len = bytes[start + 1..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count();
    let close = start + 1 + len;
    (bytes.get(close) == Some(&b'$')).then(|| {
        let tag = String::from_utf8_lossy(&bytes[start + 1..close]).into_owned();
        (tag, close)
    })
}

fn closes_tag(bytes: &[u8], idx: usize, tag: &str) -> bool {
    let end = idx + 1 + tag.len();
    bytes.get(idx + 1..end) == Some(tag.as_bytes()) && bytes.get(end) == Some(&b'$')
}
