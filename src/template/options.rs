//! Placeholder option parsing.
//!
//! Option text is a sequence of `--name [value]` pairs. A value runs until the
//! next ` --name` outside parentheses and quotes, so inline expressions such
//! as `--inline Total=COALESCE(@total, 0)` survive intact.

use indexmap::IndexMap;

use crate::error::{SqlError, SqlResult};

/// Parsed options of one token, keyed by lowercased option name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderOptions {
    values: IndexMap<String, String>,
}

impl PlaceholderOptions {
    /// Parse raw option text; `position` is reported on errors.
    pub fn parse(raw: &str, position: usize) -> SqlResult<Self> {
        let raw = raw.trim();
        let starts = option_starts(raw);

        match starts.first() {
            None if !raw.is_empty() => {
                return Err(SqlError::template(
                    position,
                    format!("expected '--option', found '{}'", raw),
                ))
            }
            Some(&first) if first > 0 => {
                return Err(SqlError::template(
                    position,
                    format!("expected '--option', found '{}'", raw[..first].trim()),
                ))
            }
            _ => {}
        }

        let mut values = IndexMap::new();
        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(raw.len());
            let body = raw[start + 2..end].trim_end();
            if body.is_empty() || body.starts_with(char::is_whitespace) {
                return Err(SqlError::template(position, "option name missing after '--'"));
            }
            let (name, value) = match body.split_once(char::is_whitespace) {
                Some((name, value)) => (name, value.trim()),
                None => (body, ""),
            };
            values.insert(name.to_ascii_lowercase(), value.to_string());
        }

        Ok(Self { values })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Raw value of an option; flags have an empty value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Comma-separated items of an option, split outside parentheses.
    pub fn list(&self, name: &str) -> Vec<String> {
        self.get(name).map(split_list).unwrap_or_default()
    }

    /// `Prop=expr` pairs of an option such as `--inline`.
    pub fn pairs(&self, name: &str) -> SqlResult<Vec<(String, String)>> {
        self.list(name)
            .into_iter()
            .map(|item| match item.split_once('=') {
                Some((prop, expr)) if !prop.trim().is_empty() => {
                    Ok((prop.trim().to_string(), expr.trim().to_string()))
                }
                _ => Err(SqlError::invalid(
                    format!("--{} expects Prop=expression", name),
                    item,
                )),
            })
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Byte offsets of `--` that open an option: at depth 0, outside quotes, at
/// the start or after whitespace.
fn option_starts(raw: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut prev_space = true;

    for (i, c) in raw.char_indices() {
        match c {
            '\'' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => depth -= 1,
            '-' if !in_string && depth == 0 && prev_space && raw[i..].starts_with("--") => {
                starts.push(i);
            }
            _ => {}
        }
        prev_space = c.is_whitespace();
    }

    starts
}

fn split_list(value: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut current = String::new();

    for c in value.chars() {
        match c {
            '\'' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => depth -= 1,
            ',' if !in_string && depth == 0 => {
                items.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    items.push(current);

    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
