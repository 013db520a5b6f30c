//! Function mapping table.
//!
//! Each row maps an abstract function and arity to one SQL template per
//! dialect, in [`DialectKind::ALL`] order. `{n}` is replaced by the n-th
//! rendered argument. `None` means the dialect has no spelling and rendering
//! fails with [`SqlError::Unsupported`].
//!
//! Zero-based offsets are converted with a literal `+ 1` so the arithmetic
//! stays visible in the generated SQL.

use crate::ast::FunctionKind;
use crate::error::{SqlError, SqlResult};
use crate::transpiler::DialectKind;

/// One row of the mapping table.
#[derive(Debug, Clone, Copy)]
pub struct FunctionRow {
    pub func: FunctionKind,
    pub arity: usize,
    pub sql: [Option<&'static str>; 6],
}

const fn same(sql: &'static str) -> [Option<&'static str>; 6] {
    [Some(sql), Some(sql), Some(sql), Some(sql), Some(sql), Some(sql)]
}

macro_rules! row {
    ($func:ident / $arity:literal => $sql:expr) => {
        FunctionRow {
            func: FunctionKind::$func,
            arity: $arity,
            sql: $sql,
        }
    };
}

//                       Generic, SqlServer, MySql, PostgreSql, Oracle, Db2
pub static FUNCTIONS: &[FunctionRow] = &[
    // String
    row!(Length / 1 => [
        Some("LENGTH({0})"), Some("LEN({0})"), Some("LENGTH({0})"),
        Some("LENGTH({0})"), Some("LENGTH({0})"), Some("LENGTH({0})"),
    ]),
    row!(Upper / 1 => same("UPPER({0})")),
    row!(Lower / 1 => same("LOWER({0})")),
    row!(Trim / 1 => [
        Some("TRIM({0})"), Some("LTRIM(RTRIM({0}))"), Some("TRIM({0})"),
        Some("TRIM({0})"), Some("TRIM({0})"), Some("TRIM({0})"),
    ]),
    row!(TrimStart / 1 => same("LTRIM({0})")),
    row!(TrimEnd / 1 => same("RTRIM({0})")),
    row!(Substring / 2 => [
        Some("SUBSTR({0}, {1} + 1)"), Some("SUBSTRING({0}, {1} + 1)"), Some("SUBSTR({0}, {1} + 1)"),
        Some("SUBSTRING({0} FROM {1} + 1)"), Some("SUBSTR({0}, {1} + 1)"), Some("SUBSTR({0}, {1} + 1)"),
    ]),
    row!(Substring / 3 => [
        Some("SUBSTR({0}, {1} + 1, {2})"), Some("SUBSTRING({0}, {1} + 1, {2})"), Some("SUBSTR({0}, {1} + 1, {2})"),
        Some("SUBSTRING({0} FROM {1} + 1 FOR {2})"), Some("SUBSTR({0}, {1} + 1, {2})"), Some("SUBSTR({0}, {1} + 1, {2})"),
    ]),
    row!(IndexOf / 2 => [
        Some("INSTR({0}, {1}) - 1"), Some("CHARINDEX({1}, {0}) - 1"), Some("LOCATE({1}, {0}) - 1"),
        Some("POSITION({1} IN {0}) - 1"), Some("INSTR({0}, {1}) - 1"), Some("LOCATE({1}, {0}) - 1"),
    ]),
    row!(IndexOf / 3 => [
        None, Some("CHARINDEX({1}, {0}, {2} + 1) - 1"), Some("LOCATE({1}, {0}, {2} + 1) - 1"),
        None, Some("INSTR({0}, {1}, {2} + 1) - 1"), Some("LOCATE({1}, {0}, {2} + 1) - 1"),
    ]),
    row!(Replace / 3 => same("REPLACE({0}, {1}, {2})")),
    row!(Contains / 2 => [
        Some("{0} LIKE '%' || {1} || '%'"), Some("{0} LIKE '%' + {1} + '%'"), Some("{0} LIKE CONCAT('%', {1}, '%')"),
        Some("{0} LIKE '%' || {1} || '%'"), Some("{0} LIKE '%' || {1} || '%'"), Some("{0} LIKE '%' || {1} || '%'"),
    ]),
    row!(StartsWith / 2 => [
        Some("{0} LIKE {1} || '%'"), Some("{0} LIKE {1} + '%'"), Some("{0} LIKE CONCAT({1}, '%')"),
        Some("{0} LIKE {1} || '%'"), Some("{0} LIKE {1} || '%'"), Some("{0} LIKE {1} || '%'"),
    ]),
    row!(EndsWith / 2 => [
        Some("{0} LIKE '%' || {1}"), Some("{0} LIKE '%' + {1}"), Some("{0} LIKE CONCAT('%', {1})"),
        Some("{0} LIKE '%' || {1}"), Some("{0} LIKE '%' || {1}"), Some("{0} LIKE '%' || {1}"),
    ]),
    row!(PadLeft / 3 => [
        None, Some("RIGHT(REPLICATE({2}, {1}) + {0}, {1})"), Some("LPAD({0}, {1}, {2})"),
        Some("LPAD({0}, {1}, {2})"), None, None,
    ]),
    // Math
    row!(Abs / 1 => same("ABS({0})")),
    row!(Ceiling / 1 => [
        Some("CEILING({0})"), Some("CEILING({0})"), Some("CEILING({0})"),
        Some("CEIL({0})"), Some("CEILING({0})"), Some("CEILING({0})"),
    ]),
    row!(Floor / 1 => same("FLOOR({0})")),
    row!(Round / 1 => [
        Some("ROUND({0})"), Some("ROUND({0}, 0)"), Some("ROUND({0})"),
        Some("ROUND({0})"), Some("ROUND({0})"), Some("ROUND({0})"),
    ]),
    row!(Round / 2 => same("ROUND({0}, {1})")),
    row!(Power / 2 => [
        Some("POWER({0}, {1})"), Some("POWER({0}, {1})"), Some("POW({0}, {1})"),
        Some("POWER({0}, {1})"), Some("POWER({0}, {1})"), Some("POWER({0}, {1})"),
    ]),
    row!(Sqrt / 1 => same("SQRT({0})")),
    row!(Sign / 1 => same("SIGN({0})")),
    row!(Truncate / 1 => [
        None, Some("ROUND({0}, 0, 1)"), Some("TRUNCATE({0}, 0)"),
        Some("TRUNC({0})"), None, None,
    ]),
    // Date
    row!(Now / 0 => [
        Some("CURRENT_TIMESTAMP"), Some("GETDATE()"), Some("NOW()"),
        Some("NOW()"), Some("SYSTIMESTAMP"), Some("CURRENT TIMESTAMP"),
    ]),
    row!(Year / 1 => [
        Some("CAST(STRFTIME('%Y', {0}) AS INTEGER)"), Some("YEAR({0})"), Some("YEAR({0})"),
        Some("EXTRACT(YEAR FROM {0})"), Some("EXTRACT(YEAR FROM {0})"), Some("YEAR({0})"),
    ]),
    row!(Month / 1 => [
        Some("CAST(STRFTIME('%m', {0}) AS INTEGER)"), Some("MONTH({0})"), Some("MONTH({0})"),
        Some("EXTRACT(MONTH FROM {0})"), Some("EXTRACT(MONTH FROM {0})"), Some("MONTH({0})"),
    ]),
    row!(Day / 1 => [
        Some("CAST(STRFTIME('%d', {0}) AS INTEGER)"), Some("DAY({0})"), Some("DAY({0})"),
        Some("EXTRACT(DAY FROM {0})"), Some("EXTRACT(DAY FROM {0})"), Some("DAY({0})"),
    ]),
];

/// Find the template for a function, arity and dialect.
pub fn lookup(func: FunctionKind, arity: usize, dialect: DialectKind) -> SqlResult<&'static str> {
    let row = FUNCTIONS
        .iter()
        .find(|r| r.func == func && r.arity == arity)
        .ok_or_else(|| SqlError::unsupported(format!("{}/{}", func, arity), dialect))?;
    row.sql[dialect.index()].ok_or_else(|| SqlError::unsupported(func.name(), dialect))
}

/// Whether a template has operators outside any parentheses, so it must be
/// grouped when used as an operand.
pub fn is_compound(template: &str) -> bool {
    let mut depth = 0i32;
    let mut in_string = false;
    for c in template.chars() {
        match c {
            '\'' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => depth -= 1,
            c if c.is_whitespace() && depth == 0 && !in_string => return true,
            _ => {}
        }
    }
    false
}

/// Substitute rendered arguments into a template.
///
/// Each argument carries a flag saying whether it is itself an operator
/// expression; such arguments are parenthesized unless the slot is delimited
/// only by `(`, `,` or `)`.
pub fn fill(template: &str, args: &[(String, bool)]) -> String {
    let bytes = template.as_bytes();
    let mut out = String::with_capacity(template.len() + 16);
    let mut i = 0;

    while i < template.len() {
        if bytes[i] == b'{' {
            if let Some(len) = template[i + 1..].find('}') {
                let index_text = &template[i + 1..i + 1 + len];
                if let Ok(index) = index_text.parse::<usize>() {
                    if let Some((text, grouped)) = args.get(index) {
                        let before = template[..i].trim_end().chars().last();
                        let after = template[i + len + 2..].trim_start().chars().next();
                        let bare = matches!(before, None | Some('(') | Some(','))
                            && matches!(after, None | Some(')') | Some(','));
                        if *grouped && !bare {
                            out.push('(');
                            out.push_str(text);
                            out.push(')');
                        } else {
                            out.push_str(text);
                        }
                        i += len + 2;
                        continue;
                    }
                }
            }
        }
        let ch = template[i..].chars().next().unwrap_or_default();
        out.push(ch);
        i += ch.len_utf8();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_row_has_six_columns_and_known_arity() {
        for row in FUNCTIONS {
            for template in row.sql.iter().flatten() {
                for n in 0..row.arity {
                    assert!(
                        template.contains(&format!("{{{}}}", n)),
                        "{} missing argument {} in {}",
                        row.func,
                        n,
                        template
                    );
                }
            }
        }
    }

    #[test]
    fn test_lookup_reports_missing_dialect() {
        let err = lookup(FunctionKind::Truncate, 1, DialectKind::Generic).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported: truncate has no mapping for the Generic dialect"
        );
        assert_eq!(lookup(FunctionKind::Truncate, 1, DialectKind::MySql).unwrap(), "TRUNCATE({0}, 0)");
    }

    #[test]
    fn test_lookup_reports_unknown_arity() {
        let err = lookup(FunctionKind::Length, 4, DialectKind::Oracle).unwrap_err();
        assert!(err.to_string().contains("length/4"));
    }

    #[test]
    fn test_compound_detection() {
        assert!(is_compound("INSTR({0}, {1}) - 1"));
        assert!(is_compound("{0} LIKE '%' || {1} || '%'"));
        assert!(!is_compound("SUBSTRING({0} FROM {1} + 1)"));
        assert!(!is_compound("CAST(STRFTIME('%Y', {0}) AS INTEGER)"));
        assert!(!is_compound("LENGTH({0})"));
    }

    #[test]
    fn test_fill_groups_operator_arguments_next_to_operators() {
        let args = vec![("[name]".to_string(), false), ("[a] + [b]".to_string(), true)];
        assert_eq!(fill("SUBSTR({0}, {1} + 1)", &args), "SUBSTR([name], ([a] + [b]) + 1)");
        assert_eq!(fill("REPLACE({0}, {1}, {1})", &args), "REPLACE([name], [a] + [b], [a] + [b])");
    }
}
