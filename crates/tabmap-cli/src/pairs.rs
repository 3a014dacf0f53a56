//! Parsers for `KEY=VALUE` style command-line arguments.

/// A filter given on the command line as `COLUMN=V1,V2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterArg {
    pub column: String,
    pub values: Vec<String>,
}

/// Parse `TARGET=VALUE`.
///
/// The target is trimmed and must not be empty. The value is returned as
/// written; an empty value is allowed.
pub fn parse_assignment_pair(raw: &str) -> Result<(String, String), String> {
    let (target, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected TARGET=VALUE, got '{raw}'"))?;
    let target = target.trim();
    if target.is_empty() {
        return Err(format!("missing target column in '{raw}'"));
    }
    Ok((target.to_string(), value.to_string()))
}

/// Parse `COLUMN=V1,V2,...` into a filter argument.
///
/// Values are trimmed and blanks dropped, so `Country=` yields a rule with
/// no selected values.
pub fn parse_filter_arg(raw: &str) -> Result<FilterArg, String> {
    let (column, values) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=V1,V2, got '{raw}'"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing filter column in '{raw}'"));
    }
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    Ok(FilterArg {
        column: column.to_string(),
        values,
    })
}
