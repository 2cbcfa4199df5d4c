use crate::filter::ast::FilterExpr;
use crate::filter::FilterError;
use std::collections::HashSet;

/// A fetched result row. Rows that are identical across all columns
/// collapse when collected into the evaluation set.
pub type Row = Vec<String>;

/// Evaluates a filter tree against an in-memory row set, returning the
/// matching subset. `tag_column` is the positional field holding the tag
/// value. Negation is closed-world: `/x` means every row of `rows` not
/// matched by `x`, not a per-row boolean test.
///
/// Fails fast if `tag_column` is out of range for any row; over a
/// well-formed tree the evaluation itself is total.
pub fn filter_rows(
    expr: &FilterExpr,
    rows: &[Row],
    tag_column: usize,
) -> Result<HashSet<Row>, FilterError> {
    let universe: HashSet<Row> = rows.iter().cloned().collect();
    for row in &universe {
        if tag_column >= row.len() {
            return Err(FilterError::ColumnOutOfRange {
                column: tag_column,
                width: row.len(),
            });
        }
    }
    Ok(eval(expr, &universe, tag_column))
}

fn eval(expr: &FilterExpr, universe: &HashSet<Row>, col: usize) -> HashSet<Row> {
    match expr {
        FilterExpr::Tag(name) => select(universe, col, |value| value == name.as_str()),
        FilterExpr::WildcardPrefix(name) => {
            select(universe, col, |value| value.ends_with(name.as_str()))
        }
        FilterExpr::WildcardSuffix(name) => {
            select(universe, col, |value| value.starts_with(name.as_str()))
        }
        FilterExpr::Not(inner) => {
            let matched = eval(inner, universe, col);
            universe.difference(&matched).cloned().collect()
        }
        FilterExpr::And(left, right) => {
            let left = eval(left, universe, col);
            let right = eval(right, universe, col);
            left.intersection(&right).cloned().collect()
        }
        FilterExpr::Or(left, right) => {
            let left = eval(left, universe, col);
            let right = eval(right, universe, col);
            left.union(&right).cloned().collect()
        }
        FilterExpr::Group(inner) => eval(inner, universe, col),
    }
}

fn select(
    universe: &HashSet<Row>,
    col: usize,
    pred: impl Fn(&str) -> bool,
) -> HashSet<Row> {
    universe
        .iter()
        .filter(|row| pred(&row[col]))
        .cloned()
        .collect()
}
