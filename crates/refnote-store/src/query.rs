use crate::error::{Result, StoreError};
use refnote_core::domain::BibRef;
use refnote_core::filter::FilterExpr;
use rusqlite::types::Value;

/// A boolean SQL fragment plus its bound parameters, ready to embed in a
/// WHERE clause. Tag values never appear in the SQL text itself.
#[derive(Debug, Clone)]
pub struct Predicate {
    pub sql: String,
    pub params: Vec<Value>,
}

/// A complete statement with parameters, as produced by [`EntryQuery`].
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Compiles a filter tree into a predicate over a single text column.
/// Used where one row carries one tag value (e.g. deleting from the tags
/// table by expression). `column` must be a plain identifier; it is the
/// only text interpolated into the fragment.
pub fn compile_predicate(expr: &FilterExpr, column: &str) -> Result<Predicate> {
    if !is_valid_column(column) {
        return Err(StoreError::InvalidColumn(column.to_string()));
    }
    let mut predicate = Predicate {
        sql: String::new(),
        params: Vec::new(),
    };
    render_column(expr, column, &mut predicate);
    Ok(predicate)
}

/// Compiles a filter tree into a predicate over the `entries` table,
/// rendering each tag atom as an EXISTS probe into `entry_tags`. Negation
/// therefore applies per entry, over whatever row set the enclosing
/// query scans.
pub fn compile_entry_match(expr: &FilterExpr) -> Predicate {
    let mut predicate = Predicate {
        sql: String::new(),
        params: Vec::new(),
    };
    render_entry(expr, &mut predicate);
    predicate
}

fn render_column(expr: &FilterExpr, column: &str, out: &mut Predicate) {
    match expr {
        FilterExpr::Tag(name) => {
            out.sql.push_str(column);
            out.sql.push_str(" = ?");
            out.params.push(Value::from(name.as_str().to_string()));
        }
        FilterExpr::WildcardPrefix(name) => {
            out.sql.push_str(column);
            out.sql.push_str(" LIKE ? ESCAPE '\\'");
            out.params
                .push(Value::from(format!("%{}", escape_like(name.as_str()))));
        }
        FilterExpr::WildcardSuffix(name) => {
            out.sql.push_str(column);
            out.sql.push_str(" LIKE ? ESCAPE '\\'");
            out.params
                .push(Value::from(format!("{}%", escape_like(name.as_str()))));
        }
        FilterExpr::Not(inner) => {
            out.sql.push_str("NOT (");
            render_column(inner, column, out);
            out.sql.push(')');
        }
        FilterExpr::And(left, right) => {
            render_binary(left, right, " AND ", out, |node, out| {
                render_column(node, column, out)
            });
        }
        FilterExpr::Or(left, right) => {
            render_binary(left, right, " OR ", out, |node, out| {
                render_column(node, column, out)
            });
        }
        FilterExpr::Group(inner) => {
            out.sql.push('(');
            render_column(inner, column, out);
            out.sql.push(')');
        }
    }
}

fn render_entry(expr: &FilterExpr, out: &mut Predicate) {
    match expr {
        FilterExpr::Tag(name) => {
            out.sql.push_str(
                "EXISTS (SELECT 1 FROM entry_tags \
                 WHERE entry_tags.entry_id = entries.id AND entry_tags.tag = ?)",
            );
            out.params.push(Value::from(name.as_str().to_string()));
        }
        FilterExpr::WildcardPrefix(name) => {
            render_entry_like(out, format!("%{}", escape_like(name.as_str())));
        }
        FilterExpr::WildcardSuffix(name) => {
            render_entry_like(out, format!("{}%", escape_like(name.as_str())));
        }
        FilterExpr::Not(inner) => {
            out.sql.push_str("NOT (");
            render_entry(inner, out);
            out.sql.push(')');
        }
        FilterExpr::And(left, right) => {
            render_binary(left, right, " AND ", out, render_entry);
        }
        FilterExpr::Or(left, right) => {
            render_binary(left, right, " OR ", out, render_entry);
        }
        FilterExpr::Group(inner) => {
            out.sql.push('(');
            render_entry(inner, out);
            out.sql.push(')');
        }
    }
}

fn render_entry_like(out: &mut Predicate, pattern: String) {
    out.sql.push_str(
        "EXISTS (SELECT 1 FROM entry_tags \
         WHERE entry_tags.entry_id = entries.id AND entry_tags.tag LIKE ? ESCAPE '\\')",
    );
    out.params.push(Value::from(pattern));
}

fn render_binary(
    left: &FilterExpr,
    right: &FilterExpr,
    op: &str,
    out: &mut Predicate,
    render: impl Fn(&FilterExpr, &mut Predicate),
) {
    out.sql.push('(');
    render(left, out);
    out.sql.push(')');
    out.sql.push_str(op);
    out.sql.push('(');
    render(right, out);
    out.sql.push(')');
}

fn is_valid_column(column: &str) -> bool {
    let mut chars = column.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '.')
}

/// Tag names may legitimately contain `_`, which is a LIKE wildcard.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Selection criteria for listing entries: an optional source
/// restriction and an optional tag filter, both compiled into one
/// parameterized statement.
#[derive(Debug, Default, Clone)]
pub struct EntryQuery {
    pub sources: Vec<BibRef>,
    pub filter: Option<FilterExpr>,
}

impl EntryQuery {
    pub fn to_sql(&self) -> SqlQuery {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(expr) = &self.filter {
            let predicate = compile_entry_match(expr);
            clauses.push(predicate.sql);
            params.extend(predicate.params);
        }

        if !self.sources.is_empty() {
            let placeholders = vec!["?"; self.sources.len()].join(", ");
            clauses.push(format!("entries.source IN ({})", placeholders));
            for source in &self.sources {
                params.push(Value::from(source.as_str().to_string()));
            }
        }

        let mut sql = String::from(
            "SELECT entries.id, entries.source, entries.at, entries.info, entries.label, \
             (SELECT GROUP_CONCAT(tag) FROM \
                (SELECT tag FROM entry_tags \
                 WHERE entry_tags.entry_id = entries.id ORDER BY tag)) AS tags \
             FROM entries",
        );

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        sql.push_str(" ORDER BY entries.id ASC");

        SqlQuery { sql, params }
    }
}

#[cfg(test)]
mod tests {
    use super::{compile_entry_match, compile_predicate, EntryQuery};
    use refnote_core::domain::BibRef;
    use refnote_core::parse_filter;
    use rusqlite::types::Value;

    fn text(value: &Value) -> &str {
        match value {
            Value::Text(text) => text,
            other => panic!("expected text param, got {other:?}"),
        }
    }

    #[test]
    fn tag_compiles_to_bound_equality() {
        let parsed = parse_filter("published").unwrap();
        let predicate = compile_predicate(&parsed.expr, "name").unwrap();
        assert_eq!(predicate.sql, "name = ?");
        assert_eq!(text(&predicate.params[0]), "published");
    }

    #[test]
    fn and_not_compiles_to_nested_fragments() {
        let parsed = parse_filter("a & /b").unwrap();
        let predicate = compile_predicate(&parsed.expr, "tag").unwrap();
        assert_eq!(predicate.sql, "(tag = ?) AND (NOT (tag = ?))");
        assert_eq!(text(&predicate.params[0]), "a");
        assert_eq!(text(&predicate.params[1]), "b");
    }

    #[test]
    fn wildcards_compile_to_like_patterns() {
        let parsed = parse_filter("*foo").unwrap();
        let predicate = compile_predicate(&parsed.expr, "tag").unwrap();
        assert_eq!(predicate.sql, "tag LIKE ? ESCAPE '\\'");
        assert_eq!(text(&predicate.params[0]), "%foo");

        let parsed = parse_filter("foo*").unwrap();
        let predicate = compile_predicate(&parsed.expr, "tag").unwrap();
        assert_eq!(text(&predicate.params[0]), "foo%");
    }

    #[test]
    fn like_metacharacters_in_tags_are_escaped() {
        let parsed = parse_filter("v2_final*").unwrap();
        let predicate = compile_predicate(&parsed.expr, "tag").unwrap();
        assert_eq!(text(&predicate.params[0]), "v2\\_final%");
    }

    #[test]
    fn groups_are_reproduced_as_parentheses() {
        let parsed = parse_filter("(a | b) & c").unwrap();
        let predicate = compile_predicate(&parsed.expr, "tag").unwrap();
        assert_eq!(predicate.sql, "(((tag = ?) OR (tag = ?))) AND (tag = ?)");
    }

    #[test]
    fn column_reference_is_validated() {
        let parsed = parse_filter("a").unwrap();
        assert!(compile_predicate(&parsed.expr, "entry_tags.tag").is_ok());
        assert!(compile_predicate(&parsed.expr, "tag; DROP TABLE tags").is_err());
        assert!(compile_predicate(&parsed.expr, "").is_err());
    }

    #[test]
    fn entry_match_renders_exists_probes() {
        let parsed = parse_filter("a & /b").unwrap();
        let predicate = compile_entry_match(&parsed.expr);
        assert_eq!(predicate.params.len(), 2);
        assert!(predicate.sql.starts_with("(EXISTS (SELECT 1 FROM entry_tags"));
        assert!(predicate.sql.contains("AND (NOT (EXISTS"));
    }

    #[test]
    fn entry_query_combines_filter_and_sources() {
        let parsed = parse_filter("a | b").unwrap();
        let query = EntryQuery {
            sources: vec![BibRef::new("Knuth97").unwrap()],
            filter: Some(parsed.expr),
        };
        let sql_query = query.to_sql();
        // The tags subquery carries its own WHERE; check the outer clause.
        assert!(sql_query.sql.contains("FROM entries WHERE"));
        assert!(sql_query.sql.contains("entries.source IN (?)"));
        assert_eq!(sql_query.params.len(), 3);
    }

    #[test]
    fn entry_query_without_criteria_has_no_outer_where() {
        let sql_query = EntryQuery::default().to_sql();
        assert!(!sql_query.sql.contains("FROM entries WHERE"));
        assert!(sql_query.params.is_empty());
    }
}
