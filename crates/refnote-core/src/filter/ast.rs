use crate::domain::TagName;

/// Parsed filter expression. Built once per `parse_filter` call, never
/// mutated afterwards; the set evaluator and the store's predicate
/// compiler both walk the same tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpr {
    /// Exact-match atom.
    Tag(TagName),
    /// `*name`: matches values ending with `name`.
    WildcardPrefix(TagName),
    /// `name*`: matches values starting with `name`.
    WildcardSuffix(TagName),
    Not(Box<FilterExpr>),
    And(Box<FilterExpr>, Box<FilterExpr>),
    Or(Box<FilterExpr>, Box<FilterExpr>),
    /// Explicit parentheses. Semantically transparent; kept so compiled
    /// predicates reproduce the grouping the user wrote.
    Group(Box<FilterExpr>),
}
