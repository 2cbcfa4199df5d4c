mod ast;
mod eval;
mod lexer;
mod parser;

use thiserror::Error;

pub use ast::FilterExpr;
pub use eval::{filter_rows, Row};
pub use lexer::{LexWarning, Token};
pub use parser::{parse_filter, parse_filter_with_limit, ParsedFilter, DEFAULT_DEPTH_LIMIT};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("empty filter expression")]
    EmptyExpression,
    #[error("unexpected {found} at byte {offset}")]
    UnexpectedToken { found: String, offset: usize },
    #[error("unexpected end of filter expression")]
    UnexpectedEnd,
    #[error("unclosed '(' at byte {0}")]
    UnbalancedParen(usize),
    #[error("wildcard '*' at byte {0} must be attached to a tag")]
    DanglingWildcard(usize),
    #[error("filter nesting exceeds {0} levels")]
    DepthExceeded(usize),
    #[error("invalid tag in filter: {0:?}")]
    InvalidTag(String),
    #[error("tag column {column} out of range for row of width {width}")]
    ColumnOutOfRange { column: usize, width: usize },
}
