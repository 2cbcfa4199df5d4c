use crate::domain::TagName;
use crate::filter::ast::FilterExpr;
use crate::filter::lexer::{tokenize, LexWarning, Spanned, Token};
use crate::filter::FilterError;

/// Nesting ceiling for `parse_filter`. Deep enough for any filter a
/// person would type, shallow enough to fail before the call stack does.
pub const DEFAULT_DEPTH_LIMIT: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilter {
    pub expr: FilterExpr,
    /// Illegal characters the lexer skipped, in input order.
    pub warnings: Vec<LexWarning>,
}

/// Parses a boolean tag-filter expression.
///
/// Grammar, lowest precedence first; binary operators are
/// left-associative and `/` binds tightest:
///
/// ```text
/// expr    := term ('|' term)*
/// term    := factor ('&' factor)*
/// factor  := '/' factor | '(' expr ')' | wildtag
/// wildtag := '*' TAG | TAG '*' | TAG
/// ```
///
/// A `*` counts as attached to a tag only when they are adjacent in the
/// input: `name*` is a starts-with match, `* name` is an error.
pub fn parse_filter(input: &str) -> Result<ParsedFilter, FilterError> {
    parse_filter_with_limit(input, DEFAULT_DEPTH_LIMIT)
}

pub fn parse_filter_with_limit(
    input: &str,
    max_depth: usize,
) -> Result<ParsedFilter, FilterError> {
    let (tokens, warnings) = tokenize(input);
    if tokens.is_empty() {
        return Err(FilterError::EmptyExpression);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        max_depth,
    };
    let expr = parser.expr(0)?;
    if let Some(extra) = parser.peek() {
        return Err(unexpected(extra));
    }
    Ok(ParsedFilter { expr, warnings })
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    max_depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Spanned> {
        let spanned = self.tokens.get(self.pos).cloned();
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    fn expr(&mut self, depth: usize) -> Result<FilterExpr, FilterError> {
        let mut node = self.term(depth)?;
        while matches!(self.peek(), Some(s) if s.token == Token::Or) {
            self.pos += 1;
            let rhs = self.term(depth)?;
            node = FilterExpr::Or(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn term(&mut self, depth: usize) -> Result<FilterExpr, FilterError> {
        let mut node = self.factor(depth)?;
        while matches!(self.peek(), Some(s) if s.token == Token::And) {
            self.pos += 1;
            let rhs = self.factor(depth)?;
            node = FilterExpr::And(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn factor(&mut self, depth: usize) -> Result<FilterExpr, FilterError> {
        if depth >= self.max_depth {
            return Err(FilterError::DepthExceeded(self.max_depth));
        }
        let spanned = self.next().ok_or(FilterError::UnexpectedEnd)?;
        match spanned.token {
            Token::Not => Ok(FilterExpr::Not(Box::new(self.factor(depth + 1)?))),
            Token::LParen => {
                let inner = self.expr(depth + 1)?;
                match self.next() {
                    Some(Spanned {
                        token: Token::RParen,
                        ..
                    }) => Ok(FilterExpr::Group(Box::new(inner))),
                    Some(other) => Err(unexpected(&other)),
                    None => Err(FilterError::UnbalancedParen(spanned.offset)),
                }
            }
            Token::Wild => {
                let glued = matches!(
                    self.peek(),
                    Some(Spanned { token: Token::Tag(_), offset }) if *offset == spanned.offset + 1
                );
                if !glued {
                    return Err(FilterError::DanglingWildcard(spanned.offset));
                }
                match self.next() {
                    Some(Spanned {
                        token: Token::Tag(name),
                        ..
                    }) => Ok(FilterExpr::WildcardPrefix(tag_name(name)?)),
                    _ => Err(FilterError::DanglingWildcard(spanned.offset)),
                }
            }
            Token::Tag(name) => {
                let end = spanned.offset + name.len();
                let glued_wild = matches!(
                    self.peek(),
                    Some(Spanned { token: Token::Wild, offset }) if *offset == end
                );
                if glued_wild {
                    self.pos += 1;
                    Ok(FilterExpr::WildcardSuffix(tag_name(name)?))
                } else {
                    Ok(FilterExpr::Tag(tag_name(name)?))
                }
            }
            Token::RParen | Token::And | Token::Or => Err(unexpected(&spanned)),
        }
    }
}

fn unexpected(spanned: &Spanned) -> FilterError {
    FilterError::UnexpectedToken {
        found: spanned.token.describe(),
        offset: spanned.offset,
    }
}

// The lexer only emits tags drawn from the TagName charset, so this
// conversion cannot fail on lexer output; the error path guards the type
// boundary anyway.
fn tag_name(name: String) -> Result<TagName, FilterError> {
    TagName::new(&name).map_err(|_| FilterError::InvalidTag(name))
}
