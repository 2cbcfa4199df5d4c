use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Tag(String),
    LParen,
    RParen,
    Not,
    And,
    Or,
    Wild,
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Token::Tag(name) => format!("tag {name:?}"),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Not => "'/'".to_string(),
            Token::And => "'&'".to_string(),
            Token::Or => "'|'".to_string(),
            Token::Wild => "'*'".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// An unrecognized character the lexer skipped. Non-fatal: returned to
/// the caller alongside the parse result instead of being logged away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexWarning {
    pub ch: char,
    pub offset: usize,
}

impl fmt::Display for LexWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ignoring illegal character {:?} at byte {}", self.ch, self.offset)
    }
}

pub(crate) fn tokenize(input: &str) -> (Vec<Spanned>, Vec<LexWarning>) {
    let mut tokens = Vec::new();
    let mut warnings = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        let token = match ch {
            ' ' | '\t' | '\x0b' | '\r' | '\n' => continue,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '/' => Token::Not,
            '&' => Token::And,
            '|' => Token::Or,
            '*' => Token::Wild,
            _ if ch.is_ascii_alphabetic() || ch == '_' => {
                let mut name = String::new();
                name.push(ch);
                while let Some(&(_, next)) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' || next == '-' {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                Token::Tag(name)
            }
            _ => {
                warnings.push(LexWarning { ch, offset });
                continue;
            }
        };
        tokens.push(Spanned { token, offset });
    }

    (tokens, warnings)
}

#[cfg(test)]
mod tests {
    use super::{tokenize, Token};

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input).0.into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn tokenize_operators_and_tags() {
        assert_eq!(
            kinds("(tag2 | tag1) & /ceva"),
            vec![
                Token::LParen,
                Token::Tag("tag2".to_string()),
                Token::Or,
                Token::Tag("tag1".to_string()),
                Token::RParen,
                Token::And,
                Token::Not,
                Token::Tag("ceva".to_string()),
            ]
        );
    }

    #[test]
    fn tokenize_wildcards() {
        assert_eq!(
            kinds("*foo bar*"),
            vec![
                Token::Wild,
                Token::Tag("foo".to_string()),
                Token::Tag("bar".to_string()),
                Token::Wild,
            ]
        );
    }

    #[test]
    fn tag_charset_includes_dash_and_underscore() {
        assert_eq!(
            kinds("map-reduce _draft"),
            vec![
                Token::Tag("map-reduce".to_string()),
                Token::Tag("_draft".to_string()),
            ]
        );
    }

    #[test]
    fn illegal_characters_become_warnings() {
        let (tokens, warnings) = tokenize("a $ b");
        assert_eq!(tokens.len(), 2);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].ch, '$');
        assert_eq!(warnings[0].offset, 2);
    }

    #[test]
    fn whitespace_is_insignificant() {
        let (tokens, warnings) = tokenize(" \t\r\x0b ");
        assert!(tokens.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn offsets_track_bytes() {
        let (tokens, _) = tokenize("ab *cd");
        assert_eq!(tokens[0].offset, 0);
        assert_eq!(tokens[1].offset, 3);
        assert_eq!(tokens[2].offset, 4);
    }
}
