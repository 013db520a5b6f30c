//! Template tokenizer using nom.
//!
//! Splits a template into literal SQL text and `{{name options}}` tokens.
//!
//! ```text
//! SELECT {{columns --exclude Secret}} FROM {{table}} WHERE {{where --by Id}}
//!        ───────────┬────────────────      ───┬───       ────────┬───────
//!                   │                         │                  └── name `where`, options `--by Id`
//!                   │                         └── name `table`, no options
//!                   └── name `columns`, options `--exclude Secret`
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while1},
    character::complete::multispace0,
    combinator::rest,
    sequence::{delimited, tuple},
    IResult,
};

use crate::error::{SqlError, SqlResult};

/// One piece of a tokenized template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal SQL, copied as is
    Text(String),
    /// A placeholder token
    Token(Token),
}

/// A `{{name options}}` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Handler name, lowercased
    pub name: String,
    /// Raw option text after the name, trimmed
    pub options: String,
    /// Byte offset of the opening `{{`
    pub position: usize,
}

/// Tokenize a complete template.
pub fn tokenize(template: &str) -> SqlResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut input = template;

    while !input.is_empty() {
        let (remaining, text) = literal(input)
            .map_err(|e| SqlError::template(template.len() - input.len(), format!("{:?}", e)))?;
        if !text.is_empty() {
            segments.push(Segment::Text(text.to_string()));
        }
        input = remaining;
        if input.is_empty() {
            break;
        }

        let position = template.len() - input.len();
        match placeholder(input) {
            Ok((remaining, (name, options))) => {
                segments.push(Segment::Token(Token {
                    name: name.to_ascii_lowercase(),
                    options: options.trim().to_string(),
                    position,
                }));
                input = remaining;
            }
            Err(_) if !input[2..].contains("}}") => {
                return Err(SqlError::template(position, "unterminated placeholder, expected '}}'"));
            }
            Err(_) => {
                return Err(SqlError::template(position, "placeholder must start with a name"));
            }
        }
    }

    Ok(segments)
}

/// Text up to the next `{{`, or the rest of the input.
fn literal(input: &str) -> IResult<&str, &str> {
    alt((take_until("{{"), rest))(input)
}

/// `{{ name options }}`
fn placeholder(input: &str) -> IResult<&str, (&str, &str)> {
    delimited(tag("{{"), token_body, tag("}}"))(input)
}

fn token_body(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, (_, name, options)) = tuple((
        multispace0,
        take_while1(|c: char| c.is_alphanumeric() || c == '_'),
        take_until("}}"),
    ))(input)?;
    Ok((input, (name, options)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(name: &str, options: &str, position: usize) -> Segment {
        Segment::Token(Token {
            name: name.to_string(),
            options: options.to_string(),
            position,
        })
    }

    #[test]
    fn test_text_and_tokens() {
        let segments = tokenize("SELECT {{columns}} FROM {{Table --param t}}").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Text("SELECT ".into()),
                token("columns", "", 7),
                Segment::Text(" FROM ".into()),
                token("table", "--param t", 24),
            ]
        );
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            tokenize("SELECT 1").unwrap(),
            vec![Segment::Text("SELECT 1".into())]
        );
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_inner_whitespace() {
        let segments = tokenize("{{  where   --by Id  }}").unwrap();
        assert_eq!(segments, vec![token("where", "--by Id", 0)]);
    }

    #[test]
    fn test_unterminated_token() {
        let err = tokenize("SELECT {{columns FROM x").unwrap_err();
        match err {
            SqlError::Template { position, message } => {
                assert_eq!(position, 7);
                assert!(message.contains("unterminated"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_nameless_token() {
        let err = tokenize("{{ --by Id}}").unwrap_err();
        assert!(matches!(err, SqlError::Template { position: 0, .. }));
    }
}
