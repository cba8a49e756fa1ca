//! Nom-based line tokenizer.
//!
//! ```text
//! [@tags] [:prefix] <command> [middle...] [:trailing]
//! ```
//!
//! The trailing parameter is introduced by a token starting with `:` and
//! runs verbatim to the end of the line, spaces included.

use nom::{
    bytes::complete::{take_till1, take_while1},
    character::complete::char,
    combinator::opt,
    error::{context, VerboseError, VerboseErrorKind},
    sequence::preceded,
    IResult,
};

use crate::error::MessageParseError;

type ParseResult<I, O> = IResult<I, O, VerboseError<I>>;

/// Middle parameters allowed before the rest of the line is taken as
/// trailing (RFC 2812 Section 2.3.1).
pub const MAX_MIDDLE_PARAMS: usize = 14;

/// Borrowed tokens of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Tokens<'a> {
    pub tags: Option<&'a str>,
    pub prefix: Option<&'a str>,
    pub command: &'a str,
    pub middle: Vec<&'a str>,
    pub trailing: Option<&'a str>,
}

fn parse_tags(input: &str) -> ParseResult<&str, &str> {
    context(
        "message tags",
        preceded(char('@'), take_till1(|c| c == ' ')),
    )(input)
}

fn parse_prefix(input: &str) -> ParseResult<&str, &str> {
    context(
        "message prefix",
        preceded(char(':'), take_till1(|c| c == ' ')),
    )(input)
}

fn parse_command(input: &str) -> ParseResult<&str, &str> {
    context(
        "command token",
        take_while1(|c: char| c.is_ascii_alphanumeric()),
    )(input)
}

/// Map a nom failure onto the innermost context and its offset in `line`.
fn context_error(line: &str, err: nom::Err<VerboseError<&str>>) -> MessageParseError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let mut position = line.len();
            let mut ctx = "message";
            for (input, kind) in &e.errors {
                position = line.len() - input.len();
                if let VerboseErrorKind::Context(c) = kind {
                    ctx = *c;
                }
            }
            MessageParseError::ParseContext {
                position,
                context: ctx,
            }
        }
        nom::Err::Incomplete(_) => MessageParseError::ParseContext {
            position: line.len(),
            context: "incomplete input",
        },
    }
}

pub(super) fn tokenize(raw: &str) -> Result<Tokens<'_>, MessageParseError> {
    let line = raw.trim_end_matches(['\r', '\n']);
    if line.trim_matches(' ').is_empty() {
        return Err(MessageParseError::EmptyMessage);
    }

    let input = line.trim_start_matches(' ');
    let (input, tags) = opt(parse_tags)(input).map_err(|e| context_error(line, e))?;
    let input = input.trim_start_matches(' ');
    let (input, prefix) = opt(parse_prefix)(input).map_err(|e| context_error(line, e))?;
    let input = input.trim_start_matches(' ');

    if input.is_empty() {
        return Err(MessageParseError::MissingCommand);
    }

    let (mut rest, command) = parse_command(input).map_err(|e| context_error(line, e))?;
    if !rest.is_empty() && !rest.starts_with(' ') {
        return Err(MessageParseError::ParseContext {
            position: line.len() - rest.len(),
            context: "command token",
        });
    }

    let mut middle = Vec::new();
    let mut trailing = None;
    loop {
        let param = rest.trim_start_matches(' ');
        if param.is_empty() {
            break;
        }
        if let Some(text) = param.strip_prefix(':') {
            trailing = Some(text);
            break;
        }
        if middle.len() == MAX_MIDDLE_PARAMS {
            trailing = Some(param);
            break;
        }
        let end = param.find(' ').unwrap_or(param.len());
        middle.push(&param[..end]);
        rest = &param[end..];
    }

    Ok(Tokens {
        tags,
        prefix,
        command,
        middle,
        trailing,
    })
}
