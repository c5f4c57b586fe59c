//! BibTeX parser implementation using nom
//!
//! This parser handles standard BibTeX format including:
//! - @string definitions
//! - @preamble declarations
//! - @comment sections
//! - All standard entry types
//! - Braced and quoted field values
//! - String concatenation with #
//! - Nested braces in field values
//!
//! Macro references are never expanded. A field written as `journal = pami`
//! comes back as a [`FieldValue::Expression`] holding the reference, and the
//! `@string` definitions are collected separately in
//! [`BibTeXParseResult::strings`].

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    IResult,
};
use std::collections::HashMap;

use super::entry::{BibTeXEntry, BibTeXEntryType, FieldValue, ValuePart};

/// Parse error information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXParseError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

/// Result of parsing a BibTeX file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BibTeXParseResult {
    pub entries: Vec<BibTeXEntry>,
    pub preambles: Vec<FieldValue>,
    pub strings: HashMap<String, FieldValue>,
    pub errors: Vec<BibTeXParseError>,
}

impl BibTeXParseResult {
    /// Whether any entry failed to parse
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Error type for parsing failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid syntax")]
    InvalidSyntax,
}

/// Parse a BibTeX string
pub fn parse(input: &str) -> Result<BibTeXParseResult, ParseError> {
    parse_bibtex(input)
}

/// Parse a single BibTeX entry
pub fn parse_entry(input: &str) -> Result<BibTeXEntry, ParseError> {
    let result = parse_bibtex(input)?;
    result
        .entries
        .into_iter()
        .next()
        .ok_or(ParseError::InvalidSyntax)
}

/// Internal parsing function
fn parse_bibtex(input: &str) -> Result<BibTeXParseResult, ParseError> {
    let mut result = BibTeXParseResult::default();

    let mut remaining = input;
    let mut current_line = 1u32;

    while !remaining.is_empty() {
        // Skip whitespace and count newlines
        let (rest, skipped) = skip_whitespace_and_comments(remaining);
        current_line += count_lines(skipped);
        remaining = rest;

        if remaining.is_empty() {
            break;
        }

        if remaining.starts_with('@') {
            match parse_at_entry(remaining) {
                Ok((rest, entry_result)) => {
                    match entry_result {
                        AtEntry::Entry(entry) => result.entries.push(entry),
                        AtEntry::String(key, value) => {
                            result.strings.insert(key, value);
                        }
                        AtEntry::Preamble(value) => result.preambles.push(value),
                        AtEntry::Comment => {}
                    }
                    let consumed = &remaining[..remaining.len() - rest.len()];
                    current_line += count_lines(consumed);
                    remaining = rest;
                }
                Err(_) => {
                    // Record error and try to recover
                    result.errors.push(BibTeXParseError {
                        line: current_line,
                        column: 1,
                        message: format!("Failed to parse entry: {}", first_line(remaining)),
                    });
                    // Skip to next @ or end
                    match remaining[1..].find('@') {
                        Some(pos) => {
                            current_line += count_lines(&remaining[..pos + 1]);
                            remaining = &remaining[pos + 1..];
                        }
                        None => break,
                    }
                }
            }
        } else {
            // Skip to next @ or end
            match remaining.find('@') {
                Some(pos) => {
                    current_line += count_lines(&remaining[..pos]);
                    remaining = &remaining[pos..];
                }
                None => break,
            }
        }
    }

    Ok(result)
}

fn count_lines(text: &str) -> u32 {
    text.matches('\n').count() as u32
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or(text).trim()
}

/// Result of parsing an @ entry
enum AtEntry {
    Entry(BibTeXEntry),
    String(String, FieldValue),
    Preamble(FieldValue),
    Comment,
}

/// Skip whitespace and comments, return remaining input and skipped text
fn skip_whitespace_and_comments(input: &str) -> (&str, &str) {
    let mut pos = 0;
    let bytes = input.as_bytes();

    while pos < bytes.len() {
        if bytes[pos].is_ascii_whitespace() {
            pos += 1;
        } else if bytes[pos] == b'%' {
            // Line comment
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
        } else {
            break;
        }
    }

    (&input[pos..], &input[..pos])
}

/// Parse an @ entry (entry, string, preamble, or comment)
fn parse_at_entry(input: &str) -> IResult<&str, AtEntry> {
    let (rest, _) = char('@')(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, entry_type) = take_while1(|c: char| c.is_ascii_alphanumeric())(rest)?;

    match entry_type.to_lowercase().as_str() {
        "string" => {
            let (rest, (key, value)) = parse_string_definition(rest)?;
            Ok((rest, AtEntry::String(key, value)))
        }
        "preamble" => {
            let (rest, value) = parse_preamble(rest)?;
            Ok((rest, AtEntry::Preamble(value)))
        }
        "comment" => {
            let (rest, _) = parse_comment_body(rest)?;
            Ok((rest, AtEntry::Comment))
        }
        _ => {
            let (rest, entry) = parse_entry_body(rest, entry_type)?;
            Ok((rest, AtEntry::Entry(entry)))
        }
    }
}

/// Opening delimiter of an @ block: `{` or `(`, returning the matching closer
fn parse_open_delimiter(input: &str) -> IResult<&str, char> {
    let (rest, _) = multispace0(input)?;
    if let Some(rest) = rest.strip_prefix('{') {
        Ok((rest, '}'))
    } else {
        let (rest, _) = char('(')(rest)?;
        Ok((rest, ')'))
    }
}

/// Parse a @string definition, in either `@string{...}` or `@String(...)` form
fn parse_string_definition(input: &str) -> IResult<&str, (String, FieldValue)> {
    let (rest, close) = parse_open_delimiter(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, key) = take_while1(is_identifier_char)(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, value) = parse_field_value(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(close)(rest)?;

    Ok((rest, (key.to_lowercase(), value)))
}

/// Parse a @preamble
fn parse_preamble(input: &str) -> IResult<&str, FieldValue> {
    let (rest, close) = parse_open_delimiter(input)?;
    let (rest, value) = parse_field_value(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(close)(rest)?;

    Ok((rest, value))
}

/// Parse a @comment body (skip everything in braces or to end of line)
fn parse_comment_body(input: &str) -> IResult<&str, ()> {
    let (rest, _) = multispace0(input)?;
    if rest.starts_with('{') {
        let (rest, _) = parse_braced_content(rest)?;
        Ok((rest, ()))
    } else {
        // Skip to end of line
        let pos = rest.find('\n').unwrap_or(rest.len());
        Ok((&rest[pos..], ()))
    }
}

/// Parse an entry body
fn parse_entry_body<'a>(input: &'a str, entry_type: &str) -> IResult<&'a str, BibTeXEntry> {
    let (rest, close) = parse_open_delimiter(input)?;
    let (rest, _) = multispace0(rest)?;

    // Cite key runs up to whitespace or a delimiter; non-ASCII keys are allowed
    let (rest, cite_key) = take_while1(is_cite_key_char)(rest)?;
    let (rest, _) = multispace0(rest)?;
    // Entries without fields may omit the comma
    let rest = rest.strip_prefix(',').unwrap_or(rest);

    // Parse fields
    let (rest, fields) = parse_fields(rest, close)?;

    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(close)(rest)?;

    let mut entry = BibTeXEntry::new(cite_key, BibTeXEntryType::from_str(entry_type));
    for (key, value) in fields {
        entry.set_field(key, value);
    }

    Ok((rest, entry))
}

/// Parse fields within an entry
fn parse_fields(input: &str, close: char) -> IResult<&str, Vec<(String, FieldValue)>> {
    let mut fields = Vec::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0(remaining)?;

        // Check for end of entry
        if rest.starts_with(close) {
            return Ok((rest, fields));
        }

        // Try to parse a field
        match parse_single_field(rest) {
            Ok((rest, (key, value))) => {
                fields.push((key, value));
                remaining = rest;

                // Skip optional comma
                let (rest, _) = multispace0(remaining)?;
                remaining = rest.strip_prefix(',').unwrap_or(rest);
            }
            Err(_) => {
                // No more fields
                return Ok((remaining, fields));
            }
        }
    }
}

fn is_cite_key_char(c: char) -> bool {
    !c.is_whitespace() && !",{}()=\"#".contains(c)
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_-.:+/".contains(c)
}

/// Parse a single field (key = value)
fn parse_single_field(input: &str) -> IResult<&str, (String, FieldValue)> {
    let (rest, _) = multispace0(input)?;
    let (rest, key) = take_while1(is_identifier_char)(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, value) = parse_field_value(rest)?;

    Ok((rest, (key.to_lowercase(), value)))
}

/// Parse a field value: one or more `#`-joined braced, quoted, numeric or
/// macro-name parts
fn parse_field_value(input: &str) -> IResult<&str, FieldValue> {
    let mut parts = Vec::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0(remaining)?;
        let (rest, part) = parse_value_part(rest)?;
        parts.push(part);
        remaining = rest;

        // Check for concatenation
        let (rest, _) = multispace0(remaining)?;
        if let Some(stripped) = rest.strip_prefix('#') {
            remaining = stripped;
        } else {
            return Ok((rest, FieldValue::from_parts(parts)));
        }
    }
}

fn parse_value_part(input: &str) -> IResult<&str, ValuePart> {
    if input.starts_with('{') {
        let (rest, text) = parse_braced_value(input)?;
        return Ok((rest, ValuePart::Literal(text)));
    }
    if input.starts_with('"') {
        let (rest, text) = parse_quoted_value(input)?;
        return Ok((rest, ValuePart::Literal(text)));
    }
    let (rest, word) = take_while1(is_identifier_char)(input)?;
    if word.chars().all(|c| c.is_ascii_digit()) {
        Ok((rest, ValuePart::Literal(word.to_string())))
    } else {
        Ok((rest, ValuePart::Reference(word.to_string())))
    }
}

/// Parse a braced value {content}
fn parse_braced_value(input: &str) -> IResult<&str, String> {
    let (rest, content) = parse_braced_content(input)?;
    // Remove outer braces
    let inner = &content[1..content.len() - 1];
    Ok((rest, inner.to_string()))
}

/// Parse braced content including nested braces
fn parse_braced_content(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('{') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }

    let mut depth = 0;
    let mut pos = 0;
    let bytes = input.as_bytes();

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[pos + 1..], &input[..pos + 1]));
                }
            }
            b'\\' => {
                // Skip escaped character
                pos += 1;
            }
            _ => {}
        }
        pos += 1;
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

/// Parse a quoted value "content"
fn parse_quoted_value(input: &str) -> IResult<&str, String> {
    if !input.starts_with('"') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }

    let mut pos = 1; // Skip opening quote
    let bytes = input.as_bytes();
    let mut brace_depth = 0i32;

    while pos < bytes.len() {
        match bytes[pos] {
            b'"' if brace_depth == 0 => {
                return Ok((&input[pos + 1..], input[1..pos].to_string()));
            }
            b'{' => brace_depth += 1,
            b'}' => brace_depth -= 1,
            b'\\' => {
                // Keep the escape, skip the escaped byte
                pos += 1;
            }
            _ => {}
        }
        pos += 1;
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}
