//! Java `.properties` text parser
//!
//! Supports `#`/`!` comments, `=`/`:`/whitespace separators, backslash line
//! continuation and the usual escapes including `\uXXXX`. Later keys override
//! earlier ones.

use std::collections::HashMap;

use thiserror::Error;

const WHITESPACE: [char; 3] = [' ', '\t', '\x0c'];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PropertiesError {
    #[error("malformed \\uXXXX escape on line {line}")]
    MalformedUnicodeEscape { line: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: HashMap<String, String>,
}

impl Properties {
    pub fn parse(text: &str) -> Result<Self, PropertiesError> {
        let mut entries = HashMap::new();
        for (line, logical) in logical_lines(text) {
            let (raw_key, raw_value) = split_key_value(&logical);
            entries.insert(unescape(raw_key, line)?, unescape(raw_value, line)?);
        }
        Ok(Self { entries })
    }

    /// Decode bytes as ISO-8859-1, the encoding of `Properties.load(InputStream)`
    pub fn parse_latin1(bytes: &[u8]) -> Result<Self, PropertiesError> {
        let text: String = bytes.iter().map(|&b| b as char).collect();
        Self::parse(&text)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Join continued lines; yields (first line number, logical line)
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (index, natural) in text.lines().enumerate() {
        let trimmed = natural.trim_start_matches(WHITESPACE);
        if current.is_none()
            && (trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!'))
        {
            continue;
        }

        let trailing_backslashes = trimmed.chars().rev().take_while(|c| *c == '\\').count();
        let continues = trailing_backslashes % 2 == 1;
        let body = if continues {
            &trimmed[..trimmed.len() - 1]
        } else {
            trimmed
        };

        match current.as_mut() {
            Some((_, buffer)) => buffer.push_str(body),
            None => current = Some((index + 1, body.to_string())),
        }
        if !continues {
            if let Some(line) = current.take() {
                lines.push(line);
            }
        }
    }

    if let Some(line) = current {
        lines.push(line);
    }
    lines
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = index;
                break;
            }
            _ => {}
        }
    }

    let mut rest = line[key_end..].trim_start_matches(WHITESPACE);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped;
    }
    (&line[..key_end], rest.trim_start_matches(WHITESPACE))
}

fn unescape(raw: &str, line: usize) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let unit = read_code_unit(&mut chars, line)?;
                let decoded = if (0xD800..0xDC00).contains(&unit) {
                    // high surrogate, expect \uDC00..\uDFFF next
                    if chars.next() != Some('\\') || chars.next() != Some('u') {
                        return Err(PropertiesError::MalformedUnicodeEscape { line });
                    }
                    let low = read_code_unit(&mut chars, line)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(PropertiesError::MalformedUnicodeEscape { line });
                    }
                    char::from_u32(0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00))
                } else {
                    char::from_u32(unit)
                };
                out.push(decoded.ok_or(PropertiesError::MalformedUnicodeEscape { line })?);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

fn read_code_unit(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    line: usize,
) -> Result<u32, PropertiesError> {
    let mut unit = 0u32;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or(PropertiesError::MalformedUnicodeEscape { line })?;
        unit = unit * 16 + digit;
    }
    Ok(unit)
}
