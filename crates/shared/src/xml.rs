//! XML codec for command documents.
//!
//! Only the shape the protocol uses is supported: one `<command>` root with
//! string attributes and optional text-only child elements. No namespaces,
//! comments, CDATA or nested children.

use crate::command::{CommandDocument, TextElement, COMMAND_ROOT, TYPE_ATTRIBUTE};
use crate::error::ProtocolError;

/// Intermediate parse result; `CommandDocument::parse` wraps it.
#[derive(Debug)]
pub(crate) struct ParsedCommand {
    pub kind: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<TextElement>,
}

/// ASCII subset of the XML `Name` production.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

pub fn serialize(doc: &CommandDocument) -> String {
    let mut out = String::with_capacity(64);
    out.push('<');
    out.push_str(COMMAND_ROOT);
    write_attr(&mut out, TYPE_ATTRIBUTE, doc.kind());
    for (name, value) in doc.attributes() {
        write_attr(&mut out, name, value);
    }

    let children = doc.text_elements();
    if children.is_empty() {
        out.push_str("/>");
        return out;
    }

    out.push('>');
    for child in children {
        out.push('<');
        out.push_str(&child.name);
        out.push('>');
        escape_text(&mut out, &child.text);
        out.push_str("</");
        out.push_str(&child.name);
        out.push('>');
    }
    out.push_str("</");
    out.push_str(COMMAND_ROOT);
    out.push('>');
    out
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_attr(out, value);
    out.push('"');
}

// Whitespace control characters are escaped too, attribute value
// normalization would otherwise turn them into spaces.
fn escape_attr(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            c => out.push(c),
        }
    }
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            c => out.push(c),
        }
    }
}

pub(crate) fn parse(text: &str) -> Result<ParsedCommand, ProtocolError> {
    let mut cursor = Cursor { src: text, pos: 0 };
    cursor.skip_whitespace();
    if cursor.rest().starts_with("<?") {
        let end = cursor
            .rest()
            .find("?>")
            .ok_or_else(|| cursor.error("unterminated declaration"))?;
        cursor.pos += end + 2;
        cursor.skip_whitespace();
    }

    cursor.expect('<')?;
    let root = cursor.name()?;
    if root != COMMAND_ROOT {
        return Err(cursor.error(format!("expected <{COMMAND_ROOT}>, found <{root}>")));
    }

    let mut kind = None;
    let mut attributes = Vec::new();
    let self_closing = loop {
        cursor.skip_whitespace();
        if cursor.eat("/>") {
            break true;
        }
        if cursor.eat(">") {
            break false;
        }
        let name = cursor.name()?;
        cursor.skip_whitespace();
        cursor.expect('=')?;
        cursor.skip_whitespace();
        let value = cursor.quoted()?;
        if name == TYPE_ATTRIBUTE {
            kind = Some(value);
        } else if attributes.iter().any(|(n, _)| *n == name) {
            return Err(cursor.error(format!("duplicate attribute '{name}'")));
        } else {
            attributes.push((name, value));
        }
    };

    let mut children = Vec::new();
    if !self_closing {
        loop {
            cursor.skip_whitespace();
            if cursor.eat("</") {
                let close = cursor.name()?;
                if close != COMMAND_ROOT {
                    return Err(cursor.error(format!("mismatched </{close}>")));
                }
                cursor.skip_whitespace();
                cursor.expect('>')?;
                break;
            }
            cursor.expect('<')?;
            let name = cursor.name()?;
            cursor.expect('>')?;
            let end = cursor
                .rest()
                .find('<')
                .ok_or_else(|| cursor.error("unterminated text element"))?;
            let raw = &cursor.rest()[..end];
            let text = unescape(raw).map_err(|m| cursor.error(m))?;
            cursor.pos += end;
            cursor.expect_str("</")?;
            let close = cursor.name()?;
            if close != name {
                return Err(cursor.error(format!("expected </{name}>, found </{close}>")));
            }
            cursor.expect('>')?;
            children.push(TextElement { name, text });
        }
    }

    cursor.skip_whitespace();
    if !cursor.rest().is_empty() {
        return Err(cursor.error("trailing content after root element"));
    }

    let kind = kind.ok_or_else(|| cursor.error("missing 'type' attribute"))?;
    Ok(ParsedCommand {
        kind,
        attributes,
        children,
    })
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn error(&self, message: impl Into<String>) -> ProtocolError {
        ProtocolError::xml(self.pos, message)
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), ProtocolError> {
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            Ok(())
        } else {
            Err(self.error(format!("expected '{c}'")))
        }
    }

    fn expect_str(&mut self, token: &str) -> Result<(), ProtocolError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{token}'")))
        }
    }

    fn name(&mut self) -> Result<String, ProtocolError> {
        let len = self
            .rest()
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
            .unwrap_or(self.rest().len());
        let name = &self.rest()[..len];
        if !is_valid_name(name) {
            return Err(self.error("expected a name"));
        }
        self.pos += len;
        Ok(name.to_string())
    }

    fn quoted(&mut self) -> Result<String, ProtocolError> {
        let quote = match self.rest().chars().next() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error("expected quoted value")),
        };
        self.pos += 1;
        let end = self
            .rest()
            .find(quote)
            .ok_or_else(|| self.error("unterminated attribute value"))?;
        let raw = &self.rest()[..end];
        if raw.contains('<') {
            return Err(self.error("'<' in attribute value"));
        }
        let value = unescape(raw).map_err(|m| self.error(m))?;
        self.pos += end + 1;
        Ok(value)
    }
}

fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp + 1..];
        let semi = rest
            .find(';')
            .ok_or_else(|| "unterminated entity".to_string())?;
        let entity = &rest[..semi];
        match entity {
            "amp" => out.push('&'),
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "quot" => out.push('"'),
            "apos" => out.push('\''),
            _ => {
                let code = if let Some(hex) = entity.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = entity.strip_prefix('#') {
                    dec.parse::<u32>().ok()
                } else {
                    None
                };
                let c = code
                    .and_then(char::from_u32)
                    .ok_or_else(|| format!("unknown entity '&{entity};'"))?;
                out.push(c);
            }
        }
        rest = &rest[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
