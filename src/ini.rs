//! INI text reading and writing.
//!
//! The format handled here:
//!
//! ```text
//! ; comment
//! # comment
//! [Config]
//! Name = prod
//! Threshold = 0.75
//! Note =
//! Motto = "  padded, with a \"quote\"  "
//!
//! [Config.Sub]
//! Enabled = True
//! ```
//!
//! - `[Name]` opens a section; the name is kept verbatim, dots included
//! - `key = value` splits at the first `=`; key and value are trimmed
//! - A bare `key =` is a key with a null payload, `key = ""` is an empty string
//! - Double quotes preserve surrounding whitespace and allow the escapes
//!   `\\`, `\"`, `\n`, `\r`, `\t` and `\0`
//! - Comment lines start with `;` or `#`; there are no inline comments
//!
//! Text is never interpreted as a typed value at this layer.

use crate::{Error, IniOptions, Result, Section, SectionTree};

/// Parses INI text into a [`SectionTree`].
///
/// Repeated headers for the same section merge into one section.
///
/// # Errors
///
/// Returns [`Error::Syntax`] with the line and column of the first problem: a key
/// before any section header, a line that is neither header, comment nor
/// `key = value`, an empty key, an unterminated header or quoted value, an unknown
/// escape, or a key repeated within a section.
///
/// # Examples
///
/// ```rust
/// use serde_ini_tree::parse_sections;
///
/// let tree = parse_sections("[Config]\nName = prod\n\n[Config.Sub]\nEnabled = True\n").unwrap();
/// assert_eq!(tree.value("Config", "Name"), Some("prod"));
/// assert_eq!(tree.value("Config.Sub", "Enabled"), Some("True"));
/// ```
pub fn parse_sections(input: &str) -> Result<SectionTree> {
    let mut tree = SectionTree::new();
    let mut current: Option<String> = None;

    for (index, raw_line) in input.split('\n').enumerate() {
        let line_no = index + 1;
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        let content = line.trim();
        let col = line.len() - line.trim_start().len() + 1;

        if content.is_empty() || content.starts_with(';') || content.starts_with('#') {
            continue;
        }

        if let Some(header) = content.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or_else(|| Error::syntax(line_no, col, "unterminated section header", line))?
                .trim();
            if name.is_empty() {
                return Err(Error::syntax(line_no, col, "empty section name", line));
            }
            tree.section_mut(name);
            current = Some(name.to_string());
            continue;
        }

        let (key, value) = content.split_once('=').ok_or_else(|| {
            Error::syntax(line_no, col, "expected `[section]` or `key = value`", line)
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::syntax(line_no, col, "empty key", line));
        }

        let section_name = current
            .as_deref()
            .ok_or_else(|| Error::syntax(line_no, col, "key outside of any section", line))?;

        let value_col = line.trim_end().len() - value.trim_start().len() + 1;
        let value = parse_value(value.trim(), line_no, value_col, line)?;

        let section = tree.section_mut(section_name);
        if section.contains_key(key) {
            return Err(Error::syntax(
                line_no,
                col,
                &format!("duplicate key `{}` in section [{}]", key, section_name),
                line,
            ));
        }
        section.insert(key, value);
    }

    tracing::debug!(sections = tree.len(), "parsed INI text");
    Ok(tree)
}

fn parse_value(text: &str, line_no: usize, col: usize, line: &str) -> Result<Option<String>> {
    if text.is_empty() {
        return Ok(None);
    }
    let Some(quoted) = text.strip_prefix('"') else {
        return Ok(Some(text.to_string()));
    };

    let mut result = String::with_capacity(quoted.len());
    let mut chars = quoted.char_indices();
    while let Some((offset, ch)) = chars.next() {
        match ch {
            '"' => {
                let rest = &quoted[offset + 1..];
                if !rest.trim().is_empty() {
                    return Err(Error::syntax(
                        line_no,
                        col + offset + 2,
                        "unexpected text after closing quote",
                        line,
                    ));
                }
                return Ok(Some(result));
            }
            '\\' => match chars.next() {
                Some((_, '\\')) => result.push('\\'),
                Some((_, '"')) => result.push('"'),
                Some((_, 'n')) => result.push('\n'),
                Some((_, 'r')) => result.push('\r'),
                Some((_, 't')) => result.push('\t'),
                Some((_, '0')) => result.push('\0'),
                _ => {
                    return Err(Error::syntax(
                        line_no,
                        col + offset + 1,
                        "invalid escape sequence in quoted value",
                        line,
                    ))
                }
            },
            _ => result.push(ch),
        }
    }

    Err(Error::syntax(line_no, col, "unterminated quoted value", line))
}

/// Writes a [`SectionTree`] as INI text.
///
/// Sections appear in tree order, separated by blank lines. Values are quoted only
/// when plain text would not read back identically.
///
/// # Errors
///
/// Returns [`Error::InvalidName`] for a section name or key that cannot be written
/// (empty, containing line breaks, a key containing `=`, a name containing `]`, or a
/// key that would read back as a comment or header).
///
/// # Examples
///
/// ```rust
/// use serde_ini_tree::{sections, write_sections, IniOptions};
///
/// let tree = sections! { "Config" => { "Name" => "prod", "Note" => null, "Empty" => "" } };
/// let text = write_sections(&tree, &IniOptions::new()).unwrap();
/// assert_eq!(text, "[Config]\nName = prod\nNote =\nEmpty = \"\"\n");
/// ```
pub fn write_sections(tree: &SectionTree, options: &IniOptions) -> Result<String> {
    let mut output = String::with_capacity(256);
    let assignment = options.assignment();

    for (index, (name, section)) in tree.iter().enumerate() {
        validate_section_name(name)?;
        if index > 0 {
            output.push('\n');
        }
        output.push('[');
        output.push_str(name);
        output.push_str("]\n");
        write_section(&mut output, name, section, assignment)?;
    }

    Ok(output)
}

fn write_section(output: &mut String, name: &str, section: &Section, assignment: &str) -> Result<()> {
    for (key, value) in section.iter() {
        validate_key(name, key)?;
        output.push_str(key);
        match value {
            Some(text) => {
                output.push_str(assignment);
                write_value(output, text);
            }
            None => output.push_str(assignment.trim_end()),
        }
        output.push('\n');
    }
    Ok(())
}

#[inline]
fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.starts_with(char::is_whitespace)
        || s.ends_with(char::is_whitespace)
        || s.starts_with('"')
        || s.contains(&['\n', '\r', '\t', '\0'][..])
}

fn write_value(output: &mut String, s: &str) {
    if !needs_quotes(s) {
        output.push_str(s);
        return;
    }

    output.push('"');
    for ch in s.chars() {
        match ch {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            '\0' => output.push_str("\\0"),
            _ => output.push(ch),
        }
    }
    output.push('"');
}

fn validate_section_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed != name || name.contains(&[']', '\n', '\r'][..]) {
        return Err(Error::invalid_name(format!(
            "section name {:?} cannot be written as an INI header",
            name
        )));
    }
    Ok(())
}

fn validate_key(section: &str, key: &str) -> Result<()> {
    let trimmed = key.trim();
    let invalid = trimmed.is_empty()
        || trimmed != key
        || key.contains(&['=', '\n', '\r'][..])
        || key.starts_with(&[';', '#', '['][..]);
    if invalid {
        return Err(Error::invalid_name(format!(
            "key {:?} in section [{}] cannot be written",
            key, section
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections;

    #[test]
    fn test_parse_basic() {
        let text = "; leading comment\r\n[Config]\r\nName = prod\r\n# another\r\n\r\n[Config.Sub]\r\nEnabled=True\r\n";
        let tree = parse_sections(text).unwrap();
        assert_eq!(
            tree,
            sections! {
                "Config" => { "Name" => "prod" },
                "Config.Sub" => { "Enabled" => "True" },
            }
        );
    }

    #[test]
    fn test_value_split_at_first_equals() {
        let tree = parse_sections("[S]\nurl = a=b=c\n").unwrap();
        assert_eq!(tree.value("S", "url"), Some("a=b=c"));
    }

    #[test]
    fn test_null_versus_empty() {
        let tree = parse_sections("[S]\nnull =\nempty = \"\"\n").unwrap();
        let section = tree.section("S").unwrap();
        assert_eq!(section.get("null"), Some(None));
        assert_eq!(section.get("empty"), Some(Some("")));
    }

    #[test]
    fn test_quoted_escapes() {
        let tree = parse_sections("[S]\nv = \"  a\\tb\\n\\\"c\\\" \\\\ \"  \n").unwrap();
        assert_eq!(tree.value("S", "v"), Some("  a\tb\n\"c\" \\ "));
    }

    #[test]
    fn test_repeated_header_merges() {
        let tree = parse_sections("[A]\nx = 1\n[B]\n[A]\ny = 2\n").unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.section("A").unwrap().len(), 2);
    }

    #[test]
    fn test_syntax_errors() {
        let cases = [
            ("x = 1\n", 1, "outside of any section"),
            ("[A\n", 1, "unterminated section header"),
            ("[]\n", 1, "empty section name"),
            ("[A]\njust text\n", 2, "expected"),
            ("[A]\n = 1\n", 2, "empty key"),
            ("[A]\nv = \"open\n", 2, "unterminated quoted value"),
            ("[A]\nv = \"a\\q\"\n", 2, "invalid escape"),
            ("[A]\nv = \"a\" b\n", 2, "after closing quote"),
            ("[A]\nv = 1\nv = 2\n", 3, "duplicate key"),
        ];
        for (text, expected_line, fragment) in cases {
            match parse_sections(text) {
                Err(Error::Syntax { line, msg, .. }) => {
                    assert_eq!(line, expected_line, "{:?}", text);
                    assert!(msg.contains(fragment), "{:?}: {}", text, msg);
                }
                other => panic!("Expected syntax error for {:?}, got {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_write_layout() {
        let tree = sections! {
            "Config" => { "Name" => "prod", "Threshold" => "0.75" },
            "Config.Sub" => { "Enabled" => "True" },
        };
        let text = write_sections(&tree, &IniOptions::new()).unwrap();
        assert_eq!(
            text,
            "[Config]\nName = prod\nThreshold = 0.75\n\n[Config.Sub]\nEnabled = True\n"
        );
    }

    #[test]
    fn test_write_compact_assignment() {
        let tree = sections! { "S" => { "a" => "1", "b" => null } };
        let options = IniOptions::new().with_spaced_assignment(false);
        assert_eq!(write_sections(&tree, &options).unwrap(), "[S]\na=1\nb=\n");
    }

    #[test]
    fn test_write_quotes_only_when_needed() {
        let tree = sections! {
            "S" => {
                "plain" => "a \"quoted\" word; # not a comment",
                "padded" => " x ",
                "lead" => "\"starts with quote",
                "multi" => "line1\nline2",
            },
        };
        let text = write_sections(&tree, &IniOptions::new()).unwrap();
        assert!(text.contains("plain = a \"quoted\" word; # not a comment\n"));
        assert!(text.contains("padded = \" x \"\n"));
        assert!(text.contains("lead = \"\\\"starts with quote\"\n"));
        assert!(text.contains("multi = \"line1\\nline2\"\n"));
        assert_eq!(parse_sections(&text).unwrap(), tree);
    }

    #[test]
    fn test_write_rejects_unrepresentable_names() {
        let bad_key = sections! { "S" => { "a=b" => "1" } };
        assert!(matches!(
            write_sections(&bad_key, &IniOptions::new()),
            Err(Error::InvalidName(_))
        ));

        let bad_section = sections! { "S]" => {} };
        assert!(matches!(
            write_sections(&bad_section, &IniOptions::new()),
            Err(Error::InvalidName(_))
        ));
    }
}
