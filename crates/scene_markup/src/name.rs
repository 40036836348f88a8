//! Name encoding
//!
//! Property names come from the host and may contain characters that are not
//! legal in XML names. They are escaped the way .NET's `XmlConvert.EncodeName`
//! does: each offending character becomes `_xHHHH_`.

use std::fmt::Write;

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_numeric() || c == '-' || c == '.'
}

fn push_escaped(out: &mut String, c: char) {
    let mut units = [0u16; 2];
    for unit in c.encode_utf16(&mut units) {
        let _ = write!(out, "_x{:04X}_", unit);
    }
}

/// Escape a string so it forms a valid XML name
pub fn encode_name(raw: &str) -> String {
    if raw.is_empty() {
        return "_".to_string();
    }
    let mut out = String::with_capacity(raw.len());
    for (i, c) in raw.chars().enumerate() {
        let valid = if i == 0 { is_name_start(c) } else { is_name_char(c) };
        if valid {
            out.push(c);
        } else {
            push_escaped(&mut out, c);
        }
    }
    out
}

/// Escape an attribute name; spaces collapse to a plain underscore
pub fn encode_attribute_name(raw: &str) -> String {
    encode_name(raw).replace("_x0020_", "_")
}

/// XML 1.0 `Char` production
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Escape characters XML cannot carry in text or attribute values as `_xHHHH_`
pub fn encode_text(raw: &str) -> String {
    if raw.chars().all(is_xml_char) {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len() + 8);
    for c in raw.chars() {
        if is_xml_char(c) {
            out.push(c);
        } else {
            push_escaped(&mut out, c);
        }
    }
    out
}

/// Join a prefix and a local name
pub fn qualify(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(p) if !p.is_empty() => format!("{}:{}", p, local),
        _ => local.to_string(),
    }
}

/// Local part of a possibly prefixed name
pub fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names_pass_through() {
        assert_eq!(encode_name("GameObject"), "GameObject");
        assert_eq!(encode_name("m_Speed"), "m_Speed");
        assert_eq!(encode_name("value-abbreviation"), "value-abbreviation");
    }

    #[test]
    fn test_invalid_characters_escaped() {
        assert_eq!(encode_name("1st"), "_x0031_st");
        assert_eq!(encode_name("a b"), "a_x0020_b");
        assert_eq!(encode_name("items[0]"), "items_x005B_0_x005D_");
        assert_eq!(encode_name(""), "_");
    }

    #[test]
    fn test_attribute_names_collapse_spaces() {
        assert_eq!(encode_attribute_name("Max Speed"), "Max_Speed");
    }

    #[test]
    fn test_forbidden_text_characters_escaped() {
        assert_eq!(encode_text("a\u{1}b"), "a_x0001_b");
        assert_eq!(encode_text("\u{FFFE}"), "_xFFFE_");
        assert_eq!(encode_text("tab\tline\n"), "tab\tline\n");
        assert_eq!(encode_text("plain ünïcode 🦀"), "plain ünïcode 🦀");
    }

    #[test]
    fn test_qualify_and_local_part() {
        assert_eq!(qualify(Some("unity"), "Scene"), "unity:Scene");
        assert_eq!(qualify(None, "Scene"), "Scene");
        assert_eq!(qualify(Some(""), "Scene"), "Scene");
        assert_eq!(local_part("unity:Scene"), "Scene");
        assert_eq!(local_part("Scene"), "Scene");
    }
}
