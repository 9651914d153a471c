//! Shared URL/form parsing and HTML helpers for route handlers.

use crate::error::QuestError;
use crate::quest::sections::SectionKey;

/// Parse URL-encoded form body into key-value pairs.
/// Handles `key=value&key2=value2` format (from HTMX POST bodies).
pub fn parse_form_body(body: &str) -> Vec<(String, String)> {
    if body.is_empty() {
        return Vec::new();
    }
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or("");
            let val = parts.next().unwrap_or("");
            (percent_decode(key), percent_decode(val))
        })
        .collect()
}

/// Percent-decode a URL-encoded value. Decoded bytes are reassembled as
/// UTF-8 so captions with emoji survive.
pub fn percent_decode(input: &str) -> String {
    let mut bytes = Vec::with_capacity(input.len());
    let mut iter = input.bytes();
    while let Some(b) = iter.next() {
        match b {
            b'%' => {
                let hi = iter.next();
                let lo = iter.next();
                match (hi.and_then(hex_val), lo.and_then(hex_val)) {
                    (Some(h), Some(l)) => bytes.push(h << 4 | l),
                    _ => {
                        bytes.push(b'%');
                        bytes.extend(hi);
                        bytes.extend(lo);
                    }
                }
            }
            b'+' => bytes.push(b' '),
            _ => bytes.push(b),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Parse a query string into key-value pairs.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let q = query.strip_prefix('?').unwrap_or(query);
    parse_form_body(q)
}

/// Helper to get a value by key from a list of key-value pairs.
pub fn get_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Read and validate the `section` parameter.
pub fn section_param(params: &[(String, String)]) -> Result<SectionKey, QuestError> {
    get_param(params, "section").unwrap_or("").parse()
}

/// Escape text for safe inclusion in HTML content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a value for a single-quoted JS string inside an HTML attribute.
/// Line terminators are escaped too; a raw one ends the JS literal.
pub fn escape_js_attr(input: &str) -> String {
    let mut js = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => js.push_str("\\\\"),
            '\'' => js.push_str("\\'"),
            '\n' => js.push_str("\\n"),
            '\r' => js.push_str("\\r"),
            '\u{2028}' => js.push_str("\\u2028"),
            '\u{2029}' => js.push_str("\\u2029"),
            _ => js.push(c),
        }
    }
    escape_html(&js)
}

/// Standard red error line.
pub fn error_html(msg: &str) -> String {
    format!(
        r#"<span class="text-quest-red text-sm">{}</span>"#,
        escape_html(msg)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_form_body_works() {
        let pairs = parse_form_body("section=dinner&place=Flevor&x=1");
        assert_eq!(pairs.len(), 3);
        assert_eq!(get_param(&pairs, "section"), Some("dinner"));
        assert_eq!(get_param(&pairs, "place"), Some("Flevor"));
    }

    #[test]
    fn parse_form_body_empty() {
        assert!(parse_form_body("").is_empty());
    }

    #[test]
    fn percent_decode_plus_as_space() {
        assert_eq!(percent_decode("Best+pasta+ever"), "Best pasta ever");
    }

    #[test]
    fn percent_decode_hex() {
        assert_eq!(percent_decode("At%20First%20Date"), "At First Date");
    }

    #[test]
    fn percent_decode_utf8() {
        assert_eq!(percent_decode("manis%20%F0%9F%8D%AB"), "manis \u{1F36B}");
    }

    #[test]
    fn percent_decode_keeps_bad_escape() {
        assert_eq!(percent_decode("100%zz"), "100%zz");
    }

    #[test]
    fn parse_query_strips_prefix() {
        let pairs = parse_query("?section=secret");
        assert_eq!(get_param(&pairs, "section"), Some("secret"));
    }

    #[test]
    fn section_param_rejects_unknown() {
        let pairs = parse_form_body("section=brunch");
        assert!(section_param(&pairs).is_err());
        assert!(section_param(&[]).is_err());
    }

    #[test]
    fn escape_html_specials() {
        assert_eq!(escape_html(r#"<b>"I'M" & you</b>"#), "&lt;b&gt;&quot;I&#39;M&quot; &amp; you&lt;/b&gt;");
    }

    #[test]
    fn escape_js_attr_quotes() {
        assert_eq!(escape_js_attr("I'M FULL"), r"I\&#39;M FULL");
    }

    #[test]
    fn escape_js_attr_line_terminators() {
        let out = escape_js_attr("Best pasta\never\r\nand \u{2028}more\u{2029}");
        assert_eq!(out, r"Best pasta\never\r\nand \u2028more\u2029");
        assert!(!out.contains('\n'));
        assert!(!out.contains('\r'));
    }

    #[test]
    fn escape_js_attr_backslash() {
        assert_eq!(escape_js_attr(r"a\b"), r"a\\b");
    }
}
