//! Entity and URL escaping.
//!
//! Text passed to [`Node::add`](crate::Node::add) and every rendered attribute
//! value go through [`escape`]. The other helpers are for callers that need to
//! round-trip markup or query strings by hand.

/// Named entities understood by [`unescape`].
///
/// `nbsp` decodes to a plain space.
const NAMED_ENTITIES: &[(&str, u32)] = &[
    ("quot", 34),
    ("amp", 38),
    ("lt", 60),
    ("gt", 62),
    ("nbsp", 32),
    ("yuml", 255),
];

/// Characters percent-encoded by [`url_escape`].
const URL_RESERVED: &[char] = &[';', '/', '?', ':', '@', '&', '=', '+', '$', ',', ' '];

/// Replace `&`, `<` and `>` with their entities, and `"` as well when `quote`
/// is set.
pub fn escape(data: &str, quote: bool) -> String {
    let mut out = String::with_capacity(data.len());
    for c in data.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quote => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Decode numeric character references and the small named-entity table.
///
/// Any other `&name;` sequence decodes to `?`, as does a numeric reference
/// that is not a valid code point. A `&` with no terminating `;` is kept.
pub fn unescape(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    let mut rest = data;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        if let Some((decoded, consumed)) = numeric_reference(after) {
            out.push(decoded);
            rest = &after[consumed..];
            continue;
        }

        match after.find(';') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                let decoded = NAMED_ENTITIES
                    .iter()
                    .find(|(n, _)| *n == name)
                    .and_then(|(_, cp)| char::from_u32(*cp))
                    .unwrap_or('?');
                out.push(decoded);
                rest = &after[end + 1..];
            }
            _ => {
                out.push('&');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Parse `#<digits>;` at the start of `s`, returning the decoded char and the
/// number of bytes consumed.
fn numeric_reference(s: &str) -> Option<(char, usize)> {
    let digits = s.strip_prefix('#')?;
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 || digits.as_bytes().get(len) != Some(&b';') {
        return None;
    }
    let decoded = digits[..len]
        .parse::<u32>()
        .ok()
        .and_then(char::from_u32)
        .unwrap_or('?');
    Some((decoded, 1 + len + 1))
}

/// Percent-encode the reserved characters `; / ? : @ & = + $ ,` and space.
pub fn url_escape(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    for c in data.chars() {
        if URL_RESERVED.contains(&c) {
            out.push_str(&format!("%{:02X}", c as u32));
        } else {
            out.push(c);
        }
    }
    out
}

/// Decode every `%XX` sequence to the code point `XX`.
///
/// Each escape is decoded on its own, so multi-byte UTF-8 sequences are not
/// reassembled. Malformed escapes are copied through unchanged.
pub fn url_unescape(data: &str) -> String {
    let bytes = data.as_bytes();
    let mut out = String::with_capacity(data.len());
    let mut last = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%'
            && let Some(hex) = data.get(i + 1..i + 3)
            && hex.bytes().all(|b| b.is_ascii_hexdigit())
            && let Ok(value) = u8::from_str_radix(hex, 16)
        {
            out.push_str(&data[last..i]);
            out.push(char::from(value));
            i += 3;
            last = i;
        } else {
            i += 1;
        }
    }

    out.push_str(&data[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_escape_all_specials() {
        assert_eq!(
            escape("<a href=\"x\">&", true),
            "&lt;a href=&quot;x&quot;&gt;&amp;"
        );
    }

    #[test]
    fn test_escape_without_quotes() {
        assert_eq!(escape("say \"hi\" & go", false), "say \"hi\" &amp; go");
    }

    #[test]
    fn test_unescape_named_and_numeric() {
        assert_eq!(unescape("&lt;b&gt; &amp; &#65;&#66;"), "<b> & AB");
        assert_eq!(unescape("&yuml;"), "\u{ff}");
    }

    #[test]
    fn test_unescape_unknown_entity() {
        assert_eq!(unescape("a &copy; b"), "a ? b");
    }

    #[test]
    fn test_unescape_unterminated_ampersand() {
        assert_eq!(unescape("fish & chips"), "fish & chips");
    }

    #[test]
    fn test_unescape_invalid_code_point() {
        assert_eq!(unescape("&#55296;"), "?");
    }

    #[test]
    fn test_escape_roundtrip() {
        let s = "if a < b && c > \"d\"; then";
        assert_eq!(unescape(&escape(s, true)), s);
    }

    #[test]
    fn test_url_escape() {
        assert_eq!(url_escape("a b&c=d/e"), "a%20b%26c%3Dd%2Fe");
        assert_eq!(url_escape("plain"), "plain");
    }

    #[test]
    fn test_url_unescape() {
        assert_eq!(url_unescape("a%20b%26c%3dd"), "a b&c=d");
        assert_eq!(url_unescape("100%"), "100%");
        assert_eq!(url_unescape("%zz"), "%zz");
    }
}
