use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

const DEFAULT_DELIMITER: &str = "&";

/// Append `lines` to the query of `url`, joined by `delimiter` (`&` if unset).
///
/// Leaves `url` alone when it has no query and there are no lines.
pub fn apply(url: &mut Url, lines: &[String], delimiter: Option<&str>) {
    let existing = url.query().unwrap_or_default();
    if existing.is_empty() && lines.is_empty() {
        return;
    }
    let delimiter = delimiter.unwrap_or(DEFAULT_DELIMITER);

    let mut parts: Vec<&str> = Vec::with_capacity(lines.len() + 1);
    if !existing.is_empty() {
        parts.push(existing);
    }
    parts.extend(lines.iter().map(String::as_str));
    let query = encode_query(&parts.join(delimiter), delimiter);

    url.set_query(Some(&query));
}

/// Percent-encode a query string.
///
/// With an empty delimiter, or no `=` anywhere, the whole string is one
/// opaque value. Otherwise each `key=value` pair (split on the first `=`)
/// has its key and value encoded separately.
pub fn encode_query(query: &str, delimiter: &str) -> String {
    if delimiter.is_empty() || !query.contains('=') {
        return escape(query);
    }
    query
        .split(delimiter)
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => format!("{}={}", escape(key), escape(value)),
            None => escape(pair),
        })
        .collect::<Vec<_>>()
        .join(delimiter)
}

/// Everything but `A-Z a-z 0-9 +` is encoded.
const QUERY_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'+');

/// Keep `A-Z a-z 0-9 +` and valid `%XX` escapes, turn space into `+`, and
/// write every other byte as uppercase `%XX`.
pub fn escape(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    let mut plain = 0;
    let mut i = 0;

    while i < bytes.len() {
        let valid_escape = bytes[i] == b'%'
            && bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
            && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
        if valid_escape {
            encode_into(&mut out, &s[plain..i]);
            out.push_str(&s[i..i + 3]);
            i += 3;
            plain = i;
        } else {
            i += 1;
        }
    }
    encode_into(&mut out, &s[plain..]);
    out
}

fn encode_into(out: &mut String, text: &str) {
    out.extend(utf8_percent_encode(&text.replace(' ', "+"), QUERY_SET));
}
