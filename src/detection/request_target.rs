use percent_encoding::percent_decode_str;
use url::{form_urlencoded, Url};

use super::DetectionError;

/// Path and query of a logged request URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    path: String,
    query: Vec<(String, String)>,
}

impl RequestTarget {
    /// Decompose a logged URL such as `/balance?user_id=42`.
    ///
    /// The path is percent-decoded but otherwise kept as written: no dot
    /// segments are removed and relative paths stay relative. Absolute URLs
    /// are accepted as well; their host is checked and then ignored.
    pub fn parse(raw: &str) -> Result<Self, DetectionError> {
        let invalid = |reason: &str| DetectionError::InvalidUrl {
            url: raw.to_string(),
            reason: reason.to_string(),
        };

        let (rest, fragment) = raw.split_once('#').unwrap_or((raw, ""));
        if has_malformed_escape(fragment) {
            return Err(invalid("invalid URL escape in fragment"));
        }
        if rest.bytes().any(|b| b < 0x20 || b == 0x7f) {
            return Err(invalid("invalid control character in URL"));
        }

        let (before_query, query) = rest.split_once('?').unwrap_or((rest, ""));

        let path = match split_scheme(before_query).map_err(invalid)? {
            Some((_, hier)) if hier.starts_with("//") => {
                Url::parse(rest).map_err(|e| invalid(&e.to_string()))?;
                authority_path(hier)
            }
            // Opaque form such as `mailto:x` has no path
            Some((_, hier)) if !hier.starts_with('/') => "",
            Some((_, hier)) => hier,
            None if before_query.starts_with("//") => {
                Url::parse(&format!("http:{}", rest)).map_err(|e| invalid(&e.to_string()))?;
                authority_path(before_query)
            }
            None => {
                let first_segment = before_query.split('/').next().unwrap_or("");
                if first_segment.contains(':') {
                    return Err(invalid("first path segment in URL cannot contain colon"));
                }
                before_query
            }
        };

        if has_malformed_escape(path) {
            return Err(invalid("invalid URL escape in path"));
        }

        let query = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Ok(RequestTarget {
            path: percent_decode_str(path).decode_utf8_lossy().into_owned(),
            query,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// First value of a query parameter, if the parameter appears at all
    pub fn first_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Split `scheme:rest` when the input starts with a valid scheme
fn split_scheme(s: &str) -> Result<Option<(&str, &str)>, &'static str> {
    for (i, c) in s.char_indices() {
        match c {
            'a'..='z' | 'A'..='Z' => {}
            '0'..='9' | '+' | '-' | '.' if i > 0 => {}
            ':' if i == 0 => return Err("missing protocol scheme"),
            ':' => return Ok(Some((&s[..i], &s[i + 1..]))),
            _ => return Ok(None),
        }
    }
    Ok(None)
}

/// Path that follows `//authority`
fn authority_path(s: &str) -> &str {
    let after = &s[2..];
    match after.find('/') {
        Some(i) => &after[i..],
        None => "",
    }
}

/// A `%` not followed by two hex digits
fn has_malformed_escape(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return true;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    false
}
