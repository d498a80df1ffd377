//! Request type handed to controllers.

use std::collections::HashMap;

use foo_router::Bindings;

/// A dispatched request.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// The path as received, including any base URL.
    pub path: String,
    /// The path the route tree was resolved against.
    pub route_path: String,
    /// Variables bound by the matched route.
    pub params: Bindings,
    /// Query string parameters.
    pub query: HashMap<String, String>,
}

impl Request {
    /// Splits a raw request URI into path and query, stripping `base_url`.
    ///
    /// Returns `None` when the path is not under `base_url`.
    #[must_use]
    pub fn from_uri(uri: &str, base_url: &str) -> Option<Self> {
        let (path, query) = uri.split_once('?').unwrap_or((uri, ""));
        let route_path = strip_base(path, base_url)?;
        Some(Self {
            path: path.to_string(),
            route_path: route_path.to_string(),
            params: Bindings::new(),
            query: Self::parse_query_string(query),
        })
    }

    /// Gets a route parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Gets a query parameter.
    #[must_use]
    pub fn get_query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Parses query parameters from a query string.
    #[must_use]
    pub fn parse_query_string(query: &str) -> HashMap<String, String> {
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (urlencoding_decode(key), urlencoding_decode(value))
            })
            .collect()
    }
}

/// Strips `base` from the front of `path` on a segment boundary.
fn strip_base<'a>(path: &'a str, base: &str) -> Option<&'a str> {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return Some(path);
    }
    let rest = path.strip_prefix(base)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

/// Simple URL decoding.
fn urlencoding_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                match std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                        continue;
                    }
                    None => out.push(b'%'),
                }
            }
            b'+' => out.push(b' '),
            b => out.push(b),
        }
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}
