//! The HTTP request a connection was upgraded from.

/// Path and query string of the request that opened a connection.
///
/// Lobby selection is driven entirely by the query string, so it is kept
/// verbatim and decoded on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectRequest {
    path: String,
    query: Option<String>,
}

impl ConnectRequest {
    /// Creates a request from a path and an optional raw query string
    /// (without the leading `?`).
    pub fn new(path: impl Into<String>, query: Option<&str>) -> Self {
        Self {
            path: path.into(),
            query: query.map(str::to_owned),
        }
    }

    /// The request path, e.g. `/ws`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw query string, if any.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Decoded `key=value` pairs in the order they appear.
    ///
    /// Uses form encoding rules: `+` is a space and `%XX` escapes are
    /// decoded. Repeated keys yield repeated pairs.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        match &self.query {
            Some(query) => form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
            None => Vec::new(),
        }
    }
}
