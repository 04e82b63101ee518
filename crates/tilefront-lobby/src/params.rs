//! Lobby parameters carried on the connect request.

use tilefront_transport::ConnectRequest;

/// The lobby-related query parameters of a connection.
///
/// - `custom`: lobby key. Missing means the empty key, which is its own
///   lobby and is *not* the same as `"default"`.
/// - `players`: raw player-count hint, only consulted when the lobby is new.
/// - `option`: repeatable flags, kept in order.
///
/// For `custom` and `players` the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectParams {
    pub custom: String,
    pub players: Option<String>,
    pub options: Vec<String>,
}

impl ConnectParams {
    /// Collects parameters from decoded `key=value` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut custom = None;
        let mut players = None;
        let mut options = Vec::new();

        for (key, value) in pairs {
            match key.as_ref() {
                "custom" if custom.is_none() => custom = Some(value.into()),
                "players" if players.is_none() => players = Some(value.into()),
                "option" => options.push(value.into()),
                _ => {}
            }
        }

        Self {
            custom: custom.unwrap_or_default(),
            players,
            options,
        }
    }

    /// Decodes parameters from a connection's request query string.
    pub fn from_request(request: &ConnectRequest) -> Self {
        Self::from_pairs(request.query_pairs())
    }
}
