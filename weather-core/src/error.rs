use thiserror::Error;

/// Every way a lookup can end without a result.
///
/// The `Display` text of each variant is the exact message shown to the user.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Empty or whitespace-only input; detected before any network activity.
    #[error("Bitte gib eine Stadt ein.")]
    EmptyQuery,

    /// The upstream service does not know the requested city.
    #[error("Stadt nicht gefunden. Bitte prüfe deine Eingabe.")]
    NotFound,

    #[error("Fehler beim Abrufen der Wetterdaten.")]
    Transport(#[source] TransportError),
}

/// Technical cause behind [`LookupError::Transport`]. Logged, never displayed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed weather payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("weather payload contained no conditions")]
    NoConditions,

    #[error("lookup was dropped before it resolved")]
    Abandoned,
}

impl LookupError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<TransportError> for LookupError {
    fn from(err: TransportError) -> Self {
        LookupError::Transport(err)
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Transport(err.into())
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Transport(err.into())
    }
}
