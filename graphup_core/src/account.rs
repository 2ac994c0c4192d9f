use crate::error::GraphError;

/// Source of the access token attached to every request.
///
/// Token acquisition and refresh happen elsewhere; the transfer executor only
/// reads the current value right before each call.
pub trait AccountProvider: Send + Sync {
    fn access_token(&self) -> String;
}

/// A fixed token, e.g. passed on the command line.
#[derive(Debug, Clone)]
pub struct StaticAccount {
    token: String,
}

impl StaticAccount {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl AccountProvider for StaticAccount {
    fn access_token(&self) -> String {
        self.token.clone()
    }
}

/// Reads `GRAPHUP_ACCESS_TOKEN` on every call so an external process can
/// rotate the token between requests.
#[derive(Debug, Clone, Copy)]
pub struct EnvAccount;

impl EnvAccount {
    pub const VAR: &'static str = "GRAPHUP_ACCESS_TOKEN";

    /// Fails when the variable is unset or empty at construction time.
    pub fn from_env() -> Result<Self, GraphError> {
        match std::env::var(Self::VAR) {
            Ok(token) if !token.trim().is_empty() => Ok(Self),
            _ => Err(GraphError::MissingAccessToken),
        }
    }
}

impl AccountProvider for EnvAccount {
    fn access_token(&self) -> String {
        std::env::var(Self::VAR).unwrap_or_default()
    }
}
