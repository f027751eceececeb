use crate::errors::AppError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::{fmt, str::FromStr};

pub const IDENTITY_HEADER: &str = "x-device-id";
const MAX_LEN: usize = 64;

/// Namespace for one user's or device's persisted data.
///
/// Limited to ASCII alphanumerics, `-` and `_` so it is safe as a directory name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identity {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let valid = !value.is_empty()
            && value.len() <= MAX_LEN
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AppError::bad_request(format!(
                "{IDENTITY_HEADER} must be 1-{MAX_LEN} characters of [A-Za-z0-9_-]"
            )));
        }
        Ok(Self(value.to_string()))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match parts.headers.get(IDENTITY_HEADER) {
            Some(value) => value
                .to_str()
                .map_err(|_| AppError::bad_request(format!("{IDENTITY_HEADER} is not valid text")))?
                .parse(),
            None => Ok(state.default_identity.clone()),
        }
    }
}
