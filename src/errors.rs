/*!
 * Error types for the wordlens application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use serde::Serialize;
use thiserror::Error;

use crate::providers::ProviderTag;

/// Broad classification of a provider failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Transport failure: DNS, connect, TLS, reset
    Network,
    /// The call did not finish inside its time budget
    Timeout,
    /// The provider has no code for the requested language
    UnsupportedLanguage,
    /// The provider answered with its own error code
    Provider,
    /// The response body could not be understood
    Parse,
}

/// Error reported by a single provider call
///
/// `code` is either the provider's own error code (e.g. Youdao `"207"`,
/// Baidu `"54001"`) or one of the local codes `"network"`, `"timeout"`,
/// `"unsupported_language"` and `"parse"`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{provider} request failed ({code}): {message}")]
pub struct RequestErrorInfo {
    /// Provider that produced the error
    pub provider: ProviderTag,
    /// Error classification
    pub kind: ErrorKind,
    /// Provider-specific or local error code
    pub code: String,
    /// Human readable message
    pub message: String,
}

impl RequestErrorInfo {
    /// Error returned by the provider itself
    pub fn api(provider: ProviderTag, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider,
            kind: ErrorKind::Provider,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Transport level failure
    pub fn network(provider: ProviderTag, message: impl Into<String>) -> Self {
        Self {
            provider,
            kind: ErrorKind::Network,
            code: "network".to_string(),
            message: message.into(),
        }
    }

    /// Call exceeded its time budget
    pub fn timeout(provider: ProviderTag, message: impl Into<String>) -> Self {
        Self {
            provider,
            kind: ErrorKind::Timeout,
            code: "timeout".to_string(),
            message: message.into(),
        }
    }

    /// No provider code exists for the language
    pub fn unsupported_language(provider: ProviderTag, language: &str) -> Self {
        Self {
            provider,
            kind: ErrorKind::UnsupportedLanguage,
            code: "unsupported_language".to_string(),
            message: format!("{} does not support language '{}'", provider, language),
        }
    }

    /// Response body was malformed
    pub fn parse(provider: ProviderTag, message: impl Into<String>) -> Self {
        Self {
            provider,
            kind: ErrorKind::Parse,
            code: "parse".to_string(),
            message: message.into(),
        }
    }

    /// Build from a reqwest failure, keeping timeouts apart from other transport errors
    pub fn from_reqwest(provider: ProviderTag, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(provider, error.to_string())
        } else if error.is_decode() {
            Self::parse(provider, error.to_string())
        } else {
            Self::network(provider, error.to_string())
        }
    }
}

/// Errors surfaced by a lookup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// The primary provider failed with a non-retryable error
    #[error("Provider error: {0}")]
    Provider(#[from] RequestErrorInfo),

    /// The primary provider kept returning a retryable error
    #[error("Retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of primary requests issued
        attempts: u32,
        /// Error from the final attempt
        last: RequestErrorInfo,
    },

    /// The lookup was superseded by a newer query
    #[error("Lookup cancelled")]
    Cancelled,
}

impl LookupError {
    /// Code shown to the user next to the generic failure message
    pub fn code(&self) -> &str {
        match self {
            Self::Provider(info) => &info.code,
            Self::RetriesExhausted { last, .. } => &last.code,
            Self::Cancelled => "cancelled",
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the query history store
    #[error("Database error: {0}")]
    Database(String),

    /// Error from a lookup
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Error from a file operation
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(format!("{:#}", error))
    }
}
