/*!
 * Visible state of a lookup session.
 */

use serde::Serialize;

use crate::errors::LookupError;
use crate::translation::model::{TranslateDisplayResult, TranslateFormatResult};

/// Title shown for every failure, whatever the provider
pub const GENERIC_FAILURE_MESSAGE: &str = "Sorry! We have some problems..";

/// What the UI should show
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupState {
    /// Nothing queried, or the query text was cleared
    Idle,
    /// A lookup is in flight or waiting for its debounce delay
    Loading,
    Success {
        format: TranslateFormatResult,
        sections: Vec<TranslateDisplayResult>,
    },
    Failure {
        /// Raw provider or local error code
        code: String,
        message: String,
        help_url: String,
    },
}

impl LookupState {
    /// Failure state for a lookup error
    pub fn failure(error: &LookupError, help_url: &str) -> Self {
        Self::Failure {
            code: error.code().to_string(),
            message: GENERIC_FAILURE_MESSAGE.to_string(),
            help_url: help_url.to_string(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Result of a clipboard-triggered lookup
#[derive(Debug, Clone, PartialEq)]
pub enum ClipboardQuery {
    /// Same text was looked up within the window; nothing was sent
    Skipped { last_queried_at: i64 },
    /// The lookup ran; `None` when it was superseded
    Queried(Option<LookupState>),
}
