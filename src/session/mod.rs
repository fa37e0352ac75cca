/*!
 * Lookup session module.
 *
 * This module provides:
 * - Supersession of in-flight lookups with stale-result discard
 * - Debounced and clipboard-triggered queries
 * - The explicit `Loading | Success | Failure` state shown to the UI
 */

pub mod manager;
pub mod models;

// Re-export main types
pub use manager::LookupSession;
pub use models::{ClipboardQuery, GENERIC_FAILURE_MESSAGE, LookupState};
