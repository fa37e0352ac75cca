/*!
 * # wordlens - multi-provider word lookup
 *
 * A Rust library that looks up a word or phrase and assembles one translation
 * result from several translation backends.
 *
 * ## Features
 *
 * - Local source-language heuristic with a provider-backed fallback
 * - Primary dictionary lookup (Youdao) with bounded retries and
 *   same-language "ping-pong" correction
 * - Best-effort enrichment lines from Baidu, Tencent and Caiyun
 * - Deterministic merge and display sectioning
 * - Lookup sessions with supersession, debounce and clipboard dedupe
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `language_utils`: Canonical language ids and provider code tables
 * - `providers`: Client implementations for the backends:
 *   - `providers::youdao`: primary dictionary and translation
 *   - `providers::baidu`: enrichment and language detection
 *   - `providers::tencent`: enrichment
 *   - `providers::caiyun`: enrichment
 * - `translation`: detection, orchestration, normalization and display
 * - `session`: the UI-facing lookup session
 * - `database`: SQLite query history
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod database;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod session;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, LookupError, RequestErrorInfo};
pub use language_utils::{LanguageId, LanguagePreferences};
pub use providers::{ProviderTag, TranslationProvider};
pub use session::{LookupSession, LookupState};
pub use translation::{Orchestrator, TranslateDisplayResult, TranslateFormatResult};
