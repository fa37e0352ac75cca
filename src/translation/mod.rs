/*!
 * Lookup core: detection, orchestration, normalization and display.
 *
 * - `model`: shared domain types
 * - `detection`: local source-language heuristic
 * - `orchestrator`: retry, ping-pong and enrichment fan-out
 * - `normalizer`: provider results to `TranslateFormatResult`
 * - `display`: `TranslateFormatResult` to ordered display sections
 */

// Re-export main types for easier usage
pub use self::detection::detect;
pub use self::display::{sectionize, sectionize_compact};
pub use self::model::{
    DisplayItem, QueryWordInfo, SectionKind, TranslateDisplayResult, TranslateFormatResult, TranslateItem, WebEntry,
    WordForm,
};
pub use self::normalizer::normalize;
pub use self::orchestrator::{Lookup, Orchestrator, OrchestratorState, RetryPolicy};

// Submodules
pub mod detection;
pub mod display;
pub mod model;
pub mod normalizer;
pub mod orchestrator;
