/*!
 * Lookup session: the single owner of in-flight lookups and visible state.
 *
 * Every new query bumps a generation counter and broadcasts it; a lookup
 * whose generation is no longer current is dropped mid-flight (which also
 * cancels a pending retry sleep) and its result is never written.
 */

use log::{debug, warn};
use parking_lot::{Mutex, RwLock};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;

use crate::app_config::{Config, DEFAULT_HELP_URL};
use crate::database::QueryHistory;
use crate::errors::LookupError;
use crate::language_utils::LanguageId;
use crate::translation::display::sectionize;
use crate::translation::orchestrator::{Lookup, Orchestrator};

use super::models::{ClipboardQuery, LookupState};

/// Text and language selection of the current query
#[derive(Debug, Clone)]
struct CurrentQuery {
    text: Option<String>,
    target: LanguageId,
    /// Source language last reported by the primary provider
    from: Option<LanguageId>,
}

/// Session handling supersession, debounce and clipboard dedupe
#[derive(Debug)]
pub struct LookupSession {
    orchestrator: Orchestrator,
    history: Option<Arc<dyn QueryHistory>>,
    delay: Duration,
    clipboard_window: Duration,
    help_url: String,
    generation: AtomicU64,
    supersede_tx: watch::Sender<u64>,
    state: RwLock<LookupState>,
    current: Mutex<CurrentQuery>,
}

impl LookupSession {
    /// Create a session with default timings and no history
    pub fn new(orchestrator: Orchestrator) -> Self {
        let target = orchestrator.preferences().language1.clone();
        let (supersede_tx, _) = watch::channel(0);

        Self {
            orchestrator,
            history: None,
            delay: Duration::from_millis(400),
            clipboard_window: Duration::from_millis(5000),
            help_url: DEFAULT_HELP_URL.to_string(),
            generation: AtomicU64::new(0),
            supersede_tx,
            state: RwLock::new(LookupState::Idle),
            current: Mutex::new(CurrentQuery {
                text: None,
                target,
                from: None,
            }),
        }
    }

    /// Create a session with timings and help link from configuration
    pub fn from_config(orchestrator: Orchestrator, config: &Config) -> Self {
        Self::new(orchestrator)
            .with_delay(config.effective_delay())
            .with_clipboard_window(config.clipboard_query_window())
            .with_help_url(config.help_url.clone())
    }

    pub fn with_history(mut self, history: Arc<dyn QueryHistory>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_clipboard_window(mut self, window: Duration) -> Self {
        self.clipboard_window = window;
        self
    }

    pub fn with_help_url(mut self, help_url: impl Into<String>) -> Self {
        self.help_url = help_url.into();
        self
    }

    /// Current visible state
    pub fn state(&self) -> LookupState {
        self.state.read().clone()
    }

    /// Currently selected target language
    pub fn target(&self) -> LanguageId {
        self.current.lock().target.clone()
    }

    /// Select the target language for the next query without translating
    pub fn set_target(&self, to: LanguageId) {
        self.current.lock().target = to;
    }

    /// Cancel whatever is in flight and go back to `Idle`
    pub fn supersede(&self) {
        self.bump();
        *self.state.write() = LookupState::Idle;
    }

    /// Look up text now, superseding any in-flight query
    ///
    /// Returns `None` when this query was itself superseded before finishing.
    pub async fn query(&self, text: &str) -> Option<LookupState> {
        let generation = self.begin(text);
        let target = self.target();
        let outcome = self
            .run_current(generation, self.orchestrator.lookup(text, Some(&target)))
            .await
            .and_then(|outcome| outcome);
        self.finish(generation, outcome)
    }

    /// Look up text after the debounce delay
    ///
    /// Empty text resets the session to `Idle`. Returns `None` when a newer
    /// query arrives during the delay or the lookup.
    pub async fn query_debounced(&self, text: &str) -> Option<LookupState> {
        let text = text.trim();
        if text.is_empty() {
            self.supersede();
            let mut current = self.current.lock();
            current.text = None;
            current.from = None;
            return Some(LookupState::Idle);
        }

        let generation = self.begin(text);
        self.run_current(generation, tokio::time::sleep(self.delay)).await.ok()?;
        self.query(text).await
    }

    /// Flip the target between the two preferred languages and re-translate
    pub async fn toggle_target(&self) -> Option<LookupState> {
        let next = {
            let current = self.current.lock();
            self.orchestrator.preferences().other(&current.target).clone()
        };
        self.retarget(next).await
    }

    /// Re-translate the current text into an explicit target
    ///
    /// The source is the language last reported for this text, `auto` if none.
    /// An `auto` target fails the lookup and leaves the selected target as is.
    pub async fn retarget(&self, to: LanguageId) -> Option<LookupState> {
        let (text, from) = {
            let mut current = self.current.lock();
            if !to.is_auto() {
                current.target = to.clone();
            }
            (current.text.clone(), current.from.clone())
        };

        let Some(text) = text else {
            debug!("Target set to {} with no text to translate", to);
            return Some(self.state());
        };

        let generation = self.begin(&text);
        let from = from.unwrap_or_else(LanguageId::auto);
        let outcome = self
            .run_current(generation, self.orchestrator.lookup_with_pair(&text, from, to))
            .await
            .and_then(|outcome| outcome);
        self.finish(generation, outcome)
    }

    /// Look up clipboard text unless it was looked up within the window
    pub async fn query_clipboard(&self, text: &str) -> ClipboardQuery {
        self.query_clipboard_at(text, chrono::Utc::now().timestamp_millis()).await
    }

    /// `query_clipboard` with an explicit clock, in unix milliseconds
    pub async fn query_clipboard_at(&self, text: &str, now_ms: i64) -> ClipboardQuery {
        let text = text.trim();

        if let Some(history) = &self.history {
            match history.last_queried_at(text).await {
                Ok(Some(last)) if now_ms.saturating_sub(last) < self.clipboard_window.as_millis() as i64 => {
                    debug!("Clipboard text was looked up {} ms ago, skipping", now_ms - last);
                    return ClipboardQuery::Skipped { last_queried_at: last };
                }
                Ok(_) => {}
                Err(e) => warn!("Failed to read query history: {}", e),
            }

            if let Err(e) = history.record_query(text, now_ms).await {
                warn!("Failed to record query history: {}", e);
            }
        }

        ClipboardQuery::Queried(self.query(text).await)
    }

    /// Advance the generation and notify in-flight lookups
    fn bump(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.supersede_tx.send_replace(generation);
        generation
    }

    /// Start a new query: supersede, remember the text, show `Loading`
    ///
    /// A different text forgets the previously reported source language.
    fn begin(&self, text: &str) -> u64 {
        let generation = self.bump();
        {
            let mut current = self.current.lock();
            if current.text.as_deref() != Some(text) {
                current.text = Some(text.to_string());
                current.from = None;
            }
        }
        *self.state.write() = LookupState::Loading;
        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Drive a future unless the generation moves on first
    async fn run_current<F: Future>(&self, generation: u64, future: F) -> Result<F::Output, LookupError> {
        let mut superseded = self.supersede_tx.subscribe();

        let output = tokio::select! {
            output = future => output,
            _ = wait_for_change(&mut superseded, generation) => {
                debug!("Lookup generation {} superseded", generation);
                return Err(LookupError::Cancelled);
            }
        };

        if self.is_current(generation) { Ok(output) } else { Err(LookupError::Cancelled) }
    }

    /// Publish the outcome if it is still current
    fn finish(&self, generation: u64, outcome: Result<Lookup, LookupError>) -> Option<LookupState> {
        let (next, reported_from) = match outcome {
            Ok(lookup) => {
                let reported_from = lookup.format.query_word_info.from_language.clone();
                let sections = sectionize(&lookup.format);
                let next = LookupState::Success {
                    format: lookup.format,
                    sections,
                };
                (next, Some(reported_from))
            }
            Err(LookupError::Cancelled) => return None,
            Err(e) => (LookupState::failure(&e, &self.help_url), None),
        };

        let mut state = self.state.write();
        if !self.is_current(generation) {
            debug!("Discarding stale result of generation {}", generation);
            return None;
        }
        if let Some(from) = reported_from {
            self.current.lock().from = Some(from);
        }
        *state = next.clone();
        Some(next)
    }
}

/// Resolve once the watched generation differs from `generation`
async fn wait_for_change(receiver: &mut watch::Receiver<u64>, generation: u64) {
    loop {
        if *receiver.borrow_and_update() != generation {
            return;
        }
        if receiver.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
