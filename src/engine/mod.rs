use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, info};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::error::PlaybackError;
use crate::events::{EventBus, ReaderEvent, SubscriptionId};
use crate::models::{Document, PlaybackState, ReaderStatus};

/// Minimum reading speed in words per minute.
pub const MIN_WPM: u32 = 60;
/// Maximum reading speed in words per minute.
pub const MAX_WPM: u32 = 1000;
/// Default reading speed in words per minute.
pub const DEFAULT_WPM: u32 = 300;

/// Token tying an in-flight content load to the engine state it started
/// from. A commit with a stale token is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken(u64);

struct EngineState {
    document: Document,
    current_index: usize,
    speed_wpm: u32,
    is_playing: bool,
}

/// RSVP playback engine: owns the current document and playback state,
/// advances the word index on a timer, and notifies subscribers of every
/// state transition.
///
/// The timer is a spawned tokio task; all mutating operations must be
/// called from within a tokio runtime. Operations are intended for a
/// single control flow (one UI event context) and are not synchronized
/// against concurrent mutation from multiple callers.
pub struct RsvpEngine {
    state: Arc<Mutex<EngineState>>,
    events: EventBus,
    timer: Option<JoinHandle<()>>,
    // Bumped before every timer cancel/arm; a tick whose captured
    // generation no longer matches must not touch state.
    timer_generation: Arc<AtomicU64>,
    load_epoch: u64,
}

impl RsvpEngine {
    /// Create an engine with the given initial speed (clamped to the
    /// supported range). Speed is a user preference handed in by the
    /// caller; the engine never reads or writes durable storage itself.
    pub fn new(initial_wpm: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(EngineState {
                document: Document::empty(),
                current_index: 0,
                speed_wpm: initial_wpm.clamp(MIN_WPM, MAX_WPM),
                is_playing: false,
            })),
            events: EventBus::new(),
            timer: None,
            timer_generation: Arc::new(AtomicU64::new(0)),
            load_epoch: 0,
        }
    }

    /// The engine's notification bus. Cloning is cheap; subscriptions
    /// registered on the clone are seen by the engine.
    pub fn events(&self) -> EventBus {
        self.events.clone()
    }

    /// Convenience wrapper around [`EventBus::subscribe`].
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ReaderEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(callback)
    }

    /// Replace the current document with freshly tokenized `text`.
    ///
    /// Resets the position to 0, stops playback, and emits `TextChanged`
    /// followed by `ProgressChanged { index: 0, total }`. The configured
    /// speed survives the reload.
    pub fn load_content(&mut self, text: impl Into<String>) {
        self.load_epoch += 1;
        self.apply_content(text.into());
    }

    /// Begin a load that may complete asynchronously. The returned token
    /// supersedes all earlier tokens.
    pub fn begin_load(&mut self) -> LoadToken {
        self.load_epoch += 1;
        LoadToken(self.load_epoch)
    }

    /// Commit the result of a load started with [`begin_load`]. Returns
    /// false (and leaves all state untouched) if a newer load has started
    /// since the token was issued.
    ///
    /// [`begin_load`]: RsvpEngine::begin_load
    pub fn commit_load(&mut self, token: LoadToken, text: impl Into<String>) -> bool {
        if token.0 != self.load_epoch {
            debug!("Dropping stale load result (token {} < epoch {})", token.0, self.load_epoch);
            return false;
        }
        self.apply_content(text.into());
        true
    }

    fn apply_content(&mut self, text: String) {
        // Invalidate the timer before the new document becomes visible.
        self.cancel_timer();

        let document = Document::from_text(text);
        let (raw_text, total) = {
            let mut state = self.state.lock().unwrap();
            state.document = document;
            state.current_index = 0;
            state.is_playing = false;
            (state.document.raw_text(), state.document.word_count())
        };

        info!("Content loaded: {} words", total);
        self.events.emit(&ReaderEvent::TextChanged { text: raw_text });
        self.events.emit(&ReaderEvent::ProgressChanged { index: 0, total });
    }

    /// Start or restart playback. No-op when no words are loaded.
    ///
    /// Arms a repeating timer at the current speed; each tick advances the
    /// index by one and emits `ProgressChanged`. Playback stops by itself
    /// at the last word.
    pub fn start(&mut self) {
        // Retire any running timer before the new one becomes observable.
        self.cancel_timer();
        let delay = {
            let mut state = self.state.lock().unwrap();
            if state.document.is_empty() {
                return;
            }
            state.is_playing = true;
            word_delay(state.speed_wpm)
        };

        let generation = self.timer_generation.load(Ordering::SeqCst);
        debug!("Playback started ({:?} per word)", delay);

        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        let generation_counter = Arc::clone(&self.timer_generation);

        self.timer = Some(tokio::spawn(async move {
            // First advancement happens one full interval after start.
            let mut ticker = time::interval_at(time::Instant::now() + delay, delay);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let event = {
                    let mut state = state.lock().unwrap();
                    if generation_counter.load(Ordering::SeqCst) != generation {
                        // A cancel or re-arm superseded this timer.
                        break;
                    }
                    let total = state.document.word_count();
                    if state.current_index + 1 < total {
                        state.current_index += 1;
                        Some(ReaderEvent::ProgressChanged {
                            index: state.current_index,
                            total,
                        })
                    } else {
                        // End of document: stop without looping.
                        state.is_playing = false;
                        None
                    }
                };

                match event {
                    Some(event) => events.emit(&event),
                    None => {
                        debug!("Playback reached end of document");
                        break;
                    }
                }
            }
        }));
    }

    /// Pause playback, freezing the position. Idempotent; emits nothing.
    pub fn pause(&mut self) {
        // Handle invalidation must precede the state change so a stale
        // tick cannot fire between the two.
        self.cancel_timer();
        let mut state = self.state.lock().unwrap();
        if state.is_playing {
            state.is_playing = false;
            debug!("Playback paused at index {}", state.current_index);
        }
    }

    /// Set the reading speed, clamped to `[MIN_WPM, MAX_WPM]`. Emits
    /// `SpeedChanged`. If playback is active the timer is re-armed so the
    /// new rate takes effect immediately (a fresh full interval, not a
    /// pro-rated remainder). Returns the clamped value.
    pub fn set_speed(&mut self, wpm: u32) -> u32 {
        let clamped = wpm.clamp(MIN_WPM, MAX_WPM);
        let was_playing = {
            let mut state = self.state.lock().unwrap();
            state.speed_wpm = clamped;
            state.is_playing
        };

        debug!("Speed set to {} wpm", clamped);
        self.events.emit(&ReaderEvent::SpeedChanged { wpm: clamped });

        if was_playing {
            self.start();
        }
        clamped
    }

    /// Seek to a word index. Out-of-range targets are rejected with
    /// `IndexOutOfRange`; valid seeks emit `ProgressChanged` and leave the
    /// play/pause state untouched.
    pub fn set_current_index(&mut self, index: usize) -> Result<(), PlaybackError> {
        let total = {
            let mut state = self.state.lock().unwrap();
            let total = state.document.word_count();
            if index >= total {
                return Err(PlaybackError::IndexOutOfRange { index, total });
            }
            state.current_index = index;
            total
        };

        debug!("Seek to index {}", index);
        self.events.emit(&ReaderEvent::ProgressChanged { index, total });
        Ok(())
    }

    /// The word at the current position, or an empty string when no
    /// content is loaded.
    pub fn current_word(&self) -> String {
        let state = self.state.lock().unwrap();
        state
            .document
            .word(state.current_index)
            .unwrap_or("")
            .to_string()
    }

    pub fn current_index(&self) -> usize {
        self.state.lock().unwrap().current_index
    }

    pub fn speed_wpm(&self) -> u32 {
        self.state.lock().unwrap().speed_wpm
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().unwrap().is_playing
    }

    /// Immutable shared view of the tokenized word sequence.
    pub fn words(&self) -> Arc<[String]> {
        self.state.lock().unwrap().document.words()
    }

    pub fn raw_text(&self) -> Arc<str> {
        self.state.lock().unwrap().document.raw_text()
    }

    pub fn word_count(&self) -> usize {
        self.state.lock().unwrap().document.word_count()
    }

    /// Snapshot of the observable playback state.
    pub fn status(&self) -> ReaderStatus {
        let state = self.state.lock().unwrap();
        let playback = if state.is_playing {
            PlaybackState::Playing
        } else if state.current_index > 0 {
            PlaybackState::Paused
        } else {
            PlaybackState::Idle
        };
        ReaderStatus {
            state: playback,
            current_index: state.current_index,
            word_count: state.document.word_count(),
            speed_wpm: state.speed_wpm,
        }
    }

    fn cancel_timer(&mut self) {
        self.timer_generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }
}

impl Drop for RsvpEngine {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

/// Per-word delay for a given speed: 60000 / wpm milliseconds.
fn word_delay(wpm: u32) -> Duration {
    Duration::from_secs_f64(60.0 / wpm as f64)
}
