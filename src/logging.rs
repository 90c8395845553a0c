use chrono::{DateTime, Utc};
use log::{debug, error, info, trace, warn};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Reader event for logging and debugging
#[derive(Debug, Clone)]
pub struct ReaderLogEvent {
    pub timestamp: DateTime<Utc>,
    pub event_type: ReaderEventType,
    pub duration: Option<Duration>,
    pub details: String,
}

#[derive(Debug, Clone)]
pub enum ReaderEventType {
    PlaybackStarted,
    PlaybackPaused,
    PlaybackFinished,
    ContentLoaded,
    SpeedChanged,
    SeekOperation,
    LoadError,
    FetchError,
}

impl ReaderEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReaderEventType::PlaybackStarted => "PLAYBACK_STARTED",
            ReaderEventType::PlaybackPaused => "PLAYBACK_PAUSED",
            ReaderEventType::PlaybackFinished => "PLAYBACK_FINISHED",
            ReaderEventType::ContentLoaded => "CONTENT_LOADED",
            ReaderEventType::SpeedChanged => "SPEED_CHANGED",
            ReaderEventType::SeekOperation => "SEEK_OPERATION",
            ReaderEventType::LoadError => "LOAD_ERROR",
            ReaderEventType::FetchError => "FETCH_ERROR",
        }
    }
}

/// Logger for reader operations and debugging
#[derive(Clone)]
pub struct ReaderLogger {
    events: Arc<Mutex<VecDeque<ReaderLogEvent>>>,
    max_events: usize,
}

impl ReaderLogger {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::new())),
            max_events: 1000, // Keep last 1000 events
        }
    }

    /// Initialize logging system with appropriate log level
    pub fn init() -> Result<(), Box<dyn std::error::Error>> {
        // Set log level based on environment variable or default to Info
        let log_level =
            std::env::var("RSVP_READER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let mut builder = env_logger::Builder::new();

        // Set custom format for better readability
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] [{}:{}] {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        });

        // Parse and set log level
        match log_level.to_lowercase().as_str() {
            "trace" => builder.filter_level(log::LevelFilter::Trace),
            "debug" => builder.filter_level(log::LevelFilter::Debug),
            "info" => builder.filter_level(log::LevelFilter::Info),
            "warn" => builder.filter_level(log::LevelFilter::Warn),
            "error" => builder.filter_level(log::LevelFilter::Error),
            _ => builder.filter_level(log::LevelFilter::Info),
        };

        builder.try_init()?;

        info!("Reader logging initialized with level: {}", log_level);
        Ok(())
    }

    /// Log a reader event
    pub fn log_event(
        &self,
        event_type: ReaderEventType,
        details: String,
        duration: Option<Duration>,
    ) {
        let event = ReaderLogEvent {
            timestamp: Utc::now(),
            event_type: event_type.clone(),
            duration,
            details: details.clone(),
        };

        // Add to event history
        {
            let mut events = self.events.lock().unwrap();
            events.push_back(event);

            // Keep only the last max_events
            while events.len() > self.max_events {
                events.pop_front();
            }
        }

        // Log to standard logger based on event type
        match event_type {
            ReaderEventType::PlaybackStarted
            | ReaderEventType::PlaybackPaused
            | ReaderEventType::PlaybackFinished
            | ReaderEventType::ContentLoaded => {
                info!("[{}] {}", event_type.as_str(), details);
            }
            ReaderEventType::SpeedChanged | ReaderEventType::SeekOperation => {
                debug!("[{}] {}", event_type.as_str(), details);
            }
            ReaderEventType::FetchError => {
                warn!("[{}] {}", event_type.as_str(), details);
            }
            ReaderEventType::LoadError => {
                error!("[{}] {}", event_type.as_str(), details);
            }
        }
    }

    /// Log playback started event
    pub fn log_playback_started(&self, word_count: usize, speed_wpm: u32) {
        self.log_event(
            ReaderEventType::PlaybackStarted,
            format!("Started reading {} words at {} wpm", word_count, speed_wpm),
            None,
        );
    }

    /// Log playback paused event
    pub fn log_playback_paused(&self, current_index: usize, word_count: usize) {
        self.log_event(
            ReaderEventType::PlaybackPaused,
            format!("Paused at word {} of {}", current_index + 1, word_count),
            None,
        );
    }

    /// Log playback finished event
    pub fn log_playback_finished(&self, word_count: usize) {
        self.log_event(
            ReaderEventType::PlaybackFinished,
            format!("Finished reading {} words", word_count),
            None,
        );
    }

    /// Log content loaded event
    pub fn log_content_loaded(&self, source: &str, word_count: usize, load_time: Duration) {
        self.log_event(
            ReaderEventType::ContentLoaded,
            format!("Loaded '{}': {} words", source, word_count),
            Some(load_time),
        );
    }

    /// Log speed change event
    pub fn log_speed_changed(&self, from_wpm: u32, to_wpm: u32) {
        self.log_event(
            ReaderEventType::SpeedChanged,
            format!("Speed changed from {} to {} wpm", from_wpm, to_wpm),
            None,
        );
    }

    /// Log seek operation
    pub fn log_seek(&self, from_index: usize, to_index: usize) {
        self.log_event(
            ReaderEventType::SeekOperation,
            format!("Seek from word {} to word {}", from_index, to_index),
            None,
        );
    }

    /// Log load error
    pub fn log_load_error(&self, source: &str, error: &str) {
        self.log_event(
            ReaderEventType::LoadError,
            format!("Load error for '{}': {}", source, error),
            None,
        );
    }

    /// Log fetch error
    pub fn log_fetch_error(&self, url: &str, error: &str) {
        self.log_event(
            ReaderEventType::FetchError,
            format!("Fetch error for '{}': {}", url, error),
            None,
        );
    }

    /// Get recent events for debugging
    pub fn get_recent_events(&self, count: usize) -> Vec<ReaderLogEvent> {
        let events = self.events.lock().unwrap();
        events
            .iter()
            .rev()
            .take(count)
            .cloned()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect()
    }

    /// Clear event history
    pub fn clear_events(&self) {
        let mut events = self.events.lock().unwrap();
        events.clear();
    }

    /// Get event statistics
    pub fn get_event_statistics(&self) -> EventStatistics {
        let events = self.events.lock().unwrap();
        let mut stats = EventStatistics::new();

        for event in events.iter() {
            match event.event_type {
                ReaderEventType::ContentLoaded => stats.content_loads += 1,
                ReaderEventType::LoadError => stats.load_errors += 1,
                ReaderEventType::FetchError => stats.fetch_errors += 1,
                ReaderEventType::SeekOperation => stats.seek_operations += 1,
                _ => {}
            }
        }

        stats.total_events = events.len();
        stats
    }
}

impl Default for ReaderLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about logged events
#[derive(Debug, Clone)]
pub struct EventStatistics {
    pub total_events: usize,
    pub content_loads: usize,
    pub load_errors: usize,
    pub fetch_errors: usize,
    pub seek_operations: usize,
}

impl EventStatistics {
    pub fn new() -> Self {
        Self {
            total_events: 0,
            content_loads: 0,
            load_errors: 0,
            fetch_errors: 0,
            seek_operations: 0,
        }
    }
}

impl Default for EventStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Timer utility for measuring operation durations
pub struct OperationTimer {
    start_time: Instant,
    operation_name: String,
}

impl OperationTimer {
    pub fn new(operation_name: String) -> Self {
        trace!("Starting operation: {}", operation_name);
        Self {
            start_time: Instant::now(),
            operation_name,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn finish(self) -> Duration {
        let duration = self.elapsed();
        trace!(
            "Completed operation '{}' in {:.2}ms",
            self.operation_name,
            duration.as_millis()
        );
        duration
    }
}
