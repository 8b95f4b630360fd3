//! Audio player session
//!
//! Tracks what the player page is doing: which listing it holds, which track
//! is current, whether playback is running, and where the playhead sits. The
//! UI forwards user intents (select, toggle, next, seek) and media element
//! events (duration known, position tick, track ended, autoplay rejection)
//! and renders from the state that comes back.

use serde::Deserialize;
use tracing::warn;

/// One entry of the playable track listing, as served by `/api/tracks`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SessionTrack {
    /// Opaque resource identifier, passed back to `/api/stream`
    pub id: String,
    /// Cleaned display name
    pub name: String,
    /// Size in bytes, when the provider reported one
    #[serde(default)]
    pub size: Option<u64>,
}

/// Playback lifecycle of the player page
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackState {
    /// Nothing requested yet
    Idle,
    /// Track listing request in flight
    Loading,
    /// Listing held, no track selected
    Ready,
    /// The indexed track is audible
    Playing { index: usize },
    /// The indexed track is current but silent
    Paused { index: usize },
    /// The listing could not be loaded
    Error { message: String },
}

/// State machine behind the player page
#[derive(Debug, Clone)]
pub struct PlayerSession {
    tracks: Vec<SessionTrack>,
    state: PlaybackState,
    position: f64,
    duration: Option<f64>,
    volume: f64,
}

impl Default for PlayerSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerSession {
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            state: PlaybackState::Idle,
            position: 0.0,
            duration: None,
            volume: 1.0,
        }
    }

    // ========================================================================
    // Listing lifecycle
    // ========================================================================

    /// The listing request left; show the loading indicator
    pub fn begin_loading(&mut self) {
        self.state = PlaybackState::Loading;
    }

    /// The listing arrived; an empty listing is a valid, playable-nothing state
    pub fn finish_loading(&mut self, tracks: Vec<SessionTrack>) {
        self.tracks = tracks;
        self.state = PlaybackState::Ready;
        self.position = 0.0;
        self.duration = None;
    }

    /// The listing request failed; the message is shown in place of the list
    pub fn fail_loading(&mut self, message: impl Into<String>) {
        self.tracks.clear();
        self.state = PlaybackState::Error {
            message: message.into(),
        };
    }

    // ========================================================================
    // User intents
    // ========================================================================

    /// Select and start the indexed track; out-of-range indices are ignored
    pub fn select(&mut self, index: usize) {
        if index < self.tracks.len() {
            self.start_at(index);
        }
    }

    /// Pause when playing, resume when paused, start the first track otherwise
    pub fn toggle_play(&mut self) {
        match self.state {
            PlaybackState::Playing { index } => {
                self.state = PlaybackState::Paused { index };
            }
            PlaybackState::Paused { index } => {
                self.state = PlaybackState::Playing { index };
            }
            PlaybackState::Ready if !self.tracks.is_empty() => {
                self.start_at(0);
            }
            _ => {}
        }
    }

    /// Advance to the next track, wrapping past the end to the first
    pub fn next(&mut self) {
        self.step(|index, len| (index + 1) % len, |_| 0);
    }

    /// Step back to the previous track, wrapping before the first to the last
    pub fn previous(&mut self) {
        self.step(
            |index, len| if index > 0 { index - 1 } else { len - 1 },
            |len| len - 1,
        );
    }

    /// The current track played to its end; auto-advance
    pub fn track_finished(&mut self) {
        self.next();
    }

    /// Jump the playhead to a fraction of the track
    ///
    /// Ignored until the duration is known: the progress bar is inert while
    /// the media element has not reported metadata yet.
    pub fn seek(&mut self, ratio: f64) {
        if !matches!(
            self.state,
            PlaybackState::Playing { .. } | PlaybackState::Paused { .. }
        ) {
            return;
        }
        if let Some(duration) = self.duration {
            self.position = ratio.clamp(0.0, 1.0) * duration;
        }
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            self.volume
        };
    }

    // ========================================================================
    // Media element events
    // ========================================================================

    /// Metadata arrived; non-finite or non-positive durations are discarded
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = (duration.is_finite() && duration > 0.0).then_some(duration);
    }

    /// Playhead tick
    pub fn update_position(&mut self, position: f64) {
        if position.is_finite() && position >= 0.0 {
            self.position = position;
        }
    }

    /// The browser refused to start playback (autoplay policy)
    ///
    /// The track stays current; the user gets a play button instead of sound.
    pub fn playback_rejected(&mut self) {
        if let PlaybackState::Playing { index } = self.state {
            warn!(index, "playback rejected by the browser, pausing");
            self.state = PlaybackState::Paused { index };
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn tracks(&self) -> &[SessionTrack] {
        &self.tracks
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            PlaybackState::Playing { index } | PlaybackState::Paused { index } => Some(index),
            _ => None,
        }
    }

    pub fn current_track(&self) -> Option<&SessionTrack> {
        self.current_index().and_then(|i| self.tracks.get(i))
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing { .. })
    }

    /// Cleaned label of the current track, for the "now playing" line
    pub fn now_playing_label(&self) -> Option<String> {
        self.current_track().map(|t| clean_label(&t.name))
    }

    /// One-based position indicator, e.g. `3 / 12`
    pub fn position_indicator(&self) -> Option<String> {
        self.current_index()
            .map(|i| format!("{} / {}", i + 1, self.tracks.len()))
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    fn start_at(&mut self, index: usize) {
        self.state = PlaybackState::Playing { index };
        self.position = 0.0;
        self.duration = None;
    }

    fn step(
        &mut self,
        advance: impl Fn(usize, usize) -> usize,
        fallback: impl Fn(usize) -> usize,
    ) {
        if self.tracks.is_empty() {
            return;
        }
        match self.current_index() {
            Some(index) => self.start_at(advance(index, self.tracks.len())),
            // Navigation with no current track enters the list from the
            // matching end: next from the top, previous from the bottom
            None if matches!(self.state, PlaybackState::Ready) => {
                self.start_at(fallback(self.tracks.len()))
            }
            None => {}
        }
    }
}

// ============================================================================
// Display helpers
// ============================================================================

/// Format a playhead time as `m:ss`
///
/// Invalid inputs render as the zero time, matching what the progress label
/// shows before metadata is known.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Format a byte count as `X.X MB`, or nothing when the size is unknown
pub fn format_size(bytes: Option<u64>) -> String {
    match bytes {
        Some(bytes) if bytes > 0 => format!("{:.1} MB", bytes as f64 / 1_048_576.0),
        _ => String::new(),
    }
}

/// Turn a file name into a list label: no extension, separators as spaces
pub fn clean_label(name: &str) -> String {
    let base = match name.rfind('.') {
        Some(pos) if pos > 0 => &name[..pos],
        _ => name,
    };
    base.replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> SessionTrack {
        SessionTrack {
            id: id.to_string(),
            name: format!("{id}.mp3"),
            size: None,
        }
    }

    fn loaded(n: usize) -> PlayerSession {
        let mut session = PlayerSession::new();
        session.begin_loading();
        session.finish_loading((0..n).map(|i| track(&format!("t{i}"))).collect());
        session
    }

    #[test]
    fn listing_lifecycle() {
        let mut session = PlayerSession::new();
        assert_eq!(*session.state(), PlaybackState::Idle);

        session.begin_loading();
        assert_eq!(*session.state(), PlaybackState::Loading);

        session.finish_loading(vec![track("a")]);
        assert_eq!(*session.state(), PlaybackState::Ready);
        assert_eq!(session.tracks().len(), 1);
    }

    #[test]
    fn loading_failure_clears_the_listing() {
        let mut session = loaded(2);
        session.begin_loading();
        session.fail_loading("listing unavailable");

        assert!(session.tracks().is_empty());
        assert!(matches!(session.state(), PlaybackState::Error { message } if message == "listing unavailable"));
    }

    #[test]
    fn select_starts_playback_and_ignores_out_of_range() {
        let mut session = loaded(3);

        session.select(1);
        assert_eq!(*session.state(), PlaybackState::Playing { index: 1 });
        assert_eq!(session.current_track().map(|t| t.id.as_str()), Some("t1"));

        session.select(7);
        assert_eq!(*session.state(), PlaybackState::Playing { index: 1 });
    }

    #[test]
    fn toggle_pauses_resumes_and_starts_from_ready() {
        let mut session = loaded(2);

        session.toggle_play();
        assert_eq!(*session.state(), PlaybackState::Playing { index: 0 });

        session.toggle_play();
        assert_eq!(*session.state(), PlaybackState::Paused { index: 0 });

        session.toggle_play();
        assert_eq!(*session.state(), PlaybackState::Playing { index: 0 });
    }

    #[test]
    fn toggle_with_empty_listing_is_inert() {
        let mut session = loaded(0);
        session.toggle_play();
        assert_eq!(*session.state(), PlaybackState::Ready);
    }

    #[test]
    fn next_wraps_past_the_end() {
        let mut session = loaded(3);
        session.select(2);

        session.next();
        assert_eq!(session.current_index(), Some(0));
    }

    #[test]
    fn previous_wraps_before_the_start() {
        let mut session = loaded(3);
        session.select(0);

        session.previous();
        assert_eq!(session.current_index(), Some(2));
    }

    #[test]
    fn navigation_with_no_selection_enters_from_the_matching_end() {
        let mut session = loaded(3);
        session.previous();
        assert_eq!(session.current_index(), Some(2));

        let mut session = loaded(3);
        session.next();
        assert_eq!(session.current_index(), Some(0));
    }

    #[test]
    fn navigation_on_empty_listing_does_not_panic() {
        let mut session = loaded(0);
        session.next();
        session.previous();
        session.track_finished();
        assert_eq!(*session.state(), PlaybackState::Ready);
    }

    #[test]
    fn navigation_keeps_playing_and_rewinds() {
        let mut session = loaded(2);
        session.select(0);
        session.set_duration(120.0);
        session.update_position(30.0);

        session.next();
        assert_eq!(*session.state(), PlaybackState::Playing { index: 1 });
        assert_eq!(session.position(), 0.0);
        assert_eq!(session.duration(), None);
    }

    #[test]
    fn finished_track_advances_automatically() {
        let mut session = loaded(2);
        session.select(1);

        session.track_finished();
        assert_eq!(*session.state(), PlaybackState::Playing { index: 0 });
    }

    #[test]
    fn seek_requires_a_known_duration() {
        let mut session = loaded(1);
        session.select(0);

        session.seek(0.5);
        assert_eq!(session.position(), 0.0);

        session.set_duration(200.0);
        session.seek(0.5);
        assert_eq!(session.position(), 100.0);

        session.seek(2.0);
        assert_eq!(session.position(), 200.0);
    }

    #[test]
    fn bogus_durations_are_discarded() {
        let mut session = loaded(1);
        session.select(0);

        session.set_duration(f64::NAN);
        assert_eq!(session.duration(), None);

        session.set_duration(0.0);
        assert_eq!(session.duration(), None);
    }

    #[test]
    fn volume_is_clamped() {
        let mut session = PlayerSession::new();
        session.set_volume(1.4);
        assert_eq!(session.volume(), 1.0);
        session.set_volume(-0.3);
        assert_eq!(session.volume(), 0.0);
        session.set_volume(f64::NAN);
        assert_eq!(session.volume(), 0.0);
    }

    #[test]
    fn autoplay_rejection_leaves_the_track_current_but_paused() {
        let mut session = loaded(2);
        session.select(1);

        session.playback_rejected();
        assert_eq!(*session.state(), PlaybackState::Paused { index: 1 });
        assert_eq!(session.current_index(), Some(1));
    }

    #[test]
    fn now_playing_line_and_indicator() {
        let mut session = loaded(3);
        assert_eq!(session.now_playing_label(), None);
        assert_eq!(session.position_indicator(), None);

        session.select(2);
        assert_eq!(session.now_playing_label().as_deref(), Some("t2"));
        assert_eq!(session.position_indicator().as_deref(), Some("3 / 3"));
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.4), "1:05");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(-3.0), "0:00");
    }

    #[test]
    fn size_formatting() {
        assert_eq!(format_size(Some(3_250_000)), "3.1 MB");
        assert_eq!(format_size(Some(0)), "");
        assert_eq!(format_size(None), "");
    }

    #[test]
    fn tracks_deserialize_from_the_listing_payload() {
        let payload = r#"[
            {"id": "tracks/a_123456", "originalFilename": null, "name": "a.mp3",
             "size": 2048, "url": "https://res.example/a.mp3"},
            {"id": "tracks/b_123456", "originalFilename": "b.mp3", "name": "b.mp3"}
        ]"#;
        let tracks: Vec<SessionTrack> = serde_json::from_str(payload).unwrap();

        assert_eq!(tracks[0].size, Some(2048));
        assert_eq!(tracks[1].size, None);
        assert_eq!(tracks[1].name, "b.mp3");
    }

    #[test]
    fn label_cleaning() {
        assert_eq!(clean_label("first-song_demo.mp3"), "first song demo");
        assert_eq!(clean_label("plain"), "plain");
        assert_eq!(clean_label(".mp3"), ".mp3");
    }
}
