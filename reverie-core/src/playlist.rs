//! Playlist sequencing over a fixed track universe.
//!
//! Decides which track plays next: plain index order or a uniformly shuffled
//! permutation, traversed with wraparound in both directions. The sequencer
//! never touches playback; it only answers "which track".

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Zero-based index of a track within the fixed track universe.
///
/// The universe itself never changes during a session; only the traversal
/// order over these indexes does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackIndex(pub usize);

impl TrackIndex {
    /// Creates TrackIndex from zero-based index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the underlying track index as usize.
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for TrackIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur during playlist sequencing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaylistError {
    #[error("Playlist must contain at least one track")]
    EmptyPlaylist,
}

/// Traversal order over the track universe.
///
/// `order` is always a permutation of `0..track_count` and the cursor always
/// points inside it, so `current()` names a valid track at every moment.
/// Toggling shuffle relocates the cursor to wherever the playing track landed
/// in the new order, which keeps the audible track unchanged.
#[derive(Debug, Clone)]
pub struct PlaylistSequencer {
    order: Vec<usize>,
    cursor: usize,
    shuffled: bool,
    rng: StdRng,
}

impl PlaylistSequencer {
    /// Creates a sequencer over `track_count` tracks in sequential order.
    ///
    /// A seed makes every future shuffle reproducible; `None` seeds from
    /// operating system entropy.
    ///
    /// # Errors
    /// - `PlaylistError::EmptyPlaylist` - Zero tracks
    pub fn new(track_count: usize, seed: Option<u64>) -> Result<Self, PlaylistError> {
        if track_count == 0 {
            return Err(PlaylistError::EmptyPlaylist);
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            order: (0..track_count).collect(),
            cursor: 0,
            shuffled: false,
            rng,
        })
    }

    /// Number of tracks the sequencer traverses.
    pub fn track_count(&self) -> usize {
        self.order.len()
    }

    /// Whether the shuffled order is active.
    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    /// Track currently under the cursor.
    pub fn current(&self) -> TrackIndex {
        TrackIndex::new(self.order[self.cursor])
    }

    /// The active traversal order over all track indexes.
    pub fn order(&self) -> Vec<TrackIndex> {
        self.order.iter().map(|&track| TrackIndex::new(track)).collect()
    }

    /// Tracks in traversal order starting at the current cursor.
    ///
    /// The first entry is the current track; the rest follow in wraparound
    /// order, which is what a queue display renders.
    pub fn upcoming(&self) -> Vec<TrackIndex> {
        let len = self.order.len();
        (0..len)
            .map(|offset| TrackIndex::new(self.order[(self.cursor + offset) % len]))
            .collect()
    }

    /// Steps forward, wrapping past the end of the order.
    pub fn next(&mut self) -> TrackIndex {
        self.cursor = (self.cursor + 1) % self.order.len();
        self.current()
    }

    /// Steps backward, wrapping past the start of the order.
    pub fn previous(&mut self) -> TrackIndex {
        self.cursor = (self.cursor + self.order.len() - 1) % self.order.len();
        self.current()
    }

    /// Advances after a track finished on its own.
    ///
    /// Same traversal as `next`; a single-track playlist wraps back to the
    /// same track, which the session plays again.
    pub fn advance(&mut self) -> TrackIndex {
        self.next()
    }

    /// Switches between sequential and shuffled traversal.
    ///
    /// Enabling generates a fresh permutation; disabling restores index
    /// order. Either way the cursor is relocated so `current()` does not
    /// change. Re-applying the active mode is a no-op.
    pub fn set_shuffled(&mut self, enabled: bool) {
        if enabled == self.shuffled {
            return;
        }

        let playing = self.order[self.cursor];
        if enabled {
            self.shuffle_order();
            self.relocate_cursor(playing);
        } else {
            self.order = (0..self.order.len()).collect();
            self.cursor = playing;
        }
        self.shuffled = enabled;

        tracing::debug!(
            shuffled = enabled,
            cursor = self.cursor,
            "playlist traversal order switched"
        );
    }

    /// Regenerates the shuffled permutation in place.
    ///
    /// The current track stays under the cursor so playback is unaffected.
    /// Ignored in sequential order; switching modes is `set_shuffled`.
    pub fn reshuffle(&mut self) {
        if !self.shuffled {
            tracing::debug!("reshuffle ignored while in sequential order");
            return;
        }

        let playing = self.order[self.cursor];
        self.shuffle_order();
        self.relocate_cursor(playing);
    }

    /// Fisher-Yates shuffle over the whole order.
    fn shuffle_order(&mut self) {
        for i in (1..self.order.len()).rev() {
            let j = self.rng.random_range(0..=i);
            self.order.swap(i, j);
        }
    }

    fn relocate_cursor(&mut self, track: usize) {
        // The order is a permutation, so the track is always present.
        if let Some(position) = self.order.iter().position(|&t| t == track) {
            self.cursor = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_playlist_rejected() {
        let result = PlaylistSequencer::new(0, None);
        assert_eq!(result.unwrap_err(), PlaylistError::EmptyPlaylist);
    }

    #[test]
    fn test_sequential_traversal_wraps_both_directions() {
        // Three tracks [A, B, C]: forward visits B, C, then wraps to A;
        // stepping back from A lands on C.
        let mut sequencer = PlaylistSequencer::new(3, None).unwrap();

        assert_eq!(sequencer.current(), TrackIndex::new(0));
        assert_eq!(sequencer.next(), TrackIndex::new(1));
        assert_eq!(sequencer.next(), TrackIndex::new(2));
        assert_eq!(sequencer.next(), TrackIndex::new(0));
        assert_eq!(sequencer.previous(), TrackIndex::new(2));
    }

    #[test]
    fn test_full_cycle_returns_to_start_in_both_modes() {
        for shuffled in [false, true] {
            let mut sequencer = PlaylistSequencer::new(7, Some(11)).unwrap();
            sequencer.set_shuffled(shuffled);
            let start = sequencer.current();

            let mut visited = Vec::new();
            for _ in 0..7 {
                visited.push(sequencer.next().as_usize());
            }

            assert_eq!(sequencer.current(), start);
            visited.sort_unstable();
            assert_eq!(visited, (0..7).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_previous_inverts_next() {
        for shuffled in [false, true] {
            let mut sequencer = PlaylistSequencer::new(5, Some(3)).unwrap();
            sequencer.set_shuffled(shuffled);
            let start = sequencer.current();

            for _ in 0..13 {
                sequencer.next();
            }
            for _ in 0..13 {
                sequencer.previous();
            }

            assert_eq!(sequencer.current(), start);
        }
    }

    #[test]
    fn test_enable_shuffle_preserves_current_track() {
        let mut sequencer = PlaylistSequencer::new(10, Some(5)).unwrap();
        sequencer.next();
        sequencer.next();
        let playing = sequencer.current();

        sequencer.set_shuffled(true);

        assert!(sequencer.is_shuffled());
        assert_eq!(sequencer.current(), playing);
    }

    #[test]
    fn test_disable_shuffle_restores_natural_position() {
        let mut sequencer = PlaylistSequencer::new(10, Some(5)).unwrap();
        sequencer.set_shuffled(true);
        for _ in 0..4 {
            sequencer.next();
        }
        let playing = sequencer.current();

        sequencer.set_shuffled(false);

        assert!(!sequencer.is_shuffled());
        assert_eq!(sequencer.current(), playing);
        // Back in index order, the successor is the natural next index.
        let expected = TrackIndex::new((playing.as_usize() + 1) % 10);
        assert_eq!(sequencer.next(), expected);
    }

    #[test]
    fn test_reshuffle_preserves_current_track() {
        let mut sequencer = PlaylistSequencer::new(10, Some(5)).unwrap();
        sequencer.set_shuffled(true);
        sequencer.next();
        let playing = sequencer.current();

        sequencer.reshuffle();

        assert_eq!(sequencer.current(), playing);
    }

    #[test]
    fn test_reshuffle_ignored_in_sequential_order() {
        let mut sequencer = PlaylistSequencer::new(6, Some(5)).unwrap();
        let before = sequencer.order();

        sequencer.reshuffle();

        assert_eq!(sequencer.order(), before);
        assert!(!sequencer.is_shuffled());
    }

    #[test]
    fn test_shuffled_order_is_a_permutation() {
        let mut sequencer = PlaylistSequencer::new(16, Some(8)).unwrap();
        sequencer.set_shuffled(true);

        let mut order: Vec<usize> = sequencer.order().iter().map(|t| t.as_usize()).collect();
        order.sort_unstable();
        assert_eq!(order, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_single_track_wraps_to_itself() {
        let mut sequencer = PlaylistSequencer::new(1, None).unwrap();

        assert_eq!(sequencer.next(), TrackIndex::new(0));
        assert_eq!(sequencer.previous(), TrackIndex::new(0));
        assert_eq!(sequencer.advance(), TrackIndex::new(0));

        sequencer.set_shuffled(true);
        assert_eq!(sequencer.next(), TrackIndex::new(0));
    }

    #[test]
    fn test_seeded_shuffles_are_deterministic() {
        let mut first = PlaylistSequencer::new(12, Some(42)).unwrap();
        let mut second = PlaylistSequencer::new(12, Some(42)).unwrap();

        first.set_shuffled(true);
        second.set_shuffled(true);

        assert_eq!(first.order(), second.order());

        first.reshuffle();
        second.reshuffle();
        assert_eq!(first.order(), second.order());
    }

    #[test]
    fn test_upcoming_starts_at_current() {
        let mut sequencer = PlaylistSequencer::new(4, None).unwrap();
        sequencer.next();

        let upcoming = sequencer.upcoming();

        assert_eq!(upcoming.len(), 4);
        assert_eq!(upcoming[0], sequencer.current());
        assert_eq!(upcoming[1], TrackIndex::new(2));
        assert_eq!(upcoming[3], TrackIndex::new(0));
    }

    #[test]
    fn test_track_index_display() {
        assert_eq!(TrackIndex::new(7).to_string(), "7");
    }
}
