use std::fmt;

/// What happens when a track plays to its end.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Advance, and stop after the last track (unless shuffling).
    #[default]
    Off,
    /// Restart the same track.
    One,
    /// Advance, wrapping around to the first track.
    All,
}

impl RepeatMode {
    /// `Off -> One -> All -> Off`.
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::One,
            Self::One => Self::All,
            Self::All => Self::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::One => "one",
            Self::All => "all",
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of handling a natural end of track.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EndOutcome {
    /// Repeat-one: same track from the start.
    Restarted,
    /// Reached the end of the list with nothing to advance to.
    Stopped,
    /// Moved on through the same path as the "next" action.
    Advanced,
}
