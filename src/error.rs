/// Rejections a match operation can report. State is untouched whenever one
/// of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// The minutes entered for the futsal clock are not a positive integer.
    #[error("invalid time: {0:?}")]
    InvalidDuration(String),

    /// The period length can only change while the clock is paused.
    #[error("pause the clock before changing the time")]
    ClockRunning,

    /// Undo was requested with an empty history.
    #[error("nothing to undo")]
    NothingToUndo,
}
