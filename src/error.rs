use thiserror::Error;

/// Recoverable conditions raised by the slotting engine.
///
/// Malformed or missing input fields are never errors; they are defaulted
/// during normalization. These variants cover lifecycle violations the caller
/// is expected to resolve (usually by collecting more scores).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlottingError {
    #[error("round is incomplete: {} fixture(s) still need scores", unscored.len())]
    RoundIncomplete { unscored: Vec<String> },

    #[error("round has no fixtures yet")]
    RoundNotStarted,

    #[error("unknown match id: {0}")]
    UnknownMatch(String),

    #[error("match {0} already has a reported score")]
    AlreadyScored(String),

    #[error("group {level} has {size} players; fixtures exist only for groups of 4 or 5")]
    UnsupportedGroupSize { level: u32, size: usize },
}
