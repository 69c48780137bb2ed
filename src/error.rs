use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("position {position} is outside the board (0..{len})")]
    IndexOutOfRange { position: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, PuzzleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = PuzzleError::IndexOutOfRange {
            position: 16,
            len: 16,
        };
        assert_eq!(err.to_string(), "position 16 is outside the board (0..16)");

        let err = PuzzleError::InvalidConfiguration("size must be at least 2, got 1".into());
        assert!(err.to_string().contains("got 1"));
    }
}
