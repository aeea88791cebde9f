use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SrtError>;

#[derive(Debug, Error)]
pub enum SrtError {
    #[error("srt: invalid subtitle number: '{line}'")]
    MalformedNumber { line: String },

    #[error("srt: invalid timestamp on row: '{line}'")]
    MalformedTimecodeLine { line: String },

    #[error("srt: invalid timecode: '{token}'")]
    MalformedTimecode { token: String },

    #[error("srt: chunk exceeds {limit} bytes without a blank line")]
    ChunkTooLong { limit: usize },

    #[error("srt: failed to read input")]
    Read(#[source] io::Error),

    #[error("srt: write failed after {written} bytes")]
    Write {
        written: usize,
        #[source]
        source: io::Error,
    },
}

impl SrtError {
    /// Whether the error comes from the content of a chunk rather than the
    /// stream carrying it.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            SrtError::MalformedNumber { .. }
                | SrtError::MalformedTimecodeLine { .. }
                | SrtError::MalformedTimecode { .. }
        )
    }
}
