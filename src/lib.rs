//! Reading and writing SubRip (`.srt`) subtitles.
//!
//! [`Decoder`] pulls [`Subtitle`]s out of any reader one at a time, and
//! [`write_subtitle`] renders them back in canonical form.

mod error;
mod parser;
mod scanner;
mod serialiser;
mod srt;

pub use crate::error::{Result, SrtError};
pub use crate::parser::{parse_timecode, Decoder, DecoderOptions};
pub use crate::scanner::scan_chunk;
pub use crate::serialiser::{format_timecode, write_subtitle, write_subtitles, write_timecode};
pub use crate::srt::{Rect, Subtitle};
