use crate::error::{Result, SrtError};
use crate::scanner::scan_chunk;
use crate::srt::{Rect, Subtitle};

use std::borrow::Cow;
use std::io::{self, Read};
use std::iter::FusedIterator;
use std::time::Duration;

use nom::bytes::complete::{tag, take_while1, take_while_m_n};
use nom::combinator::{all_consuming, map_res, verify};
use nom::error::ErrorKind;
use nom::{error_position, Err, IResult};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace, warn};

const BOM: &[u8] = b"\xEF\xBB\xBF";
const READ_SIZE: usize = 8 * 1024;

static POSITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)X1:(\d+) X2:(\d+) Y1:(\d+) Y2:(\d+)$").expect("position pattern is valid")
});

#[derive(Debug, Clone)]
pub struct DecoderOptions {
    /// Skip malformed subtitles instead of stopping at the first one.
    pub lenient: bool,
    /// Largest number of bytes buffered while looking for the end of a chunk.
    pub max_chunk_len: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            lenient: false,
            max_chunk_len: 64 * 1024,
        }
    }
}

/// Pulls subtitles out of a reader one at a time.
///
/// Input is read lazily: the decoder only reads when its buffer does not
/// hold a complete chunk yet. The first error ends decoding.
pub struct Decoder<R> {
    reader: R,
    options: DecoderOptions,
    buf: Vec<u8>,
    at_eof: bool,
    bom_checked: bool,
    done: bool,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, DecoderOptions::default())
    }

    pub fn with_options(reader: R, options: DecoderOptions) -> Self {
        Self {
            reader,
            options,
            buf: Vec::new(),
            at_eof: false,
            bom_checked: false,
            done: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Returns the next subtitle, `Ok(None)` at the end of the stream.
    ///
    /// Once an error has been returned the decoder is exhausted and keeps
    /// returning `Ok(None)`.
    pub fn next_subtitle(&mut self) -> Result<Option<Subtitle>> {
        if self.done {
            return Ok(None);
        }
        match self.advance() {
            Ok(Some(sub)) => Ok(Some(sub)),
            other => {
                self.done = true;
                other
            }
        }
    }

    fn advance(&mut self) -> Result<Option<Subtitle>> {
        loop {
            let chunk = match self.next_chunk()? {
                Some(chunk) => chunk,
                None => return Ok(None),
            };
            let text = String::from_utf8_lossy(&chunk);
            if matches!(text, Cow::Owned(_)) {
                warn!("Replaced invalid UTF-8 in subtitle chunk");
            }
            if text.trim().is_empty() {
                debug!("Skipping blank chunk of {} bytes", chunk.len());
                continue;
            }
            match parse_chunk(&text) {
                Ok(sub) => return Ok(Some(sub)),
                Err(err) if self.options.lenient && err.is_format_error() => {
                    warn!("Skipping malformed subtitle: {}", err);
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        loop {
            if !self.bom_checked && (self.buf.len() >= BOM.len() || self.at_eof) {
                if self.buf.starts_with(BOM) {
                    self.buf.drain(..BOM.len());
                }
                self.bom_checked = true;
            }
            if self.bom_checked {
                if let Some((advance, chunk)) = scan_chunk(&self.buf, self.at_eof) {
                    trace!("Found chunk of {} bytes", chunk.len());
                    let chunk = chunk.to_vec();
                    self.buf.drain(..advance);
                    return Ok(Some(chunk));
                }
                if self.at_eof {
                    return Ok(None);
                }
                if self.buf.len() > self.options.max_chunk_len {
                    return Err(SrtError::ChunkTooLong {
                        limit: self.options.max_chunk_len,
                    });
                }
            }
            self.fill_buf()?;
        }
    }

    fn fill_buf(&mut self) -> Result<()> {
        let mut block = [0u8; READ_SIZE];
        loop {
            match self.reader.read(&mut block) {
                Ok(0) => {
                    self.at_eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.buf.extend_from_slice(&block[..n]);
                    return Ok(());
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(SrtError::Read(err)),
            }
        }
    }
}

impl<R: Read> Iterator for Decoder<R> {
    type Item = Result<Subtitle>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_subtitle().transpose()
    }
}

impl<R: Read> FusedIterator for Decoder<R> {}

/// Parses one chunk: number line, timing line, then the text.
pub(crate) fn parse_chunk(chunk: &str) -> Result<Subtitle> {
    let chunk = chunk.trim_matches(|c: char| c == '\r' || c == '\n');
    let mut lines = chunk.split('\n').map(|line| line.trim_end_matches('\r'));

    let number_line = lines.next().unwrap_or_default();
    let number = number_line
        .trim()
        .parse::<i64>()
        .map_err(|_| SrtError::MalformedNumber {
            line: number_line.to_string(),
        })?;

    let timing_line = lines.next().unwrap_or_default();
    let fields: Vec<&str> = timing_line.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(SrtError::MalformedTimecodeLine {
            line: timing_line.to_string(),
        });
    }
    let start = parse_timecode(fields[0])?;
    let end = parse_timecode(fields[2])?;
    let position = position(&fields[3..]);

    let text = lines.collect::<Vec<_>>().join("\n");

    Ok(Subtitle {
        number,
        start,
        end,
        text,
        position,
    })
}

fn position(fields: &[&str]) -> Option<Rect> {
    if fields.is_empty() {
        return None;
    }
    let joined = fields.join(" ");
    let rect = POSITION.captures(&joined).and_then(|caps| {
        let coord = |i: usize| caps[i].parse::<u32>().ok();
        Some(Rect {
            x1: coord(1)?,
            x2: coord(2)?,
            y1: coord(3)?,
            y2: coord(4)?,
        })
    });
    if rect.is_none() {
        debug!("Dropping unrecognised timing metadata: '{}'", joined);
    }
    rect
}

/// Parses a `HH:MM:SS,mmm` timecode. Hours may have more than two digits.
pub fn parse_timecode(token: &str) -> Result<Duration> {
    all_consuming(timestamp)(token)
        .map(|(_, duration)| duration)
        .map_err(|_| SrtError::MalformedTimecode {
            token: token.to_string(),
        })
}

fn digits<'a>(min: usize, max: usize) -> impl FnMut(&'a str) -> IResult<&'a str, u64> {
    map_res(
        take_while_m_n(min, max, |c: char| c.is_ascii_digit()),
        |s: &str| s.parse::<u64>(),
    )
}

fn hours(input: &str) -> IResult<&str, u64> {
    map_res(
        verify(take_while1(|c: char| c.is_ascii_digit()), |s: &str| {
            s.len() >= 2
        }),
        |s: &str| s.parse::<u64>(),
    )(input)
}

fn timestamp(input: &str) -> IResult<&str, Duration> {
    let (input, hours) = hours(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, minutes) = digits(2, 2)(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, seconds) = digits(2, 2)(input)?;
    let (input, _) = tag(",")(input)?;
    let (input, millis) = digits(3, 3)(input)?;

    let total_secs = hours
        .checked_mul(60 * 60)
        .and_then(|secs| secs.checked_add(minutes * 60 + seconds));
    match total_secs {
        Some(secs) => Ok((input, Duration::new(secs, millis as u32 * 1_000_000))),
        None => Err(Err::Error(error_position!(input, ErrorKind::TooLarge))),
    }
}
