use crate::error::{Result, SrtError};
use crate::srt::Subtitle;

use std::io::Write;
use std::time::Duration;

/// Keeps count of the bytes handed to the writer so a failure can report
/// how much of the record made it out.
struct Tally<'a, W> {
    inner: &'a mut W,
    written: usize,
}

impl<'a, W: Write> Tally<'a, W> {
    fn new(inner: &'a mut W) -> Self {
        Self { inner, written: 0 }
    }

    fn put(&mut self, s: &str) -> Result<()> {
        self.inner
            .write_all(s.as_bytes())
            .map_err(|source| SrtError::Write {
                written: self.written,
                source,
            })?;
        self.written += s.len();
        Ok(())
    }
}

/// Writes every subtitle in order and returns the total number of bytes.
pub fn write_subtitles<'s, W, I>(buf: &mut W, subs: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'s Subtitle>,
{
    let mut total = 0;
    for sub in subs {
        total += write_subtitle(buf, sub).map_err(|err| match err {
            SrtError::Write { written, source } => SrtError::Write {
                written: total + written,
                source,
            },
            other => other,
        })?;
    }
    Ok(total)
}

/// Writes one subtitle followed by a blank line.
///
/// Stops at the first failed write; whatever was written before it stays
/// on the destination.
pub fn write_subtitle<W: Write>(buf: &mut W, sub: &Subtitle) -> Result<usize> {
    let mut out = Tally::new(buf);
    out.put(&format!("{}\n", sub.number))?;
    out.put(&format_timecode(sub.start))?;
    out.put(" --> ")?;
    out.put(&format_timecode(sub.end))?;
    if let Some(position) = sub.position {
        out.put(&format!(" {}", position))?;
    }
    out.put("\n")?;
    out.put(&sub.text)?;
    out.put("\n\n")?;
    Ok(out.written)
}

pub fn write_timecode<W: Write>(buf: &mut W, timestamp: Duration) -> Result<usize> {
    let mut out = Tally::new(buf);
    out.put(&format_timecode(timestamp))?;
    Ok(out.written)
}

/// Renders `HH:MM:SS,mmm`, truncating anything below a millisecond.
pub fn format_timecode(timestamp: Duration) -> String {
    let total_secs = timestamp.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = timestamp.subsec_millis();
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}
