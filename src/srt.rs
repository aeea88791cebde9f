use std::fmt;
use std::time::Duration;

/// A single subtitle cue.
///
/// `start` and `end` are both offsets from the beginning of the media;
/// `end` is the absolute hide time, not the length of the cue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtitle {
    pub number: i64,
    pub start: Duration,
    pub end: Duration,
    pub text: String,
    pub position: Option<Rect>,
}

impl Subtitle {
    pub fn new(number: i64, start: Duration, end: Duration, text: impl Into<String>) -> Self {
        Self {
            number,
            start,
            end,
            text: text.into(),
            position: None,
        }
    }

    pub fn with_position(mut self, position: Rect) -> Self {
        self.position = Some(position);
        self
    }
}

/// DVD-style display rectangle found after the end timecode,
/// e.g. `X1:63 X2:223 Y1:43 Y2:58`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x1: u32,
    pub x2: u32,
    pub y1: u32,
    pub y2: u32,
}

impl fmt::Display for Rect {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "X1:{} X2:{} Y1:{} Y2:{}",
            self.x1, self.x2, self.y1, self.y2
        )
    }
}
