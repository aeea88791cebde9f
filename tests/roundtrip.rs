use std::io::{self, Read};
use std::time::Duration;

use subrip::{write_subtitles, Decoder, DecoderOptions, Rect, SrtError, Subtitle};

const SAMPLE: &str = "1
00:00:01,000 --> 00:00:03,500
Hello world

2
00:00:04,000 --> 00:00:05,000
Second line";

fn decode_all(input: &[u8]) -> Vec<Subtitle> {
    Decoder::new(input)
        .collect::<Result<Vec<_>, _>>()
        .expect("input should decode")
}

fn encode_all(subs: &[Subtitle]) -> String {
    let mut buf = Vec::new();
    write_subtitles(&mut buf, subs).expect("writing to a Vec cannot fail");
    String::from_utf8(buf).unwrap()
}

/// Hands out at most one byte per read.
struct Trickle<'a>(&'a [u8]);

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let data: &[u8] = self.0;
        match (data.split_first(), buf.first_mut()) {
            (Some((&b, rest)), Some(slot)) => {
                *slot = b;
                self.0 = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

/// Yields its data, then fails instead of signalling end of stream.
struct Broken<'a>(&'a [u8]);

impl Read for Broken<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.0.is_empty() {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "gone"));
        }
        let n = self.0.read(buf)?;
        Ok(n)
    }
}

#[test]
fn decodes_sample_file() {
    let subs = decode_all(SAMPLE.as_bytes());
    assert_eq!(
        subs,
        vec![
            Subtitle::new(
                1,
                Duration::from_millis(1_000),
                Duration::from_millis(3_500),
                "Hello world"
            ),
            Subtitle::new(
                2,
                Duration::from_millis(4_000),
                Duration::from_millis(5_000),
                "Second line"
            ),
        ]
    );
}

#[test]
fn reencoding_reproduces_input() {
    let subs = decode_all(SAMPLE.as_bytes());
    assert_eq!(encode_all(&subs), format!("{}\n\n", SAMPLE));
}

#[test]
fn encoded_records_decode_to_equal_records() {
    let subs = vec![
        Subtitle::new(1, Duration::ZERO, Duration::from_millis(999), "<b>bold</b>"),
        Subtitle::new(
            2,
            Duration::from_millis(3_723_004),
            Duration::from_millis(360_000_001),
            "Line one\nLine two\n{i}three{/i}",
        ),
        Subtitle::new(3, Duration::from_secs(5), Duration::from_secs(6), ""),
        Subtitle::new(4, Duration::from_secs(7), Duration::from_secs(8), "Boxed").with_position(
            Rect {
                x1: 53,
                x2: 303,
                y1: 438,
                y2: 453,
            },
        ),
    ];
    let encoded = encode_all(&subs);
    assert_eq!(decode_all(encoded.as_bytes()), subs);
}

#[test]
fn boundary_styles_decode_alike() {
    let body = |nl: &str, sep: &str| {
        format!(
            "1{nl}00:00:01,000 --> 00:00:02,000{nl}A{nl}B{sep}2{nl}00:00:03,000 --> 00:00:04,000{nl}C{nl}",
            nl = nl,
            sep = sep
        )
    };
    let expected = decode_all(body("\n", "\n\n").as_bytes());
    assert_eq!(expected.len(), 2);
    assert_eq!(expected[0].text, "A\nB");
    assert_eq!(decode_all(body("\r\n", "\r\n\r\n").as_bytes()), expected);
    assert_eq!(decode_all(body("\n", "\n\r\n").as_bytes()), expected);
}

#[test]
fn decodes_from_one_byte_reads() {
    let input = format!("\u{FEFF}{}\r\n", SAMPLE.replace('\n', "\r\n"));
    let subs: Vec<Subtitle> = Decoder::new(Trickle(input.as_bytes()))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(subs, decode_all(SAMPLE.as_bytes()));
}

#[test]
fn first_record_is_available_before_stream_ends() {
    let mut decoder = Decoder::new(Broken(b"1\n00:00:01,000 --> 00:00:02,000\nA\n\n2\n"));
    let first = decoder.next_subtitle().unwrap().unwrap();
    assert_eq!(first.text, "A");
    assert!(matches!(decoder.next_subtitle(), Err(SrtError::Read(_))));
    assert!(decoder.next_subtitle().unwrap().is_none());
}

#[test]
fn read_failure_stays_terminal_in_lenient_mode() {
    let options = DecoderOptions {
        lenient: true,
        ..DecoderOptions::default()
    };
    let mut decoder = Decoder::with_options(
        Broken(b"1\n00:00:01,000 --> 00:00:02,000\nA\n\n2\n"),
        options,
    );
    assert!(decoder.next_subtitle().unwrap().is_some());
    assert!(matches!(decoder.next_subtitle(), Err(SrtError::Read(_))));
    assert!(decoder.next_subtitle().unwrap().is_none());
}

#[test]
fn very_long_media_round_trips() {
    let subs = vec![Subtitle::new(
        -1,
        Duration::from_secs(3600 * 99),
        Duration::from_secs(3600 * 100_000_000_000),
        "Still going",
    )];
    let encoded = encode_all(&subs);
    assert!(encoded.contains(" --> 100000000000:00:00,000\n"));
    assert_eq!(decode_all(encoded.as_bytes()), subs);
}

#[test]
fn malformed_timing_line_halts_decoding() {
    let input = "1
00:00:01,000
Hello

2
00:00:04,000 --> 00:00:05,000
Fine";
    let mut decoder = Decoder::new(input.as_bytes());
    match decoder.next() {
        Some(Err(SrtError::MalformedTimecodeLine { line })) => assert_eq!(line, "00:00:01,000"),
        other => panic!("expected MalformedTimecodeLine, got {:?}", other),
    }
    assert!(decoder.next().is_none());
}

#[test]
fn empty_input_has_no_records() {
    assert!(decode_all(b"").is_empty());
    assert!(decode_all(b"\n\n\r\n").is_empty());
}
