//! Locates subtitle chunks in a byte buffer.
//!
//! A chunk ends at the first double line break, either `\n\n` or `\n\r\n`.
//! The scanner only inspects the bytes it is handed; the decoder decides
//! when to read more.

fn drop_cr(data: &[u8]) -> &[u8] {
    match data.split_last() {
        Some((b'\r', rest)) => rest,
        _ => data,
    }
}

/// Finds the next chunk in `data`.
///
/// Returns the number of bytes to consume together with the chunk itself
/// (without the terminating line breaks or a trailing carriage return).
/// `None` means more input is needed, or, when `at_eof` is set, that the
/// buffer is exhausted.
pub fn scan_chunk(data: &[u8], at_eof: bool) -> Option<(usize, &[u8])> {
    if at_eof && data.is_empty() {
        return None;
    }
    for (i, _) in data.iter().enumerate().filter(|&(_, &b)| b == b'\n') {
        match &data[i + 1..] {
            [b'\n', ..] => return Some((i + 2, drop_cr(&data[..i]))),
            [b'\r', b'\n', ..] => return Some((i + 3, drop_cr(&data[..i]))),
            _ => (),
        }
    }
    if at_eof {
        // Final chunk without a terminating blank line.
        return Some((data.len(), drop_cr(data)));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_bare_double_newline() {
        let data = b"1\nfoo\n\n2\nbar";
        assert_eq!(scan_chunk(data, false), Some((7, &b"1\nfoo"[..])));
    }

    #[test]
    fn splits_on_crlf_blank_line() {
        let data = b"1\r\nfoo\r\n\r\n2\r\n";
        assert_eq!(scan_chunk(data, false), Some((10, &b"1\r\nfoo"[..])));
    }

    #[test]
    fn earliest_boundary_wins() {
        // The `\n\r\n` boundary comes before the `\n\n` one.
        let data = b"a\n\r\nb\n\nc";
        assert_eq!(scan_chunk(data, false), Some((4, &b"a"[..])));
    }

    #[test]
    fn requests_more_data_without_boundary() {
        assert_eq!(scan_chunk(b"1\nfoo\n", false), None);
        assert_eq!(scan_chunk(b"1\nfoo\n\r", false), None);
        assert_eq!(scan_chunk(b"", false), None);
    }

    #[test]
    fn returns_remainder_at_eof() {
        assert_eq!(scan_chunk(b"1\nfoo\r", true), Some((6, &b"1\nfoo"[..])));
        assert_eq!(scan_chunk(b"", true), None);
    }

    #[test]
    fn blank_run_yields_empty_chunk() {
        assert_eq!(scan_chunk(b"\n\nrest", false), Some((2, &b""[..])));
    }
}
