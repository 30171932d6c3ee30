//! ASCII PPM (P3) decoder
//!
//! Parses the plain-text PPM format: a "P3" magic token, zero or more
//! `#` comment lines, a width/height/maxval header, then width×height
//! RGB triples of whitespace-separated decimal samples.
//!
//! Deliberately strict: only the ASCII variant is accepted (binary "P6"
//! is rejected, not auto-detected), maxval must be exactly 255, and a
//! sample outside 0–255 is an error rather than being truncated.

use std::fmt;
use std::path::Path;

/// Refuse images whose decoded buffer would exceed this many bytes.
/// A plausible P3 file never comes close; a hostile header shouldn't
/// get to pick the allocation size.
pub const MAX_PIXEL_BYTES: u64 = 1_073_741_824;

/// A fully decoded image. `pixels` is row-major with channel order
/// R,G,B and `pixels.len() == width * height * 3` — this holds for
/// every value returned by [`decode`] or [`parse`]; partially filled
/// buffers are never exposed.
#[derive(Debug)]
pub struct PpmImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

#[derive(Debug)]
pub enum DecodeError {
    /// File could not be opened or read.
    Io(std::io::Error),
    /// Magic token was not "P3" (stores what was found).
    InvalidFormat(String),
    /// Missing, malformed, or nonpositive width/height/maxval.
    InvalidHeader(&'static str),
    /// Header maxval other than 255.
    UnsupportedColorDepth(i64),
    /// Decoded buffer would exceed [`MAX_PIXEL_BYTES`].
    TooLarge { width: u64, height: u64 },
    /// A pixel sample outside 0–255.
    SampleOutOfRange(i64),
    /// Fewer parseable samples than width × height × 3.
    TruncatedPixelData { expected: usize, got: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Io(e) => write!(f, "i/o error: {}", e),
            DecodeError::InvalidFormat(found) => {
                write!(f, "not an ASCII PPM file (magic \"{}\", expected \"P3\")", found)
            }
            DecodeError::InvalidHeader(why) => write!(f, "invalid PPM header: {}", why),
            DecodeError::UnsupportedColorDepth(maxval) => {
                write!(f, "unsupported max color value {} (only 255 is supported)", maxval)
            }
            DecodeError::TooLarge { width, height } => {
                write!(f, "image {}x{} is too large to decode", width, height)
            }
            DecodeError::SampleOutOfRange(v) => {
                write!(f, "pixel sample {} is outside 0-255", v)
            }
            DecodeError::TruncatedPixelData { expected, got } => {
                write!(f, "truncated pixel data: expected {} samples, found {}", expected, got)
            }
        }
    }
}

/// Decode the PPM file at `path`.
pub fn decode(path: &Path) -> Result<PpmImage, DecodeError> {
    let bytes = std::fs::read(path).map_err(DecodeError::Io)?;
    parse(&bytes)
}

/// Decode a PPM file already read into memory.
pub fn parse(bytes: &[u8]) -> Result<PpmImage, DecodeError> {
    let mut scan = Scanner::new(bytes);

    let magic = scan.next_token().unwrap_or(b"");
    if magic != b"P3" {
        return Err(DecodeError::InvalidFormat(
            String::from_utf8_lossy(magic).into_owned(),
        ));
    }

    // Comment lines are only valid between the magic and the header.
    scan.skip_comments();

    let width = scan
        .next_int()
        .ok_or(DecodeError::InvalidHeader("missing or malformed width"))?;
    let height = scan
        .next_int()
        .ok_or(DecodeError::InvalidHeader("missing or malformed height"))?;
    let maxval = scan
        .next_int()
        .ok_or(DecodeError::InvalidHeader("missing or malformed max color value"))?;

    if maxval != 255 {
        return Err(DecodeError::UnsupportedColorDepth(maxval));
    }
    if width <= 0 || height <= 0 {
        return Err(DecodeError::InvalidHeader("width and height must be positive"));
    }

    let expected_bytes = width as u64 * height as u64 * 3;
    if expected_bytes > MAX_PIXEL_BYTES {
        return Err(DecodeError::TooLarge {
            width: width as u64,
            height: height as u64,
        });
    }

    let expected = expected_bytes as usize;
    let mut pixels = Vec::with_capacity(expected);
    while pixels.len() < expected {
        match scan.next_int() {
            Some(v @ 0..=255) => pixels.push(v as u8),
            Some(v) => return Err(DecodeError::SampleOutOfRange(v)),
            None => {
                return Err(DecodeError::TruncatedPixelData {
                    expected,
                    got: pixels.len(),
                })
            }
        }
    }

    Ok(PpmImage {
        width: width as u32,
        height: height as u32,
        pixels,
    })
}

/// Whitespace-delimited token scanner over the raw file bytes.
///
/// The whole file is in memory, so every lookahead is bounded: a
/// comment line that ends at end-of-file exhausts the cursor instead
/// of reading past it.
struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    /// Skip comment lines: a `#` after whitespace discards everything
    /// up to and including the next newline (or end of input).
    fn skip_comments(&mut self) {
        loop {
            self.skip_whitespace();
            if self.bytes.get(self.pos) != Some(&b'#') {
                return;
            }
            while let Some(&b) = self.bytes.get(self.pos) {
                self.pos += 1;
                if b == b'\n' {
                    break;
                }
            }
        }
    }

    /// Next whitespace-delimited token, or `None` at end of input.
    fn next_token(&mut self) -> Option<&'a [u8]> {
        self.skip_whitespace();
        if self.pos >= self.bytes.len() {
            return None;
        }
        let start = self.pos;
        while self.pos < self.bytes.len() && !self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        Some(&self.bytes[start..self.pos])
    }

    /// Next token parsed as a decimal integer; `None` at end of input
    /// or on a non-numeric token.
    fn next_int(&mut self) -> Option<i64> {
        let token = self.next_token()?;
        std::str::from_utf8(token).ok()?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED_GREEN_2X1: &[u8] = b"P3\n2 1 255\n255 0 0 0 255 0\n";

    #[test]
    fn test_decode_two_pixels() {
        let img = parse(RED_GREEN_2X1).unwrap();
        assert_eq!(img.width, 2);
        assert_eq!(img.height, 1);
        assert_eq!(img.pixels, vec![255, 0, 0, 0, 255, 0]);
    }

    #[test]
    fn test_pixel_length_invariant() {
        let img = parse(b"P3\n3 2 255\n0 0 0 1 1 1 2 2 2 3 3 3 4 4 4 5 5 5").unwrap();
        assert_eq!(
            img.pixels.len(),
            img.width as usize * img.height as usize * 3
        );
    }

    #[test]
    fn test_decode_is_idempotent() {
        let a = parse(RED_GREEN_2X1).unwrap();
        let b = parse(RED_GREEN_2X1).unwrap();
        assert_eq!(a.width, b.width);
        assert_eq!(a.height, b.height);
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_whitespace_variants() {
        let img = parse(b"P3\n2 1 255\n255\t0\r\n0   0 255 0\n").unwrap();
        assert_eq!(img.pixels, vec![255, 0, 0, 0, 255, 0]);
    }

    #[test]
    fn test_comments_are_skipped() {
        let with = parse(b"P3\n# made by hand\n# second comment\n2 1 255\n255 0 0 0 255 0\n")
            .unwrap();
        let without = parse(RED_GREEN_2X1).unwrap();
        assert_eq!(with.pixels, without.pixels);
        assert_eq!((with.width, with.height), (without.width, without.height));
    }

    #[test]
    fn test_comment_at_end_of_file_terminates() {
        // No trailing newline after the comment — must fail cleanly,
        // not scan past the end of the input.
        let err = parse(b"P3\n# nothing follows").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidHeader(_)));
    }

    #[test]
    fn test_rejects_binary_ppm() {
        let err = parse(b"P6\n2 1 255\n").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidFormat(ref m) if m == "P6"));
    }

    #[test]
    fn test_rejects_other_magic() {
        assert!(matches!(
            parse(b"P2\n2 1 255\n0 0").unwrap_err(),
            DecodeError::InvalidFormat(_)
        ));
        assert!(matches!(
            parse(b"garbage").unwrap_err(),
            DecodeError::InvalidFormat(_)
        ));
        assert!(matches!(
            parse(b"").unwrap_err(),
            DecodeError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_rejects_unsupported_maxval() {
        assert!(matches!(
            parse(b"P3\n2 1 65535\n0 0 0 0 0 0").unwrap_err(),
            DecodeError::UnsupportedColorDepth(65535)
        ));
        assert!(matches!(
            parse(b"P3\n2 1 1\n0 0 0 0 0 0").unwrap_err(),
            DecodeError::UnsupportedColorDepth(1)
        ));
    }

    #[test]
    fn test_incomplete_header() {
        assert!(matches!(
            parse(b"P3\n2 1\n").unwrap_err(),
            DecodeError::InvalidHeader(_)
        ));
        assert!(matches!(
            parse(b"P3\nwide tall 255\n").unwrap_err(),
            DecodeError::InvalidHeader(_)
        ));
    }

    #[test]
    fn test_nonpositive_dimensions() {
        assert!(matches!(
            parse(b"P3\n0 5 255\n").unwrap_err(),
            DecodeError::InvalidHeader(_)
        ));
        assert!(matches!(
            parse(b"P3\n-2 1 255\n").unwrap_err(),
            DecodeError::InvalidHeader(_)
        ));
    }

    #[test]
    fn test_oversized_dimensions() {
        let err = parse(b"P3\n100000 100000 255\n0").unwrap_err();
        assert!(matches!(err, DecodeError::TooLarge { .. }));
    }

    #[test]
    fn test_truncated_pixel_data() {
        let err = parse(b"P3\n2 1 255\n255 0 0\n").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TruncatedPixelData { expected: 6, got: 3 }
        ));
    }

    #[test]
    fn test_garbage_sample_is_truncation() {
        let err = parse(b"P3\n2 1 255\n255 0 0 zero 255 0\n").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TruncatedPixelData { expected: 6, got: 3 }
        ));
    }

    #[test]
    fn test_sample_out_of_range() {
        assert!(matches!(
            parse(b"P3\n2 1 255\n255 0 0 300 255 0\n").unwrap_err(),
            DecodeError::SampleOutOfRange(300)
        ));
        assert!(matches!(
            parse(b"P3\n2 1 255\n-1 0 0 0 255 0\n").unwrap_err(),
            DecodeError::SampleOutOfRange(-1)
        ));
    }

    #[test]
    fn test_trailing_data_is_ignored() {
        let img = parse(b"P3\n1 1 255\n1 2 3 99 99 99\n").unwrap();
        assert_eq!(img.pixels, vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_from_file() {
        let path = std::env::temp_dir().join("ppmview_test_2x1.ppm");
        std::fs::write(&path, RED_GREEN_2X1).unwrap();
        let img = decode(&path).unwrap();
        assert_eq!((img.width, img.height), (2, 1));
        assert_eq!(img.pixels, vec![255, 0, 0, 0, 255, 0]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_decode_missing_file() {
        let err = decode(Path::new("/nonexistent/ppmview_missing.ppm")).unwrap_err();
        assert!(matches!(err, DecodeError::Io(_)));
    }
}
