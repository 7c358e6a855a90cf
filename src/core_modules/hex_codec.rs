// THEORY:
// The hex codec is the interchange format shared with the accelerated
// implementation under test. A stream is one hex byte per line, row-major,
// lowercase, without zero padding, and each value is terminated by a newline.
// Dimensions are not stored in the stream: a decoder is told the grid size and
// checks that the token count matches it exactly. Encoding a decoded canonical
// stream reproduces it byte for byte.

use std::fmt::Write as _;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::config::{GRID_HEIGHT, GRID_WIDTH};
use crate::core_modules::grid::grid::{Grid, Sample};
use crate::error::{FormatError, GoldenError, Stage};

/// Decodes a reference-sized (512x512) grid from a hex file.
pub fn decode(path: impl AsRef<Path>) -> Result<Grid, GoldenError> {
    decode_file(path, GRID_WIDTH, GRID_HEIGHT, Stage::Load)
}

/// Decodes a `width` x `height` grid from a hex file, reporting failures as `stage`.
pub fn decode_file(
    path: impl AsRef<Path>,
    width: usize,
    height: usize,
    stage: Stage,
) -> Result<Grid, GoldenError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| GoldenError::io(stage, path, e))?;
    debug!(path = %path.display(), bytes = bytes.len(), "read hex stream");
    decode_bytes(&bytes, width, height).map_err(|source| GoldenError::Format { stage, source })
}

/// Parses whitespace-separated hex tokens into a `width` x `height` grid.
pub fn decode_str(text: &str, width: usize, height: usize) -> Result<Grid, FormatError> {
    decode_bytes(text.as_bytes(), width, height)
}

/// Parses a raw stream split on ASCII whitespace. Bytes that are not hex digits,
/// including non-UTF-8 bytes, make their token invalid.
pub fn decode_bytes(stream: &[u8], width: usize, height: usize) -> Result<Grid, FormatError> {
    let expected = width * height;
    let tokens: Vec<&[u8]> = stream
        .split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
        .collect();
    if tokens.len() != expected {
        return Err(FormatError::TokenCount {
            expected,
            found: tokens.len(),
        });
    }

    let samples = tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            parse_token(token).ok_or_else(|| FormatError::InvalidToken {
                index,
                token: String::from_utf8_lossy(token).into_owned(),
            })
        })
        .collect::<Result<Vec<Sample>, FormatError>>()?;

    // Token count was checked against width * height above.
    Grid::from_vec(width, height, samples).map_err(|_| FormatError::TokenCount {
        expected,
        found: tokens.len(),
    })
}

fn parse_token(token: &[u8]) -> Option<Sample> {
    if token.is_empty() || !token.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let digits = std::str::from_utf8(token).ok()?;
    Sample::from_str_radix(digits, 16).ok()
}

/// Renders `grid` as a hex stream.
pub fn encode_to_string(grid: &Grid) -> String {
    // At most two digits plus a newline per sample.
    let mut out = String::with_capacity(grid.samples().len() * 3);
    for sample in grid.samples() {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{sample:x}");
    }
    out
}

/// Writes `grid` as a hex stream to `path`, replacing any existing file.
pub fn encode(grid: &Grid, path: impl AsRef<Path>) -> Result<(), GoldenError> {
    let path = path.as_ref();
    let file = fs::File::create(path).map_err(|e| GoldenError::io(Stage::Store, path, e))?;
    let mut writer = BufWriter::new(file);
    for sample in grid.samples() {
        writeln!(writer, "{sample:x}").map_err(|e| GoldenError::io(Stage::Store, path, e))?;
    }
    writer
        .flush()
        .map_err(|e| GoldenError::io(Stage::Store, path, e))?;
    debug!(path = %path.display(), samples = grid.samples().len(), "wrote hex stream");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_minimal_lowercase_tokens() {
        let grid = Grid::from_rows(vec![vec![0, 10, 255], vec![16, 1, 171]]).unwrap();
        assert_eq!(encode_to_string(&grid), "0\na\nff\n10\n1\nab\n");
    }

    #[test]
    fn decodes_row_major_and_accepts_any_whitespace() {
        let grid = decode_str("1 2\n3\r\n\tA\nff\n0\n", 3, 2).unwrap();
        assert_eq!(grid.row(0), &[1, 2, 3]);
        assert_eq!(grid.row(1), &[10, 255, 0]);
    }

    #[test]
    fn canonical_stream_round_trips() {
        let text = "0\na\nff\n7f\n80\n1\n";
        let grid = decode_str(text, 2, 3).unwrap();
        assert_eq!(encode_to_string(&grid), text);
    }

    #[test]
    fn wrong_token_count_reports_expected_and_found() {
        let err = decode_str("1\n2\n3\n", 2, 2).unwrap_err();
        assert_eq!(
            err,
            FormatError::TokenCount {
                expected: 4,
                found: 3
            }
        );
        assert_eq!(err.to_string(), "expected 4 hex tokens, found 3");

        let err = decode_str("1\n2\n3\n4\n5\n", 2, 2).unwrap_err();
        assert!(matches!(err, FormatError::TokenCount { found: 5, .. }));
    }

    #[test]
    fn rejects_out_of_range_and_non_hex_tokens() {
        for bad in ["100", "g", "0x1", "+a", "-1", "1.0"] {
            let text = format!("0\n{bad}\n0\n0\n");
            let err = decode_str(&text, 2, 2).unwrap_err();
            assert_eq!(
                err,
                FormatError::InvalidToken {
                    index: 1,
                    token: bad.to_string()
                },
                "token {bad:?}"
            );
        }
    }

    #[test]
    fn non_utf8_token_is_a_format_error_naming_the_token() {
        let err = decode_bytes(b"0\n1\n\xe9\n2\n", 2, 2).unwrap_err();
        assert_eq!(
            err,
            FormatError::InvalidToken {
                index: 2,
                token: "\u{fffd}".to_string()
            }
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.hex");
        let mut stream = b"0\n".repeat(GRID_WIDTH * GRID_HEIGHT - 1);
        stream.extend_from_slice(b"\xe9\n");
        fs::write(&path, stream).unwrap();
        let err = decode(&path).unwrap_err();
        assert!(matches!(
            err,
            GoldenError::Format {
                stage: Stage::Load,
                source: FormatError::InvalidToken { index: 262_143, .. }
            }
        ));
    }

    #[test]
    fn leading_zeros_are_accepted_on_input() {
        let grid = decode_str("00\n0a\n00ff\n1\n", 2, 2).unwrap();
        assert_eq!(grid.samples(), &[0, 10, 255, 1]);
    }

    #[test]
    fn file_round_trip_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.hex");
        let grid = Grid::from_vec(3, 1, vec![3, 200, 0]).unwrap();
        encode(&grid, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "3\nc8\n0\n");
        assert_eq!(decode_file(&path, 3, 1, Stage::Load).unwrap(), grid);

        let err = decode(dir.path().join("missing.hex")).unwrap_err();
        assert!(matches!(err, GoldenError::Io { stage: Stage::Load, .. }));
    }

    #[test]
    fn encode_into_missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("grid.hex");
        let err = encode(&Grid::new_fill(1, 1, 0), &path).unwrap_err();
        assert!(matches!(err, GoldenError::Io { stage: Stage::Store, .. }));
    }
}
