use super::{DecodeError, Pattern};
use crate::{CellState, Grid, Player, DEAD};

const MAX_LINE_LENGTH: usize = 70;

/// Largest `W * H` a pattern header may declare.
pub const MAX_PATTERN_CELLS: usize = 1 << 30;

/// Decodes a pattern in the [RLE](https://conwaylife.com/wiki/Run_Length_Encoded) format.
///
/// Lines starting with `#` are comments. The first remaining line is the
/// header `x = <W>, y = <H>`; anything after `y` (usually `rule = ...`) is
/// ignored. The body is a stream of `[count]tag` tokens where `b` is a run of
/// dead cells, `o` a run of live cells and `$` ends `count` rows; `!` ends
/// the pattern. Whitespace and line breaks inside the body are skipped.
///
/// # Errors
///
/// Besides syntax errors, any token that reaches a cell outside the declared
/// `W x H` rectangle fails with [`DecodeError::OutOfBounds`]. Headers
/// declaring more than [`MAX_PATTERN_CELLS`] cells are
/// [`DecodeError::MalformedHeader`].
pub fn decode_rle(data: &[u8]) -> Result<Pattern, DecodeError> {
    let mut lines = data
        .split(|&b| b == b'\n')
        .map(|x| x.strip_suffix(b"\r").unwrap_or(x))
        .filter(|x| {
            let x = x.trim_ascii_start();
            !x.is_empty() && x[0] != b'#'
        });

    let header = lines
        .next()
        .ok_or_else(|| DecodeError::MalformedHeader("missing header".to_string()))?;
    let (width, height) = parse_header(header)?;
    if !matches!(width.checked_mul(height), Some(cells) if cells <= MAX_PATTERN_CELLS) {
        return Err(DecodeError::MalformedHeader(format!(
            "pattern {}x{} exceeds {} cells",
            width, height, MAX_PATTERN_CELLS
        )));
    }
    let mut grid = Grid::new(width, height)
        .map_err(|err| DecodeError::MalformedHeader(err.to_string()))?;

    let (mut x, mut y) = (0usize, 0usize);
    let mut count: Option<usize> = None;

    'body: for line in lines {
        for &b in line {
            match b {
                b'0'..=b'9' => {
                    count = Some(
                        count
                            .unwrap_or(0)
                            .checked_mul(10)
                            .and_then(|c| c.checked_add((b - b'0') as usize))
                            .ok_or(DecodeError::RunLengthOverflow)?,
                    );
                }
                b'b' => {
                    let c = count.take().unwrap_or(1);
                    if c > 0 && y >= height {
                        return Err(DecodeError::OutOfBounds { x, y });
                    }
                    x = x.checked_add(c).ok_or(DecodeError::RunLengthOverflow)?;
                    if x > width {
                        return Err(DecodeError::OutOfBounds { x: x - 1, y });
                    }
                }
                b'o' => {
                    let c = count.take().unwrap_or(1);
                    for i in 0..c {
                        if x + i >= width || y >= height {
                            return Err(DecodeError::OutOfBounds { x: x + i, y });
                        }
                        grid.set(x + i, y, Player::One as CellState);
                    }
                    x += c;
                }
                b'$' => {
                    y = y
                        .checked_add(count.take().unwrap_or(1))
                        .ok_or(DecodeError::RunLengthOverflow)?;
                    x = 0;
                }
                b'!' => {
                    if count.is_some() {
                        return Err(DecodeError::DanglingRunLength);
                    }
                    break 'body;
                }
                b if b.is_ascii_whitespace() => continue,
                _ => return Err(DecodeError::InvalidToken(b as char)),
            }
        }
    }
    if count.is_some() {
        return Err(DecodeError::DanglingRunLength);
    }

    Ok(grid)
}

fn parse_header(line: &[u8]) -> Result<(usize, usize), DecodeError> {
    let malformed = |msg: String| DecodeError::MalformedHeader(msg);
    let mut parts = line.split(|&b| b == b',').map(|x| x.trim_ascii());

    let mut extract_value = |expected_key: &str| -> Result<usize, DecodeError> {
        let part = parts
            .next()
            .ok_or_else(|| malformed(format!("missing \"{}\"", expected_key)))?;
        let mut items = part.split(|&b| b == b'=');
        let key = items.next().unwrap_or(&[]).trim_ascii();
        if key != expected_key.as_bytes() {
            return Err(malformed(format!(
                "expected {}, got {}",
                expected_key,
                String::from_utf8_lossy(key)
            )));
        }
        let value = items
            .next()
            .ok_or_else(|| malformed(format!("missing '=' after {}", expected_key)))?
            .trim_ascii();
        if items.next().is_some() {
            return Err(malformed("missing ',' between '='".to_string()));
        }
        std::str::from_utf8(value)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                malformed(format!(
                    "{} is not a number: {}",
                    expected_key,
                    String::from_utf8_lossy(value)
                ))
            })
    };

    let width = extract_value("x")?;
    let height = extract_value("y")?;
    Ok((width, height))
}

struct RunWriter {
    result: String,
    line_length: usize,
}

impl RunWriter {
    fn push(&mut self, count: usize, tag: char) {
        let run = if count > 1 {
            format!("{}{}", count, tag)
        } else {
            tag.to_string()
        };
        if self.line_length + run.len() > MAX_LINE_LENGTH {
            self.result.push('\n');
            self.line_length = 0;
        }
        self.result.push_str(&run);
        self.line_length += run.len();
    }
}

/// Encodes a grid in the RLE format.
///
/// The header keeps the full grid dimensions, so decoding the output yields
/// a grid of the same size. Trailing dead cells of a row and trailing dead
/// rows are omitted, body lines are wrapped at 70 characters. Colour tags are
/// not representable and every live cell is written as `o`.
pub fn encode_rle(grid: &Grid) -> String {
    let mut writer = RunWriter {
        result: format!(
            "x = {}, y = {}, rule = B3/S23\n",
            grid.width(),
            grid.height()
        ),
        line_length: 0,
    };

    let mut row_cursor = 0;
    for j in 0..grid.height() {
        let alive = |i: usize| grid.get(i, j) != DEAD;
        let Some(last) = (0..grid.width()).rev().find(|&i| alive(i)) else {
            continue;
        };
        if j > row_cursor {
            writer.push(j - row_cursor, '$');
            row_cursor = j;
        }

        let mut i = 0;
        while i <= last {
            let state = alive(i);
            let run = (i..=last).take_while(|&k| alive(k) == state).count();
            writer.push(run, if state { 'o' } else { 'b' });
            i += run;
        }
    }
    writer.push(1, '!');
    writer.result.push('\n');
    writer.result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alive_cells(grid: &Grid) -> Vec<(usize, usize)> {
        let mut result = vec![];
        for j in 0..grid.height() {
            for i in 0..grid.width() {
                if grid.get(i, j) != DEAD {
                    result.push((i, j));
                }
            }
        }
        result
    }

    #[test]
    fn test_decode_glider() {
        let glider = decode_rle(b"#C This is a glider.\n#C another comment\nx = 3, y = 3\nbo$2bo$3o!\n")
            .unwrap();
        assert_eq!((glider.width(), glider.height()), (3, 3));
        assert_eq!(
            alive_cells(&glider),
            vec![(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]
        );
    }

    #[test]
    fn test_decode_header_variants() {
        for data in [
            &b"x=3,y=3\nbo$2bo$3o!"[..],
            b"x = 3 , y = 3 , rule = B3/S23\nbo$2bo$3o!",
            b"x = 3, y = 3, rule = B36/S23\r\nbo$\r\n2bo$3o!",
            b"  #comment\nx = 3, y = 3\n  bo$2bo$ 3o !",
        ] {
            let glider = decode_rle(data).unwrap();
            assert_eq!(glider.population(), 5, "{}", String::from_utf8_lossy(data));
        }
    }

    #[test]
    fn test_decode_row_runs() {
        let grid = decode_rle(b"x = 4, y = 5\n4o3$bo2b!").unwrap();
        assert_eq!(
            alive_cells(&grid),
            vec![(0, 0), (1, 0), (2, 0), (3, 0), (1, 3)]
        );
        // trailing row break after the last row is harmless
        assert!(decode_rle(b"x = 2, y = 1\n2o$!").is_ok());
    }

    #[test]
    fn test_decode_errors() {
        let header = |data: &[u8]| matches!(decode_rle(data), Err(DecodeError::MalformedHeader(_)));
        assert!(header(b""));
        assert!(header(b"#C only comments\n"));
        assert!(header(b"bo$2bo$3o!"));
        assert!(header(b"x = 3\nbo!"));
        assert!(header(b"y = 3, x = 3\nbo!"));
        assert!(header(b"x = three, y = 3\nbo!"));
        assert!(header(b"x = 0, y = 3\n!"));
        assert!(header(b"x = 4294967296, y = 2147483648\n!"));
        assert!(header(b"x = 1048576, y = 1048576\n!"));
        assert!(header(b"x = 18446744073709551615, y = 2\n!"));

        assert_eq!(
            decode_rle(b"x = 2, y = 2\n3o!"),
            Err(DecodeError::OutOfBounds { x: 2, y: 0 })
        );
        assert_eq!(
            decode_rle(b"x = 2, y = 2\n2$o!"),
            Err(DecodeError::OutOfBounds { x: 0, y: 2 })
        );
        assert_eq!(
            decode_rle(b"x = 2, y = 2\n2$b!"),
            Err(DecodeError::OutOfBounds { x: 0, y: 2 })
        );
        assert_eq!(
            decode_rle(b"x = 2, y = 2\n3bo!"),
            Err(DecodeError::OutOfBounds { x: 2, y: 0 })
        );
        assert_eq!(
            decode_rle(b"x = 2, y = 2\nbA!"),
            Err(DecodeError::InvalidToken('A'))
        );
        assert_eq!(
            decode_rle(b"x = 2, y = 2\nbo3!"),
            Err(DecodeError::DanglingRunLength)
        );
        assert_eq!(
            decode_rle(b"x = 2, y = 2\n99999999999999999999999o!"),
            Err(DecodeError::RunLengthOverflow)
        );
    }

    #[test]
    fn test_encode_glider() {
        let glider = decode_rle(b"x = 3, y = 3\nbo$2bo$3o!").unwrap();
        assert_eq!(encode_rle(&glider), "x = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n");
    }

    #[test]
    fn test_encode_keeps_dimensions() {
        let grid = Grid::new(10, 8).unwrap();
        assert_eq!(encode_rle(&grid), "x = 10, y = 8, rule = B3/S23\n!\n");
        assert_eq!(decode_rle(encode_rle(&grid).as_bytes()).unwrap(), grid);

        let grid = Grid::random(150, 40, 0.4, Some(42)).unwrap();
        let encoded = encode_rle(&grid);
        assert!(encoded.lines().all(|line| line.len() <= MAX_LINE_LENGTH));
        assert_eq!(decode_rle(encoded.as_bytes()).unwrap(), grid);
    }
}
