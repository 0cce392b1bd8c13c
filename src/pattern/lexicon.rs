use super::{DecodeError, Pattern};
use crate::{CellState, Grid, Player};

/// Width of the dash rule separating the lexicon preamble, entries and epilogue.
const RULE_WIDTH: usize = 71;

/// One tokenized lexicon entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexiconEntry {
    pub name: String,
    pub description: String,
    /// Rows normalised to `'0'` (dead) and `'1'` (alive); empty for entries
    /// without a diagram.
    pub rows: Vec<String>,
}

impl LexiconEntry {
    /// Decodes the diagram of the entry with live cells tagged `player`.
    pub fn to_pattern(&self, player: Player) -> Result<Pattern, DecodeError> {
        decode_lexicon(&self.rows, '0', player)
    }
}

/// Builds a pattern from equal-width text rows.
///
/// Every character other than `dead` is a live cell tagged `player`; the
/// pattern is `rows[0].len() x rows.len()` cells.
///
/// # Errors
///
/// Fails with [`DecodeError::EmptyRows`] when there is nothing to decode and
/// with [`DecodeError::RaggedRows`] when rows differ in width.
pub fn decode_lexicon<S: AsRef<str>>(
    rows: &[S],
    dead: char,
    player: Player,
) -> Result<Pattern, DecodeError> {
    let width = rows
        .first()
        .map(|row| row.as_ref().chars().count())
        .unwrap_or(0);
    if width == 0 {
        return Err(DecodeError::EmptyRows);
    }

    let mut grid = Grid::blank(width, rows.len());
    for (j, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        let found = row.chars().count();
        if found != width {
            return Err(DecodeError::RaggedRows {
                row: j,
                expected: width,
                found,
            });
        }
        for (i, c) in row.chars().enumerate() {
            if c != dead {
                grid.set(i, j, player as CellState);
            }
        }
    }
    Ok(grid)
}

/// Splits the text of a Life lexicon into entries.
///
/// The text consists of a preamble, the entries and an epilogue separated by
/// lines of 71 dashes. An entry starts with a line `:name:description`; the
/// description may continue on following lines until the diagram, whose rows
/// are tab-indented lines without inner whitespace, `.` marking dead cells.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedLexicon`] if the entry section is missing.
pub fn parse_lexicon(text: &str) -> Result<Vec<LexiconEntry>, DecodeError> {
    let rule = "-".repeat(RULE_WIDTH);
    let section = text
        .split(rule.as_str())
        .nth(1)
        .ok_or_else(|| DecodeError::MalformedLexicon("missing entry section".to_string()))?;

    let mut entries: Vec<LexiconEntry> = vec![];
    for line in section.lines() {
        if let Some(rest) = line.strip_prefix(':') {
            let (name, description) = rest.split_once(':').ok_or_else(|| {
                DecodeError::MalformedLexicon(format!("unterminated entry name in {:?}", line))
            })?;
            entries.push(LexiconEntry {
                name: name.to_string(),
                description: description.trim().to_string(),
                rows: vec![],
            });
            continue;
        }

        // text before the first entry belongs to nobody
        let Some(entry) = entries.last_mut() else {
            continue;
        };

        let diagram_row = line
            .strip_prefix('\t')
            .map(str::trim_end)
            .filter(|row| !row.is_empty() && !row.contains(char::is_whitespace));
        match diagram_row {
            Some(row) => entry.rows.push(
                row.chars()
                    .map(|c| if c == '.' { '0' } else { '1' })
                    .collect(),
            ),
            None if entry.rows.is_empty() && !line.trim().is_empty() => {
                if !entry.description.is_empty() {
                    entry.description.push('\n');
                }
                entry.description.push_str(line.trim());
            }
            None => (),
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEAD;

    fn lexicon(body: &str) -> String {
        let rule = "-".repeat(RULE_WIDTH);
        format!("LIFE LEXICON\n\nintro text\n{rule}\n{body}\n{rule}\nBibliography\n")
    }

    #[test]
    fn test_decode_lexicon() {
        let glider = decode_lexicon(&["010", "001", "111"], '0', Player::Two).unwrap();
        assert_eq!((glider.width(), glider.height()), (3, 3));
        assert_eq!(glider.population(), 5);
        assert_eq!(glider.get(1, 0), Player::Two as CellState);
        assert_eq!(glider.get(0, 0), DEAD);

        let dots = decode_lexicon(&[".O", "O."], '.', Player::One).unwrap();
        assert_eq!(dots.get(1, 0), Player::One as CellState);
        assert_eq!(dots.get(0, 1), Player::One as CellState);
        assert_eq!(dots.population(), 2);
    }

    #[test]
    fn test_decode_lexicon_errors() {
        let empty: [&str; 0] = [];
        assert_eq!(
            decode_lexicon(&empty, '0', Player::One),
            Err(DecodeError::EmptyRows)
        );
        assert_eq!(
            decode_lexicon(&["", ""], '0', Player::One),
            Err(DecodeError::EmptyRows)
        );
        assert_eq!(
            decode_lexicon(&["010", "01", "111"], '0', Player::One),
            Err(DecodeError::RaggedRows {
                row: 1,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_parse_lexicon() {
        let text = lexicon(
            ":blinker: (p2) The smallest oscillator.\n\
             \t***\n\
             \n\
             :block: The most common still life.\n\
             Also a common induction coil.\n\
             \t**\n\
             \t**\n\
             See also {boat}.\n\
             :Life: A two-dimensional cellular automaton.\n",
        );
        let entries = parse_lexicon(&text).unwrap();
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].name, "blinker");
        assert_eq!(entries[0].description, "(p2) The smallest oscillator.");
        assert_eq!(entries[0].rows, vec!["111"]);

        assert_eq!(entries[1].name, "block");
        assert_eq!(
            entries[1].description,
            "The most common still life.\nAlso a common induction coil."
        );
        assert_eq!(entries[1].rows, vec!["11", "11"]);
        assert_eq!(entries[1].to_pattern(Player::One).unwrap().population(), 4);

        assert!(entries[2].rows.is_empty());
        assert_eq!(entries[2].to_pattern(Player::One), Err(DecodeError::EmptyRows));
    }

    #[test]
    fn test_parse_lexicon_diagram_with_dots() {
        let text = lexicon(":glider: The smallest spaceship.\n\t.*.\n\t..*\n\t***\n");
        let entries = parse_lexicon(&text).unwrap();
        assert_eq!(entries[0].rows, vec!["010", "001", "111"]);
        let glider = entries[0].to_pattern(Player::One).unwrap();
        assert_eq!(glider.get(1, 0), Player::One as CellState);
        assert_eq!(glider.population(), 5);
    }

    #[test]
    fn test_parse_lexicon_without_rule() {
        assert!(matches!(
            parse_lexicon(":block: no separators\n\t**\n"),
            Err(DecodeError::MalformedLexicon(_))
        ));
    }
}
