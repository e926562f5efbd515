//! Header extraction and move-text cleaning.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\[(\w+)\s+"(.*)"\]$"#).unwrap());
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^}]+\}").unwrap());
static VARIATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^()]+\)").unwrap());
static MOVE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+\.*$").unwrap());
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Errors that can occur when parsing a game record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The record contained no move tokens after cleaning.
    #[error("invalid input: no moves found")]
    NoMoves,
}

/// A parsed game record: its headers and the played moves.
///
/// The move list is the record's move text with every non-move artifact
/// removed; each entry is a single move in standard algebraic notation
/// (e.g. `"Nf3"`, `"e4"`, `"O-O"`). A `FEN` header, when present, names
/// the starting position the moves are played from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    /// Header key/value pairs, in encounter order. A duplicated key keeps
    /// the last value seen.
    pub headers: HashMap<String, String>,
    /// Move tokens in game order.
    pub moves: Vec<String>,
}

impl GameRecord {
    /// Parses a raw game record.
    ///
    /// Header lines of the form `[Key "Value"]` populate the header map.
    /// The first line that is neither a header nor a `[`-prefixed line
    /// ends the header block; everything from that line onward is move
    /// text. Move text is cleaned of comments, variations, move numbers,
    /// `$n` glyphs and result markers, then split into tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::NoMoves`] if no move tokens remain after
    /// cleaning.
    ///
    /// # Example
    ///
    /// ```
    /// use game_record::GameRecord;
    ///
    /// let record = GameRecord::parse("[Event \"Casual\"]\n1. d4 d5").unwrap();
    /// assert_eq!(record.headers["Event"], "Casual");
    /// assert_eq!(record.moves, vec!["d4", "d5"]);
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let input = raw.replace('\t', " ").replace('\r', "");
        let lines: Vec<&str> = input.trim().lines().collect();

        let mut headers = HashMap::new();
        let mut movetext = String::new();
        for (i, line) in lines.iter().enumerate() {
            let line = line.trim();
            if let Some(caps) = HEADER_RE.captures(line) {
                headers.insert(caps[1].to_string(), caps[2].to_string());
                continue;
            }
            // A bracketed line that is not a well-formed header is dropped.
            if line.starts_with('[') {
                continue;
            }
            movetext = lines[i..].join("\n");
            break;
        }

        let moves: Vec<String> = clean_movetext(&movetext)
            .split(' ')
            .filter(|token| !is_artifact(token))
            .map(String::from)
            .collect();

        if moves.is_empty() {
            return Err(ParseError::NoMoves);
        }

        Ok(Self { headers, moves })
    }
}

/// Reduces raw move text to a single line of space-separated tokens.
///
/// Ellipses collapse to single dots and every dot gains a trailing space
/// so move numbers split off cleanly. `{...}` comment spans are removed,
/// then `(...)` variation spans: only non-nested groups are matched, so
/// removal repeats until the string stops shrinking. This handles one
/// level of nesting; deeper nesting is an accepted limitation.
fn clean_movetext(text: &str) -> String {
    let mut cleaned = text.replace('\n', " ").replace("...", ".").replace('.', ". ");
    cleaned = COMMENT_RE.replace_all(&cleaned, " ").into_owned();
    loop {
        let len = cleaned.len();
        cleaned = VARIATION_RE.replace_all(&cleaned, " ").into_owned();
        if cleaned.len() == len {
            break;
        }
    }
    SPACE_RE.replace_all(&cleaned, " ").trim().to_string()
}

/// True for tokens that are not moves: move-number markers, `$n`
/// annotation glyphs, result markers and empty strings.
fn is_artifact(token: &str) -> bool {
    token.is_empty()
        || token.starts_with('$')
        || MOVE_NUMBER_RE.is_match(token)
        || matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}
