//! The engine's suggested move, in coordinate form.

use std::fmt;
use std::str::FromStr;

use crate::engine::EngineError;

/// A move as reported on a `bestmove` line: from-square, to-square and
/// an optional promotion piece (e.g. `e2e4`, `e7e8q`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedMove {
    /// Origin square, e.g. `"e2"`.
    pub from: String,
    /// Destination square, e.g. `"e4"`.
    pub to: String,
    /// Promotion piece letter (`q`, `r`, `b` or `n`), if given.
    pub promotion: Option<char>,
}

fn is_square(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some('a'..='h'), Some('1'..='8'), None)
    )
}

impl FromStr for SuggestedMove {
    type Err = EngineError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidResponse(format!("bad bestmove token: {token}"));
        if !token.is_ascii() || (token.len() != 4 && token.len() != 5) {
            return Err(invalid());
        }
        let from = &token[0..2];
        let to = &token[2..4];
        if !is_square(from) || !is_square(to) {
            return Err(invalid());
        }
        let promotion = match token[4..].chars().next() {
            None => None,
            Some(p @ ('q' | 'r' | 'b' | 'n')) => Some(p),
            Some(_) => return Err(invalid()),
        };
        Ok(Self {
            from: from.to_string(),
            to: to.to_string(),
            promotion,
        })
    }
}

impl fmt::Display for SuggestedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(p) = self.promotion {
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_move() {
        let mv: SuggestedMove = "e2e4".parse().unwrap();
        assert_eq!(mv.from, "e2");
        assert_eq!(mv.to, "e4");
        assert_eq!(mv.promotion, None);
    }

    #[test]
    fn test_parse_promotion_move() {
        let mv: SuggestedMove = "e7e8q".parse().unwrap();
        assert_eq!(mv.from, "e7");
        assert_eq!(mv.to, "e8");
        assert_eq!(mv.promotion, Some('q'));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<SuggestedMove>().is_err());
        assert!("(none)".parse::<SuggestedMove>().is_err());
        assert!("e2e9".parse::<SuggestedMove>().is_err());
        assert!("i2e4".parse::<SuggestedMove>().is_err());
        assert!("e7e8k".parse::<SuggestedMove>().is_err());
        assert!("e2e4e5".parse::<SuggestedMove>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        assert_eq!("e2e4".parse::<SuggestedMove>().unwrap().to_string(), "e2e4");
        assert_eq!("a7a8n".parse::<SuggestedMove>().unwrap().to_string(), "a7a8n");
    }
}
