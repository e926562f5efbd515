//! Game-record parsing: headers and move text.
//!
//! A game record is a block of optional `[Key "Value"]` header lines
//! followed by move text in standard algebraic notation, possibly
//! decorated with move numbers, `{...}` comments, `(...)` variations,
//! `$n` annotation glyphs and a result marker. [`GameRecord::parse`]
//! reduces all of that to a header map and a flat list of move tokens.
//!
//! # Example
//!
//! ```
//! use game_record::GameRecord;
//!
//! let record = GameRecord::parse("1. e4 {theory} e5 2. Nf3 1-0").unwrap();
//! assert_eq!(record.moves, vec!["e4", "e5", "Nf3"]);
//! ```

mod record;

pub use record::{GameRecord, ParseError};
