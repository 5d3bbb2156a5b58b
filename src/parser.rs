//! implements a parser for the job queue command language.
use std::fmt;

use tracing::warn;

use crate::types::command::Command;
use crate::util::bytes_to_human_str;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParsingError {
    BadFormat,
    UnknownCommand,
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::BadFormat => "bad format",
            Self::UnknownCommand => "unknown command",
        })
    }
}

impl std::error::Error for ParsingError {}

/// Provides a custom, minimal, zero-copy parser of byte slices.
struct ParseState<'a> {
    from: &'a [u8],
}

impl ParseState<'_> {
    /// Drops whatever follows the last field a command needs, returning
    /// `result`. Leftovers are logged but don't fail the line.
    fn ignore_rest_and<R>(&mut self, result: R) -> R {
        let rest = self.from.trim_ascii();
        if !rest.is_empty() {
            warn!(rest = bytes_to_human_str(rest), "ignoring trailing input");
        }
        self.from = &[];

        result
    }

    /// Consumes the next token from the input, failing if there are none left.
    fn expect_next_token(&mut self) -> Result<&[u8], ParsingError> {
        self.next_token().ok_or(ParsingError::BadFormat)
    }

    /// Consumes from the input, expecting a u64 with an optional leading `+`.
    fn expect_next_u64(&mut self) -> Result<u64, ParsingError> {
        let token = self.expect_next_token()?;

        digits_to_u64(token.strip_prefix(b"+").unwrap_or(token))
    }

    /// Consumes from the input, expecting an i64 with an optional leading `-`
    /// or `+`.
    fn expect_next_i64(&mut self) -> Result<i64, ParsingError> {
        let token = self.expect_next_token()?;

        match token {
            [b'+', rest @ ..] => i64::try_from(digits_to_u64(rest)?)
                .map_err(|_| ParsingError::BadFormat),
            [b'-', rest @ ..] => {
                // Handles i64::MIN, whose magnitude doesn't fit in an i64.
                let magnitude = digits_to_u64(rest)?;
                0i64.checked_sub_unsigned(magnitude)
                    .ok_or(ParsingError::BadFormat)
            },
            _ => i64::try_from(digits_to_u64(token)?)
                .map_err(|_| ParsingError::BadFormat),
        }
    }

    /// Consumes from this ParseState up to the end of the next run of
    /// non-whitespace bytes. It returns None once only whitespace remains.
    fn next_token(&mut self) -> Option<&[u8]> {
        let start = self.from.iter().position(|c| !c.is_ascii_whitespace())?;
        let rest = &self.from[start..];

        let idx = rest
            .iter()
            .position(|c| c.is_ascii_whitespace())
            .unwrap_or(rest.len());

        let token = &rest[..idx];
        self.from = &rest[idx..];

        Some(token)
    }
}

fn digits_to_u64(token: &[u8]) -> Result<u64, ParsingError> {
    if token.is_empty() {
        return Err(ParsingError::BadFormat);
    }

    let mut r = 0u64;
    for v in token {
        match v {
            b'0'..=b'9' => {
                r = r
                    .checked_mul(10)
                    .ok_or(ParsingError::BadFormat)?
                    .checked_add((*v - b'0') as u64)
                    .ok_or(ParsingError::BadFormat)?
            },
            _ => return Err(ParsingError::BadFormat),
        };
    }

    Ok(r)
}

impl<'a> From<&'a [u8]> for ParseState<'a> {
    fn from(from: &'a [u8]) -> Self {
        ParseState { from }
    }
}

/// Parses the first line of an input, which declares how many operations
/// follow.
pub fn parse_header(line: &[u8]) -> Result<u64, ParsingError> {
    let mut ps: ParseState = line.into();

    let count = ps.expect_next_u64()?;

    Ok(ps.ignore_rest_and(count))
}

/// True if the line holds nothing but whitespace.
pub fn is_blank(line: &[u8]) -> bool {
    line.iter().all(|c| c.is_ascii_whitespace())
}

// Parsing is implemented to fulfil the TryFrom trait.
impl TryFrom<&[u8]> for Command {
    type Error = ParsingError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        use Command::*;

        let mut ps: ParseState = value.into();

        let cmd = match ps.expect_next_token()? {
            // <cmd>
            b"R" => Remove,
            b"D" => Display,
            b"L" => Length,
            b"N" => Reorder,

            // <cmd> <option>
            b"O" => Sort {
                order: ps.expect_next_i64()?.into(),
            },

            // <cmd> <id> <positions>
            b"P" => Promote {
                id: ps.expect_next_i64()?,
                positions: ps.expect_next_i64()?,
            },

            // <cmd> <id> <attribute> <value>
            b"C" => Change {
                id: ps.expect_next_i64()?,
                attribute: ps.expect_next_i64()?,
                value: ps.expect_next_i64()?,
            },

            // <cmd> <id> <priority> <job type> <cpu time> <memory>
            b"A" => Add {
                id: ps.expect_next_i64()?,
                priority: ps.expect_next_i64()?,
                job_type: ps.expect_next_i64()?,
                cpu_time: ps.expect_next_u64()?,
                memory: ps.expect_next_u64()?,
            },

            _ => return Err(ParsingError::UnknownCommand),
        };

        Ok(ps.ignore_rest_and(cmd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::command::SortOrder;

    #[test]
    fn test_parse_command() {
        use Command::*;
        use ParsingError::*;

        const U64_MAX_PLUS_1: u128 = u64::MAX as u128 + 1;
        const I64_MAX_PLUS_1: u128 = i64::MAX as u128 + 1;

        // Asserts the line parses into the given command successfully.
        #[track_caller]
        fn ok(line: &[u8], res: Command) {
            assert_eq!(line.try_into(), Ok(res));
        }

        // Asserts the line fails to parse with a BadFormat error.
        #[track_caller]
        fn bf(line: &[u8]) {
            assert_eq!(TryInto::<Command>::try_into(line), Err(BadFormat));
        }

        // Asserts the line fails to parse with an UnknownCommand error.
        #[track_caller]
        fn uc(line: &[u8]) {
            assert_eq!(
                TryInto::<Command>::try_into(line),
                Err(UnknownCommand)
            );
        }

        // Check silly non-commands
        bf(b"");
        bf(b" \t ");
        uc(b"X");
        uc(b"a 1 2 3 4 5");
        uc(b"AA 1 2 3 4 5");
        uc(b"A1 2 3 4 5");

        ok(
            b"A 1 30 2 100 2048",
            Add {
                id: 1,
                priority: 30,
                job_type: 2,
                cpu_time: 100,
                memory: 2048,
            },
        );
        // Whitespace is flexible.
        ok(
            b"  A\t1  -30 2 100 2048 \t",
            Add {
                id: 1,
                priority: -30,
                job_type: 2,
                cpu_time: 100,
                memory: 2048,
            },
        );
        bf(b"A 1 30 2 100");
        // Anything past the last field is dropped.
        ok(
            b"A 1 30 2 100 2048 7 x",
            Add {
                id: 1,
                priority: 30,
                job_type: 2,
                cpu_time: 100,
                memory: 2048,
            },
        );
        ok(
            b"A +2 +5 1 +1 1",
            Add {
                id: 2,
                priority: 5,
                job_type: 1,
                cpu_time: 1,
                memory: 1,
            },
        );
        bf(b"A 1 30 2 +-1 2048");
        bf(b"A 1 30 2 -100 2048");
        bf(b"A 1 30 2 100 x");
        bf(format!("A 1 30 2 {U64_MAX_PLUS_1} 0").as_bytes());
        ok(
            format!("A 1 2 3 {} 0", u64::MAX).as_bytes(),
            Add {
                id: 1,
                priority: 2,
                job_type: 3,
                cpu_time: u64::MAX,
                memory: 0,
            },
        );

        ok(b"P 5 2", Promote { id: 5, positions: 2 });
        ok(b"P 5 -2", Promote { id: 5, positions: -2 });
        ok(
            format!("P -{I64_MAX_PLUS_1} 0").as_bytes(),
            Promote {
                id: i64::MIN,
                positions: 0,
            },
        );
        bf(format!("P {I64_MAX_PLUS_1} 0").as_bytes());
        bf(b"P 5");
        bf(b"P 5 -");
        bf(b"P 5 --2");
        bf(b"P 5 2-");
        bf(b"P 5 +");
        bf(b"P 5 +-2");
        bf(format!("P +{I64_MAX_PLUS_1} 0").as_bytes());

        ok(
            b"C 3 1 45",
            Change {
                id: 3,
                attribute: 1,
                value: 45,
            },
        );
        ok(
            b"C 3 9 -45",
            Change {
                id: 3,
                attribute: 9,
                value: -45,
            },
        );
        bf(b"C 3 1");

        ok(b"R", Remove);
        ok(b"R ", Remove);
        ok(b"R 1", Remove);
        ok(b"L extra", Length);
        ok(b"D", Display);
        ok(b"L", Length);
        ok(b"N", Reorder);

        ok(
            b"O 1",
            Sort {
                order: SortOrder::ById,
            },
        );
        ok(
            b"O 2",
            Sort {
                order: SortOrder::ByPriority,
            },
        );
        ok(
            b"O 3",
            Sort {
                order: SortOrder::Unrecognised(3),
            },
        );
        bf(b"O");
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(parse_header(b"12"), Ok(12));
        assert_eq!(parse_header(b" 12 "), Ok(12));
        assert_eq!(parse_header(b""), Err(ParsingError::BadFormat));
        assert_eq!(parse_header(b"12 13"), Ok(12));
        assert_eq!(parse_header(b"+12"), Ok(12));
        assert_eq!(parse_header(b"A 1 2 3 4 5"), Err(ParsingError::BadFormat));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(b""));
        assert!(is_blank(b" \t"));
        assert!(!is_blank(b" R"));
    }
}
