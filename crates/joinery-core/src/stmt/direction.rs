use crate::Error;

use std::str::FromStr;

/// Sort direction of an `ORDER BY` term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl FromStr for Direction {
    type Err = Error;

    /// Accepts `ASC` and `DESC` in any case.
    fn from_str(s: &str) -> Result<Direction, Error> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Direction::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Direction::Desc)
        } else {
            Err(crate::err!("invalid sort direction `{s}`; expected ASC or DESC"))
        }
    }
}
