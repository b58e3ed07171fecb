//! Product Variants
//!
//! Garments are sold in a closed set of sizes and colors. Raw strings coming in
//! from requests or storage are parsed into these enums at the boundary; any
//! value outside the set is rejected rather than silently defaulted.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use thiserror::Error;

/// Raised when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} \"{value}\"")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Garment size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Size {
    Xs,
    S,
    #[default]
    M,
    L,
    Xl,
    Xxl,
}

impl Size {
    pub const ALL: [Self; 6] = [Self::Xs, Self::S, Self::M, Self::L, Self::Xl, Self::Xxl];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Xs => "XS",
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::Xl => "XL",
            Self::Xxl => "XXL",
        }
    }
}

impl FromStr for Size {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();

        Self::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownVariant {
                kind: "size",
                value: value.to_string(),
            })
    }
}

impl Display for Size {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Garment color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    #[default]
    Black,
    White,
    Orange,
    Purple,
    Pink,
    Brown,
    Gray,
    Multi,
}

impl Color {
    pub const ALL: [Self; 12] = [
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Yellow,
        Self::Black,
        Self::White,
        Self::Orange,
        Self::Purple,
        Self::Pink,
        Self::Brown,
        Self::Gray,
        Self::Multi,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Blue => "BLUE",
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Black => "BLACK",
            Self::White => "WHITE",
            Self::Orange => "ORANGE",
            Self::Purple => "PURPLE",
            Self::Pink => "PINK",
            Self::Brown => "BROWN",
            Self::Gray => "GRAY",
            Self::Multi => "MULTI",
        }
    }
}

impl FromStr for Color {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();

        Self::ALL
            .into_iter()
            .find(|color| color.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownVariant {
                kind: "color",
                value: value.to_string(),
            })
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decode a variant column, surfacing unknown values as a column decode error.
pub(crate) fn decode_variant<V>(row: &sqlx::postgres::PgRow, col: &str) -> sqlx::Result<V>
where
    V: FromStr<Err = UnknownVariant>,
{
    use sqlx::Row;

    let raw: String = row.try_get(col)?;

    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_medium_and_black() {
        assert_eq!(Size::default(), Size::M);
        assert_eq!(Color::default(), Color::Black);
    }

    #[test]
    fn parses_every_size_label() -> Result<(), UnknownVariant> {
        for size in Size::ALL {
            assert_eq!(size.as_str().parse::<Size>()?, size);
        }

        Ok(())
    }

    #[test]
    fn parses_case_insensitively_and_trims() -> Result<(), UnknownVariant> {
        assert_eq!(" xl ".parse::<Size>()?, Size::Xl);
        assert_eq!("gray".parse::<Color>()?, Color::Gray);

        Ok(())
    }

    #[test]
    fn rejects_values_outside_the_set() {
        let error = "XXXL".parse::<Size>().err();

        assert_eq!(
            error,
            Some(UnknownVariant {
                kind: "size",
                value: "XXXL".to_string()
            })
        );
        assert!("GREY".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }
}
