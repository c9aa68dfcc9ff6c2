use std::fmt::{Debug, Display};

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive)]
pub enum SubsidyLevel {
    One = 1,
    Two = 2,
    Three = 3,
}

impl SubsidyLevel {
    pub fn from_level(level: i64) -> Option<Self> {
        Self::from_i64(level)
    }

    pub fn level(self) -> u8 {
        self as u8
    }

    /// Government subsidy paid per kilometer of route.
    pub fn rate(self) -> f64 {
        match self {
            SubsidyLevel::One => 0.50,
            SubsidyLevel::Two => 1.00,
            SubsidyLevel::Three => 1.50,
        }
    }

    /// Seniors only pay a fare on level 1 lines; on levels 2 and 3 they ride for free.
    pub fn seniors_pay(self) -> bool {
        self == SubsidyLevel::One
    }
}

impl Display for SubsidyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// Display-only departure label, at most [`DepartureTime::MAX_CHARS`] characters long.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct DepartureTime(String);

impl DepartureTime {
    pub const MAX_CHARS: usize = 9;

    /// Longer input is silently cut after `MAX_CHARS` characters.
    pub fn new(raw: &str) -> Self {
        DepartureTime(raw.chars().take(Self::MAX_CHARS).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for DepartureTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("@{}", self.0))
    }
}

impl Display for DepartureTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Passengers {
    pub student: u32,
    pub adult: u32,
    pub senior: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineNumber(pub u32);

impl Display for LineNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// One validated record of the input file.
#[derive(Debug, Clone, PartialEq)]
pub struct BusLine {
    pub line_number: LineNumber,
    pub departure_time: DepartureTime,
    pub subsidy_level: SubsidyLevel,
    pub passengers: Passengers,
    /// Kilometers, always strictly positive.
    pub route_length: f64,
}

/// A bus line together with its computed daily profit (negative for a loss).
#[derive(Debug, Clone, PartialEq)]
pub struct AssessedLine {
    pub line: BusLine,
    pub profit: f64,
}

impl AssessedLine {
    pub fn subsidy_level(&self) -> SubsidyLevel {
        self.line.subsidy_level
    }

    pub fn is_profitable(&self) -> bool {
        self.profit >= 0.0
    }
}
