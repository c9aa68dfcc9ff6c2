use std::io::{BufRead, BufReader};

use log::warn;

use crate::bus_line::{BusLine, DepartureTime, LineNumber, Passengers, SubsidyLevel};

/// `line_number, departure_time, subsidy_level, adults, students, seniors, route_length`
pub const FIELD_COUNT: usize = 7;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("Invalid line number")]
    InvalidLineNumber,
    #[error("Invalid subsidy level")]
    InvalidSubsidyLevel,
    #[error("Invalid number of adult passengers")]
    InvalidAdultCount,
    #[error("Invalid number of student passengers")]
    InvalidStudentCount,
    #[error("Invalid number of senior passengers")]
    InvalidSeniorCount,
    #[error("Invalid route length")]
    InvalidRouteLength,
    #[error("Missing data fields ({found} of {FIELD_COUNT} present)")]
    MissingFields { found: usize },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason} (line {line})")]
pub struct RecordRejected {
    /// 1-based line of the source stream.
    pub line: u64,
    pub reason: RejectReason,
}

struct Fields<'a> {
    fields: &'a [&'a str],
    line: u64,
}

impl Fields<'_> {
    fn raw(&self, index: usize) -> Result<&str, RecordRejected> {
        self.fields
            .get(index)
            .map(|it| it.trim())
            .ok_or(RecordRejected {
                line: self.line,
                reason: RejectReason::MissingFields {
                    found: self.fields.len(),
                },
            })
    }

    fn take<T>(
        &self,
        index: usize,
        reason: RejectReason,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, RecordRejected> {
        parse(self.raw(index)?).ok_or(RecordRejected {
            line: self.line,
            reason,
        })
    }
}

fn parse_count(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok()
}

/// Validates the fields of one record. The first violation in field order wins; fields beyond
/// the seventh are never looked at.
pub fn parse_record(fields: &[&str], line: u64) -> Result<BusLine, RecordRejected> {
    let fields = Fields { fields, line };

    let line_number = fields.take(0, RejectReason::InvalidLineNumber, |raw| {
        raw.parse::<u32>().ok().filter(|it| *it > 0).map(LineNumber)
    })?;
    let departure_time = DepartureTime::new(fields.raw(1)?);
    let subsidy_level = fields.take(2, RejectReason::InvalidSubsidyLevel, |raw| {
        raw.parse::<i64>().ok().and_then(SubsidyLevel::from_level)
    })?;
    let adult = fields.take(3, RejectReason::InvalidAdultCount, parse_count)?;
    let student = fields.take(4, RejectReason::InvalidStudentCount, parse_count)?;
    let senior = fields.take(5, RejectReason::InvalidSeniorCount, parse_count)?;
    let route_length = fields.take(6, RejectReason::InvalidRouteLength, |raw| {
        raw.parse::<f64>()
            .ok()
            .filter(|it| it.is_finite() && *it > 0.0)
    })?;

    Ok(BusLine {
        line_number,
        departure_time,
        subsidy_level,
        passengers: Passengers {
            student,
            adult,
            senior,
        },
        route_length,
    })
}

/// Parses one raw line of text. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(text: &str, line: u64) -> Result<Option<BusLine>, RecordRejected> {
    let text = text.trim_end_matches(['\n', '\r']);
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }
    let fields = text.split(',').take(FIELD_COUNT).collect::<Vec<_>>();
    parse_record(&fields, line).map(Some)
}

#[derive(Debug, Default)]
pub struct LoadedLines {
    pub lines: Vec<BusLine>,
    pub rejected: Vec<RecordRejected>,
}

/// Reads bus line records until the stream ends or `max_records` valid lines were collected.
/// Rejected records are logged and kept; they never abort the read. Bytes that are not UTF-8 are
/// replaced, so they only reject a record when they sit in a numeric field.
pub fn read_bus_lines(
    stream: impl std::io::Read,
    max_records: usize,
) -> std::io::Result<LoadedLines> {
    let mut raw_lines = BufReader::new(stream).split(b'\n');
    let mut loaded = LoadedLines::default();
    let mut line = 0;

    while loaded.lines.len() < max_records {
        let Some(raw) = raw_lines.next() else {
            break;
        };
        line += 1;
        match parse_line(&String::from_utf8_lossy(&raw?), line) {
            Ok(Some(bus_line)) => loaded.lines.push(bus_line),
            Ok(None) => {}
            Err(rejected) => {
                warn!("Skipping record: {}", rejected);
                loaded.rejected.push(rejected);
            }
        }
    }

    Ok(loaded)
}
