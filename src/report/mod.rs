//! Textual profitability reports.
//!
//! Both renderers expect their input to be ranked already (see [`crate::rank`]). A section is
//! opened whenever the subsidy level differs from the previous line's; the input is neither
//! re-sorted nor checked.
//!
//! Every block of output (title, section, summary) is assembled in memory and handed to the sink
//! with a single `write_all`, so a failing sink never receives half a section.

use std::io;

use crate::bus_line::{AssessedLine, SubsidyLevel};

pub mod console;
pub mod file;

pub struct Section<'a> {
    pub subsidy_level: SubsidyLevel,
    pub lines: &'a [AssessedLine],
}

pub fn sections(lines: &[AssessedLine]) -> impl Iterator<Item = Section<'_>> {
    lines
        .chunk_by(|a, b| a.subsidy_level() == b.subsidy_level())
        .map(|lines| Section {
            subsidy_level: lines[0].subsidy_level(),
            lines,
        })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Profit(f64),
    /// The magnitude of the loss, never negative.
    Loss(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReportSummary {
    pub total_lines: usize,
    pub profitable_count: usize,
    pub unprofitable_count: usize,
    pub net_total: f64,
}

impl ReportSummary {
    pub fn of(lines: &[AssessedLine]) -> Self {
        lines
            .iter()
            .fold(ReportSummary::default(), |mut summary, line| {
                summary.total_lines += 1;
                if line.is_profitable() {
                    summary.profitable_count += 1;
                } else {
                    summary.unprofitable_count += 1;
                }
                summary.net_total += line.profit;
                summary
            })
    }

    pub fn outcome(&self) -> Outcome {
        if self.net_total >= 0.0 {
            Outcome::Profit(positive_zero(self.net_total))
        } else {
            Outcome::Loss(-self.net_total)
        }
    }
}

/// Maps `-0.0` to `0.0` so a break-even line is never printed with a minus sign.
fn positive_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

fn write_block(sink: &mut impl io::Write, rows: &[String]) -> io::Result<()> {
    let mut block = rows.join("\n");
    block.push('\n');
    sink.write_all(block.as_bytes())
}
