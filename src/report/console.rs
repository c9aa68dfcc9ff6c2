use std::io;

use crate::bus_line::AssessedLine;

use super::{positive_zero, sections, write_block, Outcome, ReportSummary, Section};

const RULE: &str = "------------------------------------------------------------------";

fn section_rows(section: &Section) -> Vec<String> {
    let mut rows = vec![
        String::new(),
        format!("[*] Subsidy Level {}:", section.subsidy_level),
        RULE.to_string(),
        "Line\tTime\tPassengers (A+S+Sr)\tLength(km)\tProfit".to_string(),
        RULE.to_string(),
    ];
    rows.extend(section.lines.iter().map(|it| {
        let passengers = &it.line.passengers;
        format!(
            "{}\t{}\t{}+{}+{}\t\t{:.1}\t\t{:.2}",
            it.line.line_number,
            it.line.departure_time,
            passengers.adult,
            passengers.student,
            passengers.senior,
            it.line.route_length,
            positive_zero(it.profit)
        )
    }));
    rows
}

fn total_rows(summary: &ReportSummary) -> Vec<String> {
    let total = match summary.outcome() {
        Outcome::Profit(amount) => format!("TOTAL P/L: Profit of {:.2}", amount),
        Outcome::Loss(amount) => format!("TOTAL P/L: Loss of {:.2}", amount),
    };
    vec![String::new(), RULE.to_string(), total, RULE.to_string()]
}

/// Plain console rendering of ranked lines, closed by the net profit/loss of all lines.
pub fn render(lines: &[AssessedLine], sink: &mut impl io::Write) -> io::Result<()> {
    write_block(
        sink,
        &[
            "Bus Lines' Profitability Report".to_string(),
            "--------------------------------".to_string(),
        ],
    )?;

    if lines.is_empty() {
        return write_block(sink, &["[!] No bus lines to display.".to_string()]);
    }

    for section in sections(lines) {
        write_block(sink, &section_rows(&section))?;
    }
    write_block(sink, &total_rows(&ReportSummary::of(lines)))
}
