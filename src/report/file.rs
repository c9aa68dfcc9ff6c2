use std::io;

use crate::bus_line::AssessedLine;

use super::{positive_zero, sections, write_block, Outcome, ReportSummary, Section};

const WIDTH: usize = 71;

fn rule() -> String {
    "-".repeat(WIDTH)
}

fn centered(title: &str) -> String {
    format!("{:^width$}", title, width = WIDTH)
        .trim_end()
        .to_string()
}

fn title_rows() -> Vec<String> {
    vec![
        rule(),
        centered("BUS LINES' PROFITABILITY REPORT"),
        rule(),
        String::new(),
    ]
}

/// `+12.50` for profits (including break-even), `-3.00` for losses.
fn signed_profit(line: &AssessedLine) -> String {
    if line.is_profitable() {
        format!("+{:.2}", positive_zero(line.profit))
    } else {
        format!("{:.2}", line.profit)
    }
}

fn row(line: &AssessedLine) -> String {
    let passengers = &line.line.passengers;
    format!(
        "| {:<4} | {:<9} | {:<19} | {:<11.1} | {:<12} |",
        line.line.line_number,
        line.line.departure_time,
        format!(
            "{}+{}+{}",
            passengers.adult, passengers.student, passengers.senior
        ),
        line.line.route_length,
        signed_profit(line)
    )
}

fn section_rows(section: &Section) -> Vec<String> {
    let mut rows = vec![
        String::new(),
        rule(),
        centered(&format!("SUBSIDY LEVEL {}", section.subsidy_level)),
        rule(),
        "| Line | Time      | Passengers (A+S+Sr) | Length (km) | Result (P/L) |".to_string(),
        rule(),
    ];
    rows.extend(section.lines.iter().map(row));
    rows
}

fn summary_rows(summary: &ReportSummary) -> Vec<String> {
    let result = match summary.outcome() {
        Outcome::Profit(amount) => format!("RESULT: PROFIT of {:.2}", amount),
        Outcome::Loss(amount) => format!("RESULT: LOSS of {:.2}", amount),
    };
    vec![
        String::new(),
        rule(),
        centered("PROFITABILITY SUMMARY REPORT"),
        rule(),
        format!("Total bus lines analyzed: {}", summary.total_lines),
        format!("Profitable lines: {}", summary.profitable_count),
        format!("Unprofitable lines: {}", summary.unprofitable_count),
        result,
        rule(),
    ]
}

/// Decorated report for the output file: title, one table per subsidy level and a summary.
/// An empty input still produces the title and a notice.
pub fn render(lines: &[AssessedLine], sink: &mut impl io::Write) -> io::Result<()> {
    write_block(sink, &title_rows())?;

    if lines.is_empty() {
        return write_block(sink, &["No bus lines to display.".to_string()]);
    }

    for section in sections(lines) {
        write_block(sink, &section_rows(&section))?;
    }
    write_block(sink, &summary_rows(&ReportSummary::of(lines)))
}
