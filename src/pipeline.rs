use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::bus_line::AssessedLine;
use crate::config::Settings;
use crate::profit::calculate_profitability;
use crate::rank::rank_lines;
use crate::record::{read_bus_lines, LoadedLines, RecordRejected};
use crate::report;

/// Upper bound on valid records taken from one input file.
pub const MAX_BUS_LINES: usize = 100;

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("Could not read the input file '{}': {source}", .path.display())]
    SourceUnreadable { path: PathBuf, source: io::Error },
    #[error("No valid data found in input file '{}' ({rejected} records rejected)", .path.display())]
    EmptyResultSet { path: PathBuf, rejected: usize },
    #[error("Could not write the output file '{}': {source}", .path.display())]
    SinkUnwritable { path: PathBuf, source: io::Error },
    #[error("Could not write to the console: {0}")]
    ConsoleWrite(#[source] io::Error),
}

pub fn load_bus_lines(path: &Path, max_records: usize) -> Result<LoadedLines, PipelineError> {
    let unreadable = |source: io::Error| PipelineError::SourceUnreadable {
        path: path.to_owned(),
        source,
    };
    let file = File::open(path).map_err(unreadable)?;
    let loaded = read_bus_lines(file, max_records).map_err(unreadable)?;
    if loaded.lines.is_empty() {
        return Err(PipelineError::EmptyResultSet {
            path: path.to_owned(),
            rejected: loaded.rejected.len(),
        });
    }
    Ok(loaded)
}

/// Computes the profit of every line and ranks the result.
pub fn assess(loaded: LoadedLines) -> Vec<AssessedLine> {
    let mut lines = calculate_profitability(loaded.lines);
    rank_lines(&mut lines);
    lines
}

pub fn write_report_file(path: &Path, lines: &[AssessedLine]) -> Result<(), PipelineError> {
    let unwritable = |source: io::Error| PipelineError::SinkUnwritable {
        path: path.to_owned(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(unwritable)?);
    report::file::render(lines, &mut writer).map_err(unwritable)?;
    writer.flush().map_err(unwritable)
}

fn write_console(
    settings: &Settings,
    lines: &[AssessedLine],
    console: &mut impl Write,
) -> io::Result<()> {
    writeln!(
        console,
        "[*] Processing file: {}",
        settings.input_file.display()
    )?;
    writeln!(console, "[+] Found {} valid bus lines\n", lines.len())?;
    report::console::render(lines, console)?;
    console.flush()
}

#[derive(Debug)]
pub struct RunReport {
    pub lines: Vec<AssessedLine>,
    pub rejected: Vec<RecordRejected>,
}

/// Load, assess, rank and render according to `settings`. Console output comes first, so a
/// failing output file leaves the console report intact.
pub fn run(settings: &Settings, console: &mut impl Write) -> Result<RunReport, PipelineError> {
    info!("Processing file: {}", settings.input_file.display());
    let mut loaded = load_bus_lines(&settings.input_file, MAX_BUS_LINES)?;
    let rejected = std::mem::take(&mut loaded.rejected);
    info!(
        "Found {} valid bus lines, rejected {}",
        loaded.lines.len(),
        rejected.len()
    );

    let lines = assess(loaded);

    if settings.console_output {
        write_console(settings, &lines, console).map_err(PipelineError::ConsoleWrite)?;
    }
    if settings.file_output {
        write_report_file(&settings.output_file, &lines)?;
        info!("Results saved to: {}", settings.output_file.display());
    }

    Ok(RunReport { lines, rejected })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use approx::assert_abs_diff_eq;
    use itertools::Itertools;

    use crate::bus_line::SubsidyLevel;
    use crate::config::Settings;

    use super::{load_bus_lines, run, PipelineError, MAX_BUS_LINES};

    const INPUT: &str = r#"# line, time, level, adults, students, seniors, km
1,08:00,1,25,10,5,15.5
331,01:00,3,1,0,0,120.0
999,23:59,2,0,0,0,50.0
4,08:00,1
12,13:45,2,40,20,10,30.0
"#;

    fn settings(dir: &Path, console_output: bool, file_output: bool) -> Settings {
        Settings {
            input_file: dir.join("input.txt"),
            output_file: dir.join("report.txt"),
            console_output,
            file_output,
        }
    }

    #[test]
    fn test_run() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path(), true, true);
        fs::write(&settings.input_file, INPUT).unwrap();

        let mut console = Vec::new();
        let report = run(&settings, &mut console).unwrap();

        assert_eq!(report.rejected.len(), 1);
        assert_eq!(
            report.lines.iter().map(|it| it.line.line_number.0).collect_vec(),
            [1, 12, 999, 331]
        );
        assert_eq!(report.lines[3].subsidy_level(), SubsidyLevel::Three);
        assert_abs_diff_eq!(report.lines[0].profit, 374.0, epsilon = 0.01);
        assert_abs_diff_eq!(report.lines[3].profit, -108.0, epsilon = 0.01);

        let console = String::from_utf8(console).unwrap();
        assert!(console.contains("[+] Found 4 valid bus lines"));
        assert!(console.contains("[*] Subsidy Level 3:"));

        let file = fs::read_to_string(&settings.output_file).unwrap();
        assert!(file.contains("Total bus lines analyzed: 4"));
        assert!(file.contains("Profitable lines: 2"));
        assert!(file.contains("Unprofitable lines: 2"));
    }

    #[test]
    fn test_console_and_file_agree_on_sections() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path(), true, true);
        fs::write(&settings.input_file, INPUT).unwrap();

        let mut console = Vec::new();
        run(&settings, &mut console).unwrap();
        let console = String::from_utf8(console).unwrap();
        let file = fs::read_to_string(&settings.output_file).unwrap();

        for level in 1..=3 {
            assert_eq!(
                console.matches(&format!("[*] Subsidy Level {}:", level)).count(),
                file.matches(&format!("SUBSIDY LEVEL {}", level)).count()
            );
        }
        assert!(console.contains("-108.00"));
        assert!(file.contains("-108.00"));
    }

    #[test]
    fn test_run_without_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path(), false, false);
        fs::write(&settings.input_file, INPUT).unwrap();

        let mut console = Vec::new();
        let report = run(&settings, &mut console).unwrap();
        assert_eq!(report.lines.len(), 4);
        assert!(console.is_empty());
        assert!(!settings.output_file.exists());
    }

    #[test]
    fn test_empty_result_set() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path(), true, true);
        fs::write(&settings.input_file, "# only comments\n\n# and blanks\n").unwrap();

        let mut console = Vec::new();
        let err = run(&settings, &mut console).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyResultSet { rejected: 0, .. }));
        assert!(console.is_empty());
        assert!(!settings.output_file.exists());
    }

    #[test]
    fn test_only_rejected_records_is_empty_result_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "4,08:00,1\n0,08:00,1,1,1,1,1.0\n").unwrap();

        let err = load_bus_lines(&path, MAX_BUS_LINES).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyResultSet { rejected: 2, .. }));
    }

    #[test]
    fn test_source_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_bus_lines(&dir.path().join("missing.txt"), MAX_BUS_LINES).unwrap_err();
        assert!(matches!(err, PipelineError::SourceUnreadable { .. }));
    }

    #[test]
    fn test_sink_unwritable_keeps_console_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings(dir.path(), true, true);
        settings.output_file = dir.path().join("no-such-dir").join("report.txt");
        fs::write(&settings.input_file, INPUT).unwrap();

        let mut console = Vec::new();
        let err = run(&settings, &mut console).unwrap_err();
        assert!(matches!(err, PipelineError::SinkUnwritable { .. }));
        let console = String::from_utf8(console).unwrap();
        assert!(console.contains("TOTAL P/L"));
    }

    #[test]
    fn test_load_respects_max_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        let content = (1..=150)
            .map(|it| format!("{},08:00,2,1,1,1,10.0", it))
            .join("\n");
        fs::write(&path, content).unwrap();

        let loaded = load_bus_lines(&path, MAX_BUS_LINES).unwrap();
        assert_eq!(loaded.lines.len(), MAX_BUS_LINES);
    }
}
