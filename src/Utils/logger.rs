use chrono::Local;
use csv::Writer;
use log::{LevelFilter, info};
use simplelog::{ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::equations::latex_batch::EquationRecord;

/// "debug", "info", "warn", "error", "off" or "none"
pub fn parse_log_level(level: &str) -> Option<LevelFilter> {
    match level.trim().to_lowercase().as_str() {
        "debug" => Some(LevelFilter::Debug),
        "info" => Some(LevelFilter::Info),
        "warn" => Some(LevelFilter::Warn),
        "error" => Some(LevelFilter::Error),
        "off" | "none" => Some(LevelFilter::Off),
        _ => None,
    }
}

/// Terminal logger plus, if `log_to_file`, a `log_<date_time>.txt` file logger.
/// A logger installed earlier stays in place.
pub fn init_logger(level: LevelFilter, log_to_file: bool) {
    if level == LevelFilter::Off {
        return;
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if log_to_file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("log_{}.txt", date_and_time);
        if let Ok(file) = File::create(&name) {
            loggers.push(WriteLogger::new(level, Config::default(), file));
        }
    }
    if CombinedLogger::init(loggers).is_ok() {
        info!("logging started with level {}", level);
    }
}

/// `runs/eqs.csv` + `_latex_equations_fixed.txt` -> `runs/eqs_latex_equations_fixed.txt`.
/// Files without a .csv/.tsv extension just get the suffix appended.
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let is_table = input
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("tsv"));
    let base = if is_table {
        input.with_extension("")
    } else {
        input.to_path_buf()
    };
    let mut name = base.into_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// one output line per equation, in input order
pub fn save_latex_lines(lines: &[String], filename: &Path) -> io::Result<()> {
    let mut file = File::create(filename)?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    Ok(())
}

/// index, equation, latex, error - exactly one of the last two is filled in each row
pub fn save_records_to_csv(records: &[EquationRecord], filename: &Path) -> io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(["index", "equation", "latex", "error"])?;
    for record in records {
        let (latex, error) = match &record.outcome {
            Ok(latex) => (latex.clone(), String::new()),
            Err(e) => (String::new(), e.to_string()),
        };
        writer.write_record([record.index.to_string(), record.equation.clone(), latex, error])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::latex_batch::equation_records;
    use tempfile::tempdir;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_log_level(" WARN "), Some(LevelFilter::Warn));
        assert_eq!(parse_log_level("none"), Some(LevelFilter::Off));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("runs/eqs.csv"), "_latex_equations_fixed.txt"),
            PathBuf::from("runs/eqs_latex_equations_fixed.txt")
        );
        assert_eq!(
            output_path(Path::new("eqs.TSV"), "_tex.txt"),
            PathBuf::from("eqs_tex.txt")
        );
        assert_eq!(
            output_path(Path::new("hall_of_fame"), ".txt"),
            PathBuf::from("hall_of_fame.txt")
        );
    }

    #[test]
    fn test_save_latex_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let lines = vec!["x_{0} + 1".to_string(), "x_{0} x_{1}".to_string()];
        save_latex_lines(&lines, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "x_{0} + 1\nx_{0} x_{1}\n");
    }

    #[test]
    fn test_save_records_to_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.csv");
        let records = equation_records(&["x0+1", "bad((("]);
        save_records_to_csv(&records, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "0");
        assert_eq!(&rows[0][2], "x_{0} + 1");
        assert_eq!(&rows[0][3], "");
        assert_eq!(&rows[1][1], "bad(((");
        assert_eq!(&rows[1][2], "");
        assert!(rows[1][3].contains("bad"));
    }
}
