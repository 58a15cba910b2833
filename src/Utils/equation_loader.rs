use csv::ReaderBuilder;
use log::info;
use std::fmt;
use std::path::Path;

#[derive(Debug)]
pub enum LoaderError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn { column: String, available: Vec<String> },
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoaderError::Io(e) => write!(f, "Cannot read equations file: {}", e),
            LoaderError::Csv(e) => write!(f, "Malformed equations table: {}", e),
            LoaderError::MissingColumn { column, available } => write!(
                f,
                "No '{}' column in equations table (columns: {})",
                column,
                available.join(", ")
            ),
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<std::io::Error> for LoaderError {
    fn from(e: std::io::Error) -> Self {
        LoaderError::Io(e)
    }
}

impl From<csv::Error> for LoaderError {
    fn from(e: csv::Error) -> Self {
        LoaderError::Csv(e)
    }
}

/// Reads one named column of a headed table. Files ending in `.tsv` are tab separated,
/// anything else is read as CSV. Rows keep their file order.
pub fn read_equation_column(path: &Path, column: &str) -> Result<Vec<String>, LoaderError> {
    let is_tsv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"));
    let delimiter = if is_tsv { b'\t' } else { b',' };
    let file = std::fs::File::open(path)?;
    let mut reader = ReaderBuilder::new().delimiter(delimiter).from_reader(file);

    let headers = reader.headers()?.clone();
    let Some(position) = headers.iter().position(|h| h.trim() == column) else {
        return Err(LoaderError::MissingColumn {
            column: column.to_string(),
            available: headers.iter().map(str::to_string).collect(),
        });
    };

    let mut equations = Vec::new();
    for row in reader.records() {
        let row = row?;
        equations.push(row.get(position).unwrap_or_default().trim().to_string());
    }
    info!("read {} equations from {}", equations.len(), path.display());
    Ok(equations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_csv_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hall_of_fame.csv");
        std::fs::write(
            &path,
            "Complexity,Loss,Equation\n3,0.5,\"square(x0) + sqrt(x1)\"\n5,0.1,x0^2 - x2/x1\n",
        )
        .unwrap();
        let equations = read_equation_column(&path, "Equation").unwrap();
        assert_eq!(equations, vec!["square(x0) + sqrt(x1)", "x0^2 - x2/x1"]);
    }

    #[test]
    fn test_read_tsv_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("eqs.tsv");
        std::fs::write(&path, "Equation\tLoss\nx0 + 1\t0.2\npow(x0, 2)\t0.1\n").unwrap();
        let equations = read_equation_column(&path, "Equation").unwrap();
        assert_eq!(equations, vec!["x0 + 1", "pow(x0, 2)"]);
    }

    #[test]
    fn test_missing_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("eqs.csv");
        std::fs::write(&path, "Loss,Score\n0.1,0.2\n").unwrap();
        let err = read_equation_column(&path, "Equation").unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn { .. }));
        assert!(err.to_string().contains("'Equation'"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_equation_column(&dir.path().join("nothing.csv"), "Equation").unwrap_err();
        assert!(matches!(err, LoaderError::Io(_)));
    }
}
