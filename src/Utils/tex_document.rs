//! standalone LaTeX report of a converted batch
use crate::equations::latex_batch::EquationRecord;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

pub struct TexDocument<'a> {
    source: String,
    records: &'a [EquationRecord],
    elapsed: Option<Duration>,
    selected: Option<usize>,
}

impl<'a> TexDocument<'a> {
    /// `source` names where the equations came from (usually the input file)
    pub fn new(source: &str, records: &'a [EquationRecord]) -> Self {
        TexDocument {
            source: source.to_string(),
            records,
            elapsed: None,
            selected: None,
        }
    }

    /// conversion time, printed in the summary
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    /// batch index of an equation to typeset again on its own
    pub fn with_selected(mut self, index: usize) -> Self {
        self.selected = Some(index);
        self
    }

    pub fn render(&self) -> String {
        let converted: Vec<&EquationRecord> = self.records.iter().filter(|r| r.is_success()).collect();
        let mut tex = String::new();
        tex.push_str("\\documentclass{article}\n");
        tex.push_str("\\usepackage{amsmath}\n");
        tex.push_str("\\begin{document}\n");

        tex.push_str("\\section*{Summary}\n");
        let _ = writeln!(tex, "Source: \\verb|{}|.\n", self.source.replace('|', "/"));
        let _ = writeln!(tex, "Equations: {}.", self.records.len());
        let _ = writeln!(tex, "Converted: {}.", converted.len());
        let _ = writeln!(tex, "Failed: {}.", self.records.len() - converted.len());
        if let Some(elapsed) = self.elapsed {
            let _ = writeln!(tex, "Time elapsed: {:.2} seconds.", elapsed.as_secs_f64());
        }
        tex.push('\n');

        tex.push_str("\\section*{Equations}\n");
        if converted.is_empty() {
            tex.push_str("No equation could be converted.\n");
        } else {
            tex.push_str("\\begin{align*}\n");
            let body: Vec<String> = converted
                .iter()
                .map(|r| format!("&{}", r.latex().unwrap_or_default()))
                .collect();
            tex.push_str(&body.join(" \\\\\n"));
            tex.push_str("\n\\end{align*}\n");
        }
        // a line break inside the equation would end the comment early
        for record in self.records.iter().filter(|r| !r.is_success()) {
            let line = record.to_output_line().replace(['\r', '\n'], " ");
            let _ = writeln!(tex, "% {}: {}", record.index, line);
        }
        tex.push('\n');

        let selected = self
            .selected
            .and_then(|index| self.records.get(index))
            .and_then(|record| record.latex());
        if let Some(latex) = selected {
            tex.push_str("\\section*{Selected Equation}\n");
            let _ = writeln!(tex, "\\[ {} \\]", latex);
        }
        tex.push_str("\\end{document}\n");
        tex
    }

    pub fn save(&self, filename: &Path) -> io::Result<()> {
        let mut file = File::create(filename)?;
        file.write_all(self.render().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::latex_batch::equation_records;

    #[test]
    fn test_render_document() {
        let records = equation_records(&["x0+1", "bad(((", "x0*x1"]);
        let tex = TexDocument::new("eqs.csv", &records)
            .with_elapsed(Duration::from_millis(1500))
            .with_selected(2)
            .render();
        assert!(tex.starts_with("\\documentclass{article}\n\\usepackage{amsmath}\n\\begin{document}\n"));
        assert!(tex.contains("Converted: 2."));
        assert!(tex.contains("Failed: 1."));
        assert!(tex.contains("Time elapsed: 1.50 seconds."));
        assert!(tex.contains("\\begin{align*}\n&x_{0} + 1 \\\\\n&x_{0} x_{1}\n\\end{align*}\n"));
        assert!(tex.contains("% 1: Error parsing equation: bad(((. Error:"));
        assert!(tex.contains("\\section*{Selected Equation}\n\\[ x_{0} x_{1} \\]"));
        assert!(tex.ends_with("\\end{document}\n"));
    }

    #[test]
    fn test_render_without_successes() {
        let records = equation_records(&["bad((("]);
        let tex = TexDocument::new("eqs.csv", &records).with_selected(0).render();
        assert!(!tex.contains("align*"));
        assert!(tex.contains("No equation could be converted."));
        assert!(!tex.contains("Selected Equation"));
    }

    #[test]
    fn test_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eqs.tex");
        let records = equation_records(&["sqrt(x0)"]);
        TexDocument::new("eqs.csv", &records).save(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("&\\sqrt{x_{0}}"));
    }

    #[test]
    fn test_multiline_failure_stays_commented() {
        let records = equation_records(&["x0 +\nbad(((", "x1\r\n+ x0 )"]);
        assert!(records.iter().all(|r| !r.is_success()));
        let tex = TexDocument::new("eqs.csv", &records).render();
        assert!(tex.contains("% 0: Error parsing equation: x0 + bad(((. Error:"));
        assert!(tex.contains("% 1: Error parsing equation: x1  + x0 ). Error:"));
        for line in tex.lines() {
            assert!(!line.starts_with("bad") && !line.starts_with("+ x0"), "{}", line);
        }
    }
}
