#![allow(non_snake_case)]
use RustedEqTeX::Examples::latex_examples::latex_examples;
use RustedEqTeX::Utils::equation_loader::read_equation_column;
use RustedEqTeX::Utils::logger::{init_logger, output_path, save_latex_lines};
use RustedEqTeX::Utils::tex_document::TexDocument;
use RustedEqTeX::equations::batch_config::BatchConfig;
use RustedEqTeX::equations::latex_batch::LatexBatch;
use log::{LevelFilter, info};
use std::error::Error;
use std::path::Path;
use std::time::Instant;

const USAGE: &str = "usage: RustedEqTeX <equations.csv> [settings.txt]";

fn convert_file(input: &Path, settings: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let config = match settings {
        Some(path) => BatchConfig::from_file(path)?,
        None => BatchConfig::default(),
    };
    init_logger(config.loglevel, config.log_file);

    let equations = read_equation_column(input, &config.column)?;
    let begin = Instant::now();
    let mut batch = LatexBatch::new(config.clone());
    let records = batch.convert(&equations);
    let elapsed = begin.elapsed();
    info!("converted in {:.3} s", elapsed.as_secs_f64());

    let lines: Vec<String> = records.iter().map(|r| r.to_output_line()).collect();
    let output = output_path(input, &config.suffix);
    save_latex_lines(&lines, &output)?;
    println!("LaTeX equations saved to {}", output.display());

    if config.tex_document {
        let tex_path = output_path(input, ".tex");
        TexDocument::new(&input.display().to_string(), &records)
            .with_elapsed(elapsed)
            .save(&tex_path)?;
        println!("LaTeX document saved to {}", tex_path.display());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {
            init_logger(LevelFilter::Info, false);
            latex_examples(1);
            Ok(())
        }
        [input] => convert_file(Path::new(input), None),
        [input, settings] => convert_file(Path::new(input), Some(Path::new(settings))),
        _ => Err(USAGE.into()),
    }
}
