// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]

use crate::Utils::logger::{output_path, save_latex_lines, save_records_to_csv};
use crate::Utils::tex_document::TexDocument;
use crate::equations::batch_config::BatchConfig;
use crate::equations::latex_batch::{LatexBatch, equations_to_latex};
use crate::symbolic::function_table::FunctionTable;
use crate::symbolic::normalize_expr::Normalizer;
use crate::symbolic::parse_expr::parse_expression;
use crate::symbolic::variable_catalog::VariableCatalog;
use std::time::Instant;

/// a small hall of fame as printed by a symbolic regression run
pub const DEMO_EQUATIONS: [&str; 8] = [
    "x0",
    "x0 + 1.5",
    "square(x0) + sqrt(x1)",
    "x0^2 - x2/x1",
    "exp(-x0 * 0.25) * cube(x1 - 2)",
    "unknownfn(x0)",
    "bad(((",
    "log(abs(x2)) / (x0 + x1) - 3.2e-7",
];

#[allow(dead_code)]
pub fn latex_examples(example: usize) {
    match example {
        0 => {
            // ONE EQUATION, STEP BY STEP
            let input = "square(x0) + sqrt(x1)";
            // variables are collected over the whole batch (here a batch of one)
            let catalog = VariableCatalog::from_equations(&[input]);
            println!("variables {:?}", catalog.names());
            // dialect -> canonical grammar
            let normalized = Normalizer::default().normalize(input);
            println!("normalized: {}", normalized);
            // canonical grammar -> symbolic expression
            match parse_expression(&normalized, &catalog, &FunctionTable::default()) {
                Ok(parsed_expression) => {
                    println!(" parsed_expression {}", parsed_expression);
                    println!("variables {:?}", parsed_expression.extract_variables());
                    // symbolic expression -> LaTeX
                    println!("latex: {}", parsed_expression.to_latex());
                }
                Err(e) => println!("cannot parse {}: {}", input, e),
            }
        }
        1 => {
            // WHOLE BATCH, failures stay in their own line
            let lines = equations_to_latex(&DEMO_EQUATIONS);
            for (equation, line) in DEMO_EQUATIONS.iter().zip(lines.iter()) {
                println!("{:40} -> {}", equation, line);
            }
        }
        2 => {
            // CUSTOM SETTINGS: extra functions and spellings
            let settings = "
functions
 names: sin, cos, tan, log
 aliases: tg=tan
normalizer
 power_aliases: square=2, cube=3
 renames: pow=Pow
run
 parallel: false
";
            let config = match BatchConfig::from_document(settings) {
                Ok(config) => config,
                Err(e) => {
                    println!("bad settings: {}", e);
                    return;
                }
            };
            let mut batch = LatexBatch::new(config);
            let equations = ["pow(sin(x0), 2) + square(cos(x0))", "tg(x1) / log(x2)"];
            for line in batch.convert_to_lines(&equations) {
                println!("{}", line);
            }
            println!("statistics {:?}", batch.statistics());
        }
        3 => {
            // SAVE RESULTS: text lines, csv table and a .tex report next to the input name
            let input = std::env::temp_dir().join("demo_equations.csv");
            let config = BatchConfig::default();
            let begin = Instant::now();
            let mut batch = LatexBatch::new(config.clone());
            let records = batch.convert(&DEMO_EQUATIONS);
            let elapsed = begin.elapsed();
            let lines: Vec<String> = records.iter().map(|r| r.to_output_line()).collect();

            let text_path = output_path(&input, &config.suffix);
            let csv_path = output_path(&input, "_latex.csv");
            let tex_path = output_path(&input, ".tex");
            let saved = save_latex_lines(&lines, &text_path)
                .and_then(|_| save_records_to_csv(&records, &csv_path))
                .and_then(|_| {
                    TexDocument::new(&input.display().to_string(), &records)
                        .with_elapsed(elapsed)
                        .with_selected(2)
                        .save(&tex_path)
                });
            match saved {
                Ok(()) => println!(
                    "saved {}, {} and {}",
                    text_path.display(),
                    csv_path.display(),
                    tex_path.display()
                ),
                Err(e) => println!("cannot save results: {}", e),
            }
        }
        _ => {
            println!("example {} does not exist", example);
        }
    }
}
