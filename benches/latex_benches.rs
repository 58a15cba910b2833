use RustedEqTeX::equations::batch_config::BatchConfig;
use RustedEqTeX::equations::latex_batch::LatexBatch;
use RustedEqTeX::symbolic::symbolic_engine::Expr;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn hall_of_fame(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| match i % 5 {
            0 => format!("square(x{}) + sqrt(x{})", i % 7, i % 3),
            1 => format!("x{}^2 - x2/x1 * {}", i % 4, i),
            2 => "exp(-x0 * 0.25) * cube(x1 - 2) / (x3 + 1.5e-6)".to_string(),
            3 => "log(abs(x2)) - sin(x0) ** 2 + cos(x1 / x0)".to_string(),
            _ => "bad(((".to_string(),
        })
        .collect()
}

fn bench_single_equation(c: &mut Criterion) {
    let input = "exp(-x0 * 0.25) * Pow(x1 - 2, 3) / (x3 + 1.5e-6)";
    c.bench_function("parse and render one equation", |b| {
        b.iter(|| Expr::parse_expression(black_box(input)).map(|e| e.to_latex()))
    });
}

fn bench_batch(c: &mut Criterion) {
    let equations = hall_of_fame(1000);
    let mut group = c.benchmark_group("batch of 1000 equations");
    for parallel in [false, true] {
        let config = BatchConfig {
            parallel,
            ..BatchConfig::default()
        };
        let mut batch = LatexBatch::new(config);
        group.bench_function(format!("parallel = {}", parallel), |b| {
            b.iter(|| batch.convert(black_box(&equations)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_equation, bench_batch);
criterion_main!(benches);
