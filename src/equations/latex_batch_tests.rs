use crate::equations::batch_config::BatchConfig;
use crate::equations::latex_batch::{EquationError, LatexBatch, equation_records, equations_to_latex};
use crate::symbolic::parse_expr::ParseErrorKind;
//___________________________________TESTS____________________________________

mod tests {
    use super::*;

    fn sequential() -> BatchConfig {
        BatchConfig {
            parallel: false,
            ..BatchConfig::default()
        }
    }

    #[test]
    fn test_failure_is_isolated() {
        let lines = equations_to_latex(&["x0+1", "bad(((", "x0*x1"]);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "x_{0} + 1");
        assert_eq!(
            lines[1],
            "Error parsing equation: bad(((. Error: unknown function 'bad'"
        );
        assert_eq!(lines[2], "x_{0} x_{1}");
    }

    #[test]
    fn test_unknown_function_named_in_error() {
        let records = equation_records(&["unknownfn(x0)"]);
        assert_eq!(records.len(), 1);
        match records[0].error() {
            Some(EquationError::Parse(e)) => {
                assert_eq!(e.kind, ParseErrorKind::UnknownFunction("unknownfn".to_string()))
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
        assert!(records[0].to_output_line().contains("unknownfn"));
        assert!(
            records[0]
                .to_output_line()
                .starts_with("Error parsing equation: unknownfn(x0). Error: ")
        );
    }

    #[test]
    fn test_typical_equations() {
        let lines = equations_to_latex(&["square(x0) + sqrt(x1)", "x0^2 - x2/x1"]);
        assert_eq!(lines[0], "x_{0}^{2} + \\sqrt{x_{1}}");
        assert_eq!(lines[1], "x_{0}^{2} - \\frac{x_{2}}{x_{1}}");
    }

    #[test]
    fn test_order_and_length_preserved() {
        let equations: Vec<String> = (0..200)
            .map(|i| match i % 4 {
                0 => format!("x{} + {}", i, i),
                1 => format!("square(x{}) * exp(-x0)", i),
                2 => format!("nope{}(x0)", i),
                _ => format!("(x{} - 1", i),
            })
            .collect();

        let parallel = LatexBatch::new(BatchConfig::default()).convert(&equations);
        let serial = LatexBatch::new(sequential()).convert(&equations);
        assert_eq!(parallel.len(), equations.len());
        assert_eq!(parallel, serial);
        for (i, record) in parallel.iter().enumerate() {
            assert_eq!(record.index, i);
            assert_eq!(record.equation, equations[i]);
            assert_eq!(record.is_success(), i % 4 < 2, "equation {}", equations[i]);
        }
        assert_eq!(parallel[4].latex(), Some("x_{4} + 4"));
        assert_eq!(parallel[5].latex(), Some("x_{5}^{2} e^{-x_{0}}"));
        assert!(parallel[7].to_output_line().ends_with("syntax error: unbalanced parentheses"));
    }

    #[test]
    fn test_empty_batch() {
        let empty: Vec<String> = Vec::new();
        let mut batch = LatexBatch::new(sequential());
        assert!(batch.convert(&empty).is_empty());
        assert_eq!(batch.statistics()["equations"], 0);
    }

    #[test]
    fn test_statistics() {
        let mut batch = LatexBatch::new(sequential());
        batch.convert(&["x0+1", "bad(((", "x0*x1", "x2 ** 0.5"]);
        let stats = batch.statistics();
        assert_eq!(stats["equations"], 4);
        assert_eq!(stats["converted"], 3);
        assert_eq!(stats["failed"], 1);
        assert_eq!(stats["variables"], 3);
        assert_eq!(stats["functions"], batch.config().functions.len());
    }

    #[test]
    fn test_caret_with_fraction_is_rejected() {
        let lines = equations_to_latex(&["x0^2.5"]);
        assert!(lines[0].starts_with("Error parsing equation: x0^2.5. Error: syntax error: '^'"));
    }

    #[test]
    fn test_catalog_follows_config_prefixes() {
        let config = BatchConfig::from_document("variables\n prefixes: feat").unwrap();
        let mut batch = LatexBatch::new(config);
        let records = batch.convert(&["feat0 + feat12", "feat0 * x1"]);
        assert_eq!(records[0].latex(), Some("feat_{0} + feat_{12}"));
        match records[1].error() {
            Some(EquationError::Parse(e)) => {
                assert_eq!(e.kind, ParseErrorKind::UnknownVariable("x1".to_string()))
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_configured_functions_and_rules() {
        let doc = "functions\n names: sin\n aliases: tg=tan\nnormalizer\n power_aliases: square=2\n renames: pow=Pow";
        let mut batch = LatexBatch::new(BatchConfig::from_document(doc).unwrap());
        let lines = batch.convert_to_lines(&["pow(tg(x0), 2)", "square(sin(x1))", "cos(x0)"]);
        assert_eq!(lines[0], "\\tan^{2}{\\left(x_{0} \\right)}");
        assert_eq!(lines[1], "\\sin^{2}{\\left(x_{1} \\right)}");
        assert_eq!(
            lines[2],
            "Error parsing equation: cos(x0). Error: unknown function 'cos'"
        );
    }

    #[test]
    fn test_deeply_nested_equation_is_isolated() {
        let n = 10_000;
        let deep = format!("{}x0{}", "(".repeat(n), ")".repeat(n));
        let equations = vec!["x0+1".to_string(), deep, "x0*x1".to_string()];
        let lines = equations_to_latex(&equations);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "x_{0} + 1");
        assert!(lines[1].ends_with("Error: syntax error: expression nested too deeply"));
        assert_eq!(lines[2], "x_{0} x_{1}");

        let aliases = format!("{}x0{}", "square(".repeat(n), ")".repeat(n));
        let records = LatexBatch::new(sequential()).convert(&["x0", aliases.as_str()]);
        assert!(records[0].is_success());
        assert!(!records[1].is_success());
    }

    #[test]
    fn test_any_variable_prefix_by_default() {
        let lines = equations_to_latex(&["y0 + x1", "feat3 * log10(x1)"]);
        assert_eq!(lines[0], "y_{0} + x_{1}");
        assert_eq!(
            lines[1],
            "Error parsing equation: feat3 * log10(x1). Error: unknown function 'log10'"
        );
    }

    #[test]
    fn test_scientific_constant_as_base() {
        let lines = equations_to_latex(&["0.00001**x0", "1e20^2", "2.5e-7 ** x0"]);
        assert_eq!(lines[0], "\\left(10^{-5}\\right)^{x_{0}}");
        assert_eq!(lines[1], "\\left(10^{20}\\right)^{2}");
        assert_eq!(lines[2], "\\left(2.5 \\cdot 10^{-7}\\right)^{x_{0}}");
    }

    #[test]
    fn test_repeated_signs_cancel() {
        let lines = equations_to_latex(&["x0 + neg(-2)", "x0 - --x1", "x0 * -(-x1)"]);
        assert_eq!(lines[0], "x_{0} + 2");
        assert_eq!(lines[1], "x_{0} - x_{1}");
        assert_eq!(lines[2], "x_{0} x_{1}");
    }
}
