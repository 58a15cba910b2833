//! Settings of one conversion run, read from a sectioned settings document
//! (see `Utils::task_parser`). Every key is optional:
//! ```text
//! functions
//!  names: sin, cos, log, neg
//!  aliases: tg=tan, ln=log
//! variables
//!  prefixes: x
//! normalizer
//!  power_aliases: square=2, cube=3
//!  renames: pow=Pow
//!  caret_power: true
//! output
//!  column: Equation
//!  suffix: _latex_equations_fixed.txt
//!  tex_document: false
//! run
//!  parallel: true
//!  loglevel: info
//!  log_file: false
//! ```
use crate::Utils::logger::parse_log_level;
use crate::Utils::task_parser::{SectionMap, Value, parse_settings};
use crate::symbolic::function_table::FunctionTable;
use crate::symbolic::normalize_expr::{NormalizationRule, Normalizer};
use log::{LevelFilter, warn};
use std::fmt;
use std::path::Path;

pub const DEFAULT_COLUMN: &str = "Equation";
pub const DEFAULT_SUFFIX: &str = "_latex_equations_fixed.txt";

#[derive(Debug)]
pub enum ConfigError {
    /// the document does not have the "title key: values" shape
    Parse(String),
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
    /// normalization rules that could rewrite each other
    InvalidRule(String),
    UnknownFunction(String),
    BadLogLevel(String),
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "Invalid settings document: {}", msg),
            ConfigError::InvalidValue {
                section,
                key,
                message,
            } => write!(f, "Invalid value for {}.{}: {}", section, key, message),
            ConfigError::InvalidRule(msg) => write!(f, "Invalid normalization rule: {}", msg),
            ConfigError::UnknownFunction(msg) => write!(f, "Unknown function: {}", msg),
            ConfigError::BadLogLevel(level) => write!(
                f,
                "loglevel must be debug, info, warn, error, off or none, got '{}'",
                level
            ),
            ConfigError::Io(e) => write!(f, "Cannot read settings: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub functions: FunctionTable,
    /// variable name prefixes the catalog is narrowed to; empty accepts any prefix
    pub prefixes: Vec<String>,
    pub normalizer: Normalizer,
    /// column of the input table holding the equations
    pub column: String,
    /// replaces the .csv/.tsv extension of the input to name the output file
    pub suffix: String,
    /// also write a standalone .tex document
    pub tex_document: bool,
    pub parallel: bool,
    pub loglevel: LevelFilter,
    pub log_file: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            functions: FunctionTable::default(),
            prefixes: Vec::new(),
            normalizer: Normalizer::default(),
            column: DEFAULT_COLUMN.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
            tex_document: false,
            parallel: true,
            loglevel: LevelFilter::Info,
            log_file: false,
        }
    }
}

/// one section of the document; keys are removed as they are read so leftovers can be reported
struct Section {
    name: String,
    entries: SectionMap,
}

impl Section {
    fn invalid(&self, key: &str, message: String) -> ConfigError {
        ConfigError::InvalidValue {
            section: self.name.clone(),
            key: key.to_string(),
            message,
        }
    }

    fn take_strings(&mut self, key: &str) -> Option<Vec<String>> {
        self.entries
            .remove(key)
            .map(|values| values.iter().map(Value::to_string_value).collect())
    }

    fn take_string(&mut self, key: &str) -> Result<Option<String>, ConfigError> {
        match self.take_strings(key) {
            None => Ok(None),
            Some(mut values) if values.len() == 1 => Ok(values.pop()),
            Some(values) => Err(self.invalid(key, format!("expected one value, got {}", values.len()))),
        }
    }

    fn take_bool(&mut self, key: &str) -> Result<Option<bool>, ConfigError> {
        match self.entries.remove(key) {
            None => Ok(None),
            Some(values) => match values.as_slice() {
                [value] => value
                    .as_boolean()
                    .map(Some)
                    .ok_or_else(|| self.invalid(key, format!("expected true or false, got '{}'", value))),
                _ => Err(self.invalid(key, "expected a single true or false".to_string())),
            },
        }
    }

    /// `name=value` pairs
    fn take_assignments(&mut self, key: &str) -> Result<Option<Vec<(String, String)>>, ConfigError> {
        let Some(values) = self.take_strings(key) else {
            return Ok(None);
        };
        let mut pairs = Vec::with_capacity(values.len());
        for value in values {
            match value.split_once('=') {
                Some((name, target)) if !name.trim().is_empty() && !target.trim().is_empty() => {
                    pairs.push((name.trim().to_string(), target.trim().to_string()))
                }
                _ => return Err(self.invalid(key, format!("expected name=value, got '{}'", value))),
            }
        }
        Ok(Some(pairs))
    }

    fn warn_leftovers(&self) {
        for key in self.entries.keys() {
            warn!("unknown setting '{}' in section '{}' is ignored", key, self.name);
        }
    }
}

impl BatchConfig {
    pub fn from_document(document: &str) -> Result<Self, ConfigError> {
        let settings = parse_settings(document).map_err(ConfigError::Parse)?;
        let mut config = BatchConfig::default();
        for (name, entries) in settings {
            let mut section = Section { name, entries };
            match section.name.as_str() {
                "functions" => config.read_functions(&mut section)?,
                "variables" => {
                    if let Some(prefixes) = section.take_strings("prefixes") {
                        if prefixes.is_empty()
                            || prefixes.iter().any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_alphabetic()))
                        {
                            return Err(section.invalid("prefixes", "prefixes must be letters only".to_string()));
                        }
                        config.prefixes = prefixes;
                    }
                }
                "normalizer" => config.read_normalizer(&mut section)?,
                "output" => {
                    if let Some(column) = section.take_string("column")? {
                        config.column = column;
                    }
                    if let Some(suffix) = section.take_string("suffix")? {
                        config.suffix = suffix;
                    }
                    if let Some(tex) = section.take_bool("tex_document")? {
                        config.tex_document = tex;
                    }
                }
                "run" => {
                    if let Some(parallel) = section.take_bool("parallel")? {
                        config.parallel = parallel;
                    }
                    if let Some(level) = section.take_string("loglevel")? {
                        config.loglevel =
                            parse_log_level(&level).ok_or(ConfigError::BadLogLevel(level))?;
                    }
                    if let Some(log_file) = section.take_bool("log_file")? {
                        config.log_file = log_file;
                    }
                }
                other => {
                    warn!("unknown section '{}' is ignored", other);
                    continue;
                }
            }
            section.warn_leftovers();
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let document = std::fs::read_to_string(path)?;
        Self::from_document(&document)
    }

    fn read_functions(&mut self, section: &mut Section) -> Result<(), ConfigError> {
        if let Some(names) = section.take_strings("names") {
            self.functions = FunctionTable::from_names(&names).map_err(ConfigError::UnknownFunction)?;
        }
        if let Some(aliases) = section.take_assignments("aliases")? {
            for (alias, target) in aliases {
                self.functions
                    .register_alias(&alias, &target)
                    .map_err(ConfigError::UnknownFunction)?;
            }
        }
        Ok(())
    }

    fn read_normalizer(&mut self, section: &mut Section) -> Result<(), ConfigError> {
        let power_aliases = section.take_assignments("power_aliases")?;
        let renames = section.take_assignments("renames")?;
        let caret_power = section.take_bool("caret_power")?;
        if power_aliases.is_none() && renames.is_none() && caret_power.is_none() {
            return Ok(());
        }

        let mut rules = Vec::new();
        match power_aliases {
            Some(aliases) => {
                for (name, exponent) in aliases {
                    let exponent = exponent.parse::<u32>().map_err(|_| {
                        section.invalid(
                            "power_aliases",
                            format!("exponent of '{}' must be a non-negative integer, got '{}'", name, exponent),
                        )
                    })?;
                    rules.push(NormalizationRule::power_alias(&name, exponent));
                }
            }
            None => rules.extend(
                Normalizer::default()
                    .rules()
                    .iter()
                    .filter(|rule| matches!(rule, NormalizationRule::PowerAlias { .. }))
                    .cloned(),
            ),
        }
        for (from, to) in renames.unwrap_or_default() {
            rules.push(NormalizationRule::rename(&from, &to));
        }
        if caret_power.unwrap_or(true) {
            rules.push(NormalizationRule::CaretPower);
        }
        self.normalizer = Normalizer::new(rules).map_err(ConfigError::InvalidRule)?;
        Ok(())
    }
}
