//! Benchmark configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::task::TreeKind;
use crate::error::{BenchError, BenchResult};

/// What to measure, and where the results go.
///
/// Every field has a default, so a configuration file only needs the fields it changes.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub tree: TreeKind,
    /// The tree sizes to measure, in the order they are reported.
    pub sizes: Vec<usize>,
    /// Tasks per size and scenario.
    pub repetitions: usize,
    /// Requested worker threads. Clamped to the available parallelism.
    pub workers: usize,
    /// The directory the result files are written to.
    pub output_dir: PathBuf,
    /// A file to write the debug log to, in addition to the terminal.
    pub log_file: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            tree: TreeKind::Unbalanced,
            sizes: (1..=10).map(|i| i * 10_000).collect(),
            repetitions: 20,
            workers: 4,
            output_dir: PathBuf::from("."),
            log_file: None,
        }
    }
}

impl BenchConfig {
    /// The settings `set` accepts.
    pub const SETTINGS: &'static [&'static str] =
        &["tree", "sizes", "repetitions", "workers", "output_dir", "log_file"];

    /// Builds a configuration from command line arguments: at most one configuration file,
    /// then `key=value` overrides. Only an argument naming a known setting before its first
    /// `=` is an override, so a file name may contain `=`.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> BenchResult<Self> {
        let (overrides, files): (Vec<&str>, Vec<&str>) = args
            .iter()
            .map(|arg| arg.as_ref())
            .partition(|arg| Self::is_override(arg));
        let mut config = match files.as_slice() {
            [] => BenchConfig::default(),
            [path] => BenchConfig::from_file(path)?,
            _ => {
                return Err(BenchError::Config(String::from(
                    "at most one configuration file is accepted",
                )))
            }
        };
        config.apply_overrides(overrides)?;
        Ok(config)
    }

    /// Whether `arg` has the form `key=value` for a known setting.
    pub fn is_override(arg: &str) -> bool {
        match arg.split_once('=') {
            Some((key, _)) => Self::SETTINGS.contains(&key.trim()),
            None => false,
        }
    }

    /// Reads a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> BenchResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: BenchConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies a single `key=value` override, e.g. `sizes=100,200` or `tree=splay`.
    pub fn set(&mut self, key: &str, value: &str) -> BenchResult<()> {
        fn number(key: &str, value: &str) -> BenchResult<usize> {
            value
                .trim()
                .parse()
                .map_err(|_| {
                    BenchError::Config(format!("`{}` expects a number, got `{}`", key, value))
                })
        }

        match key {
            "tree" => self.tree = value.parse()?,
            "sizes" => {
                self.sizes = value
                    .split(',')
                    .filter(|s| !s.trim().is_empty())
                    .map(|s| number(key, s))
                    .collect::<BenchResult<_>>()?
            }
            "repetitions" => self.repetitions = number(key, value)?,
            "workers" => self.workers = number(key, value)?,
            "output_dir" => self.output_dir = PathBuf::from(value),
            "log_file" => self.log_file = Some(PathBuf::from(value)),
            _ => return Err(BenchError::Config(format!("unknown setting `{}`", key))),
        }
        Ok(())
    }

    /// Applies overrides of the form `key=value`.
    pub fn apply_overrides<'a>(
        &mut self,
        args: impl IntoIterator<Item = &'a str>,
    ) -> BenchResult<()> {
        for arg in args {
            let (key, value) = arg
                .split_once('=')
                .ok_or_else(|| BenchError::Config(format!("expected `key=value`, got `{}`", arg)))?;
            self.set(key.trim(), value)?;
        }
        self.validate()
    }

    /// Fails on a configuration that would run no tasks, or that lists a size twice.
    pub fn validate(&self) -> BenchResult<()> {
        if self.sizes.is_empty() || self.repetitions == 0 {
            return Err(BenchError::EmptyTaskSet);
        }
        check_distinct_sizes(&self.sizes)
    }

    pub fn full_results_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_benchmark_results_full.json", self.tree.file_prefix()))
    }

    pub fn averaged_results_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_benchmark_results_short.json", self.tree.file_prefix()))
    }
}

/// Every size is reported in a row of its own, so a size may only be listed once.
pub fn check_distinct_sizes(sizes: &[usize]) -> BenchResult<()> {
    for (i, size) in sizes.iter().enumerate() {
        if sizes[..i].contains(size) {
            return Err(BenchError::Config(format!("size {} is listed twice", size)));
        }
    }
    Ok(())
}
