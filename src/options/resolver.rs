//! Layered option resolution
//!
//! Layers are applied in a fixed order regardless of how the resolver was
//! built: declared defaults, then the answers file, then explicit CLI flags.
//! Later layers replace earlier ones per option.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use super::OptionSpec;
use crate::error::{IrError, IrResult};

/// Minimum Jaro-Winkler similarity for a "did you mean" hint
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Which layer produced a resolved value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Default,
    AnswersFile,
    Cli,
}

/// A single resolved option
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOption {
    pub name: String,
    /// Raw string as provided by its layer
    pub raw: String,
    /// Typed value
    pub value: Value,
    pub source: ValueSource,
}

/// Result of resolution, keyed by option name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedOptions {
    plugin: String,
    values: BTreeMap<String, ResolvedOption>,
    required: Vec<String>,
}

impl ResolvedOptions {
    pub fn get(&self, name: &str) -> Option<&ResolvedOption> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedOption> {
        self.values.values()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw strings keyed by option name, as written to an answers file
    pub fn raw_values(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|(name, opt)| (name.clone(), opt.raw.clone()))
            .collect()
    }

    /// Fail with the full list of required options that have no value
    pub fn check_required(&self) -> IrResult<()> {
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|name| !self.values.contains_key(*name))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(IrError::MissingRequiredOptions {
                plugin: self.plugin.clone(),
                options: missing,
            })
        }
    }
}

/// Builder that merges option layers for one plugin
#[derive(Debug)]
pub struct OptionResolver<'a> {
    plugin: &'a str,
    options: Vec<(&'a str, &'a OptionSpec)>,
    answers: BTreeMap<String, String>,
    cli: BTreeMap<String, String>,
}

impl<'a> OptionResolver<'a> {
    pub fn new(
        plugin: &'a str,
        options: impl IntoIterator<Item = (&'a str, &'a OptionSpec)>,
    ) -> Self {
        Self {
            plugin,
            options: options.into_iter().collect(),
            answers: BTreeMap::new(),
            cli: BTreeMap::new(),
        }
    }

    /// Values loaded from an answers file
    pub fn with_answers(mut self, answers: BTreeMap<String, String>) -> Self {
        self.answers = answers;
        self
    }

    /// Values given explicitly on the command line
    pub fn with_cli(mut self, cli: BTreeMap<String, String>) -> Self {
        self.cli = cli;
        self
    }

    pub fn resolve(self) -> IrResult<ResolvedOptions> {
        self.reject_unknown(&self.answers)?;
        self.reject_unknown(&self.cli)?;

        let mut resolved = ResolvedOptions {
            plugin: self.plugin.to_string(),
            values: BTreeMap::new(),
            required: self
                .options
                .iter()
                .filter(|(_, spec)| spec.required)
                .map(|(name, _)| name.to_string())
                .collect(),
        };

        for (name, spec) in &self.options {
            let layered = self
                .cli
                .get(*name)
                .map(|raw| (raw.clone(), ValueSource::Cli))
                .or_else(|| {
                    self.answers
                        .get(*name)
                        .filter(|raw| !raw.is_empty())
                        .map(|raw| (raw.clone(), ValueSource::AnswersFile))
                })
                .or_else(|| spec.default_raw().map(|raw| (raw, ValueSource::Default)));

            let Some((raw, source)) = layered else {
                continue;
            };

            let value = convert(name, spec, &raw)?;
            debug!("Resolved option '{}' = {} ({:?})", name, value, source);

            resolved.values.insert(
                name.to_string(),
                ResolvedOption {
                    name: name.to_string(),
                    raw,
                    value,
                    source,
                },
            );
        }

        Ok(resolved)
    }

    fn reject_unknown(&self, layer: &BTreeMap<String, String>) -> IrResult<()> {
        for key in layer.keys() {
            if !self.options.iter().any(|(name, _)| name == key) {
                return Err(IrError::UnknownOption {
                    plugin: self.plugin.to_string(),
                    option: key.clone(),
                    suggestion: self.closest(key),
                });
            }
        }
        Ok(())
    }

    fn closest(&self, key: &str) -> Option<String> {
        self.options
            .iter()
            .map(|(name, _)| (strsim::jaro_winkler(key, name), *name))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, name)| name.to_string())
    }
}

fn convert(name: &str, spec: &OptionSpec, raw: &str) -> IrResult<Value> {
    if !spec.choices.is_empty() {
        let candidates: Vec<&str> = if spec.option_type == super::OptionType::ListValue {
            raw.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
        } else {
            vec![raw]
        };
        if let Some(bad) = candidates
            .into_iter()
            .find(|c| !spec.choices.iter().any(|choice| choice == c))
        {
            return Err(IrError::InvalidChoice {
                option: name.to_string(),
                value: bad.to_string(),
                choices: spec.choices.clone(),
            });
        }
    }

    spec.option_type
        .convert(raw)
        .map_err(|reason| IrError::InvalidOptionValue {
            option: name.to_string(),
            value: raw.to_string(),
            reason,
        })
}
