//! Answers files
//!
//! INI files with one section per plugin; keys are option names:
//!
//! ```ini
//! [example]
//! foo-bar = from_answers_file
//! ```
//!
//! Values are taken literally: quotes and backslashes are neither stripped
//! on read nor added on write.

use std::collections::BTreeMap;
use std::path::Path;

use ini::{EscapePolicy, Ini, ParseOption};
use tracing::{debug, info};

use crate::error::{IrError, IrResult};

pub struct AnswersFile;

impl AnswersFile {
    /// Read the `[section]` key/value pairs from `path`
    pub fn load(path: &Path, section: &str) -> IrResult<BTreeMap<String, String>> {
        let ini = Ini::load_from_file_opt(path, literal()).map_err(|e| IrError::AnswersFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let props = ini
            .section(Some(section))
            .ok_or_else(|| IrError::AnswersFileSectionMissing {
                path: path.to_path_buf(),
                section: section.to_string(),
            })?;

        let values: BTreeMap<String, String> = props
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        debug!("Loaded {} answers from {:?} [{}]", values.len(), path, section);
        Ok(values)
    }

    /// Write `values` as the only section of a new answers file
    pub fn write(path: &Path, section: &str, values: &BTreeMap<String, String>) -> IrResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut ini = Ini::new();
        // the section header is kept even when there is nothing to answer
        ini.with_section(Some(section));
        for (key, value) in values {
            ini.set_to(Some(section), key.clone(), value.clone());
        }
        ini.write_to_file_policy(path, EscapePolicy::Nothing)?;

        info!("Answers file written to {:?}", path);
        Ok(())
    }
}

fn literal() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_load_preserves_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("answers.ini");

        let mut values = BTreeMap::new();
        values.insert("foo-bar".to_string(), "default string".to_string());
        values.insert("hosts".to_string(), "a,b".to_string());

        AnswersFile::write(&path, "example", &values).unwrap();
        let loaded = AnswersFile::load(&path, "example").unwrap();
        assert_eq!(loaded, values);
    }

    #[test]
    fn test_special_characters_kept_literally() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("answers.ini");

        let values: BTreeMap<String, String> = [
            ("double", "\"quoted\""),
            ("single", "'quoted'"),
            ("backslash", r"C:\dir\new"),
            ("semicolon", "a;b"),
            ("hash", "x # y"),
            ("equals", "k=v"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        AnswersFile::write(&path, "example", &values).unwrap();
        assert_eq!(AnswersFile::load(&path, "example").unwrap(), values);
    }

    #[test]
    fn test_hand_written_backslashes_not_unescaped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("answers");
        std::fs::write(&path, "[example]\nfoo-bar = C:\\dir\\new\nquoted = \"x\"\n").unwrap();

        let loaded = AnswersFile::load(&path, "example").unwrap();
        assert_eq!(loaded["foo-bar"], r"C:\dir\new");
        assert_eq!(loaded["quoted"], "\"x\"");
    }

    #[test]
    fn test_load_hand_written_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("answers");
        std::fs::write(&path, "[example]\nfoo-bar = from_answers_file\n\n[other]\nx = 1\n")
            .unwrap();

        let loaded = AnswersFile::load(&path, "example").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["foo-bar"], "from_answers_file");
    }

    #[test]
    fn test_missing_section_and_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("answers");
        std::fs::write(&path, "[other]\nx = 1\n").unwrap();

        assert!(matches!(
            AnswersFile::load(&path, "example"),
            Err(IrError::AnswersFileSectionMissing { .. })
        ));
        assert!(matches!(
            AnswersFile::load(&temp.path().join("missing"), "example"),
            Err(IrError::AnswersFile { .. })
        ));
    }
}
