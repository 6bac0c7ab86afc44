// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML document adapter.
//!
//! This module provides a parser that turns YAML text into nested documents and back,
//! and a file adapter that loads a YAML document from disk.

use crate::domain::{flatten, ConfigError, ConfigPair, DocValue, Mapping, NestedDocument, Result};
use crate::ports::DocumentParser;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed file size for YAML configuration files (10MB)
/// This prevents denial of service attacks via extremely large files
const MAX_YAML_FILE_SIZE: u64 = 10 * 1024 * 1024;

const SOURCE_NAME: &str = "yaml-file";

/// YAML parser implementation.
///
/// Mapping keys that are numbers or booleans are kept as their canonical string form;
/// other non-string keys are dropped. Tags are ignored and their inner value is used.
///
/// # Examples
///
/// ```rust
/// use kvdoc::adapters::YamlParser;
/// use kvdoc::domain::DocValue;
/// use kvdoc::ports::DocumentParser;
///
/// let parser = YamlParser::new();
/// let doc = parser.parse("database:\n  host: localhost\n  port: 5432").unwrap();
/// assert_eq!(doc.get("/database/port"), Some(&DocValue::Integer(5432)));
/// ```
#[derive(Debug, Clone)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    /// Converts a YAML value into a document value.
    fn convert(value: serde_yaml::Value) -> DocValue {
        match value {
            serde_yaml::Value::Null => DocValue::Null,
            serde_yaml::Value::Bool(b) => DocValue::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => DocValue::Integer(i),
                None => n.as_f64().map(DocValue::Float).unwrap_or(DocValue::Null),
            },
            serde_yaml::Value::String(s) => DocValue::String(s),
            serde_yaml::Value::Sequence(seq) => {
                DocValue::Sequence(seq.into_iter().map(Self::convert).collect())
            }
            serde_yaml::Value::Mapping(map) => {
                let mut result = Mapping::new();
                for (key, val) in map {
                    let key = match Self::convert(key) {
                        DocValue::String(s) => s,
                        scalar @ (DocValue::Bool(_) | DocValue::Integer(_) | DocValue::Float(_)) => {
                            scalar.canonical_scalar().unwrap_or_default()
                        }
                        other => {
                            tracing::debug!("Dropping YAML entry with {} key", other.kind());
                            continue;
                        }
                    };
                    result.insert(key, Self::convert(val));
                }
                DocValue::Mapping(result)
            }
            serde_yaml::Value::Tagged(tagged) => Self::convert(tagged.value),
        }
    }
}

impl Default for YamlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser for YamlParser {
    fn parse(&self, content: &str) -> Result<NestedDocument> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        match Self::convert(value) {
            DocValue::Mapping(map) => Ok(NestedDocument::from(map)),
            DocValue::Null => Ok(NestedDocument::new()),
            other => Err(ConfigError::ParseError {
                message: format!("YAML document root must be a mapping, found {}", other.kind()),
                source: None,
            }),
        }
    }

    fn render(&self, doc: &NestedDocument) -> Result<String> {
        serde_yaml::to_string(doc).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to render YAML: {}", e),
            source: Some(Box::new(e)),
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

/// A YAML document loaded from a file.
///
/// # Examples
///
/// ```rust,no_run
/// use kvdoc::adapters::YamlFileAdapter;
///
/// // Load from a specific file
/// let adapter = YamlFileAdapter::from_file("/path/to/config.yaml").unwrap();
/// let pairs = adapter.pairs();
///
/// // Load from default OS location
/// let adapter = YamlFileAdapter::from_default_location("myapp", "com.example").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct YamlFileAdapter {
    /// Path to the YAML file
    file_path: PathBuf,
    /// Parsed document
    document: NestedDocument,
    /// YAML parser
    parser: YamlParser,
}

impl YamlFileAdapter {
    /// Loads a YAML document from a specific file path.
    ///
    /// The path is canonicalized and files over 10MB are rejected.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();
        let parser = YamlParser::new();

        // Canonicalize path to prevent directory traversal attacks
        let canonical_path = file_path.canonicalize().map_err(|e| ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!(
                "Invalid or inaccessible path: {}",
                display_name(&file_path)
            ),
            source: Some(Box::new(e)),
        })?;

        let content = read_capped(&canonical_path)?;
        let document = parser.parse(&content)?;

        Ok(Self {
            file_path: canonical_path,
            document,
            parser,
        })
    }

    /// Loads `config.yaml` from the OS-appropriate configuration directory.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        Self::with_filename(app_name, qualifier, "config.yaml")
    }

    /// Loads a custom file name from the OS-appropriate configuration directory.
    pub fn with_filename(app_name: &str, qualifier: &str, filename: &str) -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: "Failed to determine project directories".to_string(),
                source: None,
            })?;

        Self::from_file(proj_dirs.config_dir().join(filename))
    }

    /// Returns the path to the configuration file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Returns the parsed document.
    pub fn document(&self) -> &NestedDocument {
        &self.document
    }

    /// Flattens the document into store pairs.
    pub fn pairs(&self) -> Vec<ConfigPair> {
        flatten(&self.document)
    }

    /// Re-reads the file from disk.
    pub fn reload(&mut self) -> Result<()> {
        let content = read_capped(&self.file_path)?;
        self.document = self.parser.parse(&content)?;
        Ok(())
    }
}

fn display_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
}

fn read_capped(path: &Path) -> Result<String> {
    // Check file size before reading to prevent DoS via large files
    let metadata = fs::metadata(path).map_err(|e| ConfigError::SourceError {
        source_name: SOURCE_NAME.to_string(),
        message: format!("Failed to read file metadata: {}", display_name(path)),
        source: Some(Box::new(e)),
    })?;

    if metadata.len() > MAX_YAML_FILE_SIZE {
        return Err(ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!(
                "Configuration file too large: {} bytes (max {} bytes)",
                metadata.len(),
                MAX_YAML_FILE_SIZE
            ),
            source: None,
        });
    }

    fs::read_to_string(path).map_err(|e| ConfigError::SourceError {
        source_name: SOURCE_NAME.to_string(),
        message: format!("Failed to read configuration file: {}", display_name(path)),
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_yaml_parser_nested() {
        let parser = YamlParser::new();
        let yaml = r#"
database:
  host: localhost
  port: 5432
"#;
        let doc = parser.parse(yaml).unwrap();

        assert_eq!(doc.get("/database/host"), Some(&DocValue::from("localhost")));
        assert_eq!(doc.get("/database/port"), Some(&DocValue::Integer(5432)));
    }

    #[test]
    fn test_yaml_parser_mixed_types() {
        let parser = YamlParser::new();
        let yaml = r#"
string_value: hello
number_value: 42
float_value: 1.5
bool_value: true
null_value: null
list_value: [a, 1]
"#;
        let doc = parser.parse(yaml).unwrap();

        assert_eq!(doc.get("string_value"), Some(&DocValue::from("hello")));
        assert_eq!(doc.get("number_value"), Some(&DocValue::Integer(42)));
        assert_eq!(doc.get("float_value"), Some(&DocValue::Float(1.5)));
        assert_eq!(doc.get("bool_value"), Some(&DocValue::Bool(true)));
        assert_eq!(doc.get("null_value"), Some(&DocValue::Null));
        assert_eq!(
            doc.get("list_value"),
            Some(&DocValue::Sequence(vec![
                DocValue::from("a"),
                DocValue::Integer(1)
            ]))
        );
    }

    #[test]
    fn test_yaml_parser_scalar_keys() {
        let parser = YamlParser::new();
        let doc = parser.parse("ports:\n  8080: http\n  true: yes\n").unwrap();
        assert_eq!(doc.get("/ports/8080"), Some(&DocValue::from("http")));
        assert_eq!(doc.get("/ports/true"), Some(&DocValue::from("yes")));
    }

    #[test]
    fn test_yaml_parser_empty_is_empty_document() {
        let parser = YamlParser::new();
        assert!(parser.parse("").unwrap().is_empty());
    }

    #[test]
    fn test_yaml_parser_rejects_non_mapping_root() {
        let parser = YamlParser::new();
        assert!(parser.parse("- a\n- b\n").is_err());
    }

    #[test]
    fn test_yaml_parser_invalid() {
        let parser = YamlParser::new();
        assert!(parser.parse("invalid: yaml: content:").is_err());
    }

    #[test]
    fn test_yaml_render_round_trip() {
        let parser = YamlParser::new();
        let doc = parser.parse("app:\n  name: x\n  port: 8080\n").unwrap();
        let rendered = parser.render(&doc).unwrap();
        assert_eq!(parser.parse(&rendered).unwrap(), doc);
    }

    #[test]
    fn test_yaml_parser_supported_extensions() {
        let parser = YamlParser::default();
        let extensions = parser.supported_extensions();

        assert_eq!(extensions.len(), 2);
        assert!(extensions.contains(&"yaml"));
        assert!(extensions.contains(&"yml"));
    }

    #[test]
    fn test_yaml_adapter_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "database:\n  host: localhost\n  port: 5432").unwrap();

        let adapter = YamlFileAdapter::from_file(temp_file.path()).unwrap();
        let mut pairs = adapter.pairs();
        pairs.sort_by(|a, b| a.key.cmp(&b.key));

        assert_eq!(
            pairs,
            vec![
                ConfigPair::new("/database/host", "localhost"),
                ConfigPair::new("/database/port", "5432"),
            ]
        );
    }

    #[test]
    fn test_yaml_adapter_reload() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        fs::write(&path, "key: initial_value\n").unwrap();
        let mut adapter = YamlFileAdapter::from_file(&path).unwrap();
        assert_eq!(
            adapter.document().get("key"),
            Some(&DocValue::from("initial_value"))
        );

        fs::write(&path, "key: updated_value\n").unwrap();
        adapter.reload().unwrap();

        assert_eq!(
            adapter.document().get("key"),
            Some(&DocValue::from("updated_value"))
        );
    }

    #[test]
    fn test_yaml_adapter_file_path_is_canonical() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "key: value").unwrap();

        let adapter = YamlFileAdapter::from_file(temp_file.path()).unwrap();
        assert_eq!(
            adapter.file_path(),
            temp_file.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_yaml_adapter_nonexistent_file() {
        let err = YamlFileAdapter::from_file("/nonexistent/path/to/config.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::SourceError { .. }));
    }
}
