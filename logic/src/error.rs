use crate::types::FilePath;
use std::fmt::{Display, Formatter};

/// Failures of the conversion pipeline that are not located in the legacy source text.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    MissingInputFile { path: FilePath },
    MissingMappingAttribute { name: String, path: FilePath },
    MappingNotADict { path: FilePath, found: String },
    NonStringKey { path: FilePath, key: String },
    NestingTooDeep { path: FilePath, limit: usize },
}

impl ConversionError {
    pub fn help(&self) -> Option<String> {
        match self {
            ConversionError::MissingInputFile { .. } => None,
            ConversionError::MissingMappingAttribute { name, .. } => Some(format!(
                "The file must bind '{name}' to a dict, e.g. {name} = {{\"UM_NPES\": 16}}"
            )),
            ConversionError::MappingNotADict { .. } => {
                Some("Bind 'vars' to a dict literal of environment variables".to_string())
            }
            ConversionError::NonStringKey { .. } => {
                Some("Keys of 'vars' are environment variable names and must be strings".to_string())
            }
            ConversionError::NestingTooDeep { .. } => {
                Some("A list or dict that contains itself cannot be written as YAML".to_string())
            }
        }
    }
}

impl Display for ConversionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionError::MissingInputFile { path } => {
                write!(f, "No such file or directory: '{}'", path.display())
            }
            ConversionError::MissingMappingAttribute { name, path } => {
                write!(f, "'{}' does not define '{name}'", path.display())
            }
            ConversionError::MappingNotADict { path, found } => {
                write!(
                    f,
                    "'vars' in '{}' must be a dict, found '{found}'",
                    path.display()
                )
            }
            ConversionError::NonStringKey { path, key } => {
                write!(
                    f,
                    "'vars' in '{}' has a non-string key: {key}",
                    path.display()
                )
            }
            ConversionError::NestingTooDeep { path, limit } => {
                write!(
                    f,
                    "'vars' in '{}' nests containers more than {limit} levels deep",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for ConversionError {}
