mod evaluate;
mod lexer;
mod object;
mod parse_legacy;
mod source_error;
mod value;

pub use evaluate::Namespace;
pub use object::{MAX_NESTING_DEPTH, Object};
pub use value::{Dict, EnvironmentMapping, LegacyValue};

use crate::adapter::Adapter;
use crate::error::ConversionError;
use crate::types::FilePath;
use tracing::info_span;
use um_env_base::logging::info;
use um_env_base::result::{Context, UmEnvError, UmEnvResult};

/// Name of the binding holding the environment mapping in a legacy definition file.
pub const MAPPING_NAME: &str = "vars";

/// Evaluates the legacy definition file at `input_path` and extracts its `vars` mapping.
pub fn load_mapping(
    adapter: &dyn Adapter,
    input_path: &FilePath,
) -> UmEnvResult<EnvironmentMapping> {
    if !adapter.is_file(input_path)? {
        return Err(UmEnvError::new(ConversionError::MissingInputFile {
            path: input_path.clone(),
        }));
    }
    let source = std::io::read_to_string(adapter.read_file(input_path)?)
        .with_context(|| format!("Failed to read '{}'", input_path.display()))?;
    let filename = input_path.display().to_string();
    let namespace = evaluate_legacy_source(&filename, &source)?;
    extract_mapping(namespace, input_path)
}

pub fn evaluate_legacy_source(filename: &str, source: &str) -> UmEnvResult<Namespace> {
    info!("Evaluating legacy definition file '{filename}'");
    let _span = info_span!("Evaluate legacy definition", filename).entered();
    (|| -> source_error::SourceResult<Namespace> {
        let tokens = lexer::tokenize(source)?;
        let module = parse_legacy::parse_module(&tokens)?;
        evaluate::evaluate_module(&module)
    })()
    .map_err(|error| UmEnvError::new(error.into_report(filename, source)))
    .with_context(|| format!("Failed to load legacy definition file '{filename}'"))
}

fn extract_mapping(
    namespace: Namespace,
    input_path: &FilePath,
) -> UmEnvResult<EnvironmentMapping> {
    let Some(object) = namespace.take(MAPPING_NAME) else {
        return Err(UmEnvError::new(ConversionError::MissingMappingAttribute {
            name: MAPPING_NAME.to_string(),
            path: input_path.clone(),
        }));
    };
    if !matches!(object, Object::Dict(_)) {
        return Err(UmEnvError::new(ConversionError::MappingNotADict {
            path: input_path.clone(),
            found: object.type_name().to_string(),
        }));
    }
    let Some(LegacyValue::Dict(dict)) = object.freeze() else {
        return Err(UmEnvError::new(ConversionError::NestingTooDeep {
            path: input_path.clone(),
            limit: MAX_NESTING_DEPTH,
        }));
    };
    let mapping = EnvironmentMapping::try_from_dict(dict).map_err(|key| {
        UmEnvError::new(ConversionError::NonStringKey {
            path: input_path.clone(),
            key: key.to_string(),
        })
    })?;
    info!("Found {} environment variables", mapping.len());
    Ok(mapping)
}
