use crate::adapter::Adapter;
use crate::legacy::load_mapping;
use crate::types::FilePath;
use crate::yaml::write_yaml;
use std::path::Path;
use um_env_base::logging::info;
use um_env_base::result::UmEnvResult;

pub const DEFAULT_OUTPUT_FILE_NAME: &str = "um_env.yaml";

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub input_path: FilePath,
    pub output_path: Option<FilePath>,
}

/// The explicit output path if given, otherwise `um_env.yaml` next to the input file.
pub fn resolve_output_path(input_path: &Path, explicit_output_path: Option<&Path>) -> FilePath {
    if let Some(output_path) = explicit_output_path {
        return output_path.to_path_buf();
    }
    match input_path.parent() {
        Some(directory) => directory.join(DEFAULT_OUTPUT_FILE_NAME),
        None => FilePath::from(DEFAULT_OUTPUT_FILE_NAME),
    }
}

/// Loads the mapping before touching the output, so a failed load never creates a file.
pub fn convert(adapter: &dyn Adapter, request: &ConversionRequest) -> UmEnvResult<FilePath> {
    let output_path = resolve_output_path(&request.input_path, request.output_path.as_deref());
    info!(
        "Converting '{}' to '{}'",
        request.input_path.display(),
        output_path.display()
    );
    let mapping = load_mapping(adapter, &request.input_path)?;
    write_yaml(adapter, &mapping, &output_path)?;
    info!("Wrote '{}'", output_path.display());
    Ok(output_path)
}
