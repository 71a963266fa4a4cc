use std::path::PathBuf;

/// Path as given on the command line; relative paths are resolved by the adapter.
pub type FilePath = PathBuf;
