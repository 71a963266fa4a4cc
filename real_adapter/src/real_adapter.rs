use std::env;
use std::fmt::Debug;
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use um_env_base::result::{Context, UmEnvResult};
use um_env_logic::adapter::Adapter;
use um_env_logic::types::FilePath;

pub struct RealAdapter {
    base_path: PathBuf,
}

impl RealAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Relative paths are taken from the base path, absolute paths are kept as they are.
    fn resolve_path(&self, path: &FilePath) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Adapter for RealAdapter {
    fn args(&self) -> Vec<String> {
        env::args().collect()
    }

    fn env(&self) -> Vec<(String, String)> {
        env::vars().collect()
    }

    fn print(&self, message: &str) {
        eprintln!("{message}");
    }

    fn is_file(&self, path: &FilePath) -> UmEnvResult<bool> {
        Ok(self.resolve_path(path).is_file())
    }

    fn read_file(&self, path: &FilePath) -> UmEnvResult<Box<dyn Read>> {
        let physical_path = self.resolve_path(path);
        Ok(Box::new(File::open(&physical_path).with_context(|| {
            format!("Failed to read file {physical_path:?}")
        })?))
    }

    fn create_file(&self, path: &FilePath) -> UmEnvResult<Box<dyn Write>> {
        let physical_path = self.resolve_path(path);
        Ok(Box::new(File::create(&physical_path).with_context(
            || format!("Failed to create file {physical_path:?}"),
        )?))
    }

    fn exit(&self, exit_code: i32) {
        std::process::exit(exit_code);
    }
}

impl Debug for RealAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RealAdapter")
    }
}
