use crate::types::FilePath;
use std::fmt::Debug;
use std::io::{Read, Write};
use std::rc::Rc;
use um_env_base::result::UmEnvResult;

/// All interaction with the outside world goes through this trait.
pub trait Adapter: Debug + 'static {
    fn args(&self) -> Vec<String>;
    fn env(&self) -> Vec<(String, String)>;
    fn print(&self, message: &str);
    /// True only for existing regular files, not directories.
    fn is_file(&self, path: &FilePath) -> UmEnvResult<bool>;
    fn read_file(&self, path: &FilePath) -> UmEnvResult<Box<dyn Read>>;
    /// Creates the file, truncating any existing content.
    fn create_file(&self, path: &FilePath) -> UmEnvResult<Box<dyn Write>>;
    fn exit(&self, exit_code: i32);
}

pub type AdapterBox = Rc<dyn Adapter>;
