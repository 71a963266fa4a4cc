use crate::adapter::Adapter;
use crate::types::FilePath;
use expect_test::Expect;
use indent::indent_all_with;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read, Write};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use um_env_base::result::{UmEnvResult, bail};

#[derive(Clone)]
pub struct MockAdapter {
    inner: Arc<RwLock<MockAdapterInner>>,
}

struct MockAdapterInner {
    args: Vec<String>,
    env: Vec<(String, String)>,
    files: BTreeMap<FilePath, String>,
    read_only: BTreeSet<FilePath>,
    effects_string: String,
}

impl MockAdapter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MockAdapterInner {
                env: vec![("NO_COLOR".to_string(), "1".to_string())],
                args: Vec::new(),
                files: BTreeMap::new(),
                read_only: BTreeSet::new(),
                effects_string: String::new(),
            })),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, MockAdapterInner> {
        self.inner
            .read()
            .expect("Unable to acquire read lock for mock adapter")
    }

    fn write(&self) -> RwLockWriteGuard<'_, MockAdapterInner> {
        self.inner
            .write()
            .expect("Unable to acquire write lock for mock adapter")
    }

    fn log_effect(&self, effect: impl AsRef<str>) {
        let mut inner = self.write();
        inner.effects_string.push_str(effect.as_ref());
        inner.effects_string.push('\n');
    }

    pub fn set_args(&self, args: &[&str]) {
        let mut all_args = vec!["./um-env-to-yaml".to_string()];
        all_args.extend(args.iter().map(|s| s.to_string()));
        self.write().args = all_args;
    }

    pub fn set_file(&self, path: impl Into<FilePath>, content: impl Into<String>) {
        self.write().files.insert(path.into(), content.into());
    }

    pub fn get_file(&self, path: impl Into<FilePath>) -> Option<String> {
        self.read().files.get(&path.into()).cloned()
    }

    pub fn set_read_only(&self, path: impl Into<FilePath>) {
        self.write().read_only.insert(path.into());
    }

    pub fn verify_effects(&self, expected: Expect) {
        expected.assert_eq(&self.read().effects_string);
    }

    #[allow(dead_code)]
    pub fn get_effects(&self) -> String {
        self.read().effects_string.clone()
    }
}

impl Adapter for MockAdapter {
    fn args(&self) -> Vec<String> {
        self.read().args.clone()
    }

    fn env(&self) -> Vec<(String, String)> {
        self.read().env.clone()
    }

    fn print(&self, message: &str) {
        self.log_effect(format!("PRINT:\n{}", indent_all_with("\t", message)));
    }

    fn is_file(&self, path: &FilePath) -> UmEnvResult<bool> {
        Ok(self.read().files.contains_key(path))
    }

    fn read_file(&self, path: &FilePath) -> UmEnvResult<Box<dyn Read>> {
        self.log_effect(format!("READ FILE: {}", path.display()));
        let Some(content) = self.read().files.get(path).cloned() else {
            bail!("No such file: '{}'", path.display());
        };
        Ok(Box::new(Cursor::new(content)))
    }

    fn create_file(&self, path: &FilePath) -> UmEnvResult<Box<dyn Write>> {
        self.log_effect(format!("CREATE FILE: {}", path.display()));
        if self.read().read_only.contains(path) {
            bail!("Permission denied: '{}'", path.display());
        }
        self.write().files.insert(path.clone(), String::new());
        Ok(Box::new(MockFile {
            adapter: self.clone(),
            path: path.clone(),
        }))
    }

    fn exit(&self, exit_code: i32) {
        self.log_effect(format!("EXIT: {exit_code}"));
    }
}

impl std::fmt::Debug for MockAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MockAdapter")
    }
}

/// Appends everything written to the backing file of the mock adapter.
struct MockFile {
    adapter: MockAdapter,
    path: FilePath,
}

impl Write for MockFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let text = std::str::from_utf8(buf)
            .map_err(|error| std::io::Error::new(std::io::ErrorKind::InvalidData, error))?;
        self.adapter
            .write()
            .files
            .entry(self.path.clone())
            .or_default()
            .push_str(text);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
