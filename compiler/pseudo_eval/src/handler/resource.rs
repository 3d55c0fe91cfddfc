//! Locating and reading script sources.

use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use rustc_hash::FxHashMap;

/// Source lookup used for run targets and `import`.
pub trait ResourceHandler {
    /// `target` resolved against the directory of `source`, if it exists.
    fn get_target_relative_to(&self, source: &str, target: &str) -> Option<String>;

    fn has(&self, target: &str) -> bool;

    /// Contents of `target`, if it exists.
    fn get(&self, target: &str) -> Option<String>;

    /// Canonical name of `target`.
    fn resolve(&self, target: &str) -> String;
}

/// Reads from the filesystem. Relative paths resolve against the working
/// directory.
pub struct FileResource;

impl FileResource {
    fn absolute(path: &Path) -> PathBuf {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        };
        normalize(&path)
    }
}

/// Lexically fold `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

impl ResourceHandler for FileResource {
    fn get_target_relative_to(&self, source: &str, target: &str) -> Option<String> {
        let origin = FileResource::absolute(&Path::new(source).join(".."));
        let result = normalize(&origin.join(target));
        result
            .is_file()
            .then(|| result.to_string_lossy().into_owned())
    }

    fn has(&self, target: &str) -> bool {
        Path::new(target).is_file()
    }

    fn get(&self, target: &str) -> Option<String> {
        fs::read_to_string(target).ok()
    }

    fn resolve(&self, target: &str) -> String {
        FileResource::absolute(Path::new(target))
            .to_string_lossy()
            .into_owned()
    }
}

/// In-memory sources keyed by `/`-separated paths.
#[derive(Default)]
pub struct MemoryResource {
    files: FxHashMap<String, String>,
}

impl MemoryResource {
    pub fn new() -> Self {
        MemoryResource::default()
    }

    #[must_use]
    pub fn with(mut self, path: &str, source: &str) -> Self {
        self.insert(path, source);
        self
    }

    pub fn insert(&mut self, path: &str, source: &str) {
        self.files.insert(normalize_key(path), source.to_string());
    }
}

impl ResourceHandler for MemoryResource {
    fn get_target_relative_to(&self, source: &str, target: &str) -> Option<String> {
        let source = normalize_key(source);
        let joined = if target.starts_with('/') {
            target.to_string()
        } else {
            match parent(&source) {
                "" => target.to_string(),
                "/" => format!("/{target}"),
                dir => format!("{dir}/{target}"),
            }
        };
        let key = normalize_key(&joined);
        self.files.contains_key(&key).then_some(key)
    }

    fn has(&self, target: &str) -> bool {
        self.files.contains_key(&normalize_key(target))
    }

    fn get(&self, target: &str) -> Option<String> {
        self.files.get(&normalize_key(target)).cloned()
    }

    fn resolve(&self, target: &str) -> String {
        normalize_key(target)
    }
}

fn normalize_key(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            part => parts.push(part),
        }
    }
    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(index) => &path[..index],
        None => "",
    }
}
