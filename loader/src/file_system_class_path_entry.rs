use std::{
    fmt,
    fmt::Formatter,
    path::{Path, PathBuf},
};

use log::trace;
use thiserror::Error;

use crate::class_path_entry::{class_file_path, ClassLoadingError, ClassPathEntry};

/// Implementation of [ClassPathEntry] that searches for `.class` files,
/// using the given directory as the root package
#[derive(Debug)]
pub struct FileSystemClassPathEntry {
    base_directory: PathBuf,
}

impl FileSystemClassPathEntry {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, InvalidDirectoryError> {
        let mut base_directory = PathBuf::new();
        base_directory.push(path);

        if !base_directory.is_dir() {
            Err(InvalidDirectoryError {
                path: base_directory.to_string_lossy().to_string(),
            })
        } else {
            Ok(Self { base_directory })
        }
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }
}

impl ClassPathEntry for FileSystemClassPathEntry {
    fn resolve(&self, class_name: &str) -> Result<Option<Vec<u8>>, ClassLoadingError> {
        let class_file = class_file_path(class_name);
        let mut candidate = self.base_directory.clone();
        candidate.push(&class_file);
        trace!("looking for {}", candidate.display());
        if candidate.is_file() {
            std::fs::read(candidate)
                .map(Some)
                .map_err(|err| ClassLoadingError::new(class_file, err))
        } else {
            Ok(None)
        }
    }
}

impl fmt::Display for FileSystemClassPathEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_directory.display())
    }
}

/// Error returned when a directory is not valid
#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid directory: {path}")]
pub struct InvalidDirectoryError {
    path: String,
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::{
        class_path_entry::tests::{assert_can_find_class, assert_cannot_find_class},
        file_system_class_path_entry::{FileSystemClassPathEntry, InvalidDirectoryError},
    };

    fn resources() -> PathBuf {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("tests/resources");
        path
    }

    #[test]
    fn directory_not_found() {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("foobar");
        assert_eq!(
            InvalidDirectoryError {
                path: path.to_string_lossy().to_string()
            },
            FileSystemClassPathEntry::new(path).expect_err("should not have found directory")
        );
    }

    #[test]
    fn files_are_not_directories() {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("Cargo.toml");
        assert!(FileSystemClassPathEntry::new(path).is_err());
    }

    #[test_log::test]
    fn file_system_class_path_entry_works() {
        let entry = FileSystemClassPathEntry::new(resources()).expect("should find directory");

        assert_can_find_class(&entry, "com/coderising/jvm/test/EmployeeV1");
        assert_can_find_class(&entry, "com.coderising.jvm.test.EmployeeV1");
        assert_cannot_find_class(&entry, "com/coderising/jvm/test/EmployeeV2");
        assert_cannot_find_class(&entry, "EmployeeV1");
    }

    #[test]
    fn renders_as_its_directory() {
        let entry = FileSystemClassPathEntry::new(resources()).expect("should find directory");
        assert_eq!(resources().display().to_string(), entry.to_string());
        assert_eq!(resources().as_path(), entry.base_directory());
    }
}
