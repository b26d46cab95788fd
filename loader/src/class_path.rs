use std::{fmt, fmt::Formatter};

use itertools::Itertools;
use log::debug;

use crate::{
    class_path_entry::{ClassLoadingError, ClassPathEntry},
    file_system_class_path_entry::FileSystemClassPathEntry,
    loader_error::{LoaderError, Result},
};

/// Separator of the entries of a class path string
pub const CLASS_PATH_SEPARATOR: char = ':';

/// An ordered list of roots where classes are searched
#[derive(Debug, Default)]
pub struct ClassPath {
    entries: Vec<Box<dyn ClassPathEntry>>,
}

impl ClassPath {
    /// Parses a string such as `/a/dir:/another/dir`. Every entry must be an existing directory.
    pub fn parse(string: &str) -> Result<ClassPath> {
        let mut class_path: ClassPath = Default::default();
        for entry in string.split(CLASS_PATH_SEPARATOR) {
            class_path.push(Self::try_parse_entry(entry)?);
        }
        debug!("parsed class path with {} entries", class_path.len());
        Ok(class_path)
    }

    fn try_parse_entry(path: &str) -> Result<Box<dyn ClassPathEntry>> {
        let entry = FileSystemClassPathEntry::new(path)
            .map_err(|_| LoaderError::InvalidClassPathEntry(path.to_string()))?;
        Ok(Box::new(entry))
    }

    pub fn push(&mut self, entry: Box<dyn ClassPathEntry>) {
        self.entries.push(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Content of the first entry that contains the given class, searching in order
    pub fn resolve(
        &self,
        class_name: &str,
    ) -> std::result::Result<Option<Vec<u8>>, ClassLoadingError> {
        for entry in self.entries.iter() {
            if let Some(class_bytes) = entry.resolve(class_name)? {
                debug!("found class {class_name} in {entry}");
                return Ok(Some(class_bytes));
            }
        }
        Ok(None)
    }
}

impl fmt::Display for ClassPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.entries.iter().join(&CLASS_PATH_SEPARATOR.to_string())
        )
    }
}
