use std::{error::Error, fmt};

use thiserror::Error;

/// A root where class files can be searched, such as a directory
pub trait ClassPathEntry: fmt::Debug + fmt::Display {
    /// Returns the content of the given class, in binary form (i.e. `java/lang/Object`),
    /// or `None` if this entry does not contain it
    fn resolve(&self, class_name: &str) -> Result<Option<Vec<u8>>, ClassLoadingError>;
}

/// Converts a class name in source form (`a.b.C`) to binary form (`a/b/C`).
/// Names already in binary form are returned unchanged.
pub fn binary_name(class_name: &str) -> String {
    class_name.replace('.', "/")
}

/// Path of the class file relative to a class path root, e.g. `java/lang/Object.class`
pub fn class_file_path(class_name: &str) -> String {
    format!("{}.class", binary_name(class_name))
}

/// Failure while reading a class file that an entry does contain
#[derive(Debug, Error)]
#[error("cannot read {class_file}: {source}")]
pub struct ClassLoadingError {
    class_file: String,
    #[source]
    source: Box<dyn Error + Send + Sync>,
}

impl ClassLoadingError {
    pub fn new(class_file: impl Into<String>, error: impl Error + Send + Sync + 'static) -> Self {
        Self {
            class_file: class_file.into(),
            source: Box::new(error),
        }
    }

    pub fn class_file(&self) -> &str {
        &self.class_file
    }
}

#[cfg(test)]
pub mod tests {
    use std::{error::Error, io};

    use crate::class_path_entry::{
        binary_name, class_file_path, ClassLoadingError, ClassPathEntry,
    };

    pub fn assert_can_find_class(entry: &impl ClassPathEntry, class_name: &str) {
        let buf = entry
            .resolve(class_name)
            .expect("should have been able to read file")
            .expect("should have been able to find file");
        let magic_number =
            u32::from_be_bytes(buf[0..4].try_into().expect("file should have 4 bytes"));
        assert_eq!(0xCAFEBABE, magic_number);
    }

    pub fn assert_cannot_find_class(entry: &impl ClassPathEntry, class_name: &str) {
        assert!(entry
            .resolve(class_name)
            .expect("should not have had any errors")
            .is_none());
    }

    #[test]
    fn source_names_become_binary_names() {
        assert_eq!("java/lang/Object", binary_name("java.lang.Object"));
        assert_eq!("java/lang/Object", binary_name("java/lang/Object"));
        assert_eq!("Main", binary_name("Main"));
    }

    #[test]
    fn class_files_live_under_their_package_directories() {
        assert_eq!(
            "com/coderising/jvm/test/EmployeeV1.class",
            class_file_path("com.coderising.jvm.test.EmployeeV1")
        );
        assert_eq!("Main.class", class_file_path("Main"));
    }

    #[test]
    fn class_loading_error_keeps_its_cause() {
        let error = ClassLoadingError::new(
            "a/B.class",
            io::Error::new(io::ErrorKind::Other, "disk on fire"),
        );
        assert_eq!("a/B.class", error.class_file());
        assert_eq!("cannot read a/B.class: disk on fire", error.to_string());
        assert!(error.source().is_some());
    }
}
