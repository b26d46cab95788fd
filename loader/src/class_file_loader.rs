use log::{info, warn};

use minijvm_reader::{class_file::ClassFile, class_reader};

use crate::{
    class_path::ClassPath,
    class_path_entry::binary_name,
    loader_error::{LoaderError, Result},
};

/// Finds classes on a [ClassPath] and parses them
#[derive(Debug, Default)]
pub struct ClassFileLoader {
    class_path: ClassPath,
}

impl ClassFileLoader {
    pub fn new(class_path: ClassPath) -> Self {
        Self { class_path }
    }

    pub fn class_path(&self) -> &ClassPath {
        &self.class_path
    }

    /// Reads the bytes of a class, given its name in either binary (`a/b/C`)
    /// or source (`a.b.C`) form
    pub fn read_binary_code(&self, class_name: &str) -> Result<Vec<u8>> {
        let binary_class_name = binary_name(class_name);
        let bytes = self
            .class_path
            .resolve(&binary_class_name)
            .map_err(|source| {
                warn!("failed to read class {binary_class_name}: {source}");
                LoaderError::ClassLoading {
                    class_name: binary_class_name.clone(),
                    source,
                }
            })?
            .ok_or_else(|| LoaderError::ClassNotFound(class_name.to_string()))?;
        info!(
            "loaded class {binary_class_name} ({} bytes) from class path {}",
            bytes.len(),
            self.class_path
        );
        Ok(bytes)
    }

    pub fn load_class(&self, class_name: &str) -> Result<ClassFile> {
        let bytes = self.read_binary_code(class_name)?;
        Ok(class_reader::read_buffer(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        class_file_loader::ClassFileLoader,
        class_path::ClassPath,
        loader_error::LoaderError,
    };

    fn loader() -> ClassFileLoader {
        let class_path = format!("{}/tests/resources", env!("CARGO_MANIFEST_DIR"));
        ClassFileLoader::new(ClassPath::parse(&class_path).unwrap())
    }

    #[test_log::test]
    fn dotted_and_slashed_names_find_the_same_file() {
        let loader = loader();
        let dotted = loader
            .read_binary_code("com.coderising.jvm.test.EmployeeV1")
            .unwrap();
        let slashed = loader
            .read_binary_code("com/coderising/jvm/test/EmployeeV1")
            .unwrap();
        assert_eq!(816, dotted.len());
        assert_eq!(dotted, slashed);
    }

    #[test]
    fn missing_classes_are_not_found() {
        assert!(matches!(
            loader().read_binary_code("com.coderising.jvm.test.EmployeeV2"),
            Err(LoaderError::ClassNotFound(name)) if name == "com.coderising.jvm.test.EmployeeV2"
        ));
    }

    #[test]
    fn empty_class_path_finds_nothing() {
        assert!(matches!(
            ClassFileLoader::default().load_class("java.lang.Object"),
            Err(LoaderError::ClassNotFound(_))
        ));
    }
}
