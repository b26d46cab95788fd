use thiserror::Error;

use minijvm_reader::class_reader_error::ClassReaderError;

use crate::class_path_entry::ClassLoadingError;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("class not found: {0}")]
    ClassNotFound(String),

    #[error("invalid class path entry: {0}")]
    InvalidClassPathEntry(String),

    #[error("unexpected error loading class {class_name}: {source}")]
    ClassLoading {
        class_name: String,
        #[source]
        source: ClassLoadingError,
    },

    #[error("class reading error: {0}")]
    ClassReader(#[from] ClassReaderError),
}

pub type Result<T> = std::result::Result<T, LoaderError>;
