use thiserror::Error;

use minijvm_utils::buffer::BufferError;

use crate::constant_pool::InvalidConstantReferenceError;

/// Errors returned while parsing a class file or decoding the bytecode of its methods.
/// None of them is recoverable: a class that fails to parse yields no partial model.
#[derive(Error, Debug, PartialEq)]
pub enum ClassReaderError {
    #[error("unexpected end of input at offset {position}: needed {requested} bytes, {available} available")]
    UnexpectedEndOfInput {
        position: usize,
        requested: usize,
        available: usize,
    },

    #[error("not a class file: invalid magic number {0:#010x}")]
    NotAClassFile(u32),

    #[error("unsupported constant pool tag {tag} for entry #{index}")]
    UnsupportedConstantTag { tag: u8, index: u16 },

    #[error(transparent)]
    InvalidConstantReference(#[from] InvalidConstantReferenceError),

    #[error("unknown op code {opcode:#04x} at offset {offset}")]
    UnknownOpcode { opcode: u8, offset: usize },

    #[error("method not found: {name}{descriptor}")]
    MethodNotFound { name: String, descriptor: String },

    #[error("field not found: {name}")]
    FieldNotFound { name: String },

    #[error("invalid class file: {0}")]
    InvalidClassData(String),

    #[error("invalid code in method {method}: {source}")]
    InvalidMethodCode {
        method: String,
        #[source]
        source: Box<ClassReaderError>,
    },
}

pub type Result<T> = std::result::Result<T, ClassReaderError>;

impl From<BufferError> for ClassReaderError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::UnexpectedEndOfData {
                position,
                requested,
                available,
            } => Self::UnexpectedEndOfInput {
                position,
                requested,
                available,
            },
            BufferError::InvalidCesu8String { position } => {
                Self::InvalidClassData(format!("invalid cesu8 string at offset {position}"))
            }
        }
    }
}
