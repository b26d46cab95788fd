use std::{fmt, fmt::Formatter};

use itertools::Itertools;

use crate::{
    attribute::Attribute,
    bytecode_command::BytecodeCommand,
    bytecode_decoder,
    class_reader_error::{ClassReaderError, Result},
    exception_table::ExceptionTable,
    line_number_table::LineNumberTable,
    method_flags::MethodFlags,
};

#[derive(Debug, PartialEq)]
pub struct ClassFileMethod {
    /// Raw access flags, as found in the class file
    pub access_flags: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub name: String,
    pub descriptor: String,
    /// Attributes other than `Code`
    pub attributes: Vec<Attribute>,
    /// Missing for abstract and native methods
    pub code: Option<ClassFileMethodCode>,
}

impl fmt::Display for ClassFileMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}{}", self.flags(), self.name, self.descriptor)
    }
}

impl ClassFileMethod {
    pub fn flags(&self) -> MethodFlags {
        MethodFlags::from_bits_truncate(self.access_flags)
    }

    pub fn is_static(&self) -> bool {
        self.flags().contains(MethodFlags::STATIC)
    }

    pub fn is_native(&self) -> bool {
        self.flags().contains(MethodFlags::NATIVE)
    }

    pub fn is_abstract(&self) -> bool {
        self.flags().contains(MethodFlags::ABSTRACT)
    }

    /// Name and descriptor, which identify a method within its class
    pub fn signature(&self) -> String {
        format!("{}{}", self.name, self.descriptor)
    }

    /// Decodes the bytecode of the method. Methods without code have no commands.
    pub fn commands(&self) -> Result<Vec<BytecodeCommand>> {
        match &self.code {
            None => Ok(Vec::new()),
            Some(code) => code
                .commands()
                .map_err(|err| ClassReaderError::InvalidMethodCode {
                    method: self.signature(),
                    source: Box::new(err),
                }),
        }
    }
}

/// Content of the `Code` attribute of a method
#[derive(Debug, Default, PartialEq)]
pub struct ClassFileMethodCode {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    pub exception_table: ExceptionTable,
    pub attributes: Vec<Attribute>,
    pub line_number_table: Option<LineNumberTable>,
}

impl ClassFileMethodCode {
    /// The code array as a lowercase hex string, e.g. `2ab70001b1`
    pub fn code_hex(&self) -> String {
        self.code.iter().map(|byte| format!("{byte:02x}")).join("")
    }

    pub fn commands(&self) -> Result<Vec<BytecodeCommand>> {
        bytecode_decoder::decode(&self.code)
    }
}

impl fmt::Display for ClassFileMethodCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max_stack = {}, max_locals = {}, code = {}",
            self.max_stack,
            self.max_locals,
            self.code_hex()
        )
    }
}
