use std::{fmt, fmt::Formatter};

use result::prelude::*;

use crate::{
    attribute::{find_attribute, Attribute},
    class_reader_error::{ClassReaderError, Result},
    constant_pool::{ConstantPool, ConstantPoolEntry},
    field_flags::FieldFlags,
};

/// Models a field in a class
#[derive(Debug, PartialEq)]
pub struct ClassFileField {
    /// Raw access flags, as found in the class file
    pub access_flags: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub name: String,
    pub descriptor: String,
    pub attributes: Vec<Attribute>,
}

impl ClassFileField {
    pub fn flags(&self) -> FieldFlags {
        FieldFlags::from_bits_truncate(self.access_flags)
    }

    pub fn is_static(&self) -> bool {
        self.flags().contains(FieldFlags::STATIC)
    }

    /// Fields which model a constant (final) will have an attribute specifying the value
    pub fn constant_value(&self, constants: &ConstantPool) -> Result<Option<FieldConstantValue>> {
        find_attribute(&self.attributes, "ConstantValue")
            .map(|attribute| -> Result<FieldConstantValue> {
                let index = attribute.as_constant_index().ok_or_else(|| {
                    ClassReaderError::InvalidClassData(format!(
                        "invalid ConstantValue attribute of field {}",
                        self.name
                    ))
                })?;
                match constants.get(index)? {
                    ConstantPoolEntry::Integer(v) => Ok(FieldConstantValue::Int(*v)),
                    ConstantPoolEntry::Float(v) => Ok(FieldConstantValue::Float(*v)),
                    ConstantPoolEntry::Long(v) => Ok(FieldConstantValue::Long(*v)),
                    ConstantPoolEntry::Double(v) => Ok(FieldConstantValue::Double(*v)),
                    ConstantPoolEntry::StringReference(_) => {
                        Ok(FieldConstantValue::String(constants.string(index)?.to_string()))
                    }
                    entry => Err(ClassReaderError::InvalidClassData(format!(
                        "invalid type for ConstantValue: {}",
                        entry.tag()
                    ))),
                }
            })
            .invert()
    }
}

impl fmt::Display for ClassFileField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.descriptor)
    }
}

/// Possible constant values of a field
#[derive(Debug, PartialEq, strum_macros::Display)]
pub enum FieldConstantValue {
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    String(String),
}
