use std::fmt;

use result::prelude::*;

use crate::{
    attribute::{find_attribute, Attribute},
    class_access_flags::ClassAccessFlags,
    class_file_field::ClassFileField,
    class_file_method::ClassFileMethod,
    class_file_version::ClassFileVersion,
    class_reader_error::{ClassReaderError, Result},
    constant_pool::ConstantPool,
};

/// Constant pool indexes of the class itself and of its superclass
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct ClassIndex {
    pub this_class: u16,
    /// Zero only for `java/lang/Object`
    pub super_class: u16,
}

/// Represents the content of a .class file.
/// References to the constant pool are kept as indexes, and resolved when accessed.
#[derive(Debug, Default)]
pub struct ClassFile {
    pub(crate) version: ClassFileVersion,
    pub(crate) constants: ConstantPool,
    pub(crate) access_flags: u16,
    pub(crate) class_index: ClassIndex,
    pub(crate) interfaces: Vec<u16>,
    pub(crate) fields: Vec<ClassFileField>,
    pub(crate) methods: Vec<ClassFileMethod>,
    pub(crate) attributes: Vec<Attribute>,
}

impl ClassFile {
    pub fn version(&self) -> ClassFileVersion {
        self.version
    }

    pub fn constants(&self) -> &ConstantPool {
        &self.constants
    }

    pub fn access_flags(&self) -> u16 {
        self.access_flags
    }

    pub fn flags(&self) -> ClassAccessFlags {
        ClassAccessFlags::from_bits_truncate(self.access_flags)
    }

    pub fn class_index(&self) -> ClassIndex {
        self.class_index
    }

    pub fn interfaces(&self) -> &[u16] {
        &self.interfaces
    }

    pub fn fields(&self) -> &[ClassFileField] {
        &self.fields
    }

    pub fn methods(&self) -> &[ClassFileMethod] {
        &self.methods
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Name of the class, e.g. `java/lang/String`
    pub fn class_name(&self) -> Result<&str> {
        Ok(self.constants.class_name(self.class_index.this_class)?)
    }

    pub fn superclass_name(&self) -> Result<Option<&str>> {
        match self.class_index.super_class {
            0 => Ok(None),
            index => Ok(Some(self.constants.class_name(index)?)),
        }
    }

    pub fn interface_names(&self) -> Result<Vec<&str>> {
        self.interfaces
            .iter()
            .map(|index| -> Result<&str> { Ok(self.constants.class_name(*index)?) })
            .collect()
    }

    /// Value of the `SourceFile` attribute, if present
    pub fn source_file(&self) -> Result<Option<&str>> {
        find_attribute(&self.attributes, "SourceFile")
            .map(|attribute| -> Result<&str> {
                let index = attribute.as_constant_index().ok_or_else(|| {
                    ClassReaderError::InvalidClassData("invalid SourceFile attribute".to_string())
                })?;
                Ok(self.constants.utf8(index)?)
            })
            .invert()
    }

    pub fn find_method(&self, name: &str, descriptor: &str) -> Result<&ClassFileMethod> {
        self.methods
            .iter()
            .find(|method| method.name == name && method.descriptor == descriptor)
            .ok_or_else(|| ClassReaderError::MethodNotFound {
                name: name.to_string(),
                descriptor: descriptor.to_string(),
            })
    }

    /// The `public static void main(String[])` entry point
    pub fn main_method(&self) -> Result<&ClassFileMethod> {
        self.find_method("main", "([Ljava/lang/String;)V")
    }

    /// Unresolvable indexes are kept visible, e.g. `#7 <invalid>`
    fn class_name_or_index(&self, index: u16) -> String {
        match self.constants.class_name(index) {
            Ok(name) => name.to_string(),
            Err(_) => format!("#{index} <invalid>"),
        }
    }

    pub fn find_field(&self, name: &str) -> Result<&ClassFileField> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .ok_or_else(|| ClassReaderError::FieldNotFound {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for ClassFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let class_name = self.class_name_or_index(self.class_index.this_class);
        write!(f, "Class {class_name} ")?;
        if self.class_index.super_class != 0 {
            let superclass = self.class_name_or_index(self.class_index.super_class);
            write!(f, "(extends {superclass}) ")?;
        }
        writeln!(f, "version: {}", self.version)?;
        writeln!(f, "flags: {:?}", self.flags())?;
        for index in self.interfaces.iter() {
            writeln!(f, "implements {}", self.class_name_or_index(*index))?;
        }
        writeln!(f, "fields:")?;
        for field in self.fields.iter() {
            writeln!(f, "  - {field}")?;
        }
        writeln!(f, "methods:")?;
        for method in self.methods.iter() {
            writeln!(f, "  - {method}")?;
        }
        Ok(())
    }
}
