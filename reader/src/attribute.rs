use std::fmt;
use std::fmt::Formatter;

/// An attribute kept in its raw form: its (resolved) name and its undecoded content.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Attribute {
    pub name_index: u16,
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Attribute {
    /// Content of attributes made of a single constant pool index, such as `SourceFile`
    pub fn as_constant_index(&self) -> Option<u16> {
        match self.bytes.as_slice() {
            [high, low] => Some(u16::from_be_bytes([*high, *low])),
            _ => None,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} (data = {} bytes)", self.name, self.bytes.len())
    }
}

pub(crate) fn find_attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attributes.iter().find(|attribute| attribute.name == name)
}
