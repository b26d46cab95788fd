use std::fmt;

use int_enum::IntEnum;
use thiserror::Error;

/// Tags identifying the kind of each entry in the constant pool, as stored in the class file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntEnum, strum_macros::Display)]
#[repr(u8)]
pub enum ConstantTag {
    Utf8 = 1,
    Integer = 3,
    Float = 4,
    Long = 5,
    Double = 6,
    Class = 7,
    String = 8,
    FieldRef = 9,
    MethodRef = 10,
    InterfaceMethodRef = 11,
    NameAndType = 12,
    MethodHandle = 15,
    MethodType = 16,
    Dynamic = 17,
    InvokeDynamic = 18,
    Module = 19,
    Package = 20,
}

/// Types of a constant in the constant pool.
/// All the `u16` values are (1-based) indexes of other entries of the same pool.
#[derive(Debug, PartialEq)]
pub enum ConstantPoolEntry {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    ClassReference(u16),
    StringReference(u16),
    FieldReference(u16, u16),
    MethodReference(u16, u16),
    InterfaceMethodReference(u16, u16),
    NameAndTypeDescriptor(u16, u16),
    /// Reference kind and referenced member
    MethodHandle(u8, u16),
    MethodType(u16),
    /// Bootstrap method attribute index and name and type
    Dynamic(u16, u16),
    /// Bootstrap method attribute index and name and type
    InvokeDynamic(u16, u16),
    Module(u16),
    Package(u16),
}

impl ConstantPoolEntry {
    pub fn tag(&self) -> ConstantTag {
        match self {
            ConstantPoolEntry::Utf8(_) => ConstantTag::Utf8,
            ConstantPoolEntry::Integer(_) => ConstantTag::Integer,
            ConstantPoolEntry::Float(_) => ConstantTag::Float,
            ConstantPoolEntry::Long(_) => ConstantTag::Long,
            ConstantPoolEntry::Double(_) => ConstantTag::Double,
            ConstantPoolEntry::ClassReference(_) => ConstantTag::Class,
            ConstantPoolEntry::StringReference(_) => ConstantTag::String,
            ConstantPoolEntry::FieldReference(_, _) => ConstantTag::FieldRef,
            ConstantPoolEntry::MethodReference(_, _) => ConstantTag::MethodRef,
            ConstantPoolEntry::InterfaceMethodReference(_, _) => ConstantTag::InterfaceMethodRef,
            ConstantPoolEntry::NameAndTypeDescriptor(_, _) => ConstantTag::NameAndType,
            ConstantPoolEntry::MethodHandle(_, _) => ConstantTag::MethodHandle,
            ConstantPoolEntry::MethodType(_) => ConstantTag::MethodType,
            ConstantPoolEntry::Dynamic(_, _) => ConstantTag::Dynamic,
            ConstantPoolEntry::InvokeDynamic(_, _) => ConstantTag::InvokeDynamic,
            ConstantPoolEntry::Module(_) => ConstantTag::Module,
            ConstantPoolEntry::Package(_) => ConstantTag::Package,
        }
    }

    /// Long and double constants take two slots in the pool
    pub fn slots(&self) -> u16 {
        match self {
            ConstantPoolEntry::Long(_) | ConstantPoolEntry::Double(_) => 2,
            _ => 1,
        }
    }
}

#[derive(Debug)]
enum ConstantPoolPhysicalEntry {
    Entry(ConstantPoolEntry),
    MultiByteEntryTombstone(),
}

/// Implementation of the constant pool of a java class.
/// Note that constants are 1-based in java: index 0 is never valid.
#[derive(Debug, Default)]
pub struct ConstantPool {
    entries: Vec<ConstantPoolPhysicalEntry>,
}

/// Error used to signal that an index of the constant pool does not point to the expected entry.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum InvalidConstantReferenceError {
    #[error("invalid constant pool index: {index}")]
    OutOfRange { index: u16 },

    #[error("constant pool entry #{index} is a {found} entry, expected {expected}")]
    UnexpectedTag {
        index: u16,
        expected: ConstantTag,
        found: ConstantTag,
    },
}

impl InvalidConstantReferenceError {
    fn out_of_range(index: u16) -> Self {
        Self::OutOfRange { index }
    }

    fn unexpected_tag(index: u16, expected: ConstantTag, entry: &ConstantPoolEntry) -> Self {
        Self::UnexpectedTag {
            index,
            expected,
            found: entry.tag(),
        }
    }
}

type Result<T> = std::result::Result<T, InvalidConstantReferenceError>;

/// A name and descriptor pair, resolved from a [ConstantPoolEntry::NameAndTypeDescriptor]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct NameAndType<'a> {
    pub name: &'a str,
    pub descriptor: &'a str,
}

/// A field or method reference, with all the indexes resolved
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MemberReference<'a> {
    pub class_name: &'a str,
    pub name: &'a str,
    pub descriptor: &'a str,
}

impl<'a> fmt::Display for MemberReference<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.class_name, self.name, self.descriptor)
    }
}

impl ConstantPool {
    pub fn new() -> ConstantPool {
        Default::default()
    }

    /// Adds a new entry, in the next free slot.
    pub fn add(&mut self, entry: ConstantPoolEntry) {
        let slots = entry.slots();
        self.entries.push(ConstantPoolPhysicalEntry::Entry(entry));
        for _ in 1..slots {
            self.entries
                .push(ConstantPoolPhysicalEntry::MultiByteEntryTombstone())
        }
    }

    /// Number of slots, including the unusable second halves of long and double entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Accesses an entry given its index. Note that it must be 1-based!
    pub fn get(&self, input_index: u16) -> Result<&ConstantPoolEntry> {
        if input_index == 0 || input_index as usize > self.entries.len() {
            Err(InvalidConstantReferenceError::out_of_range(input_index))
        } else {
            let i = (input_index - 1) as usize;
            match &self.entries[i] {
                ConstantPoolPhysicalEntry::Entry(entry) => Ok(entry),
                ConstantPoolPhysicalEntry::MultiByteEntryTombstone() => {
                    Err(InvalidConstantReferenceError::out_of_range(input_index))
                }
            }
        }
    }

    /// Iterates over all usable entries, with their 1-based index
    pub fn iter(&self) -> impl Iterator<Item = (u16, &ConstantPoolEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(raw_index, entry)| match entry {
                ConstantPoolPhysicalEntry::Entry(entry) => Some(((raw_index + 1) as u16, entry)),
                ConstantPoolPhysicalEntry::MultiByteEntryTombstone() => None,
            })
    }

    pub fn utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            ConstantPoolEntry::Utf8(text) => Ok(text),
            entry => Err(InvalidConstantReferenceError::unexpected_tag(
                index,
                ConstantTag::Utf8,
                entry,
            )),
        }
    }

    /// Resolves a class entry to the class name, e.g. `java/lang/Object`
    pub fn class_name(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            ConstantPoolEntry::ClassReference(name_index) => self.utf8(*name_index),
            entry => Err(InvalidConstantReferenceError::unexpected_tag(
                index,
                ConstantTag::Class,
                entry,
            )),
        }
    }

    /// Resolves a string entry to its value
    pub fn string(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            ConstantPoolEntry::StringReference(value_index) => self.utf8(*value_index),
            entry => Err(InvalidConstantReferenceError::unexpected_tag(
                index,
                ConstantTag::String,
                entry,
            )),
        }
    }

    pub fn name_and_type(&self, index: u16) -> Result<NameAndType> {
        match self.get(index)? {
            ConstantPoolEntry::NameAndTypeDescriptor(name_index, descriptor_index) => {
                Ok(NameAndType {
                    name: self.utf8(*name_index)?,
                    descriptor: self.utf8(*descriptor_index)?,
                })
            }
            entry => Err(InvalidConstantReferenceError::unexpected_tag(
                index,
                ConstantTag::NameAndType,
                entry,
            )),
        }
    }

    pub fn field_reference(&self, index: u16) -> Result<MemberReference> {
        match self.get(index)? {
            ConstantPoolEntry::FieldReference(class_index, name_and_type_index) => {
                self.member_reference(*class_index, *name_and_type_index)
            }
            entry => Err(InvalidConstantReferenceError::unexpected_tag(
                index,
                ConstantTag::FieldRef,
                entry,
            )),
        }
    }

    pub fn method_reference(&self, index: u16) -> Result<MemberReference> {
        match self.get(index)? {
            ConstantPoolEntry::MethodReference(class_index, name_and_type_index) => {
                self.member_reference(*class_index, *name_and_type_index)
            }
            entry => Err(InvalidConstantReferenceError::unexpected_tag(
                index,
                ConstantTag::MethodRef,
                entry,
            )),
        }
    }

    pub fn interface_method_reference(&self, index: u16) -> Result<MemberReference> {
        match self.get(index)? {
            ConstantPoolEntry::InterfaceMethodReference(class_index, name_and_type_index) => {
                self.member_reference(*class_index, *name_and_type_index)
            }
            entry => Err(InvalidConstantReferenceError::unexpected_tag(
                index,
                ConstantTag::InterfaceMethodRef,
                entry,
            )),
        }
    }

    fn member_reference(
        &self,
        class_index: u16,
        name_and_type_index: u16,
    ) -> Result<MemberReference> {
        let name_and_type = self.name_and_type(name_and_type_index)?;
        Ok(MemberReference {
            class_name: self.class_name(class_index)?,
            name: name_and_type.name,
            descriptor: name_and_type.descriptor,
        })
    }

    /// Field, method or interface method reference, as targeted by a method handle
    fn any_member_reference(&self, index: u16) -> Result<MemberReference> {
        match self.get(index)? {
            ConstantPoolEntry::FieldReference(class_index, name_and_type_index)
            | ConstantPoolEntry::MethodReference(class_index, name_and_type_index)
            | ConstantPoolEntry::InterfaceMethodReference(class_index, name_and_type_index) => {
                self.member_reference(*class_index, *name_and_type_index)
            }
            entry => Err(InvalidConstantReferenceError::unexpected_tag(
                index,
                ConstantTag::MethodRef,
                entry,
            )),
        }
    }

    /// Human readable version of an entry, following its references.
    /// Every reference must point to an entry of the kind the class file format requires.
    pub fn text_of(&self, index: u16) -> Result<String> {
        let text = match self.get(index)? {
            ConstantPoolEntry::Utf8(s) => s.clone(),
            ConstantPoolEntry::Integer(n) => n.to_string(),
            ConstantPoolEntry::Float(n) => n.to_string(),
            ConstantPoolEntry::Long(n) => n.to_string(),
            ConstantPoolEntry::Double(n) => n.to_string(),
            ConstantPoolEntry::ClassReference(_) => self.class_name(index)?.to_string(),
            ConstantPoolEntry::StringReference(_) => self.string(index)?.to_string(),
            ConstantPoolEntry::FieldReference(i, j)
            | ConstantPoolEntry::MethodReference(i, j)
            | ConstantPoolEntry::InterfaceMethodReference(i, j) => {
                self.member_reference(*i, *j)?.to_string()
            }
            ConstantPoolEntry::NameAndTypeDescriptor(_, _) => {
                let name_and_type = self.name_and_type(index)?;
                format!("{}:{}", name_and_type.name, name_and_type.descriptor)
            }
            ConstantPoolEntry::MethodHandle(kind, n) => {
                format!("{}:{}", kind, self.any_member_reference(*n)?)
            }
            ConstantPoolEntry::MethodType(n)
            | ConstantPoolEntry::Module(n)
            | ConstantPoolEntry::Package(n) => self.utf8(*n)?.to_string(),
            ConstantPoolEntry::Dynamic(bootstrap, n)
            | ConstantPoolEntry::InvokeDynamic(bootstrap, n) => {
                let name_and_type = self.name_and_type(*n)?;
                format!(
                    "#{}:{}:{}",
                    bootstrap, name_and_type.name, name_and_type.descriptor
                )
            }
        };
        Ok(text)
    }

    /// Operands of an entry, followed by their resolved value.
    /// Unresolvable entries are rendered as `<invalid>` rather than failing.
    fn fmt_entry(&self, index: u16, entry: &ConstantPoolEntry) -> String {
        let operands = match entry {
            ConstantPoolEntry::Utf8(s) => return s.clone(),
            ConstantPoolEntry::Integer(n) => return n.to_string(),
            ConstantPoolEntry::Float(n) => return format!("{n}f"),
            ConstantPoolEntry::Long(n) => return format!("{n}l"),
            ConstantPoolEntry::Double(n) => return format!("{n}d"),
            ConstantPoolEntry::ClassReference(n)
            | ConstantPoolEntry::StringReference(n)
            | ConstantPoolEntry::MethodType(n)
            | ConstantPoolEntry::Module(n)
            | ConstantPoolEntry::Package(n) => format!("#{n}"),
            ConstantPoolEntry::FieldReference(i, j)
            | ConstantPoolEntry::MethodReference(i, j)
            | ConstantPoolEntry::InterfaceMethodReference(i, j) => format!("#{i}.#{j}"),
            ConstantPoolEntry::NameAndTypeDescriptor(i, j) => format!("#{i}:#{j}"),
            ConstantPoolEntry::MethodHandle(kind, n) => format!("{kind}:#{n}"),
            ConstantPoolEntry::Dynamic(bootstrap, n)
            | ConstantPoolEntry::InvokeDynamic(bootstrap, n) => format!("#{bootstrap}:#{n}"),
        };
        let resolved = self
            .text_of(index)
            .unwrap_or_else(|_| "<invalid>".to_string());
        format!("{operands} // {resolved}")
    }
}

impl fmt::Display for ConstantPool {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Constant pool: (size: {})", self.entries.len())?;
        for (index, entry) in self.iter() {
            writeln!(
                f,
                "  {:>5} = {:<18} {}",
                format!("#{index}"),
                entry.tag(),
                self.fmt_entry(index, entry)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::constant_pool::{
        ConstantPool, ConstantPoolEntry, ConstantTag, InvalidConstantReferenceError,
        MemberReference, NameAndType,
    };

    #[test]
    fn constant_pool_works() {
        let mut cp = ConstantPool::new();
        cp.add(ConstantPoolEntry::Utf8("hey".to_string()));
        cp.add(ConstantPoolEntry::Integer(1));
        cp.add(ConstantPoolEntry::Float(2.1));
        cp.add(ConstantPoolEntry::Long(123));
        cp.add(ConstantPoolEntry::Double(3.56));
        cp.add(ConstantPoolEntry::ClassReference(1));
        cp.add(ConstantPoolEntry::StringReference(1));
        cp.add(ConstantPoolEntry::Utf8("joe".to_string()));
        cp.add(ConstantPoolEntry::FieldReference(1, 10));
        cp.add(ConstantPoolEntry::MethodReference(1, 10));
        cp.add(ConstantPoolEntry::InterfaceMethodReference(1, 10));
        cp.add(ConstantPoolEntry::NameAndTypeDescriptor(1, 10));

        assert_eq!(14, cp.len());
        assert_eq!(
            ConstantPoolEntry::Utf8("hey".to_string()),
            *cp.get(1).unwrap()
        );
        assert_eq!(ConstantPoolEntry::Integer(1), *cp.get(2).unwrap());
        assert_eq!(ConstantPoolEntry::Float(2.1), *cp.get(3).unwrap());
        assert_eq!(ConstantPoolEntry::Long(123i64), *cp.get(4).unwrap());
        assert_eq!(
            Err(InvalidConstantReferenceError::OutOfRange { index: 5 }),
            cp.get(5)
        );
        assert_eq!(ConstantPoolEntry::Double(3.56), *cp.get(6).unwrap());
        assert_eq!(
            Err(InvalidConstantReferenceError::OutOfRange { index: 7 }),
            cp.get(7)
        );
        assert_eq!(ConstantPoolEntry::ClassReference(1), *cp.get(8).unwrap());
        assert_eq!(ConstantPoolEntry::StringReference(1), *cp.get(9).unwrap());
        assert_eq!(
            ConstantPoolEntry::NameAndTypeDescriptor(1, 10),
            *cp.get(14).unwrap()
        );

        assert_eq!("hey", cp.text_of(1).unwrap());
        assert_eq!("1", cp.text_of(2).unwrap());
        assert_eq!("2.1", cp.text_of(3).unwrap());
        assert_eq!("123", cp.text_of(4).unwrap());
        assert_eq!("hey", cp.text_of(8).unwrap());
        assert_eq!("hey", cp.text_of(9).unwrap());
        assert_eq!(
            Err(InvalidConstantReferenceError::UnexpectedTag {
                index: 10,
                expected: ConstantTag::NameAndType,
                found: ConstantTag::Utf8,
            }),
            cp.text_of(11)
        );
        assert_eq!("hey:joe", cp.text_of(14).unwrap());
    }

    #[test]
    fn index_zero_and_past_the_end_are_invalid() {
        let mut cp = ConstantPool::new();
        cp.add(ConstantPoolEntry::Utf8("only".to_string()));

        assert_eq!(
            Err(InvalidConstantReferenceError::OutOfRange { index: 0 }),
            cp.get(0)
        );
        assert_eq!(
            Err(InvalidConstantReferenceError::OutOfRange { index: 2 }),
            cp.get(2)
        );
    }

    fn method_pool() -> ConstantPool {
        let mut cp = ConstantPool::new();
        cp.add(ConstantPoolEntry::MethodReference(2, 4)); // 1
        cp.add(ConstantPoolEntry::ClassReference(3)); // 2
        cp.add(ConstantPoolEntry::Utf8("java/lang/Object".to_string())); // 3
        cp.add(ConstantPoolEntry::NameAndTypeDescriptor(5, 6)); // 4
        cp.add(ConstantPoolEntry::Utf8("<init>".to_string())); // 5
        cp.add(ConstantPoolEntry::Utf8("()V".to_string())); // 6
        cp.add(ConstantPoolEntry::StringReference(5)); // 7
        cp
    }

    #[test]
    fn typed_projections_follow_references() {
        let cp = method_pool();

        assert_eq!("java/lang/Object", cp.class_name(2).unwrap());
        assert_eq!("<init>", cp.string(7).unwrap());
        assert_eq!(
            NameAndType {
                name: "<init>",
                descriptor: "()V"
            },
            cp.name_and_type(4).unwrap()
        );
        let method = cp.method_reference(1).unwrap();
        assert_eq!(
            MemberReference {
                class_name: "java/lang/Object",
                name: "<init>",
                descriptor: "()V"
            },
            method
        );
        assert_eq!("java/lang/Object.<init>:()V", method.to_string());
    }

    #[test]
    fn typed_projections_reject_wrong_tags() {
        let cp = method_pool();

        assert_eq!(
            Err(InvalidConstantReferenceError::UnexpectedTag {
                index: 2,
                expected: ConstantTag::Utf8,
                found: ConstantTag::Class,
            }),
            cp.utf8(2)
        );
        assert_eq!(
            Err(InvalidConstantReferenceError::UnexpectedTag {
                index: 3,
                expected: ConstantTag::Class,
                found: ConstantTag::Utf8,
            }),
            cp.class_name(3)
        );
        assert_eq!(
            Err(InvalidConstantReferenceError::UnexpectedTag {
                index: 1,
                expected: ConstantTag::FieldRef,
                found: ConstantTag::MethodRef,
            }),
            cp.field_reference(1)
        );
        assert_eq!(
            Err(InvalidConstantReferenceError::UnexpectedTag {
                index: 1,
                expected: ConstantTag::InterfaceMethodRef,
                found: ConstantTag::MethodRef,
            }),
            cp.interface_method_reference(1)
        );
    }

    #[test]
    fn text_follows_references_by_kind() {
        let cp = method_pool();

        assert_eq!("java/lang/Object.<init>:()V", cp.text_of(1).unwrap());
        assert_eq!("java/lang/Object", cp.text_of(2).unwrap());
        assert_eq!("<init>:()V", cp.text_of(4).unwrap());
        assert_eq!("<init>", cp.text_of(7).unwrap());
    }

    #[test]
    fn self_referencing_entries_are_rejected() {
        let mut cp = ConstantPool::new();
        cp.add(ConstantPoolEntry::ClassReference(1));
        cp.add(ConstantPoolEntry::StringReference(2));
        cp.add(ConstantPoolEntry::NameAndTypeDescriptor(3, 3));

        assert_eq!(
            Err(InvalidConstantReferenceError::UnexpectedTag {
                index: 1,
                expected: ConstantTag::Utf8,
                found: ConstantTag::Class,
            }),
            cp.text_of(1)
        );
        assert_eq!(
            Err(InvalidConstantReferenceError::UnexpectedTag {
                index: 2,
                expected: ConstantTag::Utf8,
                found: ConstantTag::String,
            }),
            cp.text_of(2)
        );
        assert!(cp.text_of(3).is_err());
    }

    #[test]
    fn display_marks_unresolvable_entries() {
        let mut cp = ConstantPool::new();
        cp.add(ConstantPoolEntry::ClassReference(1));
        cp.add(ConstantPoolEntry::StringReference(9));
        let rendered = cp.to_string();

        assert!(rendered.starts_with("Constant pool: (size: 2)\n"));
        assert!(rendered.contains("#1 // <invalid>"));
        assert!(rendered.contains("#9 // <invalid>"));

        let rendered = method_pool().to_string();
        assert!(rendered.contains("#2.#4 // java/lang/Object.<init>:()V"));
        assert!(rendered.contains("#5:#6 // <init>:()V"));
    }

    #[test]
    fn iteration_skips_tombstones() {
        let mut cp = ConstantPool::new();
        cp.add(ConstantPoolEntry::Long(1));
        cp.add(ConstantPoolEntry::Utf8("x".to_string()));

        let indexes: Vec<u16> = cp.iter().map(|(index, _)| index).collect();
        assert_eq!(vec![1, 3], indexes);
    }

    #[test]
    fn tags_round_trip_through_bytes() {
        assert!(matches!(
            ConstantTag::try_from(10u8),
            Ok(ConstantTag::MethodRef)
        ));
        assert_eq!(12u8, u8::from(ConstantTag::NameAndType));
        assert!(ConstantTag::try_from(2u8).is_err());
    }
}
