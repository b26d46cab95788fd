use log::{debug, trace, warn};

use minijvm_utils::{buffer::Buffer, type_conversion::ToUsizeSafe};

use crate::{
    class_reader_error::{ClassReaderError, Result},
    constant_pool::{ConstantPool, ConstantPoolEntry, ConstantTag},
};

/// Reads the constant pool, starting from its 16-bit count.
/// The count includes the unused slot 0, so a count of `N` fills the slots `1..N`.
pub fn read_constant_pool(buffer: &mut Buffer) -> Result<ConstantPool> {
    let constants_count = buffer.read_u16()?;
    debug!(
        "reading {} constant pool slots",
        constants_count.saturating_sub(1)
    );

    let mut constants = ConstantPool::new();
    let mut index: u32 = 1;
    while index < u32::from(constants_count) {
        // Always fits: index is below a u16 count here
        let entry = read_constant(buffer, index as u16)?;
        trace!("constant #{index}: {entry:?}");
        index += u32::from(entry.slots());
        constants.add(entry);
    }

    if constants_count > 0 && index != u32::from(constants_count) {
        warn!("last constant of the pool overflows the declared count {constants_count}");
        return Err(ClassReaderError::InvalidClassData(format!(
            "constant pool declares {constants_count} slots but its entries take {index}"
        )));
    }
    Ok(constants)
}

fn read_constant(buffer: &mut Buffer, index: u16) -> Result<ConstantPoolEntry> {
    let tag_byte = buffer.read_u8()?;
    let tag = ConstantTag::try_from(tag_byte).map_err(|_| {
        warn!("invalid entry in constant pool at index {index} tag {tag_byte}");
        ClassReaderError::UnsupportedConstantTag {
            tag: tag_byte,
            index,
        }
    })?;

    let entry = match tag {
        ConstantTag::Utf8 => {
            let len = buffer.read_u16()?;
            ConstantPoolEntry::Utf8(buffer.read_utf8(len.into_usize_safe())?)
        }
        ConstantTag::Integer => ConstantPoolEntry::Integer(buffer.read_i32()?),
        ConstantTag::Float => ConstantPoolEntry::Float(buffer.read_f32()?),
        ConstantTag::Long => ConstantPoolEntry::Long(buffer.read_i64()?),
        ConstantTag::Double => ConstantPoolEntry::Double(buffer.read_f64()?),
        ConstantTag::Class => ConstantPoolEntry::ClassReference(buffer.read_u16()?),
        ConstantTag::String => ConstantPoolEntry::StringReference(buffer.read_u16()?),
        ConstantTag::FieldRef => {
            let class_reference = buffer.read_u16()?;
            let name_and_type = buffer.read_u16()?;
            ConstantPoolEntry::FieldReference(class_reference, name_and_type)
        }
        ConstantTag::MethodRef => {
            let class_reference = buffer.read_u16()?;
            let name_and_type = buffer.read_u16()?;
            ConstantPoolEntry::MethodReference(class_reference, name_and_type)
        }
        ConstantTag::InterfaceMethodRef => {
            let class_reference = buffer.read_u16()?;
            let name_and_type = buffer.read_u16()?;
            ConstantPoolEntry::InterfaceMethodReference(class_reference, name_and_type)
        }
        ConstantTag::NameAndType => {
            let name = buffer.read_u16()?;
            let type_descriptor = buffer.read_u16()?;
            ConstantPoolEntry::NameAndTypeDescriptor(name, type_descriptor)
        }
        ConstantTag::MethodHandle => {
            let reference_kind = buffer.read_u8()?;
            let reference = buffer.read_u16()?;
            ConstantPoolEntry::MethodHandle(reference_kind, reference)
        }
        ConstantTag::MethodType => ConstantPoolEntry::MethodType(buffer.read_u16()?),
        ConstantTag::Dynamic => {
            let bootstrap_method = buffer.read_u16()?;
            let name_and_type = buffer.read_u16()?;
            ConstantPoolEntry::Dynamic(bootstrap_method, name_and_type)
        }
        ConstantTag::InvokeDynamic => {
            let bootstrap_method = buffer.read_u16()?;
            let name_and_type = buffer.read_u16()?;
            ConstantPoolEntry::InvokeDynamic(bootstrap_method, name_and_type)
        }
        ConstantTag::Module => ConstantPoolEntry::Module(buffer.read_u16()?),
        ConstantTag::Package => ConstantPoolEntry::Package(buffer.read_u16()?),
    };
    Ok(entry)
}
