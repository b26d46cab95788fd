use log::{debug, warn};
use result::prelude::*;

use minijvm_utils::{
    buffer::{Buffer, BufferError},
    type_conversion::ToUsizeSafe,
};

use crate::{
    attribute::{find_attribute, Attribute},
    bytecode_decoder::MAX_CODE_LENGTH,
    class_file::{ClassFile, ClassIndex},
    class_file_field::ClassFileField,
    class_file_method::{ClassFileMethod, ClassFileMethodCode},
    class_file_version::ClassFileVersion,
    class_reader_error::{ClassReaderError, ClassReaderError::InvalidClassData, Result},
    constant_pool_reader::read_constant_pool,
    exception_table::{ExceptionTable, ExceptionTableEntry},
    line_number_table::{LineNumber, LineNumberTable, LineNumberTableEntry},
    method_flags::MethodFlags,
    program_counter::ProgramCounter,
};

const MAGIC_NUMBER: u32 = 0xCAFEBABE;

struct ClassFileReader<'a> {
    buffer: Buffer<'a>,
    class_file: ClassFile,
}

impl<'a> ClassFileReader<'a> {
    fn new(data: &[u8]) -> ClassFileReader {
        ClassFileReader {
            buffer: Buffer::new(data),
            class_file: Default::default(),
        }
    }

    fn read(mut self) -> Result<ClassFile> {
        self.check_magic_number()?;
        self.read_version()?;
        self.class_file.constants = read_constant_pool(&mut self.buffer)?;
        self.class_file.access_flags = self.buffer.read_u16()?;
        self.read_class_index()?;
        self.read_interfaces()?;
        self.read_fields()?;
        self.read_methods()?;
        self.class_file.attributes = self.read_raw_attributes()?;

        if self.buffer.has_more_data() {
            warn!(
                "ignoring {} bytes after the end of the class",
                self.buffer.remaining()
            );
        }
        Ok(self.class_file)
    }

    fn check_magic_number(&mut self) -> Result<()> {
        match self.buffer.read_u32()? {
            MAGIC_NUMBER => Ok(()),
            value => {
                warn!("invalid magic number {value:#010x}");
                Err(ClassReaderError::NotAClassFile(value))
            }
        }
    }

    fn read_version(&mut self) -> Result<()> {
        let minor_version = self.buffer.read_u16()?;
        let major_version = self.buffer.read_u16()?;
        self.class_file.version = ClassFileVersion::new(major_version, minor_version);
        debug!("class file version {}", self.class_file.version);
        Ok(())
    }

    fn read_class_index(&mut self) -> Result<()> {
        let this_class = self.buffer.read_u16()?;
        let super_class = self.buffer.read_u16()?;
        self.class_file.class_index = ClassIndex {
            this_class,
            super_class,
        };
        Ok(())
    }

    fn read_interfaces(&mut self) -> Result<()> {
        let interfaces_count = self.buffer.read_u16()?;
        debug!("reading {interfaces_count} interfaces");
        self.class_file.interfaces = (0..interfaces_count)
            .map(|_| self.buffer.read_u16())
            .collect::<std::result::Result<Vec<u16>, _>>()?;
        Ok(())
    }

    fn read_fields(&mut self) -> Result<()> {
        let fields_count = self.buffer.read_u16()?;
        debug!("reading {fields_count} fields");
        self.class_file.fields = (0..fields_count)
            .map(|_| self.read_field())
            .collect::<Result<Vec<ClassFileField>>>()?;
        Ok(())
    }

    fn read_field(&mut self) -> Result<ClassFileField> {
        let access_flags = self.buffer.read_u16()?;
        let name_index = self.buffer.read_u16()?;
        let name = self.read_utf8_reference(name_index)?;
        let descriptor_index = self.buffer.read_u16()?;
        let descriptor = self.read_utf8_reference(descriptor_index)?;
        let attributes = self.read_raw_attributes()?;

        Ok(ClassFileField {
            access_flags,
            name_index,
            descriptor_index,
            name,
            descriptor,
            attributes,
        })
    }

    fn read_methods(&mut self) -> Result<()> {
        let methods_count = self.buffer.read_u16()?;
        debug!("reading {methods_count} methods");
        self.class_file.methods = (0..methods_count)
            .map(|_| self.read_method())
            .collect::<Result<Vec<ClassFileMethod>>>()?;
        Ok(())
    }

    fn read_method(&mut self) -> Result<ClassFileMethod> {
        let access_flags = self.buffer.read_u16()?;
        let name_index = self.buffer.read_u16()?;
        let name = self.read_utf8_reference(name_index)?;
        let descriptor_index = self.buffer.read_u16()?;
        let descriptor = self.read_utf8_reference(descriptor_index)?;

        let mut attributes = Vec::new();
        let mut code = None;
        let attributes_count = self.buffer.read_u16()?;
        for _ in 0..attributes_count {
            let name_index = self.buffer.read_u16()?;
            let attribute_name = self.read_utf8_reference(name_index)?;
            let length = self.buffer.read_u32()?.into_usize_safe();
            if attribute_name == "Code" {
                code = Some(self.read_code(length)?);
            } else {
                let attribute =
                    self.read_raw_attribute_content(name_index, attribute_name, length)?;
                attributes.push(attribute);
            }
        }

        let flags = MethodFlags::from_bits_truncate(access_flags);
        if code.is_none() && !flags.intersects(MethodFlags::ABSTRACT | MethodFlags::NATIVE) {
            warn!("method {name}{descriptor} is neither abstract nor native, but has no code");
        }

        Ok(ClassFileMethod {
            access_flags,
            name_index,
            descriptor_index,
            name,
            descriptor,
            attributes,
            code,
        })
    }

    fn read_code(&mut self, declared_length: usize) -> Result<ClassFileMethodCode> {
        let start = self.buffer.position();
        let max_stack = self.buffer.read_u16()?;
        let max_locals = self.buffer.read_u16()?;

        let code_length = self.buffer.read_u32()?.into_usize_safe();
        if code_length == 0 || code_length > MAX_CODE_LENGTH {
            warn!("invalid code length {code_length} at offset {start}");
            return Err(InvalidClassData(format!(
                "invalid code length: {code_length}"
            )));
        }
        let code = Vec::from(self.buffer.read_bytes(code_length)?);

        let exception_table = self.read_exception_table()?;
        let attributes = self.read_raw_attributes()?;
        let line_number_table = find_attribute(&attributes, "LineNumberTable")
            .map(parse_line_number_table)
            .invert()?;

        let consumed = self.buffer.position() - start;
        if consumed != declared_length {
            warn!("Code attribute declares {declared_length} bytes but contains {consumed}");
            return Err(InvalidClassData(format!(
                "Code attribute length mismatch: declared {declared_length}, actual {consumed}"
            )));
        }

        Ok(ClassFileMethodCode {
            max_stack,
            max_locals,
            code,
            exception_table,
            attributes,
            line_number_table,
        })
    }

    fn read_exception_table(&mut self) -> Result<ExceptionTable> {
        let entries_count = self.buffer.read_u16()?;
        let entries = (0..entries_count)
            .map(|_| -> Result<ExceptionTableEntry> {
                let start_pc = self.buffer.read_u16()?;
                let end_pc = self.buffer.read_u16()?;
                let handler_pc = self.buffer.read_u16()?;
                let catch_type = self.buffer.read_u16()?;
                Ok(ExceptionTableEntry {
                    range: ProgramCounter(start_pc)..ProgramCounter(end_pc),
                    handler_pc: ProgramCounter(handler_pc),
                    catch_type: if catch_type == 0 {
                        None
                    } else {
                        Some(catch_type)
                    },
                })
            })
            .collect::<Result<Vec<ExceptionTableEntry>>>()?;
        Ok(ExceptionTable::new(entries))
    }

    fn read_utf8_reference(&self, index: u16) -> Result<String> {
        Ok(self.class_file.constants.utf8(index)?.to_string())
    }

    fn read_raw_attributes(&mut self) -> Result<Vec<Attribute>> {
        let attributes_count = self.buffer.read_u16()?;
        (0..attributes_count)
            .map(|_| {
                let name_index = self.buffer.read_u16()?;
                let name = self.read_utf8_reference(name_index)?;
                let length = self.buffer.read_u32()?.into_usize_safe();
                self.read_raw_attribute_content(name_index, name, length)
            })
            .collect::<Result<Vec<Attribute>>>()
    }

    fn read_raw_attribute_content(
        &mut self,
        name_index: u16,
        name: String,
        length: usize,
    ) -> Result<Attribute> {
        let bytes = self.buffer.read_bytes(length)?;
        Ok(Attribute {
            name_index,
            name,
            bytes: Vec::from(bytes),
        })
    }
}

fn parse_line_number_table(attribute: &Attribute) -> Result<LineNumberTable> {
    let invalid =
        |_: BufferError| InvalidClassData("invalid LineNumberTable attribute".to_string());

    let mut buffer = Buffer::new(&attribute.bytes);
    let entries_count = buffer.read_u16().map_err(invalid)?;
    let entries = (0..entries_count)
        .map(|_| -> Result<LineNumberTableEntry> {
            let program_counter = buffer.read_u16().map_err(invalid)?;
            let line_number = buffer.read_u16().map_err(invalid)?;
            Ok(LineNumberTableEntry::new(
                ProgramCounter(program_counter),
                LineNumber(line_number),
            ))
        })
        .collect::<Result<Vec<LineNumberTableEntry>>>()?;
    if buffer.has_more_data() {
        return Err(InvalidClassData(
            "invalid LineNumberTable attribute".to_string(),
        ));
    }
    Ok(LineNumberTable::new(entries))
}

/// Parses the content of a class file, fully and eagerly, except for the bytecode of its methods.
pub fn read_buffer(buf: &[u8]) -> Result<ClassFile> {
    ClassFileReader::new(buf).read()
}
