#[macro_use]
extern crate bitflags;

pub mod attribute;
pub mod bytecode_command;
pub mod bytecode_decoder;
pub mod class_access_flags;
pub mod class_file;
pub mod class_file_field;
pub mod class_file_method;
pub mod class_file_version;
pub mod class_reader;
pub mod class_reader_error;
pub mod constant_pool;
pub mod constant_pool_reader;
pub mod exception_table;
pub mod field_flags;
pub mod line_number_table;
pub mod method_flags;
pub mod opcodes;
pub mod program_counter;
