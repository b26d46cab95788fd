pub mod buffer;
pub mod type_conversion;
