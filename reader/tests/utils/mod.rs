use log::info;

use minijvm_reader::{class_file::ClassFile, class_reader};

pub fn read_class_from_bytes(bytes: &[u8]) -> ClassFile {
    let class = class_reader::read_buffer(bytes).unwrap();
    info!("read class file: {}", class);
    class
}

/// Decodes the code of a method and renders each command as a string
pub fn rendered_commands(class: &ClassFile, name: &str, descriptor: &str) -> Vec<String> {
    class
        .find_method(name, descriptor)
        .unwrap()
        .commands()
        .unwrap()
        .iter()
        .map(|command| command.to_string())
        .collect()
}
