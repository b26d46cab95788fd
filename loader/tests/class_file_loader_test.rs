extern crate minijvm_loader;

use minijvm_loader::{
    class_file_loader::ClassFileLoader, class_path::ClassPath, loader_error::LoaderError,
};
use minijvm_reader::class_reader_error::ClassReaderError;

fn resources() -> String {
    format!("{}/tests/resources", env!("CARGO_MANIFEST_DIR"))
}

#[test_log::test]
fn can_load_and_parse_class() {
    let loader = ClassFileLoader::new(ClassPath::parse(&resources()).unwrap());
    let class = loader.load_class("com.coderising.jvm.test.EmployeeV1").unwrap();

    assert_eq!("com/coderising/jvm/test/EmployeeV1", class.class_name().unwrap());
    let say_hello = class.find_method("sayHello", "()V").unwrap();
    assert_eq!(
        "b200041205b60006b1",
        say_hello.code.as_ref().unwrap().code_hex()
    );
}

fn shadowing_root() -> String {
    format!("{}/tests/shadowing", env!("CARGO_MANIFEST_DIR"))
}

fn loaded_class_name(class_path: &str) -> String {
    let loader = ClassFileLoader::new(ClassPath::parse(class_path).unwrap());
    assert_eq!(class_path, loader.class_path().to_string());
    let class = loader
        .load_class("com.coderising.jvm.test.EmployeeV1")
        .unwrap();
    class.class_name().unwrap().to_string()
}

#[test]
fn first_matching_root_wins() {
    // Both roots contain com/coderising/jvm/test/EmployeeV1.class, with different content
    assert_eq!(
        "minijvm/Instructions",
        loaded_class_name(&format!("{}:{}", shadowing_root(), resources()))
    );
    assert_eq!(
        "com/coderising/jvm/test/EmployeeV1",
        loaded_class_name(&format!("{}:{}", resources(), shadowing_root()))
    );
}

#[test]
fn roots_without_the_class_are_skipped() {
    let class_path = format!("{}/src:{}", env!("CARGO_MANIFEST_DIR"), resources());
    assert_eq!(
        "com/coderising/jvm/test/EmployeeV1",
        loaded_class_name(&class_path)
    );
}

#[test]
fn files_that_are_not_classes_fail_to_parse() {
    let loader = ClassFileLoader::new(ClassPath::parse(&resources()).unwrap());
    assert!(matches!(
        loader.load_class("broken.NotAClass"),
        Err(LoaderError::ClassReader(ClassReaderError::NotAClassFile(0x74686973)))
    ));
}
