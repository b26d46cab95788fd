pub mod class_file_loader;
pub mod class_path;
pub mod class_path_entry;
pub mod file_system_class_path_entry;
pub mod loader_error;
