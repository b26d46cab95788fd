use std::fmt::Write;

use clap::Parser;
use log::debug;

use minijvm_loader::{
    class_file_loader::ClassFileLoader, class_path::ClassPath, loader_error::LoaderError,
};
use minijvm_reader::class_file::ClassFile;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Class path. Use colon (:) as separator for entries
    #[arg(short, long, default_value = ".")]
    classpath: String,

    /// Also print the constant pool
    #[arg(long)]
    constants: bool,

    /// Only print the methods with this name
    #[arg(short, long)]
    method: Option<String>,

    /// Class to disassemble, e.g. `java.lang.Object` or `java/lang/Object`
    class_name: String,
}

fn load_class(args: &Args) -> Result<ClassFile, String> {
    let class_path = ClassPath::parse(&args.classpath).map_err(|err| err.to_string())?;
    debug!("using class path {class_path}");
    ClassFileLoader::new(class_path)
        .load_class(&args.class_name)
        .map_err(|err| match err {
            LoaderError::ClassNotFound(name) => format!("class not found: {name}"),
            err => format!("cannot load {}: {err}", args.class_name),
        })
}

fn disassemble(class: &ClassFile, args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    let mut out = String::new();
    write!(out, "class {}", class.class_name()?)?;
    if let Some(superclass) = class.superclass_name()? {
        write!(out, " extends {superclass}")?;
    }
    writeln!(out)?;
    if let Some(source_file) = class.source_file()? {
        writeln!(out, "  compiled from: {source_file}")?;
    }
    writeln!(out, "  version: {}", class.version())?;
    writeln!(out, "  flags: {:?}", class.flags())?;

    if args.constants {
        write!(out, "{}", class.constants())?;
    }

    let methods = class
        .methods()
        .iter()
        .filter(|method| args.method.as_ref().map_or(true, |name| &method.name == name));
    for method in methods {
        writeln!(out)?;
        writeln!(out, "{method}")?;
        for command in method.commands()? {
            writeln!(out, "  {command}")?;
        }
    }
    Ok(out)
}

fn run(args: Args) -> Result<i32, String> {
    let class = load_class(&args)?;
    let output = disassemble(&class, &args).map_err(|err| err.to_string())?;
    print!("{output}");
    Ok(0)
}

fn main() {
    let args = Args::parse();
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let result = run(args);
    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use minijvm_reader::class_reader::read_buffer;

    use crate::{disassemble, load_class, Args};

    const EMPLOYEE_CLASS: &[u8] =
        include_bytes!("../../reader/tests/resources/com/coderising/jvm/test/EmployeeV1.class");

    #[test]
    fn can_parse_arguments() {
        let args = Args::parse_from(["minijvm-javap", "--constants", "-m", "main", "a.b.C"]);
        assert_eq!(".", args.classpath);
        assert!(args.constants);
        assert_eq!(Some("main".to_string()), args.method);
        assert_eq!("a.b.C", args.class_name);
    }

    #[test]
    fn prints_header_and_selected_methods() {
        let class = read_buffer(EMPLOYEE_CLASS).unwrap();
        let args = Args::parse_from(["minijvm-javap", "--method", "sayHello", "EmployeeV1"]);
        let output = disassemble(&class, &args).unwrap();

        assert_eq!(
            "class com/coderising/jvm/test/EmployeeV1 extends java/lang/Object\n\
             \x20 compiled from: EmployeeV1.java\n\
             \x20 version: 52.0 (Jdk8)\n\
             \x20 flags: PUBLIC | SUPER\n\
             \n\
             PUBLIC sayHello()V\n\
             \x20 0: getstatic #4\n\
             \x20 3: ldc #5\n\
             \x20 5: invokevirtual #6\n\
             \x20 8: return\n",
            output
        );
    }

    #[test]
    fn constants_are_printed_on_request() {
        let class = read_buffer(EMPLOYEE_CLASS).unwrap();
        let args = Args::parse_from(["minijvm-javap", "--constants", "EmployeeV1"]);
        let output = disassemble(&class, &args).unwrap();
        assert!(output.contains("Constant pool: (size: 47)"));
        assert!(output.contains("PUBLIC | STATIC main([Ljava/lang/String;)V"));
    }

    #[test]
    fn missing_classes_are_reported() {
        let args = Args::parse_from([
            "minijvm-javap",
            "--classpath",
            env!("CARGO_MANIFEST_DIR"),
            "does.not.Exist",
        ]);
        assert_eq!(
            Err("class not found: does.not.Exist".to_string()),
            load_class(&args).map(|_| ())
        );
    }
}
