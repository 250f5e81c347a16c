extern crate rminic;
use rminic::{compile, fmt_vec, Compilation, CompileError};
use std::path::Path;

// Log needs to be initialized once in the async mess that is cargo test
use std::sync::Once;
static LOGGER_INIT: Once = Once::new();

fn ensure_log_init() {
    LOGGER_INIT.call_once(|| {
        let _ = env_logger::builder().filter_level(log::LevelFilter::Debug).is_test(true).try_init();
    });
}

fn compile_file(path: &Path) -> Result<Compilation, CompileError> {
    let script_string = std::fs::read_to_string(path).expect("could not load given file");
    compile(&script_string)
}

fn compile_safe(path: &Path) -> Compilation {
    match compile_file(path) {
        Ok(c) => c,
        Err(e) => {
            println!("{}", e);
            panic!("file test failed to compile");
        }
    }
}

fn is_script(path: &Path) -> bool {
    path.is_file() && path.extension() == Some(&std::ffi::OsString::from("mini"))
}

// Every script compiles, and where a .asm sits next to it the assembly
// has to match line for line
#[test]
fn test_scripts() -> std::io::Result<()> {
    ensure_log_init();
    for entry in std::fs::read_dir("tests/scripts")? {
        let path = entry?.path();
        if !is_script(&path) {
            continue;
        }
        println!("TESTING: {}", path.to_string_lossy());
        let compiled = compile_safe(&path);
        // labels always survive optimization
        assert_eq!(compiled.tac.iter().filter(|i| i.to_string().ends_with(':')).count(),
            compiled.optimized.iter().filter(|i| i.to_string().ends_with(':')).count());
        let asm_path = path.with_extension("asm");
        if asm_path.is_file() {
            let expected = std::fs::read_to_string(&asm_path)?;
            assert_eq!(fmt_vec(&compiled.asm), expected.trim_end());
        }
    }
    Ok(())
}

// errors / ui
#[test]
fn test_errors() {
    ensure_log_init();
    for entry in std::fs::read_dir("tests/scripts/error").unwrap() {
        let path = entry.unwrap().path();
        if !is_script(&path) {
            continue;
        }
        println!("TESTING: {}", path.to_string_lossy());
        let out_path = path.with_extension("stderr");
        if !out_path.is_file() {
            panic!("no expected output for test at {}", out_path.to_string_lossy());
        }
        let err = match compile_file(&path) {
            Ok(_) => panic!("error example compiled without error"),
            Err(e) => e,
        };
        let err_str = format!("{}", err);
        let expected = std::fs::read_to_string(out_path).unwrap();
        assert_eq!(err_str, expected.trim_end());
    }
}
