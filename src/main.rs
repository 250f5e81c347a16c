extern crate rminic;
use docopt::{ArgvMap, Docopt};
use rminic::{
    analyze, compile, emit, fmt_vec, generate, optimize, parse, tac, tokenize, CompileError, TokenSummary,
};

const USAGE: &str = "
rminic, a compiler from a small imperative language to pseudo-assembly.

Usage:
  rminic <file>
  rminic lex <file>
  rminic parse <file>
  rminic symbols <file>
  rminic tac <file>
  rminic optimize [--tac] <file>
  rminic asm [--tac] <file>
  rminic (-h | --help)

Options:
  -h --help  Show this screen.
  --tac      Read <file> as a TAC listing instead of source.
";

fn report(title: &str, body: &str) {
    let banner = format!("===== {} =====", title);
    println!("{}", banner);
    println!("{}", body.trim_end());
    println!("{}\n", "=".repeat(banner.len()));
}

/// The TAC to start from, either read directly or compiled from source
fn load_tac(text: &str, from_tac: bool) -> Result<Vec<tac::Instruction>, CompileError> {
    if from_tac {
        Ok(tac::parse_listing(text))
    } else {
        Ok(generate(&parse(tokenize(text))?))
    }
}

fn run(args: &ArgvMap, text: &str) -> Result<(), CompileError> {
    let from_tac = args.get_bool("--tac");
    if args.get_bool("lex") {
        report("LEXICAL ANALYSIS", &TokenSummary::new(&tokenize(text)).to_string());
    } else if args.get_bool("parse") {
        report("PARSER (SYNTAX TREE)", &parse(tokenize(text))?.to_string());
    } else if args.get_bool("symbols") {
        report("SYMBOL TABLE", &analyze(&parse(tokenize(text))?).to_string());
    } else if args.get_bool("tac") {
        report("THREE ADDRESS CODE", &tac::fmt_numbered(&load_tac(text, false)?));
    } else if args.get_bool("optimize") {
        let code = load_tac(text, from_tac)?;
        report("OPTIMIZED TAC", &tac::fmt_numbered(&optimize(&code)?));
    } else if args.get_bool("asm") {
        let code = load_tac(text, from_tac)?;
        report("ASSEMBLY CODE", &fmt_vec(&emit(&optimize(&code)?)));
    } else {
        let compiled = compile(text)?;
        report("LEXICAL ANALYSIS", &TokenSummary::new(&compiled.tokens).to_string());
        report("PARSER (SYNTAX TREE)", &compiled.program.to_string());
        report("SYMBOL TABLE", &compiled.symbols.to_string());
        report("THREE ADDRESS CODE", &tac::fmt_numbered(&compiled.tac));
        report("OPTIMIZED TAC", &tac::fmt_numbered(&compiled.optimized));
        report("ASSEMBLY CODE", &fmt_vec(&compiled.asm));
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if std::env::args().len() < 2 {
        println!("Usage: rminic [lex|parse|symbols|tac|optimize|asm] <file.mini>");
        return;
    }
    let args = Docopt::new(USAGE).and_then(|d| d.parse()).unwrap_or_else(|e| e.exit());
    let path = args.get_str("<file>");
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("[ERROR] could not load {}: {}", path, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = run(&args, &text) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
