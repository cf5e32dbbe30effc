//! # Cat
//!
//! The command line driver of the Cat transpiler. It reads a source file (or
//! stdin), transpiles it to MIPS assembly, and either prints the assembly,
//! writes it to a file, or runs it on the `spim` simulator. Without a file
//! argument it drops into an interactive REPL.

mod cli;
mod repl;

use std::{error::Error, fs, io::Read, path::Path, process};

use log::info;

use cli::Cli;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::init();

    simple_logger::init_with_level((&args.verbosity).into()).unwrap();

    let Some(file) = &args.file else {
        return repl::run();
    };

    let (source, name) = read_source(file)?;

    match cat_lang::transpile(&source, &name) {
        Ok(assembly) => {
            if let Some(output) = &args.output {
                fs::write(output, &assembly)?;
                info!("Wrote assembly to '{}'", output.to_string_lossy());
            } else if !args.run {
                print!("{assembly}");
            }

            if args.run {
                print!("{}", cat_lang::execute(&assembly)?);
            }
        }
        Err(rendered) => {
            eprint!("{rendered}");
            process::exit(1);
        }
    }

    Ok(())
}

fn read_source(file: &Path) -> Result<(String, String), Box<dyn Error>> {
    if file.as_os_str() == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        return Ok((source, "<stdin>".to_string()));
    }

    let source = fs::read_to_string(file)?;
    Ok((source, file.to_string_lossy().into_owned()))
}
