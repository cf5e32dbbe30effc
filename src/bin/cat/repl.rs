//! Interactive line-by-line transpilation.

use std::error::Error;

use rustyline::{error::ReadlineError, DefaultEditor};

pub fn run() -> Result<(), Box<dyn Error>> {
    let mut editor = DefaultEditor::new()?;

    println!("Cat REPL. Type a statement to transpile it, '.quit' to exit.");

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                if line.trim() == ".quit" {
                    break;
                }
                if line.trim().is_empty() {
                    continue;
                }

                let _ = editor.add_history_entry(&line);

                match cat_lang::transpile(&line, "<repl>") {
                    Ok(assembly) => print!("{assembly}"),
                    Err(rendered) => eprint!("{rendered}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Use '.quit' to exit");
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{err}");
                break;
            }
        }
    }

    Ok(())
}
