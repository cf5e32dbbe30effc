//! Helpers for driving the built `cat` binary from integration tests.

use std::{
    error::Error,
    io,
    path::Path,
    process::{Command, Output},
    str,
};

const CAT_PATH: &str = "./target/debug/cat";

pub struct Expected<'a> {
    pub stdout: &'a str,
    pub stderr: &'a str,
}

impl<'a> Expected<'a> {
    fn assert_matches(self, output: &Output) -> Result<(), Box<dyn Error>> {
        assert_eq!(str::from_utf8(&output.stdout)?, self.stdout);
        assert_eq!(str::from_utf8(&output.stderr)?, self.stderr);
        Ok(())
    }
}

fn run_transpiler(src_path: &Path) -> Result<Output, io::Error> {
    Command::new(CAT_PATH).arg(src_path).output()
}

/// Transpile `src_path` through the CLI and compare the emitted assembly and
/// stderr against `expected`.
pub fn check_transpilation(src_path: &Path, expected: Expected) -> Result<(), Box<dyn Error>> {
    let output = run_transpiler(src_path)?;

    assert!(
        output.status.success(),
        "cat exited with status {:?}",
        output.status.code()
    );
    expected.assert_matches(&output)?;

    Ok(())
}

/// Transpile `src_path` through the CLI and assert that it failed with
/// rendered diagnostics on stderr and nothing on stdout.
pub fn check_failing_transpilation(src_path: &Path) -> Result<(), Box<dyn Error>> {
    let output = run_transpiler(src_path)?;

    assert!(
        !output.status.success(),
        "cat should exit with a failure status"
    );
    assert!(output.stdout.is_empty());
    assert!(str::from_utf8(&output.stderr)?.contains("error:"));

    Ok(())
}
