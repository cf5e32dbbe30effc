//! Tests driving the built `cat` binary against the demo programs.

use std::{error::Error, path::Path};

use test_utils::{check_failing_transpilation, check_transpilation, Expected};

const ARITHMETIC_SRC: &str = "./demos/arithmetic.cat";
const ARITHMETIC_EXPECTED: Expected = Expected {
    stdout: ".text\n.globl main\nmain:\nli    $t0, 1\naddi  $t0, $t0, 2\naddi  $t0, $t0, -3\njr    $ra\n",
    stderr: "",
};

const UNBOUND_SRC: &str = "./demos/unbound.cat";

#[test]
fn transpile_arithmetic_demo() -> Result<(), Box<dyn Error>> {
    check_transpilation(Path::new(ARITHMETIC_SRC), ARITHMETIC_EXPECTED)
}

#[test]
fn unbound_demo_fails_with_diagnostics() -> Result<(), Box<dyn Error>> {
    check_failing_transpilation(Path::new(UNBOUND_SRC))
}
