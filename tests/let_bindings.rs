//! End-to-end transpilation of `let` bindings and variable access.

#[test]
fn transpile_binding_and_use() {
    let result = cat_lang::transpile("let x := 10.\nx + 1.", "let_bindings.cat").unwrap();

    let body: Vec<&str> = result.lines().skip(3).collect();
    assert_eq!(
        body,
        vec![
            "li    $t0, 10",
            "addi  $sp, $sp, -4",
            "sw    $t0, 0($sp)",
            "lw    $t0, 0($sp)",
            "addi  $t0, $t0, 1",
            "jr    $ra",
        ]
    );
}

#[test]
fn transpile_two_bindings() {
    let result =
        cat_lang::transpile("let x := 1.\nlet y := 2.\nx + y.", "let_bindings.cat").unwrap();

    // The first binding ends up one slot above the stack pointer once the
    // second one is pushed.
    assert!(result.contains("lw    $t0, 4($sp)\n"));
    assert!(result.contains("lw    $t1, 0($sp)\n"));
    assert!(result.contains("add   $t0, $t0, $t1\n"));
}

#[test]
fn transpile_reassignment() {
    let result = cat_lang::transpile("let x := 1.\nx := x + 1.", "let_bindings.cat").unwrap();

    let body: Vec<&str> = result.lines().skip(3).collect();
    assert_eq!(
        body,
        vec![
            "li    $t0, 1",
            "addi  $sp, $sp, -4",
            "sw    $t0, 0($sp)",
            "lw    $t0, 0($sp)",
            "addi  $t0, $t0, 1",
            "sw    $t0, 0($sp)",
            "jr    $ra",
        ]
    );
}
