//! End-to-end transpilation of `print` statements.

#[test]
fn print_integer_uses_syscall_1() {
    let result = cat_lang::transpile("print 5.", "print.cat").unwrap();

    let body: Vec<&str> = result.lines().skip(3).collect();
    assert_eq!(
        body,
        vec![
            "li    $t0, 5",
            "move  $a0, $t0",
            "li    $v0, 1",
            "syscall",
            "jr    $ra",
        ]
    );
}

#[test]
fn print_character_uses_syscall_11() {
    let result = cat_lang::transpile("print #a.", "print.cat").unwrap();

    let body: Vec<&str> = result.lines().skip(3).collect();
    assert_eq!(
        body,
        vec![
            "li    $t0, 97",
            "move  $a0, $t0",
            "li    $v0, 11",
            "syscall",
            "jr    $ra",
        ]
    );
}

#[test]
fn print_newline_escape() {
    let result = cat_lang::transpile("print #\\n.", "print.cat").unwrap();
    assert!(result.contains("li    $t0, 10\n"));
    assert!(result.contains("li    $v0, 11\n"));
}

#[test]
fn print_several_expressions_in_order() {
    let result = cat_lang::transpile("let x := 7.\nprint x #\\n x + 1.", "print.cat").unwrap();

    let integer_at = result.find("li    $v0, 1\n").unwrap();
    let char_at = result.find("li    $v0, 11\n").unwrap();
    assert!(integer_at < char_at);

    // Arithmetic over a character prints as an integer again.
    assert_eq!(result.matches("li    $v0, 1\n").count(), 2);
    assert_eq!(result.matches("li    $v0, 11\n").count(), 1);
}

#[test]
fn print_string_character_by_character() {
    let result = cat_lang::transpile("print \"hi\".", "print.cat").unwrap();

    let body: Vec<&str> = result.lines().skip(3).collect();
    assert_eq!(
        body,
        vec![
            "li    $a0, 104",
            "li    $v0, 11",
            "syscall",
            "li    $a0, 105",
            "li    $v0, 11",
            "syscall",
            "jr    $ra",
        ]
    );
}
