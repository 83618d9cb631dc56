use shallows_vm::error::PyrustError;
use shallows_vm::run_source;

fn run(source: &str) -> Result<String, PyrustError> {
    let mut out = Vec::new();
    run_source(source, &mut out)?;
    Ok(String::from_utf8(out).expect("interpreter output is always UTF-8"))
}

#[test]
fn scenario_a_hello_world() {
    let out = run(r#"print("Hello, World!")"#).unwrap();
    assert_eq!(out, "Hello, World!\n");
}

#[test]
fn scenario_b_fibonacci() {
    let source = r#"
fn fib(n: i32) -> i32 {
    if n <= 1 { return n }
    let mut a: i32 = 0
    let mut b: i32 = 1
    let mut i: i32 = 2
    while i <= n {
        let mut t = a + b
        a = b
        b = t
        i = i + 1
    }
    return b
}
let mut c: i32 = 0
while c < 10 { print(fib(c)); c = c + 1 }
"#;
    let out = run(source).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines, ["0", "1", "1", "2", "3", "5", "8", "13", "21", "34"]);
}

#[test]
fn scenario_c_immutability_produces_no_output() {
    let err = run("let x = 1\nx = 2").unwrap_err();
    assert!(matches!(err, PyrustError::ImmutabilityError { ref name } if name == "x"));
}

#[test]
fn scenario_d_type_annotation_mismatch() {
    let err = run(r#"let x: i32 = "hi""#).unwrap_err();
    assert!(matches!(err, PyrustError::TypeMismatch { .. }));
}

#[test]
fn scenario_e_division_by_zero_has_no_numeric_output() {
    let mut out = Vec::new();
    let err = run_source("let a: i32 = 1; print(a / 0)", &mut out).unwrap_err();
    assert!(matches!(err, PyrustError::DivisionByZero));
    assert!(out.is_empty());
}

#[test]
fn scenario_f_closure_over_mutable_outer() {
    let out = run("let mut n = 1\nfn f() { print(n) }\nn = 42\nf()").unwrap();
    assert_eq!(out, "42\n");
}

#[test]
fn property_parse_print_idempotence_of_literals() {
    assert_eq!(run("print(42)").unwrap(), "42\n");
    assert_eq!(run("print(1.5)").unwrap(), "1.5\n");
    assert_eq!(run("print(2.0)").unwrap(), "2.0\n");
    assert_eq!(run(r#"print("abc")"#).unwrap(), "abc\n");
    assert_eq!(run("print(true)").unwrap(), "true\n");
    assert_eq!(run("print(false)").unwrap(), "false\n");
}

#[test]
fn property_shadowing_law_holds_regardless_of_outer_mutability() {
    let out = run("let x = 1\nif true { let x = 2\nprint(x) }\nprint(x)").unwrap();
    assert_eq!(out, "2\n1\n");

    let out = run("let mut x = 1\nif true { let x = 2\nprint(x) }\nprint(x)").unwrap();
    assert_eq!(out, "2\n1\n");
}

#[test]
fn property_closure_capture_reads_declaration_scope_not_call_scope() {
    let source = r#"
let mut n = 1
fn read_n() { print(n) }
fn wrapper() {
    let n = 999
    read_n()
}
wrapper()
"#;
    assert_eq!(run(source).unwrap(), "1\n");
}

#[test]
fn property_return_exits_only_the_enclosing_function() {
    let source = r#"
fn inner() -> i32 {
    let mut i: i32 = 0
    while i < 5 {
        if i == 2 { return i }
        i = i + 1
    }
    return 99
}
fn outer() -> i32 {
    let r = inner()
    return r + 1
}
print(outer())
"#;
    assert_eq!(run(source).unwrap(), "3\n");
}

#[test]
fn property_division_always_produces_float_even_for_exact_quotients() {
    assert_eq!(run("print(10 / 5)").unwrap(), "2.0\n");
    assert_eq!(run("print(7 / 2)").unwrap(), "3.5\n");
}

#[test]
fn property_both_binary_operands_are_always_evaluated() {
    // No boolean connectives exist to short-circuit through, so a call
    // expression on each side of a comparison must run exactly once.
    let source = r#"
fn mark(tag: str) -> bool {
    print(tag)
    return true
}
if mark("left") == mark("right") { }
"#;
    assert_eq!(run(source).unwrap(), "left\nright\n");
}

#[test]
fn integer_overflow_is_a_distinct_error() {
    let err = run(&format!("print({} + 1)", i64::MAX)).unwrap_err();
    assert!(matches!(err, PyrustError::IntegerOverflow));
}

#[test]
fn recursive_closures_still_terminate_and_produce_expected_output() {
    let source = r#"
fn fact(n: i32) -> i32 {
    if n <= 1 { return 1 }
    return n * fact(n - 1)
}
print(fact(6))
"#;
    assert_eq!(run(source).unwrap(), "720\n");
}
