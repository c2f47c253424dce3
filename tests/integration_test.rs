use monkey::tree_walk_interpreter::{Environment, Interpreter, Value};
use pretty_assertions::assert_eq;

fn test_valid_program(source: &str, expected_output: &str) {
    let program = monkey::parser::parse(source).expect("Parse should work on valid program");
    let mut interpreter = Interpreter::new();
    let value = interpreter.interpret(&program);
    assert!(
        !matches!(value, Value::Error(_)),
        "Interpret should work on valid program, got {value}"
    );
    assert_eq!(value.to_string(), expected_output);
}

#[test]
fn test_fib() {
    let source = r#"
    let fib = fn(n) {
        if (n < 2) { return n; }
        return fib(n - 1) + fib(n - 2);
    };

    fib(20);
    "#;
    test_valid_program(source, "6765");
}

#[test]
fn test_closure() {
    let source = r#"
    let newAdder = fn(x) { fn(y) { x + y } };
    let addTwo = newAdder(2);
    addTwo(3);
    "#;
    test_valid_program(source, "5");
}

#[test]
fn test_functions_cant_break_scope() {
    let source = r#"
    let a = 1;
    let showA = fn() { a };
    let shadow = fn(a) { showA() };
    shadow(2) + showA();
    "#;
    test_valid_program(source, "2");
}

#[test]
fn test_higher_order_functions() {
    let source = r#"
    let twice = fn(f) { fn(x) { f(f(x)) } };
    let addThree = fn(x) { x + 3 };
    twice(twice(addThree))(1);
    "#;
    test_valid_program(source, "13");
}

#[test]
fn test_return_escapes_nested_blocks() {
    let source = r#"
    let classify = fn(n) {
        if (n > 0) {
            if (n > 100) { return 2; }
            return 1;
        }
        0
    };
    classify(500) * 100 + classify(5) * 10 + classify(-5);
    "#;
    test_valid_program(source, "210");
}

#[test]
fn test_function_rendering() {
    test_valid_program("fn(a, b) { let c = a * b; c - 1 }", "fn(a, b) { let c = (a * b); (c - 1) }");
}

#[test]
fn test_program_without_statements() {
    test_valid_program("", "null");
}

#[test]
fn test_parse_errors_are_collected() {
    let err = monkey::parser::parse("let = 1; let y 2; (1 + 2").unwrap_err();
    let messages: Vec<String> = err.0.iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        vec![
            "expected next token to be IDENT, got = instead",
            "no prefix parse function for = found",
            "expected next token to be =, got INT instead",
            "expected next token to be ), got EOF instead",
        ]
    );
}

#[test]
fn test_runtime_error_value() {
    let program = monkey::parser::parse("foobar;").unwrap();
    let value = monkey::tree_walk_interpreter::evaluate(&program, &Environment::global());
    assert_eq!(value.to_string(), "ERROR: identifier not found: foobar");
}

#[test]
fn test_shared_environment_across_inputs() {
    let env = Environment::global();
    for line in ["let counter = 1;", "let bump = fn(n) { n + counter };"] {
        let program = monkey::parser::parse(line).unwrap();
        monkey::tree_walk_interpreter::evaluate(&program, &env);
    }
    let program = monkey::parser::parse("bump(41)").unwrap();
    let value = monkey::tree_walk_interpreter::evaluate(&program, &env);
    assert_eq!(value, Value::Integer(42));
}

#[test]
fn test_round_trip_rendering() {
    let source = "let max = fn(a, b) { if (a > b) { a } else { b } }; max(-1 * 3, 2 + 2 == 4)";
    let first = monkey::parser::parse(source).unwrap().to_string();
    let second = monkey::parser::parse(&first).unwrap().to_string();
    assert_eq!(first, second);
}
