use lox::error::LoxError;
use lox::interpreter::Interpreter;
use lox::parser::Parser;
use lox::resolver::Resolver;
use lox::scanner::Scanner;

fn resolve(source: &str) -> Vec<LoxError> {
    let scanner = Scanner::new(source.as_bytes());
    let (statements, errors) = Parser::new(scanner).parse();

    assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);

    let mut out: Vec<u8> = Vec::new();
    let mut interpreter = Interpreter::new(&mut out);

    Resolver::new(&mut interpreter).resolve(&statements)
}

fn assert_single_error(source: &str, needle: &str) {
    let errors = resolve(source);

    assert_eq!(errors.len(), 1, "expected one error, got {:?}", errors);
    assert!(
        errors[0].to_string().contains(needle),
        "expected '{}' in: {}",
        needle,
        errors[0]
    );
}

#[test]
fn plain_program_resolves_cleanly() {
    let errors = resolve("var a = 1; { var b = a; fun f(x) { return x + b; } f(2); }");

    assert!(errors.is_empty(), "got: {:?}", errors);
}

#[test]
fn reading_local_in_its_own_initializer() {
    assert_single_error("{ var a = a; }", "own initializer");
}

#[test]
fn global_initializer_may_reference_global_shadow() {
    // Globals are not tracked on the scope stack; this is legal.
    let errors = resolve("var a = 1; var a = a;");

    assert!(errors.is_empty(), "got: {:?}", errors);
}

#[test]
fn duplicate_declaration_in_local_scope() {
    assert_single_error("{ var a = 1; var a = 2; }", "already declared");
}

#[test]
fn global_redeclaration_is_allowed() {
    let errors = resolve("var a = 1; var a = 2;");

    assert!(errors.is_empty(), "got: {:?}", errors);
}

#[test]
fn return_at_top_level() {
    assert_single_error("return 1;", "Can't return from top-level code.");
}

#[test]
fn return_with_value_inside_initializer() {
    assert_single_error(
        "class A { init() { return 1; } }",
        "Can't return a value from an initializer.",
    );
}

#[test]
fn bare_return_inside_initializer_is_fine() {
    let errors = resolve("class A { init() { return; } }");

    assert!(errors.is_empty(), "got: {:?}", errors);
}

#[test]
fn this_outside_class() {
    assert_single_error("print this;", "outside of a class");
}

#[test]
fn this_inside_method_is_fine() {
    let errors = resolve("class A { m() { return this; } }");

    assert!(errors.is_empty(), "got: {:?}", errors);
}

#[test]
fn super_outside_class() {
    assert_single_error("super.m();", "Cannot use 'super' outside of a class.");
}

#[test]
fn super_in_class_without_superclass() {
    assert_single_error(
        "class A { m() { super.m(); } }",
        "Cannot use 'super' in a class with no superclass.",
    );
}

#[test]
fn super_in_subclass_is_fine() {
    let errors = resolve("class A { m() {} } class B < A { m() { super.m(); } }");

    assert!(errors.is_empty(), "got: {:?}", errors);
}

#[test]
fn class_inheriting_from_itself() {
    assert_single_error("class A < A {}", "can't inherit from itself");
}

#[test]
fn errors_accumulate_across_statements() {
    let errors = resolve("return 1; print this;");

    assert_eq!(errors.len(), 2, "got: {:?}", errors);
}

#[test]
fn resolution_is_pure() {
    let scanner = Scanner::new("var a = 1; { var b = 2; fun f() { return a + b; } }".as_bytes());
    let (statements, errors) = Parser::new(scanner).parse();

    assert!(errors.is_empty());

    // Resolving the same AST twice against one interpreter re-records the
    // identical distances; both passes must agree and stay error-free.
    let mut out: Vec<u8> = Vec::new();
    let mut interpreter = Interpreter::new(&mut out);

    let first = Resolver::new(&mut interpreter).resolve(&statements);
    let second = Resolver::new(&mut interpreter).resolve(&statements);

    assert!(first.is_empty());
    assert!(second.is_empty());
}
