use lox::error::LoxError;
use lox::interpreter::Interpreter;
use lox::parser::Parser;
use lox::resolver::Resolver;
use lox::scanner::Scanner;

/// Run a whole program and capture everything `print` wrote.
fn run(source: &str) -> (String, Result<(), LoxError>) {
    let scanner = Scanner::new(source.as_bytes());
    let (statements, errors) = Parser::new(scanner).parse();

    assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);

    let mut out: Vec<u8> = Vec::new();

    let result = {
        let mut interpreter = Interpreter::new(&mut out);

        let resolve_errors = Resolver::new(&mut interpreter).resolve(&statements);
        assert!(
            resolve_errors.is_empty(),
            "unexpected resolve errors: {:?}",
            resolve_errors
        );

        interpreter.interpret(&statements)
    };

    (String::from_utf8(out).expect("print output is UTF-8"), result)
}

fn run_ok(source: &str) -> String {
    let (output, result) = run(source);

    if let Err(e) = result {
        panic!("runtime error: {}", e);
    }

    output
}

fn run_err(source: &str) -> (String, String) {
    let (output, result) = run(source);

    match result {
        Err(e) => (output, e.to_string()),
        Ok(()) => panic!("expected a runtime error"),
    }
}

// ── closures and scoping ────────────────────────────────────────────────

#[test]
fn counter_closure_keeps_its_cell() {
    let output = run_ok(
        "fun makeCounter() { var i = 0; fun c() { i = i + 1; print i; } return c; }\n\
         var c = makeCounter(); c(); c();",
    );

    assert_eq!(output, "1\n2\n");
}

#[test]
fn two_counters_do_not_share_state() {
    let output = run_ok(
        "fun makeCounter() { var i = 0; fun c() { i = i + 1; print i; } return c; }\n\
         var a = makeCounter(); var b = makeCounter(); a(); a(); b();",
    );

    assert_eq!(output, "1\n2\n1\n");
}

#[test]
fn closure_capture_survives_later_shadowing() {
    let output = run_ok(
        "var a = \"global\";\n\
         { fun showA() { print a; } showA(); var a = \"block\"; showA(); }",
    );

    assert_eq!(output, "global\nglobal\n");
}

#[test]
fn block_scope_shadows_and_restores() {
    let output = run_ok("var a = 1; { var a = 2; print a; } print a;");

    assert_eq!(output, "2\n1\n");
}

#[test]
fn return_unwinds_only_the_innermost_function() {
    let output = run_ok(
        "fun outer() { fun inner() { return 1; } inner(); return 2; }\n\
         print outer();",
    );

    assert_eq!(output, "2\n");
}

// ── classes ─────────────────────────────────────────────────────────────

#[test]
fn bound_method_retains_original_this() {
    let output = run_ok(
        "class P { sayName() { print this.name; } }\n\
         var j = P(); j.name = \"Jane\";\n\
         var b = P(); b.name = \"Bill\";\n\
         b.sayName = j.sayName; b.sayName();",
    );

    assert_eq!(output, "Jane\n");
}

#[test]
fn super_dispatches_past_the_direct_superclass() {
    let output = run_ok(
        "class A { method() { print \"A method\"; } }\n\
         class B < A { method() { print \"B method\"; } test() { super.method(); } }\n\
         class C < B {}\n\
         C().test();",
    );

    assert_eq!(output, "A method\n");
}

#[test]
fn initializer_always_returns_this() {
    let output = run_ok("class F { init() { this.x = 1; } } var f = F(); print f.init().x;");

    assert_eq!(output, "1\n");
}

#[test]
fn fields_shadow_methods() {
    let output = run_ok(
        "class A { m() { print \"method\"; } }\n\
         var a = A(); a.m = 7; print a.m;",
    );

    assert_eq!(output, "7\n");
}

#[test]
fn constructor_arity_comes_from_init() {
    let output = run_ok(
        "class Point { init(x, y) { this.x = x; this.y = y; } }\n\
         var p = Point(3, 4); print p.x + p.y;",
    );

    assert_eq!(output, "7\n");
}

#[test]
fn inherited_methods_see_subclass_instance() {
    let output = run_ok(
        "class A { who() { print this.kind; } }\n\
         class B < A { init() { this.kind = \"B\"; } }\n\
         B().who();",
    );

    assert_eq!(output, "B\n");
}

// ── operators and values ────────────────────────────────────────────────

#[test]
fn logical_operators_return_operands() {
    let output = run_ok(
        "print \"hi\" or 2; print nil or \"yes\"; print nil and 1; print 1 and 2;",
    );

    assert_eq!(output, "hi\nyes\nnil\n2\n");
}

#[test]
fn zero_and_empty_string_are_truthy() {
    let output = run_ok(
        "if (0) print \"zero\"; if (\"\") print \"empty\"; if (nil) print \"no\"; else print \"nil\";",
    );

    assert_eq!(output, "zero\nempty\nnil\n");
}

#[test]
fn equality_semantics() {
    let output = run_ok(
        "print nil == nil; print 1 == \"1\"; print \"a\" == \"a\"; print true == 1;",
    );

    assert_eq!(output, "true\nfalse\ntrue\nfalse\n");
}

#[test]
fn functions_compare_by_identity() {
    let output = run_ok(
        "fun f() {} var g = f;\n\
         print f == g; fun h() {} print f == h;",
    );

    assert_eq!(output, "true\nfalse\n");
}

#[test]
fn integer_valued_numbers_print_without_decimal() {
    let output = run_ok("print 3.0; print 2.5; print 7 / 2; print 1 + 2;");

    assert_eq!(output, "3\n2.5\n3.5\n3\n");
}

#[test]
fn string_concatenation() {
    let output = run_ok("print \"foo\" + \"bar\";");

    assert_eq!(output, "foobar\n");
}

#[test]
fn assignment_is_an_expression() {
    let output = run_ok("var a = 0; var b = 0; a = b = 1; print a; print b; print a = 2;");

    assert_eq!(output, "1\n1\n2\n");
}

#[test]
fn stringification_of_callables_and_instances() {
    let output = run_ok(
        "class A {} fun f() {}\n\
         print A; print A(); print f; print clock;",
    );

    assert_eq!(output, "A\nA instance\n<fn f>\n<native fn clock>\n");
}

#[test]
fn clock_yields_a_positive_number() {
    let output = run_ok("print clock() > 0;");

    assert_eq!(output, "true\n");
}

// ── control flow ────────────────────────────────────────────────────────

#[test]
fn while_loop_runs_to_completion() {
    let output = run_ok("var i = 0; var sum = 0; while (i < 5) { sum = sum + i; i = i + 1; } print sum;");

    assert_eq!(output, "10\n");
}

#[test]
fn desugared_for_loop_executes() {
    let output = run_ok("for (var i = 0; i < 3; i = i + 1) print i;");

    assert_eq!(output, "0\n1\n2\n");
}

#[test]
fn recursion_through_global_binding() {
    let output = run_ok(
        "fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); }\n\
         print fib(10);",
    );

    assert_eq!(output, "55\n");
}

// ── runtime errors ──────────────────────────────────────────────────────

#[test]
fn adding_string_and_number_is_a_type_error() {
    let (output, message) = run_err("print \"a\" + 1;");

    assert_eq!(output, "");
    assert!(
        message.contains("Operands must be two numbers or two strings."),
        "got: {}",
        message
    );
    assert!(message.contains("[line 1]"), "got: {}", message);
}

#[test]
fn undefined_variable_read() {
    let (_, message) = run_err("print missing;");

    assert!(message.contains("Undefined variable 'missing'."), "got: {}", message);
}

#[test]
fn undefined_property_read() {
    let (_, message) = run_err("class A {} print A().nope;");

    assert!(message.contains("Undefined property 'nope'."), "got: {}", message);
}

#[test]
fn arity_mismatch() {
    let (_, message) = run_err("fun f(a) {} f(1, 2);");

    assert!(
        message.contains("Expected 1 arguments but got 2."),
        "got: {}",
        message
    );
}

#[test]
fn calling_a_non_callable() {
    let (_, message) = run_err("\"not a function\"();");

    assert!(
        message.contains("Can only call functions and classes."),
        "got: {}",
        message
    );
}

#[test]
fn superclass_must_be_a_class() {
    let (_, message) = run_err("var notAClass = 1; class A < notAClass {}");

    assert!(message.contains("Superclass must be a class."), "got: {}", message);
}

#[test]
fn unary_minus_requires_a_number() {
    let (_, message) = run_err("print -\"oops\";");

    assert!(message.contains("Operand must be a number."), "got: {}", message);
}

#[test]
fn comparison_requires_numbers() {
    let (_, message) = run_err("print 1 < \"2\";");

    assert!(message.contains("Operands must be numbers."), "got: {}", message);
}

#[test]
fn runtime_error_reports_the_culprit_line() {
    let (output, message) = run_err("print 1;\nprint 2;\nprint nil - 1;");

    // The first two statements already produced output.
    assert_eq!(output, "1\n2\n");
    assert!(message.contains("[line 3]"), "got: {}", message);
}

#[test]
fn division_by_zero_follows_ieee() {
    let output = run_ok("print 1 / 0; print -1 / 0;");

    assert_eq!(output, "inf\n-inf\n");
}
