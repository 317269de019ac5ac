use lox::ast::{Expr, LiteralValue, Stmt};
use lox::ast_printer::AstPrinter;
use lox::error::LoxError;
use lox::parser::Parser;
use lox::scanner::Scanner;

fn parse(source: &str) -> (Vec<Stmt>, Vec<LoxError>) {
    let scanner = Scanner::new(source.as_bytes());
    Parser::new(scanner).parse()
}

/// Parse a single expression statement and render it in prefix form.
fn pretty(source: &str) -> String {
    let (statements, errors) = parse(source);

    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    assert_eq!(statements.len(), 1);

    match &statements[0] {
        Stmt::Expression(expr) => AstPrinter::print(expr),
        other => panic!("Expected expression statement, got {:?}", other),
    }
}

#[test]
fn factor_binds_tighter_than_term() {
    assert_eq!(pretty("1 + 2 * 3;"), "(+ 1.0 (* 2.0 3.0))");
}

#[test]
fn binary_operators_left_associate() {
    assert_eq!(pretty("1 - 2 - 3;"), "(- (- 1.0 2.0) 3.0)");
    assert_eq!(pretty("8 / 4 / 2;"), "(/ (/ 8.0 4.0) 2.0)");
}

#[test]
fn unary_and_grouping() {
    assert_eq!(pretty("-(1 + 2);"), "(- (group (+ 1.0 2.0)))");
    assert_eq!(pretty("!!true;"), "(! (! true))");
}

#[test]
fn comparison_binds_tighter_than_equality() {
    assert_eq!(pretty("1 < 2 == true;"), "(== (< 1.0 2.0) true)");
}

#[test]
fn logical_or_is_lower_than_and() {
    assert_eq!(pretty("a or b and c;"), "(or a (and b c))");
}

#[test]
fn assignment_right_associates() {
    assert_eq!(pretty("a = b = 1;"), "(= a (= b 1.0))");
}

#[test]
fn call_and_property_chains() {
    assert_eq!(pretty("a.b(1).c;"), "(. (call (. a b) 1.0) c)");
    assert_eq!(pretty("a.b = 2;"), "(.= a b 2.0)");
    assert_eq!(pretty("super.foo();"), "(call (super foo))");
}

#[test]
fn pretty_printing_is_deterministic() {
    let (statements, errors) = parse("this.x = -(a + b) * f(1, nil);");

    assert!(errors.is_empty());

    let expr = match &statements[0] {
        Stmt::Expression(expr) => expr,
        other => panic!("Expected expression statement, got {:?}", other),
    };

    assert_eq!(AstPrinter::print(expr), AstPrinter::print(expr));
}

#[test]
fn invalid_assignment_target_is_soft_error() {
    let (statements, errors) = parse("1 = 2; print 3;");

    // The bad assignment is reported at '=' without panic; the rest of the
    // program still parses.
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0].to_string().contains("Invalid assignment target."),
        "got: {}",
        errors[0]
    );
    assert_eq!(statements.len(), 2);
}

#[test]
fn for_loop_desugars_to_block_while() {
    let (statements, errors) = parse("for (var i = 0; i < 3; i = i + 1) print i;");

    assert!(errors.is_empty());
    assert_eq!(statements.len(), 1);

    let inner = match &statements[0] {
        Stmt::Block(inner) => inner,
        other => panic!("Expected outer block, got {:?}", other),
    };

    assert_eq!(inner.len(), 2);
    assert!(matches!(inner[0], Stmt::Var { .. }));

    let body = match &inner[1] {
        Stmt::While { body, .. } => body,
        other => panic!("Expected while, got {:?}", other),
    };

    // Body block: original statement followed by the increment.
    match body.as_ref() {
        Stmt::Block(parts) => {
            assert_eq!(parts.len(), 2);
            assert!(matches!(parts[0], Stmt::Print(_)));
            assert!(matches!(parts[1], Stmt::Expression(Expr::Assign { .. })));
        }
        other => panic!("Expected body block, got {:?}", other),
    }
}

#[test]
fn empty_for_clauses_default_to_infinite_loop() {
    let (statements, errors) = parse("for (;;) print 1;");

    assert!(errors.is_empty());
    assert_eq!(statements.len(), 1);

    match &statements[0] {
        Stmt::While { condition, body } => {
            assert!(matches!(condition, Expr::Literal(LiteralValue::True)));
            assert!(matches!(body.as_ref(), Stmt::Print(_)));
        }
        other => panic!("Expected bare while, got {:?}", other),
    }
}

#[test]
fn else_binds_to_nearest_if() {
    let (statements, errors) = parse("if (a) if (b) print 1; else print 2;");

    assert!(errors.is_empty());

    match &statements[0] {
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => {
            assert!(else_branch.is_none(), "outer if must not own the else");
            assert!(matches!(
                then_branch.as_ref(),
                Stmt::If {
                    else_branch: Some(_),
                    ..
                }
            ));
        }
        other => panic!("Expected if statement, got {:?}", other),
    }
}

#[test]
fn class_declaration_with_superclass_and_methods() {
    let (statements, errors) = parse("class B < A { init(x) { this.x = x; } m() { return 1; } }");

    assert!(errors.is_empty());

    match &statements[0] {
        Stmt::Class {
            name,
            superclass,
            methods,
        } => {
            assert_eq!(name.lexeme, "B");
            assert!(matches!(superclass, Some(Expr::Variable { .. })));
            assert_eq!(methods.len(), 2);
            assert_eq!(methods[0].name.lexeme, "init");
            assert_eq!(methods[0].params.len(), 1);
        }
        other => panic!("Expected class statement, got {:?}", other),
    }
}

#[test]
fn parser_synchronizes_after_statement_error() {
    let (statements, errors) = parse("var = 1; print 2; +; print 3;");

    // Two broken statements, two salvaged prints.
    assert_eq!(errors.len(), 2);
    assert_eq!(statements.len(), 2);
    assert!(statements.iter().all(|s| matches!(s, Stmt::Print(_))));
}

#[test]
fn scan_errors_surface_through_parse() {
    let (statements, errors) = parse("print 1; @");

    assert_eq!(statements.len(), 1);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("Unexpected character"));
}

#[test]
fn argument_limit_is_soft_error() {
    let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
    let source = format!("f({});", args.join(", "));

    let (statements, errors) = parse(&source);

    assert_eq!(statements.len(), 1, "the call still parses");
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0]
            .to_string()
            .contains("Can't have more than 255 arguments."),
        "got: {}",
        errors[0]
    );
}
