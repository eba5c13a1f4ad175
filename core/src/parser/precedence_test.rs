use crate::parser::Expr;

use super::parser::parse;

// Helper function to parse an expression and return the tree.
//
// We test precedence by comparing whether two expressions parenthesized in
// different ways yield the same tree.
fn ast(source: &str) -> Expr {
    parse(source).unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", source, e))
}

#[test]
fn test_addition_vs_subtraction() {
    assert_eq!(ast("a + b - c"), ast("(a + b) - c"));
    assert_eq!(ast("a - b + c"), ast("(a - b) + c"));
    assert_eq!(
        ast("a + b - c + d - e + f"),
        ast("((((a + b) - c) + d) - e) + f")
    );
}

#[test]
fn test_multiplicative_operators() {
    assert_eq!(ast("a * b / c"), ast("(a * b) / c"));
    assert_eq!(ast("a / b % c"), ast("(a / b) % c"));
    assert_eq!(ast("a % b * c"), ast("(a % b) * c"));
}

#[test]
fn test_addition_vs_multiplication() {
    assert_eq!(ast("a + b * c"), ast("a + (b * c)"));
    assert_eq!(ast("a * b + c"), ast("(a * b) + c"));
    assert_eq!(ast("4%3 * 2"), ast("(4 % 3) * 2"));
}

#[test]
fn test_and_vs_or() {
    assert_eq!(ast("a && b || c"), ast("(a && b) || c"));
    assert_eq!(ast("a || b && c"), ast("a || (b && c)"));
}

#[test]
fn test_comparison_vs_logical() {
    assert_eq!(ast("a < b && c >= d"), ast("(a < b) && (c >= d)"));
    assert_eq!(ast("a == b || c != d"), ast("(a == b) || (c != d)"));
}

#[test]
fn test_ordering_vs_equality() {
    assert_eq!(ast("a < b == c > d"), ast("(a < b) == (c > d)"));
}

#[test]
fn test_arithmetic_vs_comparison() {
    assert_eq!(ast("a + 1 <= b * 2"), ast("(a + 1) <= (b * 2)"));
}

#[test]
fn test_unary_vs_binary() {
    assert_eq!(ast("--a"), ast("-(-a)"));
    assert_eq!(ast("-a + b"), ast("(-a) + b"));
    assert_eq!(ast("a + -b"), ast("a + (-b)"));
    assert_eq!(ast("!a && b"), ast("(!a) && b"));
    assert_eq!(ast("-a * b"), ast("(-a) * b"));
}

#[test]
fn test_exponentiation() {
    assert_eq!(ast("a ^ b ^ c"), ast("a ^ (b ^ c)"));
    assert_eq!(ast("a * b ^ c"), ast("a * (b ^ c)"));
    // Unary minus binds looser than `^`.
    assert_eq!(ast("-a ^ b"), ast("-(a ^ b)"));
}

#[test]
fn test_calls_are_primaries() {
    assert_eq!(ast("f(a) + g(b) * c"), ast("f(a) + (g(b) * c)"));
    assert_eq!(ast("f(a + b, c)"), ast("f((a + b), c)"));
}
