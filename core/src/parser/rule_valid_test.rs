// Tests with valid expressions for each rule in the parser.

use crate::parser::{ExpressionGrammar, Rule};
use pest::Parser;
use pest::iterators::Pair;

fn contains_rule(pair: Pair<Rule>, target: Rule) -> bool {
    if pair.as_rule() == target {
        return true;
    }
    for inner in pair.into_inner() {
        if contains_rule(inner, target) {
            return true;
        }
    }
    false
}

macro_rules! rule_examples {
    ( $($rule:ident => [$($expr:expr),* $(,)?]),* $(,)? ) => {
        $(
            #[test]
            fn $rule() {
                let inputs = vec![$($expr),*];
                for input in inputs {
                    let result = ExpressionGrammar::parse(Rule::main, input)
                        .unwrap_or_else(|e| panic!("Failed to parse '{}': {}", input, e));
                    let root = result.into_iter().next().unwrap();
                    assert!(
                        contains_rule(root.clone(), Rule::$rule),
                        "Expected to find rule {:?} in parse tree for input '{}'",
                        Rule::$rule,
                        input
                    );
                }
            }
        )*
    };
}

rule_examples! {
    integer => ["42", "0", "-99"],
    float => ["3.14", "2.", ".5", "6.022e23", "1.6E-19", "-0.001"],
    string => ["\"hello\"", "\"escaped \\\" quote\"", "\"unicode: \\u0041\"", "\"\""],
    ident => ["foo", "_bar123", "TRUE"],
    call => ["f()", "f(1)", "round(1.3333, 2)", "concat(\"a\", b, [c])"],
    attribute => ["[a]", "[nominal 1]", "[with \\] bracket]"],
    scope => ["%{name}", "%{process name}"],
    macro_expr => ["#{threshold}"],
    grouped => ["(1)", "((a))", "(a + b) * c"],
    add => ["1 + 2", "a * (b + c)"],
    sub => ["1 - 2"],
    mul => ["1 * 2"],
    div => ["1 / 2"],
    rem => ["4%3", "a % b"],
    pow => ["2 ^ 3", "a^b"],
    neg => ["-a", "--1", "a + -b"],
    plus => ["+1"],
    not => ["!a", "!!true"],
    and => ["a && b"],
    or => ["a || b"],
    eq => ["a == b"],
    ne => ["a != b"],
    lt => ["a < b"],
    le => ["a <= b"],
    gt => ["a > b"],
    ge => ["a >= b"],
}

#[test]
fn test_invalid_expressions() {
    for input in ["", "1 +", "f(,)", "(1", "[]", "%{}", "a = b", "1 2"] {
        assert!(
            ExpressionGrammar::parse(Rule::main, input).is_err(),
            "Expected '{}' to be rejected",
            input
        );
    }
}
