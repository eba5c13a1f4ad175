use crate::parser::{BinaryOp, UnaryOp};

/// Parse tree of one expression.
///
/// Short-lived: the context turns it into evaluator nodes right away.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// Bare name, resolved dynamic → variable → constant.
    Ident(String),
    /// `[name]`, resolved against dynamic variables only.
    Attribute(String),
    /// `%{name}`, the text value of a scope constant.
    Scope(String),
    /// `#{name}`, a scope constant parsed as an expression.
    Macro(String),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Digits without a fraction or exponent.
    Integer(f64),
    Double(f64),
    Str(String),
}

impl Expr {
    /// Nesting depth of the tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1usize)];
        while let Some((expr, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            match expr {
                Expr::Unary { expr, .. } => pending.push((expr, depth + 1)),
                Expr::Binary { left, right, .. } => {
                    pending.push((left, depth + 1));
                    pending.push((right, depth + 1));
                }
                Expr::Call { args, .. } => pending.extend(args.iter().map(|a| (a, depth + 1))),
                Expr::Literal(_)
                | Expr::Ident(_)
                | Expr::Attribute(_)
                | Expr::Scope(_)
                | Expr::Macro(_) => {}
            }
        }
        deepest
    }
}
