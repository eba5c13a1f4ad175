//! The evaluation context.
//!
//! Binds the four namespaces an expression can refer to:
//!
//! - functions (including every operator, registered by its symbol),
//! - plain variables and constants,
//! - dynamic variables, resolved per row through [`DynamicResolver`]s,
//! - scope constants, resolved once through [`ConstantResolver`]s.
//!
//! The context also owns the row cursor. Producers never read it directly:
//! each `evaluate_*` call snapshots it into an [`EvalSession`].

use super::{Constant, ContextOptions, HostJob};
use crate::errors::{ExpressionError, Result};
use crate::evaluator::{EvalSession, ExpressionEvaluator};
use crate::parser::{self, Expr, Literal};
use crate::resolvers::{ConstantResolver, DynamicResolver, DynamicVariable, VariableCategory};
use crate::stdlib::Function;
use crate::types::ExpressionType;
use crate::values::Value;
use core::cell::Cell;
use hashbrown::HashMap;
use smallvec::SmallVec;
use std::rc::Rc;

/// Argument list handed to a function builder.
pub type Args = SmallVec<[ExpressionEvaluator; 4]>;

const VARIABLE_GROUP: &str = "variables";
const CONSTANT_GROUP: &str = "constants";

pub struct Context {
    options: ContextOptions,
    functions: HashMap<String, Rc<dyn Function>>,
    variables: HashMap<String, ExpressionEvaluator>,
    constants: HashMap<String, Constant>,
    dynamic_resolvers: Vec<Rc<dyn DynamicResolver>>,
    constant_resolvers: Vec<Rc<dyn ConstantResolver>>,
    host: Option<Rc<dyn HostJob>>,
    row: Cell<usize>,
    subexpression_depth: Cell<usize>,
}

impl Context {
    pub(crate) fn new(
        options: ContextOptions,
        functions: HashMap<String, Rc<dyn Function>>,
        variables: HashMap<String, ExpressionEvaluator>,
        constants: HashMap<String, Constant>,
        dynamic_resolvers: Vec<Rc<dyn DynamicResolver>>,
        constant_resolvers: Vec<Rc<dyn ConstantResolver>>,
        host: Option<Rc<dyn HostJob>>,
    ) -> Self {
        Self {
            options,
            functions,
            variables,
            constants,
            dynamic_resolvers,
            constant_resolvers,
            host,
            row: Cell::new(0),
            subexpression_depth: Cell::new(0),
        }
    }

    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    pub fn host(&self) -> Option<&Rc<dyn HostJob>> {
        self.host.as_ref()
    }

    /// Moves the row cursor. Takes effect on the next `evaluate_*` call.
    pub fn set_row_index(&self, row: usize) {
        self.row.set(row);
    }

    pub fn row_index(&self) -> usize {
        self.row.get()
    }

    /// Session for evaluating against the current row.
    pub fn session(&self) -> EvalSession {
        EvalSession::new(self.row.get())
    }

    /// Fails with [`ExpressionError::Aborted`] once the host has cancelled.
    pub fn check_cancelled(&self) -> Result<()> {
        match &self.host {
            Some(host) if host.is_cancelled() => {
                tracing::debug!("evaluation cancelled by host");
                Err(ExpressionError::Aborted)
            }
            _ => Ok(()),
        }
    }

    pub fn function(&self, name: &str) -> Option<&Rc<dyn Function>> {
        self.functions.get(name)
    }

    /// All registered functions, sorted by name.
    pub fn all_functions(&self) -> Vec<Rc<dyn Function>> {
        let mut functions: Vec<_> = self.functions.values().cloned().collect();
        functions.sort_by(|a, b| a.name().cmp(b.name()));
        functions
    }

    pub fn constant(&self, name: &str) -> Option<&Constant> {
        self.constants.get(name)
    }

    /// Every name an expression can refer to, for tooling.
    ///
    /// Dynamic variables come first, then scope constants, plain variables
    /// and visible constants. Invisible constants are left out.
    pub fn all_variables(&self) -> Vec<DynamicVariable> {
        let mut out: Vec<DynamicVariable> = self
            .dynamic_resolvers
            .iter()
            .flat_map(|r| r.all_variables())
            .chain(self.constant_resolvers.iter().flat_map(|r| r.all_variables()))
            .collect();

        let mut variables: Vec<_> = self.variables.iter().collect();
        variables.sort_by(|a, b| a.0.cmp(b.0));
        out.extend(variables.into_iter().map(|(name, node)| {
            DynamicVariable::new(name.as_str(), VariableCategory::Scope, VARIABLE_GROUP, node.ty())
        }));

        let mut constants: Vec<_> = self.constants.values().filter(|c| !c.invisible).collect();
        constants.sort_by(|a, b| a.name.cmp(&b.name));
        out.extend(constants.into_iter().map(|c| {
            DynamicVariable::new(c.name.as_str(), VariableCategory::Scope, CONSTANT_GROUP, c.value.ty())
        }));
        out
    }

    // ------------------------------------------------------------------------
    // Name resolution
    // ------------------------------------------------------------------------

    /// Type of the dynamic variable `name`, from the first resolver that
    /// knows it.
    pub fn dynamic_type(&self, name: &str) -> Option<ExpressionType> {
        self.dynamic_resolvers
            .iter()
            .find_map(|r| r.variable_type(name))
    }

    /// Per-row node for the dynamic variable `name`.
    pub fn dynamic_node(&self, name: &str) -> Option<ExpressionEvaluator> {
        let (resolver, ty) = self
            .dynamic_resolvers
            .iter()
            .find_map(|r| r.variable_type(name).map(|ty| (r.clone(), ty)))?;
        Some(dynamic_producer(resolver, name.to_string(), ty))
    }

    /// Current text of the scope constant `name`.
    ///
    /// The outer `None` means no resolver knows the name; the inner one that
    /// it is known but unset.
    pub fn scope_value(&self, name: &str) -> Option<Option<String>> {
        let mut known = false;
        for resolver in &self.constant_resolvers {
            if let Some(value) = resolver.string_value(name) {
                return Some(Some(value));
            }
            known |= resolver.variable_type(name).is_some();
        }
        known.then_some(None)
    }

    fn identifier_node(&self, name: &str) -> Result<ExpressionEvaluator> {
        if let Some(node) = self.dynamic_node(name) {
            return Ok(node);
        }
        if let Some(node) = self.variables.get(name) {
            return Ok(node.clone());
        }
        if let Some(constant) = self.constants.get(name) {
            return Ok(ExpressionEvaluator::constant(constant.value.clone()));
        }
        Err(ExpressionError::UnknownIdentifier {
            name: name.to_string(),
        })
    }

    // ------------------------------------------------------------------------
    // Building evaluator trees
    // ------------------------------------------------------------------------

    /// Parses `source` and builds its evaluator tree.
    pub fn compile_source(self: &Rc<Self>, source: &str) -> Result<ExpressionEvaluator> {
        let expr = parser::parse_with_max_depth(source, self.options.max_nesting_depth)?;
        self.compile(&expr)
    }

    /// Builds the evaluator tree of a parsed expression.
    pub fn compile(self: &Rc<Self>, expr: &Expr) -> Result<ExpressionEvaluator> {
        match expr {
            Expr::Literal(Literal::Integer(v)) => Ok(ExpressionEvaluator::constant(Value::Integer(*v))),
            Expr::Literal(Literal::Double(v)) => Ok(ExpressionEvaluator::constant(Value::Double(*v))),
            Expr::Literal(Literal::Str(s)) => Ok(ExpressionEvaluator::constant(Value::string(s.as_str()))),
            Expr::Ident(name) => self.identifier_node(name),
            Expr::Attribute(name) => {
                self.dynamic_node(name)
                    .ok_or_else(|| ExpressionError::UnknownIdentifier { name: name.clone() })
            }
            Expr::Scope(name) => match self.scope_value(name) {
                Some(value) => Ok(ExpressionEvaluator::constant(Value::String(value))),
                None => Err(ExpressionError::UnknownIdentifier { name: name.clone() }),
            },
            Expr::Macro(name) => match self.scope_value(name) {
                Some(Some(text)) => self
                    .compile_nested(&text)
                    .map_err(|e| ExpressionError::subexpression(&format!("#{{{name}}}"), e)),
                Some(None) => Err(ExpressionError::value_error(
                    &format!("#{{{name}}}"),
                    "the scope constant has no value",
                )),
                None => Err(ExpressionError::UnknownIdentifier { name: name.clone() }),
            },
            Expr::Unary { op, expr } => {
                let args: Args = smallvec::smallvec![self.compile(expr)?];
                self.call(op.symbol(), &args)
            }
            Expr::Binary { op, left, right } => {
                let args: Args = smallvec::smallvec![self.compile(left)?, self.compile(right)?];
                self.call(op.symbol(), &args)
            }
            Expr::Call { name, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.compile(arg))
                    .collect::<Result<Args>>()?;
                self.call(name, &args)
            }
        }
    }

    /// Dispatches to the function registered as `name`.
    pub fn call(self: &Rc<Self>, name: &str, args: &[ExpressionEvaluator]) -> Result<ExpressionEvaluator> {
        let function = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| ExpressionError::UnknownFunction {
                name: name.to_string(),
            })?;
        tracing::trace!(function = name, args = args.len(), "dispatching function");
        function.compute(self, args)
    }

    /// Parses and builds a nested expression, as `eval` and `#{...}` do.
    ///
    /// Bounded by [`ContextOptions::max_subexpression_depth`].
    pub fn compile_nested(self: &Rc<Self>, source: &str) -> Result<ExpressionEvaluator> {
        self.check_cancelled()?;
        let depth = self.subexpression_depth.get() + 1;
        if depth > self.options.max_subexpression_depth {
            return Err(ExpressionError::value_error(
                "eval",
                format!(
                    "sub-expressions nested deeper than {} levels",
                    self.options.max_subexpression_depth
                ),
            ));
        }
        tracing::debug!(depth, source, "parsing nested expression");
        self.subexpression_depth.set(depth);
        let result = self.compile_source(source);
        self.subexpression_depth.set(depth - 1);
        result
    }
}

fn dynamic_producer(
    resolver: Rc<dyn DynamicResolver>,
    name: String,
    ty: ExpressionType,
) -> ExpressionEvaluator {
    match ty {
        ExpressionType::Integer | ExpressionType::Double => {
            ExpressionEvaluator::numeric(ty, false, move |s| resolver.numeric_value(&name, s.row()))
        }
        ExpressionType::String => {
            ExpressionEvaluator::text(false, move |s| resolver.text_value(&name, s.row()))
        }
        ExpressionType::Boolean => {
            ExpressionEvaluator::boolean(false, move |s| resolver.boolean_value(&name, s.row()))
        }
        ExpressionType::Instant => {
            ExpressionEvaluator::instant(false, move |s| resolver.instant_value(&name, s.row()))
        }
        ExpressionType::LocalTime => {
            ExpressionEvaluator::local_time(false, move |s| resolver.local_time_value(&name, s.row()))
        }
        ExpressionType::StringSet => {
            ExpressionEvaluator::string_set(false, move |s| resolver.string_set_value(&name, s.row()))
        }
        ExpressionType::StringList => {
            ExpressionEvaluator::string_list(false, move |s| resolver.string_list_value(&name, s.row()))
        }
    }
}
