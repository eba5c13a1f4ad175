//! Context builder for registering functions, variables and resolvers.

use super::{Context, ContextOptions, HostJob};
use crate::evaluator::ExpressionEvaluator;
use crate::resolvers::{ConstantResolver, DynamicResolver, MacroResolver, MacroStore, TableResolver};
use crate::stdlib::{self, Function};
use crate::table::Table;
use crate::values::Value;
use hashbrown::HashMap;
use std::rc::Rc;

/// Engine or module supplied named value.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub name: String,
    pub value: Value,
    pub doc: Option<String>,
    /// Hidden from tooling listings, still resolvable.
    pub invisible: bool,
}

impl Constant {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
            doc: None,
            invisible: false,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn invisible(mut self) -> Self {
        self.invisible = true;
        self
    }
}

/// Builder for constructing a [`Context`].
///
/// The standard functions and constants are always registered. Functions,
/// variables and constants added later replace earlier ones with the same
/// name. Dynamic resolvers are consulted in registration order.
///
/// # Example
///
/// ```
/// use colexpr_core::api::{ContextBuilder, ExpressionParser};
/// use colexpr_core::table::{Column, ColumnData, Table};
///
/// let table = Table::new(vec![Column::new("price", ColumnData::Real(vec![1.5, 2.5]))]).unwrap();
/// let context = ContextBuilder::new().with_table(table).build();
/// let expr = ExpressionParser::new(context.clone()).parse("price * 2").unwrap();
///
/// context.set_row_index(1);
/// assert_eq!(expr.evaluate_numerical().unwrap(), 5.0);
/// ```
#[derive(Default)]
pub struct ContextBuilder {
    options: ContextOptions,
    functions: Vec<Rc<dyn Function>>,
    variables: Vec<(String, ExpressionEvaluator)>,
    constants: Vec<Constant>,
    dynamic_resolvers: Vec<Rc<dyn DynamicResolver>>,
    constant_resolvers: Vec<Rc<dyn ConstantResolver>>,
    host: Option<Rc<dyn HostJob>>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: ContextOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve column names of `table` per row.
    pub fn with_table(self, table: Table) -> Self {
        self.with_dynamic_resolver(Rc::new(TableResolver::new(Rc::new(table))))
    }

    pub fn with_dynamic_resolver(mut self, resolver: Rc<dyn DynamicResolver>) -> Self {
        self.dynamic_resolvers.push(resolver);
        self
    }

    pub fn with_constant_resolver(mut self, resolver: Rc<dyn ConstantResolver>) -> Self {
        self.constant_resolvers.push(resolver);
        self
    }

    /// Expose the host's macros as scope constants.
    pub fn with_macros(self, store: Rc<dyn MacroStore>) -> Self {
        self.with_constant_resolver(Rc::new(MacroResolver::new(store)))
    }

    pub fn with_host(mut self, host: Rc<dyn HostJob>) -> Self {
        self.host = Some(host);
        self
    }

    /// Bind `name` to a node that is not row-indexed.
    pub fn with_variable(mut self, name: impl Into<String>, node: ExpressionEvaluator) -> Self {
        self.variables.push((name.into(), node));
        self
    }

    pub fn with_constant(mut self, constant: Constant) -> Self {
        self.constants.push(constant);
        self
    }

    pub fn with_function(mut self, function: Rc<dyn Function>) -> Self {
        self.functions.push(function);
        self
    }

    pub fn build(self) -> Rc<Context> {
        let mut functions: HashMap<String, Rc<dyn Function>> = HashMap::new();
        let standard = stdlib::standard_functions();
        let host_functions = match &self.host {
            Some(host) => stdlib::host::host_functions(host.clone()),
            None => Vec::new(),
        };
        for function in standard.into_iter().chain(host_functions).chain(self.functions) {
            functions.insert(function.name().to_string(), function);
        }

        let mut constants: HashMap<String, Constant> = HashMap::new();
        for constant in stdlib::constants::standard_constants()
            .into_iter()
            .chain(self.constants)
        {
            constants.insert(constant.name.clone(), constant);
        }

        let variables = self.variables.into_iter().collect();

        tracing::debug!(
            functions = functions.len(),
            constants = constants.len(),
            dynamic_resolvers = self.dynamic_resolvers.len(),
            constant_resolvers = self.constant_resolvers.len(),
            host = self.host.is_some(),
            "built context"
        );

        Rc::new(Context::new(
            self.options,
            functions,
            variables,
            constants,
            self.dynamic_resolvers,
            self.constant_resolvers,
            self.host,
        ))
    }
}
