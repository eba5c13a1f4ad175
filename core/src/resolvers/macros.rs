//! Scope constants backed by the host's macro store.

use super::{ConstantResolver, DynamicVariable, VariableCategory};
use crate::types::ExpressionType;
use core::cell::RefCell;
use hashbrown::HashMap;
use std::rc::Rc;

const MACRO_GROUP: &str = "macros";

/// Host key→text store.
pub trait MacroStore {
    fn get(&self, name: &str) -> Option<String>;

    /// Names currently set.
    fn names(&self) -> Vec<String>;

    /// Names that are always listed, even while unset.
    fn predefined(&self) -> Vec<String> {
        Vec::new()
    }
}

/// `HashMap`-backed [`MacroStore`].
#[derive(Debug, Default)]
pub struct MacroMap {
    values: RefCell<HashMap<String, String>>,
    predefined: Vec<String>,
}

impl MacroMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_predefined<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            values: RefCell::new(HashMap::new()),
            predefined: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.values.borrow_mut().insert(name.into(), value.into());
    }

    pub fn remove(&self, name: &str) -> Option<String> {
        self.values.borrow_mut().remove(name)
    }
}

impl MacroStore for MacroMap {
    fn get(&self, name: &str) -> Option<String> {
        self.values.borrow().get(name).cloned()
    }

    fn names(&self) -> Vec<String> {
        self.values.borrow().keys().cloned().collect()
    }

    fn predefined(&self) -> Vec<String> {
        self.predefined.clone()
    }
}

/// Adapts a [`MacroStore`] to the [`ConstantResolver`] interface.
pub struct MacroResolver {
    store: Rc<dyn MacroStore>,
}

impl MacroResolver {
    pub fn new(store: Rc<dyn MacroStore>) -> Self {
        Self { store }
    }

    fn is_predefined(&self, name: &str) -> bool {
        self.store.predefined().iter().any(|n| n == name)
    }
}

impl ConstantResolver for MacroResolver {
    fn all_variables(&self) -> Vec<DynamicVariable> {
        let mut names = self.store.names();
        names.extend(self.store.predefined());
        names.sort();
        names.dedup();
        names
            .into_iter()
            .map(|name| {
                DynamicVariable::new(
                    name,
                    VariableCategory::Scope,
                    MACRO_GROUP,
                    ExpressionType::String,
                )
            })
            .collect()
    }

    fn variable_type(&self, name: &str) -> Option<ExpressionType> {
        if self.store.get(name).is_some() || self.is_predefined(name) {
            Some(ExpressionType::String)
        } else {
            None
        }
    }

    fn string_value(&self, name: &str) -> Option<String> {
        self.store.get(name)
    }
}
