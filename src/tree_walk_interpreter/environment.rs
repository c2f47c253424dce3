use std::{cell::RefCell, fmt::Debug, rc::Rc};

use rustc_hash::FxHashMap;

use super::Value;

/// Shared handle to a scope frame. Closures and call frames hold these, so a
/// frame lives as long as its longest holder.
pub type Env = Rc<RefCell<Environment>>;

#[derive(Default)]
pub struct Environment {
    store: FxHashMap<String, Value>,
    outer: Option<Env>,
}

impl Environment {
    pub fn new(outer: Option<Env>) -> Self {
        Self {
            store: FxHashMap::default(),
            outer,
        }
    }

    pub fn boxed(outer: Option<Env>) -> Env {
        Rc::new(RefCell::new(Self::new(outer)))
    }

    /// A fresh root frame for a session.
    pub fn global() -> Env {
        Self::boxed(None)
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.store.get(name) {
            Some(value.clone())
        } else if let Some(outer) = &self.outer {
            outer.borrow().get(name)
        } else {
            None
        }
    }

    pub fn set(&mut self, name: String, value: Value) {
        self.store.insert(name, value);
    }

    pub fn outer(&self) -> Option<&Env> {
        self.outer.as_ref()
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(format!("Environment<{:?}>", std::ptr::from_ref(self)).as_str())
            .field(
                "store",
                &self
                    .store
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_string()))
                    .collect::<Vec<_>>(),
            )
            .field("outer", &self.outer.as_ref().map(|o| o.as_ptr()))
            .finish()
    }
}
