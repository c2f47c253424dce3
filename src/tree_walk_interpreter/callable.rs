use std::{fmt::Display, rc::Rc};

use crate::ast::FunctionLiteral;

use super::{
    environment::{Env, Environment},
    Interpreter, RuntimeError, Value,
};

/// A function value: the literal it was created from plus the environment
/// that was active where the literal was evaluated.
#[derive(Clone)]
pub struct Closure {
    pub function: Rc<FunctionLiteral>,
    pub env: Env,
}

impl std::fmt::Debug for Closure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Closure")
            .field("env", &self.env.as_ptr())
            .field("function", &self.function)
            .finish()
    }
}

impl Closure {
    pub fn new(function: Rc<FunctionLiteral>, env: Env) -> Self {
        Self { function, env }
    }

    pub fn arity(&self) -> usize {
        self.function.parameters.len()
    }

    /// Binds `args` in a new frame whose outer link is the definition-site
    /// environment, evaluates the body there and unwraps any `return`.
    pub(super) fn call(
        &self,
        interpreter: &mut Interpreter,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        if args.len() != self.arity() {
            return Err(RuntimeError::WrongArgumentCount {
                expected: self.arity(),
                found: args.len(),
            });
        }

        let scope = Environment::boxed(Some(self.env.clone()));
        for (name, value) in self.function.parameters.iter().zip(args) {
            tracing::trace!(%name, %value, "bind parameter");
            scope.borrow_mut().set(name.clone(), value);
        }

        let result = interpreter
            .execute_in_scope(scope, |interpreter| interpreter.block(&self.function.body))?;

        Ok(match result {
            Value::Return(value) => *value,
            value => value,
        })
    }
}

impl Display for Closure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.function)
    }
}
