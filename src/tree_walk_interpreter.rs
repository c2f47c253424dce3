mod callable;
pub mod environment;
pub mod value;

use std::{fmt::Debug, rc::Rc};

use crate::ast::{
    BlockStatement, Expression, InfixOperator, PrefixOperator, Program, Statement,
};

pub use self::{
    callable::Closure,
    environment::{Env, Environment},
    value::{Value, FALSE, NULL, TRUE},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),
    #[error("unknown operator: {operator}{right}")]
    UnknownPrefixOperator {
        operator: PrefixOperator,
        right: &'static str,
    },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: &'static str,
        operator: InfixOperator,
        right: &'static str,
    },
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: &'static str,
        operator: InfixOperator,
        right: &'static str,
    },
    #[error("not a function: {0}")]
    NotAFunction(&'static str),
    #[error("wrong number of arguments: want={expected}, got={found}")]
    WrongArgumentCount { expected: usize, found: usize },
    #[error("division by zero")]
    DivisionByZero,
}

/// Evaluates `program` against `env`, which is typically reused across
/// inputs so `let` bindings persist.
pub fn evaluate(program: &Program, env: &Env) -> Value {
    Interpreter::with_environment(env.clone()).interpret(program)
}

/// Tree-walking evaluator. `scope` is the frame new bindings go into; calls
/// swap it for the callee's frame and restore it afterwards.
#[derive(Clone)]
pub struct Interpreter {
    scope: Env,
}

impl Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("scope", &self.scope)
            .finish()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_environment(Environment::global())
    }

    pub fn with_environment(scope: Env) -> Self {
        Self { scope }
    }

    pub fn environment(&self) -> &Env {
        &self.scope
    }

    /// Runs every statement of `program` in order. A `return` at the top
    /// level ends the program with its value; a runtime error ends it with
    /// `Value::Error`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn interpret(&mut self, program: &Program) -> Value {
        let mut result = NULL;

        for stmt in program.0.iter() {
            match self.execute(stmt) {
                Ok(Value::Return(value)) => return *value,
                Ok(value) => result = value,
                Err(error) => {
                    tracing::debug!(%error, statement = %stmt, "runtime error");
                    return Value::Error(error);
                }
            }
        }

        result
    }

    fn execute(&mut self, stmt: &Statement) -> Result<Value, RuntimeError> {
        match stmt {
            Statement::Expression(expression) => self.evaluate(expression),
            Statement::Let(name, expression) => {
                let value = self.evaluate(expression)?;
                tracing::trace!(%name, %value, "let");
                self.scope.borrow_mut().set(name.clone(), value);
                Ok(NULL)
            }
            Statement::Return(expression) => {
                let value = match expression {
                    Some(expression) => self.evaluate(expression)?,
                    None => NULL,
                };
                Ok(Value::Return(Box::new(value)))
            }
        }
    }

    /// Evaluates a block in the current scope. A `return` stops the block
    /// but stays wrapped until it reaches the function call.
    fn block(&mut self, block: &BlockStatement) -> Result<Value, RuntimeError> {
        let mut result = NULL;

        for statement in block.0.iter() {
            result = self.execute(statement)?;
            if matches!(result, Value::Return(_)) {
                break;
            }
        }

        Ok(result)
    }

    fn execute_in_scope<T>(
        &mut self,
        scope: Env,
        f: impl FnOnce(&mut Self) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        let prev = std::mem::replace(&mut self.scope, scope);
        let result = f(self);
        self.scope = prev;
        result
    }

    fn evaluate(&mut self, expression: &Expression) -> Result<Value, RuntimeError> {
        match expression {
            Expression::Identifier(name) => {
                let value = self.scope.borrow().get(name);
                value.ok_or_else(|| RuntimeError::IdentifierNotFound(name.clone()))
            }
            Expression::Integer(n) => Ok(Value::Integer(*n)),
            Expression::Boolean(b) => Ok(Value::from_bool(*b)),
            Expression::Prefix(op, right) => {
                let right = self.evaluate(right)?;
                prefix(*op, right)
            }
            Expression::Infix(left, op, right) => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                infix(*op, left, right)
            }
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.block(consequence)
                } else if let Some(alternative) = alternative {
                    self.block(alternative)
                } else {
                    Ok(NULL)
                }
            }
            Expression::Function(function) => Ok(Value::Function(Rc::new(Closure::new(
                function.clone(),
                self.scope.clone(),
            )))),
            Expression::Call(callee, args) => {
                let callee = self.evaluate(callee)?;
                let args = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<Result<Vec<_>, _>>()?;

                let Value::Function(closure) = callee else {
                    return Err(RuntimeError::NotAFunction(callee.type_name()));
                };

                tracing::trace!(function = %closure, args = args.len(), "call");
                closure.call(self, args)
            }
        }
    }
}

fn prefix(op: PrefixOperator, right: Value) -> Result<Value, RuntimeError> {
    match op {
        PrefixOperator::Not => Ok(match right {
            Value::Boolean(b) => Value::from_bool(!b),
            Value::Null => TRUE,
            _ => FALSE,
        }),
        PrefixOperator::Negate => match right {
            Value::Integer(n) => Ok(Value::Integer(n.wrapping_neg())),
            right => Err(RuntimeError::UnknownPrefixOperator {
                operator: op,
                right: right.type_name(),
            }),
        },
    }
}

fn infix(op: InfixOperator, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (op, &left, &right) {
        (op, Value::Integer(a), Value::Integer(b)) => integer_infix(op, *a, *b),
        (InfixOperator::Equal, a, b) => Ok(Value::from_bool(a.is_identical(b))),
        (InfixOperator::NotEqual, a, b) => Ok(Value::from_bool(!a.is_identical(b))),
        (op, a, b) if a.type_name() != b.type_name() => Err(RuntimeError::TypeMismatch {
            left: a.type_name(),
            operator: op,
            right: b.type_name(),
        }),
        (op, a, b) => Err(RuntimeError::UnknownInfixOperator {
            left: a.type_name(),
            operator: op,
            right: b.type_name(),
        }),
    }
}

fn integer_infix(op: InfixOperator, a: i64, b: i64) -> Result<Value, RuntimeError> {
    let value = match op {
        InfixOperator::Plus => Value::Integer(a.wrapping_add(b)),
        InfixOperator::Minus => Value::Integer(a.wrapping_sub(b)),
        InfixOperator::Multiply => Value::Integer(a.wrapping_mul(b)),
        InfixOperator::Divide => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::Integer(a.wrapping_div(b))
        }
        InfixOperator::LessThan => Value::from_bool(a < b),
        InfixOperator::GreaterThan => Value::from_bool(a > b),
        InfixOperator::Equal => Value::from_bool(a == b),
        InfixOperator::NotEqual => Value::from_bool(a != b),
    };
    Ok(value)
}
