use std::{fmt::Display, rc::Rc};

use super::{callable::Closure, RuntimeError};

pub const TRUE: Value = Value::Boolean(true);
pub const FALSE: Value = Value::Boolean(false);
pub const NULL: Value = Value::Null;

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Null,
    Function(Rc<Closure>),
    /// Carries a `return` out of nested blocks up to the enclosing call.
    Return(Box<Value>),
    Error(RuntimeError),
}

impl Value {
    pub fn from_bool(b: bool) -> Value {
        if b {
            TRUE
        } else {
            FALSE
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            _ => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::Null => "NULL",
            Value::Function(_) => "FUNCTION",
            Value::Return(_) => "RETURN_VALUE",
            Value::Error(_) => "ERROR",
        }
    }

    /// Equality for `==`/`!=` on operands that are not both integers.
    ///
    /// Booleans and null behave like shared singletons and functions compare
    /// by reference, so this is identity rather than structural equality.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Return(a), Value::Return(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (a, b) => a.is_identical(b),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
            Value::Function(closure) => write!(f, "{}", closure),
            Value::Return(value) => write!(f, "{}", value),
            Value::Error(error) => write!(f, "ERROR: {}", error),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(Value::Integer(0).is_truthy());
        assert!(TRUE.is_truthy());
        assert!(!FALSE.is_truthy());
        assert!(!NULL.is_truthy());
    }

    #[test]
    fn test_identity_never_matches_integers() {
        assert!(!Value::Integer(1).is_identical(&Value::Integer(1)));
        assert!(!TRUE.is_identical(&Value::Integer(1)));
        assert!(NULL.is_identical(&Value::Null));
        assert!(Value::from_bool(false).is_identical(&FALSE));
    }

    #[test]
    fn test_inspect() {
        assert_eq!(Value::Integer(-7).to_string(), "-7");
        assert_eq!(TRUE.to_string(), "true");
        assert_eq!(NULL.to_string(), "null");
        assert_eq!(
            Value::Return(Box::new(Value::Integer(3))).to_string(),
            "3"
        );
        assert_eq!(
            Value::Error(RuntimeError::IdentifierNotFound("x".to_string())).to_string(),
            "ERROR: identifier not found: x"
        );
    }
}
