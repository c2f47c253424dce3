use std::rc::Rc;

use crate::{
    ast::{
        BlockStatement, Expression, FunctionLiteral, InfixOperator, PrefixOperator, Program,
        Statement,
    },
    tokenizer::{Token, TokenType, Tokenizer},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("expected next token to be {expected}, got {found} instead")]
    ExpectedToken {
        expected: TokenType,
        found: TokenType,
    },
    #[error("no prefix parse function for {0} found")]
    NoPrefixRule(TokenType),
    #[error("could not parse {0:?} as integer")]
    InvalidInteger(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrors(pub Vec<ParseError>);

impl std::error::Error for ParseErrors {}

impl std::fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Found {} errors during parsing", self.0.len())?;
        for error in &self.0 {
            writeln!(f, "\t{}", error)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Equality,   // == !=
    Comparison, // < >
    Term,       // + -
    Factor,     // * /
    Unary,      // ! -
    Call,       // ()
}

fn infix_precedence(token_type: TokenType) -> Precedence {
    match token_type {
        TokenType::EqualEqual | TokenType::BangEqual => Precedence::Equality,
        TokenType::Less | TokenType::Greater => Precedence::Comparison,
        TokenType::Plus | TokenType::Minus => Precedence::Term,
        TokenType::Star | TokenType::Slash => Precedence::Factor,
        TokenType::LeftParen => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

type PrefixRule<'a> = fn(&mut Parser<'a>) -> Option<Expression>;
type InfixRule<'a> = fn(&mut Parser<'a>, Expression) -> Option<Expression>;

fn prefix_rule<'a>(token_type: TokenType) -> Option<PrefixRule<'a>> {
    match token_type {
        TokenType::Identifier => Some(Parser::identifier),
        TokenType::Integer => Some(Parser::integer),
        TokenType::True | TokenType::False => Some(Parser::boolean),
        TokenType::Bang | TokenType::Minus => Some(Parser::prefix),
        TokenType::LeftParen => Some(Parser::grouping),
        TokenType::If => Some(Parser::if_expression),
        TokenType::Fn => Some(Parser::function),
        _ => None,
    }
}

fn infix_rule<'a>(token_type: TokenType) -> Option<InfixRule<'a>> {
    match token_type {
        TokenType::Plus
        | TokenType::Minus
        | TokenType::Star
        | TokenType::Slash
        | TokenType::EqualEqual
        | TokenType::BangEqual
        | TokenType::Less
        | TokenType::Greater => Some(Parser::binary),
        TokenType::LeftParen => Some(Parser::call),
        _ => None,
    }
}

/// Parses a whole source string, failing if any error was recorded.
pub fn parse(source: &str) -> Result<Program, ParseErrors> {
    let (program, errors) = Parser::new(Tokenizer::new(source)).parse();
    if errors.is_empty() {
        Ok(program)
    } else {
        Err(ParseErrors(errors))
    }
}

/// Operator-precedence parser pulling tokens from a [`Tokenizer`].
///
/// Holds the current token and one token of lookahead. Errors are collected
/// rather than returned early, so a single malformed statement does not hide
/// diagnostics for the rest of the input.
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    current: Token<'a>,
    next: Token<'a>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(mut tokenizer: Tokenizer<'a>) -> Self {
        let current = tokenizer.token();
        let next = tokenizer.token();
        Self {
            tokenizer,
            current,
            next,
            errors: Vec::new(),
        }
    }

    /// Parses the remaining input. The program must not be trusted unless
    /// the returned error list is empty.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse(mut self) -> (Program, Vec<ParseError>) {
        let mut statements = Vec::new();

        while self.current.token_type != TokenType::Eof {
            if let Some(statement) = self.statement() {
                statements.push(statement);
            }
            self.advance();
        }

        tracing::debug!(
            statements = statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        (Program(statements), self.errors)
    }

    fn advance(&mut self) {
        self.current = self.next;
        self.next = self.tokenizer.token();
    }

    fn current_is(&self, token_type: TokenType) -> bool {
        self.current.token_type == token_type
    }

    fn next_is(&self, token_type: TokenType) -> bool {
        self.next.token_type == token_type
    }

    fn error(&mut self, error: ParseError) {
        tracing::debug!(%error, "parse error");
        self.errors.push(error);
    }

    /// Advances onto the next token if it has the expected type, otherwise
    /// records an error and leaves the position unchanged.
    fn consume(&mut self, token_type: TokenType) -> Option<()> {
        if self.next_is(token_type) {
            self.advance();
            Some(())
        } else {
            self.error(ParseError::ExpectedToken {
                expected: token_type,
                found: self.next.token_type,
            });
            None
        }
    }

    fn skip_semicolon(&mut self) {
        if self.next_is(TokenType::Semicolon) {
            self.advance();
        }
    }

    fn statement(&mut self) -> Option<Statement> {
        match self.current.token_type {
            TokenType::Let => self.let_statement(),
            TokenType::Return => self.return_statement(),
            _ => self.expression_statement(),
        }
    }

    fn let_statement(&mut self) -> Option<Statement> {
        self.consume(TokenType::Identifier)?;
        let name = self.current.lexeme.to_string();
        self.consume(TokenType::Equal)?;
        self.advance();
        let value = self.expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Some(Statement::Let(name, value))
    }

    fn return_statement(&mut self) -> Option<Statement> {
        if matches!(
            self.next.token_type,
            TokenType::Semicolon | TokenType::RightBrace | TokenType::Eof
        ) {
            self.skip_semicolon();
            return Some(Statement::Return(None));
        }
        self.advance();
        let value = self.expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Some(Statement::Return(Some(value)))
    }

    fn expression_statement(&mut self) -> Option<Statement> {
        let expr = self.expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Some(Statement::Expression(expr))
    }

    /// Expects the current token to be `{` and leaves the parser on the
    /// closing `}` (or on `Eof` for an unterminated block).
    fn block(&mut self) -> BlockStatement {
        let mut statements = Vec::new();
        self.advance();

        while !self.current_is(TokenType::RightBrace) && !self.current_is(TokenType::Eof) {
            if let Some(statement) = self.statement() {
                statements.push(statement);
            }
            self.advance();
        }

        BlockStatement(statements)
    }

    fn expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let Some(prefix) = prefix_rule(self.current.token_type) else {
            self.error(ParseError::NoPrefixRule(self.current.token_type));
            return None;
        };
        let mut left = prefix(self)?;

        while !self.next_is(TokenType::Semicolon)
            && precedence < infix_precedence(self.next.token_type)
        {
            let Some(infix) = infix_rule(self.next.token_type) else {
                return Some(left);
            };
            self.advance();
            left = infix(self, left)?;
        }

        Some(left)
    }

    fn identifier(&mut self) -> Option<Expression> {
        Some(Expression::Identifier(self.current.lexeme.to_string()))
    }

    fn integer(&mut self) -> Option<Expression> {
        match self.current.lexeme.parse::<i64>() {
            Ok(n) => Some(Expression::Integer(n)),
            Err(_) => {
                self.error(ParseError::InvalidInteger(self.current.lexeme.to_string()));
                None
            }
        }
    }

    fn boolean(&mut self) -> Option<Expression> {
        Some(Expression::Boolean(self.current_is(TokenType::True)))
    }

    fn prefix(&mut self) -> Option<Expression> {
        let operator = match self.current.token_type {
            TokenType::Bang => PrefixOperator::Not,
            TokenType::Minus => PrefixOperator::Negate,
            _ => unreachable!(),
        };
        self.advance();
        let right = self.expression(Precedence::Unary)?;
        Some(Expression::Prefix(operator, Box::new(right)))
    }

    fn grouping(&mut self) -> Option<Expression> {
        self.advance();
        let expr = self.expression(Precedence::Lowest)?;
        self.consume(TokenType::RightParen)?;
        Some(expr)
    }

    fn if_expression(&mut self) -> Option<Expression> {
        self.consume(TokenType::LeftParen)?;
        self.advance();
        let condition = self.expression(Precedence::Lowest)?;
        self.consume(TokenType::RightParen)?;
        self.consume(TokenType::LeftBrace)?;
        let consequence = self.block();

        let alternative = if self.next_is(TokenType::Else) {
            self.advance();
            self.consume(TokenType::LeftBrace)?;
            Some(self.block())
        } else {
            None
        };

        Some(Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn function(&mut self) -> Option<Expression> {
        self.consume(TokenType::LeftParen)?;
        let parameters = self.parameters()?;
        self.consume(TokenType::LeftBrace)?;
        let body = self.block();
        Some(Expression::Function(Rc::new(FunctionLiteral {
            parameters,
            body,
        })))
    }

    fn parameters(&mut self) -> Option<Vec<String>> {
        let mut parameters = Vec::new();
        if self.next_is(TokenType::RightParen) {
            self.advance();
            return Some(parameters);
        }

        self.consume(TokenType::Identifier)?;
        parameters.push(self.current.lexeme.to_string());
        while self.next_is(TokenType::Comma) {
            self.advance();
            self.consume(TokenType::Identifier)?;
            parameters.push(self.current.lexeme.to_string());
        }
        self.consume(TokenType::RightParen)?;

        Some(parameters)
    }

    fn binary(&mut self, left: Expression) -> Option<Expression> {
        let operator = match self.current.token_type {
            TokenType::Plus => InfixOperator::Plus,
            TokenType::Minus => InfixOperator::Minus,
            TokenType::Star => InfixOperator::Multiply,
            TokenType::Slash => InfixOperator::Divide,
            TokenType::EqualEqual => InfixOperator::Equal,
            TokenType::BangEqual => InfixOperator::NotEqual,
            TokenType::Less => InfixOperator::LessThan,
            TokenType::Greater => InfixOperator::GreaterThan,
            _ => unreachable!(),
        };
        let precedence = infix_precedence(self.current.token_type);
        self.advance();
        let right = self.expression(precedence)?;
        Some(Expression::Infix(Box::new(left), operator, Box::new(right)))
    }

    fn call(&mut self, callee: Expression) -> Option<Expression> {
        let mut args = Vec::new();
        if self.next_is(TokenType::RightParen) {
            self.advance();
            return Some(Expression::Call(Box::new(callee), args));
        }

        self.advance();
        args.push(self.expression(Precedence::Lowest)?);
        while self.next_is(TokenType::Comma) {
            self.advance();
            self.advance();
            args.push(self.expression(Precedence::Lowest)?);
        }
        self.consume(TokenType::RightParen)?;

        Some(Expression::Call(Box::new(callee), args))
    }
}
