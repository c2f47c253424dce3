use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Single-character tokens
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,
    Minus,
    Plus,
    Slash,
    Star,
    Greater,
    Less,

    // One or two character tokens
    Bang,
    BangEqual,
    Equal,
    EqualEqual,

    // Literals
    Identifier,
    Integer,

    // Keywords
    Fn,
    Let,
    True,
    False,
    If,
    Else,
    Return,

    Illegal,
    Eof,
}

impl Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TokenType::LeftParen => "(",
            TokenType::RightParen => ")",
            TokenType::LeftBrace => "{",
            TokenType::RightBrace => "}",
            TokenType::Comma => ",",
            TokenType::Semicolon => ";",
            TokenType::Minus => "-",
            TokenType::Plus => "+",
            TokenType::Slash => "/",
            TokenType::Star => "*",
            TokenType::Greater => ">",
            TokenType::Less => "<",
            TokenType::Bang => "!",
            TokenType::BangEqual => "!=",
            TokenType::Equal => "=",
            TokenType::EqualEqual => "==",
            TokenType::Identifier => "IDENT",
            TokenType::Integer => "INT",
            TokenType::Fn => "FUNCTION",
            TokenType::Let => "LET",
            TokenType::True => "TRUE",
            TokenType::False => "FALSE",
            TokenType::If => "IF",
            TokenType::Else => "ELSE",
            TokenType::Return => "RETURN",
            TokenType::Illegal => "ILLEGAL",
            TokenType::Eof => "EOF",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub token_type: TokenType,
    pub lexeme: &'a str,
}

impl<'a> Token<'a> {
    fn new(token_type: TokenType, lexeme: &'a str) -> Self {
        Self { token_type, lexeme }
    }
}

fn keyword(ident: &str) -> Option<TokenType> {
    match ident {
        "fn" => Some(TokenType::Fn),
        "let" => Some(TokenType::Let),
        "true" => Some(TokenType::True),
        "false" => Some(TokenType::False),
        "if" => Some(TokenType::If),
        "else" => Some(TokenType::Else),
        "return" => Some(TokenType::Return),
        _ => None,
    }
}

/// Pull-based tokenizer over a source string.
///
/// `position` is the offset of `current`, `read_position` the offset of the
/// byte after it. Once the end of input is reached every call to
/// [`Tokenizer::token`] yields [`TokenType::Eof`].
pub struct Tokenizer<'a> {
    source: &'a str,
    position: usize,
    read_position: usize,
    current: Option<u8>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut tokenizer = Self {
            source,
            position: 0,
            read_position: 0,
            current: None,
        };
        tokenizer.advance();
        tokenizer
    }

    fn advance(&mut self) {
        self.current = self.source.as_bytes().get(self.read_position).copied();
        self.position = self.read_position.min(self.source.len());
        if self.read_position < self.source.len() {
            self.read_position += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.read_position).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current, Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.advance();
        }
    }

    fn take_while(&mut self, predicate: impl Fn(u8) -> bool) -> &'a str {
        let start = self.position;
        while self.current.is_some_and(&predicate) {
            self.advance();
        }
        &self.source[start..self.position]
    }

    fn single(&mut self, token_type: TokenType) -> Token<'a> {
        let start = self.position;
        self.advance();
        Token::new(token_type, &self.source[start..self.position])
    }

    fn one_or_two(&mut self, one: TokenType, two: TokenType) -> Token<'a> {
        if self.peek() == Some(b'=') {
            let start = self.position;
            self.advance();
            self.advance();
            Token::new(two, &self.source[start..self.position])
        } else {
            self.single(one)
        }
    }

    pub fn token(&mut self) -> Token<'a> {
        self.skip_whitespace();

        let Some(c) = self.current else {
            return Token::new(TokenType::Eof, "");
        };

        match c {
            b'(' => self.single(TokenType::LeftParen),
            b')' => self.single(TokenType::RightParen),
            b'{' => self.single(TokenType::LeftBrace),
            b'}' => self.single(TokenType::RightBrace),
            b',' => self.single(TokenType::Comma),
            b';' => self.single(TokenType::Semicolon),
            b'-' => self.single(TokenType::Minus),
            b'+' => self.single(TokenType::Plus),
            b'/' => self.single(TokenType::Slash),
            b'*' => self.single(TokenType::Star),
            b'>' => self.single(TokenType::Greater),
            b'<' => self.single(TokenType::Less),
            b'!' => self.one_or_two(TokenType::Bang, TokenType::BangEqual),
            b'=' => self.one_or_two(TokenType::Equal, TokenType::EqualEqual),
            c if is_letter(c) => {
                let ident = self.take_while(is_letter);
                Token::new(keyword(ident).unwrap_or(TokenType::Identifier), ident)
            }
            c if c.is_ascii_digit() => {
                let digits = self.take_while(|c| c.is_ascii_digit());
                Token::new(TokenType::Integer, digits)
            }
            _ => self.illegal(),
        }
    }

    // Non-ASCII input is reported one whole character at a time so the
    // lexeme stays a valid str slice.
    fn illegal(&mut self) -> Token<'a> {
        let start = self.position;
        let len = self.source[start..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        for _ in 0..len {
            self.advance();
        }
        Token::new(TokenType::Illegal, &self.source[start..start + len])
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.token();
        (token.token_type != TokenType::Eof).then_some(token)
    }
}

fn is_letter(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

/// Tokenizes the whole source, including the trailing `Eof`.
pub fn tokens(source: &str) -> Vec<Token<'_>> {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = tokenizer.token();
        tokens.push(token);
        if token.token_type == TokenType::Eof {
            break;
        }
    }

    tokens
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenType, &str)> {
        tokens(source)
            .into_iter()
            .map(|t| (t.token_type, t.lexeme))
            .collect()
    }

    #[test]
    fn test_let_statement() {
        let expected = vec![
            (TokenType::Let, "let"),
            (TokenType::Identifier, "five"),
            (TokenType::Equal, "="),
            (TokenType::Integer, "5"),
            (TokenType::Semicolon, ";"),
            (TokenType::Eof, ""),
        ];
        assert_eq!(kinds("let five = 5;"), expected);
    }

    #[test]
    fn test_eof_is_terminal() {
        let mut tokenizer = Tokenizer::new("x");
        assert_eq!(tokenizer.token().token_type, TokenType::Identifier);
        for _ in 0..3 {
            assert_eq!(tokenizer.token(), Token::new(TokenType::Eof, ""));
        }
    }

    #[test]
    fn test_operators_and_delimiters() {
        let source = "=+(){},;-!*/<>";
        let expected: Vec<TokenType> = vec![
            TokenType::Equal,
            TokenType::Plus,
            TokenType::LeftParen,
            TokenType::RightParen,
            TokenType::LeftBrace,
            TokenType::RightBrace,
            TokenType::Comma,
            TokenType::Semicolon,
            TokenType::Minus,
            TokenType::Bang,
            TokenType::Star,
            TokenType::Slash,
            TokenType::Less,
            TokenType::Greater,
        ];
        let found: Vec<TokenType> = Tokenizer::new(source).map(|t| t.token_type).collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_double_equal() {
        let expected = vec![
            (TokenType::Identifier, "a"),
            (TokenType::EqualEqual, "=="),
            (TokenType::Identifier, "b"),
            (TokenType::BangEqual, "!="),
            (TokenType::Bang, "!"),
            (TokenType::Identifier, "c"),
            (TokenType::Eof, ""),
        ];
        assert_eq!(kinds("a==b != !c"), expected);
    }

    #[test]
    fn test_keywords() {
        let found: Vec<TokenType> = Tokenizer::new("fn let true false if else return fnord")
            .map(|t| t.token_type)
            .collect();
        assert_eq!(
            found,
            vec![
                TokenType::Fn,
                TokenType::Let,
                TokenType::True,
                TokenType::False,
                TokenType::If,
                TokenType::Else,
                TokenType::Return,
                TokenType::Identifier,
            ]
        );
    }

    #[test]
    fn test_identifier_stops_at_digit() {
        let expected = vec![
            (TokenType::Identifier, "foo_bar"),
            (TokenType::Integer, "12"),
            (TokenType::Eof, ""),
        ];
        assert_eq!(kinds("foo_bar12"), expected);
    }

    #[test]
    fn test_whitespace() {
        let expected = vec![
            (TokenType::Integer, "10"),
            (TokenType::Less, "<"),
            (TokenType::Integer, "9"),
            (TokenType::Eof, ""),
        ];
        assert_eq!(kinds(" \t10\r\n<\n 9  "), expected);
    }

    #[test]
    fn test_illegal() {
        let expected = vec![
            (TokenType::Illegal, "@"),
            (TokenType::Identifier, "x"),
            (TokenType::Illegal, "é"),
            (TokenType::Eof, ""),
        ];
        assert_eq!(kinds("@x é"), expected);
    }

    #[test]
    fn test_function_literal() {
        let source = "let add = fn(x, y) { x + y; };";
        let found: Vec<&str> = Tokenizer::new(source).map(|t| t.lexeme).collect();
        assert_eq!(
            found,
            vec!["let", "add", "=", "fn", "(", "x", ",", "y", ")", "{", "x", "+", "y", ";", "}", ";"]
        );
    }
}
