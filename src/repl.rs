use std::io::{BufRead, Write};

use crate::{
    parser::Parser,
    tokenizer::Tokenizer,
    tree_walk_interpreter::{Interpreter, Value},
};

pub const PROMPT: &str = ">> ";

/// Reads one line at a time from `input`, evaluates it in a single session
/// environment and writes the result to `output`. Returns on end of input.
pub fn start(input: impl BufRead, mut output: impl Write) -> std::io::Result<()> {
    let mut interpreter = Interpreter::new();
    let mut lines = input.lines();

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;

        let (program, errors) = Parser::new(Tokenizer::new(&line)).parse();
        if !errors.is_empty() {
            writeln!(output, "parser errors:")?;
            for error in errors {
                writeln!(output, "\t{error}")?;
            }
            continue;
        }

        match interpreter.interpret(&program) {
            Value::Null if program.0.is_empty() => {}
            value => writeln!(output, "{value}")?,
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn session(input: &str) -> String {
        let mut output = Vec::new();
        start(input.as_bytes(), &mut output).expect("in-memory io should not fail");
        String::from_utf8(output).expect("output should be valid UTF-8")
    }

    #[test]
    fn test_bindings_persist_between_lines() {
        let output = session("let add = fn(a, b) { a + b };\nadd(1, add(2, 3))\n");
        assert_eq!(output, ">> null\n>> 6\n>> ");
    }

    #[test]
    fn test_parse_errors_are_reported() {
        let output = session("let x 5;\nlet y = 1;\ny\n");
        assert_eq!(
            output,
            ">> parser errors:\n\texpected next token to be =, got INT instead\n>> null\n>> 1\n>> "
        );
    }

    #[test]
    fn test_runtime_errors_are_printed() {
        let output = session("foobar\n");
        assert_eq!(output, ">> ERROR: identifier not found: foobar\n>> ");
    }

    #[test]
    fn test_blank_line_prints_nothing() {
        assert_eq!(session("\n"), ">> >> ");
    }
}
