pub mod ast;
pub mod parser;
pub mod repl;
pub mod tokenizer;
pub mod tree_walk_interpreter;
