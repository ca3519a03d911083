//! A small command execution engine for an interactive interpreter.
//!
//! Given a [`CommandNode`] tree, the [`Interpreter`] starts processes, wires pipes,
//! applies file redirections, updates its [`Environment`] and applies the control
//! operators `;`, `&`, `&&`, `||` and `|`, propagating exit statuses upward.
//!
//! Concurrency comes only from `fork(2)`: `&` and `|` run each operand in its own
//! process, everything else runs synchronously in the interpreter process. The
//! builtins `exit`/`quit`, `cd` and `NAME=value` assignments run in-process.
//!
//! [`parse_line`] turns a line of text into a tree; any other front end producing
//! [`CommandNode`] values works as well.

pub mod ast;
mod builtin;
pub mod config;
pub mod env;
pub mod error;
mod eval;
mod external;
mod interpreter;
pub mod lexer;
pub mod logging;
pub mod parser;
mod process;
pub mod redirect;
pub mod status;
pub mod word;

pub use ast::{CommandNode, Fragment, IoFlags, Operator, SimpleCommand, Word};
pub use builtin::is_assignment;
pub use config::{CdFailurePolicy, Config};
pub use env::Environment;
pub use error::{Result, ShellError};
pub use external::find_command_path;
pub use interpreter::Interpreter;
pub use parser::parse_line;
pub use status::{ExecutionStatus, SHELL_EXIT};
