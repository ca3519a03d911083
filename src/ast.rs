//! The command tree consumed by the [`Interpreter`](crate::Interpreter).
//!
//! Trees are produced by [`parse_line`](crate::parse_line) (or by any other front end),
//! evaluated once and then dropped. Nothing in this module is mutated during evaluation.

/// One piece of a [`Word`].
///
/// When `expand` is set, `text` names an environment variable whose value replaces the
/// fragment at resolution time. Otherwise `text` is used verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub expand: bool,
}

impl Fragment {
    /// A fragment used verbatim.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            expand: false,
        }
    }

    /// A fragment naming an environment variable.
    pub fn variable(name: impl Into<String>) -> Self {
        Self {
            text: name.into(),
            expand: true,
        }
    }
}

/// An ordered chain of fragments that resolves to a single string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Word {
    fragments: Vec<Fragment>,
}

impl Word {
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    /// Shorthand for a word made of a single literal fragment.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::new(vec![Fragment::literal(text)])
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }
}

/// Truncate-versus-append selection for the output and error redirections.
///
/// At most one append mode applies to a command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IoFlags {
    /// Both streams truncate their target.
    #[default]
    Regular,
    /// `>>`: the output target is appended to.
    OutAppend,
    /// `2>>`: the error target is appended to.
    ErrAppend,
}

/// A leaf command: verb, parameters and optional redirections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleCommand {
    pub verb: Word,
    pub params: Vec<Word>,
    pub input: Option<Word>,
    pub output: Option<Word>,
    pub error: Option<Word>,
    pub io_flags: IoFlags,
}

impl SimpleCommand {
    /// A command with no redirections.
    pub fn new(verb: Word, params: Vec<Word>) -> Self {
        Self {
            verb,
            params,
            ..Self::default()
        }
    }
}

/// Operator joining the two children of an internal tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `a ; b`
    Sequential,
    /// `a & b`
    Parallel,
    /// `a && b`: run `b` only when `a` returned zero.
    ConditionalZero,
    /// `a || b`: run `b` only when `a` returned non-zero.
    ConditionalNonZero,
    /// `a | b`
    Pipe,
}

/// A node of the command tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandNode {
    Simple(SimpleCommand),
    Binary {
        op: Operator,
        left: Box<CommandNode>,
        right: Box<CommandNode>,
    },
}

impl CommandNode {
    pub fn binary(op: Operator, left: CommandNode, right: CommandNode) -> Self {
        CommandNode::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}
