//! Builds a [`CommandNode`] tree from the tokens of one command line.
//!
//! Operator precedence, lowest first: `;`, `&`, `&&`/`||`, `|`. Every level is
//! left-associative, so `a | b | c` is `(a | b) | c`.

use crate::ast::{CommandNode, IoFlags, Operator, SimpleCommand, Word};
use crate::lexer::{self, LexingError, Token};
use thiserror::Error;

/// Errors that can occur during the AST construction (parsing) phase.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lexing(#[from] LexingError),
    /// Encountered a token that is not allowed at the current position.
    #[error("unexpected token '{0}'")]
    UnexpectedToken(Token),
    /// The line ended in the middle of a command or after a binary operator.
    #[error("unexpected end of line")]
    UnexpectedEnd,
    /// A redirection operator was not followed by a file name.
    #[error("expected a file name after '{0}'")]
    ExpectedWord(Token),
    /// Only redirections, no command to run.
    #[error("missing command")]
    MissingCommand,
    /// `>>` and `2>>` on the same command.
    #[error("only one of '>>' and '2>>' may be used per command")]
    ConflictingAppend,
}

/// Parse one command line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<CommandNode>, ParseError> {
    let tokens = lexer::split_into_tokens(line)?;
    if tokens.is_empty() {
        return Ok(None);
    }
    AstBuilder::from(tokens).build_ast().map(Some)
}

struct AstBuilder {
    tokens: Vec<Token>,
    pos: usize,
}

impl AstBuilder {
    fn from(tokens: Vec<Token>) -> Self {
        AstBuilder { tokens, pos: 0 }
    }

    fn build_ast(mut self) -> Result<CommandNode, ParseError> {
        let ast = self.parse_sequence()?;

        // Ensure we consumed all tokens
        if let Some(token) = self.consume() {
            return Err(ParseError::UnexpectedToken(token));
        }

        Ok(ast)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// sequence: parallel (';' parallel)* ';'?
    fn parse_sequence(&mut self) -> Result<CommandNode, ParseError> {
        let mut node = self.parse_parallel()?;
        while let Some(Token::Semicolon) = self.peek() {
            self.consume();
            if self.peek().is_none() {
                break;
            }
            let right = self.parse_parallel()?;
            node = CommandNode::binary(Operator::Sequential, node, right);
        }
        Ok(node)
    }

    /// parallel: conditional ('&' conditional)*
    fn parse_parallel(&mut self) -> Result<CommandNode, ParseError> {
        let mut node = self.parse_conditional()?;
        while let Some(Token::Amp) = self.peek() {
            self.consume();
            let right = self.parse_conditional()?;
            node = CommandNode::binary(Operator::Parallel, node, right);
        }
        Ok(node)
    }

    /// conditional: pipeline (('&&' | '||') pipeline)*
    fn parse_conditional(&mut self) -> Result<CommandNode, ParseError> {
        let mut node = self.parse_pipeline()?;
        loop {
            let op = match self.peek() {
                Some(Token::AndIf) => Operator::ConditionalZero,
                Some(Token::OrIf) => Operator::ConditionalNonZero,
                _ => break,
            };
            self.consume();
            let right = self.parse_pipeline()?;
            node = CommandNode::binary(op, node, right);
        }
        Ok(node)
    }

    /// pipeline: command ('|' command)*
    fn parse_pipeline(&mut self) -> Result<CommandNode, ParseError> {
        let mut node = CommandNode::Simple(self.parse_command()?);
        while let Some(Token::Pipe) = self.peek() {
            self.consume();
            let right = CommandNode::Simple(self.parse_command()?);
            node = CommandNode::binary(Operator::Pipe, node, right);
        }
        Ok(node)
    }

    /// command: (word | redirect)+, the first word being the verb
    fn parse_command(&mut self) -> Result<SimpleCommand, ParseError> {
        let mut words = Vec::new();
        let mut cmd = SimpleCommand::default();
        let mut out_append = false;
        let mut err_append = false;

        while let Some(token) = self.peek() {
            match token {
                Token::Word(_) => {
                    if let Some(Token::Word(fragments)) = self.consume() {
                        words.push(Word::new(fragments));
                    }
                }
                Token::Less => cmd.input = Some(self.parse_redirect_target()?),
                Token::Great => cmd.output = Some(self.parse_redirect_target()?),
                Token::DGreat => {
                    cmd.output = Some(self.parse_redirect_target()?);
                    out_append = true;
                }
                Token::ErrGreat => cmd.error = Some(self.parse_redirect_target()?),
                Token::ErrDGreat => {
                    cmd.error = Some(self.parse_redirect_target()?);
                    err_append = true;
                }
                Token::AmpGreat => {
                    let target = self.parse_redirect_target()?;
                    cmd.output = Some(target.clone());
                    cmd.error = Some(target);
                }
                _ => break,
            }
        }

        cmd.io_flags = match (out_append, err_append) {
            (true, true) => return Err(ParseError::ConflictingAppend),
            (true, false) => IoFlags::OutAppend,
            (false, true) => IoFlags::ErrAppend,
            (false, false) => IoFlags::Regular,
        };

        let mut words = words.into_iter();
        match words.next() {
            Some(verb) => {
                cmd.verb = verb;
                cmd.params = words.collect();
                Ok(cmd)
            }
            None if cmd.input.is_some() || cmd.output.is_some() || cmd.error.is_some() => {
                Err(ParseError::MissingCommand)
            }
            None => match self.consume() {
                Some(token) => Err(ParseError::UnexpectedToken(token)),
                None => Err(ParseError::UnexpectedEnd),
            },
        }
    }

    /// Consume a redirection operator and the word naming its target.
    fn parse_redirect_target(&mut self) -> Result<Word, ParseError> {
        let operator = self.consume().ok_or(ParseError::UnexpectedEnd)?;
        match self.consume() {
            Some(Token::Word(fragments)) => Ok(Word::new(fragments)),
            _ => Err(ParseError::ExpectedWord(operator)),
        }
    }
}
