//! Lexical analysis (tokenization) of one command line.

use crate::ast::Fragment;
use std::fmt;
use thiserror::Error;

/// Represents a token resulting from lexical analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A word, as a chain of literal and variable fragments.
    ///
    /// An `=` inside a word is kept as a fragment of its own, so `NAME=value` lexes to
    /// `["NAME", "=", "value"]`.
    Word(Vec<Fragment>),
    /// `;`
    Semicolon,
    /// `&`
    Amp,
    /// `&&`
    AndIf,
    /// `||`
    OrIf,
    /// `|`
    Pipe,
    /// `<`
    Less,
    /// `>`
    Great,
    /// `>>`
    DGreat,
    /// `2>`
    ErrGreat,
    /// `2>>`
    ErrDGreat,
    /// `&>`
    AmpGreat,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Token::Word(fragments) => {
                for fragment in fragments {
                    if fragment.expand {
                        write!(f, "${{{}}}", fragment.text)?;
                    } else {
                        f.write_str(&fragment.text)?;
                    }
                }
                return Ok(());
            }
            Token::Semicolon => ";",
            Token::Amp => "&",
            Token::AndIf => "&&",
            Token::OrIf => "||",
            Token::Pipe => "|",
            Token::Less => "<",
            Token::Great => ">",
            Token::DGreat => ">>",
            Token::ErrGreat => "2>",
            Token::ErrDGreat => "2>>",
            Token::AmpGreat => "&>",
        };
        f.write_str(symbol)
    }
}

/// Errors that can occur during the lexical analysis process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexingError {
    /// A closing brace for `${...}` was not found.
    #[error("missing '}}' in variable reference")]
    UnfinishedParamSubst,
    /// `${}` names no variable.
    #[error("empty variable name in '${{}}'")]
    EmptyParamName,
}

struct LexingFSM {
    input: Vec<char>,
    pos: usize,
    current_word: Vec<Fragment>,
    buffer: String,
}

impl LexingFSM {
    fn new(line: &str) -> Self {
        LexingFSM {
            input: line.chars().collect(),
            pos: 0,
            current_word: Vec::new(),
            buffer: String::new(),
        }
    }

    fn make_tokens(&mut self) -> Result<Vec<Token>, LexingError> {
        let mut out = Vec::new();

        while let Some(ch) = self.read_char() {
            match ch {
                ' ' | '\t' | '\r' | '\n' => self.finish_word(&mut out),
                ';' => self.push_operator(&mut out, Token::Semicolon),
                '|' => {
                    let token = if self.eat('|') { Token::OrIf } else { Token::Pipe };
                    self.push_operator(&mut out, token);
                }
                '&' => {
                    let token = if self.eat('&') {
                        Token::AndIf
                    } else if self.eat('>') {
                        Token::AmpGreat
                    } else {
                        Token::Amp
                    };
                    self.push_operator(&mut out, token);
                }
                '<' => self.push_operator(&mut out, Token::Less),
                '>' => {
                    let token = if self.eat('>') { Token::DGreat } else { Token::Great };
                    self.push_operator(&mut out, token);
                }
                // `2>` only counts as an operator at the start of a word
                '2' if !self.in_word() && self.peek_char() == Some('>') => {
                    self.read_char();
                    let token = if self.eat('>') {
                        Token::ErrDGreat
                    } else {
                        Token::ErrGreat
                    };
                    self.push_operator(&mut out, token);
                }
                '=' => {
                    self.flush_literal();
                    self.current_word.push(Fragment::literal("="));
                }
                '$' => self.read_variable()?,
                c => self.buffer.push(c),
            }
        }

        self.finish_word(&mut out);
        Ok(out)
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    /// Consume the next character if it is `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn in_word(&self) -> bool {
        !self.buffer.is_empty() || !self.current_word.is_empty()
    }

    fn push_operator(&mut self, out: &mut Vec<Token>, token: Token) {
        self.finish_word(out);
        out.push(token);
    }

    fn flush_literal(&mut self) {
        if !self.buffer.is_empty() {
            self.current_word
                .push(Fragment::literal(std::mem::take(&mut self.buffer)));
        }
    }

    fn finish_word(&mut self, out: &mut Vec<Token>) {
        self.flush_literal();
        if !self.current_word.is_empty() {
            out.push(Token::Word(std::mem::take(&mut self.current_word)));
        }
    }

    /// Handles `${NAME}` and `$NAME`. A `$` not followed by a name stays literal.
    fn read_variable(&mut self) -> Result<(), LexingError> {
        let mut name = String::new();
        if self.eat('{') {
            loop {
                match self.read_char() {
                    Some('}') => break,
                    Some(c) => name.push(c),
                    None => return Err(LexingError::UnfinishedParamSubst),
                }
            }
            if name.is_empty() {
                return Err(LexingError::EmptyParamName);
            }
        } else {
            while let Some(c) = self.peek_char() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    name.push(c);
                    self.pos += 1;
                } else {
                    break;
                }
            }
            if name.is_empty() {
                self.buffer.push('$');
                return Ok(());
            }
        }
        self.flush_literal();
        self.current_word.push(Fragment::variable(name));
        Ok(())
    }
}

/// Split a command line into tokens.
pub fn split_into_tokens(line: &str) -> Result<Vec<Token>, LexingError> {
    LexingFSM::new(line).make_tokens()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Fragment {
        Fragment::literal(s)
    }

    fn var(s: &str) -> Fragment {
        Fragment::variable(s)
    }

    #[test]
    fn splits_words_on_whitespace() {
        let tokens = split_into_tokens("ls  -l\t/tmp").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Word(vec![lit("ls")]),
                Token::Word(vec![lit("-l")]),
                Token::Word(vec![lit("/tmp")]),
            ]
        );
    }

    #[test]
    fn assignment_keeps_equal_sign_as_own_fragment() {
        let tokens = split_into_tokens("NAME=va$X").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Word(vec![lit("NAME"), lit("="), lit("va"), var("X")])]
        );
    }

    #[test]
    fn variables_in_both_forms() {
        let tokens = split_into_tokens("${HOME}/bin:$PATH.").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Word(vec![var("HOME"), lit("/bin:"), var("PATH"), lit(".")])]
        );
    }

    #[test]
    fn lone_dollar_is_literal() {
        let tokens = split_into_tokens("echo $ a$").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Word(vec![lit("echo")]),
                Token::Word(vec![lit("$")]),
                Token::Word(vec![lit("a$")]),
            ]
        );
    }

    #[test]
    fn operators_without_spaces() {
        let tokens = split_into_tokens("a;b&c&&d||e|f").unwrap();
        let kinds: Vec<String> = tokens.iter().map(ToString::to_string).collect();
        assert_eq!(
            kinds,
            vec!["a", ";", "b", "&", "c", "&&", "d", "||", "e", "|", "f"]
        );
    }

    #[test]
    fn redirection_operators() {
        let tokens = split_into_tokens("cmd <in >out >>app 2>err 2>>eapp &>both").unwrap();
        let kinds: Vec<String> = tokens.iter().map(ToString::to_string).collect();
        assert_eq!(
            kinds,
            vec![
                "cmd", "<", "in", ">", "out", ">>", "app", "2>", "err", "2>>", "eapp", "&>",
                "both"
            ]
        );
    }

    #[test]
    fn digit_two_inside_word_is_not_redirection() {
        let tokens = split_into_tokens("echo a2>f").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Word(vec![lit("echo")]),
                Token::Word(vec![lit("a2")]),
                Token::Great,
                Token::Word(vec![lit("f")]),
            ]
        );
    }

    #[test]
    fn unfinished_brace_is_an_error() {
        assert_eq!(
            split_into_tokens("echo ${HOME"),
            Err(LexingError::UnfinishedParamSubst)
        );
        assert_eq!(split_into_tokens("echo ${}"), Err(LexingError::EmptyParamName));
    }
}
