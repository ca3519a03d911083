//! Word resolution and argument vector construction.

use crate::ast::{Fragment, SimpleCommand, Word};
use crate::env::Environment;
use crate::error::{Result, ShellError};
use std::ffi::CString;

/// Resolve a word to a string, expanding variable fragments from `env`.
///
/// Unset variables expand to the empty string.
pub fn resolve_word(word: &Word, env: &Environment) -> String {
    resolve_fragments(word.fragments(), env)
}

pub(crate) fn resolve_fragments(fragments: &[Fragment], env: &Environment) -> String {
    let mut result = String::new();
    for fragment in fragments {
        if fragment.expand {
            if let Some(value) = env.get_var(&fragment.text) {
                result.push_str(value);
            }
        } else {
            result.push_str(&fragment.text);
        }
    }
    result
}

/// Resolve the verb followed by every parameter, in source order.
pub fn build_argv(cmd: &SimpleCommand, env: &Environment) -> Vec<String> {
    std::iter::once(&cmd.verb)
        .chain(cmd.params.iter())
        .map(|word| resolve_word(word, env))
        .collect()
}

pub(crate) fn to_cstring(s: &str) -> Result<CString> {
    CString::new(s).map_err(|_| ShellError::NulByte(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Environment {
        Environment::from_vars([("HOME", "/home/user"), ("EMPTY", "")])
    }

    #[test]
    fn literal_fragments_concatenate_in_order() {
        let word = Word::new(vec![
            Fragment::literal("ab"),
            Fragment::literal("/"),
            Fragment::literal("cd"),
        ]);
        assert_eq!(resolve_word(&word, &env()), "ab/cd");
    }

    #[test]
    fn expanded_fragment_reads_environment() {
        let word = Word::new(vec![Fragment::variable("HOME"), Fragment::literal("/src")]);
        assert_eq!(resolve_word(&word, &env()), "/home/user/src");
    }

    #[test]
    fn unset_variable_expands_to_empty() {
        let word = Word::new(vec![
            Fragment::literal("["),
            Fragment::variable("NOT_SET_ANYWHERE_42"),
            Fragment::literal("]"),
        ]);
        assert_eq!(resolve_word(&word, &env()), "[]");
        assert_eq!(resolve_word(&Word::new(vec![Fragment::variable("EMPTY")]), &env()), "");
    }

    #[test]
    fn argv_starts_with_verb_and_keeps_order() {
        let cmd = SimpleCommand::new(
            Word::literal("ls"),
            vec![
                Word::literal("-l"),
                Word::new(vec![Fragment::variable("HOME")]),
                Word::literal("-l"),
            ],
        );
        assert_eq!(build_argv(&cmd, &env()), vec!["ls", "-l", "/home/user", "-l"]);
    }

    #[test]
    fn argv_of_bare_verb_has_one_entry() {
        let cmd = SimpleCommand::new(Word::literal("true"), vec![]);
        assert_eq!(build_argv(&cmd, &env()), vec!["true"]);
    }

    #[test]
    fn cstring_conversion_rejects_interior_nul() {
        assert!(to_cstring("ok").is_ok());
        assert!(matches!(to_cstring("a\0b"), Err(ShellError::NulByte(_))));
    }
}
