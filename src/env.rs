use crate::error::{Result, ShellError};
use std::collections::HashMap;
use std::env as stdenv;
use std::ffi::CString;

/// Variables visible to word expansion and to every program the interpreter starts.
///
/// The map is captured from the process environment when the interpreter starts and
/// lives as long as the interpreter. A forked child works on its own copy, so
/// assignments made inside a pipeline or parallel branch never reach the parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Capture the current process environment.
    pub fn new() -> Self {
        Self {
            vars: stdenv::vars().collect(),
        }
    }

    /// An environment holding exactly the given variables.
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Set or override a variable.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render the map as `KEY=VALUE` strings for `execve`.
    pub(crate) fn to_exec_env(&self) -> Result<Vec<CString>> {
        self.iter()
            .map(|(k, v)| {
                let entry = format!("{k}={v}");
                CString::new(entry).map_err(|e| {
                    ShellError::NulByte(String::from_utf8_lossy(&e.into_vec()).into_owned())
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::env::Environment;

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = Environment::default();

        // initially absent
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE");
        assert_eq!(env.get_var("KEY"), Some("VALUE"));

        env.set_var("KEY", "OTHER");
        assert_eq!(env.get_var("KEY"), Some("OTHER"));
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
    }

    #[test]
    fn test_exec_env_renders_key_value_pairs() {
        let env = Environment::from_vars([("A", "1")]);
        let rendered = env.to_exec_env().unwrap();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].to_str().unwrap(), "A=1");
    }

    #[test]
    fn test_exec_env_rejects_nul() {
        let env = Environment::from_vars([("A", "x\0y")]);
        assert!(env.to_exec_env().is_err());
    }
}
