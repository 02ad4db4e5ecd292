//! # Script interpreter module
//!
//! This module provides an interpreter for command scripts. A script is a
//! sequence of JSON encoded commands, each terminated by a `;`. Lines whose
//! first non-whitespace character is `#` are comments.
//!
//! ```text
//! # Drive forward then face the goal
//! {"MoveStraight": {"distance_in": 24.0}};
//! {"WaitForArrival": {"timeout_ms": 2000}};
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A script interpreter.
///
/// After loading a script use `.next_cmd` to pop commands in the order they
/// appear in the script.
pub struct ScriptInterpreter<T> {
    script_path: Option<PathBuf>,
    cmds: VecDeque<T>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0:?}")]
    ScriptNotFound(PathBuf),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error("Script contains an invalid command (command {0}): {1}")]
    InvalidCmd(usize, serde_json::Error)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<T> ScriptInterpreter<T>
where
    T: DeserializeOwned
{

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        let path = PathBuf::from(script_path.as_ref());

        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path));
        }

        let script = fs::read_to_string(&path)
            .map_err(ScriptError::ScriptLoadError)?;

        let mut si = Self::from_script(&script)?;
        si.script_path = Some(path);

        Ok(si)
    }

    /// Create a new interpreter from the text of a script.
    pub fn from_script(script: &str) -> Result<Self, ScriptError> {
        // Drop comment lines before splitting so a `;` inside a comment
        // doesn't end a command
        let body: String = script
            .lines()
            .filter(|l| !l.trim_start().starts_with('#'))
            .collect::<Vec<_>>()
            .join("\n");

        let mut cmds = VecDeque::new();

        for (i, payload) in body
            .split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .enumerate()
        {
            let cmd = serde_json::from_str(payload)
                .map_err(|e| ScriptError::InvalidCmd(i, e))?;
            cmds.push_back(cmd);
        }

        if cmds.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(Self {
            script_path: None,
            cmds
        })
    }
}

impl<T> ScriptInterpreter<T> {

    /// Pop the next command in the script, or `None` at the end of the
    /// script.
    pub fn next_cmd(&mut self) -> Option<T> {
        self.cmds.pop_front()
    }

    /// Get the number of commands remaining in the script
    pub fn get_num_cmds(&self) -> usize {
        self.cmds.len()
    }

    /// Get the path the script was loaded from, if it came from a file.
    pub fn script_path(&self) -> Option<&Path> {
        self.script_path.as_deref()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    enum Cmd {
        Go { dist: f64 },
        Stop
    }

    #[test]
    fn test_parse_script() {
        let script = "\
            # comment; with a semicolon\n\
            {\"Go\": {\"dist\": 12.0}};\n\
            \n\
            \"Stop\";\n";

        let mut si: ScriptInterpreter<Cmd> =
            ScriptInterpreter::from_script(script).unwrap();

        assert_eq!(si.get_num_cmds(), 2);
        assert_eq!(si.next_cmd(), Some(Cmd::Go { dist: 12.0 }));
        assert_eq!(si.next_cmd(), Some(Cmd::Stop));
        assert_eq!(si.next_cmd(), None);
        assert!(si.script_path().is_none());
    }

    #[test]
    fn test_empty_script() {
        let r: Result<ScriptInterpreter<Cmd>, _> =
            ScriptInterpreter::from_script("# nothing here\n");
        assert!(matches!(r, Err(ScriptError::ScriptEmpty)));
    }

    #[test]
    fn test_invalid_cmd() {
        let r: Result<ScriptInterpreter<Cmd>, _> =
            ScriptInterpreter::from_script("\"Stop\";\n{\"Fly\": 1};");
        assert!(matches!(r, Err(ScriptError::InvalidCmd(1, _))));
    }

    #[test]
    fn test_missing_script() {
        let r: Result<ScriptInterpreter<Cmd>, _> =
            ScriptInterpreter::new("/no/such/script.drs");
        assert!(matches!(r, Err(ScriptError::ScriptNotFound(_))));
    }
}
