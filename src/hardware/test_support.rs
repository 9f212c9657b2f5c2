//! Canned-output probe for unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::hardware::error::{ProbeError, Result};
use crate::hardware::lshw::ComponentRecord;
use crate::hardware::probe::{HardwareProbe, ToolOutput};

/// A bare record with only the required fields set.
pub fn record(class: &str, id: &str) -> ComponentRecord {
    ComponentRecord {
        id: id.to_string(),
        class: class.to_string(),
        ..Default::default()
    }
}

/// Answers commands and file reads from in-memory tables and records every
/// command it is asked to run. Nothing touches the real system except the
/// destination file handed to `run_to_file`.
#[derive(Debug, Default)]
pub struct FakeProbe {
    commands: HashMap<String, ToolOutput>,
    files: RefCell<HashMap<PathBuf, String>>,
    paths: HashSet<PathBuf>,
    calls: RefCell<Vec<String>>,
}

fn command_key(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(self, program: &str, args: &[&str], stdout: &str) -> Self {
        self.with_result(program, args, stdout, 0)
    }

    pub fn with_result(mut self, program: &str, args: &[&str], stdout: &str, code: i32) -> Self {
        self.commands.insert(
            command_key(program, args),
            ToolOutput {
                stdout: stdout.to_string(),
                stderr: String::new(),
                exit_code: Some(code),
            },
        );
        self
    }

    pub fn with_file(self, path: impl AsRef<Path>, contents: &str) -> Self {
        self.files
            .borrow_mut()
            .insert(path.as_ref().to_path_buf(), contents.to_string());
        self
    }

    /// Mark a path as existing without giving it readable contents.
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.paths.insert(path.as_ref().to_path_buf());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self, program: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.split(' ').next() == Some(program))
            .count()
    }

    fn lookup(&self, program: &str, args: &[&str]) -> Result<ToolOutput> {
        let key = command_key(program, args);
        self.calls.borrow_mut().push(key.clone());
        self.commands
            .get(&key)
            .cloned()
            .ok_or_else(|| ProbeError::Unavailable {
                tool: program.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, format!("no canned output for `{}`", key)),
            })
    }
}

impl HardwareProbe for FakeProbe {
    fn run(&self, program: &str, args: &[&str]) -> Result<ToolOutput> {
        self.lookup(program, args)
    }

    fn run_to_file(&self, program: &str, args: &[&str], dest: &Path) -> Result<Option<i32>> {
        let output = self.lookup(program, args)?;
        fs::write(dest, &output.stdout)?;
        self.files
            .borrow_mut()
            .insert(dest.to_path_buf(), output.stdout.clone());
        Ok(output.exit_code)
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        self.files.borrow().get(path).cloned().ok_or_else(|| {
            ProbeError::read(path, io::Error::new(io::ErrorKind::NotFound, "no such file"))
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.paths.contains(path) || self.files.borrow().contains_key(path)
    }
}
