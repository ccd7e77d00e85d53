use basic_shell_parser::parse_line;

use crate::error::{DiagnosticWarning, ShellResult};
use crate::lowering::Lowering;

/// One interactive compilation session.
///
/// State persists across lines: variables declared earlier stay
/// addressable, open constructs wait for their closers, and the module
/// accumulates until [`Session::quit`].
#[derive(Debug)]
pub struct Session {
    lowering: Lowering,
}

impl Session {
    pub fn new(module_name: &str) -> Self {
        Session {
            lowering: Lowering::new(module_name),
        }
    }

    /// Parse and lower one source line.
    pub fn eval_line(&mut self, line: &str) -> ShellResult<()> {
        let statement = parse_line(line)?;
        self.lowering.lower_statement(&statement)
    }

    /// End the session, terminating the top-level routine.
    pub fn quit(&mut self) -> ShellResult<()> {
        self.lowering.quit()
    }

    /// Serialized text of the module as built so far.
    pub fn serialize(&self) -> String {
        self.lowering.serialize()
    }

    /// Take the warnings accumulated since the last drain.
    pub fn drain_warnings(&mut self) -> Vec<DiagnosticWarning> {
        self.lowering.drain_warnings()
    }

    pub fn warnings(&self) -> &[DiagnosticWarning] {
        self.lowering.warnings()
    }

    pub fn is_finished(&self) -> bool {
        self.lowering.is_finished()
    }

    pub fn module_name(&self) -> &str {
        self.lowering.module_name()
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new("interpreter_session")
    }
}
