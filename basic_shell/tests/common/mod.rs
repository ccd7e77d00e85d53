//! Shared helpers for integration tests
// This helper module is consumed selectively by several integration test
// files. Keep the utilities available without forcing every helper to be
// referenced in each individual test target.
#![allow(dead_code)]

use basic_shell::repl::Session;

/// Feed a multi-line script into a session the way the script runner
/// does: a `quit`/`exit` line finishes the session and nothing after it
/// is evaluated; a script without one is finished at the end.
pub fn run_script(session: &mut Session, source: &str) {
    for (index, line) in source.lines().enumerate() {
        if is_termination(line) {
            session
                .quit()
                .unwrap_or_else(|e| panic!("line {}: {}", index + 1, e));
            return;
        }
        session
            .eval_line(line)
            .unwrap_or_else(|e| panic!("line {}: {}", index + 1, e));
    }
    if !session.is_finished() {
        session.quit().expect("finalizing the session failed");
    }
}

/// Compile a script under the default module name and return the
/// serialized module text.
pub fn compile_script(source: &str) -> String {
    let mut session = Session::default();
    run_script(&mut session, source);
    session.serialize()
}

/// First word is `quit` or `exit`, matched case-insensitively.
pub fn is_termination(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|word| word.eq_ignore_ascii_case("quit") || word.eq_ignore_ascii_case("exit"))
}
