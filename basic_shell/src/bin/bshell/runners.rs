use super::*;

pub(super) fn run_repl(config: &ShellConfig) {
    println!("BasicShell v{}", VERSION);
    println!("Type \"quit\" or \"exit\" to finish the session.\n");

    let mut session = Session::new(&config.module_name);

    let rl_config = Config::builder().bracketed_paste(true).build();
    let mut rl: Editor<(), DefaultHistory> =
        Editor::with_config(rl_config).unwrap_or_else(|e| {
            eprintln!("Error: failed to create line editor: {}", e);
            std::process::exit(1);
        });

    let _ = rl.load_history(&config.history_file);

    loop {
        match rl.readline("basic:$ ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if is_termination(&line) {
                    finish(&mut session);
                    break;
                }

                if let Err(e) = session.eval_line(&line) {
                    eprintln!("{}error:{} {}", colors::ERROR, colors::RESET, e);
                }
                for warning in session.drain_warnings() {
                    eprintln!("{}warning:{} {}", colors::WARNING, colors::RESET, warning);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                println!();
                finish(&mut session);
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(&config.history_file);

    emit_module(&session, config);
}

pub(super) fn run_script(file_path: &str, config: &ShellConfig) {
    if !Path::new(file_path).exists() {
        eprintln!("Error: File '{}' not found", file_path);
        std::process::exit(1);
    }

    let source = fs::read_to_string(file_path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", file_path, e);
        std::process::exit(1);
    });

    let mut session = Session::new(&config.module_name);

    for (index, line) in source.lines().enumerate() {
        if is_termination(line) {
            finish(&mut session);
            break;
        }

        match session.eval_line(line) {
            Ok(()) => {}
            Err(e @ ShellError::Fatal(_)) => {
                eprintln!("{}:{}: {}", file_path, index + 1, e);
                std::process::exit(1);
            }
            // Parse and semantic errors reject the line; the rest of the
            // script still runs.
            Err(e) => {
                eprintln!("{}:{}: {}", file_path, index + 1, e);
            }
        }
        for warning in session.drain_warnings() {
            eprintln!("{}:{}: warning: {}", file_path, index + 1, warning);
        }
    }

    // A script without a termination line still produces a finished module.
    if !session.is_finished() {
        finish(&mut session);
    }

    emit_module(&session, config);
}

fn finish(session: &mut Session) {
    if let Err(e) = session.quit() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
