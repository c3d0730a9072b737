//! Terminal entry point for Memopad.
//!
//! # Responsibility
//! - Resolve settings, start logging, open the store.
//! - Hand stdin/stdout to the line-driven shell.

mod config;
mod shell;

use config::ShellConfig;
use log::error;
use memopad_core::{core_version, init_logging, MemoStore, SqliteMemoStore};
use shell::Shell;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = ShellConfig::from_env();

    // Logging is best effort; the shell still works without a log file.
    let log_dir = config.log_dir.to_string_lossy();
    if let Err(err) = init_logging(&config.log_level, &log_dir) {
        eprintln!("memopad: logging disabled: {err}");
    }

    let store = match SqliteMemoStore::open(&config.db_path) {
        Ok(store) => store,
        Err(err) => {
            error!("event=app_open module=cli status=error error={err}");
            eprintln!(
                "memopad: cannot open `{}`: {err}",
                config.db_path.display()
            );
            return ExitCode::FAILURE;
        }
    };

    match store.count() {
        Ok(count) => println!(
            "memopad {} - {} memo(s) in {}",
            core_version(),
            count,
            config.db_path.display()
        ),
        Err(err) => eprintln!("memopad: cannot count memos: {err}"),
    }
    println!("Type :h for help.");

    let stdin = std::io::stdin();
    let result = Shell::new(&store, config.visible_rows)
        .and_then(|mut shell| shell.run(stdin.lock(), std::io::stdout().lock()));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=app_run module=cli status=error error={err}");
            eprintln!("memopad: {err}");
            ExitCode::FAILURE
        }
    }
}
