use duelist::protocol::{handle_command, parse_command, Response};
use duelist::Engine;

use anyhow::Result;
use std::io::{self, BufRead};

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    init_tracing("warn");
    println!("Duelist - minimax battle engine");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let input = line?;

        let Some(cmd) = parse_command(&input) else {
            continue;
        };

        match handle_command(&cmd, &mut engine, &mut stdout) {
            Ok(Response::Continue) => {}
            Ok(Response::Quit) => break,
            Err(err) => {
                if engine.options.strict_mode {
                    return Err(err.context(format!("while handling `{}`", cmd)));
                }
                eprintln!("{}", err);
            }
        }
    }

    Ok(())
}
