//! Protocol command handling

use crate::engine::{Engine, SearchOptions};

use anyhow::{bail, ensure, Result};
use std::io::Write;

/// Whether the session continues after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Continue,
    Quit,
}

const OPTIONS: &[&str] = &[
    "option name maxdepth type spin default 1 min 1",
    "option name strictmode type check default true",
    "option name fallback type combo default random var random var default",
    "option name dynamax type check default true",
    "option name graphviz type check default false",
    "option name seed type string default <empty>",
    "option name knockoutbonus type string default 300",
    "option name damagedealt type string default 3",
    "option name knockoutpenalty type string default 100",
    "option name damagetaken type string default 1",
    "option name speedpenalty type string default 0",
    "option name typematchup type string default 0",
    "option name dynamaxpenalty type string default 0",
];

/// Handle one command, writing any reply to `out`
pub fn handle_command(cmd: &str, engine: &mut Engine, out: &mut impl Write) -> Result<Response> {
    let parts: Vec<&str> = cmd.split_whitespace().collect();

    if parts.is_empty() {
        return Ok(Response::Continue);
    }

    let rest = cmd.trim_start()[parts[0].len()..].trim();

    match parts[0] {
        "duel" => {
            writeln!(out, "id name Duelist author Ritam Nag")?;
            for option in OPTIONS {
                writeln!(out, "{}", option)?;
            }
            writeln!(out, "duelok")?;
        }
        "isready" => {
            writeln!(out, "readyok")?;
        }
        "setoption" => {
            ensure!(parts.len() == 5 && parts[1] == "name" && parts[3] == "value",
                "invalid setoption command");

            engine.set_option(parts[2], parts[4])?;
        }
        "position" => {
            ensure!(!rest.is_empty(), "position command requires a snapshot");
            engine.set_position(rest)?;
        }
        "load" => {
            ensure!(!rest.is_empty(), "load command requires a path");
            engine.load(rest)?;
        }
        "go" => {
            let search_options = rest.parse::<SearchOptions>()?;
            let (decision, time) = engine.go(&search_options)?;

            writeln!(
                out,
                "info score {} nodes {} evaluated {} time {:.3}",
                decision.root_score, decision.stats.expanded, decision.stats.evaluated, time
            )?;
            writeln!(out, "bestaction {}", decision.order)?;
        }
        "previous" => match engine.previous() {
            Some(action) => writeln!(out, "previous {}", action)?,
            None => writeln!(out, "previous none")?,
        },
        "forget" => {
            engine.forget();
        }
        "display" => {
            writeln!(out, "{}", engine.display()?)?;
        }
        "tree" => match engine.tree() {
            Some(dot) => write!(out, "{}", dot)?,
            None => bail!("no tree recorded; set graphviz to true and search again"),
        },
        "quit" => {
            return Ok(Response::Quit);
        }
        cmd => {
            bail!("Unknown command: {}", cmd);
        }
    }

    out.flush()?;
    Ok(Response::Continue)
}
