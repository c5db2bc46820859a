//! REPL commands, a stdin stand-in for the developer panel and input adapters.

use crate::error::{Error, Result};
use crate::flow::UserField;
use crate::session::FlowSession;
use crate::variant::{FlowVariant, all_variants};

/// Usage text printed by `help`.
pub const HELP: &str = "\
Commands:
  next | prev            move one step
  goto <n>               jump to step n (clamped)
  clear                  clear the manual-navigation flag
  set <key> <value>      set one answer (challenges: comma-separated)
  results                compute and store results
  say <text>             personalize text with {name} {goal} {weight} {weightToLose}
  version <v1|v2>        switch variant (resets the flow)
  variants               list variants
  reset                  reset the demo
  scan | spin <n> | pay  mini-game and paywall actions
  status                 show current state
  quit                   exit";

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Empty,
    Next,
    Prev,
    GoTo(i64),
    ClearManual,
    Set(UserField),
    Results,
    Say(String),
    Version(FlowVariant),
    Variants,
    Reset,
    Scan,
    Spin(u32),
    Pay,
    Status,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "" => Self::Empty,
            "next" | "n" => Self::Next,
            "prev" | "p" => Self::Prev,
            "goto" | "g" => Self::GoTo(parse_arg(verb, rest)?),
            "clear" => Self::ClearManual,
            "set" => {
                let (key, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| Error::InvalidCommand("usage: set <key> <value>".to_string()))?;
                Self::Set(UserField::parse(key, value)?)
            }
            "results" => Self::Results,
            "say" => Self::Say(rest.to_string()),
            "version" => Self::Version(rest.parse()?),
            "variants" => Self::Variants,
            "reset" => Self::Reset,
            "scan" => Self::Scan,
            "spin" => Self::Spin(parse_arg(verb, rest)?),
            "pay" => Self::Pay,
            "status" | "s" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "/quit" => Self::Quit,
            other => return Err(Error::InvalidCommand(format!("unknown command '{other}'"))),
        };
        Ok(command)
    }
}

fn parse_arg<T: std::str::FromStr>(verb: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| Error::InvalidCommand(format!("{verb}: expected a number, got '{raw}'")))
}

/// Apply `command` to `session` and render a reply for the terminal.
pub fn execute(session: &mut FlowSession, command: Command) -> String {
    match command {
        Command::Empty | Command::Quit => String::new(),
        Command::Next => {
            session.flow_mut().next_step();
            step_line(session)
        }
        Command::Prev => {
            session.flow_mut().prev_step();
            step_line(session)
        }
        Command::GoTo(step) => {
            session.flow_mut().go_to_step(step);
            step_line(session)
        }
        Command::ClearManual => {
            session.flow_mut().clear_manual_navigation();
            step_line(session)
        }
        Command::Set(field) => {
            let key = field.key();
            session.flow_mut().set_user_data(field);
            format!("set {key}")
        }
        Command::Results => {
            let r = session.compute_results();
            let mut lines = vec![
                format!("BMI: {}", r.bmi),
                format!("TDEE: {} kcal", r.tdee),
                format!("Daily calories: {} kcal", r.daily_calories),
                format!("Weight to lose: {} kg", r.weight_to_lose),
                format!("Estimated time: {}", r.estimated_time),
            ];
            if !r.target_date.is_empty() {
                lines.push(format!("Target date: {}", r.target_date));
            }
            lines.join("\n")
        }
        Command::Say(text) => session.personalize(&text),
        Command::Version(version) => {
            if session.switch_version(version) {
                format!(
                    "switched to {version} ({} steps), flow reset",
                    version.pages()
                )
            } else {
                format!("{version} is already active")
            }
        }
        Command::Variants => {
            let current = session.current_version();
            all_variants()
                .into_iter()
                .map(|entry| {
                    let marker = if entry.id == current { "*" } else { " " };
                    format!(
                        "{marker} {} {} ({}p): {}",
                        entry.id,
                        entry.info.name,
                        entry.info.pages,
                        entry.info.highlights.join("; ")
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
        Command::Reset => {
            session.flow_mut().reset_demo();
            step_line(session)
        }
        Command::Scan => {
            session.flow_mut().complete_scan_game();
            "scan game completed".to_string()
        }
        Command::Spin(discount) => {
            session.flow_mut().spin_wheel(discount);
            let game = session.flow().game();
            format!("spin #{}: {}% off", game.spin_attempts, discount)
        }
        Command::Pay => {
            session.flow_mut().complete_payment();
            step_line(session)
        }
        Command::Status => {
            let snapshot = session.snapshot();
            serde_json::to_string_pretty(&snapshot).unwrap_or_else(|e| e.to_string())
        }
        Command::Help => HELP.to_string(),
    }
}

fn step_line(session: &FlowSession) -> String {
    let flow = session.flow();
    let manual = if flow.is_manual_navigation() {
        " (manual)"
    } else {
        ""
    };
    let last = if flow.is_last_step() { " (last step)" } else { "" };
    format!(
        "step {}/{} [{}] {}{manual}{last}",
        flow.current_step(),
        flow.total_steps(),
        session.current_version(),
        flow.direction(),
    )
}
