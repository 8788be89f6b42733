//! REPL - Conversational interface for the intake
//!
//! Reads one line per turn and hands it to the state machine. The REPL owns
//! the `SessionState` between turns; a failed turn keeps the old state and
//! the candidate simply answers again.

use crate::display::Ui;
use scout_common::resume::FollowUpChat;
use scout_common::{IntakeStateMachine, Language, LanguageOracle, SessionState, TurnOutcome};
use std::io::{self, BufRead, Write};

/// REPL-level commands, checked before anything reaches the oracle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Language(String),
}

pub fn parse_command(line: &str) -> Option<ReplCommand> {
    let line = line.trim();
    if !line.starts_with(':') {
        return None;
    }
    let mut parts = line[1..].split_whitespace();
    match parts.next() {
        Some("quit") | Some("q") => Some(ReplCommand::Quit),
        Some("lang") | Some("language") => {
            Some(ReplCommand::Language(parts.next().unwrap_or("").to_string()))
        }
        _ => None,
    }
}

fn languages_help() -> String {
    Language::ALL
        .iter()
        .map(|l| format!("{} ({})", l.code(), l.display_name()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn show_greeting(
    machine: &IntakeStateMachine,
    session: &SessionState,
    ui: &Ui,
    out: &mut impl Write,
) -> io::Result<()> {
    let (greeting, warning) = machine.greeting(session);
    if let Some(w) = warning {
        ui.warning(out, &w)?;
    }
    ui.bot(out, &greeting)
}

/// Run intake conversations until EOF or `:quit`.
///
/// A farewell or completion resets the session and greets the next candidate.
pub fn run_chat(
    machine: &IntakeStateMachine,
    language: Language,
    input: impl BufRead,
    out: &mut impl Write,
    ui: &Ui,
) -> io::Result<()> {
    let mut session = SessionState::new(language);
    show_greeting(machine, &session, ui, out)?;

    let mut lines = input.lines();
    loop {
        ui.prompt(out)?;
        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                ui.error(out, &format!("Error reading input: {}", e))?;
                continue;
            }
            None => break,
        };

        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Some(ReplCommand::Quit) => break,
            Some(ReplCommand::Language(code)) => {
                match code.parse::<Language>() {
                    Ok(lang) => {
                        session.language = lang;
                        tracing::info!(language = %lang, "display language changed");
                        ui.info(out, &format!("Display language: {}", lang.display_name()))?;
                        // re-ask the current question in the new language
                        if let Some(field) = session.current_field() {
                            let (prompt, _) = machine.localize(&session, field.prompt());
                            ui.bot(out, &prompt)?;
                        }
                    }
                    Err(_) => ui.error(
                        out,
                        &format!("Unknown language '{}'. Available: {}", code, languages_help()),
                    )?,
                }
                continue;
            }
            None => {}
        }

        match machine.process(&session, &line) {
            Ok(turn) => {
                for warning in &turn.warnings {
                    ui.warning(out, warning)?;
                }
                ui.bot(out, &turn.reply)?;
                let terminal = turn.outcome.is_terminal();
                if let TurnOutcome::Completed { file_name } | TurnOutcome::Escalated { file_name } =
                    &turn.outcome
                {
                    tracing::info!(file = %file_name, "session closed");
                }
                session = turn.session;
                if terminal {
                    ui.info(out, "--- new session ---")?;
                    show_greeting(machine, &session, ui, out)?;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "turn failed");
                ui.error(out, &format!("Sorry, something went wrong: {}. Please try again.", e))?;
            }
        }
    }

    Ok(())
}

/// Free-form questions about a parsed resume until EOF or `:quit`
pub fn run_follow_up(
    oracle: &dyn LanguageOracle,
    chat: &mut FollowUpChat,
    input: impl BufRead,
    out: &mut impl Write,
    ui: &Ui,
) -> io::Result<()> {
    ui.bot(out, "Ask me anything about this resume.")?;

    let mut lines = input.lines();
    loop {
        ui.prompt(out)?;
        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                ui.error(out, &format!("Error reading input: {}", e))?;
                continue;
            }
            None => break,
        };

        if line.trim().is_empty() {
            continue;
        }
        if parse_command(&line) == Some(ReplCommand::Quit) {
            break;
        }

        match chat.ask(oracle, line.trim()) {
            Ok(answer) => ui.bot(out, &answer)?,
            Err(e) => ui.error(out, &format!("Sorry, something went wrong: {}", e))?,
        }
    }

    Ok(())
}
