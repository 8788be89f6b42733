//! Command execution for scoutctl

use crate::display::Ui;
use crate::repl;
use anyhow::{Context, Result};
use scout_common::resume::{self, FollowUpChat};
use scout_common::{
    FileCandidateStore, HttpLlmClient, IntakeStateMachine, Language, LanguageOracle,
    LlmTranslator, Localizer, ScoutConfig,
};
use std::io;
use std::path::Path;
use std::sync::Arc;

fn oracle(config: &ScoutConfig) -> Result<Arc<dyn LanguageOracle>> {
    let client = HttpLlmClient::new(config.llm.clone()).context("Failed to set up the LLM client")?;
    Ok(Arc::new(client))
}

/// Build the state machine described by `config`
pub fn build_machine(config: &ScoutConfig, oracle: Arc<dyn LanguageOracle>) -> IntakeStateMachine {
    let store = Arc::new(FileCandidateStore::new(config.session.output_dir.clone()));
    let localizer = Localizer::new(Arc::new(LlmTranslator::new(oracle.clone())));

    IntakeStateMachine::new(oracle, store)
        .with_localizer(localizer)
        .with_max_attempts(config.session.effective_max_attempts())
}

pub fn chat(config: &ScoutConfig, language: Option<String>) -> Result<()> {
    let language = match language {
        Some(code) => code
            .parse::<Language>()
            .map_err(|c| anyhow::anyhow!("Unknown language '{}'", c))?,
        None => config.session.language()?,
    };

    let machine = build_machine(config, oracle(config)?);
    tracing::info!(language = %language, "starting intake chat");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    repl::run_chat(&machine, language, stdin.lock(), &mut stdout, &Ui::auto())
        .context("Failed to run chat")
}

pub fn resume(config: &ScoutConfig, file: &Path) -> Result<()> {
    let ui = Ui::auto();
    let mut stdout = io::stdout();

    let bytes = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let text = match resume::extract_text(&bytes) {
        Ok(text) => text,
        Err(e @ resume::ResumeError::UnsupportedType(_)) => {
            ui.error(&mut stdout, &e.to_string())?;
            return Ok(());
        }
        Err(e) => return Err(anyhow::Error::new(e).context("Failed to read resume")),
    };

    let oracle = oracle(config)?;
    let profile = resume::extract_profile(oracle.as_ref(), &text).context("Failed to parse resume")?;
    let skills = profile.skills.join(", ");
    let record = profile.into_record();

    let mut items: Vec<(&str, &str)> = record
        .profile_entries()
        .into_iter()
        .map(|(field, value)| (field.key(), value))
        .collect();
    if !skills.is_empty() {
        items.push(("skills", skills.as_str()));
    }
    ui.summary(&mut stdout, "Candidate profile", &items)?;

    let mut chat = FollowUpChat::new(text);
    let stdin = io::stdin();
    repl::run_follow_up(oracle.as_ref(), &mut chat, stdin.lock(), &mut stdout, &ui)
        .context("Failed to run follow-up chat")
}

pub fn show_config(config: &ScoutConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
