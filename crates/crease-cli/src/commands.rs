use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use crease_sdk::{MatchConfig, MatchSummary, Scorebook};
use tracing::info;

use crate::cli::*;
use crate::render;
use crate::script::MatchScript;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Play(args) => cmd_play(args, format),
        Command::Show(args) => cmd_show(args, format),
        Command::Verify(args) => cmd_verify(args, format),
        Command::Config(args) => cmd_config(args, format),
    }
}

fn cmd_play(args: PlayArgs, format: OutputFormat) -> anyhow::Result<()> {
    let script = MatchScript::load(&args.script)?;
    let (book, match_id) = script.play()?;
    info!(match_id = %match_id.short_id(), actions = script.actions.len(), "script played");

    if let Some(path) = &args.save {
        save(&book, path)?;
    }

    let game = book.get_match(&match_id)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&game.summary())?),
        OutputFormat::Text => {
            print!("{}", render::match_card(&book, game, args.commentary));
            if let Some(path) = &args.save {
                println!("{} Saved scorebook to {}", "✓".green(), path.display().to_string().bold());
            }
        }
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let book = open(&args.blob)?;
    if book.matches().is_empty() {
        println!("No matches.");
        return Ok(());
    }
    match format {
        OutputFormat::Json => {
            let summaries: Vec<MatchSummary> = book.matches().iter().map(|m| m.summary()).collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        OutputFormat::Text => {
            for (i, game) in book.matches().iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print!("{}", render::match_card(&book, game, args.commentary));
            }
        }
    }
    Ok(())
}

fn cmd_verify(args: VerifyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let book = open(&args.blob)?;
    let mut failures = 0usize;
    let mut innings_json = Vec::new();

    for game in book.matches() {
        for (slot, report) in book.validate_match(&game.id)?.iter().enumerate() {
            if !report.is_valid() {
                failures += 1;
            }
            match format {
                OutputFormat::Json => innings_json.push(serde_json::json!({
                    "match": game.id.to_string(),
                    "innings": slot + 1,
                    "events": report.event_count,
                    "digest": report.digest_hex(),
                    "valid": report.is_valid(),
                    "violations": report
                        .violations
                        .iter()
                        .map(|v| format!("#{} {:?}: {}", v.seq, v.kind, v.description))
                        .collect::<Vec<_>>(),
                })),
                OutputFormat::Text => {
                    let mark = if report.is_valid() { "✓".green() } else { "✗".red() };
                    println!(
                        "{} match {} innings {}: {} events, digest {}",
                        mark,
                        game.id.short_id().yellow(),
                        slot + 1,
                        report.event_count,
                        report.digest_hex().dimmed()
                    );
                    for v in &report.violations {
                        println!("    #{} {:?}: {}", v.seq, v.kind, v.description.red());
                    }
                }
            }
        }
    }

    let drift = book.stat_drift()?;
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "innings": innings_json,
                "stat_drift": drift.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
            }))?
        ),
        OutputFormat::Text => {
            if drift.is_empty() {
                println!("{} Player stats: {}", "✓".green(), "consistent".green());
            } else {
                for player in &drift {
                    println!("{} Player stats drifted for {}", "✗".red(), player.to_string().yellow());
                }
            }
        }
    }

    if failures > 0 || !drift.is_empty() {
        bail!(
            "verification failed: {failures} invalid innings, {} drifted players",
            drift.len()
        );
    }
    Ok(())
}

fn cmd_config(args: ConfigArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = match &args.file {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => print!("{}", config.to_toml_string()?),
    }
    Ok(())
}

fn open(path: &Path) -> anyhow::Result<Scorebook> {
    let blob = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Scorebook::from_blob(&blob).with_context(|| format!("{} is not a valid scorebook", path.display()))
}

fn save(book: &Scorebook, path: &Path) -> anyhow::Result<()> {
    let blob = book.to_blob()?;
    std::fs::write(path, &blob).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = blob.len(), "scorebook saved");
    Ok(())
}
