use crate::output::{print_fields, print_json};
use clap::Subcommand;
use garaj_core::config::{Config, WarnLevel};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration (secrets masked)
    Show,

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(config: &Config, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(config, json),
        ConfigSubcommand::Validate => validate(config, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(config: &Config, json: bool) -> anyhow::Result<()> {
    let mut masked = config.clone();
    masked.telegram.bot_token = masked.telegram.bot_token.as_deref().map(mask);
    masked.server.admin_token = masked.server.admin_token.as_deref().map(mask);

    if json {
        return print_json(&masked);
    }
    print_fields(&[
        ("database", masked.database.display().to_string()),
        ("operator_chat_id", masked.operator_chat_id.to_string()),
        (
            "bot_token",
            masked.telegram.bot_token.unwrap_or_else(|| "(unset)".into()),
        ),
        ("api_base", masked.telegram.api_base),
        ("batch_size", masked.pacing.batch_size.to_string()),
        ("delay_ms", masked.pacing.delay_ms.to_string()),
        ("port", masked.server.port.to_string()),
        (
            "admin_token",
            masked.server.admin_token.unwrap_or_else(|| "(unset)".into()),
        ),
    ]);
    Ok(())
}

fn mask(secret: &str) -> String {
    let tail: String = secret
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{tail}")
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(config: &Config, json: bool) -> anyhow::Result<()> {
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}
