use std::sync::Arc;

use anyhow::Context;
use brandkit_client::{
    args::{Cli, Command},
    cache::FileCache,
    config::Config,
    remote::HttpRemote,
    style::{property_name, StyleSheet, BRAND},
    sync::{SaveOutcome, ThemeSync},
};
use brandkit_types::{generate_ramp, ThemeUpdate};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utils::config::{ConfigBuilder, ConfigExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli { command, args } = Cli::parse();
    let config: Config = ConfigBuilder::new(args).build()?;

    // setup tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(config.tracing_env_filter()?)
        .try_init()?;

    let sheet = StyleSheet::new();

    match command {
        Command::Ramp { color } => {
            let ramp = generate_ramp(color.to_long_form().as_str());
            for (step, shade) in ramp.iter() {
                println!("{}: {}", property_name(BRAND, step), shade);
            }
        }
        Command::Show => {
            let settings = connect(&config, &sheet).await?.settings();
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Command::Set(colors) => {
            let update = colors
                .colors()
                .fold(ThemeUpdate::new(), |update, (role, color)| {
                    update.with_color(role, color.clone())
                });
            if update.is_empty() {
                anyhow::bail!("Nothing to set, pass at least one color");
            }

            let sync = connect(&config, &sheet).await?;
            report(sync.update(&update)?.outcome().await)?;
        }
        Command::Reset => {
            let sync = connect(&config, &sheet).await?;
            report(sync.reset()?.outcome().await)?;
        }
        Command::ToggleMode => {
            let sync = connect(&config, &sheet).await?;
            println!("{}", sync.toggle_mode());
        }
        Command::Css { out } => {
            connect(&config, &sheet).await?;
            let css = sheet.render();
            match out {
                Some(path) => std::fs::write(&path, css)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => print!("{css}"),
            }
        }
    }

    Ok(())
}

// loads the cached theme, then whatever the server has
async fn connect(config: &Config, sheet: &StyleSheet) -> anyhow::Result<ThemeSync> {
    let sync = ThemeSync::new(
        Arc::new(FileCache::new(&config.data)?),
        Arc::new(HttpRemote::new(config)?),
        Arc::new(sheet.clone()),
    );
    sync.initialize().await;

    Ok(sync)
}

// the local copy is already updated, so only a failed save is an error here
fn report(outcome: SaveOutcome) -> anyhow::Result<()> {
    match outcome {
        SaveOutcome::Saved(saved) => {
            println!("{}", serde_json::to_string_pretty(&saved)?);
            Ok(())
        }
        SaveOutcome::Conflict(message) => {
            anyhow::bail!("Saved locally, but the server has newer changes: {message}")
        }
        SaveOutcome::Failed(message) => {
            anyhow::bail!("Saved locally, but not on the server: {message}")
        }
    }
}
