use brandkit_server::{args::CliArgs, config::Config, run_server};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utils::{
    config::{ConfigBuilder, ConfigExt},
    context::AppContext,
};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config: Config = ConfigBuilder::new(args).build()?;

    let ctx = AppContext::new()?;

    // setup tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_target(false),
        )
        .with(config.tracing_env_filter()?)
        .try_init()?;

    run_server(ctx, config)
}
