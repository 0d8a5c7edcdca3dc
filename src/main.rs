use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newsdesk::app::AppContext;
use newsdesk::cli::{commands, Cli, Commands, KeyAction};
use newsdesk::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let ctx = AppContext::new(&config, cli.db)?;

    match cli.command {
        Commands::Headlines {
            category,
            sort,
            bookmark,
        } => {
            commands::show_headlines(&ctx, category, sort, &bookmark).await?;
        }
        Commands::Search {
            query,
            sort,
            bookmark,
        } => {
            commands::search(&ctx, &query, sort, &bookmark).await?;
        }
        Commands::Saved { category, search } => {
            commands::list_saved(&ctx, category, search)?;
        }
        Commands::Unsave { id } => {
            commands::unsave(&ctx, &id)?;
        }
        Commands::Categories => {
            commands::list_categories(&ctx)?;
        }
        Commands::Key { action } => match action {
            KeyAction::Set { value } => commands::set_key(&ctx, &value)?,
            KeyAction::Delete => commands::delete_key(&ctx)?,
            KeyAction::Show => commands::show_key(&ctx)?,
        },
    }

    Ok(())
}
