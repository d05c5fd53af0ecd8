use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result};
use imgrelay::error::ConfigError;
use imgrelay::{Config, MessageStore, QueryLinkBuilder, batch, proxify, revert};
use tokio::io::AsyncReadExt;
use tracing::info;

/// Route a parsed CLI invocation to the matching operation.
pub async fn dispatch(cli: Cli, mut config: Config) -> Result<()> {
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    let allow = config.allow_list();
    let builder =
        QueryLinkBuilder::from_base(&config.proxy_base_url).map_err(ConfigError::InvalidBaseUrl)?;

    match cli.command {
        Commands::Migrate => {
            let store = MessageStore::open(&config.database_path).await?;
            let messages = store.list_messages().await?;
            let stats = batch::rewrite_all(
                messages.into_iter().map(|m| (m.id, m.content)),
                &allow,
                &builder,
                |id, text| {
                    let store = &store;
                    Box::pin(async move {
                        store.update_content(id, &text).await.map_err(Into::into)
                    })
                },
            )
            .await;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }

        Commands::Revert => {
            let store = MessageStore::open(&config.database_path).await?;
            let messages = store.list_messages().await?;
            let stats = batch::revert_all(
                messages.into_iter().map(|m| (m.id, m.content)),
                &builder,
                |id, text| {
                    let store = &store;
                    Box::pin(async move {
                        store.update_content(id, &text).await.map_err(Into::into)
                    })
                },
            )
            .await;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }

        Commands::Proxify { text, revert: reverse } => {
            let input = match text {
                Some(text) => text,
                None => read_stdin().await?,
            };
            if reverse {
                let outcome = revert(&input, &builder);
                info!(reverted = outcome.reverted, "reverted text");
                print!("{}", outcome.text);
            } else {
                let outcome = proxify(&input, &allow, &builder);
                info!(
                    images_found = outcome.images_found,
                    rewritten = outcome.rewritten,
                    "proxified text"
                );
                print!("{}", outcome.text);
            }
        }

        Commands::CheckHost { host } => {
            if allow.matches(&host) {
                println!("{host}: exempt (allow-listed)");
            } else {
                println!("{host}: proxied");
            }
        }
    }

    Ok(())
}

async fn read_stdin() -> Result<String> {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("failed to read stdin")?;
    Ok(input)
}
