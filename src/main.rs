mod adf;
mod cache;
mod cli;
mod client;
mod commands;
mod config;
mod error;
mod jql;
mod logging;
mod output;
mod responses;
mod types;

use std::error::Error;
use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use cli::{Cli, Commands, IssueCommands};
use client::JiraClient;
use config::Config;
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let verbose = cli.verbose;
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");

        if verbose {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = cause.source();
            }
        }

        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    output::set_format(cli.output_format());
    output::set_quiet(cli.quiet);

    match cli.command {
        // Commands that don't require config/client
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "jira", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run().await?;
        }
        // Commands that require config and client
        command => {
            let config = Config::load()?;
            let client = JiraClient::new(
                config.site_url()?,
                &config.email()?,
                &config.api_token()?,
            );
            tracing::debug!(site = client.base_url(), "using Jira site");

            match command {
                Commands::Projects => {
                    commands::projects::list(&client).await?;
                }
                Commands::Me => {
                    commands::me::show(&client).await?;
                }
                Commands::Issues(args) => {
                    commands::issues::list(&client, &config, args).await?;
                }
                Commands::Issue { action } => match action {
                    IssueCommands::List(args) => {
                        commands::issues::list(&client, &config, args).await?;
                    }
                    IssueCommands::View(args) => {
                        commands::issues::view(&client, args).await?;
                    }
                    IssueCommands::Create(args) => {
                        commands::issues::create(&client, &config, args).await?;
                    }
                    IssueCommands::Update(args) => {
                        commands::issues::update(&client, args).await?;
                    }
                    IssueCommands::Assign { key, assignee } => {
                        commands::issues::assign(&client, &key, &assignee).await?;
                    }
                    IssueCommands::Transitions { key } => {
                        commands::transitions::list(&client, &key).await?;
                    }
                    IssueCommands::Move { key, status } => {
                        commands::transitions::move_to(&client, &key, &status).await?;
                    }
                    IssueCommands::Close { key } => {
                        commands::transitions::close(&client, &key).await?;
                    }
                    IssueCommands::Comments { key } => {
                        commands::comments::list(&client, &key).await?;
                    }
                    IssueCommands::Comment(args) => {
                        commands::comments::add(&client, args).await?;
                    }
                    IssueCommands::Links { key } => {
                        commands::links::list(&client, &key).await?;
                    }
                    IssueCommands::Link(args) => {
                        commands::links::link(&client, args).await?;
                    }
                    IssueCommands::Unlink { source, target } => {
                        commands::links::unlink(&client, &source, &target).await?;
                    }
                    IssueCommands::Attachments { key } => {
                        commands::attachments::list(&client, &key).await?;
                    }
                    IssueCommands::Upload(args) => {
                        commands::attachments::upload_file(&client, args).await?;
                    }
                    IssueCommands::Open { key } => {
                        commands::issues::open(&client, &key);
                    }
                },
                Commands::Completions { .. } | Commands::Init => {
                    // Already handled above
                }
            }
        }
    }

    Ok(())
}
