use clap::Parser;
use revlens_core::AnalysisKind;
use revlens_demo::cli::{Cli, Commands, TokenCommand};
use revlens_demo::config::AppConfig;
use revlens_demo::render::{render_analysis, render_review, render_source, render_token_status};
use revlens_demo::state::ReviewApp;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(&cli.config, &cli)?;
    debug!(?config, "configuration loaded");

    let mut app = ReviewApp::from_config(&config, cli.token.as_deref())?;
    info!(
        classifier = app.analyzer().primary_name(),
        "analyzer ready"
    );

    match cli.command {
        Commands::Pick => {
            load_reviews(&mut app, &config).await;
            println!("{}", render_review(app.select_random_review()?));
        }

        Commands::Sentiment { text } => {
            let analysis = match text {
                Some(text) => app.analyze_text(&text, AnalysisKind::Sentiment).await?,
                None => {
                    select_review(&mut app, &config).await?;
                    app.analyze_sentiment().await?
                }
            };
            println!("{}", render_analysis(&analysis));
        }

        Commands::Nouns { text } => {
            let analysis = match text {
                Some(text) => app.analyze_text(&text, AnalysisKind::NounLevel).await?,
                None => {
                    select_review(&mut app, &config).await?;
                    app.count_nouns().await?
                }
            };
            println!("{}", render_analysis(&analysis));
        }

        Commands::Analyze => {
            select_review(&mut app, &config).await?;
            println!("{}", render_analysis(&app.analyze_sentiment().await?));
            println!("{}", render_analysis(&app.count_nouns().await?));
        }

        Commands::Token { command } => match command {
            TokenCommand::Set { token } => {
                let status = app.set_token(&token)?;
                println!("{}", render_token_status(&status));
            }
            TokenCommand::Clear => {
                app.set_token("")?;
                println!("API token removed");
            }
            TokenCommand::Status => {
                println!("{}", render_token_status(app.token_status()));
            }
        },
    }

    Ok(())
}

async fn load_reviews(app: &mut ReviewApp, config: &AppConfig) {
    let source = app.load_reviews(config).await;
    info!("{}", render_source(source));
}

/// Load reviews, pick one and print it
async fn select_review(app: &mut ReviewApp, config: &AppConfig) -> anyhow::Result<()> {
    load_reviews(app, config).await;
    println!("{}", render_review(app.select_random_review()?));
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "revlens=debug,revlens_core=debug,revlens_classifiers=debug,revlens_demo=debug"
    } else {
        "revlens=info,revlens_core=info,revlens_classifiers=info,revlens_demo=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
