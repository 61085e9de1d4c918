use clap::Parser;
use url_meta_form::app::render::render;
use url_meta_form::app::session::{run_session, HELP};
use url_meta_form::core::reconcile::Outcome;
use url_meta_form::utils::{logger, validation::Validate};
use url_meta_form::{AddressList, CliConfig, FormEngine, FormState, HttpMetadataClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting url-meta-form");
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let client = HttpMetadataClient::from_config(&config);
    tracing::info!("🔗 Metadata service: {}", client.endpoint());

    let state = FormState::with_addresses(AddressList::from_values(config.addresses.clone()));
    let mut engine = FormEngine::with_state(client, state);

    if cli.interactive {
        eprintln!("{}", HELP.trim_end());
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        run_session(&mut engine, stdin, &mut stdout, cli.format).await?;
        return Ok(());
    }

    let state = engine.submit_and_wait().await;
    let exit_code = match (state.validation_error(), state.outcome()) {
        (Some(_), _) => 2,
        (None, Some(Outcome::Failure)) => 1,
        _ => 0,
    };

    println!("{}", render(&engine.view(), cli.format)?.trim_end());

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
