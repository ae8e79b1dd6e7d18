use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use partner_portal::api::HttpApi;
use partner_portal::cli::{self, Command};
use partner_portal::config::PortalConfig;
use partner_portal::wizard::WizardController;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = PortalConfig::from_env()?;
    let api = Arc::new(HttpApi::new(&config)?);
    let mut controller = WizardController::new(api);

    eprintln!("Partner onboarding v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Backend: {}", config.api_base_url);
    eprintln!("   Type `help` for commands, `quit` to exit.\n");
    eprintln!("{}\n", cli::render_status(&controller));

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    eprint!("> ");
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            eprint!("> ");
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => match cli::execute(&mut controller, command).await {
                Ok(output) if output.is_empty() => {}
                Ok(output) => println!("{output}"),
                Err(e) => eprintln!("✗ {e}"),
            },
            Err(e) => eprintln!("✗ {e}"),
        }
        eprint!("> ");
    }

    Ok(())
}
