use clap::Parser;
use ial_gateway::app::build_orchestrator;
use ial_gateway::core::orchestrator::render_error;
use ial_gateway::utils::{logger, validation::Validate};
use ial_gateway::{CliConfig, LookupRequest};
use std::io::Write;

/// One-shot lookup against the configured directory, printing the rendered response.
#[derive(Debug, Parser)]
#[command(name = "lookup")]
#[command(about = "Look up routing information for canonical object type IDs")]
struct LookupArgs {
    #[command(flatten)]
    config: CliConfig,

    #[arg(long, help = "Comma-separated canonical object type IDs")]
    ids: String,

    #[arg(long, help = "Optional ATU (NUTS or LAU) code")]
    atu_code: Option<String>,

    #[arg(long, default_value = "application/xml", help = "Accept header used for negotiation")]
    accept: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = LookupArgs::parse();
    let config = args.config.resolve()?;

    logger::init_cli_logger(config.is_verbose());
    config.validate()?;

    let mut request = LookupRequest::new(args.ids).with_accept(args.accept);
    if let Some(atu_code) = args.atu_code {
        request = request.with_atu_code(atu_code);
    }

    let orchestrator = build_orchestrator(&config);
    let (rendered, exit_code) = match orchestrator.lookup(&request).await {
        Ok(rendered) => (rendered, 0),
        Err(e) => {
            let exit_code = if e.is_client_error() { 2 } else { 1 };
            (render_error(&e, request.response_format())?, exit_code)
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&rendered.body)?;
    writeln!(stdout)?;
    stdout.flush()?;

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
