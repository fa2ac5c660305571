use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose {
        "ial_gateway=debug,tower_http=debug,info"
    } else {
        "ial_gateway=info,warn"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Logs go to stderr so stdout stays free for rendered responses.
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Production mode logs JSON lines for log shippers.
pub fn init_production_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json()
                .with_writer(std::io::stderr),
        )
        .init();
}

pub fn init_logger(production: bool, verbose: bool) {
    if production {
        init_production_logger(verbose);
    } else {
        init_cli_logger(verbose);
    }
}
