use std::env;
use std::process::ExitCode;

use originserver::{Server, ServerConfig, StartupError};

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("server: {err}");
            if matches!(err, StartupError::InvalidArgs(_)) {
                eprintln!("usage: server <port> <threads> <queue_size>");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_args(env::args().skip(1))?;
    let doc_root = env::current_dir().map_err(StartupError::DocRoot)?;
    Server::new(config, doc_root).run()
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
