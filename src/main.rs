use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use nano_http::server::Server;

const DEFAULT_PORT: u16 = 4221;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let files_dir = files_dir_from_args().unwrap_or_else(|| PathBuf::from("."));
    let address = SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT));

    let server = match Server::builder().address(address).files_dir(files_dir).bind().await {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, port = DEFAULT_PORT, "bind server error");
            process::exit(1);
        }
    };

    info!(addr = %server.local_addr(), "start listening");
    server.run().await;
}

/// Base directory for the file routes, taken from `--directory <path>`.
fn files_dir_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--directory" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
