use std::time::Duration;

use boilerplate_emulator::app::{App, AppConfig};
use boilerplate_emulator::server::Server;
use clap::Parser;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Serve the boilerplate application emulator on an APDU port", long_about = None)]
struct Cli {
    /// Address to listen on
    #[clap(long, env = "EMULATOR_APDU_HOST", default_value = "127.0.0.1")]
    host: String,
    /// Port to listen on, Speculos uses 9999
    #[clap(long, env = "EMULATOR_APDU_PORT", default_value_t = 9999)]
    port: u16,
    /// Answer get version with this `major.minor.patch` instead of an empty payload
    #[clap(long)]
    version_reply: Option<String>,
    /// Wall clock milliseconds per ticker event
    #[clap(long, default_value_t = 100)]
    tick_ms: u64,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let app = App::new(AppConfig {
        version_reply: cli.version_reply,
        tick_interval: Duration::from_millis(cli.tick_ms),
        ..AppConfig::default()
    });

    let result = Server::bind((cli.host.as_str(), cli.port), app).and_then(Server::run);
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
