use apdu_core::error::DeviceError;
use boilerplate_client::cli::{Cli, CliCommand, parse_apdu};
use boilerplate_client::command_sender::BoilerplateCommandSender;
use clap::Parser;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), DeviceError> {
    let mut backend = cli.open_backend()?;
    let mut client = BoilerplateCommandSender::new(&mut backend);

    match &cli.command {
        CliCommand::ShowMessage => {
            let rapdu = client.show_message()?;
            println!("status: {}", rapdu.status_word());
            if !rapdu.is_ok() {
                return Err(DeviceError::StatusResponse(rapdu.status_word()));
            }
        }
        CliCommand::GetVersion => {
            let version = client.get_version()?;
            println!("version: {}", version);
        }
        CliCommand::Raw { apdu } => {
            let command = parse_apdu(apdu)?;
            let rapdu = client.send_raw(&command)?;
            println!("data: {}", hex::encode(rapdu.data()));
            println!("status: {}", rapdu.status_word());
        }
    }

    Ok(())
}
