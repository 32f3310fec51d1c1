use clap::Parser;
use player_console::{run, Command, ConnectionArgs};
use player_database::PlayerRecordStore;

/// Inspect and edit player records
#[derive(Parser, Debug)]
struct Params {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Params::parse();
    log::info!("command: {:?}", args.command);

    let config = args.connection.from_cli_or_env_or_yaml()?;
    let store = PlayerRecordStore::connect(&config).await?;

    let result = run(&store, args.command).await;
    store.disconnect().await;

    println!("{}", result?);
    Ok(())
}
