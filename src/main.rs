use clap::Parser;
use jwt_manager::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Issue(args) => cli::token::issue(args),
        Command::Verify(args) => cli::token::verify(args),
    }
}
