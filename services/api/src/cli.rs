use crate::render::{run_render, RenderArgs};
use crate::server;
use application_documents::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Application Documents",
    about = "Serve and render state-aware PDF documents for financial applications",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Render a single application document to a file
    Render(RenderArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Render(args) => tokio::task::spawn_blocking(move || run_render(args))
            .await
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["application-documents"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn render_requires_a_valid_application_id() {
        let err = Cli::try_parse_from([
            "application-documents",
            "render",
            "--application-id",
            "not-a-uuid",
            "--output",
            "out.pdf",
        ])
        .expect_err("invalid id rejected");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
