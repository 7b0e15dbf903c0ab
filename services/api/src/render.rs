use crate::infra::build_projector;
use application_documents::config::AppConfig;
use application_documents::documents::ApplicationId;
use application_documents::error::AppError;
use application_documents::telemetry;
use clap::Args;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct RenderArgs {
    /// Identifier of the application to render
    #[arg(long)]
    pub(crate) application_id: ApplicationId,
    /// Base address template paths are resolved against (defaults to DOCS_BASE_URI)
    #[arg(long)]
    pub(crate) base_uri: Option<String>,
    /// File the PDF is written to
    #[arg(long)]
    pub(crate) output: PathBuf,
}

pub(crate) fn run_render(args: RenderArgs) -> Result<(), AppError> {
    let RenderArgs {
        application_id,
        base_uri,
        output,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let projector = build_projector(&config.documents)?;
    let base_uri = base_uri.unwrap_or_else(|| config.documents.base_uri.clone());
    let bytes = projector.render(&application_id, &base_uri)?;

    if bytes.is_empty() {
        println!("No document produced for application {application_id}; see warnings above.");
        return Ok(());
    }

    fs::write(&output, &bytes)?;
    info!(%application_id, path = %output.display(), size = bytes.len(), "document written");
    println!("Wrote {} bytes to {}", bytes.len(), output.display());
    Ok(())
}
