//! CLI entry point for qrsave.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use qrsave_core::download::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use qrsave_core::{
    Blob, DesktopHost, HostEnvironment, HttpClient, QrRequest, SaveOptions, Saver,
};
use tracing::{debug, info};

mod cli;
mod config;

use cli::{Args, Command, QrArgs, SaveArgs, SaveFileArgs};
use config::{FileConfig, VerbositySetting, load_default_file_config};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Config is loaded before tracing so its verbosity can seed the filter;
    // a broken config file is reported once tracing is up.
    let loaded = load_default_file_config();
    let file_verbosity = loaded
        .as_ref()
        .ok()
        .and_then(|l| l.config.as_ref())
        .and_then(|c| c.verbosity);

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => file_verbosity.map_or("info", VerbositySetting::filter),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let loaded = loaded?;
    debug!(?args, config_path = ?loaded.path, "CLI arguments parsed");
    let file_config = loaded.file_config();

    let client = HttpClient::new_with_timeouts(
        file_config.connect_timeout_secs.unwrap_or(CONNECT_TIMEOUT_SECS),
        file_config.read_timeout_secs.unwrap_or(READ_TIMEOUT_SECS),
    );

    let saved = match &args.command {
        Command::Qr(qr) => {
            let request = build_qr_request(qr, &file_config)?;
            if qr.print_url {
                for format in qr.image_formats() {
                    println!("{}", request.format_url(format));
                }
                return Ok(());
            }
            let host = desktop_host(qr.output.output_dir.as_deref(), &file_config);
            let saver = Saver::new(&HostEnvironment::desktop(), host.clone(), client);
            save_qr(&saver, &request, qr).await;
            host.saved_paths()
        }
        Command::Save(save) => {
            let host = desktop_host(save.output.output_dir.as_deref(), &file_config);
            let saver = Saver::new(&HostEnvironment::desktop(), host.clone(), client);
            save_url(&saver, save).await?;
            host.saved_paths()
        }
        Command::SaveFile(save) => {
            let host = desktop_host(save.output.output_dir.as_deref(), &file_config);
            let saver = Saver::new(&HostEnvironment::desktop(), host.clone(), client);
            save_file(&saver, save).await?;
            host.saved_paths()
        }
    };

    if saved.is_empty() {
        bail!("Nothing was saved");
    }
    for path in &saved {
        println!("{}", path.display());
    }
    info!(files = saved.len(), "Save complete");
    Ok(())
}

fn desktop_host(cli_dir: Option<&Path>, file_config: &FileConfig) -> Arc<DesktopHost> {
    let output_dir = cli_dir
        .map(Path::to_path_buf)
        .or_else(|| file_config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    debug!(output_dir = %output_dir.display(), "Using output directory");
    Arc::new(DesktopHost::new(output_dir))
}

fn build_qr_request(qr: &QrArgs, file_config: &FileConfig) -> Result<QrRequest> {
    let mut request = QrRequest::new(&qr.joined_text())?;
    if let Some(size) = qr.size.or(file_config.size) {
        request = request.with_size(size)?;
    }
    if let Some(margin) = qr.margin.or(file_config.margin) {
        request = request.with_margin(margin)?;
    }
    if let Some(api_base) = qr.api_base.as_deref().or(file_config.api_base.as_deref()) {
        request = request.with_api_base(api_base)?;
    }
    Ok(request)
}

async fn save_qr(saver: &Saver, request: &QrRequest, qr: &QrArgs) {
    for format in qr.image_formats() {
        let url = request.format_url(format);
        let file_name = format.file_name();
        debug!(%format, url = %url, "Saving QR image");
        saver.save(url.as_str(), Some(file_name.as_str()), None).await;
    }
}

async fn save_url(saver: &Saver, save: &SaveArgs) -> Result<()> {
    let options = parse_options(save.options.as_deref())?;
    saver
        .save(save.url.as_str(), save.name.as_deref(), options)
        .await;
    Ok(())
}

async fn save_file(saver: &Saver, save: &SaveFileArgs) -> Result<()> {
    let bytes = tokio::fs::read(&save.path)
        .await
        .with_context(|| format!("Failed to read '{}'", save.path.display()))?;
    let content_type = save
        .content_type
        .as_deref()
        .unwrap_or(qrsave_core::blob::OCTET_STREAM);
    let mut blob = Blob::new(bytes, content_type);
    if let Some(file_name) = save.path.file_name() {
        blob = blob.with_name(file_name.to_string_lossy());
    }

    let options = if save.auto_bom {
        Some(SaveOptions::with_auto_bom())
    } else {
        parse_options(save.options.as_deref())?
    };
    saver.save(blob, save.name.as_deref(), options).await;
    Ok(())
}

fn parse_options(raw: Option<&str>) -> Result<Option<SaveOptions>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let value: serde_json::Value =
        serde_json::from_str(raw).with_context(|| format!("Invalid --options JSON: {raw}"))?;
    Ok(Some(SaveOptions::coerce(&value)))
}
