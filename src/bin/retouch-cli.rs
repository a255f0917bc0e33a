use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use retouch_sim::validation::{
    check_processing_request, EditInstruction, ImageFormat, ProcessingOptions, ProcessingRequest,
    RegionDescriptor,
};

#[derive(Parser)]
#[command(name = "retouch-cli")]
#[command(about = "Command-line client for the retouch simulation API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health
    Health,
    /// Upload an image
    Upload {
        path: PathBuf,
        #[arg(long)]
        bucket: Option<String>,
    },
    /// Run simulated processing on an uploaded file
    Process {
        file_id: String,
        /// Edit as region:effect:intensity, repeatable
        #[arg(long = "edit", value_parser = parse_edit, required = true)]
        edits: Vec<EditInstruction>,
        #[arg(long)]
        generate_3d: bool,
        #[arg(long)]
        include_report: bool,
    },
    /// Validate a region name and type on the server
    ValidateRegion { name: String, region_type: String },
}

fn parse_edit(raw: &str) -> Result<EditInstruction, String> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(intensity), Some(effect), Some(region)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected region:effect:intensity, got {raw:?}"));
    };
    let intensity: f64 = intensity
        .parse()
        .map_err(|_| format!("intensity {intensity:?} is not a number"))?;
    Ok(EditInstruction {
        region: region.to_string(),
        effect: effect.to_string(),
        intensity,
    })
}

/// MIME type from the file extension; the server makes the final call.
fn mime_for(path: &std::path::Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => ImageFormat::Jpeg.mime(),
        Some("png") => ImageFormat::Png.mime(),
        Some("webp") => ImageFormat::Webp.mime(),
        _ => "application/octet-stream",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/api/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Upload { path, bucket } => {
            let data = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            let part = Part::bytes(data)
                .file_name(file_name)
                .mime_str(mime_for(&path))?;
            let mut form = Form::new().part("file", part);
            if let Some(bucket) = bucket {
                form = form.text("bucket", bucket);
            }
            let res = client
                .post(format!("{}/api/upload", cli.url))
                .multipart(form)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Process {
            file_id,
            edits,
            generate_3d,
            include_report,
        } => {
            let request = ProcessingRequest {
                file_id,
                edits,
                options: Some(ProcessingOptions {
                    generate_3d: Some(generate_3d),
                    include_report: Some(include_report),
                }),
            };
            if let Err(e) = check_processing_request(&request) {
                bail!("{e}");
            }
            let res = client
                .post(format!("{}/api/process", cli.url))
                .json(&request)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::ValidateRegion { name, region_type } => {
            let res = client
                .post(format!("{}/api/validate/region", cli.url))
                .json(&RegionDescriptor::new(name, region_type))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> anyhow::Result<()> {
    let status = res.status();
    let text = res.text().await?;
    let body = serde_json::from_str::<Value>(&text)
        .and_then(|json| serde_json::to_string_pretty(&json))
        .unwrap_or(text);

    if status.is_success() {
        println!("{body}");
    } else {
        eprintln!("Error: API returned status {status}");
        eprintln!("{body}");
    }
    Ok(())
}
