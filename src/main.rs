use anyhow::Context;
use clap::{Parser, Subcommand};
use imgrender::{Matrix, PixelSize, RenderMode, ServiceConfig};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "imgrender", version, about = "Render color matrices as PNG images")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP render service
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,
        /// Worker threads (defaults to the number of CPUs)
        #[arg(long)]
        workers: Option<usize>,
        #[arg(long, default_value_t = PixelSize::DEFAULT, value_parser = parse_pixel_size)]
        default_pix_size: PixelSize,
        #[arg(long)]
        max_body_bytes: Option<usize>,
        /// Largest output image, in pixels, a request may produce
        #[arg(long)]
        max_canvas_pixels: Option<u64>,
    },
    /// Render a JSON matrix file to a PNG file
    Render {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value = "block", value_parser = parse_mode)]
        mode: RenderMode,
        #[arg(long, default_value_t = PixelSize::DEFAULT, value_parser = parse_pixel_size)]
        pix_size: PixelSize,
    },
}

fn parse_pixel_size(s: &str) -> Result<PixelSize, String> {
    s.parse().map_err(|e: imgrender::Error| e.to_string())
}

fn parse_mode(s: &str) -> Result<RenderMode, String> {
    s.parse().map_err(|e: imgrender::Error| e.to_string())
}

fn serve_cmd(config: ServiceConfig) -> anyhow::Result<()> {
    let service = imgrender::new_service(config).context("failed to start render service")?;
    service.serve()?;
    Ok(())
}

fn render_cmd(
    input: &Path,
    output: &Path,
    mode: RenderMode,
    pix_size: PixelSize,
) -> anyhow::Result<()> {
    let json = std::fs::read(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let matrix = Matrix::from_json(&json)
        .with_context(|| format!("failed to load matrix from {}", input.display()))?;
    let image = imgrender::render_png(&matrix, mode, pix_size)?;
    std::fs::write(output, &image.png_data)
        .with_context(|| format!("failed to write {}", output.display()))?;
    log::info!(
        "{} -> {} ({}x{}, {} mode)",
        input.display(),
        output.display(),
        image.width,
        image.height,
        mode
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Serve {
            addr,
            workers,
            default_pix_size,
            max_body_bytes,
            max_canvas_pixels,
        } => {
            let defaults = ServiceConfig::default();
            serve_cmd(ServiceConfig {
                addr,
                workers: workers.unwrap_or(defaults.workers),
                default_pixel_size: default_pix_size,
                max_body_bytes: max_body_bytes.unwrap_or(defaults.max_body_bytes),
                max_canvas_pixels: max_canvas_pixels.unwrap_or(defaults.max_canvas_pixels),
            })
        }
        Command::Render {
            input,
            output,
            mode,
            pix_size,
        } => render_cmd(&input, &output, mode, pix_size),
    };

    if let Err(e) = result {
        eprintln!("imgrender: {:#}", e);
        std::process::exit(1);
    }
}
