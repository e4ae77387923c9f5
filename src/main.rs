use clap::{Parser, Subcommand};
use folio::{config, output, process, routes, server};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio website server and image variant generator")]
#[command(long_about = "\
Portfolio website server and image variant generator

Without a command, serves the site on 0.0.0.0:5000.

Site layout:

  .
  ├── config.toml                  # Optional, see 'folio gen-config'
  └── static/                      # Served under /static/
      └── images/                  # Sources for 'folio images'
          ├── portrait.jpg         # Source
          ├── portrait.webp        # Same size WebP
          ├── portrait-2x.webp     # Double size WebP
          └── portrait@2x.jpg      # Double size JPEG

Existing variants are never overwritten; re-running 'folio images' is safe.")]
#[command(version)]
struct Cli {
    /// Site root holding config.toml and static/
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the website (default)
    Serve,
    /// Generate WebP and 2x variants for every source image
    Images {
        /// Images directory (overrides images.dir from config)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Print the route table
    Routes,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let site_config = config::load_config(&cli.root)?.rooted_at(&cli.root);
            let workers = config::effective_workers(&site_config.server);
            let site = Arc::new(server::Site::from_config(&site_config));
            let bound = server::bind(site_config.server.host, site_config.server.port)?;
            println!(
                "{}",
                output::format_serve_banner(&site_config.site.title, bound.addr(), workers)
            );
            bound.run(site, workers)?;
        }
        Command::Images { dir } => {
            let site_config = config::load_config(&cli.root)?.rooted_at(&cli.root);
            let images_config = match dir {
                Some(dir) => config::ImagesConfig {
                    dir,
                    ..site_config.images
                },
                None => site_config.images,
            };

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = process::process(&images_config, Some(tx));
            // The sender is dropped by now, so the printer drains and exits.
            printer.join().ok();
            let summary = result?;
            println!("{}", output::format_process_summary(&summary));
            if summary.failed > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Routes => {
            output::print_routes(routes::ROUTES);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}
