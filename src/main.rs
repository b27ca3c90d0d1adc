use clap::{Parser, Subcommand};
use image_storage::{ImageRequest, ImageStorage, config};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "image-storage")]
#[command(about = "Content-addressed image storage with cached derivatives")]
#[command(long_about = "\
Content-addressed image storage with cached derivatives

Originals are stored by checksum prefix; resized, cropped and converted
variants are generated on first request and cached next to them.

Storage layout:

  www/data/
  └── articles/                         # namespace
      └── a4/                           # first two characters of the checksum
          ├── photo.jpg                 # original
          ├── photo.2.jpg               # same name, different content
          └── photo.800x600.fit.q80.webp  # derivative

Identifier grammar:

  <namespace>/<prefix>/<name>[.<W>x<H>[crop<L>x<T>x<R>x<B>].<flags>[.q<Q>]].<ext>

Run 'image-storage gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Configuration file (stock defaults when absent)
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by commands that produce derivatives.
#[derive(clap::Args, Clone)]
struct TransformArgs {
    /// Resize flags: fit, fill, exact, stretch, shrink_only (join with '+')
    #[arg(long)]
    flag: Option<String>,

    /// Quality override for the output format
    #[arg(long)]
    quality: Option<u8>,

    /// Keep JPEG and PNG sources in their own format
    #[arg(long)]
    keep_format: bool,
}

impl TransformArgs {
    fn request(&self, identifier: String, size: Option<String>) -> ImageRequest {
        ImageRequest {
            identifier,
            size,
            flag: self.flag.clone(),
            quality: self.quality,
            prefer_modern_format: !self.keep_format,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Store a file as an original and print its identifier
    Save {
        file: PathBuf,
        #[arg(long)]
        namespace: String,
        /// Name to store under (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
        /// Precomputed checksum (computed with SHA-256 when absent)
        #[arg(long)]
        checksum: Option<String>,
    },
    /// Resolve an identifier, generating the derivative if needed
    Resolve {
        identifier: String,
        /// WIDTHxHEIGHT[cropLxTxRxB]; omit for the original
        #[arg(long)]
        size: Option<String>,
        #[command(flatten)]
        transform: TransformArgs,
        /// Print the handle as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a srcset attribute value for several sizes
    Srcset {
        identifier: String,
        /// WIDTH or WIDTHxHEIGHT entries
        #[arg(required = true)]
        sizes: Vec<String>,
        /// Prefix for every link
        #[arg(long, default_value = "")]
        prefix: String,
        #[command(flatten)]
        transform: TransformArgs,
    },
    /// Delete an original's derivatives (and the original itself)
    Delete {
        identifier: String,
        /// Keep the untransformed original
        #[arg(long)]
        only_changed: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let storage_config = config::load_config(&cli.config)?;
    let storage = ImageStorage::from_config(&storage_config)?;

    match cli.command {
        Command::Save {
            file,
            namespace,
            name,
            checksum,
        } => {
            let name = match name {
                Some(name) => name,
                None => file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            };
            let content = std::fs::read(&file)?;
            let handle = storage.save_content(&content, &name, &namespace, checksum.as_deref())?;
            println!("{}", handle.identifier());
        }
        Command::Resolve {
            identifier,
            size,
            transform,
            json,
        } => {
            let handle = storage.resolve(&transform.request(identifier, size))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&handle)?);
            } else if let Some(message) = handle.message() {
                println!("{} ({message})", handle.create_link());
            } else {
                println!("{}", handle.create_link());
            }
        }
        Command::Srcset {
            identifier,
            sizes,
            prefix,
            transform,
        } => {
            let request = transform.request(identifier, None);
            println!("{}", storage.create_srcset(&request, &sizes, &prefix)?);
        }
        Command::Delete {
            identifier,
            only_changed,
        } => {
            storage.delete(&identifier, only_changed)?;
        }
        Command::GenConfig => unreachable!("handled before loading config"),
    }

    Ok(())
}
