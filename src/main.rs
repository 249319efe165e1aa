use clap::{Parser, Subcommand};
use shipnotes::{config, generate, output, paginate};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shipnotes")]
#[command(about = "Static changelog generator with paginated HTML and RSS/Atom/JSON feeds")]
#[command(long_about = "\
Static changelog generator with paginated HTML and RSS/Atom/JSON feeds

Your filesystem is the data source: a directory of dated markdown release
notes becomes a paginated changelog with per-entry pages, an optional
year-grouped archive, tag pages, and syndication feeds.

Content structure:

  changelog/
  ├── changelog.toml               # Configuration (optional)
  ├── authors.json                 # Author handles → display identities (optional)
  ├── 2024-03-01-dark-mode.md      # Entry (filename date prefix optional)
  ├── 2024-02-01-sso.mdx           # Entry
  ├── _template.md                 # Underscore prefix = skipped
  └── 2023/                        # Entries may be nested in subdirectories
      └── 2023-11-12-launch.md

Entry resolution (first available wins):
  Date:    front matter `date` → filename YYYY-MM-DD- prefix
  Title:   front matter `title` → first `# heading` in the body
  Slug:    front matter `slug` → slugified filename stem
  Excerpt: front matter `description` → body above <!-- truncate --> →
           first paragraph capped at excerpt_length

Run 'shipnotes gen-config' to print a documented changelog.toml.")]
#[command(version)]
struct Cli {
    /// Source directory of changelog entries
    #[arg(long, default_value = "changelog", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the changelog site: HTML pages, archive, tags, and feeds
    Build,
    /// Validate entries and configuration without writing output
    Check,
    /// Print a stock changelog.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            println!("==> Building {}", cli.source.display());
            let summary = generate::generate(&cli.source, &cli.output)?;
            output::print_build_output(&summary);
            println!("==> Changelog generated at {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let config = config::load_config(&cli.source)?;
            let collection = generate::build_collection(&cli.source, &config)?;
            // Exercise pagination so page-size problems surface here too
            paginate::paginate(&collection, config.page_size)?;
            output::print_check_output(&collection);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
