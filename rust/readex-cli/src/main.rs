//! readex CLI: render expression trees stored as JSON.

use clap::{Parser as ClapParser, Subcommand};
use readex_cli::colors::Palette;
use readex_cli::config::{ReadexConfig, CONFIG_FILE_NAME};
use readex_cli::render::{self, CliError, SourceOptions};
use readex_translate::diagnostics::Diagnostic;
use readex_translate::{OutputFormat, SettingsConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "readex", version, about = "Render expression trees as readable source code")]
struct Cli {
    /// Disable colored diagnostics
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render expression trees as code
    Render {
        /// JSON tree files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Emit HTML with highlighting spans
        #[arg(long)]
        html: bool,

        /// Indentation string (default: four spaces)
        #[arg(long)]
        indent: Option<String>,

        /// Declare locals with their type instead of `var`
        #[arg(long)]
        explicit_types: bool,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate a source file with one method per tree
    Source {
        /// JSON tree files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Namespace of the generated file
        #[arg(long)]
        namespace: Option<String>,

        /// Name of the generated class
        #[arg(long)]
        class: Option<String>,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check that tree files deserialize
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Create a readex.toml config file in the current directory
    Init,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("READEX_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let palette = if cli.no_color { Palette::new(false) } else { Palette::from_env() };

    match cli.command {
        Commands::Render {
            files,
            html,
            indent,
            explicit_types,
            output,
        } => {
            let overrides = SettingsConfig {
                use_explicit_type_names: explicit_types.then_some(true),
                indent,
                format: html.then_some(OutputFormat::Html),
                ..SettingsConfig::default()
            };
            let config = load_config(palette);
            let settings = render::settings_from(&config.translation, &overrides);
            let result = render::render_files(&files, &settings);
            emit(palette, result, output.as_deref());
        }
        Commands::Source {
            files,
            namespace,
            class,
            output,
        } => {
            let config = load_config(palette);
            let settings = render::settings_from(&config.translation, &SettingsConfig::default());
            let options = SourceOptions {
                namespace: namespace.or(config.source.namespace),
                class: class.or(config.source.class),
            };
            let result = render::source_file(&files, &options, &settings);
            emit(palette, result, output.as_deref());
        }
        Commands::Check { files } => cmd_check(palette, &files),
        Commands::Init => cmd_init(palette),
    }
}

fn load_config(palette: Palette) -> ReadexConfig {
    ReadexConfig::load().unwrap_or_else(|e| {
        eprintln!("{} {}", palette.red("error:"), e);
        std::process::exit(1);
    })
}

fn report(palette: Palette, error: &CliError) {
    print_diagnostic(palette, &error.to_diagnostic());
}

fn print_diagnostic(palette: Palette, diagnostic: &Diagnostic) {
    if palette.is_enabled() {
        eprint!("{}", diagnostic.render_ansi());
    } else {
        eprint!("{}", diagnostic.render_plain());
    }
}

fn emit(palette: Palette, result: Result<String, CliError>, output: Option<&Path>) {
    let text = match result {
        Ok(text) => text,
        Err(e) => {
            report(palette, &e);
            std::process::exit(1);
        }
    };
    match output {
        Some(path) => {
            std::fs::write(path, format!("{text}\n")).unwrap_or_else(|e| {
                eprintln!("{} writing to '{}': {}", palette.red("error:"), path.display(), e);
                std::process::exit(1);
            });
            eprintln!("{} {}", palette.status_label("Wrote"), path.display());
        }
        None => println!("{text}"),
    }
}

fn cmd_check(palette: Palette, files: &[PathBuf]) {
    let mut failed = false;
    for (path, result) in render::check_files(files) {
        match result {
            Ok(()) => println!(
                "{} {}",
                palette.green("✓"),
                palette.bold(&path.display().to_string())
            ),
            Err(e) => {
                failed = true;
                report(palette, &e);
            }
        }
    }
    if failed {
        std::process::exit(1);
    }
}

fn cmd_init(palette: Palette) {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if path.exists() {
        let message = format!("{CONFIG_FILE_NAME} already exists, not overwriting");
        let warning = Diagnostic::warning(message)
            .with_origin(path.display().to_string())
            .with_help("edit the existing file or remove it first");
        print_diagnostic(palette, &warning);
        std::process::exit(1);
    }
    std::fs::write(&path, ReadexConfig::default_template()).unwrap_or_else(|e| {
        eprintln!("{} writing {}: {}", palette.red("error:"), CONFIG_FILE_NAME, e);
        std::process::exit(1);
    });
    println!(
        "{} {} {}",
        palette.status_label("Created"),
        CONFIG_FILE_NAME,
        palette.gray("(all options commented out)")
    );
}
