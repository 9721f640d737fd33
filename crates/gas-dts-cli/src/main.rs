use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use gas_dts::{
    DeclKind, DirectoryWriter, Document, DocumentationDatabase, GeneratorConfig, generate,
    write_all,
};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEBUG_ENV: &str = "GAS_DTS_DEBUG";
const DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_OUT_DIR: &str = "dist";

#[derive(Parser, Debug)]
#[command(
    name = "gas-dts",
    version,
    about = "Generate TypeScript declarations for the Apps Script services"
)]
struct Cli {
    /// Enable verbose debug logging (or set GAS_DTS_DEBUG=1)
    #[arg(short, long, global = true)]
    debug: bool,

    /// Configuration file (default: gas-dts.toml in the working directory, if present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one declaration file per category
    Generate(GenerateArgs),
    /// Print the built-in configuration as TOML
    DefaultConfig,
    /// Summarize a documentation database without generating anything
    Inspect {
        /// Documentation database (default: stdin)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Documentation database (default: stdin)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,
    /// Output directory
    #[arg(short, long, default_value = DEFAULT_OUT_DIR, value_name = "DIR")]
    out_dir: PathBuf,
    /// Date written into the header (default: today)
    #[arg(long, value_parser = parse_date, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,
    /// Print every document to stdout instead of writing files
    #[arg(long)]
    stdout: bool,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug || env::var(DEBUG_ENV).is_ok_and(|v| v == "1"));

    if let Err(err) = run(cli) {
        report_error(&err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn report_error(err: &anyhow::Error) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(stderr, "error");
    let _ = stderr.reset();
    let _ = writeln!(stderr, ": {err:#}");
}

fn run(cli: Cli) -> Result<()> {
    if let Some(Command::DefaultConfig) = cli.command {
        return run_default_config();
    }

    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Some(Command::Inspect { input }) => run_inspect(input.as_deref(), &config),
        Some(Command::Generate(args)) => run_generate(&args, &config),
        Some(Command::DefaultConfig) | None => {
            let args = GenerateArgs {
                input: None,
                out_dir: PathBuf::from(DEFAULT_OUT_DIR),
                date: None,
                stdout: false,
            };
            run_generate(&args, &config)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    let config = match path {
        Some(path) => GeneratorConfig::load_from_path(path)?,
        None => {
            let cwd = env::current_dir().context("failed to determine working directory")?;
            GeneratorConfig::load_or_default(&cwd)?
        }
    };
    Ok(config)
}

fn load_database(input: Option<&Path>) -> Result<DocumentationDatabase> {
    let db = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            DocumentationDatabase::from_reader(BufReader::new(file))
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => DocumentationDatabase::from_reader(io::stdin().lock())
            .context("failed to load documentation database from stdin")?,
    };
    debug!(
        categories = db.categories.len(),
        services = db.services.len(),
        "loaded documentation database"
    );
    Ok(db)
}

fn run_default_config() -> Result<()> {
    let toml = GeneratorConfig::default()
        .to_toml_string()
        .context("failed to serialize default configuration")?;
    print!("{toml}");
    Ok(())
}

fn run_generate(args: &GenerateArgs, config: &GeneratorConfig) -> Result<()> {
    let db = load_database(args.input.as_deref())?;
    let header_template = config.header_template_text()?;
    let date = args
        .date
        .unwrap_or_else(|| Local::now().date_naive())
        .format(DATE_FORMAT)
        .to_string();

    let documents = generate(&db, config, &header_template, &date);

    if args.stdout {
        print_documents(&documents)?;
        return Ok(());
    }

    let mut writer = DirectoryWriter::new(&args.out_dir);
    let written = write_all(&mut writer, &documents)?;
    info!(
        documents = written,
        out_dir = %writer.root().display(),
        "generation finished"
    );
    Ok(())
}

fn print_documents(documents: &[Document]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for document in documents {
        writeln!(out, "// ==> {}", document.file_name)?;
        out.write_all(document.content.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

fn run_inspect(input: Option<&Path>, config: &GeneratorConfig) -> Result<()> {
    let db = load_database(input)?;
    let entry_urls = db.entry_point_urls();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut declarations = 0;
    let mut entry_points = 0;

    for (key, category) in &db.categories {
        let enums = category
            .decls
            .values()
            .filter(|decl| decl.kind == DeclKind::Enum)
            .count();
        let interfaces = category.decls.len() - enums;
        declarations += category.decls.len();

        writeln!(
            out,
            "{key} ({}): {interfaces} interfaces, {enums} enums",
            category.display_name()
        )?;
        for (name, decl) in &category.decls {
            if !entry_urls.contains(decl.url.as_str()) {
                continue;
            }
            entry_points += 1;
            let global = name.rsplit('.').next().unwrap_or(name);
            if config.conflicting_global(global).is_some() {
                writeln!(out, "  entry point: {name} (binding commented out)")?;
            } else {
                writeln!(out, "  entry point: {name}")?;
            }
        }
    }

    writeln!(
        out,
        "{} categories, {declarations} declarations, {entry_points} entry points",
        db.categories.len()
    )?;
    Ok(())
}
