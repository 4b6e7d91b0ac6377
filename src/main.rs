//! CLI entry point for `attachShell`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use attachshell::client::{AttachmentSource, HttpClient};
use attachshell::config::{self, Config};
use attachshell::cursor::{AttachmentCursor, Direction, NotFoundReason, Resolution};
use attachshell::export::attachment::{download_name, save_content};
use attachshell::grid::ImageGrid;
use attachshell::i18n;
use attachshell::model::attachment::{AttachmentId, AttachmentRecord};
use attachshell::model::image::{ImageOrder, SortDirection};
use attachshell::model::ordering::Ordering;

#[derive(Parser)]
#[command(name = "attachshell", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend base URL (overrides server.base_url)
    #[arg(long, global = true, value_name = "URL", env = "ATTACHSHELL_SERVER")]
    server: Option<String>,

    /// Ordering: random, id, size-asc, size-desc
    #[arg(long, global = true, value_name = "ORDER")]
    order: Option<Ordering>,

    /// Skip attachments smaller than this many bytes
    #[arg(long, global = true, value_name = "BYTES")]
    min_size: Option<u64>,

    /// Show PDF, Word and octet-stream attachments
    #[arg(long, global = true, conflicts_with = "hide_docs")]
    allow_octet: bool,

    /// Hide PDF, Word and octet-stream attachments
    #[arg(long, global = true)]
    hide_docs: bool,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Language (en, es). Defaults to system locale.
    #[arg(long, global = true, value_name = "LANG")]
    lang: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse attachments in the TUI
    Browse,
    /// Resolve one attachment and print it
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Walk several attachments in a row
    Walk {
        /// Number of resolves, the first one included
        #[arg(short = 'n', long, default_value_t = 10)]
        steps: u32,
        /// Walk backwards
        #[arg(long)]
        previous: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print one page of the image listing
    Images {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Sort key: date, size, id
        #[arg(long = "sort", value_name = "KEY")]
        sort: Option<ImageOrder>,
        /// asc or desc
        #[arg(long)]
        direction: Option<SortDirection>,
        /// Include non-image attachments
        #[arg(long)]
        all_types: bool,
        #[arg(long)]
        json: bool,
    },
    /// Download an attachment to disk
    Download {
        id: String,
        /// Target directory or file
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
        /// Fetch the preview rendition instead of the original
        #[arg(long)]
        preview: bool,
    },
    /// Delete an attachment from the archive
    Delete { id: String },
    /// Print the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        save: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

/// Detect language early from --lang arg or system env, before clap processes --help.
fn detect_lang_early() -> i18n::Lang {
    let args: Vec<String> = std::env::args().collect();
    for (i, arg) in args.iter().enumerate() {
        if arg == "--lang" {
            if let Some(lang) = args.get(i + 1).and_then(|c| i18n::Lang::from_code(c)) {
                return lang;
            }
        }
        if let Some(lang) = arg
            .strip_prefix("--lang=")
            .and_then(i18n::Lang::from_code)
        {
            return lang;
        }
    }
    i18n::detect_system_lang()
}

/// Build a localized clap Command using i18n strings.
fn build_localized_command() -> clap::Command {
    let mut cmd = Cli::command()
        .about(i18n::app_about())
        .long_about(i18n::app_long_about())
        .after_help(i18n::app_after_help());

    let localized: [(&str, &str); 9] = [
        ("browse", i18n::help_cmd_browse()),
        ("show", i18n::help_cmd_show()),
        ("walk", i18n::help_cmd_walk()),
        ("images", i18n::help_cmd_images()),
        ("download", i18n::help_cmd_download()),
        ("delete", i18n::help_cmd_delete()),
        ("config", i18n::help_cmd_config()),
        ("completions", i18n::help_cmd_completions()),
        ("manpage", i18n::help_cmd_manpage()),
    ];
    for (name, about) in localized {
        cmd = cmd.mut_subcommand(name, |s| s.about(about));
    }
    cmd
}

fn main() -> anyhow::Result<()> {
    // Detect language BEFORE clap parsing so --help is localized
    i18n::set_lang(detect_lang_early());

    let matches = build_localized_command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let mut config = config::load_config();
    apply_overrides(&mut config, &cli);

    let log_level = match cli.verbose {
        0 => config.general.log_level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let is_tui = matches!(cli.command, None | Some(Commands::Browse));
    setup_logging(&log_level, &config, !is_tui);

    match cli.command {
        Some(Commands::Completions { shell }) => return cmd_completions(shell),
        Some(Commands::Manpage) => return cmd_manpage(),
        Some(Commands::Config { save }) => return cmd_config(&config, save),
        _ => {}
    }

    let client = HttpClient::from_config(&config.server)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        None | Some(Commands::Browse) => {
            attachshell::tui::run_tui(client, &config, runtime.handle().clone())
        }
        Some(Commands::Show { json }) => runtime.block_on(cmd_show(&client, &config, json)),
        Some(Commands::Walk {
            steps,
            previous,
            json,
        }) => runtime.block_on(cmd_walk(&client, &config, steps, previous, json)),
        Some(Commands::Images {
            page,
            sort,
            direction,
            all_types,
            json,
        }) => {
            let mut query = config.grid.query();
            if let Some(order) = sort {
                query.order = order;
            }
            if let Some(direction) = direction {
                query.direction = direction;
            }
            query.all_types |= all_types;
            runtime.block_on(cmd_images(&client, ImageGrid::new(query), page, json))
        }
        Some(Commands::Download {
            id,
            output,
            preview,
        }) => runtime.block_on(cmd_download(&client, &id.as_str().into(), &output, preview)),
        Some(Commands::Delete { id }) => runtime.block_on(cmd_delete(&client, &id.as_str().into())),
        Some(Commands::Completions { .. })
        | Some(Commands::Manpage)
        | Some(Commands::Config { .. }) => Ok(()),
    }
}

/// Command-line flags win over the config file.
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(server) = &cli.server {
        config.server.base_url = server.clone();
    }
    if let Some(order) = cli.order {
        config.viewer.ordering = order;
    }
    if let Some(min_size) = cli.min_size {
        config.viewer.min_size = min_size;
    }
    if cli.allow_octet {
        config.viewer.allow_octet_like = true;
    }
    if cli.hide_docs {
        config.viewer.allow_octet_like = false;
    }
}

/// Set up tracing with an optional stderr layer and a log file.
///
/// The TUI owns the terminal, so it runs without the stderr layer.
fn setup_logging(level: &str, config: &Config, stderr: bool) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer =
        stderr.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    let log_file = config::log_file_path(config);
    let file_layer = log_file
        .parent()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .and_then(|dir| Some((dir, log_file.file_name()?)))
        .map(|(dir, name)| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(tracing_appender::rolling::never(dir, name))
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
}

/// Spinner shown while a request is in flight.
fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn new_cursor(config: &Config) -> AttachmentCursor {
    AttachmentCursor::new(config.viewer.ordering, config.viewer.filters())
        .with_limits(config.viewer.limits())
}

/// Resolve once from the start and print the record.
async fn cmd_show(client: &HttpClient, config: &Config, json: bool) -> anyhow::Result<()> {
    let mut cursor = new_cursor(config);
    let pb = spinner(i18n::msg_resolving().to_string());
    let resolution = cursor.resolve(client, Direction::Initial).await;
    pb.finish_and_clear();

    match resolution? {
        Resolution::Found(record) if json => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Resolution::Found(record) => print_record(&record, cursor.offset()),
        Resolution::NotFound(reason) => print_not_found(reason),
        Resolution::Unchanged => {}
    }
    Ok(())
}

/// Resolve `steps` times: once from the start, then in one direction.
async fn cmd_walk(
    client: &HttpClient,
    config: &Config,
    steps: u32,
    previous: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut cursor = new_cursor(config);
    let direction = if previous {
        Direction::Previous
    } else {
        Direction::Next
    };

    let mut rows = Vec::new();
    let pb = spinner(i18n::msg_resolving().to_string());
    for step in 0..steps {
        let dir = if step == 0 { Direction::Initial } else { direction };
        match cursor.resolve(client, dir).await? {
            Resolution::Found(record) => rows.push((cursor.offset(), record)),
            Resolution::NotFound(reason) => {
                pb.finish_and_clear();
                print_walk(&rows, json)?;
                print_not_found(reason);
                return Ok(());
            }
            Resolution::Unchanged => {
                pb.finish_and_clear();
                print_walk(&rows, json)?;
                eprintln!("  {}", i18n::msg_previous_disabled());
                return Ok(());
            }
        }
    }
    pb.finish_and_clear();
    print_walk(&rows, json)
}

/// Load one page of the image listing and print it.
async fn cmd_images(
    client: &HttpClient,
    mut grid: ImageGrid,
    page: u32,
    json: bool,
) -> anyhow::Result<()> {
    let pb = spinner(format!("{} {page}", i18n::msg_loading_page()));
    let loaded = grid.goto(client, page).await;
    pb.finish_and_clear();
    loaded?;

    if json {
        let out = serde_json::json!({
            "page": grid.page(),
            "total_pages": grid.total_pages(),
            "images": grid.images(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {} {} {}",
        i18n::msg_page(),
        grid.page(),
        i18n::msg_of(),
        grid.total_pages()
    );
    println!();
    print_record_table(grid.images().iter().map(|r| (None, r)));
    Ok(())
}

async fn cmd_download(
    client: &HttpClient,
    id: &AttachmentId,
    output: &Path,
    preview: bool,
) -> anyhow::Result<()> {
    let pb = spinner(format!("{} {id}", i18n::msg_downloading()));
    let download = client.download(id, preview).await;
    pb.finish_and_clear();
    let download = download?;

    let name = download_name(
        id,
        download.filename.as_deref(),
        download.content_type.as_deref(),
    );
    let path = save_content(&download.bytes, &name, output)?;
    println!(
        "  {} {} ({})",
        i18n::msg_saved_to(),
        path.display(),
        humansize::format_size(download.bytes.len() as u64, humansize::BINARY)
    );
    Ok(())
}

/// Print the effective configuration, flags applied, optionally saving it.
fn cmd_config(config: &Config, save: bool) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    if save {
        let path = config::save_config(config)?;
        println!("  {} {}", i18n::msg_config_saved(), path.display());
    }
    Ok(())
}

async fn cmd_delete(client: &HttpClient, id: &AttachmentId) -> anyhow::Result<()> {
    client.delete(id).await?;
    println!("  {} {id}", i18n::msg_deleted());
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "attachshell", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let man = clap_mangen::Man::new(Cli::command());
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

fn print_not_found(reason: NotFoundReason) {
    let msg = match reason {
        NotFoundReason::Empty => i18n::msg_no_attachments(),
        NotFoundReason::FilterExhausted => i18n::msg_no_match(),
    };
    println!("  {msg}");
}

/// Print a single record as a two-column table.
fn print_record(record: &AttachmentRecord, offset: u64) {
    use humansize::{format_size, BINARY};

    println!();
    println!("  {:<12} {}", i18n::tui_col_id(), record.attachment_id);
    println!("  {:<12} {}", i18n::tui_col_filename(), record.display_name());
    println!("  {:<12} {}", i18n::tui_col_type(), record.content_type);
    println!(
        "  {:<12} {} ({} B)",
        i18n::tui_col_size(),
        format_size(record.size, BINARY),
        record.size
    );
    if let Some(subject) = record.email_subject() {
        println!("  {:<12} {subject}", i18n::tui_col_subject());
    }
    println!("  {:<12} {offset}", i18n::tui_offset());
    println!();
}

fn print_walk(rows: &[(u64, AttachmentRecord)], json: bool) -> anyhow::Result<()> {
    if json {
        let items: Vec<serde_json::Value> = rows
            .iter()
            .map(|(offset, record)| serde_json::json!({ "offset": offset, "record": record }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        println!();
        print_record_table(rows.iter().map(|(o, r)| (Some(*o), r)));
    }
    Ok(())
}

/// Print records as a human-readable table; the offset column is optional.
fn print_record_table<'a>(rows: impl Iterator<Item = (Option<u64>, &'a AttachmentRecord)>) {
    use humansize::{format_size, BINARY};

    println!(
        "  {:>8} {:<10} {:<32} {:<24} {:>10}",
        i18n::tui_offset(),
        i18n::tui_col_id(),
        i18n::tui_col_filename(),
        i18n::tui_col_type(),
        i18n::tui_col_size()
    );
    println!("  {}", "-".repeat(88));

    for (offset, record) in rows {
        let offset = offset.map(|o| o.to_string()).unwrap_or_default();
        let name: String = record.display_name().chars().take(31).collect();
        let ctype: String = record.content_type.chars().take(23).collect();
        println!(
            "  {:>8} {:<10} {:<32} {:<24} {:>10}",
            offset,
            record.attachment_id.to_string(),
            name,
            ctype,
            format_size(record.size, BINARY)
        );
    }
    println!();
}
