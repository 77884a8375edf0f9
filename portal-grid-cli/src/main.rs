mod fixture;
mod host;
mod render;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use portal_grid::prelude::*;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use host::TableHost;

/// Walks an employees grid through a typical editing session.
#[derive(Parser, Debug)]
#[command(name = "portal-grid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Grid configuration as JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON file holding the employee rows; created on first save
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Search term applied to the final listing
    #[arg(short, long, default_value = "")]
    search: String,

    /// Column to sort the final listing by
    #[arg(long)]
    sort: Option<String>,

    /// Page of the final listing (1-based)
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Log file path
    #[arg(long, default_value = "portal-grid.log")]
    log_file: PathBuf,

    /// Also log to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Command(#[from] CommandError),
}

fn init_logging(cli: &Cli) {
    let log_file = File::create(&cli.log_file).expect("Failed to create log file");
    let mut loggers: Vec<Box<dyn SharedLogger>> =
        vec![WriteLogger::new(LevelFilter::Debug, Config::default(), log_file)];
    if cli.verbose {
        loggers.push(TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    CombinedLogger::init(loggers).expect("Failed to initialize logger");
}

fn load_config(path: Option<&PathBuf>) -> Result<GridConfig, CliError> {
    match path {
        Some(path) => Ok(GridConfig::from_json(&std::fs::read_to_string(path)?)?),
        None => Ok(GridConfig::new("id").with_page_size(5)),
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_ref())?;
    let host = Arc::new(TableHost::open(
        &config.id_field,
        cli.data.clone(),
        fixture::employees(),
    )?);
    let grid = Grid::builder(host)
        .config(config)
        .columns(fixture::columns())
        .schema(fixture::schema())
        .cascade(fixture::cascade())
        .new_row_defaults(Row::new().set("branch_id", 1))
        .build();
    grid.refresh().await?;
    let _refresher = AutoRefresh::from_config(&grid);

    println!("== Employees");
    let mut view = TableView::with_config(grid.columns(), grid.config());
    view.set_rows(grid.effective_rows());
    render::print_view(&view, grid.config());

    // Stage a hire and trip validation on purpose
    let hire = grid.controller().add_row();
    grid.update_field(&hire, "name", "Frances Allen")?;
    grid.update_field(&hire, "email", "frances@example")?;
    match grid.save_all().await {
        Err(CommandError::Validation(errors)) => {
            println!("\n== Save blocked");
            render::print_errors(&errors);
        }
        other => log::warn!("Expected a validation failure, got {other:?}"),
    }

    // Moving branch clears the team, so pick one that belongs to it
    grid.update_field(&hire, "email", "frances@example.com")?;
    grid.update_field(&hire, "team_id", 10)?;
    grid.update_field(&hire, "branch_id", 2)?;
    let teams: Vec<String> = grid
        .options_for(&hire, "team_id")
        .into_iter()
        .map(|o| o.label)
        .collect();
    println!("\nTeams for the new branch: {}", teams.join(", "));
    grid.update_field(&hire, "team_id", 20)?;
    grid.update_field(&hire, "salary", 5500)?;

    // And give someone a raise in the same batch
    let raised = RowId::from(2);
    grid.toggle_edit(&raised)?;
    grid.update_field(&raised, "salary", 6400)?;

    let outcome = grid.save_all().await?;
    println!(
        "\n== Saved {} new and {} updated row(s)",
        outcome.created, outcome.updated
    );

    view.set_rows(grid.effective_rows());
    view.set_search(cli.search.as_str());
    if let Some(key) = &cli.sort {
        view.toggle_sort(key);
    }
    view.set_page(cli.page.saturating_sub(1));

    println!();
    render::print_view(&view, grid.config());

    grid.dispose();
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(cli).await {
        log::error!("{e}");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
