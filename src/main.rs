use clap::Parser;
use color_eyre::Result;
use focuslist::config::tasks_file_for_profile;
use focuslist::{Config, Profile, Session, Storage, cli::{self, Cli, Commands}, logging, utils};
use std::io;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev {
        Profile::Dev
    } else {
        Profile::Prod
    };

    // No subcommand means the interactive UI
    let command = cli.command.unwrap_or(Commands::Tui);

    // The TUI owns the terminal, so its log records go to a file
    let log_dir = match command {
        Commands::Tui => utils::get_data_dir(profile),
        _ => None,
    };
    logging::init(log_dir.as_deref());

    // Load configuration; a new config file points at the profile's own task file
    let config = match cli.config {
        Some(ref path) => Config::load_from_path(&utils::expand_path(path), tasks_file_for_profile(profile))?,
        None => Config::load_with_profile(profile)?,
    };

    // Resolve the task file: --file wins over the config
    let tasks_path: PathBuf = match cli.file {
        Some(ref file) => utils::expand_path(file),
        None => config.get_tasks_path(),
    };
    let storage = Storage::new(tasks_path);
    log::debug!("Using task file {}", storage.path().display());

    let mut out = io::stdout().lock();

    // Dispatch to appropriate command handler
    match command {
        Commands::Tui => {
            let (session, load_error) = Session::open_lenient(storage);
            let mut app = focuslist::tui::App::new(config, session);
            if let Some(e) = load_error {
                app.set_status_message(format!("Could not load tasks: {}", e));
            }
            drop(out);
            focuslist::tui::run_event_loop(app)?;
        }
        Commands::Add { text, category, priority } => {
            let mut session = Session::open(storage)?;
            cli::handle_add(
                &mut session,
                &text,
                category.unwrap_or(config.default_category),
                priority.unwrap_or(config.default_priority),
                &mut out,
            )?;
        }
        Commands::List { query } => {
            let session = Session::open(storage)?;
            cli::handle_list(&session, query.as_deref(), &mut out)?;
        }
        Commands::Done { number } => {
            let mut session = Session::open(storage)?;
            cli::handle_done(&mut session, number, &mut out)?;
        }
        Commands::Delete { number } => {
            let mut session = Session::open(storage)?;
            cli::handle_delete(&mut session, number, &mut out)?;
        }
        Commands::Stats => {
            let session = Session::open(storage)?;
            cli::handle_stats(&session, &mut out)?;
        }
        Commands::Upgrade => {
            cli::handle_upgrade(&mut out)?;
        }
    }

    Ok(())
}
