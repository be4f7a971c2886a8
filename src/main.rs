//! Revin CLI - bulk-edit a reminders list in your text editor.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use revin::{Config, ConfigOverrides, ExternalEditor, Outcome, Palette, RemindersCli, Session, TaskStore, Workspace, encode};
use std::fs;
use std::io;
use std::path::PathBuf;

mod cli;

use cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("revin")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("revin.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn overrides(cli: &Cli) -> ConfigOverrides {
    ConfigOverrides {
        reminders_cmd: cli.reminders.clone(),
        editor: cli.editor.clone(),
        home: cli.home.clone(),
        list: cli.list.clone(),
        no_color: cli.no_color,
    }
}

fn run(command: Option<Command>, config: &Config, palette: Palette) -> Result<()> {
    let mut store = RemindersCli::new(&config.reminders_cmd, &config.list);

    match command.unwrap_or(Command::Edit) {
        Command::Edit => {
            let workspace = Workspace::init(&config.home).context("Failed to prepare workspace")?;
            let editor = ExternalEditor::resolve(config.editor.as_deref())?;

            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut output = io::stdout();

            let outcome = Session::new(&mut store, &editor, &workspace, palette).run(&mut input, &mut output)?;
            match outcome {
                Outcome::NothingToDo => println!("Nothing to do."),
                Outcome::Aborted => println!("{}", palette.paint("Aborted.", Color::Yellow)),
                Outcome::Applied { count } => {
                    println!("{} Applied {} change(s).", palette.add("✓"), count)
                }
            }
        }

        Command::Lists => {
            let lists = store.lists().context("Failed to list reminder lists")?;
            if lists.is_empty() {
                println!("No lists found");
            }
            for name in lists {
                if name == store.current_list() {
                    println!("{} {}", palette.add("*"), name);
                } else {
                    println!("  {}", name);
                }
            }
        }

        Command::Show => {
            let tasks = store
                .tasks()
                .with_context(|| format!("Failed to list tasks in {}", store.current_list()))?;
            print!("{}", encode(&tasks));
        }

        Command::Uncomplete { id } => {
            let content = store
                .uncomplete(id)
                .with_context(|| format!("Failed to uncomplete task {}", id))?;
            println!("{} \"{}\"", palette.paint("Uncompleted", Color::Cyan), content);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    // Until the config is read only the flag can turn colour off.
    let mut palette = Palette::new(!cli.no_color);
    let result = Config::load(cli.config.as_deref(), &overrides(&cli))
        .context("Failed to load configuration")
        .and_then(|config| {
            info!("Configuration: {:?}", config);
            palette = Palette::new(config.color);
            run(cli.command, &config, palette)
        });

    if let Err(e) = result {
        eprintln!("{} {}", palette.error("Error:"), e);
        for cause in e.chain().skip(1) {
            eprintln!("  {} {}", palette.faint("caused by:"), cause);
        }
        std::process::exit(1);
    }

    Ok(())
}
