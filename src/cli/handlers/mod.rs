use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::state::{ViewState, read_view_state, write_view_state};
use crate::io::vault_io::VaultStore;
use crate::model::board::TimeFilter;
use crate::sync::{BoardCoordinator, MoveOutcome};

type HandlerResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> HandlerResult {
    let json = cli.json;
    let root = resolve_vault(cli.vault.as_deref())?;

    match cli.command {
        None => cmd_board(&root, BoardArgs::default(), json),
        Some(cmd) => match cmd {
            Commands::Board(args) => cmd_board(&root, args, json),
            Commands::Move(args) => cmd_move(&root, args, json),
            Commands::Add(args) => cmd_add(&root, args, json),
            Commands::Filter(args) => cmd_filter(&root, args, json),
            Commands::Watch(args) => cmd_watch(&root, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_vault(dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let root = match dir {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        return Err(format!("vault '{}' is not a directory", root.display()).into());
    }
    Ok(root)
}

/// Open the board for `root`: config, store and the saved filter.
fn open_board(root: &Path) -> Result<BoardCoordinator<VaultStore>, Box<dyn std::error::Error>> {
    let config = config_io::load_config(root)?;
    let filter = read_view_state(root)
        .map(|state| state.filter)
        .unwrap_or(config.board.default_filter);
    let store = VaultStore::new(root, config.vault.ignore.clone());
    Ok(BoardCoordinator::new(store, config).with_filter(filter))
}

/// Accept `./Tasks/A.md` and `Tasks\A.md` as well as `Tasks/A.md`.
fn normalize_doc_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.trim_start_matches("./").to_string()
}

/// `pretty` spreads JSON over several lines; `watch` wants one board per line.
fn print_board(board: &BoardCoordinator<VaultStore>, json: bool, pretty: bool) -> HandlerResult {
    if json {
        let out = board_to_json(board.board(), board.time_filter());
        if pretty {
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            println!("{}", serde_json::to_string(&out)?);
        }
    } else {
        println!("{}", format_board(board.board(), board.time_filter()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_board(root: &Path, args: BoardArgs, json: bool) -> HandlerResult {
    let mut board = open_board(root)?;
    if let Some(filter) = args.filter {
        board = board.with_filter(filter);
    }
    board.load_board()?;
    print_board(&board, json, true)
}

fn cmd_move(root: &Path, args: MoveArgs, json: bool) -> HandlerResult {
    let mut board = open_board(root)?;
    let path = normalize_doc_path(&args.path);
    let outcome = board.move_task(&path, args.status, args.index)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&move_to_json(&path, &outcome))?);
    } else {
        match outcome {
            MoveOutcome::Moved { .. } => println!("{}", format_move(&path, &outcome)),
            MoveOutcome::Skipped(_) => eprintln!("{}", format_move(&path, &outcome)),
        }
    }
    Ok(())
}

fn cmd_add(root: &Path, args: AddArgs, json: bool) -> HandlerResult {
    let mut board = open_board(root)?;
    let task = board.create_task(args.status)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("{}", task.path);
    }
    Ok(())
}

fn cmd_filter(root: &Path, args: FilterArgs, json: bool) -> HandlerResult {
    let filter = match args.mode {
        Some(mode) => {
            write_view_state(root, &ViewState { filter: mode })?;
            mode
        }
        None => {
            let config = config_io::load_config(root)?;
            read_view_state(root)
                .map(|state| state.filter)
                .unwrap_or(config.board.default_filter)
        }
    };
    print_filter(filter, json)
}

fn print_filter(filter: TimeFilter, json: bool) -> HandlerResult {
    if json {
        let out = FilterJson {
            filter,
            label: filter.label(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{} ({})", filter, filter.label());
    }
    Ok(())
}

/// Runs until interrupted. JSON mode prints one compact board per line.
fn cmd_watch(root: &Path, args: WatchArgs, json: bool) -> HandlerResult {
    let mut board = open_board(root)?;
    board.load_board()?;
    board.attach_watcher()?;
    print_board(&board, json, false)?;

    let interval = Duration::from_millis(args.interval.max(10));
    loop {
        thread::sleep(interval);
        if board.poll_changes()? {
            if !json {
                println!();
            }
            print_board(&board, json, false)?;
        }
    }
}
