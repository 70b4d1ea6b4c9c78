//! src/main.rs
//! Headless driver for the link core: `linkpane <source> <target-folder>`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{info, warn};

use linkpane_core::{
    Config, DualPane, LoggerBuilder,
    controller::{DropOutcome, PaneId},
    fs::has_elevated_privileges,
    operators::link_creator::{LinkRequest, into_status},
};

fn main() -> Result<ExitCode> {
    let config = Config::load().unwrap_or_else(|err| {
        eprintln!("Failed to load config ({err}), using defaults");
        Config::default()
    });

    let _guard = LoggerBuilder::new()
        .with_config(config.logging.clone())
        .build()
        .context("Failed to initialize logging")?;

    let elevated = has_elevated_privileges();
    info!(marker = "APP_START", operation_type = "startup", elevated, "linkpane started");
    if !elevated && cfg!(windows) {
        warn!("Not elevated; symbolic link creation may be refused");
    }

    let panes = DualPane::new(config);
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.as_slice() {
        [] => {
            println!("{}", panes.window_title("linkpane"));
            for id in PaneId::ALL {
                let root = panes.pane(id).current_root_display();
                let shown = if root.is_empty() { "<all roots>" } else { root.as_str() };
                println!("{id}: {shown}");
            }
            if let Ok(path) = Config::config_path() {
                println!("config: {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        [source, target] => {
            let source = PathBuf::from(source);
            let target = PathBuf::from(target);

            // Already asked on the command line.
            match panes.handle_drop(&source, &target, &mut |_: &LinkRequest| true) {
                DropOutcome::Cancelled => Ok(ExitCode::FAILURE),
                DropOutcome::Completed { result, refresh } => {
                    let (ok, message) = into_status(&result);
                    println!("{message}");
                    for id in refresh {
                        println!("refresh: {id} pane");
                    }
                    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
                }
            }
        }
        _ => {
            eprintln!("usage: linkpane [<source> <target-folder>]");
            Ok(ExitCode::from(2))
        }
    }
}
