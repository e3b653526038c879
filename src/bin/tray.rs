//! Lantern tray process
//!
//! Puts the Lantern icon in the system tray and keeps it there until the
//! user picks Quit. Update metadata dropped into `update.json` in the data
//! directory is picked up at startup and offered through the menu.

#![windows_subsystem = "windows"]

use anyhow::Result;
use lantern_tray::collaborators::Collaborators;
use lantern_tray::{config, event_loop, update};

fn main() -> Result<()> {
    let app_config = config::load_config();

    tracing_subscriber::fmt()
        .with_max_level(app_config.tracing_level())
        .init();

    tracing::info!("Lantern tray starting...");

    let collaborators = Collaborators::desktop(&app_config.configure_url);

    let code = event_loop::run(app_config, collaborators, |tray| {
        tray.create_tray();

        // Update metadata comes from outside the UI thread
        std::thread::spawn(move || {
            let data_dir = match config::get_data_directory() {
                Ok(dir) => dir,
                Err(e) => {
                    tracing::warn!("No data directory, skipping update check: {}", e);
                    return;
                }
            };
            match update::load_update_file(&data_dir) {
                Ok(Some(info)) => tray.add_update(info.into_map()),
                Ok(None) => tracing::debug!("No pending update"),
                Err(e) => tracing::warn!("Ignoring update file: {:#}", e),
            }
        });
    })?;

    tracing::info!("Lantern tray exiting with code {}", code);
    std::process::exit(code);
}
