//! File watching for hot config and timetable reloading.
//!
//! Watches the directories containing `salatr.toml` and the timetable CSV
//! and feeds a debounced [`SignalMessage::Reload`] into the main loop when
//! either changes, so edits show up on the kiosk without touching it.

use anyhow::{Context, Result};
use notify::{
    Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use super::Config;
use crate::signals::SignalMessage;

/// Debounce duration for file change events (in milliseconds).
/// Editors often write files in several steps; one reload is enough.
const DEBOUNCE_MS: u64 = 500;

/// Start watching the configuration and timetable files for changes.
///
/// Spawns a background thread that lives for the rest of the process.
pub fn start_config_watcher(
    config: &Config,
    signal_sender: Sender<SignalMessage>,
    debug_enabled: bool,
) -> Result<()> {
    let mut watched_files: Vec<PathBuf> = vec![super::get_config_path()?];
    if let Some(timetable) = config.timetable_path()? {
        watched_files.push(timetable);
    }

    if debug_enabled {
        log_pipe!();
        log_debug!("Watching for configuration changes:");
        for path in &watched_files {
            log_indented!("{}", path.display());
        }
    }

    let (tx, rx) = std::sync::mpsc::channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                // Only writes, creations and removals matter for a reload.
                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {
                        let _ = tx.send(event);
                    }
                    _ => {}
                }
            }
        },
        NotifyConfig::default(),
    )
    .context("failed to create file watcher")?;

    // Watch parent directories rather than the files: editors replace files
    // on save, and directory watches survive that.
    let mut watched_dirs = std::collections::HashSet::new();
    for path in &watched_files {
        if let Some(parent) = path.parent()
            && parent.is_dir()
            && watched_dirs.insert(parent.to_path_buf())
        {
            watcher
                .watch(parent, RecursiveMode::NonRecursive)
                .with_context(|| format!("failed to watch directory {}", parent.display()))?;
        }
    }

    thread::spawn(move || {
        // Keep the watcher alive by moving it into the thread.
        let _watcher = watcher;
        let mut last_reload: Option<std::time::Instant> = None;

        for event in rx {
            let affects_watched = event.paths.iter().any(|event_path| {
                watched_files
                    .iter()
                    .any(|watched| event_path == watched)
            });
            if !affects_watched {
                continue;
            }

            if let Some(previous) = last_reload
                && previous.elapsed() < Duration::from_millis(DEBOUNCE_MS)
            {
                continue;
            }
            last_reload = Some(std::time::Instant::now());

            if debug_enabled {
                log_pipe!();
                log_debug!("Configuration change detected, requesting reload");
            }
            if signal_sender.send(SignalMessage::Reload).is_err() {
                // Main loop is gone; nothing left to notify.
                break;
            }
        }
    });

    Ok(())
}
