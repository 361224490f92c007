//! Signal handling for the kiosk process.
//!
//! Translates Unix signals into messages on the main-loop channel:
//! SIGUSR2 requests a configuration reload (`salatr reload` sends it),
//! SIGINT/SIGTERM/SIGHUP request shutdown. The config watcher feeds the
//! same channel, so the main loop has a single wakeup source besides its
//! once-per-second tick.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR2},
    iterator::Signals,
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::{Receiver, Sender, channel},
};
use std::thread;

/// Unified message type for everything that can wake the main loop early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalMessage {
    /// Configuration or timetable changed; rebuild and re-evaluate now.
    Reload,
    /// Terminate the kiosk cleanly.
    Shutdown,
}

/// Shared state between the signal thread and the main loop.
pub struct SignalState {
    /// Cleared when a shutdown signal arrives.
    pub running: Arc<AtomicBool>,
    /// Main-loop receiving end.
    pub signal_receiver: Receiver<SignalMessage>,
    /// Cloneable sender for the config watcher.
    pub signal_sender: Sender<SignalMessage>,
}

/// Install the signal handler thread and return the shared state.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let running = Arc::new(AtomicBool::new(true));
    let (sender, receiver) = channel();

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP, SIGUSR2])
        .context("failed to install signal handlers")?;

    let thread_running = Arc::clone(&running);
    let thread_sender = sender.clone();
    thread::spawn(move || {
        for signal in signals.forever() {
            match signal {
                SIGUSR2 => {
                    if debug_enabled {
                        log_pipe!();
                        log_debug!("Received SIGUSR2, requesting reload");
                    }
                    if thread_sender.send(SignalMessage::Reload).is_err() {
                        break;
                    }
                }
                SIGINT | SIGTERM | SIGHUP => {
                    thread_running.store(false, Ordering::SeqCst);
                    let _ = thread_sender.send(SignalMessage::Shutdown);
                    break;
                }
                _ => {}
            }
        }
    });

    Ok(SignalState {
        running,
        signal_receiver: receiver,
        signal_sender: sender,
    })
}
