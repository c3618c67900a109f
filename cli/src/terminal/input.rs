//! Early-stop listeners.
//!
//! Both only flip the engine's [`StopSignal`]; the scan then winds down after
//! the group it is currently on and the partial report is still written.

use std::io::IsTerminal;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use rgscan_common::warn;
use rgscan_core::StopSignal;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Watches the terminal for `q` (followed by Enter in a cooked terminal).
///
/// Does nothing when stdin is not a terminal.
pub fn spawn_key_listener(signal: StopSignal) {
    if !std::io::stdin().is_terminal() {
        return;
    }

    thread::spawn(move || {
        loop {
            if signal.is_stopped() {
                break;
            }
            match event::poll(POLL_INTERVAL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(_) => break,
            }
            if let Ok(Event::Key(key_event)) = event::read() {
                let is_q = key_event.code == KeyCode::Char('q');
                let is_ctrl_c = key_event.code == KeyCode::Char('c')
                    && key_event.modifiers.contains(KeyModifiers::CONTROL);

                if (is_q || is_ctrl_c) && key_event.kind == KeyEventKind::Press {
                    warn!("Stop requested, finishing the current resource group");
                    signal.stop();
                    break;
                }
            }
        }
    });
}

/// First Ctrl-C asks for a graceful stop, a second one exits immediately.
pub fn spawn_ctrl_c_handler(signal: StopSignal) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupted, finishing the current resource group (Ctrl-C again to abort)");
        signal.stop();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
}
