use std::io::Write;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

const TIP_DURATION: Duration = Duration::from_secs(2);
const MESSAGE_READ_TIME: Duration = Duration::from_secs(1);
const MIN_TIP_VISIBILITY: Duration = Duration::from_millis(750);
const TIPS: &[&str] = &[
    "Type 'q' and Enter to stop after the current resource group",
    "Ctrl-C stops the scan and still writes the report",
];

pub struct SpinnerHandle {
    pub spinner: ProgressBar,
    tx: Sender<String>,
    rx: Mutex<Option<Receiver<String>>>,
}

impl SpinnerHandle {
    pub fn send_to_queue(&self, message: String) {
        let _ = self.tx.send(message);
    }

    /// Prints above the spinner. Works whether or not the bar is drawn.
    pub fn println(&self, msg: &str) {
        self.spinner.suspend(|| {
            let mut stdout = std::io::stdout().lock();
            let _ = writeln!(stdout, "{msg}");
        });
    }

    pub fn finish_and_clear(&self) {
        self.spinner.finish_and_clear();
    }
}

pub(crate) static SPINNER: OnceLock<SpinnerHandle> = OnceLock::new();

pub fn get_spinner() -> &'static SpinnerHandle {
    SPINNER.get_or_init(init_spinner)
}

fn init_spinner() -> SpinnerHandle {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);

    pb.set_style(style);

    let (tx, rx) = mpsc::channel::<String>();
    SpinnerHandle {
        spinner: pb,
        tx,
        rx: Mutex::new(Some(rx)),
    }
}

/// Cycles tips while no progress message is queued.
fn run_message_loop(pb: ProgressBar, rx: Receiver<String>) {
    let mut tip_index = 0;
    let mut next_action_time = Instant::now() + TIP_DURATION;
    let mut is_showing_tip = false;
    let mut last_tip_time = Instant::now();

    loop {
        if pb.is_finished() {
            break;
        }

        let wait_time = next_action_time.saturating_duration_since(Instant::now());

        match rx.recv_timeout(wait_time) {
            Ok(mut msg) => {
                if is_showing_tip {
                    let elapsed = last_tip_time.elapsed();
                    if elapsed < MIN_TIP_VISIBILITY {
                        thread::sleep(MIN_TIP_VISIBILITY - elapsed);
                    }
                    is_showing_tip = false;
                }
                while let Ok(newer_msg) = rx.try_recv() {
                    msg = newer_msg;
                }
                pb.set_message(msg);
                next_action_time = Instant::now() + MESSAGE_READ_TIME;
            }
            Err(RecvTimeoutError::Timeout) => {
                let tip = TIPS[tip_index % TIPS.len()];
                pb.set_message(format!("{}", tip.italic().white()));

                tip_index += 1;
                is_showing_tip = true;
                last_tip_time = Instant::now();

                next_action_time = Instant::now() + TIP_DURATION;
            }
            Err(RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }
}

/// Starts ticking. Until then the spinner only serves as an output sink.
pub fn start(q_level: u8, show_tips: bool) {
    if q_level >= 2 {
        return;
    }
    let handle = get_spinner();
    let rx = handle.rx.lock().ok().and_then(|mut rx| rx.take());
    if let Some(rx) = rx {
        let pb = handle.spinner.clone();
        if show_tips {
            thread::spawn(move || run_message_loop(pb, rx));
        } else {
            thread::spawn(move || {
                while let Ok(msg) = rx.recv() {
                    if pb.is_finished() {
                        break;
                    }
                    pb.set_message(msg);
                }
            });
        }
    }
    handle.spinner.enable_steady_tick(Duration::from_millis(100));
}

pub fn report_scan_progress(done: usize, total: usize, current: &str) {
    get_spinner().send_to_queue(format!(
        "Scanned {}/{} resource groups, last: {}",
        done.to_string().green().bold(),
        total,
        current.bold()
    ));
}

pub fn finish() {
    get_spinner().finish_and_clear();
}

pub struct SpinnerWriter;

impl std::io::Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        get_spinner().println(msg.trim_end());
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
