//! # RFID Tag Reader
//!
//! The reader is a serial device that emits one tag id per line. It is
//! opened like a file and, when it is a terminal, switched to raw mode at
//! the configured baud rate (9600 by default).
//!
//! The open handle is kept across quiet periods: at EOF we wait one poll
//! interval and read again from the same position, so nothing already
//! forwarded is read twice. Only a read error (device unplugged) or a
//! failed open drops the handle and starts the reopen cycle.
//!
//! ```text
//! ┌─────────┐  open   ┌──────────────┐  line   ┌──────────────────────┐
//! │  poll   │ ──────► │ device node  │ ──────► │ Scan(tag) ──► mpsc   │
//! │ (100ms) │ ◄────── │ EOF: re-read │         └──────────────────────┘
//! │         │ ◄────── │ error: reopen│
//! └─────────┘         └──────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use fastr_catalog::normalize_tag;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

use crate::input::KioskCommand;

/// Line speeds accepted for `reader.baud_rate`.
pub const SUPPORTED_BAUD_RATES: &[u32] = &[1200, 2400, 4800, 9600, 19_200, 38_400, 57_600, 115_200];

/// Why [`forward_tags`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderEnd {
    /// No more input for now; the source may produce more later.
    Eof,
    /// Nobody is listening any more.
    ReceiverClosed,
}

/// Forwards each non-blank line of `reader` as a `Scan` command.
///
/// The reader is borrowed so a caller can resume it after `Eof`.
pub async fn forward_tags<R>(
    reader: &mut R,
    tx: &mpsc::Sender<KioskCommand>,
) -> std::io::Result<ReaderEnd>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let Some(tag) = normalize_tag(&line) else {
            continue;
        };
        trace!(tag_id = %tag, "Tag read");
        if tx.send(KioskCommand::Scan(tag.to_string())).await.is_err() {
            return Ok(ReaderEnd::ReceiverClosed);
        }
    }
    Ok(ReaderEnd::Eof)
}

/// Reads tags from `device` until the receiving side goes away.
pub async fn run_device_reader(
    device: PathBuf,
    baud_rate: u32,
    poll_interval: Duration,
    tx: mpsc::Sender<KioskCommand>,
) {
    info!(?device, baud_rate, ?poll_interval, "Tag reader started");

    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut source: Option<BufReader<File>> = None;
    let mut open_failed = false;

    loop {
        ticker.tick().await;
        if tx.is_closed() {
            break;
        }

        if source.is_none() {
            match open_device(&device, baud_rate).await {
                Ok(file) => {
                    if open_failed {
                        info!(?device, "Tag reader reconnected");
                        open_failed = false;
                    }
                    source = Some(BufReader::new(file));
                }
                Err(e) => {
                    if !open_failed {
                        warn!(?device, error = %e, "Tag reader unavailable, retrying");
                        open_failed = true;
                    }
                    continue;
                }
            }
        }
        let Some(reader) = source.as_mut() else {
            continue;
        };

        match forward_tags(reader, &tx).await {
            Ok(ReaderEnd::ReceiverClosed) => break,
            Ok(ReaderEnd::Eof) => trace!(?device, "Tag reader idle"),
            Err(e) => {
                debug!(?device, error = %e, "Tag reader read failed, reopening");
                source = None;
            }
        }
    }

    info!(?device, "Tag reader stopped");
}

async fn open_device(device: &Path, baud_rate: u32) -> std::io::Result<File> {
    let file = File::open(device).await?;
    #[cfg(unix)]
    configure_serial_line(&file, baud_rate);
    #[cfg(not(unix))]
    let _ = baud_rate;
    Ok(file)
}

/// Raw mode at `baud_rate`. Plain files and pipes are left as they are.
#[cfg(unix)]
fn configure_serial_line(file: &File, baud_rate: u32) {
    use nix::errno::Errno;
    use nix::sys::termios::{self, SetArg};

    let Some(speed) = serial_speed(baud_rate) else {
        warn!(baud_rate, "Unsupported baud rate, leaving line settings alone");
        return;
    };

    let applied = termios::tcgetattr(file).and_then(|mut attrs| {
        termios::cfmakeraw(&mut attrs);
        termios::cfsetspeed(&mut attrs, speed)?;
        termios::tcsetattr(file, SetArg::TCSANOW, &attrs)
    });

    match applied {
        Ok(()) => debug!(baud_rate, "Serial line configured"),
        Err(Errno::ENOTTY) => trace!("Tag source is not a terminal, reading as-is"),
        Err(e) => warn!(baud_rate, error = %e, "Could not configure serial line"),
    }
}

#[cfg(unix)]
fn serial_speed(baud_rate: u32) -> Option<nix::sys::termios::BaudRate> {
    use nix::sys::termios::BaudRate;

    match baud_rate {
        1200 => Some(BaudRate::B1200),
        2400 => Some(BaudRate::B2400),
        4800 => Some(BaudRate::B4800),
        9600 => Some(BaudRate::B9600),
        19_200 => Some(BaudRate::B19200),
        38_400 => Some(BaudRate::B38400),
        57_600 => Some(BaudRate::B57600),
        115_200 => Some(BaudRate::B115200),
        _ => None,
    }
}
