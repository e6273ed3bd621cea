//! # Operator Input
//!
//! Line commands typed at the kiosk terminal. These stand in for the
//! on-screen buttons.
//!
//! | Line            | Command              |
//! |-----------------|----------------------|
//! | `scan <tag>`    | simulate a tag read  |
//! | `+ <id>`        | increase quantity    |
//! | `- <id>`        | decrease quantity    |
//! | `x <id>`, `rm <id>` | remove the line  |
//! | `pay`           | Pay Now (checkout)   |
//! | `clear`         | empty the cart       |
//! | `show`          | redraw the cart      |
//! | `quit`          | stop the kiosk       |

use std::str::FromStr;

use fastr_core::ProductId;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::KioskError;

/// Everything the session can be asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KioskCommand {
    /// A tag id came off the reader.
    Scan(String),
    Increase(ProductId),
    Decrease(ProductId),
    Remove(ProductId),
    Clear,
    PayNow,
    Show,
    Quit,
}

impl FromStr for KioskCommand {
    type Err = KioskError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let argument = |what: &str| {
            if rest.is_empty() {
                Err(KioskError::InvalidCommand(format!("'{}' needs a {}", word, what)))
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_lowercase().as_str() {
            "scan" => argument("tag id").map(KioskCommand::Scan),
            "+" | "inc" => argument("product id").map(|id| KioskCommand::Increase(id.into())),
            "-" | "dec" => argument("product id").map(|id| KioskCommand::Decrease(id.into())),
            "x" | "rm" | "remove" => argument("product id").map(|id| KioskCommand::Remove(id.into())),
            "pay" | "checkout" => Ok(KioskCommand::PayNow),
            "clear" => Ok(KioskCommand::Clear),
            "show" | "ls" => Ok(KioskCommand::Show),
            "quit" | "exit" | "q" => Ok(KioskCommand::Quit),
            _ => Err(KioskError::InvalidCommand(line.to_string())),
        }
    }
}

/// Reads operator lines until end of input, forwarding parsed commands.
///
/// Blank lines are skipped and unparseable ones are reported on stderr.
/// End of input sends `Quit`.
pub async fn forward_operator_input<R>(reader: R, tx: mpsc::Sender<KioskCommand>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Operator input failed");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<KioskCommand>() {
            Ok(command) => {
                if tx.send(command).await.is_err() {
                    return;
                }
            }
            Err(err) => {
                debug!(line = %line, "Rejected operator input");
                eprintln!("? {}", err);
            }
        }
    }

    let _ = tx.send(KioskCommand::Quit).await;
}
