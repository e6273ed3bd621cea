//! # Fastrkart Kiosk Entry Point
//!
//! ```text
//! fastr-kiosk [CONFIG_PATH]
//! ```
//!
//! The actual setup is in lib.rs for better testability.

use std::path::PathBuf;

#[tokio::main]
async fn main() {
    let config_path = std::env::args().nth(1).map(PathBuf::from);

    let code = match fastr_kiosk::run(config_path).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("fastr-kiosk: {}", err);
            1
        }
    };

    // The stdin task may still be parked in a blocking read; exiting here
    // skips waiting for it during runtime shutdown.
    std::process::exit(code);
}
