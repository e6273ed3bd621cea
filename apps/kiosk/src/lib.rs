//! # Fastrkart Kiosk
//!
//! Wires the cart, catalog and receipt sink into a terminal kiosk.
//!
//! ## Module Organization
//! ```text
//! fastr_kiosk/
//! ├── lib.rs          ◄─── You are here (startup & event loop)
//! ├── config.rs       ◄─── kiosk.toml + FASTR_* overrides
//! ├── session.rs      ◄─── Cart owner, command dispatch, checkout
//! ├── input.rs        ◄─── KioskCommand + operator line parsing
//! ├── reader.rs       ◄─── RFID serial device reading
//! ├── render.rs       ◄─── Text cart view
//! └── error.rs        ◄─── KioskError
//! ```
//!
//! ## Event Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  reader task ──┐                                                        │
//! │  stdin task ───┼──► mpsc<KioskCommand> ──► drive() ──► session.handle  │
//! │  Ctrl-C task ──┘                                   └──► render ──► out │
//! │                                                                         │
//! │  Only drive() touches the session, so every mutation is serialized.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod reader;
pub mod render;
pub mod session;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use fastr_catalog::{Catalog, HttpCatalog, LocalCatalog};
use fastr_export::CsvReceiptWriter;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

pub use config::{CatalogMode, KioskConfig};
pub use error::{KioskError, KioskResult};
pub use input::KioskCommand;
pub use render::Renderer;
pub use session::{KioskSession, Outcome};

/// Commands queued between producers and the event loop.
const COMMAND_BUFFER: usize = 64;

/// Runs the kiosk until `quit`, end of operator input, or Ctrl-C.
///
/// ## Startup Sequence
/// 1. Initialize tracing
/// 2. Load configuration
/// 3. Build catalog and receipt sink
/// 4. Spawn producers (stdin, tag reader, Ctrl-C)
/// 5. Drive the session
pub async fn run(config_path: Option<PathBuf>) -> KioskResult<()> {
    init_tracing();

    let config = KioskConfig::load(config_path)?;
    info!(
        store = %config.store.name,
        tax_bps = config.tax.rate_bps,
        catalog = %config.catalog.mode,
        export_dir = ?config.export.directory,
        "Starting Fastrkart kiosk"
    );

    let catalog = build_catalog(&config)?;
    let sink = Box::new(CsvReceiptWriter::new(&config.export.directory));
    let mut session = KioskSession::new(config.tax_rate(), catalog, sink);
    let renderer = Renderer::from_config(&config);

    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);

    tokio::spawn(input::forward_operator_input(
        BufReader::new(tokio::io::stdin()),
        tx.clone(),
    ));

    if let Some(device) = config.reader.device.clone() {
        tokio::spawn(reader::run_device_reader(
            device,
            config.reader.baud_rate,
            config.poll_interval(),
            tx.clone(),
        ));
    } else {
        info!("No reader device configured; use 'scan <tag>' to add items");
    }

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received");
            let _ = tx.send(KioskCommand::Quit).await;
        }
    });

    let mut stdout = std::io::stdout();
    writeln!(stdout, "{}", renderer.render_cart(session.cart()))?;
    drive(&mut session, rx, &renderer, &mut stdout).await?;

    info!("Kiosk stopped");
    Ok(())
}

/// Builds the configured catalog backend.
pub fn build_catalog(config: &KioskConfig) -> KioskResult<Arc<dyn Catalog>> {
    let catalog: Arc<dyn Catalog> = match config.catalog.mode {
        CatalogMode::Http => {
            let endpoint = config.catalog.endpoint.as_deref().ok_or_else(|| {
                KioskError::Config("catalog.endpoint is required in http mode".into())
            })?;
            Arc::new(HttpCatalog::new(endpoint, config.catalog_timeout())?)
        }
        CatalogMode::Local => match &config.catalog.products_file {
            Some(path) => Arc::new(LocalCatalog::load(path)?),
            None => Arc::new(LocalCatalog::demo()),
        },
    };
    debug!(backend = catalog.backend(), "Catalog ready");
    Ok(catalog)
}

/// Handles commands until `Quit` arrives or every producer is gone.
///
/// Command failures are logged and reported to `out`; they never stop the
/// loop.
pub async fn drive<W: Write>(
    session: &mut KioskSession,
    mut commands: mpsc::Receiver<KioskCommand>,
    renderer: &Renderer,
    out: &mut W,
) -> KioskResult<()> {
    while let Some(command) = commands.recv().await {
        debug!(?command, "Handling command");
        match session.handle(command).await {
            Ok(Outcome::Quit) => break,
            Ok(outcome) => {
                if let Some(text) = renderer.render_outcome(&outcome, session.cart()) {
                    writeln!(out, "{}", text)?;
                }
            }
            Err(err) => {
                warn!(code = err.code(), error = %err, "Command failed");
                writeln!(out, "{}", renderer.render_error(&err))?;
            }
        }
        out.flush()?;
    }
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=fastr_kiosk=trace` - Show every tag read
/// - Default: INFO level
///
/// Logs go to stderr so the cart view on stdout stays readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
