//! Binary entry point that glues the SQLite-backed catalog to the TUI: bring
//! up the database, hydrate the initial app state, and drive the Ratatui
//! event loop until the user exits.
use library_catalog_manager::{ensure_schema, run_app, App};

/// Initialize persistence and launch the Ratatui event loop.
///
/// Returning a `Result` bubbles up fatal initialization problems (for example
/// an unwritable home directory) to the terminal instead of launching with no
/// storage behind the screens.
fn main() -> anyhow::Result<()> {
    let conn = ensure_schema()?;
    let mut app = App::new(conn);
    run_app(&mut app)
}
