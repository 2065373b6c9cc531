//! tilepaint: paint tile maps in the terminal.

use clap::Parser;
use tilepaint::cli::Cli;
use tilepaint::{Editor, logging};
use tilepaint_term::{App, AppConfig, CrosstermDriver};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(&cli.log_file)?;

    let config = cli.editor_config()?;
    let model = Editor::new(&config, cli.map.clone())?;
    let driver = CrosstermDriver::new();
    let mut app = App::new(AppConfig {
        model,
        driver,
        width: 80,
        height: 24,
    });
    if let Err(err) = app.run() {
        log::error!("editor stopped: {err}");
        return Err(err);
    }
    Ok(())
}
