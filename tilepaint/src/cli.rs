//! Command-line arguments and config loading.

use std::path::PathBuf;

use clap::Parser;
use tilepaint_core::EditorConfig;

/// Paint tile maps in the terminal.
#[derive(Debug, Parser)]
#[command(name = "tilepaint", version, about)]
pub struct Cli {
    /// JSON config file; missing keys keep their defaults.
    #[arg(long, env = "TILEPAINT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Map height in cells.
    #[arg(long)]
    pub rows: Option<usize>,

    /// Map width in cells.
    #[arg(long)]
    pub cols: Option<usize>,

    /// File written by export (`e`) and read by import (`i`).
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Log file.
    #[arg(long, env = "TILEPAINT_LOG_FILE", default_value = "tilepaint.log")]
    pub log_file: PathBuf,

    /// Map to import on start-up.
    pub map: Option<PathBuf>,
}

impl Cli {
    /// Build the session config: defaults, then the config file, then flags.
    pub fn editor_config(&self) -> Result<EditorConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => EditorConfig::from_json(&std::fs::read_to_string(path)?)?,
            None => EditorConfig::default(),
        };
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(path) = &self.export {
            config.export_path = path.clone();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"rows": 12, "cols": 6, "export_path": "a.json"}"#).unwrap();

        let cli = Cli::try_parse_from([
            "tilepaint",
            "--config",
            path.to_str().unwrap(),
            "--cols",
            "8",
            "start.json",
        ])
        .unwrap();
        let cfg = cli.editor_config().unwrap();
        assert_eq!((cfg.rows, cfg.cols), (12, 8));
        assert_eq!(cfg.export_path, PathBuf::from("a.json"));
        assert_eq!(cli.map, Some(PathBuf::from("start.json")));
    }

    #[test]
    fn defaults_without_flags() {
        let cli = Cli::try_parse_from(["tilepaint"]).unwrap();
        let cfg = cli.editor_config().unwrap();
        assert_eq!((cfg.rows, cfg.cols), (30, 10));
        assert_eq!(cli.log_file, PathBuf::from("tilepaint.log"));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
