use std::path::PathBuf;

use casement_common::WindowKind;
use clap::{Parser, ValueEnum};

/// casement: a tiling text-window display driven by a program thread.
#[derive(Parser, Debug)]
#[command(name = "casement", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter override (e.g. debug, casement=trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Kind of the demo's main window.
    #[arg(long, value_enum, default_value_t = RootKind::Buffer)]
    pub root: RootKind,

    /// Render nothing; only log what would be drawn.
    #[arg(long)]
    pub headless: bool,

    /// Print the resolved config as JSON and exit.
    #[arg(long, conflicts_with = "write_config")]
    pub dump_config: bool,

    /// Write the resolved config as TOML to PATH and exit.
    #[arg(long, value_name = "PATH")]
    pub write_config: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    Buffer,
    Grid,
    Graphics,
    Blank,
}

impl From<RootKind> for WindowKind {
    fn from(kind: RootKind) -> Self {
        match kind {
            RootKind::Buffer => WindowKind::TextBuffer,
            RootKind::Grid => WindowKind::TextGrid,
            RootKind::Graphics => WindowKind::Graphics,
            RootKind::Blank => WindowKind::Blank,
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["casement"]).unwrap();
        assert_eq!(args.root, RootKind::Buffer);
        assert!(args.config.is_none());
        assert!(!args.headless);
    }

    #[test]
    fn root_kind_and_overrides() {
        let args = Args::try_parse_from([
            "casement",
            "--root",
            "grid",
            "--log-level",
            "debug",
            "--config",
            "/tmp/c.toml",
            "--headless",
        ])
        .unwrap();
        assert_eq!(WindowKind::from(args.root), WindowKind::TextGrid);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(args.headless);
    }

    #[test]
    fn config_maintenance_flags() {
        let args = Args::try_parse_from(["casement", "--dump-config"]).unwrap();
        assert!(args.dump_config);
        assert!(args.write_config.is_none());

        let args = Args::try_parse_from(["casement", "--write-config", "out.toml"]).unwrap();
        assert_eq!(args.write_config, Some(PathBuf::from("out.toml")));

        assert!(
            Args::try_parse_from(["casement", "--dump-config", "--write-config", "x"]).is_err()
        );
    }

    #[test]
    fn unknown_root_kind_is_rejected() {
        assert!(Args::try_parse_from(["casement", "--root", "pair"]).is_err());
    }
}
