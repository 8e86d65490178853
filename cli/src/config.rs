use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use mineboard_core::{CellCount, Dim, GameConfig, Placement};
use serde::Deserialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    Beginner,
    Intermediate,
    Expert,
    /// 800x600 play area with 40px tiles and 40 mines
    Classic,
}

impl Preset {
    pub const fn game_config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::beginner(),
            Self::Intermediate => GameConfig::intermediate(),
            Self::Expert => GameConfig::expert(),
            Self::Classic => GameConfig::classic(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Play mine-detection puzzles in the terminal", long_about = None)]
pub struct Args {
    /// What log level to use
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Start from a predefined board
    #[arg(short, long, value_enum)]
    pub preset: Option<Preset>,

    /// TOML file with board settings, overridden by command-line values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub rows: Option<Dim>,

    #[arg(long)]
    pub cols: Option<Dim>,

    #[arg(long)]
    pub mines: Option<CellCount>,

    /// Pixel size of a tile, used to map click coordinates onto cells
    #[arg(long)]
    pub tile_size: Option<u16>,

    /// Print one JSON snapshot per frame instead of drawing the board
    #[arg(long)]
    pub json: bool,

    /// Disable ANSI colours
    #[arg(long)]
    pub no_color: bool,
}

/// Board settings read from a TOML file. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub preset: Option<String>,
    pub rows: Option<Dim>,
    pub cols: Option<Dim>,
    pub mines: Option<CellCount>,
    pub tile_size: Option<u16>,
    pub seed: Option<u64>,
    pub placement: Option<Placement>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Fully resolved settings for one run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Settings {
    pub game: GameConfig,
    pub tile_size: u16,
    pub seed: u64,
    pub placement: Placement,
}

pub const DEFAULT_TILE_SIZE: u16 = 40;

impl Settings {
    pub fn resolve(args: &Args) -> anyhow::Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(args, &file)
    }

    fn merge(args: &Args, file: &FileConfig) -> anyhow::Result<Self> {
        let file_preset = file
            .preset
            .as_deref()
            .map(|name| Preset::from_str(name, true))
            .transpose()
            .map_err(|err| anyhow::anyhow!("Unknown preset in config file: {err}"))?;

        let base = args
            .preset
            .or(file_preset)
            .unwrap_or(Preset::Classic)
            .game_config();

        let rows = args.rows.or(file.rows).unwrap_or(base.rows);
        let cols = args.cols.or(file.cols).unwrap_or(base.cols);
        let mines = args.mines.or(file.mines).unwrap_or(base.mines);
        let game = GameConfig::new(rows, cols, mines).context("Invalid board configuration")?;

        let tile_size = args
            .tile_size
            .or(file.tile_size)
            .unwrap_or(DEFAULT_TILE_SIZE);
        if tile_size == 0 {
            anyhow::bail!("Tile size must be at least one pixel");
        }

        let seed = args.seed.or(file.seed).unwrap_or_else(random_seed);
        log::debug!("seed: {}", seed);

        Ok(Self {
            game,
            tile_size,
            seed,
            placement: file.placement.unwrap_or_default(),
        })
    }
}

fn random_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("mineboard").chain(extra.iter().copied())).unwrap()
    }

    #[test]
    fn verbosity_flags_select_log_filter() {
        use log::LevelFilter;

        assert_eq!(args(&[]).verbose.log_level_filter(), LevelFilter::Error);
        assert_eq!(args(&["-vv"]).verbose.log_level_filter(), LevelFilter::Info);
        assert_eq!(args(&["-q"]).verbose.log_level_filter(), LevelFilter::Off);
    }

    #[test]
    fn defaults_to_classic_board() {
        let settings = Settings::merge(&args(&["--seed", "3"]), &FileConfig::default()).unwrap();

        assert_eq!(settings.game, GameConfig::classic());
        assert_eq!(settings.tile_size, DEFAULT_TILE_SIZE);
        assert_eq!(settings.seed, 3);
        assert_eq!(settings.placement, Placement::Rejection);
    }

    #[test]
    fn command_line_overrides_file_overrides_preset() {
        let file = FileConfig::parse(
            r#"
            preset = "expert"
            mines = 50
            seed = 8
            placement = "IndexSample"
            "#,
        )
        .unwrap();

        let settings = Settings::merge(&args(&["--mines", "20"]), &file).unwrap();
        assert_eq!(settings.game, GameConfig::new(16, 30, 20).unwrap());
        assert_eq!(settings.seed, 8);
        assert_eq!(settings.placement, Placement::IndexSample);

        let settings = Settings::merge(&args(&["--preset", "beginner"]), &file).unwrap();
        assert_eq!(settings.game, GameConfig::new(9, 9, 50).unwrap());
    }

    #[test]
    fn rejects_unusable_boards() {
        let err = Settings::merge(
            &args(&["--rows", "2", "--cols", "2", "--mines", "4"]),
            &FileConfig::default(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("Too many mines"));

        assert!(Settings::merge(&args(&["--tile-size", "0"]), &FileConfig::default()).is_err());
    }

    #[test]
    fn file_rejects_unknown_keys_and_presets() {
        assert!(FileConfig::parse("colour = true").is_err());

        let file = FileConfig::parse(r#"preset = "nightmare""#).unwrap();
        assert!(Settings::merge(&args(&[]), &file).is_err());
    }
}
