use std::io::{BufRead, Write};

use anyhow::Context;
use clap::Parser;
use mineboard_core::Session;

use command::{Command, HELP};
use config::{Args, Settings};
use render::{Format, FrameRenderer};

mod command;
mod config;
mod render;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let settings = Settings::resolve(&args)?;
    log::info!(
        "Starting {}x{} board with {} mines",
        settings.game.rows,
        settings.game.cols,
        settings.game.mines
    );

    let mut session = Session::new(settings.game, settings.tile_size, settings.seed)
        .and_then(|session| session.with_placement(settings.placement))
        .context("Could not start a game session")?;

    let format = if args.json {
        Format::Json
    } else {
        Format::Text {
            color: !args.no_color,
        }
    };
    let mut renderer = FrameRenderer::new(format);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    session.present(&mut renderer);
    write!(out, "{}", renderer.take_frame())?;
    out.flush()?;

    for line in std::io::stdin().lock().lines() {
        let line = line.context("Could not read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{err:#}");
                continue;
            }
        };
        log::debug!("command: {:?}", command);

        let updated = match command {
            Command::Reveal(coords) => session.reveal(coords).has_update(),
            Command::Flag(coords) => session.toggle_flag(coords).has_update(),
            Command::Click(event) => session.handle(event).has_update(),
            Command::Restart => {
                session.restart().context("Could not start a new game")?;
                true
            }
            Command::Help => {
                writeln!(out, "{HELP}")?;
                false
            }
            Command::Quit => break,
        };

        if updated {
            session.present(&mut renderer);
            write!(out, "{}", renderer.take_frame())?;
            out.flush()?;
        }
    }

    Ok(())
}
