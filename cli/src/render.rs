use std::fmt::Write;

use mineboard_core::{Board, CellView, GameState, RenderSink, Snapshot};

/// Glyph for each adjacency count, indexed by the count itself.
const COUNT_GLYPHS: [char; 9] = ['.', '1', '2', '3', '4', '5', '6', '7', '8'];

/// Truecolor foreground for each adjacency count.
const COUNT_COLORS: [(u8, u8, u8); 9] = [
    (255, 255, 255),
    (135, 206, 250),
    (144, 238, 144),
    (135, 206, 250),
    (255, 255, 224),
    (255, 182, 193),
    (0, 255, 255),
    (255, 165, 0),
    (128, 128, 128),
];

const HIDDEN: char = '#';
const FLAG: char = 'F';
const MINE: char = '*';
const EXPLODED: char = 'X';
const WRONG_FLAG: char = 'x';

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    Text { color: bool },
    Json,
}

/// Collects one frame per `render` call; the caller prints and clears it.
#[derive(Debug)]
pub struct FrameRenderer {
    format: Format,
    frame: String,
}

impl FrameRenderer {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            frame: String::new(),
        }
    }

    pub fn take_frame(&mut self) -> String {
        std::mem::take(&mut self.frame)
    }

    fn draw_text(&mut self, snapshot: &Snapshot, color: bool) -> std::fmt::Result {
        let frame = &mut self.frame;
        let (_, cols) = snapshot.size;

        let status = match snapshot.state {
            GameState::Playing => "playing",
            GameState::Won => "you won! (n: new game, q: quit)",
            GameState::Lost => "boom! (n: new game, q: quit)",
        };
        writeln!(frame, "mines left: {}  {}", snapshot.mines_left, status)?;

        write!(frame, "    ")?;
        for col in 0..cols {
            write!(frame, "{}", col % 10)?;
        }
        writeln!(frame)?;

        for (row, cells) in snapshot.rows().enumerate() {
            write!(frame, "{row:>3} ")?;
            for cell in cells {
                draw_cell(frame, cell, color)?;
            }
            writeln!(frame)?;
        }
        Ok(())
    }

    fn draw_json(&mut self, snapshot: &Snapshot) {
        match serde_json::to_string(snapshot) {
            Ok(json) => {
                self.frame.push_str(&json);
                self.frame.push('\n');
            }
            Err(err) => log::error!("failed to encode snapshot: {:?}", err),
        }
    }
}

fn draw_cell(frame: &mut String, cell: CellView, color: bool) -> std::fmt::Result {
    let glyph = match cell {
        CellView::Hidden => HIDDEN,
        CellView::Flagged => FLAG,
        CellView::Open(count) => {
            let index = usize::from(count).min(COUNT_GLYPHS.len() - 1);
            if color {
                let (r, g, b) = COUNT_COLORS[index];
                return write!(frame, "\x1b[38;2;{r};{g};{b}m{}\x1b[0m", COUNT_GLYPHS[index]);
            }
            COUNT_GLYPHS[index]
        }
        CellView::Mine => MINE,
        CellView::Exploded if color => return write!(frame, "\x1b[31m{EXPLODED}\x1b[0m"),
        CellView::Exploded => EXPLODED,
        CellView::IncorrectFlag => WRONG_FLAG,
    };
    frame.write_char(glyph)
}

impl RenderSink for FrameRenderer {
    fn render(&mut self, board: &Board) {
        let snapshot = Snapshot::from_board(board);
        match self.format {
            Format::Text { color } => {
                if let Err(err) = self.draw_text(&snapshot, color) {
                    log::error!("failed to draw board: {:?}", err);
                }
            }
            Format::Json => self.draw_json(&snapshot),
        }
    }
}
