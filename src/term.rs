use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use frutin::{Cue, Cues, FruitKind, HumanControlPolicy, Movement, Session, SessionState};

const CELL_WIDTH: u16 = 3;
const HUD_HEIGHT: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Move(Movement),
    Quit,
}

/// Owns the terminal for the duration of a game and restores it on drop.
pub struct TerminalUi {
    out: Stdout,
}

impl TerminalUi {
    pub fn enter() -> io::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            cursor::Hide,
            terminal::EnterAlternateScreen,
            terminal::SetTitle("FRUTIN")
        )?;
        terminal::enable_raw_mode()?;
        Ok(Self { out })
    }

    pub fn draw(&mut self, session: &Session) -> io::Result<()> {
        let field = session.field();
        queue!(self.out, terminal::Clear(ClearType::All))?;

        let hud = [
            format!("Score: {}", session.score()),
            format!("Time: {}", session.time_remaining() as i64),
            format!("Attempts: {}", session.attempts_remaining()),
        ];
        for (line, text) in hud.iter().enumerate() {
            queue!(self.out, cursor::MoveTo(0, line as u16), Print(text))?;
        }

        for pos in field.iter_all_coordinates() {
            self.put(pos.row, pos.col, Color::DarkGrey, ".")?;
        }
        for pos in session.agent().trail() {
            self.put(pos.row, pos.col, Color::Cyan, "·")?;
        }
        let player = session.agent().pos();
        self.put(player.row, player.col, Color::White, "@")?;
        for fruit in session.fruits() {
            let (color, glyph) = fruit_glyph(fruit.kind);
            self.put(fruit.pos.row, fruit.pos.col, color, glyph)?;
        }

        if session.state() == SessionState::AttemptLost {
            self.banner(session, Color::Yellow, "Time is up!")?;
        }
        queue!(self.out, cursor::MoveTo(0, HUD_HEIGHT + field.rows() as u16 + 1))?;
        self.out.flush()
    }

    pub fn draw_end(&mut self, session: &Session) -> io::Result<()> {
        match session.state() {
            SessionState::Won => self.banner(session, Color::Green, "YOU WIN!")?,
            SessionState::AllAttemptsExhausted => self.banner(session, Color::Red, "Game Over")?,
            _ => {},
        }
        self.out.flush()
    }

    fn banner(&mut self, session: &Session, color: Color, text: &str) -> io::Result<()> {
        let width = session.field().cols() as u16 * CELL_WIDTH;
        let x = width.saturating_sub(text.len() as u16) / 2;
        let y = HUD_HEIGHT + session.field().rows() as u16 / 2;
        queue!(
            self.out,
            cursor::MoveTo(x, y),
            SetForegroundColor(color),
            Print(text),
            ResetColor
        )
    }

    fn put(&mut self, row: usize, col: usize, color: Color, glyph: &str) -> io::Result<()> {
        queue!(
            self.out,
            cursor::MoveTo(col as u16 * CELL_WIDTH + 1, row as u16 + HUD_HEIGHT),
            SetForegroundColor(color),
            Print(glyph),
            ResetColor
        )
    }
}

impl Drop for TerminalUi {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen);
    }
}

fn fruit_glyph(kind: FruitKind) -> (Color, &'static str) {
    match kind {
        FruitKind::Apple => (Color::Red, "a"),
        FruitKind::Mango => (Color::Yellow, "m"),
        FruitKind::Blueberry => (Color::Blue, "b"),
    }
}

/// Collects key presses until `deadline`, which also paces the frame.
pub fn read_inputs(deadline: Instant) -> io::Result<Vec<Input>> {
    let mut inputs = Vec::new();
    loop {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        if !event::poll(deadline - now)? {
            break;
        }
        if let Event::Key(key) = event::read()? {
            if let Some(input) = input_for_key(key) {
                inputs.push(input);
                if input == Input::Quit {
                    break;
                }
            }
        }
    }
    Ok(inputs)
}

fn input_for_key(key: KeyEvent) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Up => Some(Input::Move(Movement::Up)),
        KeyCode::Down => Some(Input::Move(Movement::Down)),
        KeyCode::Left => Some(Input::Move(Movement::Left)),
        KeyCode::Right => Some(Input::Move(Movement::Right)),
        KeyCode::Esc | KeyCode::Char('q') => Some(Input::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
        KeyCode::Char(c) => HumanControlPolicy::movement_for_key(c).map(Input::Move),
        _ => None,
    }
}

/// Rings the terminal bell for every cue.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl Cues for TerminalBell {
    fn play(&mut self, cue: Cue) {
        log::debug!("Bell for {:?}", cue);
        let mut out = io::stdout();
        let _ = out.write_all(b"\x07").and_then(|_| out.flush());
    }
}

// Frame length for a tick rate, used to pace the loop.
pub fn frame_duration(tick_rate: u32) -> Duration {
    Duration::from_secs_f64(1.0 / tick_rate.max(1) as f64)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn press(code: KeyCode) -> Option<Input> {
        input_for_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn arrows_and_wasd_move() {
        assert_eq!(press(KeyCode::Up), Some(Input::Move(Movement::Up)));
        assert_eq!(press(KeyCode::Down), Some(Input::Move(Movement::Down)));
        assert_eq!(press(KeyCode::Left), Some(Input::Move(Movement::Left)));
        assert_eq!(press(KeyCode::Right), Some(Input::Move(Movement::Right)));
        assert_eq!(press(KeyCode::Char('w')), Some(Input::Move(Movement::Up)));
        assert_eq!(press(KeyCode::Char('s')), Some(Input::Move(Movement::Down)));
        assert_eq!(press(KeyCode::Char('a')), Some(Input::Move(Movement::Left)));
        assert_eq!(press(KeyCode::Char('d')), Some(Input::Move(Movement::Right)));
    }

    #[test]
    fn quit_keys() {
        assert_eq!(press(KeyCode::Esc), Some(Input::Quit));
        assert_eq!(press(KeyCode::Char('q')), Some(Input::Quit));
        assert_eq!(
            input_for_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Input::Quit)
        );
        // plain c is not ctrl-c
        assert_eq!(press(KeyCode::Char('c')), None);
    }

    #[test]
    fn other_keys_and_releases_are_ignored() {
        assert_eq!(press(KeyCode::Char('x')), None);
        assert_eq!(press(KeyCode::Enter), None);
        assert_eq!(
            input_for_key(KeyEvent::new_with_kind(
                KeyCode::Up,
                KeyModifiers::NONE,
                KeyEventKind::Release
            )),
            None
        );
    }
}
