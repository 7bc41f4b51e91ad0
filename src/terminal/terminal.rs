use crate::terminal::{KeyCode, KeyEvent, KeyModifiers, TerminalEvent};
use crate::ui::span::Span;
use crate::ui::style::Color;
use crossterm::event::{Event, KeyEventKind, poll, read};
use crossterm::style::{
    Attribute, Print, ResetColor, SetAttribute, SetForegroundColor,
};
use crossterm::{cursor, execute, queue, terminal};
use std::io::{self, Stdout, Write};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

/// Full-screen terminal surface the demo host draws frames on.
pub struct Terminal {
    stdout: Stdout,
    size: Size,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout: io::stdout(),
            size: Size { width, height },
        })
    }

    pub fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.stdout,
            terminal::EnterAlternateScreen,
            terminal::DisableLineWrap,
            cursor::Hide
        )
    }

    pub fn exit(&mut self) -> io::Result<()> {
        execute!(
            self.stdout,
            cursor::Show,
            terminal::EnableLineWrap,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn poll(&self, timeout: Duration) -> io::Result<bool> {
        poll(timeout)
    }

    pub fn read_event(&mut self) -> io::Result<TerminalEvent> {
        loop {
            match read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    return Ok(TerminalEvent::Key(map_key_event(key)));
                }
                Event::Resize(width, height) => {
                    self.size = Size { width, height };
                    return Ok(TerminalEvent::Resize { width, height });
                }
                _ => continue,
            }
        }
    }

    /// Draws `body` from line `scroll` downwards, with `footer` pinned to the
    /// bottom rows.
    pub fn draw(&mut self, body: &[Vec<Span>], scroll: usize, footer: &[Vec<Span>]) -> io::Result<()> {
        let height = self.size.height as usize;
        let body_rows = height.saturating_sub(footer.len());

        queue!(self.stdout, terminal::BeginSynchronizedUpdate)?;
        for row in 0..body_rows {
            queue!(
                self.stdout,
                cursor::MoveTo(0, row as u16),
                terminal::Clear(terminal::ClearType::CurrentLine)
            )?;
            if let Some(line) = body.get(scroll + row) {
                self.queue_line(line)?;
            }
        }
        for (offset, line) in footer.iter().take(height).enumerate() {
            queue!(
                self.stdout,
                cursor::MoveTo(0, (body_rows + offset) as u16),
                terminal::Clear(terminal::ClearType::CurrentLine)
            )?;
            self.queue_line(line)?;
        }
        queue!(self.stdout, terminal::EndSynchronizedUpdate)?;
        self.stdout.flush()
    }

    fn queue_line(&mut self, line: &[Span]) -> io::Result<()> {
        for span in line {
            let style = span.style;
            if let Some(fg) = style.color {
                queue!(self.stdout, SetForegroundColor(map_color(fg)))?;
            }
            if style.bold {
                queue!(self.stdout, SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                queue!(self.stdout, SetAttribute(Attribute::Dim))?;
            }

            queue!(self.stdout, Print(span.text.as_str()))?;

            if !style.is_plain() {
                queue!(self.stdout, SetAttribute(Attribute::Reset), ResetColor)?;
            }
        }
        Ok(())
    }
}

fn map_color(color: Color) -> crossterm::style::Color {
    match color {
        Color::Reset => crossterm::style::Color::Reset,
        Color::Black => crossterm::style::Color::Black,
        Color::DarkGrey => crossterm::style::Color::DarkGrey,
        Color::Red => crossterm::style::Color::Red,
        Color::Green => crossterm::style::Color::Green,
        Color::Yellow => crossterm::style::Color::Yellow,
        Color::Blue => crossterm::style::Color::Blue,
        Color::Magenta => crossterm::style::Color::Magenta,
        Color::Cyan => crossterm::style::Color::Cyan,
        Color::White => crossterm::style::Color::White,
    }
}

fn map_key_event(event: crossterm::event::KeyEvent) -> KeyEvent {
    KeyEvent {
        code: map_key_code(event.code),
        modifiers: map_key_modifiers(event.modifiers),
    }
}

fn map_key_code(code: crossterm::event::KeyCode) -> KeyCode {
    match code {
        crossterm::event::KeyCode::Char(ch) => KeyCode::Char(ch),
        crossterm::event::KeyCode::Backspace => KeyCode::Backspace,
        crossterm::event::KeyCode::Enter => KeyCode::Enter,
        crossterm::event::KeyCode::Esc => KeyCode::Esc,
        crossterm::event::KeyCode::Left => KeyCode::Left,
        crossterm::event::KeyCode::Right => KeyCode::Right,
        crossterm::event::KeyCode::Up => KeyCode::Up,
        crossterm::event::KeyCode::Down => KeyCode::Down,
        crossterm::event::KeyCode::Home => KeyCode::Home,
        crossterm::event::KeyCode::End => KeyCode::End,
        crossterm::event::KeyCode::Tab => KeyCode::Tab,
        crossterm::event::KeyCode::BackTab => KeyCode::BackTab,
        crossterm::event::KeyCode::Delete => KeyCode::Delete,
        crossterm::event::KeyCode::PageUp => KeyCode::PageUp,
        crossterm::event::KeyCode::PageDown => KeyCode::PageDown,
        _ => KeyCode::Other,
    }
}

fn map_key_modifiers(modifiers: crossterm::event::KeyModifiers) -> KeyModifiers {
    let mut mapped = KeyModifiers::NONE;
    if modifiers.contains(crossterm::event::KeyModifiers::SHIFT) {
        mapped |= KeyModifiers::SHIFT;
    }
    if modifiers.contains(crossterm::event::KeyModifiers::CONTROL) {
        mapped |= KeyModifiers::CONTROL;
    }
    if modifiers.contains(crossterm::event::KeyModifiers::ALT) {
        mapped |= KeyModifiers::ALT;
    }
    mapped
}
