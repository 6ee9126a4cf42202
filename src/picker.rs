use crate::classify::{DisplayEntry, EntryAction};
use crate::controller::Picker;
use crate::info;
use anyhow::{Context, Result};
use colored::Colorize;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    terminal::{self, disable_raw_mode, enable_raw_mode},
};
use std::io::{self, Write};

/// crossterm raw-mode list prompt: arrows/j/k move, enter selects,
/// esc cancels. headers are reachable; selecting one resolves normally.
pub struct ListPicker;

impl Picker for ListPicker {
    fn pick(&self, entries: &[DisplayEntry]) -> Result<Option<usize>> {
        if entries.is_empty() {
            return Ok(None);
        }

        let mut out = io::stdout();
        enable_raw_mode().context("this command requires an interactive terminal")?;
        let result = run(&mut out, entries);
        disable_raw_mode().ok();
        result
    }
}

fn run(out: &mut impl Write, entries: &[DisplayEntry]) -> Result<Option<usize>> {
    let mut selected = 0usize;

    // step off the transient status line before the first draw
    write!(out, "\r\n")?;
    draw(out, entries, selected, false)?;

    let result = loop {
        let Ok(Event::Key(KeyEvent {
            code, modifiers, ..
        })) = event::read() else {
            continue;
        };

        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                if selected > 0 {
                    selected -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if selected + 1 < entries.len() {
                    selected += 1;
                }
            }
            KeyCode::Enter => break Some(selected),
            KeyCode::Esc | KeyCode::Char('q') => break None,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                clear(out, entries.len())?;
                disable_raw_mode().ok();
                info!("^C");
                std::process::exit(1);
            }
            _ => continue,
        }

        draw(out, entries, selected, true)?;
    };

    // erase the list so the next cycle redraws in place
    clear(out, entries.len())?;
    Ok(result)
}

fn draw(out: &mut impl Write, entries: &[DisplayEntry], selected: usize, redraw: bool) -> Result<()> {
    if redraw {
        crossterm::queue!(
            out,
            cursor::MoveUp(row_count(entries.len())),
            terminal::Clear(terminal::ClearType::FromCursorDown),
        )?;
    }

    for (idx, entry) in entries.iter().enumerate() {
        let marker = if idx == selected { "›" } else { " " };

        if entry.is_separator() {
            write!(out, "{marker}\r\n")?;
        } else if entry.is_header() {
            write!(
                out,
                "{marker} {}  {}\r\n",
                entry.label.bold(),
                entry.description.dimmed()
            )?;
        } else {
            let label = if idx == selected {
                entry.label.reversed().to_string()
            } else {
                entry.label.clone()
            };
            let verb = match &entry.action {
                EntryAction::Detected(_) => entry.description.cyan(),
                _ => entry.description.yellow(),
            };
            write!(
                out,
                "{marker}   {}  {}  {}\r\n",
                label,
                verb,
                entry.detail.dimmed()
            )?;
        }
    }

    out.flush()?;
    Ok(())
}

fn clear(out: &mut impl Write, lines: usize) -> Result<()> {
    // the extra line is the blank one emitted before the first draw
    crossterm::queue!(
        out,
        cursor::MoveUp(row_count(lines.saturating_add(1))),
        terminal::Clear(terminal::ClearType::FromCursorDown),
    )?;
    out.flush()?;
    Ok(())
}

/// cursor moves clamp at the viewport edge anyway, so saturate rather
/// than truncate for absurdly long lists
fn row_count(lines: usize) -> u16 {
    u16::try_from(lines).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_count_saturates_instead_of_truncating() {
        assert_eq!(row_count(0), 0);
        assert_eq!(row_count(42), 42);
        assert_eq!(row_count(usize::from(u16::MAX)), u16::MAX);
        // 0x10001 would truncate to 1 with a plain `as` cast
        assert_eq!(row_count(usize::from(u16::MAX) + 2), u16::MAX);
    }
}
