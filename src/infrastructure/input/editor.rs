//! raw 모드 한 줄 편집기.
//! 명령 이름을 입력하는 동안 등록된 명령 추천을 프롬프트 아래에 표시한다.

use std::env;
use std::io::{self, IsTerminal, Write};

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, ClearType};
use crossterm::{execute, queue};
use tracing::debug;
use unicode_width::UnicodeWidthChar;

use crate::application::ports::{CommandSummary, LineSource, ReadOutcome};
use crate::infrastructure::input::stdin::StdinLineSource;
use crate::infrastructure::render::{clip_display, display_width};

const MIN_WIDTH: usize = 20;
const MAX_SUGGESTIONS: usize = 6;

/// TTY에서는 실시간 추천 편집기를, 그 외에는 일반 라인 입력을 쓴다.
#[derive(Debug, Default)]
pub struct EditorLineSource {
    commands: Vec<CommandSummary>,
    fallback: StdinLineSource,
}

impl EditorLineSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LineSource for EditorLineSource {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        if !supports_interactive_input() {
            return self.fallback.read_line(prompt);
        }

        match read_line_interactive(prompt, &self.commands) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                debug!(error = %err, "interactive input failed; using line input");
                self.fallback.read_line(prompt)
            }
        }
    }

    fn set_commands(&mut self, commands: &[CommandSummary]) {
        self.commands = commands.to_vec();
    }
}

pub(crate) fn supports_interactive_input() -> bool {
    if !io::stdout().is_terminal() || !io::stdin().is_terminal() {
        return false;
    }

    // dumb 터미널에서는 제어 시퀀스 기반 UI를 비활성화한다.
    if let Ok(term) = env::var("TERM")
        && term.eq_ignore_ascii_case("dumb")
    {
        return false;
    }

    true
}

fn read_line_interactive(prompt: &str, commands: &[CommandSummary]) -> Result<ReadOutcome> {
    let mut stdout = io::stdout();
    let _guard = InputGuard::enter(&mut stdout)?;

    let mut input = String::new();
    let mut cursor_chars = 0usize;
    let mut selected_idx = 0usize;

    loop {
        let suggestions = match_suggestions(commands, &input);
        if suggestions.is_empty() {
            selected_idx = 0;
        } else if selected_idx >= suggestions.len() {
            selected_idx = suggestions.len() - 1;
        }

        render_frame(
            &mut stdout,
            prompt,
            &input,
            cursor_chars,
            &suggestions,
            selected_idx,
        )?;

        match event::read()? {
            Event::Paste(text) => {
                for ch in text.chars().filter(|c| !c.is_control()) {
                    insert_char_at(&mut input, cursor_chars, ch);
                    cursor_chars += 1;
                }
            }
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match key.code {
                    KeyCode::Enter => {
                        finish_line(&mut stdout, prompt, &input)?;
                        return Ok(ReadOutcome::Line(input));
                    }
                    KeyCode::Backspace => {
                        if cursor_chars > 0 {
                            remove_char_at(&mut input, cursor_chars - 1);
                            cursor_chars -= 1;
                        }
                    }
                    KeyCode::Delete => {
                        if cursor_chars < input.chars().count() {
                            remove_char_at(&mut input, cursor_chars);
                        }
                    }
                    KeyCode::Left => {
                        cursor_chars = cursor_chars.saturating_sub(1);
                    }
                    KeyCode::Right => {
                        cursor_chars = (cursor_chars + 1).min(input.chars().count());
                    }
                    KeyCode::Home => {
                        cursor_chars = 0;
                    }
                    KeyCode::End => {
                        cursor_chars = input.chars().count();
                    }
                    KeyCode::Up => {
                        selected_idx = selected_idx.saturating_sub(1);
                    }
                    KeyCode::Down => {
                        if !suggestions.is_empty() {
                            selected_idx = (selected_idx + 1).min(suggestions.len() - 1);
                        }
                    }
                    KeyCode::Tab => {
                        if let Some(item) = suggestions.get(selected_idx) {
                            input = format!("{} ", item.name);
                            cursor_chars = input.chars().count();
                        }
                    }
                    KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        finish_line(&mut stdout, prompt, &input)?;
                        return Ok(ReadOutcome::EndOfInput);
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        finish_line(&mut stdout, prompt, &input)?;
                        return Ok(ReadOutcome::Interrupted);
                    }
                    KeyCode::Char(ch) => {
                        if !key.modifiers.contains(KeyModifiers::CONTROL)
                            && !key.modifiers.contains(KeyModifiers::ALT)
                        {
                            insert_char_at(&mut input, cursor_chars, ch);
                            cursor_chars += 1;
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
}

/// 첫 토큰을 입력 중일 때만 이름 접두어로 추천한다.
fn match_suggestions<'a>(commands: &'a [CommandSummary], input: &str) -> Vec<&'a CommandSummary> {
    let typed = input.trim_start();
    if typed.is_empty() || typed.contains(char::is_whitespace) {
        return Vec::new();
    }

    commands
        .iter()
        .filter(|c| c.name.starts_with(typed) && c.name != typed)
        .take(MAX_SUGGESTIONS)
        .collect()
}

fn render_frame(
    stdout: &mut io::Stdout,
    prompt: &str,
    input: &str,
    cursor_chars: usize,
    suggestions: &[&CommandSummary],
    selected_idx: usize,
) -> Result<()> {
    let width = terminal_width();

    queue!(
        stdout,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::FromCursorDown)
    )?;
    write!(stdout, "{}", render_prompt_line(prompt, input, width))?;

    // 추천 줄은 \r\n으로 내려 쓰고 다시 입력 줄로 올라온다(맨 아래 줄에서도 스크롤되도록).
    for (idx, item) in suggestions.iter().enumerate() {
        let selected = idx == selected_idx;
        let marker = if selected { ">" } else { " " };
        let mut line = format!("{marker} {:<12} - {}", item.name, item.description);
        if !item.usage.is_empty() {
            line.push_str(&format!(" | usage: {} {}", item.name, item.usage));
        }
        write!(stdout, "\r\n")?;
        queue!(
            stdout,
            SetForegroundColor(if selected { Color::Cyan } else { Color::DarkGrey })
        )?;
        write!(stdout, "{}", clip_display(&line, width))?;
        queue!(stdout, ResetColor)?;
    }
    if !suggestions.is_empty() {
        queue!(stdout, cursor::MoveUp(suggestions.len() as u16))?;
    }

    let col = prompt_cursor_col(prompt, input, cursor_chars, width) as u16;
    queue!(stdout, cursor::MoveToColumn(col), cursor::Show)?;
    stdout.flush()?;
    Ok(())
}

// 제출된 줄은 추천 없이 그대로 남기고 다음 줄로 넘어간다.
fn finish_line(stdout: &mut io::Stdout, prompt: &str, input: &str) -> Result<()> {
    let width = terminal_width();
    queue!(
        stdout,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::FromCursorDown)
    )?;
    write!(stdout, "{}\r\n", render_prompt_line(prompt, input, width))?;
    stdout.flush()?;
    Ok(())
}

fn terminal_width() -> usize {
    terminal::size()
        .map(|(w, _)| usize::from(w))
        .unwrap_or(80)
        .max(MIN_WIDTH)
}

fn render_prompt_line(prompt: &str, input: &str, width: usize) -> String {
    let available = width.saturating_sub(display_width(prompt) + 1);
    let shown = tail_with_ellipsis_display(input, available);
    clip_display(&format!("{prompt}{shown}"), width)
}

fn prompt_cursor_col(prompt: &str, input: &str, cursor_chars: usize, width: usize) -> usize {
    let prefix_width = display_width(prompt);
    let available = width.saturating_sub(prefix_width + 1);
    let before_cursor: String = input.chars().take(cursor_chars).collect();

    if display_width(input) <= available {
        return (prefix_width + display_width(&before_cursor)).min(width.saturating_sub(1));
    }

    // 넘친 입력은 끝부분만 보이므로 커서를 입력 끝에 둔다.
    (prefix_width + display_width(&tail_with_ellipsis_display(input, available)))
        .min(width.saturating_sub(1))
}

fn tail_with_ellipsis_display(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let target = max_width - 3;
    let mut tail_rev = String::new();
    let mut used = 0usize;
    for ch in text.chars().rev() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > target {
            break;
        }
        tail_rev.push(ch);
        used += cw;
    }

    let tail: String = tail_rev.chars().rev().collect();
    format!("...{tail}")
}

struct InputGuard;

impl InputGuard {
    fn enter(stdout: &mut io::Stdout) -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout, cursor::Show)?;
        Ok(Self)
    }
}

impl Drop for InputGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show, ResetColor);
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
    }
}

fn insert_char_at(input: &mut String, char_idx: usize, ch: char) {
    let byte_idx = byte_index_at_char(input, char_idx);
    input.insert(byte_idx, ch);
}

fn remove_char_at(input: &mut String, char_idx: usize) {
    let start = byte_index_at_char(input, char_idx);
    let end = byte_index_at_char(input, char_idx + 1);
    if start < end && end <= input.len() {
        input.replace_range(start..end, "");
    }
}

fn byte_index_at_char(input: &str, char_idx: usize) -> usize {
    input
        .char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(input.len())
}
