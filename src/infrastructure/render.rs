//! 도움말(사용법/플래그 표/명령 목록) 텍스트 렌더링 모듈.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::command::Command;
use crate::domain::flag::FlagSpec;

// 왼쪽 열(플래그/명령 이름) 최대 폭. 넘치면 설명을 다음 줄부터 시작한다.
const MAX_LABEL_WIDTH: usize = 28;
const INDENT: usize = 2;
const GUTTER: usize = 2;
const MIN_TEXT_WIDTH: usize = 20;

/// 시작 플래그 사용법을 만든다.
pub fn startup_help(program: &str, terminal: &Command, width: usize) -> String {
    let mut lines = vec![format!("usage: {program} [flags]")];
    if !terminal.flags().is_empty() {
        lines.push(String::new());
        lines.push("flags:".to_string());
        lines.extend(flag_rows(terminal.flags(), width));
    }
    lines.join("\n")
}

/// 명령 하나의 사용법/설명/플래그 표를 만든다.
pub fn command_help(command: &Command, width: usize) -> String {
    let mut usage = format!("usage: {}", command.name());
    if command.flags().len() > 1 {
        usage.push_str(" [flags]");
    }
    if !command.usage().is_empty() {
        usage.push(' ');
        usage.push_str(command.usage());
    }

    let mut lines = vec![usage];
    if !command.description().is_empty() {
        lines.push(String::new());
        lines.extend(wrap_text(command.description(), width));
    }
    lines.push(String::new());
    lines.push("flags:".to_string());
    lines.extend(flag_rows(command.flags(), width));
    lines.join("\n")
}

/// 등록된 명령 목록(등록 순서)을 만든다.
pub fn command_list(commands: &[Command], width: usize) -> String {
    let rows: Vec<(String, String)> = commands
        .iter()
        .map(|c| (c.name().to_string(), c.description().to_string()))
        .collect();

    let mut lines = vec!["commands:".to_string()];
    lines.extend(two_column(&rows, width));
    lines.join("\n")
}

fn flag_rows(flags: &[FlagSpec], width: usize) -> Vec<String> {
    let rows: Vec<(String, String)> = flags
        .iter()
        .map(|flag| (flag_label(flag), flag.description().to_string()))
        .collect();
    two_column(&rows, width)
}

fn flag_label(flag: &FlagSpec) -> String {
    let mut label = flag.long_name().to_string();
    if let Some(short) = flag.short_name() {
        label.push_str(", ");
        label.push_str(short);
    }
    if let Some(placeholder) = flag.input_kind().placeholder() {
        label.push(' ');
        label.push_str(placeholder);
    }
    label
}

fn two_column(rows: &[(String, String)], width: usize) -> Vec<String> {
    let label_width = rows
        .iter()
        .map(|(label, _)| display_width(label))
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH);
    let text_col = INDENT + label_width + GUTTER;
    let text_width = width.saturating_sub(text_col).max(MIN_TEXT_WIDTH);

    let mut out = Vec::new();
    for (label, text) in rows {
        let wrapped = wrap_text(text, text_width);
        let head = format!("{}{}", " ".repeat(INDENT), label);

        if display_width(label) > label_width {
            // 긴 이름은 단독 줄에 두고 설명은 다음 줄부터.
            out.push(head);
            out.extend(wrapped.iter().map(|l| format!("{}{l}", " ".repeat(text_col))));
            continue;
        }

        let mut wrapped = wrapped.into_iter();
        match wrapped.next() {
            Some(first) => out.push(format!("{}{first}", pad_display(&head, text_col))),
            None => out.push(head),
        }
        out.extend(wrapped.map(|l| format!("{}{l}", " ".repeat(text_col))));
    }
    out
}

/// 단어 단위로 표시 폭 `width` 안에 들어가도록 줄바꿈한다.
/// 한 단어가 폭보다 길면 그 단어만 한 줄에 둔다.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut used = 0usize;

    for word in text.split_whitespace() {
        let w = display_width(word);
        if !current.is_empty() && used + 1 + w > width {
            lines.push(std::mem::take(&mut current));
            used = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            used += 1;
        }
        current.push_str(word);
        used += w;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn pad_display(text: &str, width: usize) -> String {
    let mut out = text.to_string();
    let used = display_width(text);
    if used < width {
        out.push_str(&" ".repeat(width - used));
    }
    out
}

/// 표시 폭 기준으로 자르고 `...`를 붙인다.
pub fn clip_display(line: &str, max_width: usize) -> String {
    if display_width(line) <= max_width {
        return line.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let cap = max_width - 3;
    let mut out = String::new();
    let mut used = 0usize;
    for ch in line.chars() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > cap {
            break;
        }
        out.push(ch);
        used += cw;
    }
    out.push_str("...");
    out
}

pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}
