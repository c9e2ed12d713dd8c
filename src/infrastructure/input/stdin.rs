//! 일반 라인 입력(non-TTY/미지원 터미널용).

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::application::ports::{LineSource, ReadOutcome};

/// 표준 입력에서 한 줄씩 읽는다. 0바이트 읽기는 스트림 종료로 본다.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinLineSource;

impl StdinLineSource {
    pub fn new() -> Self {
        Self
    }
}

impl LineSource for StdinLineSource {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        print!("{prompt}");
        io::stdout().flush()?;

        read_from(&mut io::stdin().lock())
    }
}

/// UTF-8이 아닌 바이트는 대체 문자로 바꿔 줄을 그대로 전달한다.
pub(crate) fn read_from(reader: &mut impl BufRead) -> Result<ReadOutcome> {
    let mut buf = Vec::new();
    let read = reader.read_until(b'\n', &mut buf)?;
    if read == 0 {
        return Ok(ReadOutcome::Closed);
    }
    let line = String::from_utf8_lossy(&buf).into_owned();
    Ok(ReadOutcome::Line(trim_newline(line)))
}

pub(crate) fn trim_newline(mut s: String) -> String {
    while matches!(s.chars().last(), Some('\n' | '\r')) {
        s.pop();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_lines_then_reports_closed() {
        let mut reader = Cursor::new("build -j 4\r\nexit\n");
        assert_eq!(
            read_from(&mut reader).unwrap(),
            ReadOutcome::Line("build -j 4".to_string())
        );
        assert_eq!(
            read_from(&mut reader).unwrap(),
            ReadOutcome::Line("exit".to_string())
        );
        assert_eq!(read_from(&mut reader).unwrap(), ReadOutcome::Closed);
    }

    #[test]
    fn invalid_utf8_line_is_decoded_lossily() {
        let mut reader = Cursor::new(b"bu\xffild\nexit\n".to_vec());
        assert_eq!(
            read_from(&mut reader).unwrap(),
            ReadOutcome::Line("bu\u{FFFD}ild".to_string())
        );
        assert_eq!(
            read_from(&mut reader).unwrap(),
            ReadOutcome::Line("exit".to_string())
        );
    }
}
