//! Command-line splitting with quote and backslash handling.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TerminalError {
    #[error("dangling escape sequence")]
    DanglingEscape,
    #[error("unterminated quoted string")]
    UnterminatedQuote,
}

/// Splits `line` on whitespace. Single or double quotes group words, and `\` escapes the next
/// character both inside and outside quotes.
pub fn tokenize(line: &str) -> Result<Vec<String>, TerminalError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = line.chars();
    let mut quote = None::<char>;

    while let Some(ch) = chars.next() {
        match quote {
            Some(active) if ch == active => quote = None,
            Some(_) if ch == '\\' => {
                current.push(chars.next().ok_or(TerminalError::DanglingEscape)?);
            }
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_token = true;
            }
            None if ch.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None if ch == '\\' => {
                current.push(chars.next().ok_or(TerminalError::DanglingEscape)?);
                in_token = true;
            }
            None => {
                current.push(ch);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(TerminalError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
