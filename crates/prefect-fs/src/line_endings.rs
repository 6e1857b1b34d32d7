//! End-of-line detection and normalization

/// A line terminator convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// The native convention of the running platform.
    pub fn platform() -> Self {
        if cfg!(windows) { Self::CrLf } else { Self::Lf }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }

    /// Rewrite LF-normalized text to use this convention.
    pub fn apply(&self, normalized: &str) -> String {
        match self {
            Self::Lf => normalized.to_string(),
            Self::CrLf => normalized.replace('\n', "\r\n"),
        }
    }
}

/// Detect the convention of `content` from its first line break.
///
/// Returns `None` when the content has no line break at all.
pub fn detect(content: &[u8]) -> Option<LineEnding> {
    let idx = content.iter().position(|&b| b == b'\n')?;
    if idx > 0 && content[idx - 1] == b'\r' {
        Some(LineEnding::CrLf)
    } else {
        Some(LineEnding::Lf)
    }
}

/// Convert CRLF and lone CR line breaks to LF.
pub fn normalize(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}
