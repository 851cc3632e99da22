use std::io::Write;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard not supported on this platform")]
    Unsupported,
    #[error("failed to run clipboard command: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("clipboard command exited with {0}")]
    Exit(ExitStatus),
}

type Candidate = (&'static str, &'static [&'static str]);

/// Clipboard programs tried in order on this platform.
#[cfg(target_os = "macos")]
const CANDIDATES: &[Candidate] = &[("pbcopy", &[])];
#[cfg(target_os = "linux")]
const CANDIDATES: &[Candidate] = &[
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("wl-copy", &[]),
];
#[cfg(not(any(target_os = "macos", target_os = "linux")))]
const CANDIDATES: &[Candidate] = &[];

fn pipe_to(program: &str, args: &[&str], text: &str) -> std::io::Result<ExitStatus> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    child.wait()
}

/// Pipe `text` into the first candidate that can be started.
fn copy_with(candidates: &[Candidate], text: &str) -> Result<(), ClipboardError> {
    let mut last_err = None;
    for (program, args) in candidates {
        match pipe_to(program, args, text) {
            Ok(status) if status.success() => return Ok(()),
            Ok(status) => return Err(ClipboardError::Exit(status)),
            Err(err) => {
                tracing::debug!(program, error = %err, "clipboard tool unavailable");
                last_err = Some(err);
            }
        }
    }
    Err(last_err.map_or(ClipboardError::Unsupported, ClipboardError::Spawn))
}

/// Copy `text` to the system clipboard, always the full value.
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    copy_with(CANDIDATES, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_candidates_is_unsupported() {
        assert!(matches!(
            copy_with(&[], "text"),
            Err(ClipboardError::Unsupported)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn falls_back_to_the_next_candidate() {
        let candidates: &[Candidate] = &[("qa-board-no-such-tool", &[]), ("cat", &[])];
        assert!(copy_with(candidates, "full qa answer").is_ok());
    }

    #[test]
    fn missing_tools_report_the_spawn_error() {
        let candidates: &[Candidate] = &[("qa-board-no-such-tool", &["--flag"])];
        assert!(matches!(
            copy_with(candidates, "text"),
            Err(ClipboardError::Spawn(_))
        ));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_prefers_xclip_clipboard_selection() {
        assert_eq!(CANDIDATES[0], ("xclip", &["-selection", "clipboard"][..]));
    }

    #[test]
    fn errors_render_readably() {
        assert_eq!(
            ClipboardError::Unsupported.to_string(),
            "clipboard not supported on this platform"
        );
    }
}
