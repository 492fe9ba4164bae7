use console::style;

/// Print an error and its chain of causes to stderr in red.
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} {}", style("ERROR:").red().bold(), format_error(error));
}

/// Render an error with its causes separated by `: `
pub fn format_error(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    for cause in error.chain().skip(1) {
        let cause = cause.to_string();
        // Phase wrappers already embed their source's message.
        if !message.contains(&cause) {
            message.push_str(": ");
            message.push_str(&cause);
        }
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GitverError, ResolutionPhase};

    #[test]
    fn test_format_error_includes_context() {
        let err = anyhow::Error::new(GitverError::config("bad")).context("cannot load settings");
        assert_eq!(
            format_error(&err),
            "cannot load settings: Configuration error: bad"
        );
    }

    #[test]
    fn test_format_error_does_not_repeat_phase_source() {
        let err = anyhow::Error::new(
            GitverError::branch("detached").in_phase(ResolutionPhase::BranchIdentity),
        );
        assert_eq!(
            format_error(&err),
            "branch identification failed: Cannot determine branch: detached"
        );
    }
}
