//! Interactive confirmation prompts.

use std::io::{BufRead, Write};

use crate::error::{GrainError, Result};

/// Phrase required before the current week is wiped.
pub const RESET_PHRASE: &str = "reset grain";

/// Answers that confirm a restore.
pub const RESTORE_ANSWERS: &[&str] = &["yes", "y"];

/// Print `prompt` and read one line, accepting any of `accepted`
/// (case-insensitive, surrounding whitespace ignored).
///
/// End of input counts as a refusal.
pub fn confirm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    accepted: &[&str],
) -> Result<bool> {
    write!(output, "{} ", prompt).map_err(|e| GrainError::storage("<stderr>", e))?;
    output
        .flush()
        .map_err(|e| GrainError::storage("<stderr>", e))?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| GrainError::storage("<stdin>", e))?;

    let answer = line.trim().to_lowercase();
    Ok(accepted.iter().any(|a| *a == answer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(answer: &str, accepted: &[&str]) -> (bool, String) {
        let mut input = Cursor::new(answer.as_bytes().to_vec());
        let mut output = Vec::new();
        let confirmed = confirm(&mut input, &mut output, "Sure?", accepted).unwrap();
        (confirmed, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_reset_phrase_accepted() {
        let (confirmed, printed) = ask("reset grain\n", &[RESET_PHRASE]);
        assert!(confirmed);
        assert_eq!(printed, "Sure? ");
    }

    #[test]
    fn test_case_and_whitespace_ignored() {
        assert!(ask("  Reset Grain  \n", &[RESET_PHRASE]).0);
        assert!(ask("YES\n", RESTORE_ANSWERS).0);
        assert!(ask("y\n", RESTORE_ANSWERS).0);
    }

    #[test]
    fn test_other_answers_refused() {
        assert!(!ask("yes\n", &[RESET_PHRASE]).0);
        assert!(!ask("no\n", RESTORE_ANSWERS).0);
        assert!(!ask("\n", RESTORE_ANSWERS).0);
    }

    #[test]
    fn test_eof_refused() {
        assert!(!ask("", RESTORE_ANSWERS).0);
    }
}
