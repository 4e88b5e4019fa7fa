/// Instruction seeded as the first message of every session
pub const COMMIT_PROMPT: &str =
    "You are a senior developer writing the commit message for the staged diff that follows.

Rules:
1. Use conventional commit format: <type>(<scope>): <description>
2. Types: feat, fix, docs, style, refactor, test, chore, perf
3. Keep the subject line under 72 characters
4. Use imperative mood (\"add\", not \"added\")
5. Focus on WHAT changed and WHY, not HOW
6. Respond with the commit message only, no quotes or commentary

Later messages may contain feedback on a message you proposed. Apply it and answer with the revised commit message only.";

/// Shown instead of an empty model reply
pub const PLACEHOLDER_REPLY: &str = "I can not understand your message, please try again";

/// Appended to diffs cut down to the configured length
pub const TRUNCATION_NOTICE: &str = "\n... [diff truncated due to length] ...";

/// Room left for the truncation notice
const TRUNCATION_HEADROOM: usize = 100;

/// Yes/no question used to classify free-text feedback
pub fn agreement_question(feedback: &str) -> String {
    format!(
        "A developer was shown a proposed commit message and replied:

\"{}\"

Does this reply accept the message as it is, without asking for any change? Answer with exactly one word: yes or no.",
        feedback.trim()
    )
}

/// Cut `diff` at a line boundary so it fits in `max_length` bytes.
/// A `max_length` of zero disables truncation.
pub fn truncate_diff(diff: &str, max_length: usize) -> String {
    if max_length == 0 || diff.len() <= max_length {
        return diff.to_string();
    }

    let budget = max_length.saturating_sub(TRUNCATION_HEADROOM);
    let mut kept = Vec::new();
    let mut total = 0;

    for line in diff.split('\n') {
        if total + line.len() + 1 > budget {
            break;
        }
        kept.push(line);
        total += line.len() + 1;
    }

    format!("{}{}", kept.join("\n"), TRUNCATION_NOTICE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_prompt_exists() {
        assert!(!COMMIT_PROMPT.is_empty());
        assert!(COMMIT_PROMPT.contains("commit message"));
        assert!(COMMIT_PROMPT.contains("conventional commit"));
    }

    #[test]
    fn test_short_diff_untouched() {
        let diff = "+a\n-b";
        assert_eq!(truncate_diff(diff, 6000), diff);
        assert_eq!(truncate_diff(diff, 0), diff);
    }

    #[test]
    fn test_long_diff_cut_on_line_boundary() {
        let line = "+".repeat(49);
        let diff = vec![line.as_str(); 10].join("\n");
        assert_eq!(diff.len(), 499);

        let truncated = truncate_diff(&diff, 300);
        assert!(truncated.ends_with(TRUNCATION_NOTICE));
        let body = truncated.strip_suffix(TRUNCATION_NOTICE).unwrap();
        assert_eq!(body.lines().count(), 4);
        assert!(body.lines().all(|l| l == line));
    }

    #[test]
    fn test_truncation_handles_multibyte_text() {
        let diff = "+héllo wörld\n".repeat(50);
        let truncated = truncate_diff(&diff, 200);
        assert!(truncated.ends_with(TRUNCATION_NOTICE));
        assert!(truncated.len() < diff.len());
    }

    #[test]
    fn test_agreement_question_quotes_feedback() {
        let question = agreement_question("  works for me \n");
        assert!(question.contains("\"works for me\""));
        assert!(question.contains("yes or no"));
    }
}
