pub mod commit;

/// Add custom message context to any prompt
pub fn add_custom_message(base_prompt: &str, custom_message: Option<&str>) -> String {
    match custom_message {
        Some(message) => format!(
            "{}\n\nThe user has provided this additional context to focus on: {}",
            base_prompt, message
        ),
        None => base_prompt.to_string(),
    }
}

/// Build the instruction message, preferring a configured prompt over the built-in one
pub fn commit_instruction(configured: Option<&str>, custom_message: Option<&str>) -> String {
    let base_prompt = configured.unwrap_or(commit::COMMIT_PROMPT);
    add_custom_message(base_prompt, custom_message)
}
