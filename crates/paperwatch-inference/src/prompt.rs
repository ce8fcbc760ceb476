//! Summary prompt construction.
//!
//! All providers receive the same structured request so stored summaries
//! have a uniform shape regardless of which backend produced them.

/// System message sent alongside every summary request.
pub const SYSTEM_PROMPT: &str = "You are a helpful research assistant.";

/// Build the structured summary prompt for a paper abstract.
pub fn build_prompt(abstract_text: &str) -> String {
    format!(
        "You are an expert academic researcher. Provide a structured summary of the \
         following research paper abstract.\n\
         \n\
         Structure your response exactly as follows:\n\
         1. **Problem Definition**: What problem is this paper trying to solve?\n\
         2. **Methodology**: How did they solve it?\n\
         3. **Key Results**: What did they find?\n\
         4. **Limitations**: Any mentioned limitations?\n\
         \n\
         Keep each section to one or two sentences.\n\
         \n\
         Abstract:\n\
         {}",
        abstract_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_all_sections() {
        let prompt = build_prompt("We study transformers.");
        assert!(prompt.contains("**Problem Definition**"));
        assert!(prompt.contains("**Methodology**"));
        assert!(prompt.contains("**Key Results**"));
        assert!(prompt.contains("**Limitations**"));
    }

    #[test]
    fn test_prompt_embeds_abstract_verbatim() {
        let text = "An abstract with special chars: {braces} & <tags>.";
        let prompt = build_prompt(text);
        assert!(prompt.ends_with(text));
    }

    #[test]
    fn test_prompt_caps_response_length() {
        let prompt = build_prompt("x");
        assert!(prompt.contains("one or two sentences"));
    }
}
