//! Context joining and the answer prompt template.

use crate::document::SearchResult;

/// What the model must say when the context does not contain the answer.
pub const REFUSAL_PHRASE: &str = "Sorry, I could not find information about that in the document.";

/// Separator placed between consecutive chunks in the context block.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Join retrieved chunk texts, in order, separated by one blank line.
///
/// No truncation happens here; an oversized context is rejected by the
/// completion provider.
pub fn join_context(results: &[SearchResult]) -> String {
    results.iter().map(|r| r.chunk.text.as_str()).collect::<Vec<_>>().join(CONTEXT_SEPARATOR)
}

/// Render the answer prompt for `question` grounded in `context`.
///
/// Both values are substituted in a single pass, so placeholder-like text
/// inside them is left untouched.
pub fn compose_prompt(context: &str, question: &str) -> String {
    format!(
        "\nYou are a helpful AI assistant. Answer the user's question ONLY based on the context provided below.\n\
         If the information is not found in the context, just say \"{REFUSAL_PHRASE}\"\n\
         Do not try to make up an answer.\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Question:\n\
         {question}\n\
         \n\
         Helpful answer:\n"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::document::Chunk;

    fn result(text: &str) -> SearchResult {
        SearchResult {
            chunk: Chunk {
                id: text.to_string(),
                text: text.to_string(),
                embedding: vec![1.0],
                metadata: HashMap::new(),
            },
            score: 1.0,
        }
    }

    #[test]
    fn join_uses_single_blank_line_in_order() {
        assert_eq!(join_context(&[result("A"), result("B")]), "A\n\nB");
        assert_eq!(join_context(&[result("B"), result("A"), result("C")]), "B\n\nA\n\nC");
    }

    #[test]
    fn join_of_nothing_is_empty() {
        assert_eq!(join_context(&[]), "");
        assert_eq!(join_context(&[result("only")]), "only");
    }

    #[test]
    fn prompt_carries_rules_context_and_question() {
        let prompt = compose_prompt("The campus opens at 7 AM.", "When does the campus open?");
        assert!(prompt.contains("ONLY based on the context"));
        assert!(prompt.contains(REFUSAL_PHRASE));
        assert!(prompt.contains("Do not try to make up an answer."));
        assert!(prompt.contains("Context:\nThe campus opens at 7 AM.\n"));
        assert!(prompt.contains("Question:\nWhen does the campus open?\n"));
        assert!(prompt.ends_with("Helpful answer:\n"));
    }

    #[test]
    fn placeholders_in_user_text_are_not_expanded() {
        let prompt = compose_prompt("ctx {question}", "what is {context}?");
        assert!(prompt.contains("Context:\nctx {question}\n"));
        assert!(prompt.contains("Question:\nwhat is {context}?\n"));
    }

    #[test]
    fn empty_context_still_renders() {
        let prompt = compose_prompt("", "anything?");
        assert!(prompt.contains("Context:\n\n\nQuestion:\nanything?"));
    }
}
