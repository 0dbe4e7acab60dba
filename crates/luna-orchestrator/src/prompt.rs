use luna_core::{LunaResult, Turn};

/// Instruction that precedes the serialized turn window in a compaction request.
pub const SUMMARIZER_INSTRUCTION: &str = "You are a summarization AI. Read the following conversation history and extract only the key facts. Output a concise summary in the third person.";

/// System instruction for a normal turn.
pub fn persona_prompt(summary: &str, sentiment_hint: &str) -> String {
    format!(
        "You are Luna, an empathetic AI companion.\n\n\
         MEMORY:\n{summary}\n\n\
         USER MOOD:\n{sentiment_hint}\n\n\
         INSTRUCTIONS:\n\
         - Remember the user across chats\n\
         - Respond empathetically\n\
         - Be concise and human"
    )
}

/// Compaction prompt: the instruction, a newline, then `window` as a JSON array.
pub fn summarizer_prompt(window: &[Turn]) -> LunaResult<String> {
    let transcript = serde_json::to_string(window)?;
    Ok(format!("{SUMMARIZER_INSTRUCTION}\n{transcript}"))
}
