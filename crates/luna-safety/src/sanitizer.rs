use luna_core::{LunaError, LunaResult};

/// Default upper bound on a chat message, in bytes.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 10_000;

/// Normalizes an incoming chat message before the crisis scan, the
/// classifier and the model see it.
///
/// Messages longer than the limit are refused. Control characters other
/// than line breaks and tabs are dropped so they never reach the persona
/// prompt or the stored history.
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer {
    limit: usize,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGE_LENGTH)
    }
}

impl Sanitizer {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// The message with stray control characters removed, or a
    /// [`LunaError::Validation`] when it is over the byte limit.
    ///
    /// The result may be blank; deciding whether a blank message is
    /// acceptable is left to the caller.
    pub fn clean(&self, message: &str) -> LunaResult<String> {
        if message.len() > self.limit {
            return Err(LunaError::Validation(format!(
                "message is longer than {} bytes",
                self.limit
            )));
        }
        Ok(message.chars().filter(|&c| kept(c)).collect())
    }
}

fn kept(c: char) -> bool {
    !c.is_control() || matches!(c, '\n' | '\r' | '\t')
}
