use luna_core::{LunaError, LunaResult};
use std::future::Future;
use std::time::Duration;

/// Await `fut` for at most `after`; running out of time is the collaborator's failure.
pub(crate) async fn bounded<T, F>(collaborator: &str, after: Duration, fut: F) -> LunaResult<T>
where
    F: Future<Output = LunaResult<T>>,
{
    match tokio::time::timeout(after, fut).await {
        Ok(result) => result,
        Err(_) => Err(LunaError::timeout(collaborator, after)),
    }
}
