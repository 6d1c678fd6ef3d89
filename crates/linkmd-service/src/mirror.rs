//! Best-effort application of mirror changes after a logical commit.

use std::future::Future;

use tracing::warn;

use linkmd_core::result::AppResult;

/// Await a mirror operation, logging and swallowing any failure.
///
/// Returns whether the operation succeeded.
pub(crate) async fn best_effort<F>(operation: &'static str, path: &str, fut: F) -> bool
where
    F: Future<Output = AppResult<()>>,
{
    match fut.await {
        Ok(()) => true,
        Err(e) => {
            warn!(
                operation,
                path,
                error = %e,
                "Physical mirror update failed; mirror left stale"
            );
            false
        }
    }
}
