//! Task-local trace context for the request pipeline.
//!
//! The gateway tags every request with a trace id so that error bodies,
//! access logs, and upstream-failure logs for the same request can be
//! correlated. The id lives in Tokio task-local storage for the duration
//! of the request future; anything running inside that future can read it
//! without threading it through call signatures.

use std::cell::RefCell;

use tokio::task_local;

task_local! {
    static TRACE_ID: RefCell<Option<String>>;
}

/// Trace id of the request currently being processed.
///
/// Returns "unknown" outside of a request scope.
pub fn current() -> String {
    TRACE_ID
        .try_with(|cell| {
            cell.borrow()
                .as_ref()
                .cloned()
                .unwrap_or_else(|| "unknown".to_string())
        })
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Run `future` with `trace_id` installed as the current trace context.
pub async fn scope<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(RefCell::new(Some(trace_id)), future).await
}

#[cfg(test)]
mod tests {
    use super::{current, scope};

    #[tokio::test]
    async fn unknown_outside_scope() {
        assert_eq!(current(), "unknown");
    }

    #[tokio::test]
    async fn visible_inside_scope() {
        let id = "trace-abc".to_string();
        scope(id.clone(), async {
            assert_eq!(current(), id);
        })
        .await;
        assert_eq!(current(), "unknown");
    }
}
