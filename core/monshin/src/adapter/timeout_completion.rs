//! 期限付きの CompletionClient
//!
//! 内側の complete を別スレッドで走らせ、期限までに結果が来なければ `Error::Timeout` を返す。
//! 実行中の要求は中断せずに放置する。

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use common::error::Error;

use crate::ports::outbound::CompletionClient;

pub struct TimeoutCompletion {
    inner: Arc<dyn CompletionClient>,
    limit: Duration,
}

impl TimeoutCompletion {
    pub fn new(inner: Arc<dyn CompletionClient>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    /// `limit` が None なら inner をそのまま返す
    pub fn wrap(
        inner: Arc<dyn CompletionClient>,
        limit: Option<Duration>,
    ) -> Arc<dyn CompletionClient> {
        match limit {
            Some(limit) => Arc::new(Self::new(inner, limit)),
            None => inner,
        }
    }
}

impl CompletionClient for TimeoutCompletion {
    fn complete(&self, prompt: &str) -> Result<String, Error> {
        let (tx, rx) = mpsc::channel();
        let worker = Arc::clone(&self.inner);
        let prompt = prompt.to_string();
        thread::Builder::new()
            .name("monshin-completion".to_string())
            .spawn(move || {
                let _ = tx.send(worker.complete(&prompt));
            })
            .map_err(|e| Error::io_msg(format!("failed to spawn completion worker: {}", e)))?;
        match rx.recv_timeout(self.limit) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(Error::Timeout(self.limit)),
            Err(RecvTimeoutError::Disconnected) => {
                Err(Error::http("completion worker exited without a result"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Slow(Duration);

    impl CompletionClient for Slow {
        fn complete(&self, _prompt: &str) -> Result<String, Error> {
            thread::sleep(self.0);
            Ok("遅れて届いた質問".to_string())
        }
    }

    struct Down;

    impl CompletionClient for Down {
        fn complete(&self, _prompt: &str) -> Result<String, Error> {
            Err(Error::http("connection refused"))
        }
    }

    #[test]
    fn test_wrap_without_limit_returns_inner() {
        let inner: Arc<dyn CompletionClient> = Arc::new(Slow(Duration::from_millis(0)));
        let client = TimeoutCompletion::wrap(inner.clone(), None);
        assert!(Arc::ptr_eq(&client, &inner));
        assert_eq!(client.complete("p").unwrap(), "遅れて届いた質問");
    }

    #[test]
    fn test_result_within_deadline() {
        let client = TimeoutCompletion::new(
            Arc::new(Slow(Duration::from_millis(5))),
            Duration::from_secs(5),
        );
        assert_eq!(client.complete("p").unwrap(), "遅れて届いた質問");
    }

    #[test]
    fn test_deadline_exceeded() {
        let client = TimeoutCompletion::new(
            Arc::new(Slow(Duration::from_millis(500))),
            Duration::from_millis(20),
        );
        let err = client.complete("p").unwrap_err();
        assert_eq!(err, Error::Timeout(Duration::from_millis(20)));
        assert!(err.is_backend_failure());
    }

    #[test]
    fn test_backend_error_propagates_through_worker() {
        let client = TimeoutCompletion::new(Arc::new(Down), Duration::from_secs(5));
        assert!(matches!(client.complete("p"), Err(Error::BackendUnavailable(_))));
    }
}
