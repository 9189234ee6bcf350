//! 再試行間の待機 Outbound ポート

/// 再試行前の待機。`attempt` はこれから行う試行番号（2 以上）。
pub trait RetryDelay: Send + Sync {
    fn wait(&self, attempt: usize);
}
