//! 再試行間の待機の実装

use std::thread;
use std::time::Duration;

use crate::ports::outbound::RetryDelay;

/// 待たない（既定）
pub struct NoDelay;

impl RetryDelay for NoDelay {
    fn wait(&self, _attempt: usize) {}
}

/// 一定時間スリープする
pub struct FixedDelay(pub Duration);

impl RetryDelay for FixedDelay {
    fn wait(&self, _attempt: usize) {
        if !self.0.is_zero() {
            thread::sleep(self.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_fixed_delay_sleeps() {
        let start = Instant::now();
        FixedDelay(Duration::from_millis(15)).wait(2);
        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn test_no_delay_returns_immediately() {
        let start = Instant::now();
        NoDelay.wait(2);
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
