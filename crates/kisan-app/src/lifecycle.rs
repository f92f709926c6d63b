//! 프로세스 종료 처리.
//!
//! OS 시그널을 한 번 받으면 `watch` 채널 값이 `true`로 바뀐다.
//! 구독자는 값 변화만 보면 되고, 신호 종류는 로그로만 남긴다.

use tokio::sync::watch;
use tracing::{info, warn};

pub struct LifecycleManager {
    shutdown: watch::Sender<bool>,
}

impl LifecycleManager {
    pub fn new() -> Self {
        Self {
            shutdown: watch::Sender::new(false),
        }
    }

    /// 종료 수신기
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// 구독자 모두에게 종료 알림
    pub fn shutdown(&self) {
        info!("종료 신호 발송");
        self.shutdown.send_replace(true);
    }

    /// 시그널 수신까지 대기한 뒤 종료 알림
    pub async fn wait_for_signal(&self) {
        let name = shutdown_signal().await;
        info!(signal = name, "종료 시그널 수신");
        self.shutdown();
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

/// SIGINT/SIGTERM (unix) 또는 Ctrl+C
#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut interrupt, mut terminate) =
        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(i), Ok(t)) => (i, t),
            (Err(e), _) | (_, Err(e)) => {
                warn!("시그널 핸들러 등록 실패, Ctrl+C로 대기: {e}");
                return ctrl_c().await;
            }
        };

    tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
    ctrl_c().await
}

async fn ctrl_c() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Ctrl+C 대기 실패: {e}");
    }
    "ctrl-c"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_creation() {
        let lm = LifecycleManager::new();
        let rx = lm.subscribe();
        assert!(!*rx.borrow());
    }

    #[tokio::test]
    async fn shutdown_reaches_subscribers() {
        let lm = LifecycleManager::default();
        let mut rx = lm.subscribe();
        lm.shutdown();
        rx.changed().await.unwrap();
        assert!(*rx.borrow());
    }
}
