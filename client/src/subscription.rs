use tokio::task::JoinHandle;

/// Handle to a background task. Cancelling, or dropping the handle, aborts
/// the task.
#[derive(Debug)]
pub struct Subscription {
    handle: JoinHandle<()>,
    cancelled: bool,
}

impl Subscription {
    pub(crate) fn new(handle: JoinHandle<()>) -> Self {
        Self {
            handle,
            cancelled: false,
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.handle.abort();
    }

    /// `false` once cancelled or once the task ran to completion.
    pub fn is_active(&self) -> bool {
        !self.cancelled && !self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn cancel_is_immediately_visible() {
        let mut sub = Subscription::new(tokio::spawn(std::future::pending()));
        assert!(sub.is_active());
        sub.cancel();
        assert!(!sub.is_active());
    }

    #[tokio::test]
    async fn finished_task_is_inactive() {
        let sub = Subscription::new(tokio::spawn(async {}));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!sub.is_active());
    }

    #[tokio::test]
    async fn drop_aborts_the_task() {
        let (tx, mut rx) = tokio::sync::oneshot::channel::<()>();
        let sub = Subscription::new(tokio::spawn(async move {
            std::future::pending::<()>().await;
            let _ = tx.send(());
        }));
        drop(sub);
        // The sender is dropped along with the aborted task.
        assert!(rx.try_recv().is_err());
        assert!(tokio::time::timeout(Duration::from_secs(1), &mut rx).await.unwrap().is_err());
    }
}
