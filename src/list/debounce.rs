//! Quiet-period debouncing for search-as-you-type inputs.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Forwards a value to its sink only once the input has been stable for the
/// quiet period. Each new value restarts the timer; dropping the debouncer
/// discards anything still pending.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    cancel_token: CancellationToken,
    #[allow(dead_code)]
    task_handle: tokio::task::JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn spawn<F>(quiet: Duration, sink: F) -> Self
    where
        F: Fn(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        let cancel_token = CancellationToken::new();
        let cancel = cancel_token.clone();

        let task_handle = tokio::spawn(async move {
            'idle: loop {
                let mut value = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break 'idle,
                    next = rx.recv() => match next {
                        Some(v) => v,
                        None => break 'idle,
                    },
                };

                loop {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break 'idle,
                        next = rx.recv() => match next {
                            Some(v) => value = v,
                            None => break 'idle,
                        },
                        _ = tokio::time::sleep(quiet) => {
                            sink(value);
                            continue 'idle;
                        }
                    }
                }
            }
            log::debug!("[Debouncer] Stopped");
        });

        Self {
            tx,
            cancel_token,
            task_handle,
        }
    }

    pub fn push(&self, value: T) {
        if self.tx.send(value).is_err() {
            log::debug!("[Debouncer] Dropped input after shutdown");
        }
    }

    /// Stop without emitting a pending value.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(String) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();
        (seen, move |v| sink_seen.lock().unwrap().push(v))
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_once_after_quiet_period() {
        let (seen, sink) = recorder();
        let debouncer = Debouncer::spawn(Duration::from_millis(500), sink);

        for text in ["a", "ag", "age", "agen", "agent"] {
            debouncer.push(text.to_string());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        // 100ms after the last keystroke: still quiet.
        assert!(seen.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(399)).await;
        assert!(seen.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*seen.lock().unwrap(), vec!["agent".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_emit_separately() {
        let (seen, sink) = recorder();
        let debouncer = Debouncer::spawn(Duration::from_millis(200), sink);

        debouncer.push("one".into());
        tokio::time::sleep(Duration::from_millis(300)).await;
        debouncer.push("two".into());
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(*seen.lock().unwrap(), vec!["one".to_string(), "two".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_discards_pending_value() {
        let (seen, sink) = recorder();
        let debouncer = Debouncer::spawn(Duration::from_millis(200), sink);
        debouncer.push("pending".into());
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(debouncer);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(seen.lock().unwrap().is_empty());
    }
}
