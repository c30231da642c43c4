use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

#[derive(Default)]
struct ToastState {
    current: Option<Toast>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Single toast slot with an auto-dismiss timer. Showing a new toast
/// cancels the pending timer of the previous one.
#[derive(Clone)]
pub struct Toaster {
    state: Arc<Mutex<ToastState>>,
    duration: Duration,
}

impl Toaster {
    pub fn new(duration: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(ToastState::default())),
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    fn state(&self) -> MutexGuard<'_, ToastState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn show(&self, message: impl Into<String>, kind: ToastKind) {
        let toast = Toast {
            message: message.into(),
            kind,
        };
        match kind {
            ToastKind::Success => tracing::info!("Toast: {}", toast.message),
            ToastKind::Warning => tracing::warn!("Toast: {}", toast.message),
        }

        let mut state = self.state();
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.generation += 1;
        state.current = Some(toast);

        // Without a runtime the toast simply stays until replaced or dismissed
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let generation = state.generation;
            let shared = self.state.clone();
            let duration = self.duration;
            state.timer = Some(handle.spawn(async move {
                tokio::time::sleep(duration).await;
                let mut state = shared.lock().unwrap_or_else(|e| e.into_inner());
                if state.generation == generation {
                    state.current = None;
                    state.timer = None;
                }
            }));
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Success);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Warning);
    }

    pub fn current(&self) -> Option<Toast> {
        self.state().current.clone()
    }

    /// Clear the toast and its timer
    pub fn dismiss(&self) {
        let mut state = self.state();
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.generation += 1;
        state.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_toast_auto_dismisses() {
        let toaster = Toaster::new(Duration::from_millis(3000));
        toaster.success("Expense added");
        assert_eq!(toaster.current().unwrap().message, "Expense added");

        tokio::time::sleep(Duration::from_millis(3100)).await;
        assert_eq!(toaster.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retrigger_cancels_previous_timer() {
        let toaster = Toaster::new(Duration::from_millis(3000));
        toaster.success("first");

        tokio::time::sleep(Duration::from_millis(2000)).await;
        toaster.warning("second");

        // The first timer would have fired here
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let current = toaster.current().unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.kind, ToastKind::Warning);

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert_eq!(toaster.current(), None);
    }

    #[test]
    fn test_without_runtime_toast_persists() {
        let toaster = Toaster::new(Duration::from_millis(10));
        toaster.success("no runtime");
        assert!(toaster.current().is_some());
        toaster.dismiss();
        assert!(toaster.current().is_none());
    }
}
