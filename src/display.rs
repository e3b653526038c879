//! UI-thread task queue.
//!
//! `Display` lives on the UI thread and owns the receiving end of the queue.
//! `DisplayHandle` is cheap to clone and may be used from any thread to post
//! work; posting never blocks and gives no completion signal. The event loop
//! drains the queue in FIFO order between platform event cycles.
//!
//! Once disposed, the display drops everything still queued and ignores new
//! posts, so no tray work ever runs after shutdown.

use crate::tray::TrayUi;
use crossbeam::channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Work item executed against the UI-thread tray state
pub type UiTask = Box<dyn FnOnce(&mut TrayUi) + Send>;

/// Called after each post so a sleeping event loop wakes up to drain the queue
pub type Waker = Arc<dyn Fn() + Send + Sync>;

pub struct Display {
    rx: Receiver<UiTask>,
    handle: DisplayHandle,
}

#[derive(Clone)]
pub struct DisplayHandle {
    tx: Sender<UiTask>,
    disposed: Arc<AtomicBool>,
    waker: Waker,
}

impl Display {
    pub fn new(waker: Waker) -> Self {
        let (tx, rx) = unbounded();
        Self {
            rx,
            handle: DisplayHandle {
                tx,
                disposed: Arc::new(AtomicBool::new(false)),
                waker,
            },
        }
    }

    /// Display whose posts wake nobody; the owner drains explicitly
    pub fn headless() -> Self {
        Self::new(Arc::new(|| {}))
    }

    pub fn handle(&self) -> DisplayHandle {
        self.handle.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.handle.is_disposed()
    }

    pub fn dispose(&self) {
        self.handle.dispose();
        self.discard_pending();
    }

    /// Run every queued task. Returns how many ran.
    pub fn run_pending(&self, ui: &mut TrayUi) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            // a task may have disposed the display
            if self.is_disposed() {
                drop(task);
                self.discard_pending();
                break;
            }
            task(ui);
            ran += 1;
        }
        ran
    }

    fn discard_pending(&self) {
        let dropped = self.rx.try_iter().count();
        if dropped > 0 {
            tracing::debug!("Display disposed, dropped {} queued task(s)", dropped);
        }
    }
}

impl DisplayHandle {
    /// Queue `task` for the UI thread.
    pub fn async_exec<F>(&self, task: F)
    where
        F: FnOnce(&mut TrayUi) + Send + 'static,
    {
        if self.is_disposed() {
            tracing::debug!("Display disposed, ignoring posted task");
            return;
        }
        if self.tx.send(Box::new(task)).is_err() {
            tracing::debug!("Display gone, ignoring posted task");
            return;
        }
        (self.waker)();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::collaborators::Collaborators;
    use crate::config::TrayConfig;
    use crate::tray::SystemTray;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;

    fn ui_for(display: &Display) -> TrayUi {
        let (backend, _calls_log) = HeadlessBackend::new(true);
        let (_tray, ui) = SystemTray::new(
            display.handle(),
            Box::new(backend),
            TrayConfig::default(),
            Collaborators::desktop("http://127.0.0.1:8383/"),
        );
        ui
    }

    #[test]
    fn test_tasks_run_in_post_order() {
        let display = Display::headless();
        let mut ui = ui_for(&display);
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let order = Arc::clone(&order);
            display.handle().async_exec(move |_| order.lock().push(i));
        }
        assert!(order.lock().is_empty());

        assert_eq!(display.run_pending(&mut ui), 5);
        assert_eq!(*order.lock(), vec![0, 1, 2, 3, 4]);
        assert_eq!(display.run_pending(&mut ui), 0);
    }

    #[test]
    fn test_waker_fires_per_post() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&wakes);
        let display = Display::new(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        display.handle().async_exec(|_| {});
        display.handle().async_exec(|_| {});
        assert_eq!(wakes.load(Ordering::SeqCst), 2);

        display.dispose();
        display.handle().async_exec(|_| {});
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dispose_drops_queued_tasks() {
        let display = Display::headless();
        let mut ui = ui_for(&display);
        let ran = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&ran);
        display.handle().async_exec(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        display.dispose();

        assert_eq!(display.run_pending(&mut ui), 0);
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_task_disposing_display_stops_the_drain() {
        let display = Display::headless();
        let mut ui = ui_for(&display);
        let ran = Arc::new(AtomicUsize::new(0));

        let handle = display.handle();
        display.handle().async_exec(move |_| handle.dispose());
        let counter = Arc::clone(&ran);
        display.handle().async_exec(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(display.run_pending(&mut ui), 1);
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }
}
