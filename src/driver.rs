//! Async shell: runs a controller on a tokio current-thread runtime.
//!
//! The host pushes [`HostEvent`]s into an unbounded channel; [`drive`] waits on
//! that channel, the debounce deadline and the in-flight load at once.
//! Debouncers without a deadline are ticked every [`FRAME_INTERVAL`]. The
//! controller is not `Send`, so run this on a current-thread runtime or inside
//! a `LocalSet`.

use crate::sentinel::{ListenerId, LoadMoreController, ScrollTarget};
use std::future::poll_fn;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, info};

/// Tick cadence for debouncers that count quiet frames instead of time.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Events a host feeds to [`drive`].
#[derive(Debug)]
pub enum HostEvent<T> {
    /// A raw scroll event from the listener with this id.
    Scroll(ListenerId),
    /// Switch the controller to a new scroll source.
    Retarget(T),
    /// Request a load regardless of scroll position.
    LoadMore,
    /// Unmount. The driver stops the controller and returns.
    Stop,
}

/// Run `controller` until [`HostEvent::Stop`] arrives or the channel closes.
///
/// The controller should already be started. Scheduled scrollability
/// re-checks run at the end of every loop iteration. On exit the controller is
/// stopped and any in-flight load is awaited to settlement before returning
/// the unbound target.
pub async fn drive<T: ScrollTarget>(
    controller: &mut LoadMoreController<T>,
    events: &mut UnboundedReceiver<HostEvent<T>>,
) -> Option<T> {
    info!("Load-more driver running");

    loop {
        let deadline = controller.next_deadline().map(Instant::from_std);
        let frame_pending = deadline.is_none() && controller.has_pending_check();
        let loading = controller.is_loading();

        tokio::select! {
            event = events.recv() => match event {
                Some(HostEvent::Scroll(listener)) => {
                    controller.handle_scroll(listener, Instant::now().into_std());
                }
                Some(HostEvent::Retarget(target)) => {
                    controller.retarget(target);
                }
                Some(HostEvent::LoadMore) => {
                    controller.load_more();
                }
                Some(HostEvent::Stop) | None => break,
            },
            () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                controller.tick(Instant::now().into_std());
            }
            () = sleep(FRAME_INTERVAL), if frame_pending => {
                controller.tick(Instant::now().into_std());
            }
            settled = poll_fn(|cx| controller.poll_load(cx)), if loading => {
                debug!(sequence = settled.sequence, "Driver observed load settlement");
            }
        }

        controller.after_render();
    }

    let target = controller.stop();
    if controller.is_loading() {
        debug!("Waiting for in-flight load before shutting down");
        poll_fn(|cx| controller.poll_load(cx)).await;
    }
    info!("Load-more driver stopped");
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentinel::test_support::FakeTarget;
    use crate::sentinel::{FrameDebouncer, SentinelConfig};
    use futures::future::LocalBoxFuture;
    use futures::FutureExt;
    use std::cell::Cell;
    use std::convert::Infallible;
    use std::rc::Rc;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::sleep;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Loader that counts calls and settles after `latency`.
    fn slow_loader(
        calls: &Rc<Cell<usize>>,
        latency: Duration,
        fail: bool,
    ) -> impl FnMut() -> LocalBoxFuture<'static, Result<(), String>> {
        let calls = calls.clone();
        move || {
            calls.set(calls.get() + 1);
            async move {
                sleep(latency).await;
                if fail {
                    Err("offline".to_string())
                } else {
                    Ok(())
                }
            }
            .boxed_local()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn scroll_burst_loads_once_after_quiet_interval() {
        let calls = Rc::new(Cell::new(0));
        let mut controller =
            LoadMoreController::new(slow_loader(&calls, ms(50), false), SentinelConfig::default());
        let target = FakeTarget::element(1000.0, 500.0);
        target.set_scroll_top(500.0);
        controller.start(target.clone());
        let id = controller.listener_id().expect("bound");

        let (tx, mut rx) = mpsc::unbounded_channel();
        let script = async {
            for _ in 0..5 {
                tx.send(HostEvent::Scroll(id)).expect("driver alive");
                sleep(ms(20)).await;
            }
            // Debounce fires 100ms after the last event; the load takes 50ms
            sleep(ms(150)).await;
            assert_eq!(calls.get(), 1);
            tx.send(HostEvent::Stop).expect("driver alive");
        };

        let (returned, ()) = tokio::join!(drive(&mut controller, &mut rx), script);

        assert!(returned.is_some());
        assert_eq!(calls.get(), 1);
        assert!(!controller.is_loading());
        assert!(controller.is_scrollable());
        assert!(target.listeners().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn frame_debouncer_is_ticked_on_frame_cadence() {
        let calls = Rc::new(Cell::new(0));
        let mut controller =
            LoadMoreController::new(slow_loader(&calls, ms(50), false), SentinelConfig::default())
                .with_debouncer(FrameDebouncer::new(3));
        let target = FakeTarget::element(1000.0, 500.0);
        target.set_scroll_top(500.0);
        controller.start(target);
        let id = controller.listener_id().expect("bound");
        assert_eq!(controller.next_deadline(), None);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let script = async {
            // Gaps of 20ms allow one frame each, short of the 3 quiet frames
            for _ in 0..5 {
                tx.send(HostEvent::Scroll(id)).expect("driver alive");
                sleep(ms(20)).await;
            }
            assert_eq!(calls.get(), 0, "still inside the burst");
            sleep(ms(500)).await;
            tx.send(HostEvent::Stop).expect("driver alive");
        };

        tokio::join!(drive(&mut controller, &mut rx), script);

        assert_eq!(calls.get(), 1);
        assert!(!controller.has_pending_check());
        assert!(!controller.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_waits_for_in_flight_load_to_settle() {
        let calls = Rc::new(Cell::new(0));
        let mut controller =
            LoadMoreController::new(slow_loader(&calls, ms(500), true), SentinelConfig::default());
        let target = FakeTarget::element(1000.0, 500.0);
        target.set_scroll_top(500.0);
        controller.start(target);
        let id = controller.listener_id().expect("bound");

        let started = Instant::now();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let script = async {
            tx.send(HostEvent::Scroll(id)).expect("driver alive");
            sleep(ms(150)).await;
            tx.send(HostEvent::Stop).expect("driver alive");
        };

        tokio::join!(drive(&mut controller, &mut rx), script);

        assert_eq!(calls.get(), 1);
        assert!(!controller.is_loading(), "failed load still settles");
        assert!(!controller.is_bound());
        assert!(started.elapsed() >= ms(600));
    }

    #[tokio::test(start_paused = true)]
    async fn retarget_event_drops_stale_scrolls() {
        let calls = Rc::new(Cell::new(0));
        let mut controller =
            LoadMoreController::new(slow_loader(&calls, ms(10), false), SentinelConfig::default());
        let old = FakeTarget::element(1000.0, 500.0);
        old.set_scroll_top(500.0);
        let new = FakeTarget::element(1000.0, 500.0);
        controller.start(old.clone());
        let old_id = controller.listener_id().expect("bound");

        let (tx, mut rx) = mpsc::unbounded_channel();
        let script = async {
            tx.send(HostEvent::Retarget(new.clone())).expect("driver alive");
            tx.send(HostEvent::Scroll(old_id)).expect("driver alive");
            sleep(ms(300)).await;
            tx.send(HostEvent::Stop).expect("driver alive");
        };

        tokio::join!(drive(&mut controller, &mut rx), script);

        assert_eq!(calls.get(), 0);
        assert!(old.listeners().is_empty());
        assert!(new.listeners().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn manual_load_and_channel_close() {
        let calls = Rc::new(Cell::new(0));
        let mut controller =
            LoadMoreController::new(slow_loader(&calls, ms(10), false), SentinelConfig::default());
        let target = FakeTarget::element(400.0, 500.0);
        controller.start(target);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let script = async move {
            tx.send(HostEvent::LoadMore).expect("driver alive");
            tx.send(HostEvent::LoadMore).expect("driver alive");
            sleep(ms(50)).await;
            drop(tx);
        };

        tokio::join!(drive(&mut controller, &mut rx), script);

        assert_eq!(calls.get(), 1, "second request arrives while loading");
        assert!(!controller.is_loading());
        assert!(!controller.is_scrollable());
    }

    #[test]
    fn loader_error_type_can_be_infallible() {
        let mut controller = LoadMoreController::<FakeTarget>::new(
            || async { Ok::<(), Infallible>(()) },
            SentinelConfig::default(),
        );
        assert!(controller.load_more());
        assert!(controller.try_settle().is_some());
    }
}
