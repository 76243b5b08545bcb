use std::time::Duration;

use tokio::task::JoinHandle;

/// A single pending callback. Scheduling again, cancelling or dropping the timer aborts whatever
/// was pending.
///
/// Must be scheduled from within a Tokio runtime.
#[derive(Debug, Default)]
pub struct Timer {
	handle: Option<JoinHandle<()>>,
}
impl Timer {
	pub fn schedule<F>(&mut self, delay: Duration, callback: F)
	where
		F: FnOnce() + Send + 'static,
	{
		self.cancel();
		self.handle = Some(tokio::spawn(async move {
			tokio::time::sleep(delay).await;

			callback();
		}));
	}

	pub fn cancel(&mut self) {
		if let Some(handle) = self.handle.take() {
			handle.abort();
		}
	}

	pub fn is_pending(&self) -> bool {
		self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
	}
}

impl Drop for Timer {
	fn drop(&mut self) {
		self.cancel();
	}
}

#[cfg(test)]
mod tests {
	use std::sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	};

	use super::*;

	fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
		let fired = Arc::new(AtomicUsize::new(0));
		let handle = fired.clone();

		(fired, move || {
			handle.fetch_add(1, Ordering::SeqCst);
		})
	}

	#[tokio::test(start_paused = true)]
	async fn fires_after_delay() {
		let mut timer = Timer::default();
		let (fired, callback) = counter();

		timer.schedule(Duration::from_millis(100), callback);
		tokio::time::sleep(Duration::from_millis(99)).await;

		assert_eq!(fired.load(Ordering::SeqCst), 0);
		assert!(timer.is_pending());

		tokio::time::sleep(Duration::from_millis(2)).await;

		assert_eq!(fired.load(Ordering::SeqCst), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn rescheduling_cancels_previous_callback() {
		let mut timer = Timer::default();
		let (first, first_callback) = counter();
		let (second, second_callback) = counter();

		timer.schedule(Duration::from_millis(100), first_callback);
		tokio::time::sleep(Duration::from_millis(50)).await;
		timer.schedule(Duration::from_millis(100), second_callback);
		tokio::time::sleep(Duration::from_millis(200)).await;

		assert_eq!(first.load(Ordering::SeqCst), 0);
		assert_eq!(second.load(Ordering::SeqCst), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn dropping_cancels() {
		let (fired, callback) = counter();

		{
			let mut timer = Timer::default();

			timer.schedule(Duration::from_millis(10), callback);
		}

		tokio::time::sleep(Duration::from_millis(50)).await;

		assert_eq!(fired.load(Ordering::SeqCst), 0);
	}
}
