pub mod editor;
pub mod notice;
pub mod store;
pub mod timer;

mod error;

pub use editor::{EditorMode, EditorPhase, EditorSession};
pub use error::{Error, ErrorKind, Result};
pub use notice::{Notice, NoticeKind, Operation};
pub use store::{Confirm, DELETE_PROMPT, DeleteOutcome, NoteStore, StoreSnapshot};
pub use timer::Timer;

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSettings {
	/// Lifetime of a posted notice before it clears itself.
	pub message_ttl: Duration,
	/// Delay between an editor close request and its final dismissal.
	pub close_delay: Duration,
}
impl StoreSettings {
	pub fn from_config(cfg: &notes_config::Config) -> Self {
		Self {
			message_ttl: Duration::from_millis(cfg.store.message_ttl_ms),
			close_delay: Duration::from_millis(cfg.editor.close_delay_ms),
		}
	}
}

impl Default for StoreSettings {
	fn default() -> Self {
		Self { message_ttl: Duration::from_millis(4_000), close_delay: Duration::from_millis(300) }
	}
}
