use std::{
	sync::{Arc, Mutex, MutexGuard, Weak},
	time::Duration,
};

use crate::{NoteStore, Result, Timer};
use notes_domain::{Note, NotePayload};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
	Create,
	Edit(Note),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
	Closed,
	Open,
	/// Waiting out the close delay before final dismissal.
	Closing,
}

/// Draft state for one create-or-edit form, independent of persistence until `submit`.
#[derive(Clone)]
pub struct EditorSession {
	store: NoteStore,
	close_delay: Duration,
	inner: Arc<Mutex<Session>>,
}

struct Session {
	phase: EditorPhase,
	mode: EditorMode,
	title: String,
	content: String,
	seed: NotePayload,
	// Bumped on every open and close so late continuations can tell they are stale.
	generation: u64,
	close_timer: Timer,
}
impl Session {
	fn closed() -> Self {
		Self {
			phase: EditorPhase::Closed,
			mode: EditorMode::Create,
			title: String::new(),
			content: String::new(),
			seed: NotePayload::new("", ""),
			generation: 0,
			close_timer: Timer::default(),
		}
	}

	fn reset(&mut self) {
		self.close_timer.cancel();
		self.phase = EditorPhase::Closed;
		self.mode = EditorMode::Create;
		self.title.clear();
		self.content.clear();
		self.seed = NotePayload::new("", "");
		self.generation += 1;
	}

	fn has_content(&self) -> bool {
		!self.title.trim().is_empty() && !self.content.trim().is_empty()
	}
}

impl EditorSession {
	pub fn new(store: NoteStore) -> Self {
		let close_delay = store.settings().close_delay;

		Self { store, close_delay, inner: Arc::new(Mutex::new(Session::closed())) }
	}

	/// Opens the form, seeded from `note` (edit mode) or empty (create mode).
	///
	/// Always reseeds, even when already open, and cancels a pending close.
	pub fn open(&self, note: Option<&Note>) {
		let mut session = self.lock();

		session.close_timer.cancel();
		session.generation += 1;
		session.phase = EditorPhase::Open;

		match note {
			Some(note) => {
				session.mode = EditorMode::Edit(note.clone());
				session.title = note.title.clone();
				session.content = note.content.clone();
			},
			None => {
				session.mode = EditorMode::Create;
				session.title.clear();
				session.content.clear();
			},
		}

		session.seed = NotePayload::new(session.title.clone(), session.content.clone());
	}

	pub fn set_title(&self, text: impl Into<String>) {
		self.lock().title = text.into();
	}

	pub fn set_content(&self, text: impl Into<String>) {
		self.lock().content = text.into();
	}

	pub fn title(&self) -> String {
		self.lock().title.clone()
	}

	pub fn content(&self) -> String {
		self.lock().content.clone()
	}

	pub fn mode(&self) -> EditorMode {
		self.lock().mode.clone()
	}

	pub fn phase(&self) -> EditorPhase {
		self.lock().phase
	}

	pub fn is_open(&self) -> bool {
		self.phase() == EditorPhase::Open
	}

	pub fn is_closing(&self) -> bool {
		self.phase() == EditorPhase::Closing
	}

	/// Whether the draft differs from what it was seeded with.
	pub fn is_dirty(&self) -> bool {
		let session = self.lock();

		session.title != session.seed.title || session.content != session.seed.content
	}

	pub fn can_submit(&self) -> bool {
		let ready = {
			let session = self.lock();

			session.phase == EditorPhase::Open && session.has_content()
		};

		ready && !self.store.is_busy()
	}

	/// Hands the draft to the store as a create or an update, depending on the mode.
	///
	/// Returns `Ok(None)` without doing anything when the draft cannot be submitted. On success
	/// the draft is discarded and the session closes.
	pub async fn submit(&self) -> Result<Option<Note>> {
		if !self.can_submit() {
			return Ok(None);
		}

		let (generation, mode, payload) = {
			let session = self.lock();

			(
				session.generation,
				session.mode.clone(),
				NotePayload::new(session.title.clone(), session.content.clone()),
			)
		};
		let saved = match mode {
			EditorMode::Create => self.store.create(payload).await?,
			EditorMode::Edit(note) => self.store.update(&note.id, payload).await?,
		};
		let mut session = self.lock();

		if session.generation == generation {
			session.reset();
		}

		Ok(Some(saved))
	}

	/// Starts the close transition and calls `on_closed` once the close delay has elapsed.
	///
	/// Returns `false` and does nothing if the session is not open, which makes a repeated request
	/// while closing a no-op. Must be called from within a Tokio runtime.
	pub fn request_close<F>(&self, on_closed: F) -> bool
	where
		F: FnOnce() + Send + 'static,
	{
		let mut session = self.lock();

		if session.phase != EditorPhase::Open {
			return false;
		}

		session.phase = EditorPhase::Closing;

		let generation = session.generation;
		let weak = Arc::downgrade(&self.inner);

		session
			.close_timer
			.schedule(self.close_delay, move || finish_close(weak, generation, on_closed));

		true
	}

	fn lock(&self) -> MutexGuard<'_, Session> {
		lock_session(&self.inner)
	}
}

fn lock_session(inner: &Mutex<Session>) -> MutexGuard<'_, Session> {
	inner.lock().unwrap_or_else(|err| err.into_inner())
}

fn finish_close<F>(inner: Weak<Mutex<Session>>, generation: u64, on_closed: F)
where
	F: FnOnce(),
{
	let Some(inner) = inner.upgrade() else {
		return;
	};

	{
		let mut session = lock_session(&inner);

		if session.generation != generation || session.phase != EditorPhase::Closing {
			return;
		}

		session.reset();
	}

	on_closed();
}
