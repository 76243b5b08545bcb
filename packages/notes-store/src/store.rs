use std::{
	collections::HashSet,
	sync::{Arc, Mutex, MutexGuard, Weak},
};

use tokio::sync::watch;

use crate::{Error, ErrorKind, Notice, Operation, Result, StoreSettings, Timer};
use notes_client::NotesApi;
use notes_domain::{Note, NoteId, NotePayload};

pub const DELETE_PROMPT: &str =
	"Are you sure you want to delete this note? This action cannot be undone.";

/// Explicit yes/no gate in front of irreversible operations.
pub trait Confirm {
	fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
	F: Fn(&str) -> bool,
{
	fn confirm(&self, prompt: &str) -> bool {
		self(prompt)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
	Deleted,
	/// The confirmation gate said no; nothing was sent.
	Cancelled,
}

/// Everything the presentation layer renders, captured at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
	pub notes: Vec<Note>,
	pub busy: bool,
	pub background_refresh: bool,
	pub error: Option<ErrorKind>,
	pub notice: Option<Notice>,
}

/// The authoritative local copy of the user's notes.
///
/// Local state only changes after the matching network call has settled. The store does not
/// block concurrent calls itself; `busy` is what a UI uses to keep a second submit from firing.
#[derive(Clone)]
pub struct NoteStore {
	inner: Arc<Inner>,
}

struct Inner {
	api: Arc<dyn NotesApi>,
	settings: StoreSettings,
	state: Mutex<State>,
	changes: watch::Sender<u64>,
}

#[derive(Default)]
struct State {
	notes: Vec<Note>,
	in_flight: usize,
	background_in_flight: usize,
	initial_load_settled: bool,
	error: Option<ErrorKind>,
	notice: Option<Notice>,
	notice_seq: u64,
	notice_timer: Timer,
	// Sequence numbers of list requests: last issued and last whose response was applied.
	fetch_issued: u64,
	fetch_applied: u64,
	revision: u64,
}

/// Holds one unit of `busy` for as long as it lives.
struct BusyGuard {
	store: NoteStore,
	background: bool,
}

impl NoteStore {
	pub fn new(api: Arc<dyn NotesApi>, settings: StoreSettings) -> Self {
		let (changes, _) = watch::channel(0);

		Self {
			inner: Arc::new(Inner { api, settings, state: Mutex::new(State::default()), changes }),
		}
	}

	pub fn settings(&self) -> StoreSettings {
		self.inner.settings
	}

	/// Receives the store revision after every state change.
	pub fn subscribe(&self) -> watch::Receiver<u64> {
		self.inner.changes.subscribe()
	}

	pub fn snapshot(&self) -> StoreSnapshot {
		let state = self.lock();

		StoreSnapshot {
			notes: state.notes.clone(),
			busy: state.in_flight > 0,
			background_refresh: state.background_in_flight > 0,
			error: state.error,
			notice: state.notice.clone(),
		}
	}

	pub fn notes(&self) -> Vec<Note> {
		self.lock().notes.clone()
	}

	pub fn note(&self, id: &NoteId) -> Option<Note> {
		self.lock().notes.iter().find(|note| &note.id == id).cloned()
	}

	pub fn is_busy(&self) -> bool {
		self.lock().in_flight > 0
	}

	pub fn is_background_refresh(&self) -> bool {
		self.lock().background_in_flight > 0
	}

	pub fn error(&self) -> Option<ErrorKind> {
		self.lock().error
	}

	pub fn notice(&self) -> Option<Notice> {
		self.lock().notice.clone()
	}

	/// Clears the current notice before it expires.
	pub fn dismiss_notice(&self) {
		self.mutate(|state| {
			state.notice_timer.cancel();
			state.notice = None;
		});
	}

	/// Replaces the collection with the server's list.
	///
	/// Calls made after the initial load has settled raise the background-refresh flag. On failure
	/// the previous collection is kept and the error state is set.
	pub async fn refresh(&self) -> Result<()> {
		let background = self.lock().initial_load_settled;
		let _busy = self.begin(background);

		self.fetch().await
	}

	/// Validates and creates a note, appends the server's copy and re-syncs the collection.
	pub async fn create(&self, payload: NotePayload) -> Result<Note> {
		notes_domain::validate(&payload)?;

		let _busy = self.begin(false);

		match self.inner.api.create_note(&payload).await {
			Ok(note) => {
				tracing::info!(note_id = %note.id, "Note created.");

				self.mutate(|state| {
					if !state.notes.iter().any(|existing| existing.id == note.id) {
						state.notes.push(note.clone());
					}

					self.post_notice(state, Notice::success(Operation::Create));
				});
				self.resync().await;

				Ok(note)
			},
			Err(err) => Err(self.fail(Operation::Create, err)),
		}
	}

	/// Validates and updates an existing note, applies the server's copy and re-syncs the
	/// collection.
	pub async fn update(&self, id: &NoteId, payload: NotePayload) -> Result<Note> {
		notes_domain::validate(&payload)?;

		let _busy = self.begin(false);

		match self.inner.api.update_note(id, &payload).await {
			Ok(note) => {
				tracing::info!(note_id = %note.id, "Note updated.");

				self.mutate(|state| {
					if let Some(slot) = state.notes.iter_mut().find(|slot| slot.id == note.id) {
						*slot = note.clone();
					}

					self.post_notice(state, Notice::success(Operation::Update));
				});
				self.resync().await;

				Ok(note)
			},
			Err(err) => Err(self.fail(Operation::Update, err)),
		}
	}

	/// Deletes a note once `confirm` agrees, drops it locally and re-syncs the collection.
	pub async fn delete<C>(&self, id: &NoteId, confirm: &C) -> Result<DeleteOutcome>
	where
		C: Confirm + ?Sized,
	{
		if !confirm.confirm(DELETE_PROMPT) {
			tracing::debug!(note_id = %id, "Note deletion cancelled.");

			return Ok(DeleteOutcome::Cancelled);
		}

		let _busy = self.begin(false);

		match self.inner.api.delete_note(id).await {
			Ok(()) => {
				tracing::info!(note_id = %id, "Note deleted.");

				self.mutate(|state| {
					state.notes.retain(|note| &note.id != id);

					self.post_notice(state, Notice::success(Operation::Delete));
				});
				self.resync().await;

				Ok(DeleteOutcome::Deleted)
			},
			Err(err) => Err(self.fail(Operation::Delete, err)),
		}
	}

	fn lock(&self) -> MutexGuard<'_, State> {
		self.inner.state.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn mutate<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
		let mut state = self.lock();
		let out = f(&mut state);

		state.revision += 1;

		let revision = state.revision;

		drop(state);

		self.inner.changes.send_replace(revision);

		out
	}

	fn begin(&self, background: bool) -> BusyGuard {
		self.mutate(|state| {
			state.in_flight += 1;

			if background {
				state.background_in_flight += 1;
			}
		});

		BusyGuard { store: self.clone(), background }
	}

	// The refresh that follows a successful mutation reports its own failure through the error
	// state and notice, so the mutation's result stays `Ok`.
	async fn resync(&self) {
		if let Err(err) = self.fetch().await {
			tracing::warn!(error = %err, "Refresh after mutation failed.");
		}
	}

	async fn fetch(&self) -> Result<()> {
		let seq = self.mutate(|state| {
			state.fetch_issued += 1;

			state.fetch_issued
		});
		let result = self.inner.api.list_notes().await;

		self.mutate(|state| {
			if seq <= state.fetch_applied {
				tracing::debug!(seq, applied = state.fetch_applied, "Discarding stale note list.");

				return result.map(|_| ()).map_err(|err| Error::api(Operation::Refresh, err));
			}

			state.fetch_applied = seq;
			state.initial_load_settled = true;

			match result {
				Ok(notes) => {
					tracing::debug!(count = notes.len(), "Note list applied.");

					state.notes = dedup_by_id(notes);
					state.error = None;

					Ok(())
				},
				Err(err) => {
					let err = Error::api(Operation::Refresh, err);

					tracing::warn!(error = %err, "Note refresh failed.");

					state.error = Some(err.kind());

					self.post_notice(state, Notice::failure(Operation::Refresh, err.kind()));

					Err(err)
				},
			}
		})
	}

	fn fail(&self, operation: Operation, source: notes_client::Error) -> Error {
		let err = Error::api(operation, source);

		tracing::warn!(error = %err, %operation, "Note operation failed.");

		self.mutate(|state| self.post_notice(state, Notice::failure(operation, err.kind())));

		err
	}

	fn post_notice(&self, state: &mut State, notice: Notice) {
		state.notice_seq += 1;
		state.notice = Some(notice);

		let seq = state.notice_seq;
		let weak = Arc::downgrade(&self.inner);

		state
			.notice_timer
			.schedule(self.inner.settings.message_ttl, move || expire_notice(weak, seq));
	}
}

impl Drop for BusyGuard {
	fn drop(&mut self) {
		let background = self.background;

		self.store.mutate(|state| {
			state.in_flight = state.in_flight.saturating_sub(1);

			if background {
				state.background_in_flight = state.background_in_flight.saturating_sub(1);
			}
		});
	}
}

// Keeps the first occurrence of each id, in server order.
fn dedup_by_id(notes: Vec<Note>) -> Vec<Note> {
	let mut seen = HashSet::new();

	notes.into_iter().filter(|note| seen.insert(note.id.clone())).collect()
}

fn expire_notice(inner: Weak<Inner>, seq: u64) {
	let Some(inner) = inner.upgrade() else {
		return;
	};
	let store = NoteStore { inner };

	store.mutate(|state| {
		if state.notice_seq == seq {
			state.notice = None;
		}
	});
}
