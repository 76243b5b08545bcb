use std::{
	collections::{HashMap, VecDeque},
	sync::{Mutex, MutexGuard},
	time::Duration,
};

use time::{OffsetDateTime, macros::datetime};
use uuid::Uuid;

use notes_client::{BoxFuture, Error, NotesApi, Result};
use notes_domain::{Note, NoteId, NotePayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
	List,
	Create,
	Update,
	Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
	Unauthorized,
	NotFound,
	Network,
	Server,
}
impl Failure {
	fn into_error(self) -> Error {
		match self {
			Self::Unauthorized => Error::Unauthorized { status: 401 },
			Self::NotFound => Error::NotFound { message: "Note not found".to_string() },
			Self::Network => Error::Network { message: "connection refused".to_string() },
			Self::Server => Error::Server { status: 500, message: "boom".to_string() },
		}
	}
}

/// In-memory stand-in for the notes server.
///
/// Every response is computed when the call arrives; a queued delay only postpones its delivery,
/// which lets tests make an older response land after a newer one.
#[derive(Default)]
pub struct FakeNotesApi {
	state: Mutex<FakeState>,
}

#[derive(Default)]
struct FakeState {
	notes: Vec<Note>,
	calls: HashMap<Call, usize>,
	failures: HashMap<Call, VecDeque<Failure>>,
	delays: HashMap<Call, VecDeque<Duration>>,
	ticks: i64,
}
impl FakeState {
	fn now(&mut self) -> OffsetDateTime {
		self.ticks += 1;

		datetime!(2026-01-01 00:00 UTC) + time::Duration::seconds(self.ticks)
	}

	fn insert(&mut self, payload: &NotePayload) -> Note {
		let now = self.now();
		let note = Note {
			id: NoteId::new(Uuid::new_v4().to_string()),
			title: payload.title.clone(),
			content: payload.content.clone(),
			owner_id: "owner".to_string(),
			created_at: now,
			updated_at: now,
		};

		self.notes.push(note.clone());

		note
	}

	fn begin(&mut self, call: Call) -> (Option<Duration>, Option<Failure>) {
		*self.calls.entry(call).or_default() += 1;

		let delay = self.delays.get_mut(&call).and_then(VecDeque::pop_front);
		let failure = self.failures.get_mut(&call).and_then(VecDeque::pop_front);

		(delay, failure)
	}
}

impl FakeNotesApi {
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a note server-side without counting a call.
	pub fn seed(&self, title: &str, content: &str) -> Note {
		self.lock().insert(&NotePayload::new(title, content))
	}

	/// Appends `note` to the server list as is, even if its id is already present.
	pub fn push_raw(&self, note: Note) {
		self.lock().notes.push(note);
	}

	/// Removes a note server-side without counting a call, as if another client deleted it.
	pub fn remove(&self, id: &NoteId) {
		self.lock().notes.retain(|note| &note.id != id);
	}

	pub fn notes(&self) -> Vec<Note> {
		self.lock().notes.clone()
	}

	pub fn calls(&self, call: Call) -> usize {
		self.lock().calls.get(&call).copied().unwrap_or(0)
	}

	pub fn total_calls(&self) -> usize {
		self.lock().calls.values().sum()
	}

	pub fn fail_next(&self, call: Call, failure: Failure) {
		self.lock().failures.entry(call).or_default().push_back(failure);
	}

	pub fn delay_next(&self, call: Call, delay: Duration) {
		self.lock().delays.entry(call).or_default().push_back(delay);
	}

	fn lock(&self) -> MutexGuard<'_, FakeState> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn respond<T>(&self, call: Call, handle: impl FnOnce(&mut FakeState) -> Result<T>) -> Reply<T> {
		let mut state = self.lock();
		let (delay, failure) = state.begin(call);
		let result = match failure {
			Some(failure) => Err(failure.into_error()),
			None => handle(&mut state),
		};

		Reply { delay, result }
	}
}

struct Reply<T> {
	delay: Option<Duration>,
	result: Result<T>,
}
impl<T> Reply<T> {
	async fn deliver(self) -> Result<T> {
		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}

		self.result
	}
}

impl NotesApi for FakeNotesApi {
	fn list_notes(&self) -> BoxFuture<'_, Result<Vec<Note>>> {
		let reply = self.respond(Call::List, |state| Ok(state.notes.clone()));

		Box::pin(reply.deliver())
	}

	fn create_note<'a>(&'a self, payload: &'a NotePayload) -> BoxFuture<'a, Result<Note>> {
		let reply = self.respond(Call::Create, |state| Ok(state.insert(payload)));

		Box::pin(reply.deliver())
	}

	fn update_note<'a>(
		&'a self,
		id: &'a NoteId,
		payload: &'a NotePayload,
	) -> BoxFuture<'a, Result<Note>> {
		let reply = self.respond(Call::Update, |state| {
			let now = state.now();
			let note = state
				.notes
				.iter_mut()
				.find(|note| &note.id == id)
				.ok_or_else(|| Failure::NotFound.into_error())?;

			note.title = payload.title.clone();
			note.content = payload.content.clone();
			note.updated_at = now;

			Ok(note.clone())
		});

		Box::pin(reply.deliver())
	}

	fn delete_note<'a>(&'a self, id: &'a NoteId) -> BoxFuture<'a, Result<()>> {
		let reply = self.respond(Call::Delete, |state| {
			let before = state.notes.len();

			state.notes.retain(|note| &note.id != id);

			if state.notes.len() == before {
				return Err(Failure::NotFound.into_error());
			}

			Ok(())
		});

		Box::pin(reply.deliver())
	}
}
