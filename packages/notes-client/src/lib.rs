pub mod credentials;
pub mod http;

mod error;

pub use credentials::{CredentialProvider, MemoryCredentials};
pub use error::{Error, Result};
pub use http::{AccessToken, HttpClient, RegisterRequest, SignInRequest, User};

use std::{future::Future, pin::Pin};

use reqwest::header::{AUTHORIZATION, HeaderMap};

use notes_domain::{Note, NoteId, NotePayload};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Note CRUD against the remote source of truth.
pub trait NotesApi
where
	Self: Send + Sync,
{
	fn list_notes(&self) -> BoxFuture<'_, Result<Vec<Note>>>;

	fn create_note<'a>(&'a self, payload: &'a NotePayload) -> BoxFuture<'a, Result<Note>>;

	fn update_note<'a>(
		&'a self,
		id: &'a NoteId,
		payload: &'a NotePayload,
	) -> BoxFuture<'a, Result<Note>>;

	fn delete_note<'a>(&'a self, id: &'a NoteId) -> BoxFuture<'a, Result<()>>;
}

/// Builds request headers. Without a token no `Authorization` header is sent and the server is
/// left to reject the request.
pub fn auth_headers(token: Option<&str>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if let Some(token) = token {
		headers.insert(AUTHORIZATION, format!("Bearer {token}").parse()?);
	}

	Ok(headers)
}
