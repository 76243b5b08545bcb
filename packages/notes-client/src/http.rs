use std::{sync::Arc, time::Duration};

use reqwest::{Client, Response, Url, header::HeaderMap};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use time::OffsetDateTime;

use crate::{BoxFuture, CredentialProvider, Error, NotesApi, Result};
use notes_domain::{Note, NoteId, NotePayload};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignInRequest {
	pub user_email: String,
	pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
	pub user_name: String,
	pub user_email: String,
	pub password: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AccessToken {
	pub access_token: String,
	pub token_type: String,
}

impl std::fmt::Debug for AccessToken {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AccessToken")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.finish()
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
	pub user_id: String,
	pub user_name: String,
	pub user_email: String,
	#[serde(with = "notes_domain::timestamp")]
	pub created_on: OffsetDateTime,
	#[serde(with = "notes_domain::timestamp")]
	pub last_update: OffsetDateTime,
}

/// reqwest-backed gateway. The token is read from the injected provider on every request.
pub struct HttpClient {
	client: Client,
	base_url: Url,
	credentials: Arc<dyn CredentialProvider>,
}
impl HttpClient {
	pub fn new(cfg: &notes_config::Api, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
		let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
		let base_url = Url::parse(cfg.base_url.trim_end_matches('/'))
			.map_err(|err| Error::InvalidUrl { message: err.to_string() })?;

		Ok(Self { client, base_url, credentials })
	}

	pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
		&self.credentials
	}

	/// Exchanges email and password for an access token and hands it to the credential provider.
	pub async fn sign_in(&self, req: &SignInRequest) -> Result<AccessToken> {
		let res = self.client.post(self.url("/auth/login")).json(req).send().await?;
		let token: AccessToken = decode(res).await?;

		self.credentials.store(token.access_token.clone());

		tracing::info!(user_email = %req.user_email, "Signed in.");

		Ok(token)
	}

	pub async fn register(&self, req: &RegisterRequest) -> Result<User> {
		let res = self.client.post(self.url("/auth/register")).json(req).send().await?;

		decode(res).await
	}

	pub fn sign_out(&self) {
		self.credentials.clear();
	}

	fn url(&self, path: &str) -> String {
		format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
	}

	/// `{base}/notes/{id}` with the id percent-encoded as a single path segment.
	fn note_url(&self, id: &NoteId) -> Result<Url> {
		let mut url = self.base_url.clone();

		url.path_segments_mut()
			.map_err(|()| Error::InvalidUrl {
				message: format!("{} cannot be used as a base URL.", self.base_url),
			})?
			.pop_if_empty()
			.push("notes")
			.push(id.as_str());

		Ok(url)
	}

	fn headers(&self) -> Result<HeaderMap> {
		crate::auth_headers(self.credentials.token().as_deref())
	}
}

impl NotesApi for HttpClient {
	fn list_notes(&self) -> BoxFuture<'_, Result<Vec<Note>>> {
		Box::pin(async move {
			let res = self.client.get(self.url("/notes/")).headers(self.headers()?).send().await?;

			decode::<Vec<Note>>(res).await
		})
	}

	fn create_note<'a>(&'a self, payload: &'a NotePayload) -> BoxFuture<'a, Result<Note>> {
		Box::pin(async move {
			let res = self
				.client
				.post(self.url("/notes/"))
				.headers(self.headers()?)
				.json(payload)
				.send()
				.await?;

			decode::<Note>(res).await
		})
	}

	fn update_note<'a>(
		&'a self,
		id: &'a NoteId,
		payload: &'a NotePayload,
	) -> BoxFuture<'a, Result<Note>> {
		Box::pin(async move {
			let res = self
				.client
				.put(self.note_url(id)?)
				.headers(self.headers()?)
				.json(payload)
				.send()
				.await?;

			decode::<Note>(res).await
		})
	}

	fn delete_note<'a>(&'a self, id: &'a NoteId) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let res = self
				.client
				.delete(self.note_url(id)?)
				.headers(self.headers()?)
				.send()
				.await?;

			ensure_success(res).await?;

			Ok(())
		})
	}
}

async fn ensure_success(res: Response) -> Result<Response> {
	let status = res.status();

	if status.is_success() {
		return Ok(res);
	}

	let body = res.text().await.unwrap_or_default();
	let message = serde_json::from_str::<Value>(&body)
		.ok()
		.and_then(|json| json.get("detail").and_then(Value::as_str).map(str::to_string))
		.unwrap_or(body);

	tracing::warn!(%status, detail = %message, "Notes API request failed.");

	Err(Error::from_status(status, message))
}

async fn decode<T>(res: Response) -> Result<T>
where
	T: DeserializeOwned,
{
	let res = ensure_success(res).await?;
	let bytes = res.bytes().await?;

	Ok(serde_json::from_slice(&bytes)?)
}
