use std::sync::{Arc, Mutex};

use axum::{
	Json, Router,
	extract::{Path, State},
	http::{HeaderMap, StatusCode, header::AUTHORIZATION},
	routing::{get, post, put},
};
use serde_json::{Value, json};
use time::macros::datetime;
use tokio::net::TcpListener;

use notes_client::{
	CredentialProvider, Error, HttpClient, MemoryCredentials, NotesApi, RegisterRequest,
	SignInRequest,
};
use notes_domain::{NoteId, NotePayload};

const TOKEN: &str = "secret";

type ApiReply = Result<Json<Value>, (StatusCode, Json<Value>)>;

#[derive(Clone, Default)]
struct MockServer {
	seen_auth: Arc<Mutex<Vec<Option<String>>>>,
	notes: Arc<Mutex<Vec<Value>>>,
}
impl MockServer {
	fn with_notes(notes: Vec<Value>) -> Self {
		Self { seen_auth: Default::default(), notes: Arc::new(Mutex::new(notes)) }
	}

	fn check(&self, headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
		let auth = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()).map(str::to_string);
		let authorized = auth.as_deref() == Some("Bearer secret");

		self.seen_auth.lock().expect("Lock poisoned.").push(auth);

		if authorized {
			Ok(())
		} else {
			Err((
				StatusCode::UNAUTHORIZED,
				Json(json!({ "detail": "Could not validate credentials" })),
			))
		}
	}

	fn seen_auth(&self) -> Vec<Option<String>> {
		self.seen_auth.lock().expect("Lock poisoned.").clone()
	}
}

fn note_json(id: &str, title: &str, content: &str) -> Value {
	json!({
		"note_id": id,
		"note_title": title,
		"note_content": content,
		"owner_id": "u1",
		"created_on": "2026-10-18T09:00:00.000001",
		"last_update": "2026-10-18T09:00:00.000001"
	})
}

fn not_found() -> (StatusCode, Json<Value>) {
	(StatusCode::NOT_FOUND, Json(json!({ "detail": "Note not found" })))
}

async fn list(State(server): State<MockServer>, headers: HeaderMap) -> ApiReply {
	server.check(&headers)?;

	Ok(Json(Value::Array(server.notes.lock().expect("Lock poisoned.").clone())))
}

async fn create(
	State(server): State<MockServer>,
	headers: HeaderMap,
	Json(body): Json<Value>,
) -> ApiReply {
	server.check(&headers)?;

	let mut notes = server.notes.lock().expect("Lock poisoned.");
	let note = note_json(
		&format!("n{}", notes.len() + 1),
		body["note_title"].as_str().unwrap_or_default(),
		body["note_content"].as_str().unwrap_or_default(),
	);

	notes.push(note.clone());

	Ok(Json(note))
}

async fn update(
	State(server): State<MockServer>,
	headers: HeaderMap,
	Path(id): Path<String>,
	Json(body): Json<Value>,
) -> ApiReply {
	server.check(&headers)?;

	let mut notes = server.notes.lock().expect("Lock poisoned.");
	let note = notes.iter_mut().find(|note| note["note_id"] == id.as_str()).ok_or_else(not_found)?;

	note["note_title"] = body["note_title"].clone();
	note["note_content"] = body["note_content"].clone();
	note["last_update"] = json!("2026-10-18T10:00:00");

	Ok(Json(note.clone()))
}

async fn delete(
	State(server): State<MockServer>,
	headers: HeaderMap,
	Path(id): Path<String>,
) -> ApiReply {
	server.check(&headers)?;

	let mut notes = server.notes.lock().expect("Lock poisoned.");
	let before = notes.len();

	notes.retain(|note| note["note_id"] != id.as_str());

	if notes.len() == before {
		return Err(not_found());
	}

	Ok(Json(json!({ "message": "Note deleted successfully" })))
}

async fn login(Json(body): Json<Value>) -> ApiReply {
	if body["password"] == "pw" {
		Ok(Json(json!({ "access_token": TOKEN, "token_type": "bearer" })))
	} else {
		Err((StatusCode::BAD_REQUEST, Json(json!({ "detail": "Invalid credentials" }))))
	}
}

async fn register(Json(body): Json<Value>) -> Json<Value> {
	Json(json!({
		"user_id": "u1",
		"user_name": body["user_name"],
		"user_email": body["user_email"],
		"created_on": "2026-10-18T09:00:00",
		"last_update": "2026-10-18T09:00:00"
	}))
}

fn router(server: MockServer) -> Router {
	Router::new()
		.route("/api/notes/", get(list).post(create))
		.route("/api/notes/{id}", put(update).delete(delete))
		.route("/api/auth/login", post(login))
		.route("/api/auth/register", post(register))
		.with_state(server)
}

async fn spawn(router: Router) -> String {
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind listener.");
	let addr = listener.local_addr().expect("Failed to read listener address.");

	tokio::spawn(async move {
		axum::serve(listener, router).await.expect("Mock server failed.");
	});

	format!("http://{addr}/api")
}

fn client(base_url: String, token: Option<&str>) -> (HttpClient, Arc<MemoryCredentials>) {
	let credentials = Arc::new(MemoryCredentials::new(token.map(str::to_string)));
	let cfg = notes_config::Api { base_url, timeout_ms: 5_000, token: None };
	let client = HttpClient::new(&cfg, credentials.clone()).expect("Failed to build client.");

	(client, credentials)
}

#[test]
fn builds_bearer_auth_header() {
	let headers = notes_client::auth_headers(Some("secret")).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn omits_auth_header_without_token() {
	let headers = notes_client::auth_headers(None).expect("Failed to build headers.");

	assert!(headers.get(AUTHORIZATION).is_none());
}

#[tokio::test]
async fn list_attaches_bearer_token_and_decodes_notes() {
	let server = MockServer::with_notes(vec![note_json("a", "Groceries", "Milk, eggs")]);
	let (client, _) = client(spawn(router(server.clone())).await, Some(TOKEN));
	let notes = client.list_notes().await.expect("Expected list to succeed.");

	assert_eq!(notes.len(), 1);
	assert_eq!(notes[0].id, NoteId::new("a"));
	assert_eq!(notes[0].created_at, datetime!(2026-10-18 09:00:00.000001 UTC));
	assert_eq!(server.seen_auth(), vec![Some("Bearer secret".to_string())]);
}

#[tokio::test]
async fn missing_token_is_sent_and_rejected_as_unauthorized() {
	let server = MockServer::default();
	let (client, _) = client(spawn(router(server.clone())).await, None);
	let err = client.list_notes().await.expect_err("Expected unauthorized error.");

	assert!(matches!(err, Error::Unauthorized { status: 401 }), "Unexpected error: {err}");
	assert_eq!(server.seen_auth(), vec![None]);
}

#[tokio::test]
async fn create_update_delete_round_trip() {
	let server = MockServer::default();
	let (client, _) = client(spawn(router(server.clone())).await, Some(TOKEN));
	let created = client
		.create_note(&NotePayload::new("Groceries", "Milk, eggs"))
		.await
		.expect("Expected create to succeed.");

	assert_eq!(created.title, "Groceries");

	let updated = client
		.update_note(&created.id, &NotePayload::new("Groceries", "Milk, eggs, bread"))
		.await
		.expect("Expected update to succeed.");

	assert_eq!(updated.id, created.id);
	assert_eq!(updated.content, "Milk, eggs, bread");
	assert!(updated.updated_at > updated.created_at);

	client.delete_note(&created.id).await.expect("Expected delete to succeed.");

	assert!(client.list_notes().await.expect("Expected list to succeed.").is_empty());
}

#[tokio::test]
async fn note_ids_are_sent_as_one_encoded_path_segment() {
	let id = "a/b?c#d";
	let server = MockServer::with_notes(vec![note_json(id, "Odd", "id")]);
	let (client, _) = client(spawn(router(server.clone())).await, Some(TOKEN));
	let updated = client
		.update_note(&NoteId::new(id), &NotePayload::new("Odd", "still here"))
		.await
		.expect("Expected update to reach the note.");

	assert_eq!(updated.id, NoteId::new(id));
	assert_eq!(updated.content, "still here");

	client.delete_note(&NoteId::new(id)).await.expect("Expected delete to reach the note.");

	assert!(server.notes.lock().expect("Lock poisoned.").is_empty());
}

#[tokio::test]
async fn update_of_unknown_note_is_not_found() {
	let server = MockServer::default();
	let (client, _) = client(spawn(router(server)).await, Some(TOKEN));
	let err = client
		.update_note(&NoteId::new("gone"), &NotePayload::new("T", "C"))
		.await
		.expect_err("Expected not found error.");

	match err {
		Error::NotFound { message } => assert_eq!(message, "Note not found"),
		other => panic!("Unexpected error: {other}"),
	}
}

#[tokio::test]
async fn server_failures_are_classified() {
	let router = Router::new().route(
		"/api/notes/",
		get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
	);
	let (client, _) = client(spawn(router).await, Some(TOKEN));
	let err = client.list_notes().await.expect_err("Expected server error.");

	assert!(matches!(err, Error::Server { status: 500, .. }), "Unexpected error: {err}");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind listener.");
	let addr = listener.local_addr().expect("Failed to read listener address.");

	drop(listener);

	let (client, _) = client(format!("http://{addr}/api"), Some(TOKEN));
	let err = client.list_notes().await.expect_err("Expected network error.");

	assert!(matches!(err, Error::Network { .. }), "Unexpected error: {err}");
}

#[tokio::test]
async fn sign_in_stores_token_and_sign_out_clears_it() {
	let server = MockServer::default();
	let (client, credentials) = client(spawn(router(server.clone())).await, None);
	let token = client
		.sign_in(&SignInRequest { user_email: "a@b.c".to_string(), password: "pw".to_string() })
		.await
		.expect("Expected sign in to succeed.");

	assert_eq!(token.token_type, "bearer");
	assert_eq!(credentials.token().as_deref(), Some(TOKEN));

	client.list_notes().await.expect("Expected list to succeed after sign in.");
	client.sign_out();

	assert!(credentials.token().is_none());
	assert!(matches!(client.list_notes().await, Err(Error::Unauthorized { .. })));
}

#[tokio::test]
async fn sign_in_with_bad_password_keeps_credentials_empty() {
	let server = MockServer::default();
	let (client, credentials) = client(spawn(router(server)).await, None);
	let err = client
		.sign_in(&SignInRequest { user_email: "a@b.c".to_string(), password: "nope".to_string() })
		.await
		.expect_err("Expected sign in to fail.");

	assert!(matches!(err, Error::Rejected { status: 400, .. }), "Unexpected error: {err}");
	assert!(credentials.token().is_none());
}

#[tokio::test]
async fn register_decodes_user_record() {
	let server = MockServer::default();
	let (client, _) = client(spawn(router(server)).await, None);
	let user = client
		.register(&RegisterRequest {
			user_name: "Ada".to_string(),
			user_email: "ada@example.com".to_string(),
			password: "pw".to_string(),
		})
		.await
		.expect("Expected register to succeed.");

	assert_eq!(user.user_name, "Ada");
	assert_eq!(user.created_on, datetime!(2026-10-18 09:00 UTC));
}
