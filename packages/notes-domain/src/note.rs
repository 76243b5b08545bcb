use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);
impl NoteId {
	pub fn new(raw: impl Into<String>) -> Self {
		Self(raw.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for NoteId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for NoteId {
	fn from(raw: &str) -> Self {
		Self::new(raw)
	}
}

impl From<String> for NoteId {
	fn from(raw: String) -> Self {
		Self(raw)
	}
}

/// A persisted note as the server reports it. Identifier and timestamps are server-assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
	#[serde(rename = "note_id")]
	pub id: NoteId,
	#[serde(rename = "note_title")]
	pub title: String,
	#[serde(rename = "note_content")]
	pub content: String,
	#[serde(default)]
	pub owner_id: String,
	#[serde(rename = "created_on", with = "crate::timestamp")]
	pub created_at: OffsetDateTime,
	#[serde(rename = "last_update", with = "crate::timestamp")]
	pub updated_at: OffsetDateTime,
}
impl Note {
	pub fn payload(&self) -> NotePayload {
		NotePayload::new(self.title.clone(), self.content.clone())
	}
}

/// Request body shared by create and update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePayload {
	#[serde(rename = "note_title")]
	pub title: String,
	#[serde(rename = "note_content")]
	pub content: String,
}
impl NotePayload {
	pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
		Self { title: title.into(), content: content.into() }
	}
}
