use crate::NotePayload;

pub const TITLE_MAX_CHARS: usize = 100;
pub const CONTENT_MAX_CHARS: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectCode {
	RejectEmptyTitle,
	RejectEmptyContent,
	RejectTitleTooLong,
	RejectContentTooLong,
}
impl RejectCode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::RejectEmptyTitle => "Title must not be blank.",
			Self::RejectEmptyContent => "Content must not be blank.",
			Self::RejectTitleTooLong => "Title must be at most 100 characters.",
			Self::RejectContentTooLong => "Content must be at most 1000 characters.",
		}
	}
}

impl std::fmt::Display for RejectCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::error::Error for RejectCode {}

/// Checks a title/content pair before it may leave the client.
///
/// Blankness is judged on the trimmed text while the length limits apply to the raw text, which is
/// what gets sent.
pub fn validate(payload: &NotePayload) -> Result<(), RejectCode> {
	if payload.title.trim().is_empty() {
		return Err(RejectCode::RejectEmptyTitle);
	}
	if payload.content.trim().is_empty() {
		return Err(RejectCode::RejectEmptyContent);
	}
	if payload.title.chars().count() > TITLE_MAX_CHARS {
		return Err(RejectCode::RejectTitleTooLong);
	}
	if payload.content.chars().count() > CONTENT_MAX_CHARS {
		return Err(RejectCode::RejectContentTooLong);
	}

	Ok(())
}
