use crate::ErrorKind;

pub const SIGN_IN_TEXT: &str = "Please sign in first!";

/// The store operations that can post a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
	Refresh,
	Create,
	Update,
	Delete,
}
impl Operation {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Refresh => "refresh",
			Self::Create => "create",
			Self::Update => "update",
			Self::Delete => "delete",
		}
	}

	pub fn success_text(self) -> &'static str {
		match self {
			Self::Refresh => "Notes refreshed.",
			Self::Create => "Note added successfully!",
			Self::Update => "Note updated successfully!",
			Self::Delete => "Note deleted successfully!",
		}
	}

	pub fn failure_text(self, kind: ErrorKind) -> &'static str {
		if kind == ErrorKind::AuthRequired {
			return SIGN_IN_TEXT;
		}

		match self {
			Self::Refresh => "Could not load notes.",
			Self::Create => "Error adding note.",
			Self::Update => "Error updating note.",
			Self::Delete => "Error deleting note.",
		}
	}
}

impl std::fmt::Display for Operation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
	Success,
	Error,
}

/// Transient user-facing message. Expiry is owned by the store that posted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
	pub kind: NoticeKind,
	pub text: String,
	pub cause: Option<ErrorKind>,
}
impl Notice {
	pub fn success(operation: Operation) -> Self {
		Self { kind: NoticeKind::Success, text: operation.success_text().to_string(), cause: None }
	}

	pub fn failure(operation: Operation, kind: ErrorKind) -> Self {
		Self {
			kind: NoticeKind::Error,
			text: operation.failure_text(kind).to_string(),
			cause: Some(kind),
		}
	}

	pub fn is_error(&self) -> bool {
		self.kind == NoticeKind::Error
	}

	/// Whether the banner should offer a way to the sign-in screen.
	pub fn offers_sign_in(&self) -> bool {
		self.cause == Some(ErrorKind::AuthRequired)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn auth_failures_collapse_to_sign_in_text() {
		let operations =
			[Operation::Refresh, Operation::Create, Operation::Update, Operation::Delete];

		for operation in operations {
			let notice = Notice::failure(operation, ErrorKind::AuthRequired);

			assert_eq!(notice.text, SIGN_IN_TEXT);
			assert!(notice.offers_sign_in());
		}
	}

	#[test]
	fn other_failures_keep_operation_text() {
		let notice = Notice::failure(Operation::Update, ErrorKind::NotFound);

		assert_eq!(notice.text, "Error updating note.");
		assert!(notice.is_error());
		assert!(!notice.offers_sign_in());
	}
}
