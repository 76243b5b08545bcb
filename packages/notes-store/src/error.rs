use notes_domain::RejectCode;

use crate::Operation;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse failure classes surfaced to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// The server refused the credentials, or none were sent.
	AuthRequired,
	/// The target note no longer exists on the server.
	NotFound,
	/// The server rejected the request body.
	Rejected,
	/// The server could not be reached or did not answer in time.
	Network,
	/// Client-side validation blocked the request before any network call.
	ValidationRejected,
	Unknown,
}
impl From<&notes_client::Error> for ErrorKind {
	fn from(err: &notes_client::Error) -> Self {
		match err {
			notes_client::Error::Unauthorized { .. } => Self::AuthRequired,
			notes_client::Error::NotFound { .. } => Self::NotFound,
			notes_client::Error::Rejected { .. } => Self::Rejected,
			notes_client::Error::Network { .. } => Self::Network,
			notes_client::Error::Server { .. }
			| notes_client::Error::Decode(_)
			| notes_client::Error::InvalidUrl { .. }
			| notes_client::Error::InvalidHeaderValue(_) => Self::Unknown,
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid note: {0}")]
	Validation(#[from] RejectCode),
	#[error("{operation} failed: {source}")]
	Api {
		operation: Operation,
		kind: ErrorKind,
		#[source]
		source: notes_client::Error,
	},
}
impl Error {
	pub(crate) fn api(operation: Operation, source: notes_client::Error) -> Self {
		Self::Api { operation, kind: ErrorKind::from(&source), source }
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Validation(_) => ErrorKind::ValidationRejected,
			Self::Api { kind, .. } => *kind,
		}
	}
}
