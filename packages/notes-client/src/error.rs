use reqwest::StatusCode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Authentication required (HTTP {status}).")]
	Unauthorized { status: u16 },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Request rejected (HTTP {status}): {message}")]
	Rejected { status: u16, message: String },
	#[error("Server error (HTTP {status}): {message}")]
	Server { status: u16, message: String },
	#[error("Network error: {message}")]
	Network { message: String },
	#[error("Invalid URL: {message}")]
	InvalidUrl { message: String },
	#[error(transparent)]
	Decode(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
}
impl Error {
	/// Maps a non-success HTTP status to the matching variant. `message` is the server's detail
	/// text, possibly empty.
	pub fn from_status(status: StatusCode, message: String) -> Self {
		let code = status.as_u16();

		match status {
			StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized { status: code },
			StatusCode::NOT_FOUND => Self::NotFound { message },
			_ if status.is_server_error() => Self::Server { status: code, message },
			_ => Self::Rejected { status: code, message },
		}
	}
}

impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		Self::Network { message: err.to_string() }
	}
}
