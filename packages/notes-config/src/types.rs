use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub api: Api,
	#[serde(default)]
	pub store: Store,
	#[serde(default)]
	pub editor: Editor,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
	/// Base URL including the `/api` prefix, e.g. "http://127.0.0.1:8000/api".
	pub base_url: String,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	/// Optional. A blank value is treated as absent.
	pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Store {
	/// How long a success or error message stays visible.
	pub message_ttl_ms: u64,
}
impl Default for Store {
	fn default() -> Self {
		Self { message_ttl_ms: 4_000 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Editor {
	/// Delay between a close request and the final dismissal.
	pub close_delay_ms: u64,
}
impl Default for Editor {
	fn default() -> Self {
		Self { close_delay_ms: 300 }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_timeout_ms() -> u64 {
	10_000
}
