use std::sync::RwLock;

/// Source of the bearer token attached to outbound requests. The client never inspects the token.
pub trait CredentialProvider
where
	Self: Send + Sync,
{
	fn token(&self) -> Option<String>;

	fn store(&self, token: String);

	fn clear(&self);
}

#[derive(Debug, Default)]
pub struct MemoryCredentials {
	token: RwLock<Option<String>>,
}
impl MemoryCredentials {
	pub fn new(token: Option<String>) -> Self {
		Self { token: RwLock::new(token) }
	}
}

impl CredentialProvider for MemoryCredentials {
	fn token(&self) -> Option<String> {
		self.token.read().unwrap_or_else(|err| err.into_inner()).clone()
	}

	fn store(&self, token: String) {
		*self.token.write().unwrap_or_else(|err| err.into_inner()) = Some(token);
	}

	fn clear(&self) {
		*self.token.write().unwrap_or_else(|err| err.into_inner()) = None;
	}
}
