use std::{
	env,
	io::{self, BufRead, Write},
	path::PathBuf,
	sync::Arc,
};

use clap::{
	Parser, Subcommand,
	builder::{
		Styles,
		styling::{AnsiColor, Effects},
	},
};
use color_eyre::eyre;
use time::UtcOffset;
use tracing_subscriber::EnvFilter;

use notes_client::{
	CredentialProvider, HttpClient, MemoryCredentials, RegisterRequest, SignInRequest,
};
use notes_domain::{Note, NoteId, timestamp};
use notes_store::{
	Confirm, DeleteOutcome, EditorSession, NoteStore, Notice, NoticeKind, StoreSettings,
};

pub const TOKEN_ENV: &str = "NOTES_TOKEN";

#[derive(Debug, Parser)]
#[command(version, rename_all = "kebab", styles = styles())]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// List notes, optionally filtered by a search term.
	List {
		#[arg(long, short = 's')]
		search: Option<String>,
	},
	/// Create a note.
	Add {
		#[arg(long, short = 't')]
		title: String,
		#[arg(long, short = 'b')]
		content: String,
	},
	/// Edit a note. Fields that are not given keep their current value.
	Edit {
		id: String,
		#[arg(long, short = 't')]
		title: Option<String>,
		#[arg(long, short = 'b')]
		content: Option<String>,
	},
	/// Delete a note after confirmation.
	Delete {
		id: String,
		/// Skip the confirmation prompt.
		#[arg(long, short = 'y')]
		yes: bool,
	},
	/// Sign in and print the access token.
	Login {
		#[arg(long)]
		email: String,
		#[arg(long)]
		password: String,
	},
	/// Create an account.
	Register {
		#[arg(long)]
		name: String,
		#[arg(long)]
		email: String,
		#[arg(long)]
		password: String,
	},
}

/// Asks on the terminal.
struct PromptConfirm;
impl Confirm for PromptConfirm {
	fn confirm(&self, prompt: &str) -> bool {
		ask(prompt, io::stdin().lock(), io::stderr())
	}
}

/// Writes `prompt` to `output` and reads a yes/no answer from `input`. Anything other than `y` or
/// `yes` counts as no.
pub fn ask<R, W>(prompt: &str, mut input: R, mut output: W) -> bool
where
	R: BufRead,
	W: Write,
{
	if let Err(err) = write!(output, "{prompt} [y/N] ").and_then(|()| output.flush()) {
		tracing::debug!(error = %err, "Failed to show confirmation prompt.");
	}

	let mut answer = String::new();

	if let Err(err) = input.read_line(&mut answer) {
		tracing::warn!(error = %err, "Failed to read confirmation answer.");

		return false;
	}

	matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

struct AssumeYes;
impl Confirm for AssumeYes {
	fn confirm(&self, _prompt: &str) -> bool {
		true
	}
}

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Red.on_default() | Effects::BOLD)
		.usage(AnsiColor::Red.on_default() | Effects::BOLD)
		.literal(AnsiColor::Blue.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

pub async fn run(args: Args, offset: UtcOffset) -> color_eyre::Result<()> {
	let config = notes_config::load(&args.config)?;

	init_tracing(&config);

	let token = env::var(TOKEN_ENV)
		.ok()
		.filter(|token| !token.trim().is_empty())
		.or_else(|| config.api.token.clone());
	let credentials: Arc<dyn CredentialProvider> = Arc::new(MemoryCredentials::new(token));
	let client = Arc::new(HttpClient::new(&config.api, credentials)?);
	let store = NoteStore::new(client.clone(), StoreSettings::from_config(&config));

	match args.command {
		Command::List { search } => {
			let result = store.refresh().await;

			report(&store);
			result?;

			let notes = store.notes();
			let visible = notes_domain::filter_notes(&notes, search.as_deref().unwrap_or_default());

			if visible.is_empty() {
				println!("{}", if search.is_some() { "No notes found." } else { "No notes yet." });
			}

			for note in visible {
				println!("{}", render_note(note, offset)?);
			}
		},
		Command::Add { title, content } => {
			let editor = EditorSession::new(store.clone());

			editor.open(None);
			editor.set_title(title);
			editor.set_content(content);
			submit(&store, &editor, offset).await?;
		},
		Command::Edit { id, title, content } => {
			let result = store.refresh().await;

			report(&store);
			result?;

			let id = NoteId::new(id);
			let note = store.note(&id).ok_or_else(|| eyre::eyre!("Note {id} does not exist."))?;
			let editor = EditorSession::new(store.clone());

			editor.open(Some(&note));

			if let Some(title) = title {
				editor.set_title(title);
			}
			if let Some(content) = content {
				editor.set_content(content);
			}
			if !editor.is_dirty() {
				tracing::info!(note_id = %id, "Saving unchanged note.");
			}

			submit(&store, &editor, offset).await?;
		},
		Command::Delete { id, yes } => {
			let gate: &dyn Confirm = if yes { &AssumeYes } else { &PromptConfirm };
			let result = store.delete(&NoteId::new(id), gate).await;

			report(&store);

			if result? == DeleteOutcome::Cancelled {
				println!("Deletion cancelled.");
			}
		},
		Command::Login { email, password } => {
			let token = client.sign_in(&SignInRequest { user_email: email, password }).await?;

			println!("export {TOKEN_ENV}={}", token.access_token);
		},
		Command::Register { name, email, password } => {
			let user = client
				.register(&RegisterRequest { user_name: name, user_email: email, password })
				.await?;

			println!("Registered {} ({}).", user.user_name, user.user_id);
		},
	}

	Ok(())
}

pub fn render_note(note: &Note, offset: UtcOffset) -> color_eyre::Result<String> {
	let updated = timestamp::display(&note.updated_at, offset)?;

	Ok(format!("{}  {}\n    {}\n    updated {updated}", note.id, note.title, note.content))
}

pub fn render_notice(notice: &Notice) -> String {
	let label = match notice.kind {
		NoticeKind::Success => "ok",
		NoticeKind::Error => "error",
	};

	if notice.offers_sign_in() {
		format!("[{label}] {} Run `notes-cli login` to sign in.", notice.text)
	} else {
		format!("[{label}] {}", notice.text)
	}
}

async fn submit(
	store: &NoteStore,
	editor: &EditorSession,
	offset: UtcOffset,
) -> color_eyre::Result<()> {
	if !editor.can_submit() {
		return Err(eyre::eyre!("Title and content must not be blank."));
	}

	let result = editor.submit().await;

	report(store);

	if let Some(note) = result? {
		println!("{}", render_note(&note, offset)?);
	}

	Ok(())
}

fn report(store: &NoteStore) {
	if let Some(notice) = store.notice() {
		eprintln!("{}", render_notice(&notice));
	}
}

fn init_tracing(config: &notes_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}
