use clap::Parser;
use time::UtcOffset;

fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	// The local offset can only be read while the process is single-threaded.
	let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
	let args = notes_cli::Args::parse();

	tokio::runtime::Builder::new_multi_thread()
		.enable_all()
		.build()?
		.block_on(notes_cli::run(args, offset))
}
