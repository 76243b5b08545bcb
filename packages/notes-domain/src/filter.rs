use crate::Note;

/// Case-insensitive substring match over title or content. A blank term keeps every note.
pub fn filter_notes<'a>(notes: &'a [Note], term: &str) -> Vec<&'a Note> {
	let needle = term.trim().to_lowercase();

	if needle.is_empty() {
		return notes.iter().collect();
	}

	notes
		.iter()
		.filter(|note| {
			note.title.to_lowercase().contains(&needle)
				|| note.content.to_lowercase().contains(&needle)
		})
		.collect()
}
