//! Server timestamps arrive without an offset and are always UTC.

use serde::{Deserialize, Deserializer, Serializer};
use time::{
	OffsetDateTime, PrimitiveDateTime, UtcOffset,
	format_description::{BorrowedFormatItem, well_known::Rfc3339},
	macros::format_description,
};

const NAIVE_INPUT: &[BorrowedFormatItem<'_>] = format_description!(
	"[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);
const NAIVE_OUTPUT: &[BorrowedFormatItem<'_>] =
	format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]");
const DISPLAY: &[BorrowedFormatItem<'_>] = format_description!(
	"[day padding:none] [month repr:short] [year], [hour repr:12]:[minute] [period case:lower]"
);

/// Parses a server timestamp. Strings carrying an explicit offset are honoured; naive strings are
/// taken as UTC.
pub fn parse(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
	if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
		return Ok(value);
	}

	PrimitiveDateTime::parse(raw, NAIVE_INPUT).map(PrimitiveDateTime::assume_utc)
}

/// Renders a timestamp the way the server emits it: naive, UTC, microsecond precision.
pub fn format(value: &OffsetDateTime) -> Result<String, time::error::Format> {
	value.to_offset(UtcOffset::UTC).format(NAIVE_OUTPUT)
}

/// Human-facing rendering in the viewer's offset, e.g. `18 Oct 2026, 09:38 am`.
pub fn display(value: &OffsetDateTime, offset: UtcOffset) -> Result<String, time::error::Format> {
	value.to_offset(offset).format(DISPLAY)
}

pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	let formatted = format(value).map_err(serde::ser::Error::custom)?;

	serializer.serialize_str(&formatted)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;

	parse(&raw).map_err(serde::de::Error::custom)
}
