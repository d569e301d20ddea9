//! Write-off ("baixa") record types and creation rules.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use baixas_core::{AppError, AppResult, NonEmptyString};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Naive timestamp layouts accepted for `data_acontecimento` besides RFC 3339.
const NAIVE_EVENT_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Serial identifier of a write-off record inside one company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

impl RecordId {
    /// Creates a record identifier. Serial ids start at 1.
    pub fn new(value: u64) -> AppResult<Self> {
        if value == 0 {
            return Err(AppError::Validation(
                "record id must be greater than zero".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl FromStr for RecordId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parsed = value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid record id '{value}': {error}"))
        })?;
        Self::new(parsed)
    }
}

impl Display for RecordId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Caller supplied moment of the write-off.
///
/// The submitted text is kept verbatim; the parsed wall-clock value drives
/// period filters and ordering. Offsets in RFC 3339 input are not normalized,
/// the event date is the date the caller wrote down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTime {
    raw: String,
    wall_clock: NaiveDateTime,
}

impl EventTime {
    /// Parses an RFC 3339 timestamp, a naive ISO-8601 date-time or a bare date.
    pub fn parse(value: impl Into<String>) -> AppResult<Self> {
        let raw = value.into();
        let trimmed = raw.trim();

        let wall_clock = DateTime::parse_from_rfc3339(trimmed)
            .map(|timestamp| timestamp.naive_local())
            .ok()
            .or_else(|| {
                NAIVE_EVENT_TIME_FORMATS
                    .iter()
                    .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            })
            .or_else(|| {
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "field 'data_acontecimento' must be an ISO-8601 timestamp, got '{trimmed}'"
                ))
            })?;

        Ok(Self { raw, wall_clock })
    }

    /// Returns the timestamp exactly as submitted.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    /// Returns the parsed wall-clock value.
    #[must_use]
    pub fn wall_clock(&self) -> NaiveDateTime {
        self.wall_clock
    }

    /// Returns the calendar date of the event.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.wall_clock.date()
    }
}

/// Unvalidated write-off fields as received from a caller or read back from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOffRecordInput {
    /// Product identifier (`id_produto`).
    pub product_id: Option<String>,
    /// Product display name (`nome_produto`).
    pub product_name: Option<String>,
    /// Product code (`codigo_produto`).
    pub product_code: Option<String>,
    /// Moment of the write-off (`data_acontecimento`).
    pub event_time: Option<String>,
    /// Record classification (`tipo_registro`).
    pub record_type: Option<String>,
}

/// Validated write-off waiting for a serial id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWriteOffRecord {
    product_id: NonEmptyString,
    product_name: NonEmptyString,
    product_code: NonEmptyString,
    event_time: EventTime,
    record_type: NonEmptyString,
}

impl NewWriteOffRecord {
    /// Validates caller input.
    ///
    /// Fields are checked in a fixed order and the first missing one is
    /// reported: `tipo_registro`, `id_produto`, `nome_produto`,
    /// `codigo_produto`, `data_acontecimento`.
    pub fn new(input: WriteOffRecordInput) -> AppResult<Self> {
        let record_type = required_field("tipo_registro", input.record_type)?;
        let product_id = required_field("id_produto", input.product_id)?;
        let product_name = required_field("nome_produto", input.product_name)?;
        let product_code = required_field("codigo_produto", input.product_code)?;
        let event_time = required_field("data_acontecimento", input.event_time)?;

        Ok(Self {
            product_id,
            product_name,
            product_code,
            event_time: EventTime::parse(String::from(event_time))?,
            record_type,
        })
    }

    /// Attaches the serial id minted by the store.
    #[must_use]
    pub fn with_id(self, id: RecordId) -> WriteOffRecord {
        WriteOffRecord {
            id,
            product_id: self.product_id,
            product_name: self.product_name,
            product_code: self.product_code,
            event_time: self.event_time,
            record_type: self.record_type,
        }
    }
}

/// Persisted write-off event of one company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOffRecord {
    id: RecordId,
    product_id: NonEmptyString,
    product_name: NonEmptyString,
    product_code: NonEmptyString,
    event_time: EventTime,
    record_type: NonEmptyString,
}

impl WriteOffRecord {
    /// Returns the serial id.
    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the product identifier.
    #[must_use]
    pub fn product_id(&self) -> &NonEmptyString {
        &self.product_id
    }

    /// Returns the product name.
    #[must_use]
    pub fn product_name(&self) -> &NonEmptyString {
        &self.product_name
    }

    /// Returns the product code.
    #[must_use]
    pub fn product_code(&self) -> &NonEmptyString {
        &self.product_code
    }

    /// Returns the event timestamp.
    #[must_use]
    pub fn event_time(&self) -> &EventTime {
        &self.event_time
    }

    /// Returns the record type.
    #[must_use]
    pub fn record_type(&self) -> &NonEmptyString {
        &self.record_type
    }
}

fn required_field(name: &str, value: Option<String>) -> AppResult<NonEmptyString> {
    value
        .filter(|value| !value.trim().is_empty())
        .map(NonEmptyString::new)
        .transpose()?
        .ok_or_else(|| AppError::Validation(format!("field '{name}' is required")))
}
