use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ============ Input Table Models ============

/// One uploaded contact row, cells kept verbatim in original column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub fields: Vec<String>,
}

/// The parsed upload: a header row plus its contact rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactTable {
    pub headers: Vec<String>,
    pub rows: Vec<ContactRecord>,
}

/// Name components derived once per contact. Components missing from the
/// source name are `None`, never an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedName {
    pub first: Option<String>,
    pub middle: Option<String>,
    pub last: Option<String>,
}

/// The two address lines the remote service expects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedAddress {
    pub address_line1: String,
    pub address_line2: String,
}

// ============ Wire Models ============

/// Request body for the Contact/Enrich endpoint.
///
/// Absent name components are serialized as JSON null, matching what the
/// service accepts for partially parseable names.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichRequest {
    #[serde(rename = "FirstName")]
    pub first_name: Option<String>,
    #[serde(rename = "MiddleName")]
    pub middle_name: Option<String>,
    #[serde(rename = "LastName")]
    pub last_name: Option<String>,
    #[serde(rename = "Address")]
    pub address: RequestAddress,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestAddress {
    #[serde(rename = "addressLine1")]
    pub address_line1: String,
    #[serde(rename = "addressLine2")]
    pub address_line2: String,
}

/// Top-level response body from the Contact/Enrich endpoint.
///
/// Every level is optional: an unauthenticated or unmatched lookup comes back
/// without a `person`, and a matched one may still omit phones or emails.
/// Decoding once into this shape replaces per-field nested lookups.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnrichResponse {
    pub person: Option<PersonData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PersonData {
    pub age: Option<AgeValue>,
    pub phones: Vec<PhoneEntry>,
    pub emails: Vec<EmailEntry>,
}

/// The service reports age as a number or a string depending on the record.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AgeValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for AgeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeValue::Number(n) => write!(f, "{}", n),
            AgeValue::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PhoneEntry {
    pub number: Option<String>,
    #[serde(rename = "type")]
    pub phone_type: Option<String>,
    #[serde(rename = "lastReportedDate")]
    pub last_reported_date: Option<String>,
    #[serde(rename = "isConnected")]
    pub is_connected: bool,
}

impl PhoneEntry {
    /// Reported date parsed as month/day/year. Unparseable dates are `None`
    /// and sort earliest during selection.
    pub fn reported_date(&self) -> Option<NaiveDate> {
        self.last_reported_date
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%m/%d/%Y").ok())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmailEntry {
    pub email: Option<String>,
    #[serde(rename = "isValidated")]
    pub is_validated: bool,
}

impl PersonData {
    /// The connected phone with the latest reported date.
    ///
    /// Disconnected entries are excluded regardless of recency. Ties (and
    /// entries without a parseable date) resolve to the last one scanned.
    pub fn best_connected_phone(&self) -> Option<&PhoneEntry> {
        self.phones
            .iter()
            .filter(|phone| phone.is_connected)
            .max_by_key(|phone| phone.reported_date().unwrap_or(NaiveDate::MIN))
    }

    /// Validated emails joined with ", ", or `None` when no entry is
    /// validated. Never an empty string.
    pub fn validated_emails(&self) -> Option<String> {
        let joined = self
            .emails
            .iter()
            .filter(|entry| entry.is_validated)
            .filter_map(|entry| entry.email.as_deref())
            .collect::<Vec<_>>()
            .join(", ");

        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

// ============ Enrichment Output Models ============

/// What one remote lookup contributed to a row. All fields optional; a row
/// with no usable person data is all-`None` rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentResult {
    pub age: Option<String>,
    pub phone_number: Option<String>,
    pub phone_type: Option<String>,
    pub phone_last_reported_date: Option<String>,
    pub validated_emails: Option<String>,
}

impl EnrichmentResult {
    /// Extracts the enrichment fields from a decoded response.
    pub fn from_response(response: EnrichResponse) -> Self {
        let Some(person) = response.person else {
            return Self::no_match();
        };

        let (phone_number, phone_type, phone_last_reported_date) =
            match person.best_connected_phone() {
                Some(phone) => (
                    phone.number.clone(),
                    phone.phone_type.clone(),
                    phone.last_reported_date.clone(),
                ),
                None => (None, None, None),
            };

        Self {
            age: person.age.as_ref().map(|age| age.to_string()),
            phone_number,
            phone_type,
            phone_last_reported_date,
            validated_emails: person.validated_emails(),
        }
    }

    /// The all-absent result used for unmatched and failed rows.
    pub fn no_match() -> Self {
        Self::default()
    }

    pub fn has_phone(&self) -> bool {
        self.phone_number.is_some()
    }

    pub fn has_email(&self) -> bool {
        self.validated_emails.is_some()
    }

    /// Cells in the fixed appended-column order.
    pub fn into_cells(self) -> [Option<String>; 5] {
        [
            self.age,
            self.phone_number,
            self.phone_type,
            self.phone_last_reported_date,
            self.validated_emails,
        ]
    }
}

/// Enrichment columns appended to the uploaded table, in fixed order.
pub const ENRICHMENT_COLUMNS: [&str; 5] = [
    "age",
    "phoneNumber",
    "phoneType",
    "phoneLastReportedDate",
    "validatedEmails",
];

/// One output row: the original cells plus what enrichment found.
#[derive(Debug, Clone)]
pub struct EnrichedRecord {
    pub fields: Vec<String>,
    pub enrichment: EnrichmentResult,
}

impl EnrichedRecord {
    /// Full output row: original cells (always present) followed by the five
    /// enrichment cells, absent values as `None`.
    pub fn cells(&self) -> Vec<Option<String>> {
        let mut cells: Vec<Option<String>> =
            self.fields.iter().cloned().map(Some).collect();
        cells.extend(self.enrichment.clone().into_cells());
        cells
    }
}

/// The assembled batch output. Row count and order always match the input;
/// headers are the original columns plus [`ENRICHMENT_COLUMNS`].
#[derive(Debug, Clone)]
pub struct EnrichedTable {
    pub headers: Vec<String>,
    pub rows: Vec<EnrichedRecord>,
    /// Wall-clock time of the enrichment phase only, not pre-processing.
    pub enrich_elapsed: Duration,
    /// Rows whose remote call failed and were marked unmatched.
    pub failed_rows: usize,
}
