use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::ParseEnumError;
use super::actor::ActorId;
use crate::diff::EditedFields;

/// Store-assigned request identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct RequestId(pub i64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RequestId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// The seven lifecycle statuses.
///
/// `Cancelled` and `Completed` are terminal: the engine rejects every action
/// against them. "Operator attached" is not a separate status value; it is a
/// status plus a non-null operator assignment on the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    New,
    OnClarification,
    Cancelled,
    Completed,
    Edited,
    Duplicated,
    InProgress,
}

impl Status {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::OnClarification => "on_clarification",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::Edited => "edited",
            Self::Duplicated => "duplicated",
            Self::InProgress => "in_progress",
        }
    }

    /// Terminal statuses accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "on_clarification" => Ok(Self::OnClarification),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            "edited" => Ok(Self::Edited),
            "duplicated" => Ok(Self::Duplicated),
            "in_progress" => Ok(Self::InProgress),
            _ => Err(ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}

/// The fields a submitter may edit on an existing request.
///
/// Everything except `Purpose` is a template field and participates in the
/// free-form predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableField {
    Division,
    Direction,
    Checkpoint,
    DateStart,
    DateEnd,
    TimeStart,
    TimeEnd,
    CarBrand,
    PeopleCount,
    LeaderName,
    Cargo,
    Purpose,
}

impl EditableField {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Division => "division",
            Self::Direction => "direction",
            Self::Checkpoint => "checkpoint",
            Self::DateStart => "date_start",
            Self::DateEnd => "date_end",
            Self::TimeStart => "time_start",
            Self::TimeEnd => "time_end",
            Self::CarBrand => "car_brand",
            Self::PeopleCount => "people_count",
            Self::LeaderName => "leader_name",
            Self::Cargo => "cargo",
            Self::Purpose => "purpose",
        }
    }
}

impl fmt::Display for EditableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditableField {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "division" => Ok(Self::Division),
            "direction" => Ok(Self::Direction),
            "checkpoint" => Ok(Self::Checkpoint),
            "date_start" => Ok(Self::DateStart),
            "date_end" => Ok(Self::DateEnd),
            "time_start" => Ok(Self::TimeStart),
            "time_end" => Ok(Self::TimeEnd),
            "car_brand" => Ok(Self::CarBrand),
            "people_count" => Ok(Self::PeopleCount),
            "leader_name" => Ok(Self::LeaderName),
            "cargo" => Ok(Self::Cargo),
            "purpose" => Ok(Self::Purpose),
            _ => Err(ParseEnumError {
                expected: "field",
                got: s.to_string(),
            }),
        }
    }
}

/// Error applying an edit value to a typed field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value '{value}' for field {field}")]
pub struct FieldValueError {
    pub field: EditableField,
    pub value: String,
}

/// A checkpoint-crossing request: the central entity of the workflow.
///
/// `version` is the optimistic-concurrency token owned by the store; every
/// successful update bumps it, and a stale token surfaces as a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub user_id: ActorId,
    #[serde(default)]
    pub operator_id: Option<ActorId>,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub checkpoint: Option<String>,
    #[serde(default)]
    pub date_start: Option<String>,
    #[serde(default)]
    pub date_end: Option<String>,
    #[serde(default)]
    pub time_start: Option<String>,
    #[serde(default)]
    pub time_end: Option<String>,
    #[serde(default)]
    pub car_brand: Option<String>,
    #[serde(default)]
    pub people_count: Option<u32>,
    #[serde(default)]
    pub leader_name: Option<String>,
    #[serde(default)]
    pub cargo: Option<String>,
    pub purpose: String,
    pub status: Status,
    #[serde(default)]
    pub edited_fields: EditedFields,
    #[serde(default)]
    pub reason: Option<String>,
    pub version: u64,
}

fn blank(value: Option<&String>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

impl Request {
    /// Canonical free-form predicate: every template field empty or absent
    /// (a `people_count` of zero counts as absent) and a non-empty purpose.
    ///
    /// Derived, never stored. All rendering and branching goes through here.
    #[must_use]
    pub fn is_free_form(&self) -> bool {
        let template_empty = blank(self.division.as_ref())
            && blank(self.direction.as_ref())
            && blank(self.checkpoint.as_ref())
            && blank(self.date_start.as_ref())
            && blank(self.date_end.as_ref())
            && blank(self.time_start.as_ref())
            && blank(self.time_end.as_ref())
            && blank(self.car_brand.as_ref())
            && self.people_count.unwrap_or(0) == 0
            && blank(self.leader_name.as_ref())
            && blank(self.cargo.as_ref());
        template_empty && !self.purpose.trim().is_empty()
    }

    /// True when an operator currently owns this request.
    #[must_use]
    pub const fn has_operator(&self) -> bool {
        self.operator_id.is_some()
    }

    /// The assignment invariant: `operator_id` may be set only while the
    /// request sits in an operator-attached status, and `InProgress` always
    /// carries one.
    #[must_use]
    pub const fn operator_invariant_holds(&self) -> bool {
        match self.status {
            Status::InProgress => self.operator_id.is_some(),
            Status::Edited | Status::Duplicated => true,
            Status::New | Status::OnClarification | Status::Cancelled | Status::Completed => {
                self.operator_id.is_none()
            }
        }
    }

    /// Apply one edited value to the typed record. Empty values clear the
    /// field; `people_count` must parse as an unsigned integer.
    pub fn apply_edit(&mut self, field: EditableField, value: &str) -> Result<(), FieldValueError> {
        let trimmed = value.trim();
        let as_opt = || {
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };
        match field {
            EditableField::Division => self.division = as_opt(),
            EditableField::Direction => self.direction = as_opt(),
            EditableField::Checkpoint => self.checkpoint = as_opt(),
            EditableField::DateStart => self.date_start = as_opt(),
            EditableField::DateEnd => self.date_end = as_opt(),
            EditableField::TimeStart => self.time_start = as_opt(),
            EditableField::TimeEnd => self.time_end = as_opt(),
            EditableField::CarBrand => self.car_brand = as_opt(),
            EditableField::LeaderName => self.leader_name = as_opt(),
            EditableField::Cargo => self.cargo = as_opt(),
            EditableField::PeopleCount => {
                self.people_count = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.parse::<u32>().map_err(|_| FieldValueError {
                        field,
                        value: value.to_string(),
                    })?)
                };
            }
            EditableField::Purpose => self.purpose = trimmed.to_string(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ActorId, EditableField, Request, RequestId, Status};
    use crate::diff::EditedFields;
    use std::str::FromStr;

    fn base_request() -> Request {
        Request {
            id: RequestId(1),
            user_id: ActorId(42),
            operator_id: None,
            division: None,
            direction: None,
            checkpoint: None,
            date_start: None,
            date_end: None,
            time_start: None,
            time_end: None,
            car_brand: None,
            people_count: None,
            leader_name: None,
            cargo: None,
            purpose: "escort convoy through the north gate".to_string(),
            status: Status::New,
            edited_fields: EditedFields::default(),
            reason: None,
            version: 1,
        }
    }

    #[test]
    fn status_roundtrips_through_text() {
        for status in [
            Status::New,
            Status::OnClarification,
            Status::Cancelled,
            Status::Completed,
            Status::Edited,
            Status::Duplicated,
            Status::InProgress,
        ] {
            let rendered = status.to_string();
            assert_eq!(Status::from_str(&rendered).expect("reparse"), status);
        }
        assert!(Status::from_str("archived").is_err());
    }

    #[test]
    fn terminal_statuses() {
        assert!(Status::Cancelled.is_terminal());
        assert!(Status::Completed.is_terminal());
        assert!(!Status::New.is_terminal());
        assert!(!Status::Duplicated.is_terminal());
    }

    #[test]
    fn free_form_requires_empty_template_and_purpose() {
        let request = base_request();
        assert!(request.is_free_form());

        let mut structured = base_request();
        structured.checkpoint = Some("north gate".to_string());
        assert!(!structured.is_free_form());

        let mut no_purpose = base_request();
        no_purpose.purpose = "  ".to_string();
        assert!(!no_purpose.is_free_form());
    }

    #[test]
    fn zero_people_count_counts_as_empty() {
        let mut request = base_request();
        request.people_count = Some(0);
        assert!(request.is_free_form());

        request.people_count = Some(3);
        assert!(!request.is_free_form());
    }

    #[test]
    fn whitespace_only_template_field_counts_as_empty() {
        let mut request = base_request();
        request.division = Some("   ".to_string());
        assert!(request.is_free_form());
    }

    #[test]
    fn operator_invariant_by_status() {
        let mut request = base_request();
        assert!(request.operator_invariant_holds());

        request.status = Status::InProgress;
        assert!(!request.operator_invariant_holds());
        request.operator_id = Some(ActorId(7));
        assert!(request.operator_invariant_holds());

        request.status = Status::Completed;
        assert!(!request.operator_invariant_holds());
        request.operator_id = None;
        assert!(request.operator_invariant_holds());

        request.status = Status::Edited;
        assert!(request.operator_invariant_holds());
        request.operator_id = Some(ActorId(7));
        assert!(request.operator_invariant_holds());
    }

    #[test]
    fn apply_edit_sets_and_clears_fields() {
        let mut request = base_request();
        request
            .apply_edit(EditableField::CarBrand, " UAZ, KamAZ ")
            .expect("set");
        assert_eq!(request.car_brand.as_deref(), Some("UAZ, KamAZ"));

        request
            .apply_edit(EditableField::CarBrand, "")
            .expect("clear");
        assert!(request.car_brand.is_none());
    }

    #[test]
    fn apply_edit_parses_people_count() {
        let mut request = base_request();
        request
            .apply_edit(EditableField::PeopleCount, "12")
            .expect("numeric");
        assert_eq!(request.people_count, Some(12));

        let err = request
            .apply_edit(EditableField::PeopleCount, "a dozen")
            .expect_err("non-numeric must fail");
        assert_eq!(err.field, EditableField::PeopleCount);
    }

    #[test]
    fn editable_field_names_roundtrip() {
        for field in [
            EditableField::Division,
            EditableField::Direction,
            EditableField::Checkpoint,
            EditableField::DateStart,
            EditableField::DateEnd,
            EditableField::TimeStart,
            EditableField::TimeEnd,
            EditableField::CarBrand,
            EditableField::PeopleCount,
            EditableField::LeaderName,
            EditableField::Cargo,
            EditableField::Purpose,
        ] {
            let rendered = field.to_string();
            assert_eq!(EditableField::from_str(&rendered).expect("reparse"), field);
        }
        assert!(EditableField::from_str("priority").is_err());
    }
}
