//! Shared output layer for human/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: labeled text for humans, stable JSON for scripts and bots
//! wrapping the binary.

use passgate_core::{EngineError, Request};
use serde::Serialize;
use std::io::{self, Write};

/// The two output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Render a value in the requested mode. The closure produces the human
/// rendering; JSON mode serializes the value as-is.
pub fn render<T, F>(mode: OutputMode, value: &T, human: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T, &mut dyn Write) -> io::Result<()>,
{
    let stdout = io::stdout();
    let mut w = stdout.lock();
    if mode.is_json() {
        serde_json::to_writer(&mut w, value)?;
        writeln!(w)?;
    } else {
        human(value, &mut w)?;
    }
    Ok(())
}

/// A user-facing command failure: message plus machine code plus hint.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub ok: bool,
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl CliError {
    pub fn new(error: impl Into<String>, code: &'static str) -> Self {
        Self {
            ok: false,
            error: error.into(),
            code,
            hint: None,
        }
    }
}

impl From<&EngineError> for CliError {
    fn from(err: &EngineError) -> Self {
        Self {
            ok: false,
            error: err.to_string(),
            code: err.code(),
            hint: err.hint(),
        }
    }
}

/// Render a failure: JSON object on stdout for scripts, message + hint on
/// stderr for humans.
pub fn render_error(mode: OutputMode, err: &CliError) -> anyhow::Result<()> {
    if mode.is_json() {
        let stdout = io::stdout();
        let mut w = stdout.lock();
        serde_json::to_writer(&mut w, err)?;
        writeln!(w)?;
    } else {
        eprintln!("error[{}]: {}", err.code, err.error);
        if let Some(hint) = err.hint {
            eprintln!("  hint: {hint}");
        }
    }
    Ok(())
}

/// Human rendering of one request, edited fields marked.
///
/// Free-form requests render as their purpose text only; structured
/// requests list every populated template field.
pub fn write_request(w: &mut dyn Write, request: &Request) -> io::Result<()> {
    writeln!(
        w,
        "request #{} [{}]{}",
        request.id,
        request.status,
        request
            .operator_id
            .map(|op| format!(" operator {op}"))
            .unwrap_or_default()
    )?;
    if request.is_free_form() {
        writeln!(w, "  {}", request.purpose)?;
    } else {
        let fields: [(&str, Option<&str>); 11] = [
            ("division", request.division.as_deref()),
            ("direction", request.direction.as_deref()),
            ("checkpoint", request.checkpoint.as_deref()),
            ("date_start", request.date_start.as_deref()),
            ("date_end", request.date_end.as_deref()),
            ("time_start", request.time_start.as_deref()),
            ("time_end", request.time_end.as_deref()),
            ("car_brand", request.car_brand.as_deref()),
            ("leader_name", request.leader_name.as_deref()),
            ("cargo", request.cargo.as_deref()),
            ("purpose", Some(request.purpose.as_str())),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                write_field_line(w, request, name, value)?;
            }
        }
        if let Some(count) = request.people_count {
            write_field_line(w, request, "people_count", &count.to_string())?;
        }
    }
    if let Some(reason) = &request.reason {
        writeln!(w, "  reason: {reason}")?;
    }
    Ok(())
}

fn write_field_line(
    w: &mut dyn Write,
    request: &Request,
    name: &str,
    value: &str,
) -> io::Result<()> {
    let marker = if request.edited_fields.contains(name) {
        "  (edited)"
    } else {
        ""
    };
    writeln!(w, "  {name:<13} {value}{marker}")
}

#[cfg(test)]
mod tests {
    use super::{CliError, write_request};
    use passgate_core::{ActorId, EditedFields, EngineError, Request, RequestId, Status};

    fn structured_request() -> Request {
        let mut edited = EditedFields::new();
        edited.merge("checkpoint");
        Request {
            id: RequestId(7),
            user_id: ActorId(42),
            operator_id: Some(ActorId(9)),
            division: Some("2nd battalion".to_string()),
            direction: None,
            checkpoint: Some("south gate".to_string()),
            date_start: Some("2024-05-10".to_string()),
            date_end: None,
            time_start: None,
            time_end: None,
            car_brand: None,
            people_count: Some(4),
            leader_name: None,
            cargo: None,
            purpose: "resupply".to_string(),
            status: Status::InProgress,
            edited_fields: edited,
            reason: None,
            version: 3,
        }
    }

    #[test]
    fn request_rendering_marks_edited_fields() {
        let mut out = Vec::new();
        write_request(&mut out, &structured_request()).expect("render");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("request #7 [in_progress] operator 9"));
        assert!(text.contains("south gate  (edited)"));
        assert!(text.contains("people_count"));
        assert!(!text.contains("division  (edited)"));
    }

    #[test]
    fn free_form_renders_purpose_only() {
        let mut request = structured_request();
        request.division = None;
        request.checkpoint = None;
        request.date_start = None;
        request.people_count = None;
        request.edited_fields = EditedFields::new();
        let mut out = Vec::new();
        write_request(&mut out, &request).expect("render");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("resupply"));
        assert!(!text.contains("checkpoint"));
    }

    #[test]
    fn cli_error_carries_engine_code_and_hint() {
        let engine_err = EngineError::Conflict(RequestId(5));
        let cli: CliError = (&engine_err).into();
        assert_eq!(cli.code, "E3001");
        assert!(cli.hint.is_some());
        assert!(!cli.ok);
    }
}
