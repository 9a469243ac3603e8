//! Hands a completed business record to a submission collaborator.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::SubmissionTarget;
use crate::domain::Business;
use crate::errors::FormError;
use crate::form::BusinessForm;
use crate::utils::persistence::write_json_atomic;

/// Receives validated business records.
pub trait SubmissionSink {
    fn submit(&mut self, business: &Business) -> Result<(), FormError>;
}

impl<S: SubmissionSink + ?Sized> SubmissionSink for Box<S> {
    fn submit(&mut self, business: &Business) -> Result<(), FormError> {
        (**self).submit(business)
    }
}

/// Writes the payload to the log.
#[derive(Debug, Default)]
pub struct TracingSink;

impl SubmissionSink for TracingSink {
    fn submit(&mut self, business: &Business) -> Result<(), FormError> {
        let payload = serde_json::to_string(business)?;
        info!(%payload, "Business Info");
        Ok(())
    }
}

/// Writes the payload as pretty JSON followed by a newline.
pub struct JsonWriterSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SubmissionSink for JsonWriterSink<W> {
    fn submit(&mut self, business: &Business) -> Result<(), FormError> {
        serde_json::to_writer_pretty(&mut self.writer, business)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Rewrites the file at `path` on every submit, so it always holds the
/// latest payload. Nothing is touched until the first submit.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SubmissionSink for JsonFileSink {
    fn submit(&mut self, business: &Business) -> Result<(), FormError> {
        write_json_atomic(business, &self.path)?;
        info!(path = %self.path.display(), "submission written");
        Ok(())
    }
}

/// Builds the sink selected in configuration.
pub fn sink_for(target: &SubmissionTarget) -> Result<Box<dyn SubmissionSink + Send>, FormError> {
    Ok(match target {
        SubmissionTarget::Log => Box::new(TracingSink),
        SubmissionTarget::Stdout => Box::new(JsonWriterSink::new(io::stdout())),
        SubmissionTarget::File { path } => Box::new(JsonFileSink::new(path.clone())),
    })
}

/// Validates required fields, then forwards the snapshot to the sink.
pub struct SubmitHandler<S: SubmissionSink> {
    sink: S,
    submitted: usize,
}

impl<S: SubmissionSink> SubmitHandler<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, submitted: 0 }
    }

    pub fn submit(&mut self, form: &BusinessForm) -> Result<Arc<Business>, FormError> {
        let business = form.snapshot();
        let missing = business.missing_fields();
        if !missing.is_empty() {
            warn!(missing = ?missing, "submission blocked by required fields");
            return Err(FormError::Incomplete(missing));
        }
        self.sink.submit(&business)?;
        self.submitted += 1;
        info!(
            name = %business.name,
            branches = business.branches.len(),
            categories = business.categories.len(),
            "business submitted"
        );
        Ok(business)
    }

    pub fn submitted(&self) -> usize {
        self.submitted
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContactKind;
    use crate::form::{BranchField, BusinessField, ContactUpdate};
    use serde_json::json;

    #[derive(Default)]
    struct RecordingSink {
        received: Vec<Business>,
    }

    impl SubmissionSink for RecordingSink {
        fn submit(&mut self, business: &Business) -> Result<(), FormError> {
            self.received.push(business.clone());
            Ok(())
        }
    }

    fn acme_form() -> BusinessForm {
        let mut form = BusinessForm::new();
        form.set_field(BusinessField::Name, "Acme");
        form.set_field(BusinessField::Description, "desc");
        let branch = form.add_branch();
        form.update_branch(branch, BranchField::Name, "Main").unwrap();
        form.update_branch(branch, BranchField::Address, "1 High St")
            .unwrap();
        form
    }

    #[test]
    fn submit_hands_exact_payload_to_sink() {
        let mut handler = SubmitHandler::new(JsonWriterSink::new(Vec::new()));
        let submitted = handler.submit(&acme_form()).unwrap();
        assert_eq!(submitted.name, "Acme");
        assert_eq!(handler.submitted(), 1);

        let written = String::from_utf8(handler.sink.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Acme",
                "description": "desc",
                "categories": [],
                "branches": [{
                    "name": "Main",
                    "address": "1 High St",
                    "contacts": [],
                    "socialLinks": []
                }]
            })
        );
        assert!(written.ends_with('\n'));
    }

    #[test]
    fn incomplete_forms_never_reach_the_sink() {
        let mut form = acme_form();
        let branch = form.branch_id(0).unwrap();
        let contact = form.add_contact(branch).unwrap();
        form.update_contact(branch, contact, ContactUpdate::Kind(ContactKind::Fax))
            .unwrap();

        let mut handler = SubmitHandler::new(RecordingSink::default());
        match handler.submit(&form) {
            Err(FormError::Incomplete(missing)) => {
                assert_eq!(missing, vec!["branches[1].contacts[1].info"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(handler.sink().received.is_empty());
        assert_eq!(handler.submitted(), 0);
    }

    #[test]
    fn boxed_sinks_forward() {
        let mut handler: SubmitHandler<Box<dyn SubmissionSink + Send>> =
            SubmitHandler::new(Box::new(TracingSink));
        assert!(handler.submit(&acme_form()).is_ok());
    }

    #[test]
    fn file_target_holds_latest_submission() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("submission.json");
        let sink = sink_for(&SubmissionTarget::File { path: path.clone() }).unwrap();
        assert!(!path.exists());

        let mut handler = SubmitHandler::new(sink);
        let mut form = acme_form();
        handler.submit(&form).unwrap();
        form.set_field(BusinessField::Name, "Acme Two");
        handler.submit(&form).unwrap();
        assert_eq!(handler.submitted(), 2);

        let written = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["name"], "Acme Two");
        assert_eq!(value["branches"][0]["socialLinks"], json!([]));
    }

    #[test]
    fn whitespace_only_name_still_submits() {
        let mut form = acme_form();
        form.set_field(BusinessField::Name, "   ");
        let mut handler = SubmitHandler::new(RecordingSink::default());
        let submitted = handler.submit(&form).unwrap();
        assert_eq!(submitted.name, "   ");
        assert_eq!(handler.sink().received.len(), 1);
    }
}
