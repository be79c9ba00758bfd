//! End-to-end engine tests over the flat-file store and the local file
//! store, both living in a temp directory.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{Duration, Utc};

use tramita_core::config::storage::StorageConfig;
use tramita_core::error::ErrorKind;
use tramita_core::traits::file_store::{FileStore, StoredFile};
use tramita_entity::case::{
    CaseTemplate, NewCase, NewRequestedDocument, NewSupplementaryDocument, SupplementaryCategory,
    TemplateDocument,
};
use tramita_entity::reminder::{NewReminder, ReminderCategory, ReminderPatch};
use tramita_service::deadline::requested_reminder_due;
use tramita_service::{CaseService, DocumentService, PaymentService, ReminderService};
use tramita_store::flatfile::{FlatFileCaseStore, FlatFileReminderStore};
use tramita_storage::LocalFileStore;

struct Engine {
    cases: CaseService,
    documents: DocumentService,
    payments: PaymentService,
    reminders: ReminderService,
    files: Arc<LocalFileStore>,
    _dir: tempfile::TempDir,
}

async fn engine() -> Engine {
    let dir = tempfile::tempdir().unwrap();
    let case_store = Arc::new(FlatFileCaseStore::open(dir.path().join("data")).await.unwrap());
    let reminder_store = Arc::new(
        FlatFileReminderStore::open(dir.path().join("data"))
            .await
            .unwrap(),
    );
    let files = Arc::new(
        LocalFileStore::new(&StorageConfig {
            root: dir.path().join("files").to_string_lossy().into_owned(),
            base_url: "/files".into(),
        })
        .await
        .unwrap(),
    );

    Engine {
        cases: CaseService::new(case_store.clone(), files.clone()),
        documents: DocumentService::new(case_store.clone(), files.clone()),
        payments: PaymentService::new(case_store.clone()),
        reminders: ReminderService::new(reminder_store, case_store),
        files,
        _dir: dir,
    }
}

fn draft(first: &str, last: &str) -> NewCase {
    NewCase {
        first_name: first.into(),
        last_name: last.into(),
        email: None,
        phone: None,
        total_fee: None,
        administrative_silence_days: 90,
        reminder_interval_days: 7,
        requested_documents_reminder_duration_days: 10,
    }
}

fn arraigo_template() -> CaseTemplate {
    CaseTemplate {
        id: tramita_core::types::TemplateId::new(),
        name: "Arraigo social".into(),
        description: None,
        required_documents: vec![
            TemplateDocument {
                code: "passport".into(),
                name: "Passport".into(),
                description: None,
            },
            TemplateDocument {
                code: "padron".into(),
                name: "Padrón".into(),
                description: None,
            },
            TemplateDocument {
                code: "contrato".into(),
                name: "Contrato de trabajo".into(),
                description: None,
            },
        ],
        reminder_interval_days: 14,
        administrative_silence_days: 60,
    }
}

fn pdf(name: &str) -> StoredFile {
    StoredFile::new(Bytes::from_static(b"%PDF-1.4 test"), name)
}

#[tokio::test]
async fn test_template_copied_deeply_on_create() {
    let engine = engine().await;
    let template = arraigo_template();

    let case = engine
        .cases
        .create(draft("Amina", "Diallo"), Some(&template))
        .await
        .unwrap();

    assert_eq!(case.required_documents.len(), 3);
    assert_eq!(case.required_documents[0].code, "passport");
    assert!(case.required_documents.iter().all(|d| !d.submitted));
    assert_eq!(case.reminder_interval_days, 14);
    assert_eq!(case.administrative_silence_days, 60);
    assert_eq!(case.case_template_id, Some(template.id));
}

#[tokio::test]
async fn test_submit_reset_roundtrip() {
    let engine = engine().await;
    let case = engine
        .cases
        .create(draft("Amina", "Diallo"), Some(&arraigo_template()))
        .await
        .unwrap();

    let case = engine
        .documents
        .submit_required(case.id, "passport", pdf("passport.pdf"))
        .await
        .unwrap();
    let first = &case.required_documents[0];
    assert!(first.submitted);
    assert!(first.file_url.is_some());
    let first_upload = first.uploaded_at.unwrap();
    assert!(case.required_invariant_holds());

    // Reset keeps the slot but clears the submission.
    let case = engine.documents.reset_required(case.id, "passport").await.unwrap();
    let slot = &case.required_documents[0];
    assert!(!slot.submitted);
    assert!(slot.file_url.is_none());
    assert!(slot.uploaded_at.is_none());
    assert_eq!(case.required_documents.len(), 3);

    // Re-submission stamps a fresh upload time.
    let case = engine
        .documents
        .submit_required(case.id, "passport", pdf("passport-v2.pdf"))
        .await
        .unwrap();
    let slot = &case.required_documents[0];
    assert!(slot.submitted);
    assert!(slot.uploaded_at.unwrap() >= first_upload);
    assert!(case.required_invariant_holds());
}

#[tokio::test]
async fn test_unknown_code_is_not_found() {
    let engine = engine().await;
    let case = engine
        .cases
        .create(draft("Amina", "Diallo"), Some(&arraigo_template()))
        .await
        .unwrap();

    let err = engine
        .documents
        .submit_required(case.id, "nope", pdf("x.pdf"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_reorder_is_a_pure_permutation() {
    let engine = engine().await;
    let case = engine
        .cases
        .create(draft("Amina", "Diallo"), Some(&arraigo_template()))
        .await
        .unwrap();

    let mut before: Vec<String> = case
        .required_documents
        .iter()
        .map(|d| d.code.clone())
        .collect();

    let case = engine.documents.reorder_required(case.id, 0, 2).await.unwrap();
    let after: Vec<String> = case
        .required_documents
        .iter()
        .map(|d| d.code.clone())
        .collect();

    assert_eq!(after, vec!["padron", "contrato", "passport"]);
    let mut after_sorted = after.clone();
    after_sorted.sort();
    before.sort();
    assert_eq!(before, after_sorted);

    let err = engine
        .documents
        .reorder_required(case.id, 0, 9)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_make_all_optional_is_idempotent() {
    let engine = engine().await;
    let case = engine
        .cases
        .create(draft("Amina", "Diallo"), Some(&arraigo_template()))
        .await
        .unwrap();

    let once = engine.documents.make_all_optional(case.id).await.unwrap();
    let twice = engine.documents.make_all_optional(case.id).await.unwrap();

    assert!(once.required_documents.iter().all(|d| d.is_optional));
    for (a, b) in once
        .required_documents
        .iter()
        .zip(twice.required_documents.iter())
    {
        assert_eq!(a.code, b.code);
        assert_eq!(a.is_optional, b.is_optional);
        assert_eq!(a.submitted, b.submitted);
    }
}

#[tokio::test]
async fn test_placeholder_then_reupload_leaves_one_live_file() {
    let engine = engine().await;
    let case = engine.cases.create(draft("Amina", "Diallo"), None).await.unwrap();

    // Placeholder: no file yet, reminder scheduled.
    let case = engine
        .documents
        .add_supplementary(
            case.id,
            SupplementaryCategory::Requerimiento,
            NewSupplementaryDocument {
                name: "Notice reply".into(),
                description: None,
                reminder_days: 5,
            },
            None,
        )
        .await
        .unwrap();
    let doc = &case.requerimiento[0];
    assert!(doc.is_placeholder());
    assert!(doc.reminder_date.is_some());
    let doc_id = doc.id;

    // First attachment fulfils the placeholder.
    let case = engine
        .documents
        .attach_file(
            case.id,
            SupplementaryCategory::Requerimiento,
            doc_id,
            pdf("reply.pdf"),
            Some("gestor".into()),
        )
        .await
        .unwrap();
    let first_url = case.requerimiento[0].file_url.clone().unwrap();
    assert!(engine.files.exists(&first_url).await.unwrap());

    // Re-upload replaces the file; exactly one reference stays live.
    let case = engine
        .documents
        .attach_file(
            case.id,
            SupplementaryCategory::Requerimiento,
            doc_id,
            pdf("reply-v2.pdf"),
            Some("gestor".into()),
        )
        .await
        .unwrap();
    let second_url = case.requerimiento[0].file_url.clone().unwrap();
    assert_ne!(first_url, second_url);
    assert!(!engine.files.exists(&first_url).await.unwrap());
    assert!(engine.files.exists(&second_url).await.unwrap());
}

#[tokio::test]
async fn test_cascade_delete_tolerates_missing_files() {
    let engine = engine().await;
    let case = engine
        .cases
        .create(draft("Amina", "Diallo"), Some(&arraigo_template()))
        .await
        .unwrap();

    let case = engine
        .documents
        .submit_required(case.id, "passport", pdf("passport.pdf"))
        .await
        .unwrap();
    let case = engine
        .documents
        .add_supplementary(
            case.id,
            SupplementaryCategory::Additional,
            NewSupplementaryDocument {
                name: "Extra".into(),
                description: None,
                reminder_days: 3,
            },
            Some(pdf("extra.pdf")),
        )
        .await
        .unwrap();

    let passport_url = case.required_documents[0].file_url.clone().unwrap();
    let extra_url = case.additional_documents[0].file_url.clone().unwrap();

    // One file already gone: deletion still succeeds.
    engine.files.delete(&passport_url).await.unwrap();

    assert!(engine.cases.delete(case.id).await.unwrap());
    assert!(!engine.files.exists(&extra_url).await.unwrap());
    assert!(engine.cases.get(case.id).await.unwrap_err().is_not_found());

    // Deleting again reports absence without error.
    assert!(!engine.cases.delete(case.id).await.unwrap());
}

#[tokio::test]
async fn test_submit_to_immigration_once() {
    let engine = engine().await;
    let case = engine.cases.create(draft("Amina", "Diallo"), None).await.unwrap();

    let case = engine.cases.submit_to_immigration(case.id).await.unwrap();
    assert!(case.submitted_to_immigration);
    assert!(case.application_date.is_some());

    let err = engine.cases.submit_to_immigration(case.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_requested_document_cadence() {
    let engine = engine().await;
    let case = engine.cases.create(draft("Amina", "Diallo"), None).await.unwrap();
    let case = engine.cases.submit_to_immigration(case.id).await.unwrap();

    let case = engine
        .documents
        .add_requested(
            case.id,
            NewRequestedDocument {
                code: "nomina".into(),
                name: "Nómina".into(),
                description: None,
            },
        )
        .await
        .unwrap();
    assert!(case.requested_documents[0].requested_at.is_some());

    // Never reminded: due immediately.
    let now = Utc::now();
    assert!(requested_reminder_due(&case, now));

    let case = engine.documents.mark_requested_reminded(case.id).await.unwrap();
    assert!(!requested_reminder_due(&case, now));

    // Backdate the last reminder past the default interval.
    let patch = tramita_entity::case::CasePatch {
        requested_documents_last_reminder_date: Some(Some(now - Duration::days(3))),
        ..Default::default()
    };
    let case = engine.cases.update(case.id, patch).await.unwrap();
    assert!(requested_reminder_due(&case, now));

    // Submission silences the cadence entirely.
    let case = engine
        .documents
        .submit_requested(case.id, "nomina", pdf("nomina.pdf"))
        .await
        .unwrap();
    assert!(case.requested_documents[0].submitted);
    assert!(!requested_reminder_due(&case, now));
}

#[tokio::test]
async fn test_payment_ledger_via_service() {
    let engine = engine().await;
    let case = engine.cases.create(draft("Amina", "Diallo"), None).await.unwrap();

    let case = engine.payments.set_total_fee(case.id, 120_000).await.unwrap();
    let case = engine
        .payments
        .record_payment(case.id, 50_000, "cash", None, Utc::now())
        .await
        .unwrap();
    assert_eq!(case.payment.paid_amount, 50_000);
    assert_eq!(case.payment.outstanding(), 70_000);
    assert!(case.payment.is_consistent());

    let err = engine
        .payments
        .record_payment(case.id, 0, "cash", None, Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_reminder_survives_case_deletion() {
    let engine = engine().await;
    let case = engine.cases.create(draft("Amina", "Diallo"), None).await.unwrap();

    let reminder = engine
        .reminders
        .create(NewReminder {
            case_id: Some(case.id),
            client_name: "Amina".into(),
            client_surname: "Diallo".into(),
            phone: None,
            reminder_date: Utc::now() + Duration::days(1),
            notes: None,
            category: ReminderCategory::Pagos,
        })
        .await
        .unwrap();

    assert!(
        engine
            .reminders
            .linked_case(&reminder)
            .await
            .unwrap()
            .is_some()
    );

    engine.cases.delete(case.id).await.unwrap();

    // The soft pointer now dangles; that is not an error.
    let reminder = engine.reminders.get(reminder.id).await.unwrap();
    assert!(
        engine
            .reminders
            .linked_case(&reminder)
            .await
            .unwrap()
            .is_none()
    );

    // And the reminder itself is still editable.
    let patch = ReminderPatch {
        case_id: Some(None),
        ..Default::default()
    };
    let updated = engine.reminders.update(reminder.id, patch).await.unwrap();
    assert!(updated.case_id.is_none());
}

#[tokio::test]
async fn test_invalid_reminder_rejected_before_mutation() {
    let engine = engine().await;

    let err = engine
        .reminders
        .create(NewReminder {
            case_id: None,
            client_name: String::new(),
            client_surname: "Diallo".into(),
            phone: None,
            reminder_date: Utc::now(),
            notes: None,
            category: ReminderCategory::Uncategorized,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(engine.reminders.list().await.unwrap().is_empty());
}
