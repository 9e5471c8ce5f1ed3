use serde_json::json;
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use studynotes_core::{
    lift, project, Backend, ClientConfig, HttpBackend, NoteDraft, NoteService, PdfUpload,
};
use wiremock::matchers::{
    body_json, body_string_contains, header_exists, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> HttpBackend {
    let config = ClientConfig {
        base_url: format!("{}/", server.uri()),
        timeout_secs: 5,
        ..ClientConfig::default()
    };
    HttpBackend::new(&config).unwrap()
}

fn paragraph(text: &str) -> serde_json::Value {
    json!({"type": "doc", "content": [
        {"type": "paragraph", "content": [{"type": "text", "text": text}]}
    ]})
}

#[tokio::test]
async fn list_notes_reads_the_notes_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .and(header_exists("x-request-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notes": [
                {"note_id": "n1", "title": "Groceries", "content": paragraph("milk,eggs"),
                 "created_at": "2024-05-01T10:00:00.123456"},
                {"note_id": "n2", "title": "Legacy", "content": "plain body"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let notes = backend_for(&server).list_notes().await.unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].plain_text(), "milk,eggs");
    assert_eq!(notes[1].content, lift("plain body"));
}

#[tokio::test]
async fn missing_notes_key_is_an_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    assert!(backend_for(&server).list_notes().await.unwrap().is_empty());
}

#[tokio::test]
async fn note_writes_use_store_routes_and_fill_acknowledgements() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .and(body_json(json!({"title": "Groceries", "content": paragraph("milk,eggs")})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Note saved successfully", "note_id": "n1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/note"))
        .and(body_json(json!({
            "note_id": "n1", "title": "Groceries", "content": paragraph("milk,eggs,bread")
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "updated"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/note"))
        .and(query_param("note_id", "n1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let created = backend
        .create_note(&NoteDraft::new("Groceries", lift("milk,eggs")))
        .await
        .unwrap();
    assert_eq!(created.id, "n1");
    assert_eq!(created.title, "Groceries");

    let updated = backend
        .update_note("n1", &NoteDraft::from_plain_text("Groceries", "milk,eggs,bread"))
        .await
        .unwrap();
    assert_eq!(updated.id, "n1");
    assert_eq!(project(&updated.content), "milk,eggs,bread");

    backend.delete_note("n1").await.unwrap();
}

#[tokio::test]
async fn failed_calls_surface_the_store_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/note"))
        .and(query_param("note_id", "missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Note not found"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/schedule-event"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Missing event details"})),
        )
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend.get_note("missing").await.unwrap_err();
    assert_eq!(err.message(), "Note not found");

    let start = Utc::now();
    let err = backend
        .create_event(&studynotes_core::EventDraft::new("Standup", "", start, start))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Missing event details");
}

#[tokio::test]
async fn pdf_routes_and_multipart_upload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload-pdf"))
        .and(body_string_contains("name=\"pdf\""))
        .and(body_string_contains("filename=\"Lecture3.pdf\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "p1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pdf"))
        .and(query_param("pdf_id", "p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": "p1", "filename": "Lecture3.pdf", "uploaded_at": "2024-05-01T09:00:00"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pdf/extract"))
        .and(query_param("pdf_id", "p1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"extracted_text": "hello"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pdf/summarize"))
        .and(query_param("pdf_id", "p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"summarized": "hi"})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/pdf"))
        .and(query_param("pdf_id", "p1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let record = backend
        .upload_pdf(&PdfUpload::new("Lecture3.pdf", b"%PDF-1.7\n".to_vec()))
        .await
        .unwrap();
    assert_eq!(record.id, "p1");
    assert_eq!(record.filename, "Lecture3.pdf");

    assert_eq!(backend.get_pdf("p1").await.unwrap().note_title(), "Lecture3");
    assert_eq!(backend.extract_pdf("p1").await.unwrap().extracted_text, "hello");
    assert_eq!(backend.summarize_pdf("p1").await.unwrap().summary, "hi");
    backend.delete_pdf("p1").await.unwrap();
}

#[tokio::test]
async fn events_are_listed_and_deleted_by_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "e1", "title": "Standup", "description": "daily",
            "start_time": "2024-05-06T09:00:00", "end_time": "2024-05-06T09:15:00"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/events/e1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let events = backend.list_events().await.unwrap();
    assert_eq!(events[0].title, "Standup");
    assert_eq!(events[0].description, "daily");
    backend.delete_event("e1").await.unwrap();
}

#[tokio::test]
async fn update_keeps_the_cached_creation_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notes": [{"note_id": "n1", "title": "T", "content": paragraph("old"),
                       "created_at": "2020-01-01T00:00:00"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/note"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Note updated"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let notes = NoteService::new(Arc::new(backend_for(&server)));
    assert!(notes.list().await);
    let created_at = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();

    let updated = notes.update_plain("n1", "T", "new").await.unwrap().unwrap();
    assert_eq!(updated.created_at, created_at);
    let cached = notes.find("n1").unwrap();
    assert_eq!(cached.created_at, created_at);
    assert_eq!(cached.plain_text(), "new");
}
