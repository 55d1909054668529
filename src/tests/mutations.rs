use futures::executor::block_on;
use serde_json::{json, Value};

use super::mock::{respond, respond_json, Harness, BASE};
use crate::constants::SESSION_TOKEN_KEY;
use crate::errors::ApiError;
use crate::network::Method;
use crate::storage::KeyValueStore;

fn sent_body(h: &Harness) -> Value {
    let req = h.transport.requests().pop().unwrap();
    serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
}

#[test]
fn class_mutations_send_expected_requests() {
    let h = Harness::new(|_| respond_json(200, &json!({"ok": true}))).logged_in();

    block_on(h.api.create_class("t@school.edu", " Algebra ")).unwrap();
    let req = h.transport.requests().pop().unwrap();
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.url, format!("{}/create_class", BASE));
    assert_eq!(req.header_value("Content-Type"), Some("application/json"));
    assert_eq!(sent_body(&h), json!({"className": "Algebra", "teacherEmail": "t@school.edu"}));

    block_on(h.api.update_class("12", "Geometry")).unwrap();
    let req = h.transport.requests().pop().unwrap();
    assert_eq!(req.method, Method::Put);
    assert_eq!(sent_body(&h), json!({"classId": 12, "className": "Geometry"}));

    block_on(h.api.delete_class("12")).unwrap();
    let req = h.transport.requests().pop().unwrap();
    assert_eq!(req.method, Method::Delete);
    assert_eq!(req.url, format!("{}/delete_class", BASE));
    assert_eq!(sent_body(&h), json!({"classId": 12}));

    block_on(h.api.remove_student_from_class("12", "F7")).unwrap();
    let req = h.transport.requests().pop().unwrap();
    assert_eq!(req.url, format!("{}/remove_student_from_class", BASE));
    assert_eq!(sent_body(&h), json!({"class_id": 12, "faculty_number": "F7"}));
}

#[test]
fn invalid_arguments_fail_before_any_request() {
    let h = Harness::new(|_| respond(200, "{}"));
    assert!(matches!(block_on(h.api.create_class("", "Algebra")), Err(ApiError::Validation(_))));
    assert!(matches!(block_on(h.api.create_class("t@x.edu", " ")), Err(ApiError::Validation(_))));
    assert!(matches!(block_on(h.api.update_class("x", "Name")), Err(ApiError::Validation(_))));
    assert!(matches!(block_on(h.api.delete_class("")), Err(ApiError::Validation(_))));
    assert!(matches!(
        block_on(h.api.remove_student_from_class("3", "")),
        Err(ApiError::Validation(_))
    ));
    assert!(h.transport.requests().is_empty());
}

#[test]
fn add_students_without_faculty_numbers_sends_nothing() {
    let h = Harness::new(|_| respond(200, "{}"));
    let students = vec![json!({"name": "Ann"}), json!({"faculty_number": ""})];
    let err = block_on(h.api.add_students_to_class("5", &students)).unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(h.transport.requests().is_empty());

    let err = block_on(h.api.add_students_to_class("5", &[])).unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[test]
fn add_students_sends_only_identified_students() {
    let h = Harness::new(|_| respond_json(200, &json!({"added": 2})));
    let students = vec![
        json!({"name": "Ann", "faculty_number": "F1"}),
        json!({"name": "Bob"}),
        json!({"name": "Cy", "facultyNumber": 42}),
    ];
    let out = block_on(h.api.add_students_to_class("5", &students)).unwrap();
    assert_eq!(out, json!({"added": 2}));

    let req = h.transport.requests().pop().unwrap();
    assert_eq!(req.url, format!("{}/class_students", BASE));
    let body = sent_body(&h);
    assert_eq!(body["class_id"], json!(5));
    assert_eq!(body["students"].as_array().unwrap().len(), 2);
}

#[test]
fn add_students_error_despite_success_status_is_reported() {
    let h = Harness::new(|_| respond_json(200, &json!({"error": "Student F1 already enrolled"})));
    let err = block_on(h.api.add_students_to_class("5", &[json!({"faculty_number": "F1"})]))
        .unwrap_err();
    match err {
        ApiError::Http(f) => {
            assert_eq!(f.message, "Student F1 already enrolled");
            assert_eq!(f.status, 200);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn error_despite_success_reports_the_header_actually_sent() {
    let h = Harness::new(|_| respond(200, "{}")).logged_in();
    let session_store = h.session_store.clone();
    h.transport.respond_with(move |_| {
        // Session ends while the request is in flight.
        session_store.remove(SESSION_TOKEN_KEY);
        respond_json(200, &json!({"error": "Roster locked"}))
    });

    let err = block_on(h.api.add_students_to_class("5", &[json!({"faculty_number": "F1"})]))
        .unwrap_err();
    match err {
        ApiError::Http(f) => {
            assert!(f.had_auth_header);
            assert_eq!(f.endpoint, format!("{}/class_students", BASE));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(
        h.transport.requests()[0].header_value("Authorization"),
        Some("Bearer secret-token")
    );
}

#[test]
fn expired_token_logs_out_and_redirects() {
    let h = Harness::new(|_| respond_json(401, &json!({"error": "Invalid or expired token"})))
        .logged_in();
    h.session_store.set("jwt", "legacy");

    let err = block_on(h.api.update_class("3", "Renamed")).unwrap_err();
    assert!(err.is_redirecting());
    assert_eq!(err.to_string(), "Invalid or expired token");
    assert!(!h.api.session().has_token());
    assert!(h.session_store.is_empty());
    assert_eq!(h.expired_events.borrow().len(), 1);
    assert_eq!(h.expired_events.borrow()[0].login_url, "/login");
}

#[test]
fn every_auth_phrase_is_recognised() {
    for phrase in ["Missing bearer token", "Invalid bearer token format", "Invalid or expired token"] {
        let body = json!({ "message": phrase });
        let h = Harness::new(move |_| respond_json(401, &body)).logged_in();
        let err = block_on(h.api.delete_class("3")).unwrap_err();
        assert!(matches!(err, ApiError::AuthExpired { .. }), "{}", phrase);
    }
}

#[test]
fn unrelated_401_is_passed_through() {
    let h = Harness::new(|_| respond_json(401, &json!({"error": "Invalid or expired token, please"})))
        .logged_in();
    let err = block_on(h.api.delete_class("3")).unwrap_err();
    assert!(matches!(err, ApiError::Http(_)));
    assert!(!err.is_redirecting());
    assert!(h.api.session().has_token());
    assert!(h.expired_events.borrow().is_empty());
}

#[test]
fn foreign_class_is_a_permission_error() {
    let h = Harness::new(|_| {
        respond_json(403, &json!({"message": "Class X does not belong to authenticated teacher"}))
    })
    .logged_in();
    let err = block_on(h.api.remove_student_from_class("3", "F1")).unwrap_err();
    assert_eq!(err.to_string(), "You don't have permission to modify this class.");
    assert_eq!(err.status(), Some(403));
    match err {
        ApiError::Permission { body, .. } => assert_eq!(
            body,
            json!({"message": "Class X does not belong to authenticated teacher"})
        ),
        other => panic!("unexpected {:?}", other),
    }
}
