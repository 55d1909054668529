use std::rc::Rc;

use futures::executor::block_on;
use serde_json::json;

use super::mock::{respond, respond_json, MockTransport};
use crate::errors::ApiError;
use crate::network::{ApiClient, Method, TransportError};
use crate::session::SessionStore;
use crate::storage::MemoryStore;
use crate::utils::now_ms;

fn client(transport: &Rc<MockTransport>) -> ApiClient {
    ApiClient::new(transport.clone(), SessionStore::new(Rc::new(MemoryStore::new())))
}

#[test]
fn auth_header_only_with_a_live_session() {
    let transport = Rc::new(MockTransport::new(|_| respond(200, "{}")));
    let api = client(&transport);

    block_on(api.fetch_json(Method::Get, "/x", None)).unwrap();
    api.session().set_session("tok", now_ms() + 60_000).unwrap();
    block_on(api.fetch_json(Method::Get, "/x", None)).unwrap();
    api.session().set_session("tok", now_ms() - 1).unwrap();
    block_on(api.fetch_json(Method::Get, "/x", None)).unwrap();

    let reqs = transport.requests();
    assert_eq!(reqs[0].header_value("Authorization"), None);
    assert_eq!(reqs[1].header_value("Authorization"), Some("Bearer tok"));
    assert_eq!(reqs[2].header_value("Authorization"), None);
    assert!(reqs
        .iter()
        .all(|r| r.header_value("Content-Type") == Some("application/json")));
}

#[test]
fn success_body_is_returned_as_is_or_empty_object() {
    let transport = Rc::new(MockTransport::new(|_| respond_json(200, &json!({"x": [1]}))));
    let api = client(&transport);
    assert_eq!(block_on(api.fetch_json(Method::Get, "/x", None)).unwrap(), json!({"x": [1]}));

    transport.respond_with(|_| respond(204, ""));
    assert_eq!(block_on(api.fetch_json(Method::Delete, "/x", None)).unwrap(), json!({}));
}

#[test]
fn failure_carries_status_body_endpoint_and_auth_flag() {
    let transport = Rc::new(MockTransport::new(|_| {
        respond_json(400, &json!({"message": "Name taken"}))
    }));
    let api = client(&transport);
    api.session().set_session("tok", now_ms() + 60_000).unwrap();

    let body = json!({"className": "A"});
    match block_on(api.fetch_json(Method::Post, "/create_class", Some(&body))) {
        Err(ApiError::Http(f)) => {
            assert_eq!(f.message, "Name taken");
            assert_eq!(f.status, 400);
            assert_eq!(f.body, json!({"message": "Name taken"}));
            assert_eq!(f.endpoint, "/create_class");
            assert!(f.had_auth_header);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(
        transport.requests()[0].body.as_deref(),
        Some(r#"{"className":"A"}"#)
    );
}

#[test]
fn non_json_failure_falls_back_to_status() {
    let transport = Rc::new(MockTransport::new(|_| respond(502, "<html>bad gateway</html>")));
    let api = client(&transport);
    let err = block_on(api.fetch_json(Method::Get, "/x", None)).unwrap_err();
    assert_eq!(err.to_string(), "HTTP 502");
}

#[test]
fn transport_failure_is_a_network_error() {
    let transport = Rc::new(MockTransport::new(|_| Err(TransportError("dns".into()))));
    let api = client(&transport);
    match block_on(api.fetch_json(Method::Get, "/x", None)) {
        Err(ApiError::Network { endpoint, message }) => {
            assert_eq!(endpoint, "/x");
            assert_eq!(message, "dns");
        }
        other => panic!("unexpected {:?}", other),
    }
}
