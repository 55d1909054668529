//! JS surface of the client. Every operation returns a `Promise` that
//! resolves to plain JS data or rejects with an error string.

use std::rc::Rc;

use js_sys::Promise;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::classroom::ClassroomApi;
use crate::errors::ApiError;
use crate::network::retry::GlooSleeper;
use crate::network::transport::FetchTransport;
use crate::network::{current_api_config, SessionExpired};
use crate::storage::BrowserStorage;
use crate::utils::class_id_from_number;
use crate::warn_log;

// Main entry point for the WASM module
#[wasm_bindgen(start)]
pub fn start() {
    // Initialize better panic messages
    console_error_panic_hook::set_once();
    // Build-time base URL; `init_api_config_js` may replace it later.
    crate::network::init_api_config();
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    // Maps serialise as plain objects so UI code can use `result.classes`.
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from(ApiError::validation(format!("Invalid {}: {}", what, e))))
}

/// Accept ids as JS numbers or strings; anything else is passed on as an
/// empty string and rejected by validation.
fn class_id_arg(value: &JsValue) -> String {
    match value.as_f64() {
        Some(n) => class_id_from_number(n),
        None => value.as_string().unwrap_or_default(),
    }
}

/// Default session-expired reaction: blocking notice, then hard navigation.
fn alert_and_redirect(event: &SessionExpired) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let _ = window.alert_with_message(&event.message);
    if let Err(e) = window.location().set_href(&event.login_url) {
        warn_log!("Failed to navigate to {}: {:?}", event.login_url, e);
    }
}

#[wasm_bindgen]
pub struct ClassroomClient {
    api: Rc<ClassroomApi>,
}

#[wasm_bindgen]
impl ClassroomClient {
    /// Build a client against the configured API (see `init_api_config_js`).
    #[wasm_bindgen(constructor)]
    pub fn new() -> ClassroomClient {
        let api = ClassroomApi::new(
            current_api_config(),
            Rc::new(FetchTransport::new()),
            Rc::new(BrowserStorage::session()),
            Rc::new(BrowserStorage::local()),
        )
        .with_sleeper(Rc::new(GlooSleeper));
        api.on_session_expired(alert_and_redirect);
        ClassroomClient { api: Rc::new(api) }
    }

    /// Store the token from a login response (`{token|access_token, expires_in}`).
    #[wasm_bindgen(js_name = startSession)]
    pub fn start_session(&self, login_response: JsValue) -> Result<(), JsValue> {
        let body: Value = from_js(login_response, "login response")?;
        self.api.session().set_session_from_response(&body)?;
        if let Some(email) = body.get("email").and_then(Value::as_str) {
            self.api.session().set_teacher_email(email);
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = logout)]
    pub fn logout(&self) {
        self.api.session().clear();
    }

    #[wasm_bindgen(js_name = hasToken)]
    pub fn has_token(&self) -> bool {
        self.api.session().has_token()
    }

    #[wasm_bindgen(js_name = isExpired)]
    pub fn is_expired(&self) -> bool {
        self.api.session().is_expired()
    }

    #[wasm_bindgen(js_name = teacherEmail)]
    pub fn teacher_email(&self) -> Option<String> {
        self.api.session().teacher_email()
    }

    #[wasm_bindgen(js_name = fetchClasses)]
    pub fn fetch_classes(&self, teacher_email: String) -> Promise {
        let api = self.api.clone();
        future_to_promise(async move {
            let classes = api.fetch_classes(&teacher_email).await?;
            to_js(&classes)
        })
    }

    #[wasm_bindgen(js_name = cachedClasses)]
    pub fn cached_classes(&self, teacher_email: String) -> Result<JsValue, JsValue> {
        match self.api.cached_classes(&teacher_email) {
            Some(classes) => to_js(&classes),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = fetchClassStudents)]
    pub fn fetch_class_students(&self, class_id: JsValue, class_name: Option<String>) -> Promise {
        let api = self.api.clone();
        let class_id = class_id_arg(&class_id);
        future_to_promise(async move {
            let students = api
                .fetch_class_students(&class_id, class_name.as_deref())
                .await?;
            to_js(&students)
        })
    }

    #[wasm_bindgen(js_name = createClass)]
    pub fn create_class(&self, teacher_email: String, class_name: String) -> Promise {
        let api = self.api.clone();
        future_to_promise(async move {
            let created = api.create_class(&teacher_email, &class_name).await?;
            to_js(&created)
        })
    }

    #[wasm_bindgen(js_name = updateClass)]
    pub fn update_class(&self, class_id: JsValue, new_name: String) -> Promise {
        let api = self.api.clone();
        let class_id = class_id_arg(&class_id);
        future_to_promise(async move {
            let updated = api.update_class(&class_id, &new_name).await?;
            to_js(&updated)
        })
    }

    #[wasm_bindgen(js_name = deleteClass)]
    pub fn delete_class(&self, class_id: JsValue) -> Promise {
        let api = self.api.clone();
        let class_id = class_id_arg(&class_id);
        future_to_promise(async move {
            let deleted = api.delete_class(&class_id).await?;
            to_js(&deleted)
        })
    }

    #[wasm_bindgen(js_name = addStudentsToClass)]
    pub fn add_students_to_class(&self, class_id: JsValue, students: JsValue) -> Promise {
        let api = self.api.clone();
        let class_id = class_id_arg(&class_id);
        future_to_promise(async move {
            let students: Vec<Value> = from_js(students, "students")?;
            let added = api.add_students_to_class(&class_id, &students).await?;
            to_js(&added)
        })
    }

    #[wasm_bindgen(js_name = removeStudentFromClass)]
    pub fn remove_student_from_class(&self, class_id: JsValue, faculty_number: String) -> Promise {
        let api = self.api.clone();
        let class_id = class_id_arg(&class_id);
        future_to_promise(async move {
            let removed = api
                .remove_student_from_class(&class_id, &faculty_number)
                .await?;
            to_js(&removed)
        })
    }
}

impl Default for ClassroomClient {
    fn default() -> Self {
        Self::new()
    }
}
