//! Class and student operations exposed to the UI layer.

use std::rc::Rc;

use serde_json::{json, Value};

use crate::cache::{ClassCache, StudentCache};
use crate::errors::{body_message, ApiError, HttpFailure};
use crate::network::normalize::{extract_students, parse_lenient};
use crate::network::{
    ApiClient, ApiConfig, ClassList, ClassRouteResolver, HttpTransport, Method,
    MutationErrorClassifier, RetryPolicy, SessionExpired, Sleeper,
};
use crate::session::SessionStore;
use crate::storage::KeyValueStore;
use crate::utils::{faculty_number, parse_class_id, require};
use crate::{debug_log, warn_log};

/// Real timers in the browser; elsewhere there is no event loop to wait on.
fn default_sleeper() -> Rc<dyn Sleeper> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(crate::network::retry::GlooSleeper)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(crate::network::NoDelay)
    }
}

pub struct ClassroomApi {
    config: ApiConfig,
    client: ApiClient,
    resolver: ClassRouteResolver,
    classifier: MutationErrorClassifier,
    students_cache: StudentCache,
    classes_cache: ClassCache,
    sleeper: Rc<dyn Sleeper>,
    retry: RetryPolicy,
}

impl ClassroomApi {
    /// `session_store` should be per-tab storage; `durable_store` survives
    /// the tab and holds route memory and list caches.
    pub fn new(
        config: ApiConfig,
        transport: Rc<dyn HttpTransport>,
        session_store: Rc<dyn KeyValueStore>,
        durable_store: Rc<dyn KeyValueStore>,
    ) -> Self {
        let session = SessionStore::new(session_store);
        let classifier = MutationErrorClassifier::new(session.clone(), config.login_url());
        Self {
            client: ApiClient::new(transport, session),
            resolver: ClassRouteResolver::new(durable_store.clone()),
            classifier,
            students_cache: StudentCache::new(durable_store.clone()),
            classes_cache: ClassCache::new(durable_store),
            sleeper: default_sleeper(),
            retry: RetryPolicy::default(),
            config,
        }
    }

    pub fn with_sleeper(mut self, sleeper: Rc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Register the host's reaction to an expired session (notice + login redirect).
    pub fn on_session_expired<F>(&self, callback: F)
    where
        F: FnMut(&SessionExpired) + 'static,
    {
        self.classifier.set_on_session_expired(callback);
    }

    pub fn session(&self) -> &SessionStore {
        self.client.session()
    }

    pub fn resolver(&self) -> &ClassRouteResolver {
        &self.resolver
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    // -------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------

    /// List the teacher's classes, discovering which route the backend
    /// answers on. The result is cached locally per teacher.
    pub async fn fetch_classes(&self, teacher_email: &str) -> Result<ClassList, ApiError> {
        let classes = self
            .resolver
            .fetch_classes(self.client.transport(), &self.config, teacher_email)
            .await?;
        self.classes_cache.put(teacher_email.trim(), &classes);
        Ok(classes)
    }

    /// Last class list fetched for this teacher, if any.
    pub fn cached_classes(&self, teacher_email: &str) -> Option<ClassList> {
        self.classes_cache.get(teacher_email.trim())
    }

    /// Students of a class.
    ///
    /// When `class_name` is given and the backend returns an empty list
    /// while the local cache still knows students for that class, the read
    /// probably raced a just-committed write: wait `retry.delay_ms` and ask
    /// again, at most `retry.max_retries` times. The final list is cached.
    pub async fn fetch_class_students(
        &self,
        class_id: &str,
        class_name: Option<&str>,
    ) -> Result<Vec<Value>, ApiError> {
        let id = parse_class_id(class_id)?;
        let class_name = class_name.map(str::trim).filter(|n| !n.is_empty());
        let url = self.config.class_students_for(id);

        let mut attempt = 0;
        let students = loop {
            let students = self.fetch_students_once(&url).await?;

            let should_retry = students.is_empty()
                && attempt < self.retry.max_retries
                && class_name
                    .map(|name| !self.students_cache.get(name).is_empty())
                    .unwrap_or(false);
            if !should_retry {
                break students;
            }

            attempt += 1;
            debug_log!(
                "Class {} returned no students but the cache has some – retry {} in {} ms",
                id,
                attempt,
                self.retry.delay_ms
            );
            self.sleeper.sleep(self.retry.delay_ms).await;
        };

        if let Some(name) = class_name {
            self.students_cache.put(name, &students);
        }
        Ok(students)
    }

    async fn fetch_students_once(&self, url: &str) -> Result<Vec<Value>, ApiError> {
        let (response, had_auth_header) = self
            .client
            .send_authenticated(Method::Get, url, None)
            .await?;

        if !response.is_success() {
            // Error bodies are optional; fall back to the status text.
            let (detail, body) = match serde_json::from_str::<Value>(&response.body) {
                Ok(body) => (
                    body_message(&body).unwrap_or_else(|| response.status_text.clone()),
                    body,
                ),
                Err(_) => (response.status_text.clone(), json!({})),
            };
            return Err(ApiError::Http(HttpFailure {
                message: format!("Failed to fetch students: HTTP {} {}", response.status, detail),
                status: response.status,
                body,
                endpoint: url.to_string(),
                had_auth_header,
            }));
        }

        Ok(extract_students(parse_lenient(&response.body)))
    }

    // -------------------------------------------------------------------
    // Mutations – every failure goes through the classifier
    // -------------------------------------------------------------------

    async fn mutate(&self, method: Method, url: &str, body: Value) -> Result<Value, ApiError> {
        let (result, _) = self.mutate_with_auth(method, url, body).await?;
        Ok(result)
    }

    async fn mutate_with_auth(
        &self,
        method: Method,
        url: &str,
        body: Value,
    ) -> Result<(Value, bool), ApiError> {
        self.client
            .fetch_json_with_auth(method, url, Some(&body))
            .await
            .map_err(|e| self.classifier.classify(e))
    }

    pub async fn create_class(&self, teacher_email: &str, class_name: &str) -> Result<Value, ApiError> {
        let email = require(teacher_email, "Teacher email")?;
        let name = require(class_name, "Class name")?;
        let body = json!({ "className": name, "teacherEmail": email });
        self.mutate(Method::Post, &self.config.create_class(), body).await
    }

    pub async fn update_class(&self, class_id: &str, new_name: &str) -> Result<Value, ApiError> {
        let id = parse_class_id(class_id)?;
        let name = require(new_name, "New class name")?;
        let body = json!({ "classId": id, "className": name });
        self.mutate(Method::Put, &self.config.update_class(), body).await
    }

    pub async fn delete_class(&self, class_id: &str) -> Result<Value, ApiError> {
        let id = parse_class_id(class_id)?;
        let body = json!({ "classId": id });
        self.mutate(Method::Delete, &self.config.delete_class(), body).await
    }

    /// Add students to a class. Only records carrying a faculty number are
    /// sent; if none qualify nothing is sent at all.
    pub async fn add_students_to_class(
        &self,
        class_id: &str,
        students: &[Value],
    ) -> Result<Value, ApiError> {
        let id = parse_class_id(class_id)?;
        let eligible: Vec<Value> = students
            .iter()
            .filter(|s| faculty_number(s).is_some())
            .cloned()
            .collect();
        if eligible.is_empty() {
            return Err(ApiError::validation(
                "No students with a faculty number to add",
            ));
        }
        if eligible.len() < students.len() {
            warn_log!(
                "Skipping {} student(s) without a faculty number",
                students.len() - eligible.len()
            );
        }

        let url = self.config.class_students();
        let body = json!({ "class_id": id, "students": eligible });
        let (result, had_auth_header) = self.mutate_with_auth(Method::Post, &url, body).await?;

        // Some backends answer 200 with an `error` field instead of a status.
        if let Some(error) = result.get("error").and_then(Value::as_str) {
            if !error.trim().is_empty() {
                let failure = HttpFailure {
                    message: error.to_string(),
                    status: 200,
                    body: result.clone(),
                    endpoint: url,
                    had_auth_header,
                };
                return Err(self.classifier.classify(ApiError::Http(failure)));
            }
        }
        Ok(result)
    }

    pub async fn remove_student_from_class(
        &self,
        class_id: &str,
        faculty_number: &str,
    ) -> Result<Value, ApiError> {
        let id = parse_class_id(class_id)?;
        let number = require(faculty_number, "Faculty number")?;
        let body = json!({ "class_id": id, "faculty_number": number });
        self.mutate(Method::Post, &self.config.remove_student(), body).await
    }
}
