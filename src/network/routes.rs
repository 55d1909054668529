//! Route discovery for the "list classes" call.
//!
//! Deployments disagree on the path and on `teacherEmail` vs
//! `teacher_email`, so the resolver probes a fixed list of URL shapes and
//! remembers the one that answered, in memory and in durable storage.

use std::cell::Cell;
use std::rc::Rc;

use super::config::{encode, ApiConfig};
use super::normalize::{normalize_class_list, ClassList};
use super::transport::{HttpRequest, HttpTransport, Method};
use crate::constants::CLASS_ROUTE_KEY;
use crate::errors::ApiError;
use crate::storage::KeyValueStore;
use crate::utils::require;
use crate::{debug_log, warn_log};

/// One guess at how the backend wants the teacher email.
#[derive(Clone, Copy)]
pub struct RouteCandidate {
    pub name: &'static str,
    build: fn(&str, &str) -> String,
}

impl RouteCandidate {
    /// URL for this route; `email` is percent-encoded here.
    pub fn url(&self, base_url: &str, email: &str) -> String {
        (self.build)(base_url, &encode(email))
    }
}

impl std::fmt::Debug for RouteCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteCandidate").field("name", &self.name).finish()
    }
}

fn teacher_classes_path(base: &str, email: &str) -> String {
    format!("{}/get_teacher_classes/{}", base, email)
}

fn teacher_classes_camel(base: &str, email: &str) -> String {
    format!("{}/get_teacher_classes?teacherEmail={}", base, email)
}

fn teacher_classes_snake(base: &str, email: &str) -> String {
    format!("{}/get_teacher_classes?teacher_email={}", base, email)
}

fn classes_by_teacher(base: &str, email: &str) -> String {
    format!("{}/get_classes_by_teacher?teacher_email={}", base, email)
}

fn classes_path(base: &str, email: &str) -> String {
    format!("{}/classes/teacher/{}", base, email)
}

fn classes_camel(base: &str, email: &str) -> String {
    format!("{}/classes?teacherEmail={}", base, email)
}

fn classes_snake(base: &str, email: &str) -> String {
    format!("{}/classes?teacher_email={}", base, email)
}

/// Fixed priority order. Path-style routes come before their query-style
/// siblings, and `get_teacher_classes` before the generic `classes` base.
pub static CLASS_ROUTES: [RouteCandidate; 7] = [
    RouteCandidate { name: "teacher_classes_path", build: teacher_classes_path },
    RouteCandidate { name: "teacher_classes_camel", build: teacher_classes_camel },
    RouteCandidate { name: "teacher_classes_snake", build: teacher_classes_snake },
    RouteCandidate { name: "classes_by_teacher", build: classes_by_teacher },
    RouteCandidate { name: "classes_path", build: classes_path },
    RouteCandidate { name: "classes_camel", build: classes_camel },
    RouteCandidate { name: "classes_snake", build: classes_snake },
];

fn find_route(name: &str) -> Option<&'static RouteCandidate> {
    CLASS_ROUTES.iter().find(|r| r.name == name)
}

/// Holds the discovered route for the lifetime of the client.
pub struct ClassRouteResolver {
    durable: Rc<dyn KeyValueStore>,
    cached: Cell<Option<&'static str>>,
}

impl ClassRouteResolver {
    pub fn new(durable: Rc<dyn KeyValueStore>) -> Self {
        Self {
            durable,
            cached: Cell::new(None),
        }
    }

    /// Route that answered last, from this process or a previous session.
    /// Unknown persisted names are ignored.
    pub fn preferred_route(&self) -> Option<&'static str> {
        if let Some(name) = self.cached.get() {
            return Some(name);
        }
        let persisted = self.durable.get(CLASS_ROUTE_KEY)?;
        match find_route(persisted.trim()) {
            Some(route) => Some(route.name),
            None => {
                debug_log!("Ignoring unknown persisted class route '{}'", persisted);
                None
            }
        }
    }

    /// Remembered route first, then the rest in fixed order.
    pub fn try_order(&self) -> Vec<&'static RouteCandidate> {
        let preferred = self.preferred_route();
        let mut order: Vec<&'static RouteCandidate> = Vec::with_capacity(CLASS_ROUTES.len());
        if let Some(route) = preferred.and_then(find_route) {
            order.push(route);
        }
        order.extend(
            CLASS_ROUTES
                .iter()
                .filter(|r| Some(r.name) != preferred),
        );
        order
    }

    fn remember(&self, name: &'static str) {
        self.cached.set(Some(name));
        self.durable.set(CLASS_ROUTE_KEY, name);
    }

    /// Forget the remembered route, in memory and in storage.
    pub fn reset(&self) {
        self.cached.set(None);
        self.durable.remove(CLASS_ROUTE_KEY);
    }

    /// Probe routes in order and return the first 2xx answer, normalised.
    ///
    /// Requests are unauthenticated. Non-2xx answers and transport errors
    /// move on to the next route; a 2xx body that is not JSON is an error.
    pub async fn fetch_classes(
        &self,
        transport: &dyn HttpTransport,
        config: &ApiConfig,
        teacher_email: &str,
    ) -> Result<ClassList, ApiError> {
        let email = require(teacher_email, "Teacher email")?;
        let mut diagnostics = Vec::new();

        for route in self.try_order() {
            let url = route.url(config.base_url(), email);
            let request =
                HttpRequest::new(Method::Get, url.as_str()).header("Accept", "application/json");

            let response = match transport.send(request).await {
                Ok(response) => response,
                Err(e) => {
                    warn_log!("Class route {} unreachable: {}", route.name, e);
                    diagnostics.push(format!("{}: network error {} ({})", route.name, e, url));
                    continue;
                }
            };

            if !response.is_success() {
                debug_log!("Class route {} answered {}", route.name, response.status);
                diagnostics.push(format!(
                    "{}: {} {} ({})",
                    route.name, response.status, response.status_text, url
                ));
                continue;
            }

            let payload = serde_json::from_str(&response.body).map_err(|source| ApiError::Decode {
                endpoint: url.clone(),
                source,
            })?;
            debug_log!("Class route {} selected", route.name);
            self.remember(route.name);
            return Ok(normalize_class_list(payload));
        }

        Err(ApiError::Discovery { diagnostics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn urls_encode_the_email() {
        let route = find_route("teacher_classes_camel").unwrap();
        assert_eq!(
            route.url("https://h", "a+b@x.edu"),
            "https://h/get_teacher_classes?teacherEmail=a%2Bb%40x.edu"
        );
        assert_eq!(
            find_route("classes_path").unwrap().url("", "t@x.edu"),
            "/classes/teacher/t%40x.edu"
        );
    }

    #[test]
    fn default_order_is_fixed_priority() {
        let resolver = ClassRouteResolver::new(Rc::new(MemoryStore::new()));
        let names: Vec<_> = resolver.try_order().iter().map(|r| r.name).collect();
        let expected: Vec<_> = CLASS_ROUTES.iter().map(|r| r.name).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn persisted_route_goes_first_without_duplicates() {
        let mem = MemoryStore::new();
        mem.set(CLASS_ROUTE_KEY, "classes_snake");
        let resolver = ClassRouteResolver::new(Rc::new(mem));
        let names: Vec<_> = resolver.try_order().iter().map(|r| r.name).collect();
        assert_eq!(names.len(), 7);
        assert_eq!(names[0], "classes_snake");
        assert_eq!(names[1], "teacher_classes_path");
        assert_eq!(names.iter().filter(|n| **n == "classes_snake").count(), 1);
    }

    #[test]
    fn unknown_persisted_route_is_ignored() {
        let mem = MemoryStore::new();
        mem.set(CLASS_ROUTE_KEY, "made_up_route");
        let resolver = ClassRouteResolver::new(Rc::new(mem));
        assert_eq!(resolver.preferred_route(), None);
        assert_eq!(resolver.try_order()[0].name, "teacher_classes_path");
    }

    #[test]
    fn reset_forgets_both_caches() {
        let mem = MemoryStore::new();
        let resolver = ClassRouteResolver::new(Rc::new(mem.clone()));
        resolver.remember("classes_camel");
        assert_eq!(mem.get(CLASS_ROUTE_KEY).as_deref(), Some("classes_camel"));
        resolver.reset();
        assert_eq!(resolver.preferred_route(), None);
        assert!(mem.is_empty());
    }
}
