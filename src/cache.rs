//! Local copies of the last class and student lists seen from the backend.

use std::rc::Rc;

use serde_json::Value;

use crate::constants::{CLASS_CACHE_PREFIX, STUDENT_CACHE_PREFIX};
use crate::network::normalize::ClassList;
use crate::storage::KeyValueStore;

#[derive(Clone)]
pub struct StudentCache {
    store: Rc<dyn KeyValueStore>,
}

impl StudentCache {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(class_name: &str) -> String {
        format!("{}{}", STUDENT_CACHE_PREFIX, class_name)
    }

    /// Last known students for a class; empty when unknown or unreadable.
    pub fn get(&self, class_name: &str) -> Vec<Value> {
        self.store
            .get(&Self::key(class_name))
            .and_then(|raw| serde_json::from_str::<Vec<Value>>(&raw).ok())
            .unwrap_or_default()
    }

    pub fn put(&self, class_name: &str, students: &[Value]) {
        match serde_json::to_string(students) {
            Ok(raw) => self.store.set(&Self::key(class_name), &raw),
            Err(e) => crate::warn_log!("Failed to serialise students for {}: {}", class_name, e),
        }
    }
}

#[derive(Clone)]
pub struct ClassCache {
    store: Rc<dyn KeyValueStore>,
}

impl ClassCache {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(teacher_email: &str) -> String {
        format!("{}{}", CLASS_CACHE_PREFIX, teacher_email)
    }

    pub fn get(&self, teacher_email: &str) -> Option<ClassList> {
        self.store
            .get(&Self::key(teacher_email))
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    pub fn put(&self, teacher_email: &str, classes: &ClassList) {
        match serde_json::to_string(classes) {
            Ok(raw) => self.store.set(&Self::key(teacher_email), &raw),
            Err(e) => crate::warn_log!("Failed to serialise classes for {}: {}", teacher_email, e),
        }
    }
}
