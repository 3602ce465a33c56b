//! In-memory API double
//!
//! Stores objects as JSON per kind, assigns ids on create and merges PATCH
//! bodies member by member, so omitted members survive an update exactly as
//! they do on the real platform.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{ApiClient, ApiError, WireObject};
use crate::reconcile::Kind;

#[derive(Default)]
struct Store {
    next_id: i64,
    objects: HashMap<Kind, BTreeMap<i64, Value>>,
    /// Pending failures: operation and how many of its calls still pass first
    failures: Vec<(&'static str, usize)>,
    calls: Vec<&'static str>,
}

pub struct MemoryClient {
    customer_id: i64,
    /// Mimic an API that does not echo the id of a created object
    omit_created_id: bool,
    store: Mutex<Store>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self {
            customer_id: 1001,
            omit_created_id: false,
            store: Mutex::new(Store {
                next_id: 100,
                ..Default::default()
            }),
        }
    }

    pub fn without_created_id() -> Self {
        Self {
            omit_created_id: true,
            ..Self::new()
        }
    }

    /// Make the next call of `operation` fail with HTTP 500
    pub fn fail_next(&self, operation: &'static str) {
        self.fail_after(operation, 0);
    }

    /// Let `skip` calls of `operation` through, then fail the one after
    pub fn fail_after(&self, operation: &'static str, skip: usize) {
        self.store.lock().unwrap().failures.push((operation, skip));
    }

    /// Operations called so far, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.store.lock().unwrap().calls.clone()
    }

    /// Store an object directly, as if created by someone else
    pub fn insert<W: WireObject>(&self, object: &W) -> i64 {
        let mut store = self.store.lock().unwrap();
        let id = store.next_id;
        store.next_id += 1;

        let mut value = serde_json::to_value(object).unwrap();
        value["id"] = Value::from(id);
        store.objects.entry(W::KIND).or_default().insert(id, value);
        id
    }

    /// Change an object's name behind the reconciler's back
    pub fn rename(&self, kind: Kind, id: i64, name: &str) {
        let mut store = self.store.lock().unwrap();
        let object = store.objects.get_mut(&kind).and_then(|objects| objects.get_mut(&id)).unwrap();
        object["name"] = Value::from(name);
    }

    /// Remove an object behind the reconciler's back
    pub fn remove(&self, kind: Kind, id: i64) {
        let mut store = self.store.lock().unwrap();
        store.objects.get_mut(&kind).and_then(|objects| objects.remove(&id));
    }

    pub fn raw(&self, kind: Kind, id: i64) -> Option<Value> {
        let store = self.store.lock().unwrap();
        store.objects.get(&kind).and_then(|objects| objects.get(&id)).cloned()
    }

    pub fn count(&self, kind: Kind) -> usize {
        let store = self.store.lock().unwrap();
        store.objects.get(&kind).map_or(0, BTreeMap::len)
    }

    fn record(&self, operation: &'static str) -> Result<(), ApiError> {
        let mut store = self.store.lock().unwrap();
        store.calls.push(operation);
        let Some(pos) = store.failures.iter().position(|(op, _)| *op == operation) else {
            return Ok(());
        };
        if store.failures[pos].1 > 0 {
            store.failures[pos].1 -= 1;
            return Ok(());
        }
        store.failures.remove(pos);
        Err(ApiError::Status {
            status: 500,
            body: format!("injected {} failure", operation),
        })
    }
}

fn decode<W: WireObject>(value: &Value) -> Result<W, ApiError> {
    Ok(serde_json::from_value(value.clone())?)
}

#[async_trait]
impl ApiClient for MemoryClient {
    async fn id_by_name<W: WireObject>(&self, name: &str) -> Result<Option<i64>, ApiError> {
        self.record("id_by_name")?;
        let store = self.store.lock().unwrap();
        let id = store.objects.get(&W::KIND).and_then(|objects| {
            objects
                .iter()
                .find(|(_, object)| object["name"] == name)
                .map(|(id, _)| *id)
        });
        Ok(id)
    }

    async fn create<W: WireObject>(&self, object: &W) -> Result<W, ApiError> {
        self.record("create")?;
        let id = self.insert(object);
        let mut created = self.raw(W::KIND, id).ok_or(ApiError::NotFound)?;
        if self.omit_created_id {
            if let Some(members) = created.as_object_mut() {
                members.remove("id");
            }
        }
        decode(&created)
    }

    async fn get_by_id<W: WireObject>(&self, id: i64) -> Result<W, ApiError> {
        self.record("get_by_id")?;
        let object = self.raw(W::KIND, id).ok_or(ApiError::NotFound)?;
        decode(&object)
    }

    async fn update<W: WireObject>(&self, id: i64, object: &W) -> Result<W, ApiError> {
        self.record("update")?;
        let patch = serde_json::to_value(object)?;

        let mut store = self.store.lock().unwrap();
        let current = store
            .objects
            .get_mut(&W::KIND)
            .and_then(|objects| objects.get_mut(&id))
            .ok_or(ApiError::NotFound)?;
        if let (Some(current), Value::Object(patch)) = (current.as_object_mut(), patch) {
            for (member, value) in patch {
                current.insert(member, value);
            }
        }
        decode(current)
    }

    async fn delete<W: WireObject>(&self, id: i64) -> Result<(), ApiError> {
        self.record("delete")?;
        let mut store = self.store.lock().unwrap();
        store
            .objects
            .get_mut(&W::KIND)
            .and_then(|objects| objects.remove(&id))
            .map(|_| ())
            .ok_or(ApiError::NotFound)
    }

    async fn list_all<W: WireObject>(&self) -> Result<Vec<W>, ApiError> {
        self.record("list_all")?;
        let store = self.store.lock().unwrap();
        store
            .objects
            .get(&W::KIND)
            .map(|objects| objects.values().map(decode).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn customer_id(&self) -> i64 {
        self.customer_id
    }
}
