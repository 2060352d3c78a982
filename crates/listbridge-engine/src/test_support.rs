//! In-memory stand-ins for the two remote services.
//!
//! Each fake client holds a handle to shared service-side state, so tests
//! can play the user (mutate the service between cycles), simulate a
//! restart (hand out a fresh client over the same state), and inspect the
//! mutations the engine issued.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use listbridge_types::{ItemId, PrimaryItem, PrimaryList, SecondaryList};

use crate::client::{PrimaryClient, SecondaryDriver};
use crate::error::{ClientError, DriverError};
use crate::signal::ChangeSignal;

pub(crate) fn item(id: &str, name: &str) -> PrimaryItem {
    PrimaryItem::new(id, name)
}

#[derive(Default)]
struct PrimaryState {
    list: Mutex<PrimaryList>,
    ops: Mutex<Vec<String>>,
    signal: ChangeSignal,
    next_id: AtomicU32,
}

/// The primary service plus the test's side-channel into it.
#[derive(Clone, Default)]
pub(crate) struct PrimaryService {
    state: Arc<PrimaryState>,
}

impl PrimaryService {
    pub fn new(items: Vec<PrimaryItem>) -> Self {
        let service = Self::default();
        *service.state.list.lock().unwrap() = PrimaryList::new(items);
        service
    }

    /// A client session over this service, with an empty snapshot cache.
    pub fn client(&self) -> FakePrimary {
        FakePrimary {
            state: Arc::clone(&self.state),
            cache: None,
        }
    }

    pub fn signal(&self) -> ChangeSignal {
        self.state.signal.clone()
    }

    pub fn list(&self) -> PrimaryList {
        self.state.list.lock().unwrap().clone()
    }

    /// Mutations the engine issued, in order.
    pub fn ops(&self) -> Vec<String> {
        self.state.ops.lock().unwrap().clone()
    }

    pub fn clear_ops(&self) {
        self.state.ops.lock().unwrap().clear();
    }

    // User edits: mutate the service and deliver the push notification.

    pub fn push(&self, item: PrimaryItem) {
        self.push_silently(item);
        self.state.signal.raise();
    }

    /// A mutation whose push notification got lost.
    pub fn push_silently(&self, item: PrimaryItem) {
        self.state.list.lock().unwrap().push(item);
    }

    pub fn set_checked(&self, id: &str, checked: bool) {
        let mut list = self.state.list.lock().unwrap();
        if let Some(item) = list.item_by_id_mut(&id.into()) {
            item.checked = checked;
        }
        self.state.signal.raise();
    }

    pub fn rename(&self, id: &str, name: &str) {
        let mut list = self.state.list.lock().unwrap();
        if let Some(item) = list.item_by_id_mut(&id.into()) {
            item.name = name.to_string();
        }
        self.state.signal.raise();
    }

    pub fn remove(&self, id: &str) {
        self.state.list.lock().unwrap().remove(&id.into());
        self.state.signal.raise();
    }

    fn allocate_id(&self) -> ItemId {
        let n = self.state.next_id.fetch_add(1, Ordering::Relaxed);
        ItemId::new(format!("auto-{n}"))
    }

    fn log(&self, op: String) {
        self.state.ops.lock().unwrap().push(op);
    }
}

/// One client session: snapshots are cached and refreshed when the push
/// signal has been raised, mirroring the real client's invalidation
/// behavior.
pub(crate) struct FakePrimary {
    state: Arc<PrimaryState>,
    cache: Option<PrimaryList>,
}

impl FakePrimary {
    fn service(&self) -> PrimaryService {
        PrimaryService {
            state: Arc::clone(&self.state),
        }
    }

    fn invalidate(&mut self) {
        self.cache = None;
    }
}

#[async_trait]
impl PrimaryClient for FakePrimary {
    async fn snapshot(&mut self) -> Result<PrimaryList, ClientError> {
        if self.cache.is_none() || self.state.signal.take() {
            self.cache = Some(self.state.list.lock().unwrap().clone());
        }
        Ok(self.cache.clone().unwrap_or_default())
    }

    async fn add(&mut self, name: &str) -> Result<PrimaryItem, ClientError> {
        let service = self.service();
        let item = PrimaryItem::new(service.allocate_id(), name);
        self.state.list.lock().unwrap().push(item.clone());
        service.log(format!("add:{name}"));
        self.invalidate();
        Ok(item)
    }

    async fn remove(&mut self, id: &ItemId) -> Result<(), ClientError> {
        self.state
            .list
            .lock()
            .unwrap()
            .remove(id)
            .ok_or_else(|| ClientError::ItemNotFound { id: id.clone() })?;
        self.service().log(format!("remove:{id}"));
        self.invalidate();
        Ok(())
    }

    async fn check(&mut self, id: &ItemId) -> Result<(), ClientError> {
        set_checked(self, id, true, "check")
    }

    async fn uncheck(&mut self, id: &ItemId) -> Result<(), ClientError> {
        set_checked(self, id, false, "uncheck")
    }

    async fn rename(&mut self, id: &ItemId, name: &str) -> Result<(), ClientError> {
        let mut list = self.state.list.lock().unwrap();
        let item = list
            .item_by_id_mut(id)
            .ok_or_else(|| ClientError::ItemNotFound { id: id.clone() })?;
        item.name = name.to_string();
        drop(list);
        self.service().log(format!("rename:{id}:{name}"));
        self.invalidate();
        Ok(())
    }

    async fn add_or_uncheck(&mut self, name: &str) -> Result<PrimaryItem, ClientError> {
        let existing = {
            let list = self.state.list.lock().unwrap();
            list.item_by_name(name).cloned()
        };
        match existing {
            None => self.add(name).await,
            Some(item) if item.checked => {
                self.uncheck(&item.id).await?;
                Ok(item.with_checked(false))
            }
            Some(item) => Ok(item),
        }
    }
}

fn set_checked(
    client: &mut FakePrimary,
    id: &ItemId,
    checked: bool,
    op: &str,
) -> Result<(), ClientError> {
    let mut list = client.state.list.lock().unwrap();
    let item = list
        .item_by_id_mut(id)
        .ok_or_else(|| ClientError::ItemNotFound { id: id.clone() })?;
    item.checked = checked;
    drop(list);
    client.service().log(format!("{op}:{id}"));
    client.invalidate();
    Ok(())
}

#[derive(Default)]
struct SecondaryState {
    list: Mutex<SecondaryList>,
    ops: Mutex<Vec<String>>,
    /// Number of further successful adds before injected failures begin.
    adds_before_failure: AtomicUsize,
}

/// The secondary service plus the test's side-channel into it.
#[derive(Clone)]
pub(crate) struct SecondaryService {
    state: Arc<SecondaryState>,
}

impl SecondaryService {
    pub fn new(names: impl IntoIterator<Item = &'static str>) -> Self {
        let state = SecondaryState {
            list: Mutex::new(SecondaryList::new(names)),
            ops: Mutex::new(Vec::new()),
            adds_before_failure: AtomicUsize::new(usize::MAX),
        };
        Self {
            state: Arc::new(state),
        }
    }

    pub fn driver(&self) -> FakeSecondary {
        FakeSecondary {
            state: Arc::clone(&self.state),
        }
    }

    pub fn list(&self) -> SecondaryList {
        self.state.list.lock().unwrap().clone()
    }

    pub fn ops(&self) -> Vec<String> {
        self.state.ops.lock().unwrap().clone()
    }

    pub fn clear_ops(&self) {
        self.state.ops.lock().unwrap().clear();
    }

    /// Let `successes` more adds through, then fail every add until reset.
    pub fn fail_adds_after(&self, successes: usize) {
        self.state
            .adds_before_failure
            .store(successes, Ordering::Relaxed);
    }

    // User edits.

    pub fn insert(&self, name: &str) {
        self.state.list.lock().unwrap().insert(name);
    }

    pub fn take(&self, name: &str) {
        self.state.list.lock().unwrap().remove(name);
    }
}

pub(crate) struct FakeSecondary {
    state: Arc<SecondaryState>,
}

#[async_trait]
impl SecondaryDriver for FakeSecondary {
    async fn snapshot(&mut self) -> Result<SecondaryList, DriverError> {
        Ok(self.state.list.lock().unwrap().clone())
    }

    async fn add(&mut self, name: &str) -> Result<(), DriverError> {
        let remaining = self.state.adds_before_failure.load(Ordering::Relaxed);
        if remaining == 0 {
            return Err(DriverError::Ui("injected add failure".into()));
        }
        if remaining != usize::MAX {
            self.state
                .adds_before_failure
                .store(remaining - 1, Ordering::Relaxed);
        }
        self.state.list.lock().unwrap().insert(name);
        self.state.ops.lock().unwrap().push(format!("add:{name}"));
        Ok(())
    }

    async fn remove(&mut self, name: &str) -> Result<(), DriverError> {
        self.state.list.lock().unwrap().remove(name);
        self.state.ops.lock().unwrap().push(format!("remove:{name}"));
        Ok(())
    }

    async fn rename(&mut self, old: &str, new: &str) -> Result<(), DriverError> {
        self.state.list.lock().unwrap().rename(old, new);
        self.state
            .ops
            .lock()
            .unwrap()
            .push(format!("rename:{old}->{new}"));
        Ok(())
    }
}
