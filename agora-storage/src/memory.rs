//! In-process store with the same observable semantics as the Postgres gateway.
//!
//! Natural keys are unique, references are checked on write, and deletes
//! apply the same `ON DELETE` effects as the SQL schema. Every repository call
//! is counted, and a single failure can be injected, so tests can assert that
//! a request never reached storage or that a store failure is normalized.

use crate::{HealthCheck, Repository, UpdateRepository};
use agora_core::{
    Agent, AgoraResult, Entity, Ethics, Feedback, Group, Influence, News,
    NewAgent, NewEthics, NewFeedback, NewGroup, NewInfluence, NewNews, NewRecommendation,
    NewRole, NewScaling, NewStage, NewTask, NewTraining, Recommendation, RecordId, Role,
    Scaling, Stage, StorageError, Task, Timestamp, Training,
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

// ============================================================================
// TABLES
// ============================================================================

/// Rows of one kind plus its id sequence.
#[derive(Debug, Clone)]
pub struct Table<E> {
    rows: Vec<E>,
    next_id: RecordId,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

impl<E: Entity> Table<E> {
    fn find(&self, key: &E::Key) -> Option<&E> {
        self.rows.iter().find(|row| row.key() == key)
    }

    fn position(&self, key: &E::Key) -> Option<usize> {
        self.rows.iter().position(|row| row.key() == key)
    }

    fn contains(&self, key: &E::Key) -> bool {
        self.find(key).is_some()
    }
}

/// All tables, guarded together by the store's single lock.
#[derive(Debug, Default)]
pub struct Tables {
    agents: Table<Agent>,
    roles: Table<Role>,
    tasks: Table<Task>,
    groups: Table<Group>,
    influences: Table<Influence>,
    stages: Table<Stage>,
    news: Table<News>,
    recommendations: Table<Recommendation>,
    training: Table<Training>,
    feedback: Table<Feedback>,
    ethics: Table<Ethics>,
    scaling: Table<Scaling>,
}

/// Per-kind hooks the in-memory store needs beyond [`Entity`].
pub trait MemEntity: Entity {
    fn table(tables: &Tables) -> &Table<Self>;

    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;

    /// Build the stored record, rejecting references to missing rows.
    fn build(
        draft: Self::Draft,
        id: RecordId,
        created_at: Timestamp,
        tables: &Tables,
    ) -> AgoraResult<Self>;

    /// Apply the `ON DELETE` effects of removing `removed` to other tables.
    fn on_delete(_removed: &Self, _tables: &mut Tables) {}
}

fn require_reference<E: MemEntity<Key = String>>(
    tables: &Tables,
    field: &'static str,
    key: &str,
) -> AgoraResult<()> {
    let key = key.to_string();
    if E::table(tables).contains(&key) {
        Ok(())
    } else {
        Err(StorageError::MissingReference {
            kind: E::KIND,
            field,
            key,
        }
        .into())
    }
}

macro_rules! mem_table {
    ($field:ident) => {
        fn table(tables: &Tables) -> &Table<Self> {
            &tables.$field
        }

        fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
            &mut tables.$field
        }
    };
}

impl MemEntity for Agent {
    mem_table!(agents);

    fn build(draft: NewAgent, id: RecordId, created_at: Timestamp, tables: &Tables) -> AgoraResult<Self> {
        if let Some(role) = &draft.role {
            require_reference::<Role>(tables, "role", role)?;
        }
        Ok(Agent {
            id,
            name: draft.name,
            model: draft.model,
            role: draft.role,
            created_at,
        })
    }

    fn on_delete(removed: &Self, tables: &mut Tables) {
        for task in tables.tasks.rows.iter_mut() {
            if task.agent.as_deref() == Some(removed.name.as_str()) {
                task.agent = None;
            }
        }
    }
}

impl MemEntity for Role {
    mem_table!(roles);

    fn build(draft: NewRole, id: RecordId, created_at: Timestamp, _tables: &Tables) -> AgoraResult<Self> {
        Ok(Role {
            id,
            name: draft.name,
            description: draft.description,
            created_at,
        })
    }

    fn on_delete(removed: &Self, tables: &mut Tables) {
        for agent in tables.agents.rows.iter_mut() {
            if agent.role.as_deref() == Some(removed.name.as_str()) {
                agent.role = None;
            }
        }
    }
}

impl MemEntity for Task {
    mem_table!(tasks);

    fn build(draft: NewTask, id: RecordId, created_at: Timestamp, tables: &Tables) -> AgoraResult<Self> {
        if let Some(agent) = &draft.agent {
            require_reference::<Agent>(tables, "agent", agent)?;
        }
        Ok(Task {
            id,
            name: draft.name,
            action: draft.action,
            agent: draft.agent,
            created_at,
        })
    }

    fn on_delete(removed: &Self, tables: &mut Tables) {
        for group in tables.groups.rows.iter_mut() {
            group.tasks.retain(|task| task != &removed.name);
        }
    }
}

impl MemEntity for Group {
    mem_table!(groups);

    fn build(draft: NewGroup, id: RecordId, created_at: Timestamp, tables: &Tables) -> AgoraResult<Self> {
        for task in &draft.tasks {
            require_reference::<Task>(tables, "tasks", task)?;
        }
        Ok(Group {
            id,
            name: draft.name,
            members: draft.members,
            tasks: draft.tasks,
            created_at,
        })
    }
}

impl MemEntity for Influence {
    mem_table!(influences);

    fn build(draft: NewInfluence, id: RecordId, created_at: Timestamp, _tables: &Tables) -> AgoraResult<Self> {
        Ok(Influence {
            id,
            name: draft.name,
            effect: draft.effect,
            created_at,
        })
    }
}

impl MemEntity for Stage {
    mem_table!(stages);

    fn build(draft: NewStage, id: RecordId, created_at: Timestamp, _tables: &Tables) -> AgoraResult<Self> {
        Ok(Stage {
            id,
            name: draft.name,
            description: draft.description,
            created_at,
        })
    }
}

impl MemEntity for News {
    mem_table!(news);

    fn build(draft: NewNews, id: RecordId, created_at: Timestamp, _tables: &Tables) -> AgoraResult<Self> {
        Ok(News {
            id,
            title: draft.title,
            content: draft.content,
            created_at,
        })
    }
}

impl MemEntity for Recommendation {
    mem_table!(recommendations);

    fn build(
        draft: NewRecommendation,
        id: RecordId,
        created_at: Timestamp,
        _tables: &Tables,
    ) -> AgoraResult<Self> {
        Ok(Recommendation {
            id,
            title: draft.title,
            content: draft.content,
            created_at,
        })
    }
}

impl MemEntity for Training {
    mem_table!(training);

    fn build(draft: NewTraining, id: RecordId, created_at: Timestamp, _tables: &Tables) -> AgoraResult<Self> {
        Ok(Training {
            id,
            title: draft.title,
            content: draft.content,
            created_at,
        })
    }
}

impl MemEntity for Feedback {
    mem_table!(feedback);

    fn build(draft: NewFeedback, id: RecordId, created_at: Timestamp, _tables: &Tables) -> AgoraResult<Self> {
        Ok(Feedback {
            id,
            user: draft.user,
            content: draft.content,
            created_at,
        })
    }
}

impl MemEntity for Ethics {
    mem_table!(ethics);

    fn build(draft: NewEthics, id: RecordId, created_at: Timestamp, _tables: &Tables) -> AgoraResult<Self> {
        Ok(Ethics {
            id,
            principles: draft.principles,
            created_at,
        })
    }
}

impl MemEntity for Scaling {
    mem_table!(scaling);

    fn build(draft: NewScaling, id: RecordId, created_at: Timestamp, _tables: &Tables) -> AgoraResult<Self> {
        Ok(Scaling {
            id,
            strategy: draft.strategy,
            created_at,
        })
    }
}

// ============================================================================
// STORE
// ============================================================================

/// In-memory store implementing every repository.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    calls: AtomicUsize,
    injected: Mutex<Option<StorageError>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of repository and ping calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make the next repository or ping call fail with `err`.
    pub fn fail_next(&self, err: StorageError) {
        if let Ok(mut slot) = self.injected.lock() {
            *slot = Some(err);
        }
    }

    /// Count the call and surface any injected failure.
    fn enter(&self) -> AgoraResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut slot = self.injected.lock().map_err(|_| StorageError::LockPoisoned)?;
        match slot.take() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    fn read(&self) -> AgoraResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| StorageError::LockPoisoned.into())
    }

    fn write(&self) -> AgoraResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StorageError::LockPoisoned.into())
    }
}

fn conflict<E: Entity>(key: &E::Key) -> StorageError {
    StorageError::Conflict {
        kind: E::KIND,
        key: key.to_string(),
    }
}

#[async_trait]
impl<E: MemEntity> Repository<E> for MemoryStore {
    async fn create(&self, draft: E::Draft) -> AgoraResult<E> {
        self.enter()?;
        let mut tables = self.write()?;

        let id = E::table(&tables).next_id;
        let record = E::build(draft, id, Utc::now(), &tables)?;
        if E::table(&tables).contains(record.key()) {
            return Err(conflict::<E>(record.key()).into());
        }

        let table = E::table_mut(&mut tables);
        table.next_id += 1;
        table.rows.push(record.clone());
        Ok(record)
    }

    async fn get_by_key(&self, key: &E::Key) -> AgoraResult<Option<E>> {
        self.enter()?;
        let tables = self.read()?;
        Ok(E::table(&tables).find(key).cloned())
    }

    async fn delete_by_key(&self, key: &E::Key) -> AgoraResult<bool> {
        self.enter()?;
        let mut tables = self.write()?;
        let table = E::table_mut(&mut tables);
        let Some(index) = table.position(key) else {
            return Ok(false);
        };
        let removed = table.rows.remove(index);
        E::on_delete(&removed, &mut tables);
        Ok(true)
    }

    async fn list_all(&self) -> AgoraResult<Vec<E>> {
        self.enter()?;
        let tables = self.read()?;
        Ok(E::table(&tables).rows.clone())
    }
}

#[async_trait]
impl UpdateRepository<Task> for MemoryStore {
    async fn update_by_key(&self, key: &String, draft: NewTask) -> AgoraResult<Option<Task>> {
        self.enter()?;
        let mut tables = self.write()?;

        let Some(index) = tables.tasks.position(key) else {
            return Ok(None);
        };
        if let Some(agent) = &draft.agent {
            require_reference::<Agent>(&tables, "agent", agent)?;
        }
        if &draft.name != key && tables.tasks.contains(&draft.name) {
            return Err(conflict::<Task>(&draft.name).into());
        }

        let task = &mut tables.tasks.rows[index];
        let old_name = std::mem::replace(&mut task.name, draft.name);
        task.action = draft.action;
        task.agent = draft.agent;
        let updated = task.clone();

        if old_name != updated.name {
            for group in tables.groups.rows.iter_mut() {
                for name in group.tasks.iter_mut() {
                    if *name == old_name {
                        name.clone_from(&updated.name);
                    }
                }
            }
        }
        Ok(Some(updated))
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> AgoraResult<()> {
        self.enter()?;
        self.read().map(|_| ())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
