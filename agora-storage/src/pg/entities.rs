//! Per-entity SQL.
//!
//! Natural keys address rows in every statement; the `id` and `created_at`
//! columns are filled in by the database and read back with `RETURNING`.

use super::{db_error, write_error};
use agora_core::{
    Agent, AgoraResult, Entity, EntityKind, Ethics, Feedback, Group, Influence, NewAgent,
    NewEthics, NewGroup, NewScaling, NewTask, News, Recommendation, RecordId, Role, Scaling,
    Stage, StorageError, Task, Training,
};
use async_trait::async_trait;
use tokio_postgres::{Client, Row, Transaction};

/// SQL for one entity kind, driven by [`super::PgStore`].
///
/// Writes receive the call's transaction; reads receive the pooled client.
#[async_trait]
pub trait PgEntity: Entity + FromRow {
    async fn insert(tx: &Transaction<'_>, draft: &Self::Draft) -> AgoraResult<Self>;

    async fn fetch(client: &Client, key: &Self::Key) -> AgoraResult<Option<Self>>;

    async fn remove(tx: &Transaction<'_>, key: &Self::Key) -> AgoraResult<bool>;

    async fn fetch_all(client: &Client) -> AgoraResult<Vec<Self>>;
}

/// Build a record from a row selected with the kind's column list.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> AgoraResult<Self>;
}

fn first<E: FromRow>(row: Option<Row>) -> AgoraResult<Option<E>> {
    row.as_ref().map(E::from_row).transpose()
}

fn all<E: FromRow>(rows: Vec<Row>) -> AgoraResult<Vec<E>> {
    rows.iter().map(E::from_row).collect()
}

/// Id of the row of `kind` named `name`, or a missing-reference error naming `field`.
async fn reference_id(
    tx: &Transaction<'_>,
    kind: EntityKind,
    field: &'static str,
    name: &str,
) -> AgoraResult<RecordId> {
    let sql = format!("SELECT id FROM {} WHERE name = $1", kind.table());
    let row = tx.query_opt(sql.as_str(), &[&name]).await.map_err(db_error)?;
    match row {
        Some(row) => row.try_get(0).map_err(db_error),
        None => Err(StorageError::MissingReference {
            kind,
            field,
            key: name.to_string(),
        }
        .into()),
    }
}

async fn optional_reference_id(
    tx: &Transaction<'_>,
    kind: EntityKind,
    field: &'static str,
    name: Option<&str>,
) -> AgoraResult<Option<RecordId>> {
    match name {
        Some(name) => reference_id(tx, kind, field, name).await.map(Some),
        None => Ok(None),
    }
}

// ============================================================================
// KEY + TEXT RECORDS
// ============================================================================

/// SQL for records made of a natural key and one text column.
macro_rules! pg_text_entity {
    ($record:ident, $table:literal, $key:ident => $key_col:literal, $value:ident => $value_col:literal) => {
        impl FromRow for $record {
            fn from_row(row: &Row) -> AgoraResult<Self> {
                Ok($record {
                    id: row.try_get("id").map_err(db_error)?,
                    $key: row.try_get($key_col).map_err(db_error)?,
                    $value: row.try_get($value_col).map_err(db_error)?,
                    created_at: row.try_get("created_at").map_err(db_error)?,
                })
            }
        }

        #[async_trait]
        impl PgEntity for $record {
            async fn insert(tx: &Transaction<'_>, draft: &Self::Draft) -> AgoraResult<Self> {
                let row = tx
                    .query_one(
                        concat!(
                            "INSERT INTO ", $table, " (", $key_col, ", ", $value_col, ") ",
                            "VALUES ($1, $2) RETURNING id, created_at"
                        ),
                        &[&draft.$key, &draft.$value],
                    )
                    .await
                    .map_err(|e| write_error(e, Self::KIND, &draft.$key))?;
                Ok($record {
                    id: row.try_get("id").map_err(db_error)?,
                    $key: draft.$key.clone(),
                    $value: draft.$value.clone(),
                    created_at: row.try_get("created_at").map_err(db_error)?,
                })
            }

            async fn fetch(client: &Client, key: &Self::Key) -> AgoraResult<Option<Self>> {
                let row = client
                    .query_opt(
                        concat!(
                            "SELECT id, ", $key_col, ", ", $value_col, ", created_at FROM ",
                            $table, " WHERE ", $key_col, " = $1"
                        ),
                        &[key],
                    )
                    .await
                    .map_err(db_error)?;
                first(row)
            }

            async fn remove(tx: &Transaction<'_>, key: &Self::Key) -> AgoraResult<bool> {
                let removed = tx
                    .execute(
                        concat!("DELETE FROM ", $table, " WHERE ", $key_col, " = $1"),
                        &[key],
                    )
                    .await
                    .map_err(db_error)?;
                Ok(removed > 0)
            }

            async fn fetch_all(client: &Client) -> AgoraResult<Vec<Self>> {
                let rows = client
                    .query(
                        concat!(
                            "SELECT id, ", $key_col, ", ", $value_col, ", created_at FROM ",
                            $table, " ORDER BY id"
                        ),
                        &[],
                    )
                    .await
                    .map_err(db_error)?;
                all(rows)
            }
        }
    };
}

pg_text_entity!(Role, "roles", name => "name", description => "description");
pg_text_entity!(Influence, "influences", name => "name", effect => "effect");
pg_text_entity!(Stage, "stages", name => "name", description => "description");
pg_text_entity!(News, "news", title => "title", content => "content");
pg_text_entity!(Recommendation, "recommendations", title => "title", content => "content");
pg_text_entity!(Training, "training", title => "title", content => "content");
pg_text_entity!(Feedback, "feedback", user => "user_name", content => "content");

// ============================================================================
// AGENTS
// ============================================================================

const AGENT_SELECT: &str = "SELECT a.id, a.name, a.model, r.name AS role, a.created_at \
     FROM agents a LEFT JOIN roles r ON r.id = a.role_id";

impl FromRow for Agent {
    fn from_row(row: &Row) -> AgoraResult<Self> {
        Ok(Agent {
            id: row.try_get("id").map_err(db_error)?,
            name: row.try_get("name").map_err(db_error)?,
            model: row.try_get("model").map_err(db_error)?,
            role: row.try_get("role").map_err(db_error)?,
            created_at: row.try_get("created_at").map_err(db_error)?,
        })
    }
}

#[async_trait]
impl PgEntity for Agent {
    async fn insert(tx: &Transaction<'_>, draft: &NewAgent) -> AgoraResult<Self> {
        let role_id =
            optional_reference_id(tx, EntityKind::Role, "role", draft.role.as_deref()).await?;
        let row = tx
            .query_one(
                "INSERT INTO agents (name, model, role_id) VALUES ($1, $2, $3) \
                 RETURNING id, created_at",
                &[&draft.name, &draft.model, &role_id],
            )
            .await
            .map_err(|e| write_error(e, Self::KIND, &draft.name))?;
        Ok(Agent {
            id: row.try_get("id").map_err(db_error)?,
            name: draft.name.clone(),
            model: draft.model.clone(),
            role: draft.role.clone(),
            created_at: row.try_get("created_at").map_err(db_error)?,
        })
    }

    async fn fetch(client: &Client, key: &String) -> AgoraResult<Option<Self>> {
        let sql = format!("{AGENT_SELECT} WHERE a.name = $1");
        let row = client.query_opt(sql.as_str(), &[key]).await.map_err(db_error)?;
        first(row)
    }

    async fn remove(tx: &Transaction<'_>, key: &String) -> AgoraResult<bool> {
        let removed = tx
            .execute("DELETE FROM agents WHERE name = $1", &[key])
            .await
            .map_err(db_error)?;
        Ok(removed > 0)
    }

    async fn fetch_all(client: &Client) -> AgoraResult<Vec<Self>> {
        let sql = format!("{AGENT_SELECT} ORDER BY a.id");
        let rows = client.query(sql.as_str(), &[]).await.map_err(db_error)?;
        all(rows)
    }
}

// ============================================================================
// TASKS
// ============================================================================

const TASK_SELECT: &str = "SELECT t.id, t.name, t.action, a.name AS agent, t.created_at \
     FROM tasks t LEFT JOIN agents a ON a.id = t.agent_id";

impl FromRow for Task {
    fn from_row(row: &Row) -> AgoraResult<Self> {
        Ok(Task {
            id: row.try_get("id").map_err(db_error)?,
            name: row.try_get("name").map_err(db_error)?,
            action: row.try_get("action").map_err(db_error)?,
            agent: row.try_get("agent").map_err(db_error)?,
            created_at: row.try_get("created_at").map_err(db_error)?,
        })
    }
}

#[async_trait]
impl PgEntity for Task {
    async fn insert(tx: &Transaction<'_>, draft: &NewTask) -> AgoraResult<Self> {
        let agent_id =
            optional_reference_id(tx, EntityKind::Agent, "agent", draft.agent.as_deref()).await?;
        let row = tx
            .query_one(
                "INSERT INTO tasks (name, action, agent_id) VALUES ($1, $2, $3) \
                 RETURNING id, created_at",
                &[&draft.name, &draft.action, &agent_id],
            )
            .await
            .map_err(|e| write_error(e, Self::KIND, &draft.name))?;
        Ok(Task {
            id: row.try_get("id").map_err(db_error)?,
            name: draft.name.clone(),
            action: draft.action.clone(),
            agent: draft.agent.clone(),
            created_at: row.try_get("created_at").map_err(db_error)?,
        })
    }

    async fn fetch(client: &Client, key: &String) -> AgoraResult<Option<Self>> {
        let sql = format!("{TASK_SELECT} WHERE t.name = $1");
        let row = client.query_opt(sql.as_str(), &[key]).await.map_err(db_error)?;
        first(row)
    }

    async fn remove(tx: &Transaction<'_>, key: &String) -> AgoraResult<bool> {
        let removed = tx
            .execute("DELETE FROM tasks WHERE name = $1", &[key])
            .await
            .map_err(db_error)?;
        Ok(removed > 0)
    }

    async fn fetch_all(client: &Client) -> AgoraResult<Vec<Self>> {
        let sql = format!("{TASK_SELECT} ORDER BY t.id");
        let rows = client.query(sql.as_str(), &[]).await.map_err(db_error)?;
        all(rows)
    }
}

/// Replace every field of the task at `key`. `Ok(None)` if there is none.
pub(crate) async fn update_task(
    tx: &Transaction<'_>,
    key: &str,
    draft: &NewTask,
) -> AgoraResult<Option<Task>> {
    let existing = tx
        .query_opt("SELECT id FROM tasks WHERE name = $1 FOR UPDATE", &[&key])
        .await
        .map_err(db_error)?;
    let Some(existing) = existing else {
        return Ok(None);
    };
    let id: RecordId = existing.try_get(0).map_err(db_error)?;

    let agent_id =
        optional_reference_id(tx, EntityKind::Agent, "agent", draft.agent.as_deref()).await?;
    let row = tx
        .query_one(
            "UPDATE tasks SET name = $2, action = $3, agent_id = $4 WHERE id = $1 \
             RETURNING created_at",
            &[&id, &draft.name, &draft.action, &agent_id],
        )
        .await
        .map_err(|e| write_error(e, EntityKind::Task, &draft.name))?;

    Ok(Some(Task {
        id,
        name: draft.name.clone(),
        action: draft.action.clone(),
        agent: draft.agent.clone(),
        created_at: row.try_get("created_at").map_err(db_error)?,
    }))
}

// ============================================================================
// GROUPS
// ============================================================================

const GROUP_SELECT: &str = "SELECT g.id, g.name, g.members, g.created_at, \
     COALESCE(array_agg(t.name ORDER BY gt.position) FILTER (WHERE t.name IS NOT NULL), '{}') AS tasks \
     FROM groups g \
     LEFT JOIN group_tasks gt ON gt.group_id = g.id \
     LEFT JOIN tasks t ON t.id = gt.task_id";

impl FromRow for Group {
    fn from_row(row: &Row) -> AgoraResult<Self> {
        Ok(Group {
            id: row.try_get("id").map_err(db_error)?,
            name: row.try_get("name").map_err(db_error)?,
            members: row.try_get("members").map_err(db_error)?,
            tasks: row.try_get("tasks").map_err(db_error)?,
            created_at: row.try_get("created_at").map_err(db_error)?,
        })
    }
}

#[async_trait]
impl PgEntity for Group {
    async fn insert(tx: &Transaction<'_>, draft: &NewGroup) -> AgoraResult<Self> {
        let row = tx
            .query_one(
                "INSERT INTO groups (name, members) VALUES ($1, $2) RETURNING id, created_at",
                &[&draft.name, &draft.members],
            )
            .await
            .map_err(|e| write_error(e, Self::KIND, &draft.name))?;
        let id: RecordId = row.try_get("id").map_err(db_error)?;

        for (position, task) in draft.tasks.iter().enumerate() {
            let task_id = reference_id(tx, EntityKind::Task, "tasks", task).await?;
            tx.execute(
                "INSERT INTO group_tasks (group_id, task_id, position) VALUES ($1, $2, $3)",
                &[&id, &task_id, &(position as i32)],
            )
            .await
            .map_err(db_error)?;
        }

        Ok(Group {
            id,
            name: draft.name.clone(),
            members: draft.members.clone(),
            tasks: draft.tasks.clone(),
            created_at: row.try_get("created_at").map_err(db_error)?,
        })
    }

    async fn fetch(client: &Client, key: &String) -> AgoraResult<Option<Self>> {
        let sql = format!("{GROUP_SELECT} WHERE g.name = $1 GROUP BY g.id");
        let row = client.query_opt(sql.as_str(), &[key]).await.map_err(db_error)?;
        first(row)
    }

    async fn remove(tx: &Transaction<'_>, key: &String) -> AgoraResult<bool> {
        let removed = tx
            .execute("DELETE FROM groups WHERE name = $1", &[key])
            .await
            .map_err(db_error)?;
        Ok(removed > 0)
    }

    async fn fetch_all(client: &Client) -> AgoraResult<Vec<Self>> {
        let sql = format!("{GROUP_SELECT} GROUP BY g.id ORDER BY g.id");
        let rows = client.query(sql.as_str(), &[]).await.map_err(db_error)?;
        all(rows)
    }
}

// ============================================================================
// ETHICS
// ============================================================================

const ETHICS_SELECT: &str = "SELECT e.id, e.created_at, \
     COALESCE(array_agg(p.principle ORDER BY p.position) FILTER (WHERE p.principle IS NOT NULL), '{}') AS principles \
     FROM ethics e \
     LEFT JOIN ethics_principles p ON p.ethics_id = e.id";

impl FromRow for Ethics {
    fn from_row(row: &Row) -> AgoraResult<Self> {
        Ok(Ethics {
            id: row.try_get("id").map_err(db_error)?,
            principles: row.try_get("principles").map_err(db_error)?,
            created_at: row.try_get("created_at").map_err(db_error)?,
        })
    }
}

#[async_trait]
impl PgEntity for Ethics {
    async fn insert(tx: &Transaction<'_>, draft: &NewEthics) -> AgoraResult<Self> {
        let row = tx
            .query_one("INSERT INTO ethics DEFAULT VALUES RETURNING id, created_at", &[])
            .await
            .map_err(db_error)?;
        let id: RecordId = row.try_get("id").map_err(db_error)?;

        tx.execute(
            "INSERT INTO ethics_principles (ethics_id, position, principle) \
             SELECT $1, u.ord::int, u.principle \
             FROM unnest($2::text[]) WITH ORDINALITY AS u(principle, ord)",
            &[&id, &draft.principles],
        )
        .await
        .map_err(db_error)?;

        Ok(Ethics {
            id,
            principles: draft.principles.clone(),
            created_at: row.try_get("created_at").map_err(db_error)?,
        })
    }

    async fn fetch(client: &Client, key: &RecordId) -> AgoraResult<Option<Self>> {
        let sql = format!("{ETHICS_SELECT} WHERE e.id = $1 GROUP BY e.id");
        let row = client.query_opt(sql.as_str(), &[key]).await.map_err(db_error)?;
        first(row)
    }

    async fn remove(tx: &Transaction<'_>, key: &RecordId) -> AgoraResult<bool> {
        let removed = tx
            .execute("DELETE FROM ethics WHERE id = $1", &[key])
            .await
            .map_err(db_error)?;
        Ok(removed > 0)
    }

    async fn fetch_all(client: &Client) -> AgoraResult<Vec<Self>> {
        let sql = format!("{ETHICS_SELECT} GROUP BY e.id ORDER BY e.id");
        let rows = client.query(sql.as_str(), &[]).await.map_err(db_error)?;
        all(rows)
    }
}

// ============================================================================
// SCALING
// ============================================================================

impl FromRow for Scaling {
    fn from_row(row: &Row) -> AgoraResult<Self> {
        Ok(Scaling {
            id: row.try_get("id").map_err(db_error)?,
            strategy: row.try_get("strategy").map_err(db_error)?,
            created_at: row.try_get("created_at").map_err(db_error)?,
        })
    }
}

#[async_trait]
impl PgEntity for Scaling {
    async fn insert(tx: &Transaction<'_>, draft: &NewScaling) -> AgoraResult<Self> {
        let row = tx
            .query_one(
                "INSERT INTO scaling (strategy) VALUES ($1) RETURNING id, created_at",
                &[&draft.strategy],
            )
            .await
            .map_err(db_error)?;
        Ok(Scaling {
            id: row.try_get("id").map_err(db_error)?,
            strategy: draft.strategy.clone(),
            created_at: row.try_get("created_at").map_err(db_error)?,
        })
    }

    async fn fetch(client: &Client, key: &RecordId) -> AgoraResult<Option<Self>> {
        let row = client
            .query_opt(
                "SELECT id, strategy, created_at FROM scaling WHERE id = $1",
                &[key],
            )
            .await
            .map_err(db_error)?;
        first(row)
    }

    async fn remove(tx: &Transaction<'_>, key: &RecordId) -> AgoraResult<bool> {
        let removed = tx
            .execute("DELETE FROM scaling WHERE id = $1", &[key])
            .await
            .map_err(db_error)?;
        Ok(removed > 0)
    }

    async fn fetch_all(client: &Client) -> AgoraResult<Vec<Self>> {
        let rows = client
            .query("SELECT id, strategy, created_at FROM scaling ORDER BY id", &[])
            .await
            .map_err(db_error)?;
        all(rows)
    }
}
