//! Application record store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete over the `job_applications` table.
//! - Enforce list scoping (`Owner` vs `All`) inside the query.
//!
//! # Invariants
//! - Lists are ordered by `applied_date DESC, created_at DESC, id ASC`.
//! - `update` validates the merged record before writing.
//! - Unknown status labels or malformed dates in storage are `InvalidData`.

use crate::db::DbError;
use crate::model::application::{
    ApplicationId, ApplicationPatch, ApplicationRecord, ApplicationStatus, ValidationError,
};
use crate::model::caller::ListScope;
use chrono::{NaiveDate, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

const APPLICATION_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    company,
    role,
    status,
    applied_date,
    notes,
    location,
    salary,
    type,
    contact_person,
    follow_up_date,
    job_url,
    created_at,
    updated_at
FROM job_applications";

pub type RepoResult<T> = Result<T, RepoError>;

/// Store-level error for application persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(ApplicationId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "application not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record store boundary used by services.
pub trait ApplicationStore {
    /// Lists records visible under `scope`.
    fn list(&self, scope: &ListScope) -> RepoResult<Vec<ApplicationRecord>>;
    /// Gets one record by id regardless of owner.
    fn get(&self, id: ApplicationId) -> RepoResult<Option<ApplicationRecord>>;
    /// Persists a new record and returns the stored row.
    fn create(&self, record: &ApplicationRecord) -> RepoResult<ApplicationRecord>;
    /// Applies a partial update and returns the stored row.
    fn update(&self, id: ApplicationId, patch: &ApplicationPatch)
        -> RepoResult<ApplicationRecord>;
    /// Hard-deletes one record.
    fn delete(&self, id: ApplicationId) -> RepoResult<()>;
}

/// SQLite-backed application store.
pub struct SqliteApplicationStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteApplicationStore<'conn> {
    /// Wraps a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ApplicationStore for SqliteApplicationStore<'_> {
    fn list(&self, scope: &ListScope) -> RepoResult<Vec<ApplicationRecord>> {
        let mut sql = format!("{APPLICATION_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let ListScope::Owner(user_id) = scope {
            sql.push_str(" AND user_id = ?");
            bind_values.push(Value::Text(user_id.clone()));
        }
        sql.push_str(" ORDER BY applied_date DESC, created_at DESC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_application_row(row)?);
        }
        Ok(records)
    }

    fn get(&self, id: ApplicationId) -> RepoResult<Option<ApplicationRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{APPLICATION_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_application_row(row)?));
        }
        Ok(None)
    }

    fn create(&self, record: &ApplicationRecord) -> RepoResult<ApplicationRecord> {
        record.validate()?;

        self.conn.execute(
            "INSERT INTO job_applications (
                id,
                user_id,
                company,
                role,
                status,
                applied_date,
                notes,
                location,
                salary,
                type,
                contact_person,
                follow_up_date,
                job_url,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15);",
            params![
                record.id.to_string(),
                record.user_id.as_str(),
                record.company.as_str(),
                record.role.as_str(),
                record.status.as_str(),
                format_date(record.applied_date),
                record.notes.as_str(),
                record.location.as_deref(),
                record.salary.as_deref(),
                record.job_type.as_deref(),
                record.contact_person.as_deref(),
                record.follow_up_date.map(format_date),
                record.job_url.as_deref(),
                record.created_at,
                record.updated_at,
            ],
        )?;

        self.get(record.id)?.ok_or(RepoError::NotFound(record.id))
    }

    fn update(
        &self,
        id: ApplicationId,
        patch: &ApplicationPatch,
    ) -> RepoResult<ApplicationRecord> {
        patch.validate()?;
        let mut record = self.get(id)?.ok_or(RepoError::NotFound(id))?;
        patch.apply_to(&mut record);
        record.validate()?;

        let changed = self.conn.execute(
            "UPDATE job_applications
             SET
                company = ?1,
                role = ?2,
                status = ?3,
                applied_date = ?4,
                notes = ?5,
                location = ?6,
                salary = ?7,
                type = ?8,
                contact_person = ?9,
                follow_up_date = ?10,
                job_url = ?11,
                updated_at = ?12
             WHERE id = ?13;",
            params![
                record.company.as_str(),
                record.role.as_str(),
                record.status.as_str(),
                format_date(record.applied_date),
                record.notes.as_str(),
                record.location.as_deref(),
                record.salary.as_deref(),
                record.job_type.as_deref(),
                record.contact_person.as_deref(),
                record.follow_up_date.map(format_date),
                record.job_url.as_deref(),
                Utc::now().timestamp_millis().max(record.created_at),
                id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.get(id)?.ok_or(RepoError::NotFound(id))
    }

    fn delete(&self, id: ApplicationId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM job_applications WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_application_row(row: &Row<'_>) -> RepoResult<ApplicationRecord> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in job_applications.id"))
    })?;

    let status_text: String = row.get("status")?;
    let status = ApplicationStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in job_applications.status"
        ))
    })?;

    let applied_text: String = row.get("applied_date")?;
    let applied_date = parse_date(&applied_text, "applied_date")?;

    let follow_up_date = match row.get::<_, Option<String>>("follow_up_date")? {
        Some(value) => Some(parse_date(&value, "follow_up_date")?),
        None => None,
    };

    let record = ApplicationRecord {
        id,
        user_id: row.get("user_id")?,
        company: row.get("company")?,
        role: row.get("role")?,
        status,
        applied_date,
        notes: row.get("notes")?,
        location: row.get("location")?,
        salary: row.get("salary")?,
        job_type: row.get("type")?,
        contact_person: row.get("contact_person")?,
        follow_up_date,
        job_url: row.get("job_url")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    record.validate()?;
    Ok(record)
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(value: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{value}` in job_applications.{column}"
        ))
    })
}
