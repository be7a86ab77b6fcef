//! Repository modules for data access
//!
//! One repository per aggregate, each a trait with an sqlx implementation. Writes that
//! touch more than one table run inside a single transaction.

pub mod annotation;
pub mod recruitment;
pub mod resume;
pub mod team;
pub mod user;

pub use annotation::{AnnotationRepository, SqlxAnnotationRepository};
pub use recruitment::{RecruitmentRepository, SqlxRecruitmentRepository};
pub use resume::{ResumeRepository, SqlxResumeRepository};
pub use team::{SqlxTeamRepository, TeamRepository};
pub use user::{SqlxUserRepository, UserRepository};

use sqlx::{QueryBuilder, Sqlite};

/// Append ` IN (?, ?, ...)` binding every value.
pub(crate) fn push_in_list<I>(builder: &mut QueryBuilder<'_, Sqlite>, values: I)
where
    I: IntoIterator<Item = String>,
{
    builder.push(" IN (");
    let mut separated = builder.separated(", ");
    for value in values {
        separated.push_bind(value);
    }
    separated.push_unseparated(")");
}

/// Next free position in an ordered reference table, inside the caller's transaction.
pub(crate) async fn next_position(
    conn: &mut sqlx::SqliteConnection,
    table: &'static str,
    owner_column: &'static str,
    owner: &str,
) -> Result<i64, sqlx::Error> {
    let query = format!(
        "SELECT COALESCE(MAX(position), -1) + 1 FROM {} WHERE {} = $1",
        table, owner_column
    );
    sqlx::query_scalar(&query).bind(owner).fetch_one(conn).await
}
