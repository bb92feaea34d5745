//! Public site content (news, events, projects, downloads, about)

pub mod about;
pub mod downloads;
pub mod events;
pub mod news;
pub mod projects;

use sqlx::PgPool;

/// Tables that carry a `display_order` column
#[derive(Debug, Clone, Copy)]
pub enum Ordered {
    Events,
    Projects,
    Downloads,
    About,
}

impl Ordered {
    fn table(self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Projects => "projects",
            Self::Downloads => "downloads",
            Self::About => "about_sections",
        }
    }
}

/// Set `display_order` to each id's position in `ids`; unknown ids are ignored
pub async fn reorder(
    pool: &PgPool,
    kind: Ordered,
    ids: &[i64],
    now: i64,
) -> Result<u64, sqlx::Error> {
    let sql = format!(
        "UPDATE {table} AS t
         SET display_order = (o.position - 1)::int, updated_at = $2
         FROM unnest($1::bigint[]) WITH ORDINALITY AS o(id, position)
         WHERE t.id = o.id",
        table = kind.table()
    );
    let result = sqlx::query(&sql).bind(ids).bind(now).execute(pool).await?;
    Ok(result.rows_affected())
}

/// Next free slot at the end of an ordered list
pub async fn next_display_order(pool: &PgPool, kind: Ordered) -> Result<i32, sqlx::Error> {
    let sql = format!(
        "SELECT COALESCE(MAX(display_order) + 1, 0) FROM {}",
        kind.table()
    );
    let (next,): (i32,) = sqlx::query_as(&sql).fetch_one(pool).await?;
    Ok(next)
}
