use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds the postgres connection pool used by the stores.
pub fn psql_connect_to_db(database_url: &str) -> PgPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    Pool::builder()
        .build(manager)
        .unwrap_or_else(|err| panic!("Error connecting to {}: {}", database_url, err))
}
