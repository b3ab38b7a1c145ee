use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::app::AppError;
use crate::database::db_utils::PgPool;
use crate::database::models::user::{NewUser, Role, User, UserChanges};
use crate::database::IdentityStore;
use crate::schema::users;

/// Identity Store backed by the postgres pool.
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> PgIdentityStore {
        PgIdentityStore { pool }
    }
}

impl IdentityStore for PgIdentityStore {
    fn create(&self, new: NewUser) -> Result<User, AppError> {
        let mut conn = self.pool.get()?;
        let now = Utc::now().naive_utc();

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            bio: None,
            avatar: None,
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(users::table)
            .values(&user)
            .execute(&mut conn)?;

        Ok(user)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let mut conn = self.pool.get()?;

        Ok(users::table
            .filter(users::id.eq(id))
            .first::<User>(&mut conn)
            .optional()?)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let mut conn = self.pool.get()?;

        Ok(users::table
            .filter(users::email.eq(email))
            .first::<User>(&mut conn)
            .optional()?)
    }

    fn update(&self, id: &str, changes: UserChanges) -> Result<User, AppError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(users::table.filter(users::id.eq(id)))
            .set((&changes, users::updated_at.eq(Utc::now().naive_utc())))
            .get_result::<User>(&mut conn)?;

        Ok(updated)
    }

    fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut conn = self.pool.get()?;

        diesel::delete(users::table.filter(users::id.eq(id))).execute(&mut conn)?;

        Ok(())
    }

    fn search(&self, query: Option<&str>) -> Result<Vec<User>, AppError> {
        let mut conn = self.pool.get()?;

        let found = match query {
            Some(q) => {
                let pattern = format!("%{}%", q);
                users::table
                    .filter(
                        users::name
                            .ilike(pattern.clone())
                            .or(users::email.ilike(pattern)),
                    )
                    .order(users::created_at.desc())
                    .load::<User>(&mut conn)?
            }
            None => users::table
                .order(users::created_at.desc())
                .load::<User>(&mut conn)?,
        };

        Ok(found)
    }

    fn count_role(&self, role: Role) -> Result<i64, AppError> {
        let mut conn = self.pool.get()?;

        Ok(users::table
            .filter(users::role.eq(role))
            .count()
            .get_result::<i64>(&mut conn)?)
    }
}
