use diesel::prelude::*;

use crate::schema::likes;

#[derive(Queryable, Insertable)]
#[diesel(table_name = likes)]
pub struct Like {
    pub user_id: String,
    pub blog_id: String,
}
