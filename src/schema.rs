diesel::table! {
    users (id) {
        id -> Varchar,
        name -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
        role -> Varchar,
        bio -> Nullable<Varchar>,
        avatar -> Nullable<Varchar>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    blogs (id) {
        id -> Varchar,
        title -> Varchar,
        description -> Varchar,
        image -> Nullable<Varchar>,
        author_id -> Varchar,
        author_name -> Varchar,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    comments (id) {
        id -> Varchar,
        blog_id -> Varchar,
        user_id -> Varchar,
        user_name -> Varchar,
        content -> Varchar,
        created_at -> Timestamp,
    }
}

diesel::table! {
    likes (user_id, blog_id) {
        user_id -> Varchar,
        blog_id -> Varchar,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, blogs, comments, likes);
