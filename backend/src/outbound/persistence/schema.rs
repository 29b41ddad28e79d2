//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate them
//! with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        /// Lower-cased on write; unique.
        email -> Varchar,
        avatar -> Nullable<Varchar>,
        /// Argon2id PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Roleplay groups. `master` never changes after insert.
    groups (id) {
        id -> Uuid,
        name -> Text,
        description -> Text,
        schedule -> Text,
        location -> Text,
        chronic -> Text,
        master -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Membership rows; `position` preserves join order.
    group_members (group_id, user_id) {
        group_id -> Uuid,
        user_id -> Uuid,
        position -> Int8,
    }
}

diesel::table! {
    /// Join requests. At most one `PENDING` row per (group, user).
    group_requests (id) {
        id -> Uuid,
        group_id -> Uuid,
        user_id -> Uuid,
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Outstanding password reset tokens.
    password_reset_tokens (token) {
        token -> Varchar,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(groups -> users (master));
diesel::joinable!(group_members -> groups (group_id));
diesel::joinable!(group_requests -> groups (group_id));
diesel::joinable!(password_reset_tokens -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    groups,
    group_members,
    group_requests,
    password_reset_tokens,
);
