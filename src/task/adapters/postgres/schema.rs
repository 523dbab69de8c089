//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Trimmed task title.
        #[max_length = 100]
        title -> Varchar,
        /// Optional task description.
        #[max_length = 1000]
        description -> Nullable<Varchar>,
        /// Task lifecycle status literal.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
