//! Find-or-create-then-update for a single named user

use crate::error::{Result, RosterError};
use crate::store::{Lookup, RecordStore, UserFilter};
use crate::types::{NewUser, User};

/// Make sure a user called `name` exists, then age it by one year
///
/// When no user matches `name`, one is inserted with `default_age` and the
/// current UTC time as `created_at`. The age increment is then written back
/// with a single update, and the post-update record is returned.
///
/// Store failures abort immediately and are returned unchanged. Nothing is
/// retried and nothing is rolled back: if the update fails after an insert,
/// the inserted row stays in the store with its default age.
///
/// # Errors
///
/// - [`RosterError::InvalidInput`] for a blank name (no store call is made)
///   or an age that cannot be incremented
/// - any error returned by the store
#[tracing::instrument(name = "reconcile", skip_all, fields(name = %name))]
pub async fn reconcile(store: &dyn RecordStore, name: &str, default_age: i32) -> Result<User> {
    if name.trim().is_empty() {
        return Err(RosterError::invalid_input("user name must not be blank"));
    }

    let mut user = match store.find_one(&UserFilter::name(name)).await? {
        Lookup::Found(user) => {
            tracing::debug!(user_id = %user.id, age = user.age, "Found existing user");
            user
        }
        Lookup::NotFound => {
            let user = store.insert(NewUser::new(name, default_age)).await?;
            tracing::info!(user_id = %user.id, age = user.age, "Created user");
            user
        }
    };

    user.age = user.age.checked_add(1).ok_or_else(|| {
        RosterError::invalid_input(format!("age of user {} cannot be incremented", user.id))
    })?;

    store.update(&user).await?;
    tracing::info!(user_id = %user.id, age = user.age, "Updated user age");

    Ok(user)
}
