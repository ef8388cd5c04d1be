use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::User;
use crate::database::PgTable;
use crate::error::ServiceError;
use crate::files::{Delivery, FileUrlCache};
use crate::pagination::{paginate, PageRequest, PageResult};
use crate::query::{OrderBy, QuerySpec, Where};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserFilter {
    /// Matches either first or last name
    pub name: Option<String>,
    pub email: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl UserFilter {
    pub fn to_query(&self) -> QuerySpec {
        let mut conditions = Vec::new();
        if let Some(name) = &self.name {
            conditions.push(Where::or(vec![
                Where::icontains("first_name", name),
                Where::icontains("last_name", name),
            ]));
        }
        if let Some(email) = &self.email {
            conditions.push(Where::icontains("email", email));
        }
        if let Some(from) = self.date_from {
            conditions.push(Where::gte("created_at", from));
        }
        if let Some(to) = self.date_to {
            conditions.push(Where::lte("created_at", to));
        }

        QuerySpec::new()
            .filter(Where::all(conditions))
            .select(User::COLUMNS)
            .order_by(OrderBy::desc("created_at"))
    }
}

/// A user with their profile image resolved to a URL.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub profile_image_url: Option<String>,
}

pub struct UserService {
    users: PgTable<User>,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: PgTable::new(User::TABLE, pool),
        }
    }

    pub async fn list(&self, request: PageRequest, filter: &UserFilter) -> Result<PageResult<User>, ServiceError> {
        Ok(paginate(&self.users, request, filter.to_query()).await?)
    }

    pub async fn get_profile(&self, id: Uuid, urls: &FileUrlCache) -> Result<UserProfile, ServiceError> {
        let columns = User::columns();
        let user = self.users.find_404(id, Some(columns.as_slice()), "User").await?;
        let profile_image_url = match user.profile_image_id {
            Some(file_id) => Some(urls.resolve_url(file_id, true, Delivery::Network).await?),
            None => None,
        };
        Ok(UserProfile { user, profile_image_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_matches_either_name_column() {
        let query = UserFilter { name: Some("grace".into()), ..Default::default() }.to_query();
        assert_eq!(
            query.where_clause,
            Some(Where::Or(vec![
                Where::icontains("first_name", "grace"),
                Where::icontains("last_name", "grace"),
            ]))
        );
    }

    #[test]
    fn projection_excludes_password_hash() {
        let select = UserFilter::default().to_query().select.unwrap();
        assert_eq!(select, User::columns());
        assert!(!select.iter().any(|c| c == "password"));
    }
}
