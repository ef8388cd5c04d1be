use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{Department, User};
use crate::database::PgTable;
use crate::error::ServiceError;
use crate::pagination::{paginate, PageRequest, PageResult};
use crate::query::{OrderBy, QuerySpec, Where};

pub const MEMBERS: &str = "members";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepartmentFilter {
    pub name: Option<String>,
}

impl DepartmentFilter {
    pub fn to_query(&self) -> QuerySpec {
        QuerySpec::new()
            .filter(self.name.as_ref().map(|name| Where::icontains("name", name)))
            .include(MEMBERS)
            .order_by(OrderBy::desc("created_at"))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DepartmentWithMembers {
    #[serde(flatten)]
    pub department: Department,
    pub members: Vec<User>,
}

pub struct DepartmentService {
    departments: PgTable<Department>,
    users: PgTable<User>,
}

impl DepartmentService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            departments: PgTable::new(Department::TABLE, pool.clone()),
            users: PgTable::new(User::TABLE, pool),
        }
    }

    pub async fn list(
        &self,
        request: PageRequest,
        filter: &DepartmentFilter,
    ) -> Result<PageResult<DepartmentWithMembers>, ServiceError> {
        let query = filter.to_query();
        let with_members = query.include.as_ref().is_some_and(|inc| inc.iter().any(|r| r == MEMBERS));
        let page = paginate(&self.departments, request, query).await?;

        let mut members = if with_members && !page.data.is_empty() {
            self.members_of(page.data.iter().map(|d| d.id)).await?
        } else {
            HashMap::new()
        };

        Ok(page.map(|department| DepartmentWithMembers {
            members: members.remove(&department.id).unwrap_or_default(),
            department,
        }))
    }

    async fn members_of(&self, ids: impl Iterator<Item = Uuid>) -> Result<HashMap<Uuid, Vec<User>>, ServiceError> {
        let condition = Where::is_in("department_id", ids);
        let columns = User::columns();
        let order = [OrderBy::asc("last_name"), OrderBy::asc("first_name")];
        let users = self.users.find_all(Some(&condition), Some(columns.as_slice()), &order).await?;

        let mut grouped: HashMap<Uuid, Vec<User>> = HashMap::new();
        for user in users {
            if let Some(department_id) = user.department_id {
                grouped.entry(department_id).or_default().push(user);
            }
        }
        Ok(grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_includes_members() {
        let query = DepartmentFilter { name: Some("choir".into()) }.to_query();
        assert_eq!(query.where_clause, Some(Where::icontains("name", "choir")));
        assert_eq!(query.include, Some(vec![MEMBERS.to_string()]));
        assert_eq!(query.order, vec![OrderBy::desc("created_at")]);
    }
}
