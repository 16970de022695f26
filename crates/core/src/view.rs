//! Saved conversation views: access scope, ordering and column rules.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

pub const ACCESS_ANYONE: &str = "anyone";
pub const ACCESS_OWNER: &str = "owner";
pub const ACCESS_GROUP: &str = "group";

/// Columns a view may sort by.
pub const VALID_ORDER_COLUMNS: &[&str] = &["id", "created_at", "updated_at", "status_category"];

/// Columns a view may display.
pub const VALID_COLUMNS: &[&str] = &[
    "id",
    "subject",
    "status",
    "assignee",
    "group",
    "customer",
    "tags",
    "created_at",
    "updated_at",
    "closed_at",
];

/// Maximum number of filters stored on one view.
pub const MAX_VIEW_FILTERS: usize = 20;

/// Who can see a saved view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewAccess {
    Anyone,
    Owner,
    Group,
}

impl ViewAccess {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewAccess::Anyone => ACCESS_ANYONE,
            ViewAccess::Owner => ACCESS_OWNER,
            ViewAccess::Group => ACCESS_GROUP,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            ACCESS_ANYONE => Some(ViewAccess::Anyone),
            ACCESS_OWNER => Some(ViewAccess::Owner),
            ACCESS_GROUP => Some(ViewAccess::Group),
            _ => None,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDir {
    Asc,
    #[default]
    Desc,
}

impl OrderDir {
    /// Stored form, as accepted by [`OrderDir::parse`].
    pub fn as_str(self) -> &'static str {
        match self {
            OrderDir::Asc => "asc",
            OrderDir::Desc => "desc",
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            OrderDir::Asc => "ASC",
            OrderDir::Desc => "DESC",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(OrderDir::Asc),
            "desc" => Some(OrderDir::Desc),
            _ => None,
        }
    }
}

/// The user asking to see or change a view.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub user_id: DbId,
    pub is_admin: bool,
    pub group_ids: Vec<DbId>,
}

/// Access fields of a stored view.
#[derive(Debug, Clone, Copy)]
pub struct ViewScope {
    pub owner_id: DbId,
    pub access: ViewAccess,
    pub group_id: Option<DbId>,
}

/// Whether `viewer` may list and open the view.
pub fn can_view(scope: ViewScope, viewer: &Viewer) -> bool {
    if viewer.is_admin || scope.owner_id == viewer.user_id {
        return true;
    }
    match scope.access {
        ViewAccess::Anyone => true,
        ViewAccess::Owner => false,
        ViewAccess::Group => scope
            .group_id
            .is_some_and(|group| viewer.group_ids.contains(&group)),
    }
}

/// Whether `viewer` may update or delete the view.
pub fn can_edit(scope: ViewScope, viewer: &Viewer) -> bool {
    viewer.is_admin || scope.owner_id == viewer.user_id
}

/// Validate the access/group combination.
pub fn validate_access(access: ViewAccess, group_id: Option<DbId>) -> Result<(), String> {
    match (access, group_id) {
        (ViewAccess::Group, None) => Err("group_id is required when access is 'group'".into()),
        (ViewAccess::Anyone | ViewAccess::Owner, Some(_)) => {
            Err("group_id is only allowed when access is 'group'".into())
        }
        _ => Ok(()),
    }
}

pub fn validate_order_by(column: &str) -> Result<(), String> {
    if VALID_ORDER_COLUMNS.contains(&column) {
        Ok(())
    } else {
        Err(format!(
            "Invalid order_by '{column}'. Must be one of: {}",
            VALID_ORDER_COLUMNS.join(", ")
        ))
    }
}

pub fn validate_columns(columns: &[String]) -> Result<(), String> {
    match columns.iter().find(|c| !VALID_COLUMNS.contains(&c.as_str())) {
        Some(bad) => Err(format!(
            "Invalid column '{bad}'. Must be one of: {}",
            VALID_COLUMNS.join(", ")
        )),
        None => Ok(()),
    }
}

pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("View name must not be empty".into());
    }
    if trimmed.chars().count() > 120 {
        return Err("View name must be at most 120 characters".into());
    }
    Ok(())
}
