use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identity::Role;
use crate::{CoreError, CoreResult};

/// Privileged operations gated by role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    ViewAdminArea,
    ListCars,
    CreateCar,
    EditCar,
    DeleteCar,
    ApproveBooking,
    RejectBooking,
    ChangeUserRole,
    CreateBlogPost,
    EditBlogPost,
    DeleteBlogPost,
    ListUsers,
    ExportBookingReport,
}

impl Action {
    pub const ALL: [Action; 13] = [
        Action::ViewAdminArea,
        Action::ListCars,
        Action::CreateCar,
        Action::EditCar,
        Action::DeleteCar,
        Action::ApproveBooking,
        Action::RejectBooking,
        Action::ChangeUserRole,
        Action::CreateBlogPost,
        Action::EditBlogPost,
        Action::DeleteBlogPost,
        Action::ListUsers,
        Action::ExportBookingReport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ViewAdminArea => "view-admin-area",
            Action::ListCars => "list-cars",
            Action::CreateCar => "create-car",
            Action::EditCar => "edit-car",
            Action::DeleteCar => "delete-car",
            Action::ApproveBooking => "approve-booking",
            Action::RejectBooking => "reject-booking",
            Action::ChangeUserRole => "change-user-role",
            Action::CreateBlogPost => "create-blog-post",
            Action::EditBlogPost => "edit-blog-post",
            Action::DeleteBlogPost => "delete-blog-post",
            Action::ListUsers => "list-users",
            Action::ExportBookingReport => "export-booking-report",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role × action table. `target_is_self` only matters for role changes:
/// nobody may change their own role, admins included.
pub fn is_allowed(role: Role, action: Action, target_is_self: bool) -> bool {
    match (role, action) {
        (Role::User, _) => false,

        (_, Action::ChangeUserRole) if target_is_self => false,

        (Role::SubAdmin, Action::ViewAdminArea)
        | (Role::SubAdmin, Action::ListCars)
        | (Role::SubAdmin, Action::ApproveBooking)
        | (Role::SubAdmin, Action::RejectBooking)
        | (Role::SubAdmin, Action::ListUsers)
        | (Role::SubAdmin, Action::ExportBookingReport) => true,

        // Blog management stays admin-only even though sub_admin reviews bookings.
        (Role::SubAdmin, _) => false,

        (Role::Admin, _) => true,
    }
}

/// `is_allowed` as a `Result` for use with `?`.
pub fn authorize(role: Role, action: Action, target_is_self: bool) -> CoreResult<()> {
    if is_allowed(role, action, target_is_self) {
        Ok(())
    } else {
        tracing::debug!(%role, %action, target_is_self, "permission denied");
        Err(CoreError::PermissionDenied(action.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_denied_everything() {
        for action in Action::ALL {
            assert!(!is_allowed(Role::User, action, false), "user allowed {}", action);
            assert!(!is_allowed(Role::User, action, true));
        }
    }

    #[test]
    fn test_admin_cannot_change_own_role() {
        assert!(!is_allowed(Role::Admin, Action::ChangeUserRole, true));
        assert!(is_allowed(Role::Admin, Action::ChangeUserRole, false));
    }

    #[test]
    fn test_sub_admin_table() {
        assert!(is_allowed(Role::SubAdmin, Action::ViewAdminArea, false));
        assert!(is_allowed(Role::SubAdmin, Action::ListCars, false));
        assert!(is_allowed(Role::SubAdmin, Action::ApproveBooking, false));
        assert!(is_allowed(Role::SubAdmin, Action::RejectBooking, false));
        assert!(is_allowed(Role::SubAdmin, Action::ExportBookingReport, false));

        assert!(!is_allowed(Role::SubAdmin, Action::CreateCar, false));
        assert!(!is_allowed(Role::SubAdmin, Action::EditCar, false));
        assert!(!is_allowed(Role::SubAdmin, Action::DeleteCar, false));
        assert!(!is_allowed(Role::SubAdmin, Action::ChangeUserRole, false));
        assert!(!is_allowed(Role::SubAdmin, Action::CreateBlogPost, false));
        assert!(!is_allowed(Role::SubAdmin, Action::EditBlogPost, false));
        assert!(!is_allowed(Role::SubAdmin, Action::DeleteBlogPost, false));
    }

    #[test]
    fn test_admin_allowed_everything_but_self_role_change() {
        for action in Action::ALL {
            assert!(is_allowed(Role::Admin, action, false), "admin denied {}", action);
        }
    }

    #[test]
    fn test_unknown_role_label_is_denied() {
        let role = Role::from_label(Some("owner"));
        assert!(!is_allowed(role, Action::ViewAdminArea, false));
    }

    #[test]
    fn test_authorize_error() {
        let err = authorize(Role::SubAdmin, Action::CreateCar, false).unwrap_err();
        assert_eq!(err, CoreError::PermissionDenied("create-car".to_string()));
        assert!(authorize(Role::SubAdmin, Action::ApproveBooking, false).is_ok());
    }
}
