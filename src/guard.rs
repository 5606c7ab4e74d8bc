//! Route guard: the render / redirect / deny decision for protected views.
//!
//! A synchronous decision re-evaluated on every navigation; no retries.
//! The redirect after an unauthenticated decision is deferred (one-shot,
//! not cancellable) so the in-progress render pass completes first.

use crate::access::{self, Permission, Role};
use crate::session::SessionState;

/// Authentication state as seen by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Session restore still in progress; no access decision yet.
    Loading,
    Unauthenticated,
    Authenticated,
}

pub fn state_of(session: &SessionState) -> GuardState {
    if session.is_loading() {
        GuardState::Loading
    } else if session.is_authenticated() {
        GuardState::Authenticated
    } else {
        GuardState::Unauthenticated
    }
}

/// The guard's verdict for one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Restore in progress: render a placeholder.
    Pending,
    /// Not signed in: schedule the deferred redirect to login, render nothing.
    RedirectToLogin,
    /// Signed in but missing the view's permission: render the denial view.
    Denied { rol: Role, missing: Permission },
    /// Render the wrapped content.
    Render,
}

/// Decide whether the current session may see a view gated by
/// `required`. The permission check is strict: roles do not bypass the
/// guard, only the menu filter.
pub fn evaluate(session: &SessionState, required: Option<Permission>) -> GuardOutcome {
    match state_of(session) {
        GuardState::Loading => GuardOutcome::Pending,
        GuardState::Unauthenticated => GuardOutcome::RedirectToLogin,
        GuardState::Authenticated => {
            let user = session.current_user();
            if let Some(permission) = required {
                if !access::has_permission(user, permission) {
                    // An authenticated session always carries a user; fall
                    // back to Cliente only if that invariant is ever broken.
                    let rol = user.map(|u| u.rol).unwrap_or(Role::Cliente);
                    return GuardOutcome::Denied {
                        rol,
                        missing: permission,
                    };
                }
            }
            GuardOutcome::Render
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Permission;
    use crate::session::{Account, AccountStore, SessionState};
    use crate::store::Store;

    fn accounts() -> AccountStore {
        AccountStore {
            accounts: vec![
                Account {
                    id: 1,
                    nombre: "Admin".to_string(),
                    email: "admin@taller.com".to_string(),
                    password: "ferrari123".to_string(),
                    rol: Role::Administrador,
                    permisos: vec![Permission::Dashboard],
                    activo: true,
                },
                Account {
                    id: 2,
                    nombre: "María".to_string(),
                    email: "recepcion@taller.com".to_string(),
                    password: "ferrari123".to_string(),
                    rol: Role::Recepcion,
                    permisos: vec![Permission::Dashboard, Permission::Agenda],
                    activo: true,
                },
            ],
        }
    }

    fn logged_in(email: &str) -> (tempfile::TempDir, SessionState) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let mut session = SessionState::new();
        session.restore(&store);
        session.login(&store, &accounts(), email, "ferrari123").unwrap();
        (dir, session)
    }

    #[test]
    fn test_loading_renders_placeholder() {
        let session = SessionState::new();
        assert_eq!(
            evaluate(&session, Some(Permission::Agenda)),
            GuardOutcome::Pending
        );
    }

    #[test]
    fn test_unauthenticated_redirects() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let mut session = SessionState::new();
        session.restore(&store);

        assert_eq!(evaluate(&session, None), GuardOutcome::RedirectToLogin);
        assert_eq!(
            evaluate(&session, Some(Permission::Dashboard)),
            GuardOutcome::RedirectToLogin
        );
    }

    #[test]
    fn test_missing_permission_denied() {
        let (_dir, session) = logged_in("recepcion@taller.com");
        assert_eq!(
            evaluate(&session, Some(Permission::Facturacion)),
            GuardOutcome::Denied {
                rol: Role::Recepcion,
                missing: Permission::Facturacion,
            }
        );
    }

    #[test]
    fn test_held_permission_renders() {
        let (_dir, session) = logged_in("recepcion@taller.com");
        assert_eq!(
            evaluate(&session, Some(Permission::Agenda)),
            GuardOutcome::Render
        );
        assert_eq!(evaluate(&session, None), GuardOutcome::Render);
    }

    #[test]
    fn test_admin_without_permission_is_still_denied() {
        // Role bypass applies to the menu filter only, not the guard.
        let (_dir, session) = logged_in("admin@taller.com");
        assert_eq!(
            evaluate(&session, Some(Permission::Usuarios)),
            GuardOutcome::Denied {
                rol: Role::Administrador,
                missing: Permission::Usuarios,
            }
        );
    }
}
