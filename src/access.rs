//! Access evaluation: permissions, roles and menu filtering.
//!
//! Every other module consults this one for permission decisions; nothing
//! else re-implements the tab-to-permission map.

use crate::menu::MenuItem;
use crate::session::User;
use serde::{Deserialize, Serialize};

/// A capability identifier gating access to one UI module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Dashboard,
    Clientes,
    Vehiculos,
    Agenda,
    Inventario,
    Facturacion,
    Servicios,
    Empleados,
    Usuarios,
}

/// The full permission catalog, in display order.
pub const ALL_PERMISSIONS: &[Permission] = &[
    Permission::Dashboard,
    Permission::Clientes,
    Permission::Vehiculos,
    Permission::Agenda,
    Permission::Inventario,
    Permission::Facturacion,
    Permission::Servicios,
    Permission::Empleados,
    Permission::Usuarios,
];

impl Permission {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "dashboard" => Some(Self::Dashboard),
            "clientes" => Some(Self::Clientes),
            "vehiculos" => Some(Self::Vehiculos),
            "agenda" => Some(Self::Agenda),
            "inventario" => Some(Self::Inventario),
            "facturacion" => Some(Self::Facturacion),
            "servicios" => Some(Self::Servicios),
            "empleados" => Some(Self::Empleados),
            "usuarios" => Some(Self::Usuarios),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Clientes => "clientes",
            Self::Vehiculos => "vehiculos",
            Self::Agenda => "agenda",
            Self::Inventario => "inventario",
            Self::Facturacion => "facturacion",
            Self::Servicios => "servicios",
            Self::Empleados => "empleados",
            Self::Usuarios => "usuarios",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named class of user. Administrators bypass menu filtering entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrador,
    Mecanico,
    Recepcion,
    Finanzas,
    Inteligencia,
    Cliente,
}

impl Role {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "administrador" => Some(Self::Administrador),
            "mecanico" => Some(Self::Mecanico),
            "recepcion" => Some(Self::Recepcion),
            "finanzas" => Some(Self::Finanzas),
            "inteligencia" => Some(Self::Inteligencia),
            "cliente" => Some(Self::Cliente),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrador => "administrador",
            Self::Mecanico => "mecanico",
            Self::Recepcion => "recepcion",
            Self::Finanzas => "finanzas",
            Self::Inteligencia => "inteligencia",
            Self::Cliente => "cliente",
        }
    }

    /// Human-readable label for the role.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Administrador => "Administrador",
            Self::Mecanico => "Mecánico",
            Self::Recepcion => "Recepción",
            Self::Finanzas => "Finanzas",
            Self::Inteligencia => "Inteligencia",
            Self::Cliente => "Cliente",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dashboard tab identifier. Tabs are the navigation surface; not every
/// tab has an entry in the permission map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Inicio,
    Clientes,
    Inventario,
    Agenda,
    Notificaciones,
    Servicios,
    Expedientes,
    Facturacion,
    Empleados,
    Usuarios,
}

impl Tab {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "inicio" | "dashboard" => Some(Self::Inicio),
            "clientes" => Some(Self::Clientes),
            "inventario" => Some(Self::Inventario),
            "agenda" => Some(Self::Agenda),
            "notificaciones" => Some(Self::Notificaciones),
            "servicios" => Some(Self::Servicios),
            "expedientes" => Some(Self::Expedientes),
            "facturacion" => Some(Self::Facturacion),
            "empleados" => Some(Self::Empleados),
            "usuarios" => Some(Self::Usuarios),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inicio => "inicio",
            Self::Clientes => "clientes",
            Self::Inventario => "inventario",
            Self::Agenda => "agenda",
            Self::Notificaciones => "notificaciones",
            Self::Servicios => "servicios",
            Self::Expedientes => "expedientes",
            Self::Facturacion => "facturacion",
            Self::Empleados => "empleados",
            Self::Usuarios => "usuarios",
        }
    }
}

/// Fixed tab-to-permission lookup. Tabs without an entry (notificaciones,
/// expedientes) return `None` and are therefore always excluded from the
/// menu for non-administrators.
pub fn tab_permission(tab: Tab) -> Option<Permission> {
    match tab {
        Tab::Inicio => Some(Permission::Dashboard),
        Tab::Clientes => Some(Permission::Clientes),
        Tab::Inventario => Some(Permission::Inventario),
        Tab::Agenda => Some(Permission::Agenda),
        Tab::Servicios => Some(Permission::Servicios),
        Tab::Facturacion => Some(Permission::Facturacion),
        Tab::Empleados => Some(Permission::Empleados),
        Tab::Usuarios => Some(Permission::Usuarios),
        Tab::Notificaciones | Tab::Expedientes => None,
    }
}

/// True iff `permission` is a member of the user's permission set.
/// An absent user never holds a permission.
pub fn has_permission(user: Option<&User>, permission: Permission) -> bool {
    match user {
        Some(u) => u.permisos.contains(&permission),
        None => false,
    }
}

/// Strict role equality; false for an absent user.
pub fn has_role(user: Option<&User>, role: Role) -> bool {
    match user {
        Some(u) => u.rol == role,
        None => false,
    }
}

/// The modules a user may reach, as granted.
pub fn allowed_modules(user: Option<&User>) -> Vec<Permission> {
    match user {
        Some(u) => u.permisos.clone(),
        None => Vec::new(),
    }
}

/// Filter the menu down to the entries the user may see, preserving order.
///
/// Administrators bypass filtering entirely (explicit design choice, not a
/// fallback), as does an absent user: the caller is expected to have gone
/// through the route guard already.
pub fn filter_menu<'a>(user: Option<&User>, items: &'a [MenuItem]) -> Vec<&'a MenuItem> {
    if user.is_none() || has_role(user, Role::Administrador) {
        return items.iter().collect();
    }

    items
        .iter()
        .filter(|item| match tab_permission(item.tab) {
            Some(p) => has_permission(user, p),
            None => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::main_menu;

    fn user(rol: Role, permisos: Vec<Permission>) -> User {
        User {
            id: 1,
            nombre: "Prueba".to_string(),
            email: "prueba@taller.com".to_string(),
            rol,
            permisos,
            activo: true,
        }
    }

    #[test]
    fn test_permission_round_trip() {
        for p in ALL_PERMISSIONS {
            assert_eq!(Permission::from_str(p.as_str()), Some(*p));
        }
        assert_eq!(Permission::from_str("notificaciones"), None);
    }

    #[test]
    fn test_has_permission_membership() {
        let u = user(
            Role::Recepcion,
            vec![Permission::Dashboard, Permission::Agenda],
        );
        assert!(has_permission(Some(&u), Permission::Dashboard));
        assert!(has_permission(Some(&u), Permission::Agenda));
        assert!(!has_permission(Some(&u), Permission::Facturacion));
    }

    #[test]
    fn test_has_permission_absent_user() {
        for p in ALL_PERMISSIONS {
            assert!(!has_permission(None, *p));
        }
    }

    #[test]
    fn test_has_permission_empty_set() {
        let u = user(Role::Mecanico, vec![]);
        assert!(!has_permission(Some(&u), Permission::Dashboard));
    }

    #[test]
    fn test_has_role() {
        let u = user(Role::Mecanico, vec![Permission::Vehiculos]);
        assert!(has_role(Some(&u), Role::Mecanico));
        assert!(!has_role(Some(&u), Role::Administrador));
        assert!(!has_role(None, Role::Administrador));
    }

    #[test]
    fn test_filter_menu_admin_identity() {
        // Role bypass is independent of the permission set.
        let admin = user(Role::Administrador, vec![Permission::Dashboard]);
        let menu = main_menu();
        let filtered = filter_menu(Some(&admin), menu);
        assert_eq!(filtered.len(), menu.len());
    }

    #[test]
    fn test_filter_menu_absent_user_identity() {
        let menu = main_menu();
        assert_eq!(filter_menu(None, menu).len(), menu.len());
    }

    #[test]
    fn test_filter_menu_subsequence() {
        let u = user(
            Role::Recepcion,
            vec![
                Permission::Dashboard,
                Permission::Clientes,
                Permission::Agenda,
                Permission::Facturacion,
            ],
        );
        let menu = main_menu();
        let filtered = filter_menu(Some(&u), menu);

        // Every surviving item maps to a held permission.
        for item in &filtered {
            let p = tab_permission(item.tab).expect("unmapped tab survived filtering");
            assert!(has_permission(Some(&u), p));
        }

        // Order preserved: positions in the original menu are increasing.
        let positions: Vec<usize> = filtered
            .iter()
            .map(|f| menu.iter().position(|m| m.tab == f.tab).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_filter_menu_unmapped_tabs_excluded() {
        // Even a user holding every permission loses the unmapped tabs.
        let u = user(Role::Mecanico, ALL_PERMISSIONS.to_vec());
        let filtered = filter_menu(Some(&u), main_menu());
        assert!(filtered
            .iter()
            .all(|i| i.tab != Tab::Notificaciones && i.tab != Tab::Expedientes));
    }

    #[test]
    fn test_role_wire_strings() {
        assert_eq!(Role::from_str("administrador"), Some(Role::Administrador));
        assert_eq!(Role::from_str("finanzas"), Some(Role::Finanzas));
        assert_eq!(Role::from_str("jefe"), None);
        assert_eq!(Role::Recepcion.label(), "Recepción");
    }
}
