//! The application shell's menu definition.

use crate::access::{Permission, Tab};

/// A single navigation entry. `required_permission` gates the view behind
/// the route guard; menu visibility is decided separately by the tab map
/// in [`crate::access::filter_menu`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub name: &'static str,
    pub tab: Tab,
    pub required_permission: Option<Permission>,
}

const MAIN_MENU: &[MenuItem] = &[
    MenuItem {
        name: "Inicio",
        tab: Tab::Inicio,
        required_permission: None,
    },
    MenuItem {
        name: "Clientes",
        tab: Tab::Clientes,
        required_permission: Some(Permission::Clientes),
    },
    MenuItem {
        name: "Inventario",
        tab: Tab::Inventario,
        required_permission: Some(Permission::Inventario),
    },
    MenuItem {
        name: "Agenda",
        tab: Tab::Agenda,
        required_permission: Some(Permission::Agenda),
    },
    MenuItem {
        name: "Notificaciones",
        tab: Tab::Notificaciones,
        required_permission: None,
    },
    MenuItem {
        name: "Servicios",
        tab: Tab::Servicios,
        required_permission: Some(Permission::Servicios),
    },
    MenuItem {
        name: "Expedientes de Vehiculos",
        tab: Tab::Expedientes,
        required_permission: Some(Permission::Vehiculos),
    },
    MenuItem {
        name: "Facturación",
        tab: Tab::Facturacion,
        required_permission: Some(Permission::Facturacion),
    },
    MenuItem {
        name: "Empleados",
        tab: Tab::Empleados,
        required_permission: Some(Permission::Empleados),
    },
    MenuItem {
        name: "Usuarios",
        tab: Tab::Usuarios,
        required_permission: Some(Permission::Usuarios),
    },
];

/// The full menu as defined by the application shell. Static, not persisted.
pub fn main_menu() -> &'static [MenuItem] {
    MAIN_MENU
}

/// Look up the guard permission configured for a tab.
pub fn required_permission(tab: Tab) -> Option<Permission> {
    MAIN_MENU
        .iter()
        .find(|item| item.tab == tab)
        .and_then(|item| item.required_permission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_covers_every_tab_once() {
        let menu = main_menu();
        assert_eq!(menu.len(), 10);
        for item in menu {
            assert_eq!(menu.iter().filter(|i| i.tab == item.tab).count(), 1);
        }
    }

    #[test]
    fn test_required_permission_lookup() {
        assert_eq!(
            required_permission(Tab::Facturacion),
            Some(Permission::Facturacion)
        );
        assert_eq!(
            required_permission(Tab::Expedientes),
            Some(Permission::Vehiculos)
        );
        assert_eq!(required_permission(Tab::Inicio), None);
        assert_eq!(required_permission(Tab::Notificaciones), None);
    }
}
