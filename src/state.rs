//! In-memory working state for the screens that do not talk to the
//! backend: agenda, billing, employees and user administration.
//!
//! Records created here live for the session only; the backend-backed
//! screens (clients, vehicles, services, inventory) fetch on every render
//! instead.

use crate::access::{Permission, Role};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoCita {
    Cita,
    Reparacion,
}

impl TipoCita {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cita" => Some(Self::Cita),
            "reparacion" => Some(Self::Reparacion),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cita => "cita",
            Self::Reparacion => "reparacion",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Prioridad {
    Alta,
    Media,
    Baja,
}

impl Prioridad {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "alta" => Some(Self::Alta),
            "media" => Some(Self::Media),
            "baja" => Some(Self::Baja),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alta => "alta",
            Self::Media => "media",
            Self::Baja => "baja",
        }
    }
}

/// An agenda entry: either an appointment or a scheduled repair.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Cita {
    pub id: u32,
    pub fecha: NaiveDate,
    pub titulo: String,
    pub tipo: TipoCita,
    pub hora: String,
    pub prioridad: Prioridad,
    pub cliente: String,
    pub vehiculo: String,
    pub descripcion: String,
    pub recordatorio: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipoNotificacion {
    Recordatorio,
    Alerta,
}

#[derive(Debug, Clone)]
pub struct Notificacion {
    pub id: u32,
    pub tipo: TipoNotificacion,
    pub mensaje: String,
    pub hora: String,
    pub leida: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstadoFactura {
    Pendiente,
    Pagada,
    Parcial,
    Anulada,
}

impl EstadoFactura {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pendiente" => Some(Self::Pendiente),
            "pagada" => Some(Self::Pagada),
            "parcial" => Some(Self::Parcial),
            "anulada" => Some(Self::Anulada),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pendiente => "pendiente",
            Self::Pagada => "pagada",
            Self::Parcial => "parcial",
            Self::Anulada => "anulada",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Factura {
    pub id: u32,
    pub cliente: String,
    pub fecha: NaiveDate,
    pub total: f64,
    pub estado: EstadoFactura,
    pub nit: String,
    pub empresa: String,
    pub dpi: String,
    pub servicio: String,
    pub marca: String,
    pub placa: String,
}

#[derive(Debug, Clone, Copy)]
pub struct Puesto {
    pub id: u32,
    pub nombre: &'static str,
    pub departamento: &'static str,
}

/// Fixed position catalog for the employees screen.
pub const PUESTOS: &[Puesto] = &[
    Puesto {
        id: 1,
        nombre: "Mecánico",
        departamento: "Taller",
    },
    Puesto {
        id: 2,
        nombre: "Recepcionista",
        departamento: "Atención al Cliente",
    },
    Puesto {
        id: 3,
        nombre: "Gerente",
        departamento: "Administración",
    },
    Puesto {
        id: 4,
        nombre: "Asistente",
        departamento: "Administración",
    },
    Puesto {
        id: 5,
        nombre: "Limpieza",
        departamento: "Mantenimiento",
    },
];

pub fn puesto_by_id(id: u32) -> Option<&'static Puesto> {
    PUESTOS.iter().find(|p| p.id == id)
}

#[derive(Debug, Clone)]
pub struct Empleado {
    pub id_empleado: u32,
    pub nombres: String,
    pub apellidos: String,
    pub dpi: String,
    pub nit: String,
    pub telefono: String,
    pub email: String,
    pub direccion: String,
    pub id_puesto: u32,
    pub fecha_ingreso: NaiveDate,
    pub salario: f64,
    pub activo: bool,
}

impl Empleado {
    pub fn puesto(&self) -> &'static str {
        puesto_by_id(self.id_puesto).map(|p| p.nombre).unwrap_or("-")
    }

    pub fn departamento(&self) -> &'static str {
        puesto_by_id(self.id_puesto)
            .map(|p| p.departamento)
            .unwrap_or("-")
    }
}

/// An account row as managed from the usuarios screen. Administration
/// data only; authentication goes through the credential file.
#[derive(Debug, Clone)]
pub struct Cuenta {
    pub id: u32,
    pub nombre: String,
    pub email: String,
    pub telefono: String,
    pub rol: Role,
    pub activo: bool,
    pub permisos: Vec<Permission>,
}

#[derive(Debug, Clone)]
pub struct ReparacionUrgente {
    pub id: u32,
    pub vehiculo: String,
    pub cliente: String,
    pub prioridad: Prioridad,
}

/// All in-memory screen state, seeded with the shop's sample data.
pub struct ShopState {
    pub citas: Vec<Cita>,
    pub notificaciones: Vec<Notificacion>,
    pub facturas: Vec<Factura>,
    pub empleados: Vec<Empleado>,
    pub cuentas: Vec<Cuenta>,
    pub urgentes: Vec<ReparacionUrgente>,
    /// First day of the month currently shown by the agenda.
    pub agenda_month: NaiveDate,
}

impl ShopState {
    pub fn seed() -> Self {
        let hoy = Local::now().date_naive();
        Self::seed_at(hoy)
    }

    /// Seed with an explicit "today", so tests are date-independent.
    pub fn seed_at(hoy: NaiveDate) -> Self {
        Self {
            citas: vec![
                Cita {
                    id: 1,
                    fecha: hoy,
                    titulo: "Cambio de aceite Ferrari 488".to_string(),
                    tipo: TipoCita::Reparacion,
                    hora: "10:00".to_string(),
                    prioridad: Prioridad::Alta,
                    cliente: "Juan Pérez".to_string(),
                    vehiculo: "Ferrari 488".to_string(),
                    descripcion: "Cambio de aceite sintético y filtro de aceite".to_string(),
                    recordatorio: true,
                },
                Cita {
                    id: 2,
                    fecha: hoy,
                    titulo: "Revisión general Porsche 911".to_string(),
                    tipo: TipoCita::Cita,
                    hora: "14:00".to_string(),
                    prioridad: Prioridad::Media,
                    cliente: "María García".to_string(),
                    vehiculo: "Porsche 911".to_string(),
                    descripcion: "Revisión completa de 100 puntos".to_string(),
                    recordatorio: false,
                },
            ],
            notificaciones: vec![
                Notificacion {
                    id: 1,
                    tipo: TipoNotificacion::Recordatorio,
                    mensaje: "Cita de mantenimiento programada para hoy a las 10:00 AM"
                        .to_string(),
                    hora: "08:30".to_string(),
                    leida: false,
                },
                Notificacion {
                    id: 2,
                    tipo: TipoNotificacion::Alerta,
                    mensaje: "Repuesto especial para BMW M4 llegó al inventario".to_string(),
                    hora: "09:15".to_string(),
                    leida: false,
                },
                Notificacion {
                    id: 3,
                    tipo: TipoNotificacion::Recordatorio,
                    mensaje: "Recordatorio: Llamar al cliente Carlos López para confirmar cita"
                        .to_string(),
                    hora: "11:00".to_string(),
                    leida: true,
                },
            ],
            facturas: Vec::new(),
            empleados: vec![
                Empleado {
                    id_empleado: 1,
                    nombres: "Juan".to_string(),
                    apellidos: "Pérez".to_string(),
                    dpi: "1234567890123".to_string(),
                    nit: "1234567".to_string(),
                    telefono: "5555-1234".to_string(),
                    email: "juan.perez@empresa.com".to_string(),
                    direccion: "12 Calle 3-42 Zona 1, Quetzaltenango".to_string(),
                    id_puesto: 1,
                    fecha_ingreso: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap_or(hoy),
                    salario: 3500.0,
                    activo: true,
                },
                Empleado {
                    id_empleado: 2,
                    nombres: "María".to_string(),
                    apellidos: "López".to_string(),
                    dpi: "9876543210987".to_string(),
                    nit: "7654321".to_string(),
                    telefono: "5555-5678".to_string(),
                    email: "maria.lopez@empresa.com".to_string(),
                    direccion: "8 Avenida 2-35 Zona 3, Quetzaltenango".to_string(),
                    id_puesto: 2,
                    fecha_ingreso: NaiveDate::from_ymd_opt(2023, 3, 20).unwrap_or(hoy),
                    salario: 2800.0,
                    activo: true,
                },
            ],
            cuentas: vec![
                Cuenta {
                    id: 1,
                    nombre: "Juan Pérez".to_string(),
                    email: "juan@taller.com".to_string(),
                    telefono: "1234-5678".to_string(),
                    rol: Role::Administrador,
                    activo: true,
                    permisos: vec![
                        Permission::Dashboard,
                        Permission::Clientes,
                        Permission::Vehiculos,
                        Permission::Agenda,
                        Permission::Inventario,
                        Permission::Facturacion,
                    ],
                },
                Cuenta {
                    id: 2,
                    nombre: "María García".to_string(),
                    email: "maria@taller.com".to_string(),
                    telefono: "8765-4321".to_string(),
                    rol: Role::Mecanico,
                    activo: true,
                    permisos: vec![
                        Permission::Dashboard,
                        Permission::Vehiculos,
                        Permission::Agenda,
                    ],
                },
                Cuenta {
                    id: 3,
                    nombre: "Carlos López".to_string(),
                    email: "carlos@taller.com".to_string(),
                    telefono: "5555-5555".to_string(),
                    rol: Role::Recepcion,
                    activo: false,
                    permisos: vec![
                        Permission::Dashboard,
                        Permission::Clientes,
                        Permission::Agenda,
                        Permission::Facturacion,
                    ],
                },
            ],
            urgentes: vec![
                ReparacionUrgente {
                    id: 1,
                    vehiculo: "Ferrari 488".to_string(),
                    cliente: "Juan Pérez".to_string(),
                    prioridad: Prioridad::Alta,
                },
                ReparacionUrgente {
                    id: 2,
                    vehiculo: "Porsche 911".to_string(),
                    cliente: "María Gómez".to_string(),
                    prioridad: Prioridad::Media,
                },
            ],
            agenda_month: hoy.with_day(1).unwrap_or(hoy),
        }
    }

    pub fn next_cita_id(&self) -> u32 {
        self.citas.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }

    pub fn next_factura_id(&self) -> u32 {
        self.facturas.iter().map(|f| f.id).max().unwrap_or(0) + 1
    }

    pub fn next_empleado_id(&self) -> u32 {
        self.empleados
            .iter()
            .map(|e| e.id_empleado)
            .max()
            .unwrap_or(0)
            + 1
    }

    pub fn next_cuenta_id(&self) -> u32 {
        self.cuentas.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_has_sample_data() {
        let hoy = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let state = ShopState::seed_at(hoy);
        assert_eq!(state.citas.len(), 2);
        assert_eq!(state.empleados.len(), 2);
        assert_eq!(state.cuentas.len(), 3);
        assert!(state.facturas.is_empty());
        assert_eq!(state.agenda_month, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
    }

    #[test]
    fn test_next_ids() {
        let hoy = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let state = ShopState::seed_at(hoy);
        assert_eq!(state.next_cita_id(), 3);
        assert_eq!(state.next_factura_id(), 1);
        assert_eq!(state.next_empleado_id(), 3);
        assert_eq!(state.next_cuenta_id(), 4);
    }

    #[test]
    fn test_puesto_lookup() {
        assert_eq!(puesto_by_id(1).map(|p| p.nombre), Some("Mecánico"));
        assert_eq!(puesto_by_id(99).map(|p| p.nombre), None);
    }
}
