//! One module per dashboard tab. `run` is the single dispatch point; the
//! route guard has already been consulted by the time a screen runs.

pub mod agenda;
pub mod billing;
pub mod clients;
pub mod dashboard;
pub mod employees;
pub mod inventory;
pub mod notifications;
pub mod services;
pub mod users;
pub mod vehicles;

use crate::access::Tab;
use crate::api::decode_rows;
use crate::cli::Context;
use anyhow::Result;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

pub fn run(ctx: &Context, tab: Tab, args: &[String]) -> Result<()> {
    match tab {
        Tab::Inicio => dashboard::run(ctx, args),
        Tab::Clientes => clients::run(ctx, args),
        Tab::Inventario => inventory::run(ctx, args),
        Tab::Agenda => agenda::run(ctx, args),
        Tab::Notificaciones => notifications::run(ctx, args),
        Tab::Servicios => services::run(ctx, args),
        Tab::Expedientes => vehicles::run(ctx, args),
        Tab::Facturacion => billing::run(ctx, args),
        Tab::Empleados => employees::run(ctx, args),
        Tab::Usuarios => users::run(ctx, args),
    }
}

/// Split screen arguments into `key=value` fields and bare flags.
/// Later duplicates win, matching form behavior.
pub(crate) fn parse_fields(args: &[String]) -> (HashMap<String, String>, Vec<String>) {
    let mut fields = HashMap::new();
    let mut flags = Vec::new();
    for arg in args {
        match arg.split_once('=') {
            Some((key, value)) => {
                fields.insert(key.to_string(), value.to_string());
            }
            None => flags.push(arg.clone()),
        }
    }
    (fields, flags)
}

/// Fetch a backend collection, swallowing failures: the screen renders
/// with empty data and the failure is logged to the audit log.
pub(crate) fn fetch_list<T: DeserializeOwned>(ctx: &Context, resource: &str) -> Vec<T> {
    match ctx.api.list(resource) {
        Ok(rows) => {
            if ctx.debug {
                eprintln!("[DEBUG] GET {}: {} filas", resource, rows.len());
            }
            decode_rows(rows)
        }
        Err(err) => {
            let _ = ctx
                .audit
                .borrow_mut()
                .api_error(resource, &err.to_string());
            eprintln!("Error consultando {}: {}", resource, err);
            Vec::new()
        }
    }
}

/// Spanish weekday name, Sunday first (calendar header order).
pub(crate) const DIAS_SEMANA: [&str; 7] = ["DOM", "LUN", "MAR", "MIÉ", "JUE", "VIE", "SÁB"];

pub(crate) const MESES: [&str; 12] = [
    "ENERO",
    "FEBRERO",
    "MARZO",
    "ABRIL",
    "MAYO",
    "JUNIO",
    "JULIO",
    "AGOSTO",
    "SEPTIEMBRE",
    "OCTUBRE",
    "NOVIEMBRE",
    "DICIEMBRE",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields() {
        let args: Vec<String> = vec![
            "nombre=Juan Pérez".to_string(),
            "recordatorio".to_string(),
            "hora=10:00".to_string(),
        ];
        let (fields, flags) = parse_fields(&args);
        assert_eq!(fields.get("nombre").map(String::as_str), Some("Juan Pérez"));
        assert_eq!(fields.get("hora").map(String::as_str), Some("10:00"));
        assert_eq!(flags, vec!["recordatorio".to_string()]);
    }

    #[test]
    fn test_parse_fields_last_duplicate_wins() {
        let args: Vec<String> = vec!["hora=10:00".to_string(), "hora=11:30".to_string()];
        let (fields, _) = parse_fields(&args);
        assert_eq!(fields.get("hora").map(String::as_str), Some("11:30"));
    }

    #[test]
    fn test_parse_fields_value_may_contain_equals() {
        let args: Vec<String> = vec!["descripcion=a=b".to_string()];
        let (fields, _) = parse_fields(&args);
        assert_eq!(fields.get("descripcion").map(String::as_str), Some("a=b"));
    }
}
