//! The facturacion tab: invoice management with field validation.

use crate::cli::Context;
use crate::screens::parse_fields;
use crate::state::{EstadoFactura, Factura, ShopState};
use crate::validate;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::collections::HashMap;

const MSG_NIT: &str = "El NIT debe tener exactamente 7 dígitos";
const MSG_DPI: &str = "El DPI debe tener exactamente 13 dígitos";
const MSG_PLACA: &str =
    "La placa debe tener el formato: 1 letra + 3 números + 3 letras (ej: P075LOK)";

fn add_factura(state: &mut ShopState, args: &[String], hoy: NaiveDate) -> Result<u32, String> {
    let (fields, _) = parse_fields(args);

    let cliente = fields
        .get("cliente")
        .cloned()
        .ok_or("Falta el campo cliente")?;
    let nit = fields.get("nit").cloned().ok_or("Falta el campo nit")?;
    let dpi = fields.get("dpi").cloned().ok_or("Falta el campo dpi")?;
    let placa = fields.get("placa").cloned().ok_or("Falta el campo placa")?;

    if !validate::valid_nit(&nit) {
        return Err(MSG_NIT.to_string());
    }
    if !validate::valid_dpi(&dpi) {
        return Err(MSG_DPI.to_string());
    }
    if !validate::valid_placa(&placa) {
        return Err(MSG_PLACA.to_string());
    }

    let fecha = match fields.get("fecha") {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| format!("Fecha inválida: {} (use AAAA-MM-DD)", raw))?,
        None => hoy,
    };
    let total = match fields.get("total") {
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| format!("Total inválido: {}", raw))?,
        None => return Err("Falta el campo total".to_string()),
    };
    let estado = match fields.get("estado") {
        Some(raw) => EstadoFactura::from_str(raw).ok_or(format!("Estado inválido: {}", raw))?,
        None => EstadoFactura::Pendiente,
    };

    let id = state.next_factura_id();
    state.facturas.push(Factura {
        id,
        cliente,
        fecha,
        total,
        estado,
        nit,
        empresa: fields.get("empresa").cloned().unwrap_or_default(),
        dpi,
        servicio: fields.get("servicio").cloned().unwrap_or_default(),
        marca: fields.get("marca").cloned().unwrap_or_default(),
        placa: placa.to_uppercase(),
    });
    Ok(id)
}

fn edit_factura(
    state: &mut ShopState,
    id: u32,
    fields: &HashMap<String, String>,
) -> Result<(), String> {
    // Validate before touching the record so a bad edit changes nothing.
    if let Some(nit) = fields.get("nit") {
        if !validate::valid_nit(nit) {
            return Err(MSG_NIT.to_string());
        }
    }
    if let Some(dpi) = fields.get("dpi") {
        if !validate::valid_dpi(dpi) {
            return Err(MSG_DPI.to_string());
        }
    }
    if let Some(placa) = fields.get("placa") {
        if !validate::valid_placa(placa) {
            return Err(MSG_PLACA.to_string());
        }
    }
    let fecha = match fields.get("fecha") {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| format!("Fecha inválida: {}", raw))?,
        ),
        None => None,
    };
    let total = match fields.get("total") {
        Some(raw) => Some(
            raw.parse::<f64>()
                .map_err(|_| format!("Total inválido: {}", raw))?,
        ),
        None => None,
    };
    let estado = match fields.get("estado") {
        Some(raw) => {
            Some(EstadoFactura::from_str(raw).ok_or(format!("Estado inválido: {}", raw))?)
        }
        None => None,
    };

    let factura = state
        .facturas
        .iter_mut()
        .find(|f| f.id == id)
        .ok_or(format!("No existe la factura {}", id))?;

    if let Some(v) = fields.get("cliente") {
        factura.cliente = v.clone();
    }
    if let Some(v) = fields.get("empresa") {
        factura.empresa = v.clone();
    }
    if let Some(v) = fields.get("servicio") {
        factura.servicio = v.clone();
    }
    if let Some(v) = fields.get("marca") {
        factura.marca = v.clone();
    }
    if let Some(v) = fields.get("nit") {
        factura.nit = v.clone();
    }
    if let Some(v) = fields.get("dpi") {
        factura.dpi = v.clone();
    }
    if let Some(v) = fields.get("placa") {
        factura.placa = v.to_uppercase();
    }
    if let Some(v) = fecha {
        factura.fecha = v;
    }
    if let Some(v) = total {
        factura.total = v;
    }
    if let Some(v) = estado {
        factura.estado = v;
    }
    Ok(())
}

fn remove_factura(state: &mut ShopState, id: u32) -> bool {
    let before = state.facturas.len();
    state.facturas.retain(|f| f.id != id);
    state.facturas.len() != before
}

fn print_factura(factura: &Factura) {
    println!(
        "  [{}] {} - {} - Q{:.2} ({})",
        factura.id, factura.fecha, factura.cliente, factura.total, factura.estado.as_str()
    );
    println!(
        "      NIT {} / DPI {} / placa {} {}",
        factura.nit,
        factura.dpi,
        factura.placa,
        if factura.marca.is_empty() {
            String::new()
        } else {
            format!("({})", factura.marca)
        }
    );
    if !factura.empresa.is_empty() {
        println!("      empresa: {}", factura.empresa);
    }
    if !factura.servicio.is_empty() {
        println!("      servicio: {}", factura.servicio);
    }
}

pub fn run(ctx: &Context, args: &[String]) -> Result<()> {
    let hoy = Local::now().date_naive();

    match args.first().map(String::as_str) {
        None => {
            let state = ctx.state.borrow();
            println!("FACTURACIÓN");
            if state.facturas.is_empty() {
                println!("  No hay facturas registradas");
            }
            for factura in &state.facturas {
                print_factura(factura);
            }
        }
        Some("add") => {
            let mut state = ctx.state.borrow_mut();
            match add_factura(&mut state, &args[1..], hoy) {
                Ok(id) => println!("Factura guardada correctamente (id {})", id),
                Err(msg) => println!("{}", msg),
            }
        }
        Some("edit") => match args.get(1).and_then(|s| s.parse::<u32>().ok()) {
            Some(id) => {
                let (fields, _) = parse_fields(&args[2..]);
                let mut state = ctx.state.borrow_mut();
                match edit_factura(&mut state, id, &fields) {
                    Ok(()) => println!("Factura actualizada correctamente"),
                    Err(msg) => println!("{}", msg),
                }
            }
            None => println!("Uso: facturacion edit <id> <campo=valor> ..."),
        },
        Some("rm") => match args.get(1).and_then(|s| s.parse::<u32>().ok()) {
            Some(id) => {
                let mut state = ctx.state.borrow_mut();
                if remove_factura(&mut state, id) {
                    println!("Factura {} eliminada", id);
                } else {
                    println!("No existe la factura {}", id);
                }
            }
            None => println!("Uso: facturacion rm <id>"),
        },
        Some(other) => {
            println!("Subcomando desconocido: {}", other);
            println!("Uso: facturacion [add <campos>|edit <id> <campos>|rm <id>]");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (ShopState, NaiveDate) {
        let hoy = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        (ShopState::seed_at(hoy), hoy)
    }

    fn valid_args() -> Vec<String> {
        vec![
            "cliente=Juan Pérez".to_string(),
            "total=1500.50".to_string(),
            "nit=1234567".to_string(),
            "dpi=1234567890123".to_string(),
            "placa=p075lok".to_string(),
            "marca=Ferrari".to_string(),
        ]
    }

    #[test]
    fn test_add_factura_normalizes_placa() {
        let (mut state, hoy) = fixture();
        let id = add_factura(&mut state, &valid_args(), hoy).unwrap();
        let factura = state.facturas.iter().find(|f| f.id == id).unwrap();
        assert_eq!(factura.placa, "P075LOK");
        assert_eq!(factura.estado, EstadoFactura::Pendiente);
        assert_eq!(factura.fecha, hoy);
        assert!((factura.total - 1500.50).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_factura_rejects_bad_nit() {
        let (mut state, hoy) = fixture();
        let mut args = valid_args();
        args[2] = "nit=12345".to_string();
        let err = add_factura(&mut state, &args, hoy).unwrap_err();
        assert_eq!(err, MSG_NIT);
        assert!(state.facturas.is_empty());
    }

    #[test]
    fn test_add_factura_rejects_bad_dpi() {
        let (mut state, hoy) = fixture();
        let mut args = valid_args();
        args[3] = "dpi=123".to_string();
        assert_eq!(add_factura(&mut state, &args, hoy).unwrap_err(), MSG_DPI);
    }

    #[test]
    fn test_add_factura_rejects_bad_placa() {
        let (mut state, hoy) = fixture();
        let mut args = valid_args();
        args[4] = "placa=123ABCD".to_string();
        assert_eq!(add_factura(&mut state, &args, hoy).unwrap_err(), MSG_PLACA);
    }

    #[test]
    fn test_edit_factura_partial_update() {
        let (mut state, hoy) = fixture();
        let id = add_factura(&mut state, &valid_args(), hoy).unwrap();

        let mut fields = HashMap::new();
        fields.insert("estado".to_string(), "pagada".to_string());
        fields.insert("total".to_string(), "1800".to_string());
        edit_factura(&mut state, id, &fields).unwrap();

        let factura = state.facturas.iter().find(|f| f.id == id).unwrap();
        assert_eq!(factura.estado, EstadoFactura::Pagada);
        assert!((factura.total - 1800.0).abs() < f64::EPSILON);
        // Untouched fields survive.
        assert_eq!(factura.cliente, "Juan Pérez");
    }

    #[test]
    fn test_edit_factura_invalid_field_changes_nothing() {
        let (mut state, hoy) = fixture();
        let id = add_factura(&mut state, &valid_args(), hoy).unwrap();

        let mut fields = HashMap::new();
        fields.insert("cliente".to_string(), "Otro".to_string());
        fields.insert("nit".to_string(), "bad".to_string());
        assert!(edit_factura(&mut state, id, &fields).is_err());

        let factura = state.facturas.iter().find(|f| f.id == id).unwrap();
        assert_eq!(factura.cliente, "Juan Pérez");
        assert_eq!(factura.nit, "1234567");
    }

    #[test]
    fn test_remove_factura() {
        let (mut state, hoy) = fixture();
        let id = add_factura(&mut state, &valid_args(), hoy).unwrap();
        assert!(remove_factura(&mut state, id));
        assert!(!remove_factura(&mut state, id));
    }
}
