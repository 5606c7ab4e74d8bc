//! The empleados tab. Mutations are restricted to administrators.

use crate::access::{self, Role};
use crate::cli::Context;
use crate::screens::parse_fields;
use crate::state::{puesto_by_id, Empleado, ShopState, PUESTOS};
use crate::validate;
use anyhow::Result;
use chrono::{Local, NaiveDate};

const MSG_SOLO_ADMIN: &str = "Solo los administradores pueden gestionar empleados";

fn add_empleado(state: &mut ShopState, args: &[String], hoy: NaiveDate) -> Result<u32, String> {
    let (fields, _) = parse_fields(args);

    let nombres = fields
        .get("nombres")
        .cloned()
        .ok_or("Falta el campo nombres")?;
    let apellidos = fields
        .get("apellidos")
        .cloned()
        .ok_or("Falta el campo apellidos")?;
    let dpi = fields.get("dpi").cloned().ok_or("Falta el campo dpi")?;
    if !validate::valid_dpi(&dpi) {
        return Err("El DPI debe tener exactamente 13 dígitos".to_string());
    }
    if let Some(telefono) = fields.get("telefono") {
        if !validate::valid_telefono(telefono) {
            return Err(format!("Teléfono inválido: {}", telefono));
        }
    }
    if let Some(email) = fields.get("email") {
        if !validate::valid_email(email) {
            return Err(format!("Email inválido: {}", email));
        }
    }

    let id_puesto = match fields.get("puesto") {
        Some(raw) => {
            let id = raw
                .parse::<u32>()
                .map_err(|_| format!("Puesto inválido: {}", raw))?;
            if puesto_by_id(id).is_none() {
                return Err(format!("Puesto inválido: {}", raw));
            }
            id
        }
        None => return Err("Falta el campo puesto".to_string()),
    };
    let fecha_ingreso = match fields.get("fecha_ingreso") {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| format!("Fecha inválida: {} (use AAAA-MM-DD)", raw))?,
        None => hoy,
    };
    let salario = match fields.get("salario") {
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| format!("Salario inválido: {}", raw))?,
        None => 0.0,
    };

    let id = state.next_empleado_id();
    state.empleados.push(Empleado {
        id_empleado: id,
        nombres,
        apellidos,
        dpi,
        nit: fields.get("nit").cloned().unwrap_or_default(),
        telefono: fields.get("telefono").cloned().unwrap_or_default(),
        email: fields.get("email").cloned().unwrap_or_default(),
        direccion: fields.get("direccion").cloned().unwrap_or_default(),
        id_puesto,
        fecha_ingreso,
        salario,
        activo: true,
    });
    Ok(id)
}

fn remove_empleado(state: &mut ShopState, id: u32) -> bool {
    let before = state.empleados.len();
    state.empleados.retain(|e| e.id_empleado != id);
    state.empleados.len() != before
}

fn print_empleado(e: &Empleado) {
    let estado = if e.activo { "" } else { " (inactivo)" };
    println!(
        "  [{}] {} {} - {} / {}{}",
        e.id_empleado,
        e.nombres,
        e.apellidos,
        e.puesto(),
        e.departamento(),
        estado
    );
    println!(
        "      DPI {} - NIT {} - Tel {} - ingreso {} - Q{:.2}",
        e.dpi, e.nit, e.telefono, e.fecha_ingreso, e.salario
    );
    if !e.email.is_empty() {
        println!("      {} - {}", e.email, e.direccion);
    }
}

pub fn run(ctx: &Context, args: &[String]) -> Result<()> {
    let es_admin = {
        let session = ctx.session.borrow();
        access::has_role(session.current_user(), Role::Administrador)
    };
    let hoy = Local::now().date_naive();

    match args.first().map(String::as_str) {
        None => {
            let state = ctx.state.borrow();
            println!("GESTIÓN DE EMPLEADOS");
            if state.empleados.is_empty() {
                println!("  No hay empleados registrados");
            }
            for empleado in &state.empleados {
                print_empleado(empleado);
            }
            println!();
            println!("Puestos:");
            for puesto in PUESTOS {
                println!("  {} - {} ({})", puesto.id, puesto.nombre, puesto.departamento);
            }
        }
        Some("add") => {
            if !es_admin {
                println!("{}", MSG_SOLO_ADMIN);
                return Ok(());
            }
            let mut state = ctx.state.borrow_mut();
            match add_empleado(&mut state, &args[1..], hoy) {
                Ok(id) => println!("Empleado registrado con id {}", id),
                Err(msg) => println!("{}", msg),
            }
        }
        Some("rm") => {
            if !es_admin {
                println!("{}", MSG_SOLO_ADMIN);
                return Ok(());
            }
            match args.get(1).and_then(|s| s.parse::<u32>().ok()) {
                Some(id) => {
                    let mut state = ctx.state.borrow_mut();
                    if remove_empleado(&mut state, id) {
                        println!("Empleado {} eliminado", id);
                    } else {
                        println!("No existe el empleado {}", id);
                    }
                }
                None => println!("Uso: empleados rm <id>"),
            }
        }
        Some(other) => {
            println!("Subcomando desconocido: {}", other);
            println!("Uso: empleados [add <campos>|rm <id>]");
        }
    }

    Ok(())
}
