//! The usuarios tab: account administration with search, role filter,
//! activation toggling and per-module permission assignment.

use crate::access::{Permission, Role, ALL_PERMISSIONS};
use crate::cli::Context;
use crate::screens::parse_fields;
use crate::state::{Cuenta, ShopState};
use crate::validate;
use anyhow::Result;

fn filter_cuentas<'a>(
    state: &'a ShopState,
    term: Option<&str>,
    rol: Option<Role>,
) -> Vec<&'a Cuenta> {
    let term = term.map(str::to_lowercase);
    state
        .cuentas
        .iter()
        .filter(|c| match &term {
            Some(t) => {
                c.nombre.to_lowercase().contains(t) || c.email.to_lowercase().contains(t)
            }
            None => true,
        })
        .filter(|c| match rol {
            Some(r) => c.rol == r,
            None => true,
        })
        .collect()
}

fn parse_permisos(raw: &str) -> Result<Vec<Permission>, String> {
    let mut permisos = Vec::new();
    for part in raw.split(',').filter(|p| !p.is_empty()) {
        match Permission::from_str(part) {
            Some(p) => {
                if !permisos.contains(&p) {
                    permisos.push(p);
                }
            }
            None => {
                let catalog: Vec<&str> = ALL_PERMISSIONS.iter().map(|p| p.as_str()).collect();
                return Err(format!(
                    "Permiso desconocido: {}. Disponibles: {}",
                    part,
                    catalog.join(", ")
                ));
            }
        }
    }
    Ok(permisos)
}

fn add_cuenta(state: &mut ShopState, args: &[String]) -> Result<u32, String> {
    let (fields, flags) = parse_fields(args);

    let nombre = fields
        .get("nombre")
        .cloned()
        .ok_or("Falta el campo nombre")?;
    let email = fields.get("email").cloned().ok_or("Falta el campo email")?;
    if !validate::valid_email(&email) {
        return Err(format!("Email inválido: {}", email));
    }
    let rol = match fields.get("rol") {
        Some(raw) => Role::from_str(raw).ok_or(format!("Rol desconocido: {}", raw))?,
        None => return Err("Falta el campo rol".to_string()),
    };
    let permisos = match fields.get("permisos") {
        Some(raw) => parse_permisos(raw)?,
        None => vec![Permission::Dashboard],
    };

    let id = state.next_cuenta_id();
    state.cuentas.push(Cuenta {
        id,
        nombre,
        email,
        telefono: fields.get("telefono").cloned().unwrap_or_default(),
        rol,
        activo: !flags.iter().any(|f| f == "inactivo"),
        permisos,
    });
    Ok(id)
}

fn remove_cuenta(state: &mut ShopState, id: u32) -> bool {
    let before = state.cuentas.len();
    state.cuentas.retain(|c| c.id != id);
    state.cuentas.len() != before
}

fn toggle_cuenta(state: &mut ShopState, id: u32) -> Option<bool> {
    let cuenta = state.cuentas.iter_mut().find(|c| c.id == id)?;
    cuenta.activo = !cuenta.activo;
    Some(cuenta.activo)
}

fn set_permisos(state: &mut ShopState, id: u32, raw: &str) -> Result<(), String> {
    let permisos = parse_permisos(raw)?;
    let cuenta = state
        .cuentas
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or(format!("No existe el usuario {}", id))?;
    cuenta.permisos = permisos;
    Ok(())
}

fn print_cuenta(cuenta: &Cuenta) {
    let estado = if cuenta.activo { "activo" } else { "inactivo" };
    println!(
        "  [{}] {} <{}> - {} ({})",
        cuenta.id,
        cuenta.nombre,
        cuenta.email,
        cuenta.rol.label(),
        estado
    );
    if !cuenta.telefono.is_empty() {
        println!("      tel: {}", cuenta.telefono);
    }
    let permisos: Vec<&str> = cuenta.permisos.iter().map(|p| p.as_str()).collect();
    println!("      permisos: {}", permisos.join(", "));
}

pub fn run(ctx: &Context, args: &[String]) -> Result<()> {
    match args.first().map(String::as_str) {
        None => {
            let state = ctx.state.borrow();
            println!("GESTIÓN DE USUARIOS");
            for cuenta in filter_cuentas(&state, None, None) {
                print_cuenta(cuenta);
            }
        }
        Some("buscar") => {
            let term = args[1..].join(" ");
            let state = ctx.state.borrow();
            let found = filter_cuentas(&state, Some(&term), None);
            if found.is_empty() {
                println!("Sin resultados para '{}'", term);
            }
            for cuenta in found {
                print_cuenta(cuenta);
            }
        }
        Some("rol") => {
            let raw = args.get(1).map(String::as_str).unwrap_or("");
            let rol = if raw == "todos" { None } else { Role::from_str(raw) };
            if rol.is_none() && raw != "todos" {
                println!("Rol desconocido: {}", raw);
                return Ok(());
            }
            let state = ctx.state.borrow();
            for cuenta in filter_cuentas(&state, None, rol) {
                print_cuenta(cuenta);
            }
        }
        Some("add") => {
            let mut state = ctx.state.borrow_mut();
            match add_cuenta(&mut state, &args[1..]) {
                Ok(id) => println!("Usuario creado con id {}", id),
                Err(msg) => println!("{}", msg),
            }
        }
        Some("rm") => match args.get(1).and_then(|s| s.parse::<u32>().ok()) {
            Some(id) => {
                let mut state = ctx.state.borrow_mut();
                if remove_cuenta(&mut state, id) {
                    println!("Usuario {} eliminado", id);
                } else {
                    println!("No existe el usuario {}", id);
                }
            }
            None => println!("Uso: usuarios rm <id>"),
        },
        Some("toggle") => match args.get(1).and_then(|s| s.parse::<u32>().ok()) {
            Some(id) => {
                let mut state = ctx.state.borrow_mut();
                match toggle_cuenta(&mut state, id) {
                    Some(true) => println!("Usuario {} activado", id),
                    Some(false) => println!("Usuario {} desactivado", id),
                    None => println!("No existe el usuario {}", id),
                }
            }
            None => println!("Uso: usuarios toggle <id>"),
        },
        Some("permisos") => {
            let id = args.get(1).and_then(|s| s.parse::<u32>().ok());
            let raw = args.get(2).map(String::as_str);
            match (id, raw) {
                (Some(id), Some(raw)) => {
                    let mut state = ctx.state.borrow_mut();
                    match set_permisos(&mut state, id, raw) {
                        Ok(()) => println!("Permisos actualizados"),
                        Err(msg) => println!("{}", msg),
                    }
                }
                _ => println!("Uso: usuarios permisos <id> <p1,p2,...>"),
            }
        }
        Some(other) => {
            println!("Subcomando desconocido: {}", other);
            println!(
                "Uso: usuarios [buscar <término>|rol <rol|todos>|add <campos>|rm <id>|toggle <id>|permisos <id> <lista>]"
            );
        }
    }

    Ok(())
}
