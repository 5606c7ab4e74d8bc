//! The clientes tab, backed by the REST collection `/clientes`.

use crate::cli::Context;
use crate::screens::{fetch_list, parse_fields};
use crate::validate;
use anyhow::Result;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct Cliente {
    pub id_cliente: u32,
    pub nombres: String,
    #[serde(default)]
    pub apellidos: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
}

pub fn run(ctx: &Context, args: &[String]) -> Result<()> {
    match args.first().map(String::as_str) {
        None => {
            println!("GESTIÓN DE CLIENTES");
            let clientes: Vec<Cliente> = fetch_list(ctx, "clientes");
            if clientes.is_empty() {
                println!("  No hay clientes registrados");
            }
            for cliente in clientes {
                println!(
                    "  [{}] {} {} - Tel: {}",
                    cliente.id_cliente, cliente.nombres, cliente.apellidos, cliente.telefono
                );
                if let Some(email) = &cliente.email {
                    println!("      {}", email);
                }
                if let Some(direccion) = &cliente.direccion {
                    println!("      {}", direccion);
                }
            }
        }
        Some("add") => {
            let (fields, _) = parse_fields(&args[1..]);
            let Some(nombres) = fields.get("nombres") else {
                println!("Falta el campo nombres");
                return Ok(());
            };
            let Some(telefono) = fields.get("telefono") else {
                println!("Falta el campo telefono");
                return Ok(());
            };
            if !validate::valid_telefono(telefono) {
                println!("Teléfono inválido: {} (use 0000-0000)", telefono);
                return Ok(());
            }
            if let Some(email) = fields.get("email") {
                if !validate::valid_email(email) {
                    println!("Email inválido: {}", email);
                    return Ok(());
                }
            }

            let body = json!({
                "nombres": nombres,
                "apellidos": fields.get("apellidos").cloned().unwrap_or_default(),
                "telefono": telefono,
                "email": fields.get("email"),
                "direccion": fields.get("direccion"),
            });
            match ctx.api.create("clientes", &body) {
                Ok(_) => println!("Cliente registrado"),
                Err(err) => {
                    let _ = ctx
                        .audit
                        .borrow_mut()
                        .api_error("clientes", &err.to_string());
                    eprintln!("Error registrando cliente: {}", err);
                }
            }
        }
        Some("rm") => match args.get(1).and_then(|s| s.parse::<u32>().ok()) {
            Some(id) => match ctx.api.delete("clientes", id) {
                Ok(()) => println!("Cliente {} eliminado", id),
                Err(err) => {
                    let _ = ctx
                        .audit
                        .borrow_mut()
                        .api_error("clientes", &err.to_string());
                    eprintln!("Error eliminando cliente: {}", err);
                }
            },
            None => println!("Uso: clientes rm <id>"),
        },
        Some(other) => {
            println!("Subcomando desconocido: {}", other);
            println!("Uso: clientes [add <campos>|rm <id>]");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cliente_deserializes_minimal_row() {
        let row = serde_json::json!({ "id_cliente": 7, "nombres": "Ana" });
        let cliente: Cliente = serde_json::from_value(row).unwrap();
        assert_eq!(cliente.id_cliente, 7);
        assert_eq!(cliente.apellidos, "");
        assert!(cliente.email.is_none());
    }
}
