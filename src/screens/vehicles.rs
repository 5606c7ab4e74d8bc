//! The expedientes tab: vehicle records from the REST collection
//! `/vehiculos`.

use crate::cli::Context;
use crate::screens::fetch_list;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Vehiculo {
    pub id_vehiculo: u32,
    #[serde(default)]
    pub id_cliente: u32,
    pub marca: String,
    pub modelo: String,
    #[serde(default, rename = "año")]
    pub anio: Option<i32>,
    pub placa: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub kilometraje: Option<u32>,
}

pub fn run(ctx: &Context, args: &[String]) -> Result<()> {
    if let Some(other) = args.first() {
        println!("Subcomando desconocido: {}", other);
        println!("Uso: expedientes");
        return Ok(());
    }

    println!("EXPEDIENTES DE VEHÍCULOS");
    let vehiculos: Vec<Vehiculo> = fetch_list(ctx, "vehiculos");
    if vehiculos.is_empty() {
        println!("  No hay vehículos registrados");
    }
    for v in vehiculos {
        let anio = v.anio.map(|a| a.to_string()).unwrap_or_default();
        println!(
            "  [{}] {} {} {} - placa {} (cliente {})",
            v.id_vehiculo, v.marca, v.modelo, anio, v.placa, v.id_cliente
        );
        if let Some(km) = v.kilometraje {
            let color = v.color.as_deref().unwrap_or("-");
            println!("      {} km - color {}", km, color);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehiculo_deserializes_accented_field() {
        let row = serde_json::json!({
            "id_vehiculo": 3,
            "id_cliente": 1,
            "marca": "Ferrari",
            "modelo": "488",
            "año": 2019,
            "placa": "P075LOK"
        });
        let v: Vehiculo = serde_json::from_value(row).unwrap();
        assert_eq!(v.anio, Some(2019));
        assert_eq!(v.placa, "P075LOK");
    }
}
