//! The inventario tab, backed by the REST collection `/repuestos`.

use crate::cli::Context;
use crate::screens::fetch_list;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Repuesto {
    pub id_repuesto: u32,
    pub codigo_repuesto: String,
    pub nombre_repuesto: String,
    pub precio_venta: f64,
    #[serde(default)]
    pub stock_actual: u32,
    #[serde(default = "default_stock_minimo")]
    pub stock_minimo: u32,
    #[serde(default)]
    pub ubicacion_almacen: Option<String>,
}

fn default_stock_minimo() -> u32 {
    5
}

impl Repuesto {
    pub fn stock_bajo(&self) -> bool {
        self.stock_actual <= self.stock_minimo
    }
}

pub fn run(ctx: &Context, args: &[String]) -> Result<()> {
    if let Some(other) = args.first() {
        println!("Subcomando desconocido: {}", other);
        println!("Uso: inventario");
        return Ok(());
    }

    println!("INVENTARIO");
    let repuestos: Vec<Repuesto> = fetch_list(ctx, "repuestos");
    if repuestos.is_empty() {
        println!("  No hay repuestos registrados");
    }
    for r in &repuestos {
        let alerta = if r.stock_bajo() { "  ⚠ STOCK BAJO" } else { "" };
        println!(
            "  [{}] {} {} - Q{:.2} - stock {}/{}{}",
            r.id_repuesto,
            r.codigo_repuesto,
            r.nombre_repuesto,
            r.precio_venta,
            r.stock_actual,
            r.stock_minimo,
            alerta
        );
        if let Some(ubicacion) = &r.ubicacion_almacen {
            println!("      ubicación: {}", ubicacion);
        }
    }

    Ok(())
}
