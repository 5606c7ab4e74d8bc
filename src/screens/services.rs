//! The servicios tab, backed by the REST collection `/servicios`.

use crate::cli::Context;
use crate::screens::fetch_list;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Servicio {
    pub id_servicio: u32,
    pub nombre_servicio: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    pub precio_base: f64,
    #[serde(default)]
    pub tiempo_estimado_horas: Option<f64>,
    #[serde(default = "default_active")]
    pub activo: bool,
}

fn default_active() -> bool {
    true
}

pub fn run(ctx: &Context, args: &[String]) -> Result<()> {
    if let Some(other) = args.first() {
        println!("Subcomando desconocido: {}", other);
        println!("Uso: servicios");
        return Ok(());
    }

    println!("SERVICIOS");
    let servicios: Vec<Servicio> = fetch_list(ctx, "servicios");
    if servicios.is_empty() {
        println!("  No hay servicios registrados");
    }
    for s in servicios {
        let estado = if s.activo { "" } else { " (inactivo)" };
        println!(
            "  [{}] {} - Q{:.2}{}",
            s.id_servicio, s.nombre_servicio, s.precio_base, estado
        );
        if let Some(horas) = s.tiempo_estimado_horas {
            println!("      tiempo estimado: {} h", horas);
        }
        if let Some(desc) = &s.descripcion {
            println!("      {}", desc);
        }
    }

    Ok(())
}
