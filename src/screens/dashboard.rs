//! The inicio tab: welcome banner, quick stats, urgent repairs and the
//! day's appointments.

use crate::cli::Context;
use crate::screens::{DIAS_SEMANA, MESES};
use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};

/// Quick stats shown on the panel. Sample figures, as in the original
/// dashboard; the module screens hold the real listings.
struct Stats {
    clientes: u32,
    vehiculos: u32,
    reparaciones: u32,
    ingresos: &'static str,
}

const STATS: Stats = Stats {
    clientes: 42,
    vehiculos: 18,
    reparaciones: 7,
    ingresos: "Q12,850",
};

fn fecha_larga(fecha: NaiveDate) -> String {
    let dia = DIAS_SEMANA[fecha.weekday().num_days_from_sunday() as usize];
    let mes = MESES[fecha.month0() as usize];
    format!("{} {} de {}", dia, fecha.day(), mes)
}

pub fn run(ctx: &Context, _args: &[String]) -> Result<()> {
    let hoy = Local::now().date_naive();

    println!("PANEL DE CONTROL");
    {
        let session = ctx.session.borrow();
        if let Some(user) = session.current_user() {
            println!("Bienvenido, {}", user.nombre);
        }
    }
    println!("Hoy es {}", fecha_larga(hoy));

    let state = ctx.state.borrow();
    let urgentes_hoy = state.urgentes.len();
    if urgentes_hoy > 0 {
        println!("⚠ {} reparaciones urgentes hoy", urgentes_hoy);
    }

    println!();
    println!("  Clientes:     {}", STATS.clientes);
    println!("  Vehículos:    {}", STATS.vehiculos);
    println!("  Reparaciones: {}", STATS.reparaciones);
    println!("  Ingresos:     {}", STATS.ingresos);

    println!();
    println!("Reparaciones Urgentes:");
    if state.urgentes.is_empty() {
        println!("  (ninguna)");
    }
    for repair in &state.urgentes {
        println!(
            "  [{}] {} - {} (prioridad {})",
            repair.id,
            repair.vehiculo,
            repair.cliente,
            repair.prioridad.as_str()
        );
    }

    println!();
    println!("Próximas Citas:");
    let proximas: Vec<_> = state.citas.iter().filter(|c| c.fecha >= hoy).collect();
    if proximas.is_empty() {
        println!("  (ninguna)");
    }
    for cita in proximas {
        println!(
            "  {} {} - {} ({})",
            cita.fecha.format("%d/%m"),
            cita.hora,
            cita.titulo,
            cita.vehiculo
        );
    }

    Ok(())
}
