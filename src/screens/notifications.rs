//! The notificaciones tab: reminders and alerts.

use crate::cli::Context;
use crate::state::TipoNotificacion;
use anyhow::Result;

pub fn run(ctx: &Context, args: &[String]) -> Result<()> {
    match args.first().map(String::as_str) {
        None => {
            let state = ctx.state.borrow();
            println!("NOTIFICACIONES");
            if state.notificaciones.is_empty() {
                println!("  No hay notificaciones");
            }
            for n in &state.notificaciones {
                let tipo = match n.tipo {
                    TipoNotificacion::Recordatorio => "recordatorio",
                    TipoNotificacion::Alerta => "alerta",
                };
                let marca = if n.leida { " " } else { "•" };
                println!("  {} [{}] {} ({}) - {}", marca, n.id, n.mensaje, tipo, n.hora);
            }
        }
        Some("leer") => match args.get(1).and_then(|s| s.parse::<u32>().ok()) {
            Some(id) => {
                let mut state = ctx.state.borrow_mut();
                match state.notificaciones.iter_mut().find(|n| n.id == id) {
                    Some(n) => {
                        n.leida = true;
                        println!("Notificación {} marcada como leída", id);
                    }
                    None => println!("No existe la notificación {}", id),
                }
            }
            None => println!("Uso: notificaciones leer <id>"),
        },
        Some(other) => {
            println!("Subcomando desconocido: {}", other);
            println!("Uso: notificaciones [leer <id>]");
        }
    }

    Ok(())
}
