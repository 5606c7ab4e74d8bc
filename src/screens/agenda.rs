//! The agenda tab: month calendar, appointment management and search.

use crate::cli::Context;
use crate::screens::{parse_fields, DIAS_SEMANA, MESES};
use crate::state::{Cita, Prioridad, ShopState, TipoCita};
use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};

/// Day count and starting weekday (0 = Sunday) for the month containing
/// `date`.
pub fn month_grid(date: NaiveDate) -> (u32, u32) {
    let first = date.with_day(1).unwrap_or(date);
    let (next_year, next_month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    let days_in_month = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(30);
    let starting_day = first.weekday().num_days_from_sunday();
    (days_in_month, starting_day)
}

/// First day of the month `offset` months away from `date`'s month.
pub fn shift_month(date: NaiveDate, offset: i32) -> NaiveDate {
    let months = date.year() * 12 + date.month0() as i32 + offset;
    let year = months.div_euclid(12);
    let month = months.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

fn citas_del_dia(state: &ShopState, fecha: NaiveDate) -> Vec<&Cita> {
    state.citas.iter().filter(|c| c.fecha == fecha).collect()
}

fn buscar<'a>(state: &'a ShopState, term: &str) -> Vec<&'a Cita> {
    let term = term.to_lowercase();
    state
        .citas
        .iter()
        .filter(|c| {
            c.titulo.to_lowercase().contains(&term)
                || c.cliente.to_lowercase().contains(&term)
                || c.vehiculo.to_lowercase().contains(&term)
        })
        .collect()
}

fn render_month(state: &ShopState, hoy: NaiveDate) {
    let first = state.agenda_month;
    let (days, start) = month_grid(first);

    println!(
        "{} {}",
        MESES[first.month0() as usize],
        first.year()
    );
    for name in DIAS_SEMANA {
        print!(" {:>4}", name);
    }
    println!();

    let mut col = 0;
    for _ in 0..start {
        print!(" {:>4}", "");
        col += 1;
    }
    for day in 1..=days {
        let fecha = first.with_day(day).unwrap_or(first);
        let count = citas_del_dia(state, fecha).len();
        let marker = if fecha == hoy {
            "*"
        } else if count > 0 {
            "."
        } else {
            " "
        };
        print!(" {:>3}{}", day, marker);
        col += 1;
        if col == 7 {
            println!();
            col = 0;
        }
    }
    if col != 0 {
        println!();
    }
    println!("(* hoy, . con citas)");
}

fn print_cita(cita: &Cita) {
    let recordatorio = if cita.recordatorio { " ⏰" } else { "" };
    println!(
        "  [{}] {} {} - {} ({}, prioridad {}){}",
        cita.id,
        cita.fecha,
        cita.hora,
        cita.titulo,
        cita.tipo.as_str(),
        cita.prioridad.as_str(),
        recordatorio
    );
    if !cita.cliente.is_empty() || !cita.vehiculo.is_empty() {
        println!("      {} / {}", cita.cliente, cita.vehiculo);
    }
    if !cita.descripcion.is_empty() {
        println!("      {}", cita.descripcion);
    }
}

fn add_cita(state: &mut ShopState, args: &[String], hoy: NaiveDate) -> Result<u32, String> {
    let (fields, flags) = parse_fields(args);

    let titulo = fields
        .get("titulo")
        .cloned()
        .ok_or("Falta el campo titulo")?;
    let hora = fields.get("hora").cloned().ok_or("Falta el campo hora")?;
    let fecha = match fields.get("fecha") {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| format!("Fecha inválida: {} (use AAAA-MM-DD)", raw))?,
        None => hoy,
    };
    let tipo = match fields.get("tipo") {
        Some(raw) => TipoCita::from_str(raw).ok_or(format!("Tipo inválido: {}", raw))?,
        None => TipoCita::Cita,
    };
    let prioridad = match fields.get("prioridad") {
        Some(raw) => Prioridad::from_str(raw).ok_or(format!("Prioridad inválida: {}", raw))?,
        None => Prioridad::Media,
    };

    let id = state.next_cita_id();
    state.citas.push(Cita {
        id,
        fecha,
        titulo,
        tipo,
        hora,
        prioridad,
        cliente: fields.get("cliente").cloned().unwrap_or_default(),
        vehiculo: fields.get("vehiculo").cloned().unwrap_or_default(),
        descripcion: fields.get("descripcion").cloned().unwrap_or_default(),
        recordatorio: flags.iter().any(|f| f == "recordatorio"),
    });
    Ok(id)
}

fn remove_cita(state: &mut ShopState, id: u32) -> bool {
    let before = state.citas.len();
    state.citas.retain(|c| c.id != id);
    state.citas.len() != before
}

pub fn run(ctx: &Context, args: &[String]) -> Result<()> {
    let hoy = Local::now().date_naive();

    match args.first().map(String::as_str) {
        None => {
            let state = ctx.state.borrow();
            println!("AGENDA");
            render_month(&state, hoy);
            println!();
            println!("CITAS DEL {}", hoy.format("%d/%m/%Y"));
            let del_dia = citas_del_dia(&state, hoy);
            if del_dia.is_empty() {
                println!("  No hay citas programadas para este día");
            }
            for cita in del_dia {
                print_cita(cita);
            }
        }
        Some("next") => {
            let mut state = ctx.state.borrow_mut();
            state.agenda_month = shift_month(state.agenda_month, 1);
            render_month(&state, hoy);
        }
        Some("prev") => {
            let mut state = ctx.state.borrow_mut();
            state.agenda_month = shift_month(state.agenda_month, -1);
            render_month(&state, hoy);
        }
        Some("dia") => {
            let raw = args.get(1).map(String::as_str).unwrap_or("");
            match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(fecha) => {
                    let state = ctx.state.borrow();
                    println!("CITAS DEL {}", fecha.format("%d/%m/%Y"));
                    let del_dia = citas_del_dia(&state, fecha);
                    if del_dia.is_empty() {
                        println!("  No hay citas programadas para este día");
                    }
                    for cita in del_dia {
                        print_cita(cita);
                    }
                }
                Err(_) => println!("Uso: agenda dia <AAAA-MM-DD>"),
            }
        }
        Some("add") => {
            let mut state = ctx.state.borrow_mut();
            match add_cita(&mut state, &args[1..], hoy) {
                Ok(id) => println!("Cita registrada con id {}", id),
                Err(msg) => println!("{}", msg),
            }
        }
        Some("rm") => match args.get(1).and_then(|s| s.parse::<u32>().ok()) {
            Some(id) => {
                let mut state = ctx.state.borrow_mut();
                if remove_cita(&mut state, id) {
                    println!("Cita {} eliminada", id);
                } else {
                    println!("No existe la cita {}", id);
                }
            }
            None => println!("Uso: agenda rm <id>"),
        },
        Some("buscar") => {
            let term = args[1..].join(" ");
            if term.is_empty() {
                println!("Uso: agenda buscar <término>");
            } else {
                let state = ctx.state.borrow();
                let found = buscar(&state, &term);
                if found.is_empty() {
                    println!("Sin resultados para '{}'", term);
                }
                for cita in found {
                    print_cita(cita);
                }
            }
        }
        Some(other) => {
            println!("Subcomando desconocido: {}", other);
            println!("Uso: agenda [next|prev|dia <fecha>|add <campos>|rm <id>|buscar <término>]");
        }
    }

    Ok(())
}
