use crate::access::{self, Tab};
use crate::api::ShopApi;
use crate::audit::AuditLog;
use crate::config::Config;
use crate::guard::{self, GuardOutcome};
use crate::menu;
use crate::screens;
use crate::session::{AccountStore, AuthError, SessionState};
use crate::state::ShopState;
use crate::store::Store;
use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::cell::{Cell, RefCell};

/// Top-level owner of all mutable state. The session lives here and is
/// passed down; no other component keeps its own copy.
pub struct Context {
    pub config: Config,
    pub debug: bool,
    pub session_id: String,
    pub store: Store,
    pub accounts: AccountStore,
    pub session: RefCell<SessionState>,
    pub api: Box<dyn ShopApi>,
    pub audit: RefCell<AuditLog>,
    pub state: RefCell<ShopState>,
    /// `None` means the login view.
    pub current_view: Cell<Option<Tab>>,
    /// One-shot deferred redirect scheduled by an unauthenticated guard
    /// decision; drained after the current command completes.
    pub pending_login_redirect: Cell<bool>,
}

pub fn run_once(ctx: &Context, command: &str) -> Result<()> {
    dispatch_line(ctx, command)?;
    drain_redirect(ctx);
    Ok(())
}

pub fn run_repl(ctx: Context) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("TALLER MECÁNICO - Sistema de Gestión");
    if ctx.session.borrow().is_authenticated() {
        if let Some(user) = ctx.session.borrow().current_user() {
            println!("Sesión restaurada: {} ({})", user.nombre, user.role_label());
        }
    } else {
        println!("Use: login <email> <contraseña>");
    }
    println!("Escriba 'help' para ver los comandos, 'exit' para salir");

    loop {
        match rl.readline("taller> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                match dispatch_line(&ctx, line) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(e) => eprintln!("Error: {}", e),
                }
                drain_redirect(&ctx);
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Execute the one-shot redirect scheduled while handling the last
/// command, after its render pass has completed.
fn drain_redirect(ctx: &Context) {
    if ctx.pending_login_redirect.replace(false) {
        ctx.current_view.set(None);
        println!("Redirigiendo al login. Use: login <email> <contraseña>");
    }
}

fn dispatch_line(ctx: &Context, line: &str) -> Result<bool> {
    let words = match shell_words::split(line) {
        Ok(words) => words,
        Err(e) => {
            println!("Línea inválida: {}", e);
            return Ok(false);
        }
    };
    let Some(command) = words.first() else {
        return Ok(false);
    };
    let rest = &words[1..];

    match command.as_str() {
        "exit" | "quit" | "salir" => return Ok(true),
        "help" | "ayuda" => print_help(),
        "login" => handle_login(ctx, rest),
        "logout" => handle_logout(ctx),
        "session" | "sesion" => handle_session(ctx),
        "menu" => handle_menu(ctx),
        "open" | "abrir" => match rest.first().and_then(|s| Tab::from_str(s)) {
            Some(tab) => navigate(ctx, tab, &rest[1..])?,
            None => println!("Uso: open <pestaña>  (vea 'menu')"),
        },
        other => match Tab::from_str(other) {
            Some(tab) => navigate(ctx, tab, rest)?,
            None => println!("Comando desconocido: {} (pruebe 'help')", other),
        },
    }
    Ok(false)
}

fn print_help() {
    println!("Comandos:");
    println!("  help                      - mostrar esta ayuda");
    println!("  login <email> <password>  - iniciar sesión");
    println!("  logout                    - cerrar sesión");
    println!("  session                   - información de la sesión");
    println!("  menu                      - pestañas disponibles para su usuario");
    println!("  open <pestaña> [args]     - abrir una pestaña (o escriba la pestaña directamente)");
    println!("  exit                      - salir");
    println!("Pestañas:");
    println!("  inicio, clientes, inventario, agenda, notificaciones, servicios,");
    println!("  expedientes, facturacion, empleados, usuarios");
    println!("Cada pestaña acepta subcomandos; ábrala sin argumentos para ver su uso.");
}

fn handle_login(ctx: &Context, args: &[String]) {
    let (Some(email), Some(password)) = (args.first(), args.get(1)) else {
        println!("Uso: login <email> <contraseña>");
        return;
    };

    let result = ctx
        .session
        .borrow_mut()
        .login(&ctx.store, &ctx.accounts, email, password);
    match result {
        Ok(user) => {
            let _ = ctx.audit.borrow_mut().login_ok(email, user.rol.as_str());
            println!("Bienvenido, {} ({})", user.nombre, user.role_label());
            ctx.current_view.set(Some(Tab::Inicio));
        }
        Err(AuthError::InvalidCredentials) => {
            let _ = ctx.audit.borrow_mut().login_failed(email);
            println!("Credenciales inválidas");
        }
        Err(err) => {
            let _ = ctx.audit.borrow_mut().login_failed(email);
            eprintln!("Error al iniciar sesión: {}", err);
        }
    }
}

fn handle_logout(ctx: &Context) {
    ctx.session.borrow_mut().logout(&ctx.store);
    let _ = ctx.audit.borrow_mut().logout();
    ctx.current_view.set(None);
    println!("Sesión cerrada");
}

fn handle_session(ctx: &Context) {
    let session = ctx.session.borrow();
    println!("Sesión: {}", ctx.session_id);
    println!("API: {}", ctx.config.api.base_url);
    println!("Auditoría: {:?}", ctx.audit.borrow().path);
    match session.current_user() {
        Some(user) => {
            println!("Usuario: {} <{}>", user.nombre, user.email);
            println!(
                "Rol: {} ({})",
                user.role_label(),
                if user.activo { "activo" } else { "inactivo" }
            );
            let modulos = access::allowed_modules(Some(user));
            let permisos: Vec<&str> = modulos.iter().map(|p| p.as_str()).collect();
            println!("Permisos: {}", permisos.join(", "));
        }
        None => println!("No hay sesión iniciada"),
    }
}

fn handle_menu(ctx: &Context) {
    let session = ctx.session.borrow();
    match guard::evaluate(&session, None) {
        GuardOutcome::RedirectToLogin => {
            ctx.pending_login_redirect.set(true);
        }
        GuardOutcome::Pending => {
            println!("Verificando autenticación... Por favor espere");
        }
        _ => {
            println!("Menú:");
            for item in access::filter_menu(session.current_user(), menu::main_menu()) {
                println!("  {:<24} ({})", item.name, item.tab.as_str());
            }
        }
    }
}

/// Run a tab through the route guard and, if allowed, render it.
fn navigate(ctx: &Context, tab: Tab, args: &[String]) -> Result<()> {
    let outcome = {
        let session = ctx.session.borrow();
        guard::evaluate(&session, menu::required_permission(tab))
    };

    match outcome {
        GuardOutcome::Pending => {
            println!("Verificando autenticación... Por favor espere");
        }
        GuardOutcome::RedirectToLogin => {
            // Render nothing now; the redirect runs after this pass.
            let _ = ctx.audit.borrow_mut().redirect_to_login(tab.as_str());
            ctx.pending_login_redirect.set(true);
        }
        GuardOutcome::Denied { rol, missing } => {
            let _ = ctx
                .audit
                .borrow_mut()
                .access_denied(tab.as_str(), rol.as_str(), missing.as_str());
            println!("🚫 Acceso Denegado");
            println!("No tienes permisos para acceder a esta sección.");
            println!("Tu rol: {}", rol.as_str());
            println!("Permiso requerido: {}", missing.as_str());
            println!("Use 'inicio' para volver al dashboard");
        }
        GuardOutcome::Render => {
            let _ = ctx.audit.borrow_mut().navigation(tab.as_str());
            ctx.current_view.set(Some(tab));
            screens::run(ctx, tab, args)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{Permission, Role};
    use crate::api::ApiError;
    use crate::session::Account;
    use chrono::NaiveDate;
    use serde_json::Value;

    struct OfflineApi;

    impl ShopApi for OfflineApi {
        fn list(&self, _resource: &str) -> Result<Vec<Value>, ApiError> {
            Err(ApiError::Transport("offline".to_string()))
        }
        fn create(&self, _resource: &str, _body: &Value) -> Result<Value, ApiError> {
            Err(ApiError::Transport("offline".to_string()))
        }
        fn update(&self, _resource: &str, _id: u32, _body: &Value) -> Result<Value, ApiError> {
            Err(ApiError::Transport("offline".to_string()))
        }
        fn delete(&self, _resource: &str, _id: u32) -> Result<(), ApiError> {
            Err(ApiError::Transport("offline".to_string()))
        }
    }

    fn accounts() -> AccountStore {
        AccountStore {
            accounts: vec![
                Account {
                    id: 1,
                    nombre: "Administrador Principal".to_string(),
                    email: "admin@taller.com".to_string(),
                    password: "ferrari123".to_string(),
                    rol: Role::Administrador,
                    permisos: crate::access::ALL_PERMISSIONS.to_vec(),
                    activo: true,
                },
                Account {
                    id: 2,
                    nombre: "Juan Mecánico".to_string(),
                    email: "mecanico@taller.com".to_string(),
                    password: "ferrari123".to_string(),
                    rol: Role::Mecanico,
                    permisos: vec![
                        Permission::Dashboard,
                        Permission::Vehiculos,
                        Permission::Agenda,
                    ],
                    activo: true,
                },
            ],
        }
    }

    fn test_context(dir: &std::path::Path) -> Context {
        let store = Store::open(&dir.join("storage")).unwrap();
        let audit = AuditLog::new(&dir.join("audit.jsonl"), "test-session").unwrap();
        let mut session = SessionState::new();
        session.restore(&store);

        Context {
            config: Config::default(),
            debug: false,
            session_id: "test-session".to_string(),
            store,
            accounts: accounts(),
            session: RefCell::new(session),
            api: Box::new(OfflineApi),
            audit: RefCell::new(audit),
            state: RefCell::new(ShopState::seed_at(
                NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
            )),
            current_view: Cell::new(None),
            pending_login_redirect: Cell::new(false),
        }
    }

    #[test]
    fn test_navigate_unauthenticated_schedules_redirect() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        navigate(&ctx, Tab::Agenda, &[]).unwrap();
        assert!(ctx.pending_login_redirect.get());
        // Nothing rendered, view unchanged until the drain.
        assert_eq!(ctx.current_view.get(), None);

        drain_redirect(&ctx);
        assert!(!ctx.pending_login_redirect.get());
        assert_eq!(ctx.current_view.get(), None);
    }

    #[test]
    fn test_login_then_navigate_denied_tab() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        handle_login(
            &ctx,
            &[
                "mecanico@taller.com".to_string(),
                "ferrari123".to_string(),
            ],
        );
        assert!(ctx.session.borrow().is_authenticated());
        assert_eq!(ctx.current_view.get(), Some(Tab::Inicio));

        // facturacion requires a permission the mechanic lacks: the view
        // does not change and no redirect is scheduled.
        navigate(&ctx, Tab::Facturacion, &[]).unwrap();
        assert_eq!(ctx.current_view.get(), Some(Tab::Inicio));
        assert!(!ctx.pending_login_redirect.get());

        // agenda is held.
        navigate(&ctx, Tab::Agenda, &[]).unwrap();
        assert_eq!(ctx.current_view.get(), Some(Tab::Agenda));
    }

    #[test]
    fn test_failed_login_leaves_session_clean() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        handle_login(
            &ctx,
            &["admin@taller.com".to_string(), "wrong".to_string()],
        );
        assert!(!ctx.session.borrow().is_authenticated());
        assert!(!ctx.store.contains(crate::session::KEY_CURRENT_USER));
    }

    #[test]
    fn test_logout_returns_to_login_view() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        handle_login(
            &ctx,
            &["admin@taller.com".to_string(), "ferrari123".to_string()],
        );
        handle_logout(&ctx);
        assert_eq!(ctx.current_view.get(), None);
        assert!(!ctx.session.borrow().is_authenticated());
        // Idempotent.
        handle_logout(&ctx);
    }

    #[test]
    fn test_dispatch_exit() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        assert!(dispatch_line(&ctx, "exit").unwrap());
        assert!(!dispatch_line(&ctx, "help").unwrap());
    }

    #[test]
    fn test_offline_backend_screen_still_renders() {
        // Network failures are swallowed: the screen renders empty.
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        handle_login(
            &ctx,
            &["admin@taller.com".to_string(), "ferrari123".to_string()],
        );
        navigate(&ctx, Tab::Clientes, &[]).unwrap();
        assert_eq!(ctx.current_view.get(), Some(Tab::Clientes));

        let audit = std::fs::read_to_string(dir.path().join("audit.jsonl")).unwrap();
        assert!(audit.contains("api_error"));
    }
}
