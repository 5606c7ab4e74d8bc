use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only JSONL audit log, one file per session.
pub struct AuditLog {
    pub path: PathBuf,
    session_id: String,
    file: File,
}

#[derive(Serialize)]
struct Event<'a> {
    ts: DateTime<Utc>,
    session_id: &'a str,
    #[serde(rename = "type")]
    event_type: &'a str,
    #[serde(flatten)]
    data: serde_json::Value,
}

impl AuditLog {
    pub fn new(path: &Path, session_id: &str) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            session_id: session_id.to_string(),
            file,
        })
    }

    pub fn log(&mut self, event_type: &str, data: serde_json::Value) -> Result<()> {
        let event = Event {
            ts: Utc::now(),
            session_id: &self.session_id,
            event_type,
            data,
        };
        let line = serde_json::to_string(&event)?;
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        Ok(())
    }

    pub fn login_ok(&mut self, email: &str, rol: &str) -> Result<()> {
        self.log("login_ok", serde_json::json!({ "email": email, "rol": rol }))
    }

    pub fn login_failed(&mut self, email: &str) -> Result<()> {
        self.log("login_failed", serde_json::json!({ "email": email }))
    }

    pub fn logout(&mut self) -> Result<()> {
        self.log("logout", serde_json::json!({}))
    }

    pub fn session_restored(&mut self, email: &str) -> Result<()> {
        self.log("session_restored", serde_json::json!({ "email": email }))
    }

    /// The stored session was unusable and has been discarded.
    pub fn session_discarded(&mut self) -> Result<()> {
        self.log("session_discarded", serde_json::json!({}))
    }

    pub fn navigation(&mut self, tab: &str) -> Result<()> {
        self.log("navigation", serde_json::json!({ "tab": tab }))
    }

    pub fn access_denied(&mut self, tab: &str, rol: &str, missing: &str) -> Result<()> {
        self.log(
            "access_denied",
            serde_json::json!({
                "tab": tab,
                "rol": rol,
                "missing": missing,
            }),
        )
    }

    pub fn redirect_to_login(&mut self, tab: &str) -> Result<()> {
        self.log("redirect_to_login", serde_json::json!({ "tab": tab }))
    }

    /// A backend call failed; the screen carried on with empty data.
    pub fn api_error(&mut self, resource: &str, error: &str) -> Result<()> {
        self.log(
            "api_error",
            serde_json::json!({ "resource": resource, "error": error }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_are_one_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let mut log = AuditLog::new(&path, "s-1").unwrap();

        log.login_ok("admin@taller.com", "administrador").unwrap();
        log.navigation("agenda").unwrap();
        log.access_denied("facturacion", "mecanico", "facturacion")
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "login_ok");
        assert_eq!(first["session_id"], "s-1");
        assert_eq!(first["email"], "admin@taller.com");

        let third: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(third["missing"], "facturacion");
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit").join("s-2.jsonl");
        let mut log = AuditLog::new(&path, "s-2").unwrap();
        log.logout().unwrap();
        assert!(path.exists());
    }
}
