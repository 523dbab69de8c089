//! Runs one embedded `PostgreSQL` lifecycle step for the integration tests.
//!
//! ```text
//! pg_worker <setup|start|stop> <payload-path>
//! ```
//!
//! The payload is the JSON `WorkerPayload` written by
//! `pg-embed-setup-unpriv`. When started as root the worker switches to the
//! `nobody` account before touching the cluster, because `initdb` and the
//! server refuse to run with superuser privileges.

#[cfg(unix)]
use camino::{Utf8Path, Utf8PathBuf};
#[cfg(unix)]
use nix::unistd::{Uid, User, initgroups, setgid, setuid};
#[cfg(unix)]
use pg_embedded_setup_unpriv::ambient_dir_and_path;
#[cfg(unix)]
use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
#[cfg(unix)]
use postgresql_embedded::{PostgreSQL, Status};
#[cfg(unix)]
use std::ffi::CString;
#[cfg(unix)]
use std::io::Read;
#[cfg(unix)]
use thiserror::Error;

/// Account the worker runs the cluster as when invoked by root.
#[cfg(unix)]
const UNPRIVILEGED_USER: &str = "nobody";

#[cfg(unix)]
#[derive(Debug, Error)]
enum WorkerError {
    #[error("usage: pg_worker <setup|start|stop> <payload-path> ({0})")]
    Usage(String),
    #[error("failed to read payload {path}: {source}")]
    PayloadRead {
        path: Utf8PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse payload: {0}")]
    PayloadParse(#[from] serde_json::Error),
    #[error("invalid cluster settings: {0}")]
    Settings(String),
    #[error("failed to switch to user {user}: {reason}")]
    PrivilegeDrop { user: &'static str, reason: String },
    #[error("failed to build runtime: {0}")]
    Runtime(std::io::Error),
    #[error("postgres {operation} failed: {reason}")]
    Cluster {
        operation: Operation,
        reason: String,
    },
}

#[cfg(unix)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Setup,
    Start,
    Stop,
}

#[cfg(unix)]
impl Operation {
    fn parse(raw: &str) -> Result<Self, WorkerError> {
        match raw {
            "setup" => Ok(Self::Setup),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(WorkerError::Usage(format!("unknown operation '{other}'"))),
        }
    }
}

#[cfg(unix)]
impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Setup => "setup",
            Self::Start => "start",
            Self::Stop => "stop",
        };
        f.write_str(name)
    }
}

#[cfg(unix)]
fn main() -> Result<(), WorkerError> {
    let (operation, payload_path) = parse_args(std::env::args())?;
    let payload = read_payload(&payload_path)?;
    drop_root_privileges()?;

    let settings = payload
        .settings
        .into_settings()
        .map_err(|err| WorkerError::Settings(err.to_string()))?;
    apply_environment(&payload.environment);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(WorkerError::Runtime)?;
    runtime.block_on(run(operation, PostgreSQL::new(settings)))
}

#[cfg(unix)]
fn parse_args(
    mut args: impl Iterator<Item = String>,
) -> Result<(Operation, Utf8PathBuf), WorkerError> {
    let _program = args.next();
    let operation = args
        .next()
        .ok_or_else(|| WorkerError::Usage("missing operation".to_owned()))
        .and_then(|raw| Operation::parse(&raw))?;
    let payload_path = args
        .next()
        .map(Utf8PathBuf::from)
        .ok_or_else(|| WorkerError::Usage("missing payload path".to_owned()))?;
    if let Some(extra) = args.next() {
        return Err(WorkerError::Usage(format!("unexpected argument '{extra}'")));
    }
    Ok((operation, payload_path))
}

#[cfg(unix)]
fn read_payload(path: &Utf8Path) -> Result<WorkerPayload, WorkerError> {
    let read_error = |source| WorkerError::PayloadRead {
        path: path.to_path_buf(),
        source,
    };
    let (dir, relative) = ambient_dir_and_path(path).map_err(|err| {
        read_error(std::io::Error::other(err.to_string()))
    })?;
    let mut bytes = Vec::new();
    dir.open(relative.as_std_path())
        .and_then(|mut file| file.read_to_end(&mut bytes))
        .map_err(read_error)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(unix)]
fn drop_root_privileges() -> Result<(), WorkerError> {
    if !Uid::effective().is_root() {
        return Ok(());
    }

    let failed = |reason: String| WorkerError::PrivilegeDrop {
        user: UNPRIVILEGED_USER,
        reason,
    };
    let user = User::from_name(UNPRIVILEGED_USER)
        .map_err(|err| failed(err.to_string()))?
        .ok_or_else(|| failed("no such user".to_owned()))?;
    let name = CString::new(user.name.as_str()).map_err(|err| failed(err.to_string()))?;
    initgroups(&name, user.gid).map_err(|err| failed(err.to_string()))?;
    setgid(user.gid).map_err(|err| failed(err.to_string()))?;
    setuid(user.uid).map_err(|err| failed(err.to_string()))?;

    // SAFETY: no other threads exist yet, so nothing reads the environment
    // concurrently.
    unsafe {
        std::env::set_var("HOME", &user.dir);
        std::env::set_var("USER", &user.name);
        std::env::set_var("LOGNAME", &user.name);
    }
    Ok(())
}

#[cfg(unix)]
fn apply_environment(environment: &[(String, Option<PlainSecret>)]) {
    for (key, value) in environment {
        // SAFETY: called before the runtime starts, while the process is
        // still single-threaded.
        unsafe {
            match value {
                Some(secret) => std::env::set_var(key, secret.expose()),
                None => std::env::remove_var(key),
            }
        }
    }
}

#[cfg(unix)]
async fn run(operation: Operation, mut postgres: PostgreSQL) -> Result<(), WorkerError> {
    let failed = |err: postgresql_embedded::Error| WorkerError::Cluster {
        operation,
        reason: err.to_string(),
    };
    match operation {
        Operation::Setup => postgres.setup().await.map_err(failed),
        Operation::Start => {
            if !matches!(postgres.status(), Status::Started) {
                postgres.start().await.map_err(failed)?;
            }
            // The server must outlive this process.
            std::mem::forget(postgres);
            Ok(())
        }
        Operation::Stop => postgres.stop().await.map_err(failed),
    }
}

#[cfg(not(unix))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    Err("pg_worker requires a Unix platform".into())
}
