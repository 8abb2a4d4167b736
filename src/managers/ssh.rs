use crate::constants::{limits, network};
use crate::errors::ToolError;
use crate::services::keys::KeyResolver;
use crate::services::logger::Logger;
use crate::tools::{Target, ToolRequest};
use crate::utils::output;
use crate::utils::scripts;
use ssh2::{MethodType, Session};
use std::io::Read;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

/// What one remote execution produced. A connection request yields exactly
/// zero or one of these; zero only when the session failed before a command
/// channel opened.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub signal: Option<String>,
}

/// Everything one call needs to run one command. Built fresh per call,
/// never reused.
struct ConnectionRequest {
    host: String,
    port: u16,
    user: String,
    command: String,
    key: String,
}

#[derive(Clone)]
pub struct SshManager {
    logger: Logger,
    keys: Arc<KeyResolver>,
}

impl SshManager {
    pub fn new(logger: Logger, keys: Arc<KeyResolver>) -> Self {
        Self {
            logger: logger.child("ssh"),
            keys,
        }
    }

    /// Runs one tool invocation to completion. Never fails: each tool
    /// contract folds errors into its own response shape.
    pub async fn dispatch(&self, request: ToolRequest) -> String {
        match request {
            ToolRequest::RemoteSsh(args) => {
                let envelope = match self.execute(&args.target, &args.command).await {
                    Ok(outcome) => {
                        output::command_envelope(&args.target.host, &args.command, &outcome)
                    }
                    Err(err) => output::command_failure(&args.target.host, &args.command, &err),
                };
                output::render_envelope(&envelope)
            }
            ToolRequest::EditBlock(args) => {
                let script = scripts::edit_block(&args);
                self.run_script(&args.target, script).await
            }
            ToolRequest::ReadLines(args) => {
                let script = scripts::read_lines(&args);
                self.run_script(&args.target, script).await
            }
            ToolRequest::SearchCode(args) => {
                let script = scripts::search_code(&args);
                self.run_script(&args.target, script).await
            }
            ToolRequest::WriteChunk(args) => {
                let script = scripts::write_chunk(&args);
                self.run_script(&args.target, script).await
            }
        }
    }

    async fn run_script(&self, target: &Target, script: String) -> String {
        match self.execute(target, &script).await {
            Ok(outcome) => output::script_report(&outcome),
            Err(err) => output::failure_line(&err),
        }
    }

    /// Opens one session, runs one command, tears the session down. No
    /// retries on any path.
    pub async fn execute(
        &self,
        target: &Target,
        command: &str,
    ) -> Result<ExecutionOutcome, ToolError> {
        let key = self.keys.resolve(target.key_source().as_deref())?;
        let request = ConnectionRequest {
            host: target.host.clone(),
            port: target.port,
            user: target.user.clone(),
            command: command.to_string(),
            key,
        };
        self.logger.info(
            "executing remote command",
            Some(&serde_json::json!({
                "host": request.host,
                "port": request.port,
                "user": request.user,
                "command_bytes": request.command.len(),
            })),
        );
        tokio::task::spawn_blocking(move || exec_blocking(&request))
            .await
            .map_err(|_| ToolError::internal("SSH exec task failed"))?
    }
}

fn connect_session(request: &ConnectionRequest) -> Result<Session, ToolError> {
    let ready_timeout = Duration::from_millis(network::TIMEOUT_SSH_READY_MS);
    let endpoint = format!("{}:{}", request.host, request.port);
    let addr = endpoint
        .to_socket_addrs()
        .map_err(|err| ToolError::connection(format!("Failed to resolve {}: {}", endpoint, err)))?
        .next()
        .ok_or_else(|| ToolError::connection(format!("No addresses for {}", endpoint)))?;

    let tcp = TcpStream::connect_timeout(&addr, ready_timeout)
        .map_err(|err| ToolError::connection(format!("Failed to connect to {}: {}", endpoint, err)))?;
    tcp.set_read_timeout(Some(ready_timeout)).ok();
    tcp.set_write_timeout(Some(ready_timeout)).ok();

    let mut session = Session::new()
        .map_err(|err| ToolError::connection(format!("Failed to create SSH session: {}", err)))?;
    session.set_tcp_stream(tcp);
    session
        .method_pref(MethodType::Kex, network::KEX_ALGORITHMS)
        .map_err(|err| {
            ToolError::connection(format!("Failed to restrict key exchange: {}", err))
        })?;
    session
        .handshake()
        .map_err(|err| ToolError::connection(format!("SSH handshake failed: {}", err)))?;

    session
        .userauth_pubkey_memory(&request.user, None, &request.key, None)
        .map_err(|err| {
            ToolError::connection(format!(
                "SSH authentication failed for {}: {}",
                request.user, err
            ))
        })?;
    if !session.authenticated() {
        return Err(ToolError::connection("SSH authentication failed"));
    }

    let interval = std::cmp::max(1, (network::KEEPALIVE_INTERVAL_MS / 1000) as u32);
    session.set_keepalive(true, interval);

    Ok(session)
}

// The session closes on drop, so every return path below tears it down.
fn exec_blocking(request: &ConnectionRequest) -> Result<ExecutionOutcome, ToolError> {
    let session = connect_session(request)?;

    let mut channel = session
        .channel_session()
        .map_err(|err| ToolError::execution(format!("Failed to open execution channel: {}", err)))?;
    channel
        .exec(&request.command)
        .map_err(|err| ToolError::execution(format!("Failed to start remote command: {}", err)))?;
    session.set_blocking(false);

    let mut stdout_buf: Vec<u8> = Vec::new();
    let mut stderr_buf: Vec<u8> = Vec::new();
    let mut stderr_stream = channel.stderr();
    let mut buf = [0u8; limits::READ_CHUNK_BYTES];

    // stdout and stderr accumulate into separate buffers, never merged.
    loop {
        let mut progressed = false;
        match channel.read(&mut buf) {
            Ok(n) if n > 0 => {
                stdout_buf.extend_from_slice(&buf[..n]);
                progressed = true;
            }
            Ok(_) => {}
            Err(err) => {
                if err.kind() != std::io::ErrorKind::WouldBlock {
                    return Err(ToolError::internal(format!(
                        "SSH stdout read failed: {}",
                        err
                    )));
                }
            }
        }
        match stderr_stream.read(&mut buf) {
            Ok(n) if n > 0 => {
                stderr_buf.extend_from_slice(&buf[..n]);
                progressed = true;
            }
            Ok(_) => {}
            Err(err) => {
                if err.kind() != std::io::ErrorKind::WouldBlock {
                    return Err(ToolError::internal(format!(
                        "SSH stderr read failed: {}",
                        err
                    )));
                }
            }
        }

        if channel.eof() {
            break;
        }
        if !progressed {
            let _ = session.keepalive_send();
            std::thread::sleep(Duration::from_millis(20));
        }
    }

    session.set_blocking(true);
    let _ = channel.wait_close();
    let exit_code = channel.exit_status().unwrap_or(0);
    let signal = channel.exit_signal().ok().and_then(|sig| sig.exit_signal);

    Ok(ExecutionOutcome {
        stdout: String::from_utf8_lossy(&stdout_buf).trim().to_string(),
        stderr: String::from_utf8_lossy(&stderr_buf).trim().to_string(),
        exit_code,
        signal,
    })
}
