pub mod network {
    pub const SSH_DEFAULT_PORT: u16 = 22;
    pub const TIMEOUT_SSH_READY_MS: u64 = 20_000;
    pub const KEEPALIVE_INTERVAL_MS: u64 = 30_000;
    /// Two elliptic-curve Diffie-Hellman variants plus the SHA-256
    /// finite-field variant. Sessions that cannot negotiate within this
    /// set are rejected during the handshake.
    pub const KEX_ALGORITHMS: &str =
        "curve25519-sha256,ecdh-sha2-nistp256,diffie-hellman-group14-sha256";
}

pub mod auth {
    pub const PRIVATE_KEY_ENV: &str = "SSH_PRIVATE_KEY_PATH";
    /// Tried in order when no explicit key path is supplied.
    pub const DEFAULT_KEY_PATHS: &[&str] =
        &["~/.ssh/id_rsa", "~/.ssh/id_ed25519", "~/.ssh/id_ecdsa"];
}

pub mod limits {
    pub const DEFAULT_READ_START_LINE: u64 = 1;
    pub const DEFAULT_READ_MAX_LINES: u64 = 100;
    pub const DEFAULT_SEARCH_MAX_RESULTS: u64 = 50;
    pub const DEFAULT_SEARCH_CONTEXT_LINES: u64 = 2;
    pub const DEFAULT_EXPECTED_REPLACEMENTS: u64 = 1;
    pub const READ_CHUNK_BYTES: usize = 8192;
}
