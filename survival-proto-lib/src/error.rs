use thiserror::Error;

/// Errors surfaced by the codec and the proxy session.
///
/// `NeedMore` is deliberately absent: it is non-terminal and is represented
/// as an `Ok` arm of the prober's own result type, never as a failure here.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("malformed packet: {0}")]
    Malformed(String),

    #[error("opcode {opcode:#04x} is not valid for direction {direction:?}")]
    UnsupportedOpcodeForDirection { opcode: u8, direction: crate::packet::Direction },

    #[error("peer closed the connection")]
    PeerClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ProxyError>;
