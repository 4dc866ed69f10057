pub mod body;
pub mod opcode;

pub use body::Body;
pub use opcode::Opcode;

/// Which wire the packet travels on. `Ping` is synthesized locally by the
/// proxy session; it is never produced by the parser reading off a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Request,
    Response,
    Ping,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub direction: Direction,
    pub opcode: Opcode,
    pub body: Body,
}

impl Packet {
    pub fn new(direction: Direction, opcode: Opcode, body: Body) -> Self {
        Packet { direction, opcode, body }
    }
}

/// Opcodes the proxy session handles itself on the downstream-inbound
/// side instead of forwarding upstream.
pub fn is_local_downstream(opcode: Opcode) -> bool {
    matches!(opcode, Opcode::Disconnect | Opcode::ListPing)
}
