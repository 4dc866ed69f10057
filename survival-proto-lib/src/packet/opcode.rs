use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The leading byte of every packet. Sparse over `0x00..=0xFF`; values
/// outside this set are `Malformed` at the prober, never reaching here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Opcode {
    KeepAlive = 0x00,
    Login = 0x01,
    Handshake = 0x02,
    Chat = 0x03,
    TimeUpdate = 0x04,
    EntityEquipment = 0x05,
    SpawnPosition = 0x06,
    UseEntity = 0x07,
    UpdateHealth = 0x08,
    Respawn = 0x09,
    OnGround = 0x0A,
    PlayerPosition = 0x0B,
    PlayerLook = 0x0C,
    PlayerMoveLook = 0x0D,
    PlayerDigging = 0x0E,
    BlockPlacement = 0x0F,
    HoldChange = 0x10,
    Animation = 0x12,
    EntityAction = 0x13,
    NamedEntitySpawn = 0x14,
    PickupSpawn = 0x15,
    CollectItem = 0x16,
    SpawnObject = 0x17,
    SpawnMob = 0x18,
    Painting = 0x19,
    ExperienceOrb = 0x1A,
    EntityVelocity = 0x1C,
    EntityDestroy = 0x1D,
    EntityCreate = 0x1E,
    EntityRelativeMove = 0x1F,
    EntityLook = 0x20,
    EntityLookMove = 0x21,
    EntityTeleport = 0x22,
    EntityStatus = 0x26,
    EntityAttach = 0x27,
    EntityMetadata = 0x28,
    EntityEffect = 0x29,
    RemoveEntityEffect = 0x2A,
    Experience = 0x2B,
    PreChunk = 0x32,
    MapChunk = 0x33,
    MultiBlockChange = 0x34,
    BlockChange = 0x35,
    BlockAction = 0x36,
    Explosion = 0x3C,
    SoundEffect = 0x3D,
    State = 0x46,
    Thunderbolt = 0x47,
    OpenWindow = 0x64,
    CloseWindow = 0x65,
    WindowClick = 0x66,
    SetSlot = 0x67,
    WindowItems = 0x68,
    UpdateProgressBar = 0x69,
    Transaction = 0x6A,
    CreativeInventoryAction = 0x6B,
    UpdateSign = 0x82,
    ItemData = 0x83,
    IncrementStatistic = 0xC8,
    PlayerListItem = 0xC9,
    ListPing = 0xFE,
    Disconnect = 0xFF,
}
