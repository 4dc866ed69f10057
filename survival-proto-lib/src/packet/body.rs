use crate::codec::{ItemStack, Metadata, PickupItem};

/// Per-opcode payload. Field order here is the *canonical* order; when an
/// opcode's wire order differs by direction (only `PlayerMoveLook` does),
/// the parser/serializer reorder fields on the way in and out, not this
/// type.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    KeepAlive { id: i32 },
    LoginRequest { version: i32, username: String, unused_long: i64, unused_int: i32, unused_bytes: [i8; 4] },
    LoginResponse {
        entity_id: i32,
        unused_string: String,
        map_seed: i64,
        mode: i32,
        dimension: i8,
        unused_byte: i8,
        world_height: u8,
        max_players: u8,
    },
    Handshake { value: String },
    Chat { message: String },
    TimeUpdate { time: i64 },
    EntityEquipment { entity_id: i32, slot: i16, item_id: i16, damage: i16 },
    SpawnPosition { x: i32, y: i32, z: i32 },
    UseEntity { user: i32, target: i32, left_click: bool },
    UpdateHealth { health: i16, food: i16, food_saturation: f32 },
    Respawn { dimension: i8, difficulty: i8, mode: i8, world_height: i16, map_seed: i64 },
    OnGround { on_ground: bool },
    PlayerPosition { x: f64, y: f64, stance: f64, z: f64, on_ground: bool },
    PlayerLook { yaw: f32, pitch: f32, on_ground: bool },
    PlayerMoveLook { x: f64, y: f64, stance: f64, z: f64, yaw: f32, pitch: f32, on_ground: bool },
    PlayerDigging { status: i8, x: i32, y: i8, z: i32, face: i8 },
    BlockPlacement { x: i32, y: i8, z: i32, direction: i8, item: ItemStack },
    HoldChange { slot: i16 },
    Animation { entity_id: i32, animation: i8 },
    EntityAction { entity_id: i32, action: i8 },
    NamedEntitySpawn {
        entity_id: i32,
        name: String,
        x: i32,
        y: i32,
        z: i32,
        rotation: i8,
        pitch: i8,
        current_item: i16,
    },
    PickupSpawn {
        entity_id: i32,
        item: PickupItem,
        x: i32,
        y: i32,
        z: i32,
        rotation: i8,
        pitch: i8,
        roll: i8,
    },
    CollectItem { collected_entity_id: i32, collector_entity_id: i32 },
    SpawnObject {
        entity_id: i32,
        object_type: i8,
        x: i32,
        y: i32,
        z: i32,
        throw_velocity: Option<(i16, i16, i16)>,
    },
    SpawnMob { entity_id: i32, mob_type: i8, x: i32, y: i32, z: i32, yaw: i8, pitch: i8, metadata: Metadata },
    Painting { entity_id: i32, title: String, x: i32, y: i32, z: i32, direction: i32 },
    ExperienceOrb { entity_id: i32, x: i32, y: i32, z: i32, count: i16 },
    EntityVelocity { entity_id: i32, vx: i16, vy: i16, vz: i16 },
    EntityDestroy { entity_id: i32 },
    EntityCreate { entity_id: i32 },
    EntityRelativeMove { entity_id: i32, dx: i8, dy: i8, dz: i8 },
    EntityLook { entity_id: i32, yaw: i8, pitch: i8 },
    EntityLookMove { entity_id: i32, dx: i8, dy: i8, dz: i8, yaw: i8, pitch: i8 },
    EntityTeleport { entity_id: i32, x: i32, y: i32, z: i32, yaw: i8, pitch: i8 },
    EntityStatus { entity_id: i32, status: i8 },
    EntityAttach { entity_id: i32, vehicle_id: i32 },
    EntityMetadata { entity_id: i32, metadata: Metadata },
    EntityEffect { entity_id: i32, effect: i8, amplifier: i8, duration: i16 },
    RemoveEntityEffect { entity_id: i32, effect: i8 },
    Experience { experience_bar: i8, level: i8, total_experience: i16 },
    PreChunk { x: i32, z: i32, load: bool },
    MapChunk { x: i32, y: i16, z: i32, size_x: i8, size_y: i8, size_z: i8, data: Vec<u8> },
    MultiBlockChange { chunk_x: i32, chunk_z: i32, changes: Vec<(i16, i8, i8)> },
    BlockChange { x: i32, y: i8, z: i32, block_type: i8, block_metadata: i8 },
    BlockAction { x: i32, y: i16, z: i32, byte1: i8, byte2: i8 },
    Explosion { x: f64, y: f64, z: f64, radius: f32, records: Vec<(i8, i8, i8)> },
    SoundEffect { effect_id: i32, x: i32, y: i8, z: i32, data: i32 },
    State { reason: i8, game_mode: i8 },
    Thunderbolt { entity_id: i32, unknown: bool, x: i32, y: i32, z: i32 },
    OpenWindow { window_id: i8, inventory_type: i8, title: String, slot_count: i8 },
    CloseWindow { window_id: i8 },
    WindowClick {
        window_id: i8,
        slot: i16,
        right_click: bool,
        action_number: i16,
        shift: bool,
        clicked_item: ItemStack,
    },
    SetSlot { window_id: i8, slot: i16, item: ItemStack },
    WindowItems { window_id: i8, items: Vec<ItemStack> },
    UpdateProgressBar { window_id: i8, progress_bar: i16, value: i16 },
    Transaction { window_id: i8, action_number: i16, accepted: bool },
    CreativeInventoryAction { slot: i16, item_id: i16, quantity: i16, damage: i16 },
    UpdateSign { x: i32, y: i16, z: i32, line1: String, line2: String, line3: String, line4: String },
    ItemData { item_type: i16, item_id: i16, text: Vec<u8> },
    IncrementStatistic { statistic_id: i32, amount: i8 },
    PlayerListItem { player_name: String, online: bool, ping: i16 },
    ListPing,
    Disconnect { message: String },
}
