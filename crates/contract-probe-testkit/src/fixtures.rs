// crates/contract-probe-testkit/src/fixtures.rs
// ============================================================================
// Module: Systems Hub Fixtures
// Description: Static catalog records served by the stub API.
// Purpose: Give tests a conforming data set matching the deployed catalog.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Three system records, as served by the deployed Systems Hub. The combat
//! system carries an extra `thumbnail` field, which conforming clients must
//! tolerate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Product name announced by the health endpoint.
pub const PRODUCT_NAME: &str = "Roblox Systems Hub";
/// Version announced by the health endpoint.
pub const API_VERSION: &str = "1.0.0";
/// Slugs of the served systems, in catalog order.
pub const SLUGS: [&str; 3] = ["movement-system", "npc-factory", "combat-system"];

// ============================================================================
// SECTION: Records
// ============================================================================

/// Returns every served system record in catalog order.
#[must_use]
pub fn systems() -> Vec<Value> {
    vec![
        json!({
            "slug": "movement-system",
            "title": "Roblox NPC Movement System v1.0",
            "displayName": "Movement System",
            "description": "Give any NPC movement scales up to 100s of NPCs, make them combat NPCs yourself. Blueprint is ready.",
            "gradientFrom": "#8B5CF6",
            "gradientTo": "#6366F1",
            "icon": "🏃",
            "devNotes": "https://github.com/m-hito/BrawlDevNotes#movement-system",
            "repoUrl": "https://ouo.io/pBHIkz",
            "ytVideo": "https://youtube.com/watch?v=movement-tutorial",
            "waitTimeSeconds": 15,
            "tags": ["movement", "npc", "pathfinding"],
            "brawlNotes": "BrawlDev: Give NPC's tool, use humanoid method to activate it and make them combat NPCs",
            "featured": false
        }),
        json!({
            "slug": "npc-factory",
            "title": "Advanced Roblox NPC Factory v1.0",
            "displayName": "NPC Factory",
            "description": "Spawn NPCs with pathfinding, combat AI, squad behavior. Production-ready system.",
            "gradientFrom": "#EF4444",
            "gradientTo": "#F97316",
            "icon": "🤖",
            "devNotes": "https://github.com/m-hito/BrawlDevNotes#npc-factory",
            "repoUrl": "https://ouo.io/MrWrM2",
            "ytVideo": "https://youtube.com/watch?v=npc-tutorial",
            "waitTimeSeconds": 12,
            "tags": ["npc", "ai", "pathfinding", "squad"],
            "brawlNotes": "BrawlDev: Use CollectionService for NPC tagging",
            "featured": false
        }),
        json!({
            "slug": "combat-system",
            "title": "Advanced Roblox Combat System v1.0",
            "displayName": "Combat System",
            "description": "5-combo modular combat system with state handling. Competitive-ready.",
            "gradientFrom": "#3B82F6",
            "gradientTo": "#06B6D4",
            "icon": "⚔️",
            "thumbnail": "https://i.postimg.cc/yYW9HHk4/Thumbnail-Poison.png",
            "devNotes": "https://github.com/m-hito/BrawlDevNotes#combat-system",
            "repoUrl": "https://ouo.io/j1lnPH",
            "ytVideo": "https://youtube.com/watch?v=combat-tutorial",
            "waitTimeSeconds": 12,
            "tags": ["combat", "pvp", "modular"],
            "brawlNotes": "Adding airborne combat in combat system v2",
            "featured": true
        }),
    ]
}

/// Returns the record for `slug`, if served.
#[must_use]
pub fn system(slug: &str) -> Option<Value> {
    systems().into_iter().find(|record| record.get("slug").and_then(Value::as_str) == Some(slug))
}

/// Returns the health body: `{success, message, version}`.
#[must_use]
pub fn health_body() -> Value {
    json!({
        "success": true,
        "message": format!("{PRODUCT_NAME} API"),
        "version": API_VERSION
    })
}

/// Returns the `{success: true, data}` envelope.
#[must_use]
pub fn data_body(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

/// Returns the `{success: false, error}` envelope.
#[must_use]
pub fn error_body(message: &str) -> Value {
    json!({ "success": false, "error": message })
}
