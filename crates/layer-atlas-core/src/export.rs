use crate::atlas::{AtlasRecord, AtlasSlot};
use crate::layout::LayoutPlan;
use crate::model::AtlasRegion;
use serde_json::{Value, json};

/// Serialize a layout plan as `{ moves: [{id, dx, dy}], failed: [..], canvas, stats }`.
/// `failed` is emitted sorted.
pub fn to_plan_json(plan: &LayoutPlan) -> Value {
    let moves: Vec<Value> = plan
        .moves
        .iter()
        .map(|m| json!({"id": m.id, "dx": m.dx, "dy": m.dy}))
        .collect();
    json!({
        "moves": moves,
        "failed": plan.failed.iter().collect::<Vec<_>>(),
        "canvas": {"w": plan.canvas.0, "h": plan.canvas.1},
        "stats": plan.stats,
    })
}

/// Serialize the atlas record in its native shape `{ slots: [{texture, parts}], meta }`.
pub fn to_atlas_json(record: &AtlasRecord) -> crate::error::Result<Value> {
    Ok(serde_json::to_value(record)?)
}

/// Ink-atlas style document: `{ Data: { RootChunk: { slots: [...] } }, Header }`.
/// Each slot carries `texture.DepotPath` and `parts` with `partName` plus
/// `clippingRectInUVCoords { Top, Left, Right, Bottom }`.
pub fn to_ink_atlas_json(record: &AtlasRecord) -> Value {
    let slots: Vec<Value> = record.slots.iter().map(ink_slot).collect();
    json!({
        "Header": {
            "app": record.meta.app,
            "version": record.meta.version,
        },
        "Data": {
            "RootChunk": {
                "$type": "inkTextureAtlas",
                "slots": slots,
            }
        }
    })
}

fn ink_slot(slot: &AtlasSlot) -> Value {
    let parts: Vec<Value> = slot.parts.iter().map(ink_part).collect();
    json!({
        "$type": "inkTextureSlot",
        "texture": {"DepotPath": slot.texture},
        "parts": parts,
    })
}

fn ink_part(region: &AtlasRegion) -> Value {
    json!({
        "$type": "inkTextureAtlasMapper",
        "partName": region.name,
        "clippingRectInUVCoords": {
            "Top": region.uv.top,
            "Left": region.uv.left,
            "Right": region.uv.right,
            "Bottom": region.uv.bottom,
        }
    })
}
