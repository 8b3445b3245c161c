use layer_atlas_core::error::LayerAtlasError;
use layer_atlas_core::prelude::*;

fn layer(name: &str, left: i32, top: i32, w: i32, h: i32) -> LayerGeometry {
    LayerGeometry::new(name, Bounds::new(left, top, left + w, top + h))
}

#[test]
fn moves_are_relative_to_original_bounds() {
    let layers = vec![
        layer("A", 10, 30, 60, 40),
        layer("B", 5, 5, 50, 50),
        layer("C", 90, 90, 10, 10),
    ];
    let plan = plan_layout(&layers, 100, 100, &LayoutConfig::default()).expect("plan");

    assert!(plan.failed.is_empty());
    assert_eq!(
        plan.moves,
        vec![
            LayerMove { id: "A".into(), dx: -10, dy: -30 },
            LayerMove { id: "B".into(), dx: -5, dy: 35 },
            LayerMove { id: "C".into(), dx: -30, dy: -90 },
        ]
    );
    assert_eq!(plan.canvas, (100, 100));
}

#[test]
fn moves_follow_input_order_not_packing_order() {
    let layers = vec![layer("small", 0, 0, 5, 5), layer("large", 0, 0, 40, 40)];
    let plan = plan_layout(&layers, 100, 100, &LayoutConfig::default()).expect("plan");
    let ids: Vec<&str> = plan.moves.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["small", "large"]);
    // large is packed first and lands in the corner
    assert_eq!(plan.move_for("large").map(|m| (m.dx, m.dy)), Some((0, 0)));
    assert_eq!(plan.move_for("small").map(|m| (m.dx, m.dy)), Some((40, 0)));
}

#[test]
fn two_large_layers_only_one_fits() {
    let layers = vec![layer("first", 0, 0, 80, 80), layer("second", 10, 10, 80, 80)];
    let plan = plan_layout(&layers, 100, 100, &LayoutConfig::default()).expect("plan");

    assert_eq!(plan.moves.len(), 1);
    assert_eq!(plan.moves[0].id, "first");
    assert_eq!(plan.failed.len(), 1);
    assert!(plan.failed.contains("second"));
    assert!(!plan.is_complete());
    assert_eq!(plan.canvas, (100, 100));
}

#[test]
fn unbounded_growth_places_both_large_layers() {
    let layers = vec![layer("first", 0, 0, 80, 80), layer("second", 10, 10, 80, 80)];
    let cfg = LayoutConfig::builder().growth(CanvasGrowth::Unbounded).build();
    let plan = plan_layout(&layers, 100, 100, &cfg).expect("plan");

    assert!(plan.failed.is_empty());
    assert_eq!(plan.move_for("second").map(|m| (m.dx, m.dy)), Some((90, -10)));
    assert_eq!(plan.canvas, (180, 100));
}

#[test]
fn bounded_growth_respects_ceiling() {
    let layers = vec![layer("first", 0, 0, 80, 80), layer("second", 0, 0, 80, 80)];
    let cfg = LayoutConfig::builder().with_max_dimensions(150, 150).build();
    let plan = plan_layout(&layers, 100, 100, &cfg).expect("plan");
    assert!(plan.failed.contains("second"));
    assert_eq!(plan.canvas, (100, 100));

    let cfg = LayoutConfig::builder().with_max_dimensions(200, 100).build();
    let plan = plan_layout(&layers, 100, 100, &cfg).expect("plan");
    assert!(plan.failed.is_empty());
    assert_eq!(plan.canvas, (180, 100));
}

#[test]
fn nothing_fits_is_not_an_error() {
    let layers = vec![layer("a", 0, 0, 200, 200), layer("b", 0, 0, 150, 300)];
    let plan = plan_layout(&layers, 100, 100, &LayoutConfig::default()).expect("plan");
    assert!(plan.moves.is_empty());
    assert_eq!(plan.failed.len(), 2);
}

#[test]
fn hidden_and_locked_layers_are_ignored() {
    let layers = vec![
        layer("hidden", 0, 0, 90, 90).hidden(),
        layer("locked", 0, 0, 90, 90).locked(),
        layer("free", 20, 20, 30, 30),
    ];
    let plan = plan_layout(&layers, 100, 100, &LayoutConfig::default()).expect("plan");
    assert_eq!(plan.moves.len(), 1);
    assert_eq!(plan.moves[0].id, "free");
    assert!(plan.failed.is_empty());
    assert_eq!(plan.stats.num_blocks, 1);
}

#[test]
fn background_is_never_reported_as_failed() {
    // Equal max side: stable sort keeps "cover" ahead of the background.
    let layers = vec![layer("cover", 0, 0, 100, 100), layer(BACKGROUND_LAYER, 0, 0, 100, 100)];
    let plan = plan_layout(&layers, 100, 100, &LayoutConfig::default()).expect("plan");
    assert_eq!(plan.moves.len(), 1);
    assert_eq!(plan.moves[0].id, "cover");
    assert!(plan.failed.is_empty());
}

#[test]
fn background_still_takes_part_in_packing() {
    let layers = vec![layer(BACKGROUND_LAYER, 0, 0, 100, 100), layer("icon", 0, 0, 10, 10)];
    let plan = plan_layout(&layers, 100, 100, &LayoutConfig::default()).expect("plan");
    assert_eq!(plan.moves.len(), 1);
    assert_eq!(plan.moves[0].id, BACKGROUND_LAYER);
    assert!(plan.failed.contains("icon"));
    assert!(!plan.failed.contains(BACKGROUND_LAYER));
}

#[test]
fn spacing_is_added_to_both_axes() {
    let layers = vec![layer("a", 0, 0, 40, 40), layer("b", 0, 0, 40, 40)];
    let cfg = LayoutConfig::builder().spacing(10).build();
    let plan = plan_layout(&layers, 100, 100, &cfg).expect("plan");
    assert_eq!(plan.move_for("a").map(|m| (m.dx, m.dy)), Some((0, 0)));
    assert_eq!(plan.move_for("b").map(|m| (m.dx, m.dy)), Some((50, 0)));
    assert_eq!(plan.stats.used_area, 2 * 50 * 50);

    // 75x75 blocks: only one fits on a fixed 100x100 surface
    let layers = vec![
        layer("a", 0, 0, 40, 40),
        layer("b", 0, 0, 40, 40),
        layer("c", 0, 0, 40, 40),
    ];
    let cfg = LayoutConfig::builder().spacing(35).build();
    let plan = plan_layout(&layers, 100, 100, &cfg).expect("plan");
    assert_eq!(plan.moves.len(), 1);
    assert_eq!(plan.failed.len(), 2);
}

#[test]
fn empty_layer_without_spacing_is_rejected() {
    let layers = vec![layer("ok", 0, 0, 10, 10), layer("empty", 5, 5, 0, 0)];
    match plan_layout(&layers, 100, 100, &LayoutConfig::default()) {
        Err(LayerAtlasError::InvalidBlockDimensions { id, width, height }) => {
            assert_eq!(id, "empty");
            assert_eq!((width, height), (0, 0));
        }
        other => panic!("Expected InvalidBlockDimensions, got {:?}", other),
    }

    // spacing makes it a valid block
    let cfg = LayoutConfig::builder().spacing(2).build();
    assert!(plan_layout(&layers, 100, 100, &cfg).is_ok());
}

#[test]
fn duplicate_layer_names_are_rejected() {
    let layers = vec![layer("same", 0, 0, 10, 10), layer("same", 20, 20, 10, 10)];
    match plan_layout(&layers, 100, 100, &LayoutConfig::default()) {
        Err(LayerAtlasError::DuplicateIdentifier(id)) => assert_eq!(id, "same"),
        other => panic!("Expected DuplicateIdentifier, got {:?}", other),
    }
}

#[test]
fn duplicate_name_on_ineligible_layer_is_fine() {
    let layers = vec![layer("same", 0, 0, 10, 10), layer("same", 20, 20, 10, 10).hidden()];
    let plan = plan_layout(&layers, 100, 100, &LayoutConfig::default()).expect("plan");
    assert_eq!(plan.moves.len(), 1);
}

#[test]
fn zero_surface_is_rejected() {
    let layers = vec![layer("a", 0, 0, 10, 10)];
    match plan_layout(&layers, 0, 100, &LayoutConfig::default()) {
        Err(LayerAtlasError::InvalidDimensions { width, height }) => {
            assert_eq!((width, height), (0, 100));
        }
        other => panic!("Expected InvalidDimensions, got {:?}", other),
    }
}

#[test]
fn ceiling_below_surface_is_rejected() {
    let layers = vec![layer("a", 0, 0, 10, 10)];
    let cfg = LayoutConfig::builder().with_max_dimensions(50, 500).build();
    match plan_layout(&layers, 100, 100, &cfg) {
        Err(LayerAtlasError::InvalidConfig(msg)) => assert!(msg.contains("smaller")),
        other => panic!("Expected InvalidConfig, got {:?}", other),
    }
}

#[test]
fn planning_is_repeatable() {
    let layers: Vec<LayerGeometry> = (0..30)
        .map(|i| layer(&format!("l{}", i), i * 3, i * 2, 5 + (i * 7) % 23, 4 + (i * 11) % 19))
        .collect();
    let cfg = LayoutConfig::default();
    let a = plan_layout(&layers, 96, 96, &cfg).expect("plan");
    let b = plan_layout(&layers, 96, 96, &cfg).expect("plan");
    assert_eq!(a, b);
}
