use layer_atlas_core::config::{CanvasGrowth, LayoutConfig, SortOrder};
use layer_atlas_core::error::LayerAtlasError;

#[test]
fn defaults() {
    let cfg = LayoutConfig::default();
    assert_eq!(cfg.spacing, 0);
    assert_eq!(cfg.sort_order, SortOrder::MaxSideDesc);
    assert_eq!(cfg.growth, CanvasGrowth::Fixed);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.ceiling(300, 200).unwrap(), Some((300, 200)));
}

#[test]
fn bounded_without_dimensions_is_invalid() {
    let cfg = LayoutConfig {
        growth: CanvasGrowth::Bounded,
        max_width: Some(512),
        ..Default::default()
    };
    match cfg.validate() {
        Err(LayerAtlasError::InvalidConfig(msg)) => assert!(msg.contains("bounded")),
        other => panic!("Expected InvalidConfig error, got {:?}", other),
    }
}

#[test]
fn unbounded_has_no_ceiling() {
    let cfg = LayoutConfig::builder().growth(CanvasGrowth::Unbounded).build();
    assert_eq!(cfg.ceiling(10, 10).unwrap(), None);
}

#[test]
fn parse_enums() {
    assert_eq!("max_side_desc".parse::<SortOrder>(), Ok(SortOrder::MaxSideDesc));
    assert_eq!("AREA_DESC".parse::<SortOrder>(), Ok(SortOrder::AreaDesc));
    assert_eq!("none".parse::<SortOrder>(), Ok(SortOrder::None));
    assert!("sideways".parse::<SortOrder>().is_err());
    assert_eq!("Unbounded".parse::<CanvasGrowth>(), Ok(CanvasGrowth::Unbounded));
    assert!("elastic".parse::<CanvasGrowth>().is_err());
}

#[test]
fn config_deserializes_with_defaults() {
    let cfg: LayoutConfig = serde_json::from_str(r#"{"spacing": 4}"#).expect("parse");
    assert_eq!(cfg.spacing, 4);
    assert_eq!(cfg.sort_order, SortOrder::MaxSideDesc);
    assert_eq!(cfg.growth, CanvasGrowth::Fixed);

    let cfg: LayoutConfig =
        serde_json::from_str(r#"{"growth": "bounded", "max_width": 256, "max_height": 128}"#)
            .expect("parse");
    assert_eq!(cfg.ceiling(100, 100).unwrap(), Some((256, 128)));
}
