use loam_blocks::VoxelId;
use proptest::prelude::*;

#[derive(serde::Deserialize)]
struct Palette {
    surface: VoxelId,
    deep: VoxelId,
}

#[test]
fn ids_deserialize_from_snake_case_names() {
    let p: Palette = toml::from_str("surface = \"grass\"\ndeep = \"stone\"\n").unwrap();
    assert_eq!(p.surface, VoxelId::Grass);
    assert_eq!(p.deep, VoxelId::Stone);
}

#[test]
fn display_matches_serde_name() {
    for id in VoxelId::ALL {
        assert_eq!(id.to_string(), id.name());
    }
}

proptest! {
    // Raw values of known ids survive a raw round trip; unknown ones decode as Empty
    #[test]
    fn from_raw_inverts_raw(raw in any::<u8>()) {
        let id = VoxelId::from_raw(raw);
        if (raw as usize) < VoxelId::ALL.len() {
            prop_assert_eq!(id.raw(), raw);
        } else {
            prop_assert_eq!(id, VoxelId::Empty);
        }
    }

    // Occluders are always solid
    #[test]
    fn occluders_are_solid(raw in 0u8..5) {
        let id = VoxelId::from_raw(raw);
        if id.occludes() {
            prop_assert!(id.is_solid());
        }
    }
}
