//! End-to-end: configuration file to packed blobs and back.

use glam::{Affine3A, Vec3};
use tressfx_interop::collider::{CapsuleCollider, SphereCollider};
use tressfx_interop::interop::verify_layouts;
use tressfx_interop::options::HairConfig;
use tressfx_interop::pack::{read_records, read_strand_layout, write_records};
use tressfx_interop::strand::StrandIndex;

const PONYTAIL: &str = include_str!("../assets/configs/ponytail.toml");

#[test]
fn ponytail_config_builds() {
    verify_layouts().unwrap();
    let config = HairConfig::from_toml(PONYTAIL).unwrap();

    let layout = config.strands.to_layout().unwrap();
    assert_eq!(layout.hair_count(), 8);
    assert_eq!(layout.vertex_count(), 16 * 4 + 12 * 2 + 8 * 2);
    assert_eq!(layout.strand_range(4), Some(64..76));

    let colliders = config.colliders.to_collider_set().unwrap();
    assert_eq!(colliders.counts().capsule_count, 2);
    assert_eq!(colliders.counts().sphere_count, 1);
    assert_eq!(colliders.capsules()[1].radius2(), 0.05);
    assert_eq!(config.gpu.initial_strand_capacity, 256);
    assert_eq!(config.gpu.initial_collider_capacity, 64);
}

#[test]
fn blobs_read_back_to_the_same_records() {
    let config = HairConfig::from_toml(PONYTAIL).unwrap();
    let layout = config.strands.to_layout().unwrap();
    let colliders = config.colliders.to_collider_set().unwrap();

    let mut strands = Vec::new();
    write_records(&mut strands, &layout.strand_indices()).unwrap();
    let mut capsules = Vec::new();
    write_records(&mut capsules, colliders.capsules()).unwrap();
    let mut spheres = Vec::new();
    write_records(&mut spheres, colliders.spheres()).unwrap();

    assert_eq!(read_strand_layout(&mut strands.as_slice()).unwrap(), layout);
    assert_eq!(
        read_records::<CapsuleCollider, _>(&mut capsules.as_slice()).unwrap(),
        colliders.capsules()
    );
    assert_eq!(
        read_records::<SphereCollider, _>(&mut spheres.as_slice()).unwrap(),
        colliders.spheres()
    );
}

#[test]
fn tips_are_where_the_layout_says() {
    let config = HairConfig::from_toml(PONYTAIL).unwrap();
    let layout = config.strands.to_layout().unwrap();
    let tips: Vec<usize> = layout
        .iter()
        .enumerate()
        .filter(|(_, index)| index.is_tip())
        .map(|(vertex, _)| vertex)
        .collect();
    let expected: Vec<usize> = (0..layout.hair_count())
        .map(|h| layout.strand_range(h).unwrap().end - 1)
        .collect();
    assert_eq!(tips, expected);
    assert_eq!(layout.strand_index_of(tips[6]), Some(StrandIndex::new(7, 6, 8)));
}

#[test]
fn colliders_follow_the_head_bone() {
    let config = HairConfig::from_toml(PONYTAIL).unwrap();
    let colliders = config.colliders.to_collider_set().unwrap();
    let head = Affine3A::from_translation(Vec3::new(0.0, 0.0, 0.5));
    let posed = colliders.transformed(&head);

    let sphere = posed.spheres()[0];
    assert!((sphere.center() - Vec3::new(0.0, 1.72, 0.5)).length() < 1e-6);
    assert_eq!(sphere.radius, 0.11);
    assert_eq!(posed.counts(), colliders.counts());
}
