use proptest::prelude::*;
use sculpt_geom::{Aabb, Rgba, Vec3};

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn bounded_f32() -> impl Strategy<Value = f32> {
    -1.0e3f32..1.0e3
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn unit_f32() -> impl Strategy<Value = f32> {
    0.0f32..=1.0
}

fn arb_rgba() -> impl Strategy<Value = Rgba> {
    (unit_f32(), unit_f32(), unit_f32(), unit_f32()).prop_map(|(r, g, b, a)| Rgba::new(r, g, b, a))
}

proptest! {
    // Distance is symmetric and obeys the triangle inequality.
    #[test]
    fn distance_is_a_metric(a in arb_vec3(), b in arb_vec3(), c in arb_vec3()) {
        prop_assert!(approx(a.distance(b), b.distance(a), 1e-3));
        prop_assert!(a.distance(c) <= a.distance(b) + b.distance(c) + 1e-2);
    }

    #[test]
    fn normalized_has_unit_length(v in arb_vec3()) {
        prop_assume!(v.length() > 1e-3);
        prop_assert!(approx(v.normalized().length(), 1.0, 1e-4));
    }

    #[test]
    fn flatten_drops_only_y(v in arb_vec3()) {
        let f = v.flatten_y();
        prop_assert_eq!(f.y, 0.0);
        prop_assert_eq!(f.x, v.x);
        prop_assert_eq!(f.z, v.z);
    }

    // Every point on the segment projects onto itself.
    #[test]
    fn points_on_segment_project_to_themselves(a in arb_vec3(), b in arb_vec3(), t in unit_f32()) {
        let p = a.lerp(b, t);
        let (q, _) = p.closest_on_segment(a, b);
        prop_assert!(q.distance(p) <= 1e-2);
    }

    #[test]
    fn expanded_box_keeps_corners(origin in arb_vec3(), size in 0.0f32..100.0, r in 0.0f32..10.0) {
        let bx = Aabb::from_origin_size(origin, size);
        let grown = bx.expanded(r);
        prop_assert!(grown.contains(bx.min));
        prop_assert!(grown.contains(bx.max));
    }

    #[test]
    fn hsv_components_stay_in_range(c in arb_rgba()) {
        let hsv = c.to_hsv();
        prop_assert!((0.0..=1.0).contains(&hsv.h));
        prop_assert!((0.0..=1.0).contains(&hsv.s));
        prop_assert!((0.0..=1.0).contains(&hsv.v));
    }

    #[test]
    fn hsv_distance_is_symmetric_and_bounded(a in arb_rgba(), b in arb_rgba()) {
        let d = a.hsv_distance(b);
        prop_assert!(approx(d, b.hsv_distance(a), 1e-6));
        prop_assert!((0.0..=1.0).contains(&d));
        prop_assert_eq!(a.hsv_distance(a), 0.0);
    }

    #[test]
    fn colour_lerp_endpoints(a in arb_rgba(), b in arb_rgba()) {
        prop_assert_eq!(a.lerp(b, 0.0), a);
        let end = a.lerp(b, 1.0);
        prop_assert!(approx(end.r, b.r, 1e-6) && approx(end.a, b.a, 1e-6));
    }
}

#[test]
fn cross_follows_right_hand_rule() {
    let x = Vec3::new(1.0, 0.0, 0.0);
    let z = Vec3::new(0.0, 0.0, 1.0);
    assert_eq!(z.cross(x), Vec3::UP);
}

#[test]
fn box_faces_are_inclusive() {
    let bx = Aabb::from_origin_size(Vec3::ZERO, 8.0);
    assert!(bx.contains(Vec3::new(8.0, 0.0, 8.0)));
    assert!(!bx.contains(Vec3::new(8.001, 0.0, 0.0)));
    assert_eq!(bx.center(), Vec3::splat(4.0));
}
