use sculpt_geom::Rgba;
use sculpt_mesh::{MeshBuffer, Mesher};
use sculpt_world::{LatticePoint, lattice_index, lattice_len};

fn lattice(size: usize, f: impl Fn(usize, usize, usize) -> (f32, Rgba)) -> Vec<LatticePoint> {
    let mut pts = vec![LatticePoint::SENTINEL; lattice_len(size)];
    for z in 0..=size {
        for y in 0..=size {
            for x in 0..=size {
                let (d, c) = f(x, y, z);
                pts[lattice_index(x, y, z, size)] =
                    LatticePoint::new([x as i32, y as i32, z as i32], d, c);
            }
        }
    }
    pts
}

#[test]
fn horizontal_plane_meshes_at_its_height() {
    let size = 8;
    let pts = lattice(size, |_, y, _| (y as f32 - 4.0, Rgba::WHITE));
    let mesh = Mesher::new().mesh(size, &pts, 0.0);

    // Two triangles per cube in the single crossed layer.
    assert_eq!(mesh.triangle_count(), size * size * 2);
    for i in 0..mesh.vertex_count() {
        let v = mesh.vertex(i).unwrap();
        assert_eq!(v.y, 4.0, "vertex {i} off the plane: {v:?}");
        assert!((0.0..=8.0).contains(&v.x) && (0.0..=8.0).contains(&v.z));
    }
    let area: f32 = mesh
        .triangles()
        .map(|[a, b, c]| (b - a).cross(c - a).length() * 0.5)
        .sum();
    assert!((area - 64.0).abs() < 1e-3);
}

#[test]
fn uniform_lattices_produce_empty_meshes() {
    let mut m = Mesher::new();
    let solid = lattice(4, |_, _, _| (1.0, Rgba::WHITE));
    let air = lattice(4, |_, _, _| (0.0, Rgba::WHITE));
    assert!(m.mesh(4, &solid, 0.5).is_empty());
    assert!(m.mesh(4, &air, 0.5).is_empty());
}

#[test]
fn indices_are_a_flat_sequence() {
    let size = 6;
    let pts = lattice(size, |x, y, z| {
        let d = 3.0 - ((x as f32 - 3.0).powi(2) + (y as f32 - 3.0).powi(2) + (z as f32 - 3.0).powi(2)).sqrt();
        ((d + 0.5).clamp(0.0, 1.0), Rgba::WHITE)
    });
    let mesh = Mesher::new().mesh(size, &pts, 0.5);
    assert!(!mesh.is_empty());
    assert_eq!(mesh.indices().len(), mesh.vertex_count());
    assert!(mesh.indices().iter().enumerate().all(|(i, &v)| v as usize == i));
    assert_eq!(mesh.colours().len(), mesh.vertex_count() * 4);
}

#[test]
fn vertex_colour_blends_along_the_crossed_edge() {
    let size = 1;
    let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
    let blue = Rgba::new(0.0, 0.0, 1.0, 1.0);
    // Solid bottom in red, empty top in blue; crossing halfway up.
    let pts = lattice(size, |_, y, _| if y == 0 { (1.0, red) } else { (0.0, blue) });
    let mesh: MeshBuffer = Mesher::new().mesh(size, &pts, 0.5);
    assert_eq!(mesh.vertex_count(), 6);
    for i in 0..mesh.vertex_count() {
        assert!((mesh.vertex(i).unwrap().y - 0.5).abs() < 1e-6);
        let c = mesh.colour(i).unwrap();
        assert!((c.r - 0.5).abs() < 1e-6 && (c.b - 0.5).abs() < 1e-6);
    }
}

#[test]
fn scratch_reuse_gives_identical_output() {
    let size = 5;
    let pts = lattice(size, |x, y, z| (((x * 7 + y * 3 + z * 5) % 4) as f32 / 3.0, Rgba::GREEN));
    let mut m = Mesher::new();
    let first = m.mesh(size, &pts, 0.5);
    let mut reused = MeshBuffer::default();
    m.mesh_into(size, &pts, 0.5, &mut reused);
    m.mesh_into(size, &pts, 0.5, &mut reused);
    assert_eq!(first, reused);
}
