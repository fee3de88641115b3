//! Test support library
//! Provides various helper functions & utilities for tests.

use gridcut::{
    Object, Scene, Transform,
    float_types::Real,
    mesh::{Face, Mesh},
};
use nalgebra::{Point3, Vector3};

/// Returns the bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]` of the
/// vertices actually referenced by faces.
pub fn bounding_box(mesh: &Mesh<()>) -> [Real; 6] {
    let mut bb = [Real::MAX, Real::MAX, Real::MAX, Real::MIN, Real::MIN, Real::MIN];
    for face in &mesh.faces {
        for &i in &face.indices {
            let p = mesh.vertices[i];
            for axis in 0..3 {
                bb[axis] = bb[axis].min(p[axis]);
                bb[axis + 3] = bb[axis + 3].max(p[axis]);
            }
        }
    }
    bb
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// An axis-aligned box with its minimum corner at `min`
pub fn offset_cuboid(min: [Real; 3], size: [Real; 3]) -> Mesh<()> {
    let mut mesh = Mesh::cuboid(size[0], size[1], size[2], None);
    mesh.translate(Vector3::new(min[0], min[1], min[2]));
    mesh
}

/// A single polygon mesh from a loop of points
pub fn make_face(points: &[[Real; 3]]) -> Mesh<()> {
    let vertices = points
        .iter()
        .map(|p| Point3::new(p[0], p[1], p[2]))
        .collect();
    Mesh::from_faces(vertices, vec![Face::new((0..points.len()).collect(), None)])
        .expect("valid polygon")
}

/// A scene holding one selected, active mesh object
pub fn scene_with(name: &str, mesh: Mesh<()>, transform: Transform) -> Scene<()> {
    let mut scene = Scene::new();
    let id = scene.add_object(Object::new_mesh(name, mesh).with_transform(transform));
    scene.select(id);
    scene
}

/// Total area of all faces
pub fn surface_area(mesh: &Mesh<()>) -> Real {
    mesh.faces
        .iter()
        .map(|f| f.newell_normal(&mesh.vertices).norm() * 0.5)
        .sum()
}
