mod support;

use gridcut::{
    ApplyTransform, Axis, CutRange, GridCut, GridCutError, Object, Scene, Transform, cut,
    fix_pivots, grid_cut, mesh::Mesh, perform_cuts,
};
use nalgebra::{Point3, Vector3};
use support::{approx_eq, bounding_box, offset_cuboid, scene_with, surface_area};

#[test]
fn perform_cuts_only_counts_planes_that_touch() {
    let mut mesh = offset_cuboid([0.25, 0.25, 0.25], [1.5, 1.5, 1.5]);
    let touched = perform_cuts(&mut mesh, &CutRange::default(), Axis::X);
    assert_eq!(touched, 1);
    assert_eq!(mesh.separate_loose().len(), 2);

    let touched = perform_cuts(&mut mesh, &CutRange::new(5, 10, 1).unwrap(), Axis::Y);
    assert_eq!(touched, 0);
}

#[test]
fn cube_straddling_a_grid_corner_falls_into_eight_cells() {
    let cube = offset_cuboid([0.25, 0.25, 0.25], [1.5, 1.5, 1.5]);
    let mut scene = scene_with("Cube", cube, Transform::identity());

    let report = grid_cut(&mut scene, CutRange::default()).unwrap();
    assert_eq!(report.planes, 10);
    assert_eq!(report.pieces.len(), 8);

    let mut cells: Vec<[i64; 3]> = report.pieces.iter().map(|p| p.cell()).collect();
    cells.sort();
    let expected: Vec<[i64; 3]> = (0..8).map(|i| [i >> 2 & 1, i >> 1 & 1, i & 1]).collect();
    assert_eq!(cells, expected);

    let mut area = 0.0;
    for piece in &report.pieces {
        let object = scene.object(piece.id).unwrap();
        assert_eq!(object.transform.location, piece.index);
        assert_eq!(object.transform.rotation, Vector3::zeros());
        assert_eq!(object.transform.scale, Vector3::repeat(1.0));

        // Local geometry sits inside the unit cell at the pivot
        let mesh = object.mesh().unwrap();
        let bb = bounding_box(mesh);
        for axis in 0..3 {
            assert!(bb[axis] >= -1e-9, "{} min {bb:?}", object.name);
            assert!(bb[axis + 3] <= 1.0 + 1e-9, "{} max {bb:?}", object.name);
        }
        area += surface_area(mesh);
    }
    assert!(approx_eq(area, 6.0 * 1.5 * 1.5, 1e-9));
}

#[test]
fn cuboid_on_grid_planes_comes_apart_face_by_face() {
    // Every face of a 2x1x1 box at the origin lies on a grid plane, so each face
    // fragment ends up as a piece of its own.
    let bar = Mesh::cuboid(2.0, 1.0, 1.0, None);
    let mut scene = scene_with("Bar", bar, Transform::identity());
    let report = grid_cut(&mut scene, CutRange::default()).unwrap();

    // x = 0 and x = 2 stay whole, the four long faces are halved at x = 1
    assert_eq!(report.pieces.len(), 10);
    let mut cells: Vec<[i64; 3]> = report.pieces.iter().map(|p| p.cell()).collect();
    cells.sort();
    assert_eq!(
        cells,
        vec![
            [0, 0, 0],
            [0, 0, 0],
            [0, 0, 0],
            [0, 0, 1],
            [0, 1, 0],
            [1, 0, 0],
            [1, 0, 0],
            [1, 0, 1],
            [1, 1, 0],
            [2, 0, 0],
        ]
    );

    let mut area = 0.0;
    let mut end_caps = Vec::new();
    for piece in &report.pieces {
        let object = scene.object(piece.id).unwrap();
        assert_eq!(object.transform.location, piece.index);

        let mesh = object.mesh().unwrap();
        let bb = bounding_box(mesh);
        for axis in 0..3 {
            assert!(bb[axis] >= -1e-9, "{} min {bb:?}", object.name);
            assert!(bb[axis + 3] <= 1.0 + 1e-9, "{} max {bb:?}", object.name);
            // The floored center of the placed piece is its own pivot
            let center = (bb[axis] + bb[axis + 3]) / 2.0 + piece.index[axis];
            assert_eq!(center.floor(), piece.index[axis], "{} center", object.name);
        }
        if bb[0] == bb[3] {
            end_caps.push(piece.cell()[0]);
        }
        area += surface_area(mesh);
    }
    end_caps.sort_unstable();
    assert_eq!(end_caps, vec![0, 2]);
    assert!(approx_eq(area, 10.0, 1e-9));
}

#[test]
fn pieces_are_selected_and_named_after_the_source() {
    let cube = offset_cuboid([0.25, 0.25, 0.25], [1.5, 1.5, 1.5]);
    let mut scene = scene_with("Cube", cube, Transform::identity());
    let report = grid_cut(&mut scene, CutRange::default()).unwrap();

    let ids: Vec<_> = report.pieces.iter().map(|p| p.id).collect();
    assert_eq!(scene.selected_objects(), ids);
    assert_eq!(scene.active(), ids.last().copied());

    let mut names: Vec<&str> = scene.objects().map(|(_, o)| o.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec!["Cube", "Cube.001", "Cube.002", "Cube.003", "Cube.004", "Cube.005", "Cube.006", "Cube.007"]
    );
}

#[test]
fn object_transform_is_applied_before_cutting() {
    let transform = Transform {
        location: Vector3::new(2.25, 0.25, 0.25),
        rotation: Vector3::zeros(),
        scale: Vector3::new(2.0, 1.0, 1.0),
    };
    let mut scene = scene_with("Bar", Mesh::cuboid(1.0, 0.5, 0.5, None), transform);

    let report = grid_cut(&mut scene, CutRange::default()).unwrap();
    // World span 2.25..4.25 along X crosses planes 3 and 4
    let mut cells: Vec<[i64; 3]> = report.pieces.iter().map(|p| p.cell()).collect();
    cells.sort();
    assert_eq!(cells, vec![[2, 0, 0], [3, 0, 0], [4, 0, 0]]);
}

#[test]
fn keeping_transforms_cuts_in_local_space() {
    let transform = Transform {
        scale: Vector3::new(2.0, 1.0, 1.0),
        ..Transform::identity()
    };
    let bar = || offset_cuboid([0.25, 0.25, 0.25], [1.5, 0.5, 0.5]);

    // Local span 0.25..1.75 only meets x = 1
    let mut scene = scene_with("Local", bar(), transform);
    let report = GridCut::new()
        .axes(&[Axis::X])
        .apply_transforms(false)
        .run(&mut scene)
        .unwrap();
    assert_eq!(report.pieces.len(), 2);

    // World span 0.5..3.5 meets x = 1, 2 and 3
    let mut scene = scene_with("World", bar(), transform);
    let report = GridCut::new().axes(&[Axis::X]).run(&mut scene).unwrap();
    assert_eq!(report.pieces.len(), 4);
}

#[test]
fn faces_on_a_cutting_plane_become_slivers() {
    let slab = Mesh::cuboid(1.5, 0.5, 0.5, None);
    let mut scene = scene_with("Slab", slab, Transform::identity());

    let report = GridCut::new()
        .range(CutRange::new(0, 2, 1).unwrap())
        .axes(&[Axis::X])
        .run(&mut scene)
        .unwrap();

    assert_eq!(report.pieces.len(), 3);
    let slivers: Vec<_> = report
        .pieces
        .iter()
        .filter(|p| {
            let bb = bounding_box(scene.object(p.id).unwrap().mesh().unwrap());
            bb[0] == bb[3]
        })
        .collect();
    assert_eq!(slivers.len(), 1);
    assert_eq!(slivers[0].cell(), [0, 0, 0]);
}

#[test]
fn cut_without_pivots_leaves_pieces_in_place() {
    let cube = offset_cuboid([0.25, 0.25, 0.25], [1.5, 1.5, 1.5]);
    let mut scene = scene_with("Cube", cube, Transform::identity());

    let parts = cut(&mut scene, &CutRange::default()).unwrap();
    assert_eq!(parts.len(), 8);
    for id in parts {
        let object = scene.object(id).unwrap();
        assert_eq!(object.transform.location, Vector3::zeros());
        assert!(scene.is_selected(id));
    }
}

#[test]
fn fix_pivots_moves_origin_to_floored_center() {
    let mut mesh: Mesh<()> = Mesh::cube(0.5, None);
    mesh.translate(Vector3::new(-1.6, 3.1, 0.2));
    let mut scene = scene_with("Piece", mesh, Transform::identity());

    let pieces = fix_pivots(&mut scene).unwrap();
    assert_eq!(pieces.len(), 1);
    assert_eq!(pieces[0].cell(), [-2, 3, 0]);

    let object = scene.object(pieces[0].id).unwrap();
    assert_eq!(object.transform.location, Vector3::new(-2.0, 3.0, 0.0));
    let corner = object.bound_box()[0];
    assert!((corner - Point3::new(0.4, 0.1, 0.2)).norm() < 1e-9);
}

#[test]
fn errors_surface_from_the_pipeline() {
    let mut scene: Scene<()> = Scene::new();
    scene.add_object(Object::new_mesh("Unselected", Mesh::cube(1.5, None)));
    assert!(matches!(
        grid_cut(&mut scene, CutRange::default()),
        Err(GridCutError::NoActiveObject)
    ));
    assert!(matches!(fix_pivots(&mut scene), Err(GridCutError::EmptySelection)));

    let lamp = scene.add_object(Object::new_empty("Lamp"));
    scene.select(lamp);
    match grid_cut(&mut scene, CutRange::default()) {
        Err(GridCutError::NotAMesh { name }) => assert_eq!(name, "Lamp"),
        other => panic!("expected NotAMesh, got {other:?}"),
    }

    assert!(matches!(
        CutRange::new(0, 10, 0),
        Err(GridCutError::InvalidRange { .. })
    ));
}

#[test]
fn singular_transform_is_reported_when_scale_is_kept() {
    let transform = Transform {
        scale: Vector3::new(0.0, 1.0, 1.0),
        ..Transform::identity()
    };
    let mut scene = scene_with("Flat", Mesh::cube(1.5, None), transform);
    let result = scene.apply_transforms_selected(ApplyTransform {
        location: true,
        rotation: true,
        scale: false,
    });
    assert!(matches!(result, Err(GridCutError::SingularTransform { .. })));
}
