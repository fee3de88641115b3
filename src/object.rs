//! Objects: named mesh containers with a location/rotation/scale transform

use crate::errors::GridCutError;
use crate::float_types::Real;
use crate::mesh::Mesh;
use nalgebra::{Matrix4, Point3, Rotation3, Translation3, Vector3};
use std::fmt::Debug;

/// Location, rotation (XYZ Euler angles in radians) and scale of an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub location: Vector3<Real>,
    pub rotation: Vector3<Real>,
    pub scale: Vector3<Real>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Transform {
            location: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::repeat(1.0),
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Rotation matrix; X is applied first, then Y, then Z.
    pub fn rotation_matrix(&self) -> Matrix4<Real> {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), self.rotation.x);
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), self.rotation.y);
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), self.rotation.z);

        (rz * ry * rx).to_homogeneous()
    }

    /// Local-to-parent matrix: scale, then rotate, then translate.
    pub fn matrix(&self) -> Matrix4<Real> {
        Translation3::from(self.location).to_homogeneous()
            * self.rotation_matrix()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

/// Which transform components [`Object::apply_transform`] bakes into the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyTransform {
    pub location: bool,
    pub rotation: bool,
    pub scale: bool,
}

impl ApplyTransform {
    pub const ALL: ApplyTransform = ApplyTransform {
        location: true,
        rotation: true,
        scale: true,
    };
}

impl Default for ApplyTransform {
    fn default() -> Self {
        Self::ALL
    }
}

/// What an object carries. Anything that is not a mesh is `Empty`; such objects
/// have a transform but nothing to cut.
#[derive(Debug, Clone)]
pub enum ObjectData<S: Clone + Send + Sync + Debug> {
    Mesh(Mesh<S>),
    Empty,
}

#[derive(Debug, Clone)]
pub struct Object<S: Clone + Send + Sync + Debug> {
    pub name: String,
    pub data: ObjectData<S>,
    pub transform: Transform,
}

impl<S: Clone + Send + Sync + Debug> Object<S> {
    pub fn new_mesh(name: impl Into<String>, mesh: Mesh<S>) -> Self {
        Object {
            name: name.into(),
            data: ObjectData::Mesh(mesh),
            transform: Transform::identity(),
        }
    }

    pub fn new_empty(name: impl Into<String>) -> Self {
        Object {
            name: name.into(),
            data: ObjectData::Empty,
            transform: Transform::identity(),
        }
    }

    /// Builder-style helper to place the object
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn mesh(&self) -> Result<&Mesh<S>, GridCutError> {
        match &self.data {
            ObjectData::Mesh(mesh) => Ok(mesh),
            ObjectData::Empty => Err(GridCutError::NotAMesh {
                name: self.name.clone(),
            }),
        }
    }

    pub fn mesh_mut(&mut self) -> Result<&mut Mesh<S>, GridCutError> {
        match &mut self.data {
            ObjectData::Mesh(mesh) => Ok(mesh),
            ObjectData::Empty => Err(GridCutError::NotAMesh {
                name: self.name.clone(),
            }),
        }
    }

    pub fn matrix_world(&self) -> Matrix4<Real> {
        self.transform.matrix()
    }

    /// The eight corners of the local-space bounding box, ordered
    /// `---, --+, -++, -+-, +--, +-+, +++, ++-` over `(x, y, z)`.
    /// Non-mesh and empty objects report every corner at the origin.
    pub fn bound_box(&self) -> [Point3<Real>; 8] {
        let (mins, maxs) = match &self.data {
            ObjectData::Mesh(mesh) if !mesh.vertices.is_empty() => {
                let bb = mesh.bounding_box();
                (bb.mins, bb.maxs)
            },
            _ => (Point3::origin(), Point3::origin()),
        };

        [
            Point3::new(mins.x, mins.y, mins.z),
            Point3::new(mins.x, mins.y, maxs.z),
            Point3::new(mins.x, maxs.y, maxs.z),
            Point3::new(mins.x, maxs.y, mins.z),
            Point3::new(maxs.x, mins.y, mins.z),
            Point3::new(maxs.x, mins.y, maxs.z),
            Point3::new(maxs.x, maxs.y, maxs.z),
            Point3::new(maxs.x, maxs.y, mins.z),
        ]
    }

    /// Mean of the eight bounding-box corners
    pub fn bbox_center(&self) -> Point3<Real> {
        let sum = self
            .bound_box()
            .iter()
            .fold(Vector3::zeros(), |acc, c| acc + c.coords);
        Point3::from(sum * 0.125)
    }

    /// The grid cell this object falls in: its bounding-box center floored per axis
    pub fn grid_index(&self) -> Vector3<Real> {
        self.bbox_center().coords.map(Real::floor)
    }

    /// Bake the selected transform components into the mesh and reset them, so the
    /// object looks the same in world space afterwards.
    ///
    /// Objects without mesh data just have the components reset.
    ///
    /// ## Errors
    /// [`GridCutError::SingularTransform`] if a component that stays on the object
    /// cannot be inverted (a zero scale axis while scale is not applied).
    pub fn apply_transform(&mut self, apply: ApplyTransform) -> Result<(), GridCutError> {
        let old = self.transform.matrix();

        let mut kept = self.transform;
        if apply.location {
            kept.location = Vector3::zeros();
        }
        if apply.rotation {
            kept.rotation = Vector3::zeros();
        }
        if apply.scale {
            kept.scale = Vector3::repeat(1.0);
        }

        if let ObjectData::Mesh(mesh) = &mut self.data {
            let delta = if kept.is_identity() {
                old
            } else {
                let inverse = kept.matrix().try_inverse().ok_or_else(|| {
                    GridCutError::SingularTransform {
                        name: self.name.clone(),
                        scale: kept.scale.abs().min(),
                    }
                })?;
                inverse * old
            };
            if delta != Matrix4::identity() {
                mesh.transform(&delta);
            }
        }

        self.transform = kept;
        Ok(())
    }
}
