//! The grid-cut pipeline: apply transforms, slice along integer planes on every
//! axis, separate the loose parts and move each part's pivot onto its grid cell.

use crate::errors::GridCutError;
use crate::float_types::Real;
use crate::mesh::{Mesh, plane::Plane};
use crate::object::{ApplyTransform, Object};
use crate::scene::{ObjectId, Scene};
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;
use std::ops::Range;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A cutting axis. Its unit direction is both the plane normal and the direction
/// along which the range offsets are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn direction(self) -> Vector3<Real> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }

    /// The plane perpendicular to this axis at `offset`
    pub fn plane_at(self, offset: i64) -> Plane {
        let dir = self.direction();
        Plane::from_point_normal(Point3::from(dir * offset as Real), dir)
    }
}

/// Integer plane offsets: `start`, `start + step`, ... up to but excluding `stop`.
/// A negative step counts down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutRange {
    start: i64,
    stop: i64,
    step: i64,
}

impl Default for CutRange {
    /// `0..10` in unit steps
    fn default() -> Self {
        CutRange {
            start: 0,
            stop: 10,
            step: 1,
        }
    }
}

impl From<Range<i64>> for CutRange {
    fn from(range: Range<i64>) -> Self {
        CutRange {
            start: range.start,
            stop: range.end,
            step: 1,
        }
    }
}

impl CutRange {
    pub const fn new(start: i64, stop: i64, step: i64) -> Result<Self, GridCutError> {
        if step == 0 {
            return Err(GridCutError::InvalidRange { start, stop });
        }
        Ok(CutRange { start, stop, step })
    }

    pub const fn start(&self) -> i64 {
        self.start
    }

    pub const fn stop(&self) -> i64 {
        self.stop
    }

    pub const fn step(&self) -> i64 {
        self.step
    }

    /// Number of offsets in the range. Computed in `i128` so the full `i64` span
    /// with any step is representable.
    pub const fn len(&self) -> usize {
        let (start, stop, step) = (self.start as i128, self.stop as i128, self.step as i128);
        let (span, step) = if step > 0 {
            (stop - start, step)
        } else {
            (start - stop, -step)
        };
        if span <= 0 {
            0
        } else {
            ((span - 1) / step + 1) as usize
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + use<> {
        let (start, step) = (self.start as i128, self.step as i128);
        // Every yielded offset lies between `start` and `stop`, so it fits in i64.
        (0..self.len()).map(move |k| (start + k as i128 * step) as i64)
    }
}

/// Bisect `mesh` at every offset of `range` along `axis`, splitting the cut edges
/// after each plane so the two sides come apart.
///
/// Returns how many planes touched the mesh.
pub fn perform_cuts<S: Clone + Send + Sync + Debug>(
    mesh: &mut Mesh<S>,
    range: &CutRange,
    axis: Axis,
) -> usize {
    let mut touched = 0;
    for offset in range.iter() {
        let result = mesh.bisect_plane(&axis.plane_at(offset));
        if result.is_empty() {
            continue;
        }
        touched += 1;
        mesh.split_edges(&result.edges_cut);
    }
    debug!(?axis, planes = range.len(), touched, "performed cuts");
    touched
}

/// Cut the active object along X, Y and Z and separate it into loose parts.
///
/// The parts are added to the selection; the first part stays in the active object.
///
/// ## Errors
/// [`GridCutError::NoActiveObject`] without an active object,
/// [`GridCutError::NotAMesh`] if the active object has no mesh.
pub fn cut<S: Clone + Send + Sync + Debug>(
    scene: &mut Scene<S>,
    range: &CutRange,
) -> Result<Vec<ObjectId>, GridCutError> {
    cut_axes(scene, range, &Axis::ALL)
}

fn cut_axes<S: Clone + Send + Sync + Debug>(
    scene: &mut Scene<S>,
    range: &CutRange,
    axes: &[Axis],
) -> Result<Vec<ObjectId>, GridCutError> {
    let id = scene.active().ok_or(GridCutError::NoActiveObject)?;
    let object = scene.object_mut(id).ok_or(GridCutError::NoActiveObject)?;
    let mesh = object.mesh_mut()?;

    for &axis in axes {
        perform_cuts(mesh, range, axis);
    }

    let parts = scene.separate_loose(id)?;
    info!(parts = parts.len(), "cut active object into loose parts");
    Ok(parts)
}

/// A grid cell piece produced by [`fix_pivots`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Piece {
    pub id: ObjectId,
    /// Floored bounding-box center; also the piece's new location.
    pub index: Vector3<Real>,
}

impl Piece {
    /// The cell index as integers
    pub fn cell(&self) -> [i64; 3] {
        [self.index.x as i64, self.index.y as i64, self.index.z as i64]
    }
}

/// Move one object's pivot to its grid index: shift by `-index`, bake the transform,
/// then place the object back at `index`.
fn fix_pivot<S: Clone + Send + Sync + Debug>(
    object: &mut Object<S>,
) -> Result<Vector3<Real>, GridCutError> {
    let index = object.grid_index();
    object.transform.location -= index;
    object.apply_transform(ApplyTransform::ALL)?;
    object.transform.location = index;
    Ok(index)
}

/// Fix the pivot of every selected object (see [`Object::grid_index`]).
///
/// Each object in turn becomes the active one, as if processed interactively; the
/// selection is restored to all processed objects at the end.
///
/// ## Errors
/// [`GridCutError::EmptySelection`] when nothing is selected.
pub fn fix_pivots<S: Clone + Send + Sync + Debug>(
    scene: &mut Scene<S>,
) -> Result<Vec<Piece>, GridCutError> {
    let targets = scene.selected_objects();
    let Some(&last) = targets.last() else {
        return Err(GridCutError::EmptySelection);
    };

    #[cfg(not(feature = "parallel"))]
    let pieces = {
        let mut pieces = Vec::with_capacity(targets.len());
        for &id in &targets {
            scene.select(id);
            let object = scene.object_mut(id).ok_or(GridCutError::NoActiveObject)?;
            pieces.push(Piece {
                id,
                index: fix_pivot(object)?,
            });
        }
        pieces
    };

    #[cfg(feature = "parallel")]
    let pieces = {
        let mut selected = vec![false; scene.len()];
        targets.iter().for_each(|id| selected[id.0] = true);
        let pieces = scene
            .objects_mut()
            .par_iter_mut()
            .enumerate()
            .filter(|(i, _)| selected[*i])
            .map(|(i, object)| {
                fix_pivot(object).map(|index| Piece {
                    id: ObjectId(i),
                    index,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        scene.set_active(Some(last));
        pieces
    };

    debug_assert_eq!(scene.active(), Some(last));
    scene.set_selection(&targets);
    info!(pieces = pieces.len(), "fixed pivots");
    Ok(pieces)
}

/// Outcome of a full grid cut
#[derive(Debug, Clone, PartialEq)]
pub struct GridCutReport {
    /// Every piece, in scene order
    pub pieces: Vec<Piece>,
    /// Number of cutting planes per axis
    pub planes: usize,
}

/// Grid-cut options.
///
/// ```
/// use gridcut::{Axis, CutRange, GridCut, Object, Scene, mesh::Mesh};
///
/// let mut scene: Scene<()> = Scene::new();
/// let id = scene.add_object(Object::new_mesh("Slab", Mesh::cuboid(3.5, 0.5, 0.5, None)));
/// scene.select(id);
///
/// let report = GridCut::new()
///     .range(CutRange::new(1, 4, 1)?)
///     .axes(&[Axis::X])
///     .run(&mut scene)?;
/// assert_eq!(report.pieces.len(), 4);
/// # Ok::<(), gridcut::GridCutError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GridCut {
    range: CutRange,
    axes: Vec<Axis>,
    apply_transforms: bool,
}

impl Default for GridCut {
    fn default() -> Self {
        Self::new()
    }
}

impl GridCut {
    /// Range `0..10`, all three axes, transforms applied first
    pub fn new() -> Self {
        GridCut {
            range: CutRange::default(),
            axes: Axis::ALL.to_vec(),
            apply_transforms: true,
        }
    }

    pub const fn range(mut self, range: CutRange) -> Self {
        self.range = range;
        self
    }

    pub fn axes(mut self, axes: &[Axis]) -> Self {
        self.axes = axes.to_vec();
        self
    }

    pub const fn apply_transforms(mut self, apply: bool) -> Self {
        self.apply_transforms = apply;
        self
    }

    /// Run the pipeline on the scene's active object.
    pub fn run<S: Clone + Send + Sync + Debug>(
        &self,
        scene: &mut Scene<S>,
    ) -> Result<GridCutReport, GridCutError> {
        if self.apply_transforms {
            scene.apply_transforms_selected(ApplyTransform::ALL)?;
        }

        let planes = self.range.len();
        info!(
            start = self.range.start(),
            stop = self.range.stop(),
            step = self.range.step(),
            axes = ?self.axes,
            "grid cut"
        );
        cut_axes(scene, &self.range, &self.axes)?;
        let pieces = fix_pivots(scene)?;

        Ok(GridCutReport { pieces, planes })
    }
}

/// Cut the active object into grid cells along X, Y and Z at every offset of
/// `range`, with the transforms of the selection applied first.
pub fn grid_cut<S: Clone + Send + Sync + Debug>(
    scene: &mut Scene<S>,
    range: CutRange,
) -> Result<GridCutReport, GridCutError> {
    GridCut::new().range(range).run(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_counts_up_and_down() {
        assert_eq!(CutRange::default().iter().collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
        let r = CutRange::new(0, 10, 3).unwrap();
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![0, 3, 6, 9]);
        let down = CutRange::new(5, -1, -2).unwrap();
        assert_eq!(down.iter().collect::<Vec<_>>(), vec![5, 3, 1]);
        assert!(CutRange::new(3, 3, 1).unwrap().is_empty());
        assert!(CutRange::new(4, 0, 1).unwrap().is_empty());
        assert_eq!(CutRange::from(-2..2).len(), 4);
    }

    #[test]
    fn extreme_ranges_do_not_overflow() {
        let r = CutRange::new(0, i64::MAX, i64::MAX).unwrap();
        assert_eq!(r.len(), 1);
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![0]);

        let wide = CutRange::new(i64::MIN, i64::MAX, i64::MAX).unwrap();
        assert_eq!(wide.iter().collect::<Vec<_>>(), vec![i64::MIN, -1, i64::MAX - 1]);

        let down = CutRange::new(i64::MAX, i64::MIN, i64::MIN).unwrap();
        assert_eq!(down.iter().collect::<Vec<_>>(), vec![i64::MAX, -1]);

        assert_eq!(CutRange::new(i64::MAX, i64::MIN, 1).unwrap().len(), 0);
        assert_eq!(CutRange::new(i64::MIN, i64::MIN + 3, 1).unwrap().len(), 3);
    }

    #[test]
    fn zero_step_is_rejected() {
        assert!(matches!(
            CutRange::new(0, 10, 0),
            Err(GridCutError::InvalidRange { start: 0, stop: 10 })
        ));
    }

    #[test]
    fn axis_planes() {
        let plane = Axis::Y.plane_at(-3);
        assert_eq!(plane.normal(), Vector3::y());
        assert_eq!(plane.offset(), -3.0);
    }
}
