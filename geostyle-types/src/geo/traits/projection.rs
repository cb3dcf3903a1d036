/// Conversion between two coordinate systems, usually from geographic coordinates into the map plane.
pub trait Projection {
    /// Type of the input points.
    type InPoint;
    /// Type of the projected points.
    type OutPoint;

    /// Projects the point. Returns `None` if the point cannot be projected.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Inverse of [`Projection::project`].
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}
