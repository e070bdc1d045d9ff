use super::atom::AtomLabel;
use nalgebra::Point3;

/// An ordered set of atomic coordinates paired 1:1 with their atom labels.
///
/// The pairing is maintained by construction: points and labels can only be added
/// together, so both sequences always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateSet {
    labels: Vec<AtomLabel>,
    points: Vec<Point3<f64>>,
}

impl CoordinateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            labels: Vec::with_capacity(capacity),
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, label: AtomLabel, point: Point3<f64>) {
        self.labels.push(label);
        self.points.push(point);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    #[inline]
    pub fn labels(&self) -> &[AtomLabel] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AtomLabel, &Point3<f64>)> {
        self.labels.iter().zip(self.points.iter())
    }
}

impl FromIterator<(AtomLabel, Point3<f64>)> for CoordinateSet {
    fn from_iter<I: IntoIterator<Item = (AtomLabel, Point3<f64>)>>(iter: I) -> Self {
        let (labels, points) = iter.into_iter().unzip();
        Self { labels, points }
    }
}
