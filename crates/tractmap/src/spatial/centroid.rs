//! Representative points for feature geometries.

use geo::{Centroid, Coord, Geometry, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};

/// How to reduce a geometry to a single point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CentroidMethod {
    /// Mean of all vertices, skipping the closing vertex of each ring.
    #[default]
    VertexMean,
    /// Area-weighted centroid (length-weighted for lines).
    Area,
}

impl std::str::FromStr for CentroidMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "vertex-mean" | "vertex" | "mean" => Ok(CentroidMethod::VertexMean),
            "area" | "geometric" => Ok(CentroidMethod::Area),
            _ => Err(format!("Unknown centroid method: {}. Use vertex-mean or area.", s)),
        }
    }
}

impl std::fmt::Display for CentroidMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CentroidMethod::VertexMean => write!(f, "vertex-mean"),
            CentroidMethod::Area => write!(f, "area"),
        }
    }
}

/// Compute a representative point. Empty geometries have none.
pub fn centroid(geometry: &Geometry<f64>, method: CentroidMethod) -> Option<Point<f64>> {
    match method {
        CentroidMethod::Area => geometry.centroid(),
        CentroidMethod::VertexMean => {
            let mut vertices = Vec::new();
            collect_vertices(geometry, &mut vertices);
            if vertices.is_empty() {
                return None;
            }
            let n = vertices.len() as f64;
            let (sx, sy) = vertices
                .iter()
                .fold((0.0, 0.0), |(sx, sy), c| (sx + c.x, sy + c.y));
            Some(Point::new(sx / n, sy / n))
        }
    }
}

fn collect_vertices(geometry: &Geometry<f64>, out: &mut Vec<Coord<f64>>) {
    match geometry {
        Geometry::Point(p) => out.push(p.0),
        Geometry::Line(l) => out.extend([l.start, l.end]),
        Geometry::LineString(ls) => out.extend(ls.coords().copied()),
        Geometry::MultiPoint(mp) => out.extend(mp.iter().map(|p| p.0)),
        Geometry::MultiLineString(mls) => {
            for ls in mls {
                out.extend(ls.coords().copied());
            }
        }
        Geometry::Polygon(p) => polygon_vertices(p, out),
        Geometry::MultiPolygon(mp) => {
            for p in mp {
                polygon_vertices(p, out);
            }
        }
        Geometry::Rect(r) => polygon_vertices(&r.to_polygon(), out),
        Geometry::Triangle(t) => polygon_vertices(&t.to_polygon(), out),
        Geometry::GeometryCollection(gc) => {
            for g in gc {
                collect_vertices(g, out);
            }
        }
    }
}

fn polygon_vertices(polygon: &Polygon<f64>, out: &mut Vec<Coord<f64>>) {
    ring_vertices(polygon.exterior(), out);
    for ring in polygon.interiors() {
        ring_vertices(ring, out);
    }
}

fn ring_vertices(ring: &LineString<f64>, out: &mut Vec<Coord<f64>>) {
    let coords = &ring.0;
    let open = match (coords.first(), coords.last()) {
        (Some(first), Some(last)) if coords.len() > 1 && first == last => &coords[..coords.len() - 1],
        _ => &coords[..],
    };
    out.extend_from_slice(open);
}
