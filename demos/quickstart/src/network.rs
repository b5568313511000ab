//! Synthetic road network around downtown Berkeley.
//!
//! A 4 × 4 street grid: east–west ways are named by row, north–south ways
//! by column, and a handful of nodes carry point-of-interest names.  Small
//! enough to read, large enough for turns.

use anyhow::Result;

use rm_service::{MapServiceBuilder, NodeId};

const WEST: f64 = -122.2700;
const SOUTH: f64 = 37.8600;
const STEP_LON: f64 = 0.0060;
const STEP_LAT: f64 = 0.0050;

/// South to north.
const STREETS: [&str; 4] = ["Dwight Way", "Durant Avenue", "Bancroft Way", "Allston Way"];
/// West to east.
const AVENUES: [&str; 4] = ["Shattuck Avenue", "Fulton Street", "Telegraph Avenue", "College Avenue"];

const POIS: [(usize, usize, &str); 5] = [
    (0, 2, "Top Dog"),
    (1, 1, "Peet's Coffee"),
    (2, 3, "Caffe Strada"),
    (3, 0, "Berkeley Art Museum"),
    (0, 0, "Berkeley Bowl"),
];

fn node(row: usize, col: usize) -> NodeId {
    NodeId((row * AVENUES.len() + col) as i64 + 1)
}

#[derive(Copy, Clone)]
enum Way {
    Street(usize),
    Avenue(usize),
}

/// A node keeps the last way it was attached to, so each intersection is
/// announced as the road fed in latest.  Cross avenues go first and read as
/// streets; Shattuck keeps its own intersections up to Allston, where the
/// default route turns.
const INGEST_ORDER: [Way; 8] = [
    Way::Avenue(1),
    Way::Avenue(2),
    Way::Avenue(3),
    Way::Street(0),
    Way::Street(1),
    Way::Street(2),
    Way::Avenue(0),
    Way::Street(3),
];

/// Feed the grid into `b` through the ingestion primitives.
pub fn populate(b: &mut MapServiceBuilder) -> Result<()> {
    for row in 0..STREETS.len() {
        for col in 0..AVENUES.len() {
            let lon = WEST + col as f64 * STEP_LON;
            let lat = SOUTH + row as f64 * STEP_LAT;
            b.add_node(node(row, col), lon, lat)?;
        }
    }

    for way in INGEST_ORDER {
        let (id, name, refs): (i64, &str, Vec<NodeId>) = match way {
            Way::Street(row) => (
                100 + row as i64,
                STREETS[row],
                (0..AVENUES.len()).map(|col| node(row, col)).collect(),
            ),
            Way::Avenue(col) => (
                200 + col as i64,
                AVENUES[col],
                (0..STREETS.len()).map(|row| node(row, col)).collect(),
            ),
        };
        b.add_way(id, Some(name), &refs)?;
    }

    for (row, col, name) in POIS {
        b.set_name(node(row, col), name)?;
    }

    // A cafe off the road network: pruned from the graph, still searchable.
    let kiosk = NodeId(1_000);
    b.add_node(kiosk, WEST - 0.01, SOUTH - 0.01)?;
    b.set_name(kiosk, "Peets Coffee Kiosk")?;
    Ok(())
}
