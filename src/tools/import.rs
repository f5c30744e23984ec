/// Connection import
///
/// Supported inputs:
/// - CSV connection lists (`from,to,dist`)
/// - JSON connection lists, bare or wrapped in `{"connections": [...]}`
/// - JSON map files with city coordinates

use super::{ToolError, ToolResult};
use crate::types::Edge;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// A city with map coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    #[serde(rename = "positionX")]
    pub position_x: f64,
    #[serde(rename = "positionY")]
    pub position_y: f64,
}

impl City {
    pub fn distance_to(&self, other: &City) -> f64 {
        let dx = self.position_x - other.position_x;
        let dy = self.position_y - other.position_y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A map converted into a weighted connection list
#[derive(Debug, Clone)]
pub struct MapData {
    pub mapname: String,
    pub cities: Vec<City>,
    /// Both directions of every undirected pair, in file order
    pub connections: Vec<Edge>,
}

#[derive(Debug, Deserialize)]
struct MapFile {
    mapname: String,
    #[serde(default)]
    cities: Vec<City>,
    #[serde(default)]
    connections: Vec<MapConnection>,
}

#[derive(Debug, Deserialize)]
struct MapConnection {
    parent: String,
    child: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonConnections {
    Bare(Vec<Edge>),
    Wrapped { connections: Vec<Edge> },
}

/// Import a connection list from CSV
///
/// CSV format:
/// ```csv
/// from,to,dist
/// City_0,City_1,1.5
/// City_1,City_2,2
/// ```
pub fn import_from_csv<P: AsRef<Path>>(path: P) -> ToolResult<Vec<Edge>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let mut edges = Vec::new();
    for (row, result) in reader.deserialize::<Edge>().enumerate() {
        let edge = result?;
        if edge.from.is_empty() || edge.to.is_empty() {
            return Err(ToolError::InvalidFormat(format!(
                "Row {}: empty endpoint",
                row + 1
            )));
        }
        edges.push(edge);
    }

    info!(connections = edges.len(), "imported connections from CSV");
    Ok(edges)
}

/// Import a connection list from JSON
///
/// Accepts `[{"from": .., "to": .., "dist": ..}, ...]` or the same array
/// under a `connections` key.
pub fn import_from_json<P: AsRef<Path>>(path: P) -> ToolResult<Vec<Edge>> {
    let file = File::open(path)?;
    let parsed: JsonConnections = serde_json::from_reader(BufReader::new(file))?;

    let edges = match parsed {
        JsonConnections::Bare(edges) => edges,
        JsonConnections::Wrapped { connections } => connections,
    };

    info!(connections = edges.len(), "imported connections from JSON");
    Ok(edges)
}

/// Import a map file and derive weighted connections
///
/// Map format:
/// ```json
/// {
///   "mapname": "skyrim",
///   "cities": [{"name": "Riften", "positionX": 10, "positionY": 4}],
///   "connections": [{"parent": "Riften", "child": "Ivarstead"}]
/// }
/// ```
///
/// Each connection is weighted by the Euclidean distance between its
/// cities and emitted in both directions. A pair already seen in either
/// direction is skipped.
pub fn import_map_from_json<P: AsRef<Path>>(path: P) -> ToolResult<MapData> {
    let file = File::open(path)?;
    let map: MapFile = serde_json::from_reader(BufReader::new(file))?;

    let positions: HashMap<&str, &City> =
        map.cities.iter().map(|c| (c.name.as_str(), c)).collect();

    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut connections = Vec::with_capacity(map.connections.len() * 2);

    for conn in &map.connections {
        let (parent, child) = (conn.parent.as_str(), conn.child.as_str());
        if seen.contains(&(parent, child)) || seen.contains(&(child, parent)) {
            debug!(parent, child, "skipping duplicate connection");
            continue;
        }

        let from = positions.get(parent).ok_or_else(|| {
            ToolError::InvalidFormat(format!("Unknown city in connection: {}", parent))
        })?;
        let to = positions.get(child).ok_or_else(|| {
            ToolError::InvalidFormat(format!("Unknown city in connection: {}", child))
        })?;

        let dist = from.distance_to(to);
        let edge = Edge::new(parent, child, dist);
        let reverse = edge.reversed();
        connections.push(edge);
        connections.push(reverse);

        seen.insert((parent, child));
    }

    info!(
        mapname = %map.mapname,
        cities = map.cities.len(),
        connections = connections.len(),
        "imported map"
    );

    let MapFile {
        mapname, cities, ..
    } = map;
    Ok(MapData {
        mapname,
        cities,
        connections,
    })
}
