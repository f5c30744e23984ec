use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use navgraph::tools::{export_to_csv, export_to_json, split_into_chunks, ExportOptions};
use navgraph::{City, Edge, ExportFormat, DEFAULT_CHUNK_SIZE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write as IoWrite};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, ValueEnum)]
enum GraphType {
    Uniform,
    Grid,
    Chain,
}

#[derive(Parser, Debug)]
#[command(name = "data_generator")]
#[command(about = "Generate city connection datasets for the path engine", long_about = None)]
struct Args {
    /// Type of graph to generate
    #[arg(short, long, value_enum)]
    graph_type: GraphType,

    /// Number of cities
    #[arg(short = 'n', long, default_value_t = 1000)]
    cities: usize,

    /// Average number of roads per city (uniform graphs)
    #[arg(short = 'd', long, default_value_t = 4)]
    avg_degree: usize,

    /// Grid size (for grid graphs, creates size×size grid)
    #[arg(short = 's', long)]
    size: Option<usize>,

    /// Shortcut roads added on top of the chain (chain graphs)
    #[arg(long, default_value_t = 10)]
    shortcuts: usize,

    /// Side length of the square map the cities are placed on
    #[arg(long, default_value_t = 1000.0)]
    map_size: f64,

    /// Round distances to whole numbers
    #[arg(long, default_value_t = false)]
    integer_weights: bool,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Export formats (csv, json, map, ndjson)
    #[arg(short, long, value_delimiter = ',', default_value = "json")]
    formats: Vec<String>,

    /// Connections per chunk for the ndjson stream file
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Map file in the format `import_map_from_json` reads
#[derive(Debug, Serialize)]
struct MapFile<'a> {
    mapname: &'a str,
    cities: &'a [City],
    connections: Vec<MapConnection<'a>>,
}

#[derive(Debug, Serialize)]
struct MapConnection<'a> {
    parent: &'a str,
    child: &'a str,
}

struct CityMap {
    name: String,
    cities: Vec<City>,
    /// Undirected roads as city index pairs
    roads: Vec<(usize, usize)>,
}

impl CityMap {
    /// Both directions of every road, weighted by distance
    fn connections(&self, integer_weights: bool) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(self.roads.len() * 2);
        for &(a, b) in &self.roads {
            let (from, to) = (&self.cities[a], &self.cities[b]);
            let mut dist = from.distance_to(to);
            if integer_weights {
                dist = dist.round().max(1.0);
            }
            let edge = Edge::new(from.name.as_str(), to.name.as_str(), dist);
            let reverse = edge.reversed();
            edges.push(edge);
            edges.push(reverse);
        }
        edges
    }
}

struct MapGenerator {
    rng: StdRng,
    map_size: f64,
}

impl MapGenerator {
    fn new(seed: u64, map_size: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            map_size,
        }
    }

    fn random_city(&mut self, id: usize) -> City {
        City {
            name: format!("City_{}", id),
            position_x: self.rng.gen_range(0.0..self.map_size),
            position_y: self.rng.gen_range(0.0..self.map_size),
        }
    }

    /// Random roads with a fixed average degree
    fn generate_uniform(&mut self, n: usize, avg_degree: usize) -> CityMap {
        println!("Generating uniform map with {} cities, avg degree {}...", n, avg_degree);

        let cities: Vec<City> = (0..n).map(|i| self.random_city(i)).collect();

        let num_roads = (n * avg_degree) / 2;
        let mut roads = Vec::with_capacity(num_roads);
        let mut seen = HashSet::new();

        let mut attempts = 0;
        let max_attempts = num_roads * 10;

        while roads.len() < num_roads && attempts < max_attempts {
            let a = self.rng.gen_range(0..n);
            let b = self.rng.gen_range(0..n);

            if a != b && !seen.contains(&(a, b)) && !seen.contains(&(b, a)) {
                roads.push((a, b));
                seen.insert((a, b));
            }
            attempts += 1;
        }

        CityMap {
            name: format!("map_{}", n),
            cities,
            roads,
        }
    }

    /// 4-connected grid with slightly jittered city positions
    fn generate_grid(&mut self, rows: usize, cols: usize) -> CityMap {
        println!("Generating {}×{} grid map...", rows, cols);

        let spacing = self.map_size / rows.max(cols).max(1) as f64;
        let mut cities = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let jitter_x = self.rng.gen_range(-0.1..0.1) * spacing;
                let jitter_y = self.rng.gen_range(-0.1..0.1) * spacing;
                cities.push(City {
                    name: format!("City_{}", row * cols + col),
                    position_x: col as f64 * spacing + jitter_x,
                    position_y: row as f64 * spacing + jitter_y,
                });
            }
        }

        let mut roads = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                let id = row * cols + col;

                // Right neighbor
                if col + 1 < cols {
                    roads.push((id, id + 1));
                }

                // Bottom neighbor
                if row + 1 < rows {
                    roads.push((id, id + cols));
                }
            }
        }

        CityMap {
            name: format!("grid_{}x{}", rows, cols),
            cities,
            roads,
        }
    }

    /// A single long chain plus random shortcut roads
    fn generate_chain(&mut self, n: usize, shortcuts: usize) -> CityMap {
        println!("Generating chain map with {} cities, {} shortcuts...", n, shortcuts);

        let step = self.map_size / n.max(1) as f64;
        let cities: Vec<City> = (0..n)
            .map(|i| City {
                name: format!("City_{}", i),
                position_x: i as f64 * step,
                position_y: self.rng.gen_range(0.0..step),
            })
            .collect();

        let mut roads: Vec<(usize, usize)> = (1..n).map(|i| (i - 1, i)).collect();
        let mut seen: HashSet<(usize, usize)> = roads.iter().copied().collect();

        let mut attempts = 0;
        let mut added = 0;
        while added < shortcuts && attempts < shortcuts * 10 && n > 2 {
            let a = self.rng.gen_range(0..n);
            let b = self.rng.gen_range(0..n);
            let key = (a.min(b), a.max(b));
            if a != b && !seen.contains(&key) {
                roads.push(key);
                seen.insert(key);
                added += 1;
            }
            attempts += 1;
        }

        CityMap {
            name: format!("chain_{}", n),
            cities,
            roads,
        }
    }
}

fn export_map(map: &CityMap, path: &Path) -> Result<()> {
    let file = MapFile {
        mapname: &map.name,
        cities: &map.cities,
        connections: map
            .roads
            .iter()
            .map(|&(a, b)| MapConnection {
                parent: &map.cities[a].name,
                child: &map.cities[b].name,
            })
            .collect(),
    };
    let writer = BufWriter::new(File::create(path.join("map.json"))?);
    serde_json::to_writer_pretty(writer, &file)?;
    println!("Exported map: {:?}", path.join("map.json"));
    Ok(())
}

/// One chunk request per line, ready to POST to the streaming endpoint
fn export_ndjson(map: &CityMap, edges: &[Edge], chunk_size: usize, path: &Path) -> Result<()> {
    let (start, end) = match (map.cities.first(), map.cities.last()) {
        (Some(start), Some(end)) => (start.name.as_str(), end.name.as_str()),
        _ => return Ok(()),
    };

    let chunks = split_into_chunks(&map.name, start, end, edges, chunk_size);
    let mut writer = BufWriter::new(File::create(path.join("stream.ndjson"))?);
    for chunk in &chunks {
        serde_json::to_writer(&mut writer, chunk)?;
        writeln!(writer)?;
    }
    writer.flush()?;

    println!(
        "Exported {} chunks ({} -> {}): {:?}",
        chunks.len(),
        start,
        end,
        path.join("stream.ndjson")
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Create output directory
    std::fs::create_dir_all(&args.output).context("Failed to create output directory")?;

    let mut generator = MapGenerator::new(args.seed, args.map_size);

    let map = match args.graph_type {
        GraphType::Uniform => generator.generate_uniform(args.cities, args.avg_degree),
        GraphType::Grid => {
            let size = args
                .size
                .unwrap_or((args.cities as f64).sqrt().ceil() as usize);
            generator.generate_grid(size, size)
        }
        GraphType::Chain => generator.generate_chain(args.cities, args.shortcuts),
    };

    let edges = map.connections(args.integer_weights);

    // Export to requested formats
    for format in &args.formats {
        match format.as_str() {
            "map" => export_map(&map, &args.output)?,
            "ndjson" => export_ndjson(&map, &edges, args.chunk_size, &args.output)?,
            other => match other.parse::<ExportFormat>() {
                Ok(format) => {
                    let path = args
                        .output
                        .join(format!("connections.{}", format.extension()));
                    match format {
                        ExportFormat::Csv => export_to_csv(&edges, &path)?,
                        ExportFormat::Json => {
                            export_to_json(&edges, &path, &ExportOptions::default())?
                        }
                    };
                    println!("Exported connections: {:?}", path);
                }
                Err(err) => eprintln!("{}", err),
            },
        }
    }

    println!("\n✅ Data generation complete!");
    println!("Output directory: {:?}", args.output);
    println!("Map statistics:");
    println!("  - Name: {}", map.name);
    println!("  - Cities: {}", map.cities.len());
    println!("  - Roads: {}", map.roads.len());
    println!("  - Connections: {}", edges.len());
    if !map.cities.is_empty() {
        let avg_degree = edges.len() as f64 / map.cities.len() as f64;
        println!("  - Average degree: {:.2}", avg_degree);
    }

    Ok(())
}
