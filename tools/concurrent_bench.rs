use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use futures::stream;
use navgraph::{
    import_from_csv, import_from_json, import_map_from_json, split_into_chunks, Code, Edge,
    EngineConfig, PathRequest, PathService, TransportError,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

#[derive(Debug, Clone, ValueEnum)]
enum RequestMode {
    Unary,
    Stream,
    Mixed,
}

#[derive(Parser, Debug)]
#[command(name = "concurrent_bench")]
#[command(about = "Concurrent load tool for the path engine", long_about = None)]
struct Args {
    /// Entry point to exercise
    #[arg(short, long, value_enum, default_value = "unary")]
    mode: RequestMode,

    /// Number of concurrent workers (defaults to the CPU count)
    #[arg(short = 't', long)]
    workers: Option<usize>,

    /// Duration in seconds
    #[arg(short, long, default_value_t = 10)]
    duration: u64,

    /// Grid side length; the graph has size×size cities
    #[arg(short = 's', long, default_value_t = 50)]
    grid_size: usize,

    /// Load the graph from a map file (cities plus parent/child links) instead of a grid
    #[arg(long, conflicts_with = "connections")]
    map: Option<PathBuf>,

    /// Load the graph from a connection list (.csv or .json) instead of a grid
    #[arg(long)]
    connections: Option<PathBuf>,

    /// Connections per chunk in stream mode
    #[arg(short = 'c', long, default_value_t = 1000)]
    chunk_size: usize,

    /// Per-phase deadline in milliseconds
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// Apply the deadline to unary requests too
    #[arg(long, default_value_t = false)]
    unary_deadline: bool,

    /// Output JSON results to file
    #[arg(short, long)]
    output: Option<String>,

    /// Print engine warnings
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct BenchmarkResults {
    mode: String,
    workers: usize,
    graph: String,
    cities: usize,
    connections: usize,
    duration_secs: f64,
    total_requests: u64,
    successful_requests: u64,
    not_found: u64,
    deadline_exceeded: u64,
    invalid_argument: u64,
    internal: u64,
    throughput_req_per_sec: f64,
    latencies_ms: LatencyStats,
    per_worker_requests: Vec<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LatencyStats {
    min: f64,
    max: f64,
    mean: f64,
    p50: f64,
    p95: f64,
    p99: f64,
}

struct WorkerStats {
    requests: AtomicU64,
    successes: AtomicU64,
    not_found: AtomicU64,
    deadline_exceeded: AtomicU64,
    invalid_argument: AtomicU64,
    internal: AtomicU64,
    latencies: parking_lot::Mutex<Vec<Duration>>,
}

impl WorkerStats {
    fn new() -> Self {
        Self {
            requests: AtomicU64::new(0),
            successes: AtomicU64::new(0),
            not_found: AtomicU64::new(0),
            deadline_exceeded: AtomicU64::new(0),
            invalid_argument: AtomicU64::new(0),
            internal: AtomicU64::new(0),
            latencies: parking_lot::Mutex::new(Vec::new()),
        }
    }

    fn record_success(&self, latency: Duration) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.successes.fetch_add(1, Ordering::Relaxed);
        self.latencies.lock().push(latency);
    }

    fn record_failure(&self, code: Code) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let counter = match code {
            Code::NotFound => &self.not_found,
            Code::DeadlineExceeded => &self.deadline_exceeded,
            Code::InvalidArgument => &self.invalid_argument,
            Code::Internal => &self.internal,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Bidirectional grid with integer weights in 1..=9
fn build_grid(size: usize, rng: &mut StdRng) -> Vec<Edge> {
    let name = |row: usize, col: usize| format!("City_{}", row * size + col);
    let mut edges = Vec::with_capacity(size * size * 4);

    for row in 0..size {
        for col in 0..size {
            let mut link = |to: String| {
                let edge = Edge::new(name(row, col), to, rng.gen_range(1..10) as f64);
                edges.push(edge.reversed());
                edges.push(edge);
            };
            if col + 1 < size {
                link(name(row, col + 1));
            }
            if row + 1 < size {
                link(name(row + 1, col));
            }
        }
    }

    edges
}

/// Graph every worker queries
struct Workload {
    name: String,
    cities: Vec<String>,
    edges: Vec<Edge>,
}

impl Workload {
    fn from_edges(name: String, edges: Vec<Edge>) -> Result<Self> {
        let mut seen = HashSet::new();
        let cities: Vec<String> = edges
            .iter()
            .flat_map(|e| [&e.from, &e.to])
            .filter(|city| seen.insert(*city))
            .cloned()
            .collect();

        if cities.is_empty() {
            bail!("Workload {} has no connections", name);
        }
        Ok(Self {
            name,
            cities,
            edges,
        })
    }
}

fn load_connections(path: &Path) -> Result<Vec<Edge>> {
    let edges = match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => import_from_csv(path),
        Some("json") => import_from_json(path),
        _ => bail!("Unsupported connection file {}", path.display()),
    };
    edges.with_context(|| format!("Failed to load {}", path.display()))
}

fn load_workload(args: &Args, rng: &mut StdRng) -> Result<Workload> {
    if let Some(path) = &args.map {
        let map = import_map_from_json(path)
            .with_context(|| format!("Failed to load map {}", path.display()))?;
        return Workload::from_edges(map.mapname, map.connections);
    }
    if let Some(path) = &args.connections {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "connections".to_string());
        return Workload::from_edges(name, load_connections(path)?);
    }

    let name = format!("grid_{}x{}", args.grid_size, args.grid_size);
    Workload::from_edges(name, build_grid(args.grid_size, rng))
}

async fn run_worker(
    service: PathService,
    workload: Arc<Workload>,
    mode: RequestMode,
    chunk_size: usize,
    duration: Duration,
    stats: Arc<WorkerStats>,
    worker_id: usize,
    seed: u64,
) -> u64 {
    let mut rng = StdRng::seed_from_u64(seed + worker_id as u64);
    let cities = &workload.cities;
    let start = Instant::now();
    let mut local_requests = 0u64;

    while start.elapsed() < duration {
        let from = &cities[rng.gen_range(0..cities.len())];
        let to = &cities[rng.gen_range(0..cities.len())];
        let streamed = match mode {
            RequestMode::Unary => false,
            RequestMode::Stream => true,
            RequestMode::Mixed => rng.gen_bool(0.5),
        };

        let op_start = Instant::now();
        let result = if streamed {
            let chunks = split_into_chunks(&workload.name, from, to, &workload.edges, chunk_size);
            service
                .get_optimal_path_stream(stream::iter(
                    chunks.into_iter().map(Ok::<_, TransportError>),
                ))
                .await
        } else {
            service
                .get_optimal_path(PathRequest::new(from, to, workload.edges.clone()))
                .await
        };

        match result {
            Ok(_) => stats.record_success(op_start.elapsed()),
            Err(err) => stats.record_failure(err.code()),
        }
        local_requests += 1;
    }

    println!("Worker {} completed {} requests", worker_id, local_requests);
    local_requests
}

fn calculate_latency_stats(latencies: &[Duration]) -> LatencyStats {
    if latencies.is_empty() {
        return LatencyStats {
            min: 0.0,
            max: 0.0,
            mean: 0.0,
            p50: 0.0,
            p95: 0.0,
            p99: 0.0,
        };
    }

    let mut sorted: Vec<f64> = latencies
        .iter()
        .map(|d| d.as_secs_f64() * 1000.0)
        .collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let len = sorted.len();
    let sum: f64 = sorted.iter().sum();

    LatencyStats {
        min: sorted[0],
        max: sorted[len - 1],
        mean: sum / len as f64,
        p50: sorted[len / 2],
        p95: sorted[(len * 95) / 100],
        p99: sorted[(len * 99) / 100],
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::WARN
    } else {
        tracing::Level::ERROR
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let workers = args.workers.unwrap_or_else(num_cpus::get).max(1);

    println!("=== Concurrent Benchmark Configuration ===");
    println!("Mode: {:?}", args.mode);
    println!("Workers: {}", workers);
    println!("Duration: {}s", args.duration);
    println!("Deadline: {}ms (unary bound: {})", args.timeout_ms, args.unary_deadline);
    println!("==========================================\n");

    let mut rng = StdRng::seed_from_u64(args.seed);
    let workload = Arc::new(load_workload(&args, &mut rng)?);
    println!(
        "Loaded {} with {} cities and {} connections",
        workload.name,
        workload.cities.len(),
        workload.edges.len()
    );

    let service = PathService::new(EngineConfig::new(
        Duration::from_millis(args.timeout_ms),
        args.unary_deadline,
    ));

    println!("\nStarting benchmark...\n");

    let stats = Arc::new(WorkerStats::new());
    let duration = Duration::from_secs(args.duration);

    let mut join_set = JoinSet::new();
    let start_time = Instant::now();

    for worker_id in 0..workers {
        let service = service.clone();
        let workload = workload.clone();
        let stats = stats.clone();
        let mode = args.mode.clone();
        let (chunk_size, seed) = (args.chunk_size, args.seed);

        join_set.spawn(async move {
            let count = run_worker(
                service, workload, mode, chunk_size, duration, stats, worker_id, seed,
            )
            .await;
            (worker_id, count)
        });
    }

    let mut per_worker_requests = vec![0u64; workers];
    while let Some(result) = join_set.join_next().await {
        match result {
            Ok((worker_id, count)) => per_worker_requests[worker_id] = count,
            Err(err) => eprintln!("Worker failed: {}", err),
        }
    }

    let actual_duration = start_time.elapsed();

    let total = stats.requests.load(Ordering::Relaxed);
    let successes = stats.successes.load(Ordering::Relaxed);
    let latencies = stats.latencies.lock().clone();

    let results = BenchmarkResults {
        mode: format!("{:?}", args.mode),
        workers,
        graph: workload.name.clone(),
        cities: workload.cities.len(),
        connections: workload.edges.len(),
        duration_secs: actual_duration.as_secs_f64(),
        total_requests: total,
        successful_requests: successes,
        not_found: stats.not_found.load(Ordering::Relaxed),
        deadline_exceeded: stats.deadline_exceeded.load(Ordering::Relaxed),
        invalid_argument: stats.invalid_argument.load(Ordering::Relaxed),
        internal: stats.internal.load(Ordering::Relaxed),
        throughput_req_per_sec: total as f64 / actual_duration.as_secs_f64(),
        latencies_ms: calculate_latency_stats(&latencies),
        per_worker_requests,
    };

    println!("\n=== Benchmark Results ===");
    println!("Total requests: {}", results.total_requests);
    println!("Successful: {}", results.successful_requests);
    println!("Not found: {}", results.not_found);
    println!("Deadline exceeded: {}", results.deadline_exceeded);
    println!("Invalid argument: {}", results.invalid_argument);
    println!("Internal: {}", results.internal);
    println!("Duration: {:.2}s", results.duration_secs);
    println!("Throughput: {:.2} req/sec", results.throughput_req_per_sec);
    println!("\nLatency of successful requests (ms):");
    println!("  Min: {:.3}", results.latencies_ms.min);
    println!("  Mean: {:.3}", results.latencies_ms.mean);
    println!("  P50: {:.3}", results.latencies_ms.p50);
    println!("  P95: {:.3}", results.latencies_ms.p95);
    println!("  P99: {:.3}", results.latencies_ms.p99);
    println!("  Max: {:.3}", results.latencies_ms.max);

    if let Some(output_path) = args.output {
        let json_output = serde_json::to_string_pretty(&results)?;
        std::fs::write(&output_path, json_output)?;
        println!("\n✅ Results saved to: {}", output_path);
    }

    Ok(())
}
