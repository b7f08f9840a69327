use std::time::{Duration, Instant};

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use http::Method;
use lee::engine::Engine;
use lee::logging::{init_logging_with_config, LogConfig};
use lee::middleware::recovery;

/// Request throughput benchmark for the Lee router
#[derive(Parser)]
#[command(name = "lee-bench")]
#[command(about = "Measure Lee routing throughput", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve requests one after another on a single thread
    Sequential {
        /// Number of requests to serve
        #[arg(short, long, default_value_t = 100_000)]
        requests: usize,
    },
    /// Serve requests from several threads sharing one engine
    Concurrent {
        /// Number of worker threads
        #[arg(short, long, default_value_t = 4)]
        threads: usize,

        /// Requests served by each thread
        #[arg(short, long, default_value_t = 100_000)]
        requests: usize,
    },
}

const REQUESTS: &[(Method, &str)] = &[
    (Method::GET, "/"),
    (Method::GET, "/users"),
    (Method::GET, "/users/123"),
    (Method::GET, "/users/123/posts"),
    (Method::GET, "/users/123/posts/456"),
    (Method::GET, "/api/v1/users"),
    (Method::GET, "/api/v1/users/42"),
    (Method::GET, "/api/v2/users/42/profile"),
    (Method::GET, "/static/css/site.css"),
    (Method::GET, "/download/releases/v1.0/lee.tar.gz"),
    (Method::POST, "/login"),
    (Method::POST, "/register"),
    (Method::POST, "/api/v1/login"),
    (Method::PUT, "/users/123"),
    (Method::DELETE, "/users/456"),
];

fn demo_engine() -> Engine {
    let mut engine = Engine::new();
    engine.use_middleware(recovery());

    engine
        .get("/", |c| c.string(200, "Welcome"))
        .get("/users", |c| c.json(200, &["alice", "bob"]))
        .get("/users/:id", |c| {
            let id = c.param("id").unwrap_or_default().to_string();
            c.json(200, &serde_json::json!({ "id": id }));
        })
        .get("/users/:id/posts", |c| {
            let id = c.param("id").unwrap_or_default().to_string();
            c.json(200, &serde_json::json!({ "user": id, "posts": [] }));
        })
        .get("/users/:id/posts/:pid", |c| {
            let body = format!(
                "user {} post {}",
                c.param("id").unwrap_or_default(),
                c.param("pid").unwrap_or_default()
            );
            c.string(200, body);
        })
        .get("/api/v1/users", |c| c.string(200, "v1 users"))
        .get("/api/v1/users/:id", |c| {
            let id = c.param("id").unwrap_or_default().to_string();
            c.string(200, id);
        })
        .get("/api/v2/users/:id/profile", |c| {
            let id = c.param("id").unwrap_or_default().to_string();
            c.json(200, &serde_json::json!({ "id": id, "version": 2 }));
        })
        .get("/static/*filepath", |c| {
            let file = c.param("filepath").unwrap_or_default().to_string();
            c.string(200, file);
        })
        .get("/download/*filepath", |c| {
            let file = c.param("filepath").unwrap_or_default().to_string();
            c.data(200, file.into_bytes());
        })
        .post("/login", |c| c.string(200, "logged in"))
        .post("/register", |c| c.string(200, "registered"))
        .post("/api/v1/login", |c| c.string(200, "v1 logged in"));

    engine.router().dump_routes();
    engine
}

/// Serve `count` requests, cycling through the demo requests.
fn run(engine: &Engine, count: usize) -> Result<Duration> {
    let start = Instant::now();
    for (method, path) in REQUESTS.iter().cycle().take(count) {
        let res = engine.serve(method.clone(), path);
        if res.status != 200 && res.status != 404 {
            bail!("{method} {path} returned unexpected status {}", res.status);
        }
    }
    Ok(start.elapsed())
}

fn report(label: &str, total_requests: usize, elapsed: Duration) {
    let secs = elapsed.as_secs_f64();
    let mean_us = if total_requests == 0 {
        0.0
    } else {
        secs * 1_000_000.0 / total_requests as f64
    };
    let qps = if secs > 0.0 {
        total_requests as f64 / secs
    } else {
        0.0
    };
    println!("{label}: {total_requests} requests in {elapsed:?}");
    println!("  mean latency: {mean_us:.3} us");
    println!("  throughput:   {qps:.0} req/s");
}

fn main() -> Result<()> {
    let _guard = init_logging_with_config(&LogConfig::from_env())?;
    let cli = Cli::parse();
    let engine = demo_engine();

    match cli.command {
        Commands::Sequential { requests } => {
            let elapsed = run(&engine, requests)?;
            report("sequential", requests, elapsed);
        }
        Commands::Concurrent { threads, requests } => {
            if threads == 0 {
                bail!("--threads must be at least 1");
            }
            let start = Instant::now();
            std::thread::scope(|s| {
                let workers: Vec<_> = (0..threads)
                    .map(|_| s.spawn(|| run(&engine, requests)))
                    .collect();
                for worker in workers {
                    worker
                        .join()
                        .map_err(|_| anyhow::anyhow!("benchmark thread panicked"))?
                        .context("benchmark thread failed")?;
                }
                Ok::<_, anyhow::Error>(())
            })?;
            report("concurrent", threads * requests, start.elapsed());
        }
    }

    Ok(())
}
