use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_access::{DataStore, MemoryStore, StudentId};
use serde_json::Value;
use server::{Config, CourseRecommendation, RankingOrchestrator, RankingSource};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

/// CourseRecs - course recommendations for students
#[derive(Parser)]
#[command(name = "course-recs")]
#[command(about = "Course recommendations from enrollments, advisor expertise and recency", long_about = None)]
struct Cli {
    /// Read data from a local JSON fixture instead of the Supabase project
    #[arg(short, long, global = true)]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind (defaults to HOST, or 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (defaults to PORT, or 8000)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Get course recommendations for a student
    Recommend {
        /// Student to recommend for
        #[arg(long)]
        student_id: StudentId,

        /// Interest keyword; repeat for several
        #[arg(long = "interest")]
        interests: Vec<String>,

        /// Number of recommendations to return
        #[arg(long, default_value = "5")]
        limit: usize,

        /// Show how each score was computed
        #[arg(long)]
        explain: bool,
    },

    /// List every course with its advisors
    Courses,

    /// List every advisor
    Advisors,
}

#[tokio::main]
async fn main() -> Result<()> {
    server::init_tracing("info");

    let cli = Cli::parse();
    let orchestrator = build_orchestrator(cli.fixture.as_deref())?;

    match cli.command {
        Commands::Serve { host, port } => {
            handle_serve(orchestrator, cli.fixture.is_some(), host, port).await?
        }
        Commands::Recommend {
            student_id,
            interests,
            limit,
            explain,
        } => handle_recommend(orchestrator, student_id, interests, limit, explain).await?,
        Commands::Courses => handle_courses(orchestrator.store().as_ref()).await?,
        Commands::Advisors => handle_advisors(orchestrator.store().as_ref()).await?,
    }

    Ok(())
}

fn build_orchestrator(fixture: Option<&std::path::Path>) -> Result<RankingOrchestrator> {
    match fixture {
        Some(path) => {
            let start = Instant::now();
            let store = MemoryStore::load_from_file(path)
                .with_context(|| format!("Failed to load fixture {}", path.display()))?;
            let (courses, advisors, enrollments) = store.counts();
            println!(
                "{} Loaded {} courses, {} advisors, {} enrollments in {:?}",
                "✓".green(),
                courses,
                advisors,
                enrollments,
                start.elapsed()
            );
            Ok(RankingOrchestrator::new(Arc::new(store)))
        }
        None => {
            let config = Config::load().context("Invalid configuration")?;
            server::supabase_orchestrator(&config)
        }
    }
}

/// Handle the 'serve' command
async fn handle_serve(
    orchestrator: RankingOrchestrator,
    from_fixture: bool,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    // Fixture mode has no credentials to read, so it uses the built-in defaults
    let (default_host, default_port) = if from_fixture {
        ("0.0.0.0".to_string(), 8000)
    } else {
        let config = Config::load().context("Invalid configuration")?;
        (config.host, config.port)
    };

    let host = host.unwrap_or(default_host);
    let port = port.unwrap_or(default_port);

    // Host names such as `localhost` are resolved by bind
    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    let addr = listener.local_addr().context("Listener has no local address")?;
    println!("{} Listening on http://{}", "✓".green(), addr);

    server::serve(listener, orchestrator).await
}

/// Handle the 'recommend' command
async fn handle_recommend(
    orchestrator: RankingOrchestrator,
    student_id: StudentId,
    interests: Vec<String>,
    limit: usize,
    explain: bool,
) -> Result<()> {
    let start = Instant::now();
    let recommendations = orchestrator
        .recommend(student_id, &interests, limit)
        .await
        .with_context(|| format!("Failed to recommend courses for student {student_id}"))?;

    print_recommendations(student_id, &recommendations, explain);
    println!("{}", format!("({:?})", start.elapsed()).dimmed());
    Ok(())
}

/// Handle the 'courses' command
async fn handle_courses(store: &dyn DataStore) -> Result<()> {
    let courses = store.fetch_all_courses().await.context("Failed to fetch courses")?;

    println!("{}", format!("{} courses:", courses.len()).bold().blue());
    for course in &courses {
        let advisors = course
            .advisors
            .iter()
            .filter_map(|a| a.expertise.as_deref())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{}: {} [{}] created {}",
            course.id.to_string().green(),
            course.title().unwrap_or("(untitled)"),
            advisors,
            course.created_at_str().unwrap_or("-")
        );
    }
    Ok(())
}

/// Handle the 'advisors' command
async fn handle_advisors(store: &dyn DataStore) -> Result<()> {
    let advisors = store.fetch_all_advisors().await.context("Failed to fetch advisors")?;

    println!("{}", format!("{} advisors:", advisors.len()).bold().blue());
    for advisor in &advisors {
        let name = advisor
            .extra
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("(unnamed)");
        let id = match &advisor.id {
            Some(Value::String(id)) => id.clone(),
            Some(id) => id.to_string(),
            None => "-".to_string(),
        };
        println!(
            "{}: {} - {}",
            id.green(),
            name,
            advisor.expertise.as_deref().unwrap_or("no listed expertise")
        );
    }
    Ok(())
}

fn print_recommendations(student_id: StudentId, recommendations: &[CourseRecommendation], explain: bool) {
    println!(
        "{}",
        format!("Course recommendations for student {student_id}:").bold().blue()
    );
    if recommendations.is_empty() {
        println!("  (nothing to recommend)");
        return;
    }

    for (index, rec) in recommendations.iter().enumerate() {
        let score = match rec.score() {
            Some(score) => format!("{score:.2}"),
            None => "-".to_string(),
        };
        println!(
            "{}. {} (id {}) - Score: {}",
            (index + 1).to_string().green(),
            rec.course.title().unwrap_or("(untitled)"),
            rec.course.id,
            score
        );
        if explain {
            let source = match rec.source {
                RankingSource::Remote => "remote",
                RankingSource::Local => "local",
            };
            println!("   [{}] {}", source.cyan(), rec.explanation());
        }
    }
}
