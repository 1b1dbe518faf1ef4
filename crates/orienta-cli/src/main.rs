use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use orienta_core::{load_careers, load_profiles, load_questions, ProfileTag, ScoreTally};
use orienta_report::{render_pdf, sample_careers, ReportContext};

#[derive(Debug, Parser)]
#[command(name = "orienta-cli")]
#[command(about = "Orienta maintenance command line interface")]
struct Cli {
    /// Directory holding questions.yaml, careers.yaml and profiles.yaml.
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load and cross-check the instrument data files.
    Validate,
    /// Render a sample report PDF without a server or database.
    Report {
        /// Profile to render the sample for.
        #[arg(long)]
        profile: String,
        /// Respondent name printed on the sample.
        #[arg(long, default_value = "Sample Respondent")]
        name: String,
        /// Seed for the career sampling, for reproducible output.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Output path for the PDF.
        #[arg(long, default_value = "sample_report.pdf")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Validate => validate(&cli.config_dir),
        Commands::Report {
            profile,
            name,
            seed,
            out,
        } => report(&cli.config_dir, &profile, &name, seed, &out),
    }
}

fn validate(config_dir: &std::path::Path) -> anyhow::Result<()> {
    let questions = load_questions(&config_dir.join("questions.yaml"))?;
    let careers = load_careers(&config_dir.join("careers.yaml"))?;
    let profiles = load_profiles(&config_dir.join("profiles.yaml"))?;

    for tag in ProfileTag::ALL {
        anyhow::ensure!(
            !careers.careers_for(Some(tag)).is_empty(),
            "no careers listed for profile {tag}"
        );
        anyhow::ensure!(
            profiles.descriptor_for(tag).is_some(),
            "no descriptor for profile {tag}"
        );
    }

    println!(
        "ok: {} questions, {} profiles with careers and descriptors",
        questions.questions.len(),
        ProfileTag::ALL.len()
    );
    Ok(())
}

fn report(
    config_dir: &std::path::Path,
    profile: &str,
    name: &str,
    seed: u64,
    out: &std::path::Path,
) -> anyhow::Result<()> {
    let tag = ProfileTag::parse(profile)
        .ok_or_else(|| anyhow::anyhow!("unknown profile: {profile}"))?;
    let careers = load_careers(&config_dir.join("careers.yaml"))?;
    let profiles = load_profiles(&config_dir.join("profiles.yaml"))?;

    let mut rng = StdRng::seed_from_u64(seed);
    let sampled = sample_careers(careers.careers_for(Some(tag)), &mut rng);

    // A plausible tally for a sample: the chosen profile dominates.
    let mut tally = ScoreTally::new();
    for other in ProfileTag::ALL {
        tally.insert(other, if other == tag { 12 } else { 3 });
    }

    let pdf = render_pdf(&ReportContext {
        respondent_name: name,
        predominant: Some(tag),
        descriptor: profiles.descriptor_for(tag),
        tally: &tally,
        careers: &sampled,
        generated_on: chrono::Utc::now().date_naive(),
    })?;

    std::fs::write(out, &pdf)?;
    println!("wrote {} ({} bytes)", out.display(), pdf.len());
    Ok(())
}
