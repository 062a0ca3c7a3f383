use crate::infra::{build_service, load_extraction, MemoryService};
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;
use supplier_reputation::config::AppConfig;
use supplier_reputation::error::AppError;
use supplier_reputation::suppliers::{
    EnrichmentOutcome, ExtractionCsvImporter, JobReference, QuoteExtraction, QuoteScorer,
    ScoreComponent, SupplierId,
};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Path to an extraction JSON document (camelCase fields, as produced by the extractor)
    #[arg(long)]
    pub(crate) extraction: PathBuf,
    /// Print the scored quote as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV export of extractions, one quote per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Job reference used for rows that do not carry one
    #[arg(long, default_value = "batch-import")]
    pub(crate) job: String,
    /// Number of suppliers to list in the leaderboard
    #[arg(long, default_value_t = 10)]
    pub(crate) top: usize,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Show per-factor score components for each processed quote
    #[arg(long)]
    pub(crate) show_components: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let extraction = load_extraction(&args.extraction)?;
    let scored = QuoteScorer::default()
        .score(&extraction, Utc::now())
        .map_err(|err| AppError::Supplier(err.into()))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "supplier": scored.supplier.name,
                "tax_id": scored.supplier.tax_id,
                "scores": scored.scores,
                "components": scored.components,
            }))?
        );
        return Ok(());
    }

    println!("Quote integrity score for {}", scored.supplier.name);
    println!(
        "- total {} / 1000 (completeness {}, clarity {}, risk {})",
        scored.scores.total, scored.scores.completeness, scored.scores.clarity, scored.scores.risk
    );
    render_components(&scored.components);
    Ok(())
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let ImportArgs { csv, job, top } = args;
    let config = AppConfig::load()?;
    let service = build_service(&config.reputation);

    let rows = ExtractionCsvImporter::from_path(&csv)?;
    println!("Importing {} extraction(s) from {}", rows.len(), csv.display());

    let (mut scored, mut skipped, mut degraded) = (0usize, 0usize, 0usize);
    for (index, row) in rows.into_iter().enumerate() {
        let reference = row
            .job
            .unwrap_or_else(|| JobReference(format!("{job}-{}", index + 1)));
        match service.enrich_job(reference.clone(), &row.extraction) {
            EnrichmentOutcome::Scored(view) => {
                scored += 1;
                println!(
                    "- {} -> {} scored {} (reputation {}, {} quote(s))",
                    reference,
                    view.supplier.name,
                    view.quote.scores.total,
                    view.supplier.reputation_score,
                    view.supplier.total_quotes_seen
                );
            }
            EnrichmentOutcome::Skipped { reason } => {
                skipped += 1;
                println!("- {} skipped: {}", reference, reason);
            }
            EnrichmentOutcome::Degraded { reason } => {
                degraded += 1;
                println!("- {} degraded: {}", reference, reason);
            }
        }
    }

    println!(
        "\n{} scored | {} skipped | {} degraded",
        scored, skipped, degraded
    );
    render_leaderboard(&service, top)?;
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = build_service(&Default::default());

    println!("Supplier reputation demo");
    let mut tracked: Vec<SupplierId> = Vec::new();
    for (job, extraction) in demo_quotes() {
        let reference = JobReference(job.to_string());
        match service.process_supplier_quote(Some(reference.clone()), &extraction) {
            Ok(processed) => {
                println!(
                    "- {}: {} quoted {:.2} -> score {} | reputation {} ({}){}",
                    reference,
                    processed.supplier.name,
                    processed.quote.total_amount,
                    processed.quote.scores.total,
                    processed.supplier.reputation_score,
                    processed.supplier.confidence.label(),
                    if processed.created { " [new supplier]" } else { "" }
                );
                if args.show_components {
                    render_components(&processed.components);
                }
                if !tracked.contains(&processed.supplier.id) {
                    tracked.push(processed.supplier.id);
                }
            }
            Err(err) => println!("- {}: rejected ({})", reference, err),
        }
    }

    println!("\nSupplier insights");
    for id in &tracked {
        let insight = service.insight(id)?;
        println!(
            "- {} | reputation {} | risk {} | {} quote(s) | confidence {}",
            insight.reputation.name,
            insight.reputation.reputation_score,
            insight.reputation.risk_score,
            insight.reputation.total_quotes_seen,
            insight.reputation.confidence.label()
        );
        println!("  {}", insight.pricing_trend);
    }

    render_leaderboard(&service, 5)?;
    Ok(())
}

fn render_components(components: &[ScoreComponent]) {
    println!("  Score components:");
    for component in components {
        println!(
            "    - {:?}: {:+} ({})",
            component.factor, component.points, component.notes
        );
    }
}

fn render_leaderboard(service: &MemoryService, limit: usize) -> Result<(), AppError> {
    let board = service.leaderboard(limit)?;
    println!("\nLeaderboard (top {})", limit);
    if board.is_empty() {
        println!("  no suppliers recorded");
    }
    for (rank, entry) in board.iter().enumerate() {
        println!(
            "  {}. {} - {} ({} quote(s), {})",
            rank + 1,
            entry.name,
            entry.reputation_score,
            entry.total_quotes_seen,
            entry.confidence.label()
        );
    }
    Ok(())
}

fn demo_quotes() -> Vec<(&'static str, QuoteExtraction)> {
    let harbour = QuoteExtraction {
        supplier_name: Some("Harbour Electrical".to_string()),
        trading_name: Some("Harbour Electrical Pty Ltd".to_string()),
        tax_id: Some("51 824 753 556".to_string()),
        phone: Some("02 9000 0000".to_string()),
        email: Some("quotes@harbour.example".to_string()),
        address: Some("12 Wharf St, Sydney NSW".to_string()),
        quote_date: Some("2025-05-28".to_string()),
        quote_number: Some("HE-1042".to_string()),
        total_amount: Some(4_500.0),
        currency: Some("AUD".to_string()),
        trade_category: Some("electrical".to_string()),
        has_breakdown: true,
        has_inclusions: true,
        has_exclusions: true,
        has_specific_scope: true,
        ..QuoteExtraction::default()
    };

    let northside = QuoteExtraction {
        supplier_name: Some("Northside Roofing".to_string()),
        phone: Some("0400 111 222".to_string()),
        total_amount: Some(12_800.0),
        trade_category: Some("roofing".to_string()),
        vague_phrase_count: 3,
        has_provisional_sum: true,
        lump_sum_multi_step: true,
        ..QuoteExtraction::default()
    };

    let tidy = QuoteExtraction {
        supplier_name: Some("Tidy Gardens".to_string()),
        email: Some("hello@tidygardens.example".to_string()),
        quote_date: Some("03/06/2025".to_string()),
        total_amount: Some(640.0),
        has_inclusions: true,
        has_specific_scope: true,
        vague_phrase_count: 1,
        ..QuoteExtraction::default()
    };

    vec![
        ("job-1001", harbour.clone()),
        ("job-1002", northside.clone()),
        (
            "job-1003",
            QuoteExtraction {
                supplier_name: Some("HARBOUR ELECTRICAL".to_string()),
                total_amount: Some(5_150.0),
                has_broad_risk_exclusion: true,
                ..harbour.clone()
            },
        ),
        ("job-1004", tidy),
        (
            "job-1005",
            QuoteExtraction {
                quote_number: Some("NR-77".to_string()),
                total_amount: Some(11_900.0),
                has_breakdown: true,
                vague_phrase_count: 1,
                has_provisional_sum: false,
                ..northside
            },
        ),
        (
            "job-1006",
            QuoteExtraction {
                total_amount: Some(4_725.0),
                ..harbour
            },
        ),
        (
            "job-1007",
            QuoteExtraction {
                supplier_name: Some("  ".to_string()),
                total_amount: Some(990.0),
                ..QuoteExtraction::default()
            },
        ),
    ]
}
