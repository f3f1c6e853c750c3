// src/pipeline/optimizer.rs - Per-radius optimization pipeline
//!
//! existing-coverage filter -> candidate generation (bounded worker pool)
//! -> deduplication -> selection -> evaluation. Each radius is an independent
//! run with its own `run_id`.

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use futures::future::join_all;
use indicatif::MultiProgress;
use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::candidate_generation::{deduplicate_candidates, generate_candidate_pool};
use crate::coverage::filter_existing_coverage;
use crate::evaluation::{evaluate_coverage, facility_records};
use crate::geometry::CoordinateScaler;
use crate::models::candidates::{is_pairwise_separated, CandidateSite};
use crate::models::geo::{Facility, Point};
use crate::models::stats_models::{GenerationSummary, RadiusResult};
use crate::selection::select_sites;
use crate::utils::logging::RadiusLogger;
use crate::utils::optimizer_config::OptimizerConfig;

/// Runs the full pipeline for one coverage radius.
pub async fn optimize_for_radius(
    demand: Arc<Vec<Point>>,
    facilities: Arc<Vec<Facility>>,
    radius_m: f64,
    config: Arc<OptimizerConfig>,
    multi_progress: Option<MultiProgress>,
) -> Result<RadiusResult> {
    if !(radius_m.is_finite() && radius_m > 0.0) {
        bail!("Coverage radius must be positive and finite, got {}", radius_m);
    }
    config.validate().context("Invalid optimizer configuration")?;

    let run_id = Uuid::new_v4().to_string();
    let logger = RadiusLogger::new(radius_m);

    let scaler = CoordinateScaler::for_points(&demand, config.degree_convention);
    let radius_deg = scaler.isotropic(radius_m);
    let local_extent_deg = scaler.anisotropic(radius_m);
    let min_separation = radius_deg * config.min_separation_factor;

    let active: Vec<Point> = facilities
        .iter()
        .filter(|f| f.is_active(config.include_planned))
        .map(|f| f.point())
        .collect();
    logger.log_start(&run_id, demand.len(), active.len(), config.scenario_name());
    logger.log_phase(
        "existing coverage",
        Some(
            format!(
                "radius {:.6} deg (local extent {:.6} lat x {:.6} lon) at reference latitude {:.3}",
                radius_deg,
                local_extent_deg.lat,
                local_extent_deg.lon,
                scaler.reference_latitude()
            )
            .as_str(),
        ),
    );

    let residual = filter_existing_coverage(&demand, &active, radius_deg);
    logger.log_existing_coverage(active.len(), residual.already_covered(), residual.points.len(), demand.len());
    let existing_facilities = facility_records(
        &demand,
        &facilities,
        radius_deg,
        config.include_planned,
        config.occupancy_per_building,
    );

    let mut generation = GenerationSummary::default();
    let selected: Vec<CandidateSite> = if residual.is_empty() {
        logger.log_phase("selection", Some("all demand already covered, no new sites needed"));
        Vec::new()
    } else {
        logger.log_phase(
            "candidate generation",
            Some(format!("{} configurations", config.generator_task_count()).as_str()),
        );
        let pool = generate_candidate_pool(
            Arc::new(residual.points.clone()),
            radius_deg,
            config.clone(),
            &logger,
            multi_progress.as_ref(),
        )
        .await?;

        generation.candidate_sources = pool.sources;
        generation.failed_configurations = pool.failed_configurations;
        generation.candidates_generated = pool.candidates.len();

        logger.log_phase("deduplication", None);
        let deduped = deduplicate_candidates(pool.candidates, radius_deg * config.dedup_factor);
        generation.candidates_after_dedup = deduped.len();

        if deduped.is_empty() {
            logger.log_warning("No viable candidate locations found");
            Vec::new()
        } else {
            logger.log_phase(
                "selection",
                Some(format!("best {} of {} candidates", config.target_count, deduped.len()).as_str()),
            );
            let selection_config = config.selection.clone();
            let target = config.target_count;
            let outcome = tokio::task::spawn_blocking(move || {
                select_sites(&deduped, target, min_separation, &selection_config)
            })
            .await
            .map_err(|e| anyhow!("Site selection task panicked: {}", e))?;
            logger.log_selection(&outcome.strategy, outcome.sites.len(), outcome.total_coverage);
            generation.selection_strategy = Some(outcome.strategy);
            outcome.sites
        }
    };

    if selected.len() > config.target_count {
        bail!(
            "Selected {} sites for {}m, above the target of {}",
            selected.len(),
            radius_m,
            config.target_count
        );
    }
    if !is_pairwise_separated(&selected, min_separation) {
        bail!(
            "Selected sites for {}m violate the minimum separation of {:.6} deg",
            radius_m,
            min_separation
        );
    }

    logger.log_phase("evaluation", None);
    let statistics = evaluate_coverage(
        &demand,
        &residual.covered,
        &selected,
        radius_deg,
        config.occupancy_per_building,
    );
    logger.log_candidate_summary(&generation.candidate_sources, selected.len());
    logger.log_completion(&statistics);

    Ok(RadiusResult {
        run_id,
        generated_at: Utc::now().naive_utc(),
        radius_m,
        radius_deg,
        reference_latitude: scaler.reference_latitude(),
        local_extent_deg,
        scenario: config.scenario_name().to_string(),
        optimal_locations: selected,
        existing_facilities,
        statistics,
        generation,
    })
}

/// Runs every configured radius as an independent task. Results come back in
/// radius order; one radius failing does not affect the others.
pub async fn optimize_all_radii(
    demand: Vec<Point>,
    facilities: Vec<Facility>,
    config: OptimizerConfig,
    multi_progress: Option<MultiProgress>,
) -> Vec<(f64, Result<RadiusResult>)> {
    let demand = Arc::new(demand);
    let facilities = Arc::new(facilities);
    let config = Arc::new(config);
    let radii = config.radii_m.clone();
    info!(
        "🏠 Optimizing {} radii over {} demand points and {} facilities",
        radii.len(),
        demand.len(),
        facilities.len()
    );

    let handles = radii.iter().map(|&radius_m| {
        let demand = demand.clone();
        let facilities = facilities.clone();
        let config = config.clone();
        let mp = multi_progress.clone();
        tokio::spawn(async move { optimize_for_radius(demand, facilities, radius_m, config, mp).await })
    });

    let results = join_all(handles).await;
    radii
        .into_iter()
        .zip(results)
        .map(|(radius_m, joined)| {
            let result = joined
                .map_err(|e| anyhow!("Optimization task for {}m failed to join: {}", radius_m, e))
                .and_then(|r| r);
            (radius_m, result)
        })
        .collect()
}
