use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ScoringConfig;
use crate::presentation::{self, TilePresenter};
use crate::systems::{HousingSystem, InfluenceSystem, ResetSystem};
use crate::world::{Grid, ScoreTotals};

pub struct EngineSettings {
    pub scenario_name: String,
    pub scoring: ScoringConfig,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            systems: self.systems,
            settings: self.settings,
            passes: 0,
        }
    }
}

/// Runs the scoring systems in order as one synchronous pass.
pub struct Engine {
    systems: Vec<Box<dyn System>>,
    settings: EngineSettings,
    passes: u64,
}

impl Engine {
    /// Reset, influence propagation, then house aggregation.
    pub fn standard(settings: EngineSettings) -> Self {
        EngineBuilder::new(settings)
            .with_system(ResetSystem::new())
            .with_system(InfluenceSystem::new())
            .with_system(HousingSystem::new())
            .build()
    }

    pub fn run_pass(&mut self, grid: &mut Grid) -> Result<PassSummary> {
        self.passes += 1;
        let ctx = PassContext {
            pass: self.passes,
            scenario_name: &self.settings.scenario_name,
            scoring: &self.settings.scoring,
        };

        let mut reports = Vec::with_capacity(self.systems.len());
        for system in &mut self.systems {
            let start = Instant::now();
            system
                .run(&ctx, grid)
                .with_context(|| format!("system '{}' failed in pass {}", system.name(), ctx.pass))?;
            let elapsed = start.elapsed();
            debug!(system = system.name(), elapsed_us = elapsed.as_micros() as u64, "system finished");
            reports.push(SystemRunReport {
                name: system.name().to_string(),
                duration_ms: elapsed.as_secs_f64() * 1_000.0,
            });
        }

        let totals = grid.totals();
        info!(
            scenario = %self.settings.scenario_name,
            pass = self.passes,
            global_score = totals.global_score,
            roads_scored = totals.roads_scored,
            houses_scored = totals.houses_scored,
            "scoring pass complete"
        );
        Ok(PassSummary {
            pass: self.passes,
            system_reports: reports,
            totals,
        })
    }

    /// Run a pass, then refresh every tile through `presenter`.
    pub fn run_pass_with(
        &mut self,
        grid: &mut Grid,
        presenter: &mut dyn TilePresenter,
    ) -> Result<PassSummary> {
        let summary = self.run_pass(grid)?;
        presentation::present(grid, presenter);
        Ok(summary)
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.settings.scoring
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SystemRunReport {
    pub name: String,
    pub duration_ms: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct PassSummary {
    pub pass: u64,
    pub system_reports: Vec<SystemRunReport>,
    pub totals: ScoreTotals,
}

pub struct PassContext<'a> {
    pub pass: u64,
    pub scenario_name: &'a str,
    pub scoring: &'a ScoringConfig,
}

pub trait System: Send {
    fn name(&self) -> &str;
    fn run(&mut self, ctx: &PassContext, grid: &mut Grid) -> Result<()>;
}
