//! Pipeline orchestration: Visionary, Oracle, Calculator and Alchemist run
//! strictly in that order, each stage consuming the previous stage's full
//! output. Stages never abort the request on recoverable trouble, they
//! degrade and say so.

mod stage;

pub use stage::StageResult;

use crate::alchemist::Alchemist;
use crate::calculator::Calculator;
use crate::oracle::Oracle;
use crate::preset::Preset;
use crate::server::metrics;
use crate::visionary::Visionary;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("prompt is empty")]
    EmptyPrompt,
}

/// Per-request generation options, parsed from the request context.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Blend the top-k corpus matches instead of adapting the single best.
    pub blend: Option<usize>,
}

/// Outcome of a full pipeline run.
pub struct GenerateReport {
    pub preset: Preset,
    /// True when any stage fell back instead of completing cleanly.
    pub degraded: bool,
    /// Stage-tagged warnings, also carried on the preset itself.
    pub stage_warnings: Vec<String>,
}

pub struct TrinityPipeline {
    visionary: Visionary,
    oracle: Oracle,
    calculator: Calculator,
    alchemist: Alchemist,
}

impl TrinityPipeline {
    pub fn new(
        visionary: Visionary,
        oracle: Oracle,
        calculator: Calculator,
        alchemist: Alchemist,
    ) -> Self {
        Self {
            visionary,
            oracle,
            calculator,
            alchemist,
        }
    }

    /// Runs the four stages for one prompt. Only structurally impossible
    /// requests fail; everything recoverable degrades with warnings.
    pub async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<GenerateReport, PipelineError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(PipelineError::EmptyPrompt);
        }

        let mut degraded = false;
        let mut stage_warnings = Vec::new();
        let mut absorb = |stage: &str, warnings: Vec<String>, degraded: &mut bool| {
            if !warnings.is_empty() {
                *degraded = true;
                metrics::record_stage_degraded(stage);
            }
            for w in warnings {
                stage_warnings.push(format!("{}: {}", stage, w));
            }
        };

        let start = Instant::now();
        let (blueprint, warnings) = self.visionary.get_blueprint(prompt).await.into_parts();
        absorb("visionary", warnings, &mut degraded);
        metrics::record_stage_duration("visionary", start.elapsed());
        debug!(
            engines = blueprint.active_count(),
            vibe = %blueprint.overall_vibe,
            "Blueprint ready"
        );

        let start = Instant::now();
        let retrieval = match options.blend {
            Some(k) if k >= 2 => self.oracle.blend_best(&blueprint, k),
            _ => self.oracle.find_best_preset(&blueprint),
        };
        let (preset, warnings) = retrieval.into_parts();
        absorb("oracle", warnings, &mut degraded);
        metrics::record_stage_duration("oracle", start.elapsed());

        let start = Instant::now();
        let (preset, warnings) = self
            .calculator
            .apply_nudges(preset, prompt, &blueprint)
            .await
            .into_parts();
        absorb("calculator", warnings, &mut degraded);
        metrics::record_stage_duration("calculator", start.elapsed());

        let start = Instant::now();
        let (mut preset, warnings) = self.alchemist.finalize_preset(preset, prompt).into_parts();
        absorb("alchemist", warnings, &mut degraded);
        metrics::record_stage_duration("alchemist", start.elapsed());

        for w in &stage_warnings {
            if !preset.validation_warnings.contains(w) {
                preset.validation_warnings.push(w.clone());
            }
        }

        info!(
            name = %preset.name,
            engines = preset.active_count(),
            degraded = degraded,
            "Preset generated"
        );
        Ok(GenerateReport {
            preset,
            degraded,
            stage_warnings,
        })
    }

    pub fn visionary(&self) -> &Visionary {
        &self.visionary
    }
}
