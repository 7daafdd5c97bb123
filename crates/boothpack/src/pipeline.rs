//! The packaging run: locate, probe, plan, validate, invoke.

use crate::config::Settings;
use anyhow::Context;
use boothpack_common::{Error, Result};
use boothpack_plan_schema::{validate_plan, InclusionPlan, PlanDocument};
use boothpack_planner::{PlanBuilder, ProbeReport};
use boothpack_prober::{locate_interpreter, InterpreterHandle, InterpreterProbe, LocalExecutor};
use clap::ValueEnum;
use std::path::Path;
use tracing::{info, warn};

/// Serialization format of a written plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    Json,
    Yaml,
}

/// Rendering of the probe report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Validate the interpreter before anything else touches the environment.
pub fn locate(settings: &Settings) -> Result<InterpreterHandle> {
    locate_interpreter(
        settings.python.as_deref(),
        &settings.project_root,
        settings.platform,
    )
}

/// Probe every optional component through `interpreter`.
pub async fn probe(settings: &Settings, interpreter: InterpreterHandle) -> ProbeReport {
    let executor = LocalExecutor::new(settings.probe_timeout);
    let probe = InterpreterProbe::new(interpreter, Box::new(executor));
    ProbeReport::gather(&probe).await
}

/// Build the plan from `report` and reject it if it cannot produce a complete bundle.
pub fn plan(settings: &Settings, report: &ProbeReport) -> Result<InclusionPlan> {
    let plan = PlanBuilder::new(settings.plan_options()).build(report);

    let validation = validate_plan(&plan).map_err(|e| Error::InvalidPlan(e.to_string()))?;
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    if !validation.valid {
        return Err(Error::InvalidPlan(validation.summary()));
    }

    info!(
        "Planned {} entries for {} on {} (fingerprint {})",
        plan.entries.len(),
        plan.backend,
        plan.platform,
        plan.fingerprint()
    );
    Ok(plan)
}

/// Serialize `plan`, fingerprint included.
pub fn render_plan(plan: &InclusionPlan, format: PlanFormat) -> Result<String> {
    let document = PlanDocument::new(plan);
    Ok(match format {
        PlanFormat::Json => serde_json::to_string_pretty(&document)?,
        PlanFormat::Yaml => serde_yaml::to_string(&document)?,
    })
}

pub fn write_plan(plan: &InclusionPlan, path: &Path, format: PlanFormat) -> Result<()> {
    let rendered = render_plan(plan, format)?;
    std::fs::write(path, rendered)
        .with_context(|| format!("Failed to write plan to {}", path.display()))?;
    info!("Plan written to {}", path.display());
    Ok(())
}

pub fn render_report(report: &ProbeReport, format: ReportFormat) -> Result<String> {
    if format == ReportFormat::Json {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    let mut out = String::new();
    for component in [&report.cloud_sync, &report.camera] {
        if component.is_empty() {
            out.push_str(&format!("{:<10} missing\n", component.component));
            continue;
        }
        for location in &component.locations {
            out.push_str(&format!(
                "{:<10} {:<16} {}\n",
                component.component,
                location.role,
                location.path.display()
            ));
        }
    }
    for module in &report.acceleration {
        let status = if module.present { "present" } else { "missing" };
        out.push_str(&format!("{:<10} {:<28} {}\n", "module", module.module, status));
    }
    Ok(out)
}

/// Log where the bundle ended up and what it is missing.
pub fn summarize(plan: &InclusionPlan, artifact: &Path) {
    info!("Bundle written to {}", artifact.display());

    if plan.is_reduced_capability() {
        warn!(
            "Reduced capability: {} optional component(s) not bundled",
            plan.warnings.len()
        );
        for warning in &plan.warnings {
            warn!("  {}", warning);
        }
    } else {
        info!("Full capability: every optional component is bundled");
    }
}

/// Full build: every step, then the backend.
pub async fn build(settings: &Settings, plan_out: Option<&Path>) -> Result<()> {
    let interpreter = locate(settings)?;
    let report = probe(settings, interpreter.clone()).await;
    let plan = plan(settings, &report)?;

    if let Some(path) = plan_out {
        write_plan(&plan, path, PlanFormat::Json)?;
    }

    let artifact = boothpack_backend::invoke(&plan, interpreter.path()).await?;
    summarize(&plan, &artifact);
    Ok(())
}
