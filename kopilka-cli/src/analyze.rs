//! One analysis request end to end: ingest, aggregate, narrate, attach guides.

use anyhow::{Context, Result};
use kopilka_core::{City, Country, DateLocale, ReferenceTable, SocialStatus, offers_student_guides};
use kopilka_finance::{Analysis, PromptKind, SYSTEM_ROLE, format_prompt};
use kopilka_ingest::{IngestReport, load_reference_table, read_transactions_path};
use std::path::{Path, PathBuf};

use crate::config::ReferenceSection;
use crate::llm::Narrator;

#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub csv: PathBuf,
    pub locale: DateLocale,
    pub threshold: f64,
    pub name: String,
    pub country: Country,
    pub status: SocialStatus,
    pub city: City,
    pub reference: ReferenceSection,
}

/// Parks and canteens for the Astana student guide
#[derive(Debug, Clone, Default)]
pub struct Guides {
    pub parks: ReferenceTable,
    pub canteens: ReferenceTable,
    /// User-facing notes about tables that could not be loaded
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Narrative {
    pub kind: PromptKind,
    pub text: String,
}

/// Everything a renderer needs
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub name: String,
    pub country: Country,
    pub status: SocialStatus,
    pub city: City,
    pub ingest: IngestReport,
    pub analysis: Analysis,
    pub narratives: Vec<Narrative>,
    pub guides: Option<Guides>,
}

impl AnalysisReport {
    pub fn narrative(&self, kind: PromptKind) -> Option<&str> {
        self.narratives.iter().find(|n| n.kind == kind).map(|n| n.text.as_str())
    }
}

pub fn ingest(csv: &Path, locale: DateLocale) -> Result<IngestReport> {
    read_transactions_path(csv, locale).with_context(|| format!("reading {}", csv.display()))
}

/// Fails only when the statement itself cannot be read. Advisor and guide
/// problems are folded into the report as text.
pub fn run_analysis(req: &AnalyzeRequest, narrator: &Narrator) -> Result<AnalysisReport> {
    let ingest = ingest(&req.csv, req.locale)?;
    let analysis = Analysis::compute(&ingest.transactions, req.threshold);

    let mut narratives = Vec::with_capacity(PromptKind::ALL.len());
    for kind in PromptKind::ALL {
        let prompt = format_prompt(&ingest.transactions, kind.index(), req.country.label(), req.status.label())?;
        tracing::info!(template = kind.index(), "requesting narrative");
        narratives.push(Narrative {
            kind,
            text: narrator.narrate(SYSTEM_ROLE, &prompt),
        });
    }

    let guides = offers_student_guides(req.city, req.status).then(|| load_guides(&req.reference));

    Ok(AnalysisReport {
        name: req.name.clone(),
        country: req.country,
        status: req.status,
        city: req.city,
        ingest,
        analysis,
        narratives,
        guides,
    })
}

pub fn load_guides(paths: &ReferenceSection) -> Guides {
    let mut warnings = Vec::new();
    let parks = load_guide(&paths.parks_path, "список парков", &mut warnings);
    let canteens = load_guide(&paths.canteens_path, "список столовых", &mut warnings);
    Guides {
        parks,
        canteens,
        warnings,
    }
}

fn load_guide(path: &Path, what: &str, warnings: &mut Vec<String>) -> ReferenceTable {
    match load_reference_table(path) {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "reference table unavailable");
            warnings.push(format!("Не удалось загрузить {what}: {e}"));
            ReferenceTable::empty()
        }
    }
}
