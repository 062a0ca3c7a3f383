use super::super::domain::{ScoreBreakdown, MAX_SCORE};
use super::super::validation::ValidatedExtraction;
use super::config::ScoringConfig;
use super::{ScoreComponent, ScoreFactor};

pub(crate) fn score_extraction(
    extraction: &ValidatedExtraction,
    config: &ScoringConfig,
) -> (ScoreBreakdown, Vec<ScoreComponent>) {
    let mut components = Vec::new();

    let completeness = completeness(extraction, config, &mut components);
    let clarity = clarity(extraction, config, &mut components);
    let risk = risk(extraction, config, &mut components);
    let total = (completeness + clarity + risk).min(MAX_SCORE);

    (
        ScoreBreakdown {
            completeness,
            clarity,
            risk,
            total,
        },
        components,
    )
}

fn award(
    components: &mut Vec<ScoreComponent>,
    factor: ScoreFactor,
    points: u16,
    notes: impl Into<String>,
) -> u16 {
    components.push(ScoreComponent {
        factor,
        points: points as i16,
        notes: notes.into(),
    });
    points
}

fn completeness(
    extraction: &ValidatedExtraction,
    config: &ScoringConfig,
    components: &mut Vec<ScoreComponent>,
) -> u16 {
    let fields = &extraction.fields;
    let mut score: u16 = 0;

    score += award(
        components,
        ScoreFactor::SupplierName,
        config.supplier_name_points,
        format!("supplier named as '{}'", extraction.supplier_name),
    );

    if let Some(tax_id) = &fields.tax_id {
        score += award(
            components,
            ScoreFactor::TaxId,
            config.tax_id_points,
            format!("tax id {tax_id} quoted"),
        );
    }

    if fields.phone.is_some() || fields.email.is_some() {
        score += award(
            components,
            ScoreFactor::Contact,
            config.contact_points,
            "phone or email contact provided",
        );
    }

    if fields.address.is_some() {
        score += award(
            components,
            ScoreFactor::Address,
            config.address_points,
            "business address provided",
        );
    }

    if fields.quote_date.is_some() {
        score += award(
            components,
            ScoreFactor::QuoteDate,
            config.quote_date_points,
            "quote is dated",
        );
    }

    if fields.quote_number.is_some() {
        score += award(
            components,
            ScoreFactor::QuoteNumber,
            config.quote_number_points,
            "quote number present",
        );
    }

    score += award(
        components,
        ScoreFactor::TotalAmount,
        config.total_amount_points,
        format!("total amount {:.2} stated", extraction.total_amount),
    );

    if fields.has_breakdown {
        score += award(
            components,
            ScoreFactor::Breakdown,
            config.breakdown_points,
            "itemized cost breakdown",
        );
    }

    score.min(config.completeness_max)
}

fn clarity(
    extraction: &ValidatedExtraction,
    config: &ScoringConfig,
    components: &mut Vec<ScoreComponent>,
) -> u16 {
    let fields = &extraction.fields;
    let mut score: u16 = 0;

    if fields.has_inclusions {
        score += award(
            components,
            ScoreFactor::Inclusions,
            config.inclusions_points,
            "inclusions listed",
        );
    }

    if fields.has_exclusions {
        score += award(
            components,
            ScoreFactor::Exclusions,
            config.exclusions_points,
            "exclusions listed",
        );
    }

    if fields.has_specific_scope {
        score += award(
            components,
            ScoreFactor::SpecificScope,
            config.specific_scope_points,
            "scope of work described specifically",
        );
    }

    score.min(config.clarity_max)
}

fn risk(
    extraction: &ValidatedExtraction,
    config: &ScoringConfig,
    components: &mut Vec<ScoreComponent>,
) -> u16 {
    let fields = &extraction.fields;
    let mut penalty: u32 = 0;

    if fields.vague_phrase_count > 0 {
        let raw = fields
            .vague_phrase_count
            .saturating_mul(u32::from(config.vague_phrase_penalty));
        let applied = raw.min(u32::from(config.vague_phrase_penalty_cap));
        components.push(ScoreComponent {
            factor: ScoreFactor::VagueLanguage,
            points: -(applied as i16),
            notes: format!("{} vague phrase(s)", fields.vague_phrase_count),
        });
        penalty += applied;
    }

    let flags = [
        (
            fields.has_provisional_sum,
            ScoreFactor::ProvisionalSum,
            config.provisional_sum_penalty,
            "provisional sum clause",
        ),
        (
            fields.lump_sum_multi_step,
            ScoreFactor::LumpSumOnly,
            config.lump_sum_penalty,
            "lump sum only for a multi-step project",
        ),
        (
            fields.has_broad_risk_exclusion,
            ScoreFactor::BroadRiskExclusion,
            config.broad_exclusion_penalty,
            "broad risk exclusion clause",
        ),
    ];

    for (present, factor, points, notes) in flags {
        if present {
            components.push(ScoreComponent {
                factor,
                points: -(points as i16),
                notes: notes.to_string(),
            });
            penalty += u32::from(points);
        }
    }

    u32::from(config.risk_baseline).saturating_sub(penalty) as u16
}
