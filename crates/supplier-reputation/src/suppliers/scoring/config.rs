use serde::{Deserialize, Serialize};

/// Point values for the quote integrity rubric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub supplier_name_points: u16,
    pub tax_id_points: u16,
    pub contact_points: u16,
    pub address_points: u16,
    pub quote_date_points: u16,
    pub quote_number_points: u16,
    pub total_amount_points: u16,
    pub breakdown_points: u16,
    pub completeness_max: u16,

    pub inclusions_points: u16,
    pub exclusions_points: u16,
    pub specific_scope_points: u16,
    pub clarity_max: u16,

    pub risk_baseline: u16,
    pub vague_phrase_penalty: u16,
    pub vague_phrase_penalty_cap: u16,
    pub provisional_sum_penalty: u16,
    pub lump_sum_penalty: u16,
    pub broad_exclusion_penalty: u16,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            supplier_name_points: 50,
            tax_id_points: 80,
            contact_points: 40,
            address_points: 30,
            quote_date_points: 40,
            quote_number_points: 20,
            total_amount_points: 80,
            breakdown_points: 60,
            completeness_max: 400,

            inclusions_points: 100,
            exclusions_points: 100,
            specific_scope_points: 100,
            clarity_max: 300,

            risk_baseline: 300,
            vague_phrase_penalty: 25,
            vague_phrase_penalty_cap: 150,
            provisional_sum_penalty: 75,
            lump_sum_penalty: 75,
            broad_exclusion_penalty: 50,
        }
    }
}
