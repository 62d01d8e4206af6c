//! Action-Plan Aggregator
//!
//! Combines the static cultivation guide for (crop, language) with the
//! computed fertilizer recommendation. The guide is cloned out of the
//! reference table before the fertilizer stage is appended, so the shared
//! table is never touched and every caller owns its plan outright.

use crate::classifier::CropLabel;
use crate::fertilizer::{FertilizerAdvice, NutrientAdvice};
use crate::knowledge::{CultivationPlan, CultivationPlans, Language, PlanStage};
use crate::render::TemplateRenderer;

/// Name of the stage appended to every plan
pub const FERTILIZER_STAGE: &str = "Personalized Fertilizer Plan";

/// Build the full action plan
///
/// A crop with no authored guide in `language` yields a plan holding only the
/// fertilizer stage.
pub fn build(
    plans: &CultivationPlans,
    renderer: &TemplateRenderer,
    crop: CropLabel,
    advice: &FertilizerAdvice,
    language: &Language,
) -> CultivationPlan {
    let mut plan = plans.get(crop, language).cloned().unwrap_or_default();

    plan.stages.push(PlanStage {
        stage: FERTILIZER_STAGE.to_string(),
        steps: fertilizer_steps(renderer, advice, language),
    });

    plan
}

/// Localized nitrogen and phosphorus lines
pub fn fertilizer_steps(
    renderer: &TemplateRenderer,
    advice: &FertilizerAdvice,
    language: &Language,
) -> Vec<String> {
    vec![
        nutrient_line(renderer, "fertilizer.nitrogen", &advice.nitrogen, language),
        nutrient_line(renderer, "fertilizer.phosphorus", &advice.phosphorus, language),
    ]
}

fn nutrient_line(
    renderer: &TemplateRenderer,
    key: &str,
    nutrient: &NutrientAdvice,
    language: &Language,
) -> String {
    let level = renderer.text(nutrient.level.template_key(), language);
    let amount = format!("{:.1}", nutrient.amount_kg);
    renderer.render(key, language, &[("level", &level), ("amount", &amount)])
}
