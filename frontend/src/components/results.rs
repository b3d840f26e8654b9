use super::super::Model;
use super::utils::percent;
use shared::{
    ComparisonView, Consensus, ModelOutcome, PredictionOutcome, PredictionView,
    TranslationProvider, Translator,
};
use yew::prelude::*;

/// One bar per category the service scored, highest first.
fn distribution_rows(t: &Translator, view: &PredictionView) -> Vec<(usize, String, f64)> {
    view.ranked
        .iter()
        .map(|entry| (entry.category.id, t.category_label(&entry.category), entry.probability))
        .collect()
}

pub fn render_results(model: &Model) -> Html {
    let t = &model.translator;

    if model.loading() {
        return html! {
            <section class="results-container loading">
                <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
                <p>{ t.translate("analyzing") }</p>
            </section>
        };
    }

    let Some(outcome) = &model.outcome else {
        return html! {};
    };

    let body = match outcome {
        PredictionOutcome::Single { algorithm, view } => {
            render_prediction(t, &algorithm.to_string(), view)
        }
        PredictionOutcome::Comparison(comparison) => render_comparison(t, comparison),
    };

    html! {
        <section class="results-container">
            <h2>{ t.translate("resultsTitle") }</h2>
            <p class="results-explanation">{ t.translate("resultsExplanation") }</p>
            { body }
            { outcome.consensus().map(|consensus| render_consensus(t, &consensus)).unwrap_or_default() }
        </section>
    }
}

fn render_prediction(t: &Translator, algorithm: &str, view: &PredictionView) -> Html {
    let confidence = view.confidence * 100.0;

    html! {
        <div class="prediction-card" key={algorithm.to_string()}>
            <div class="result-header">
                <h3>{ algorithm }</h3>
                <p class="most-likely">
                    { t.translate("mostLikelyCategory") }
                    <strong>{ format!(" {}", t.category_label(&view.predicted)) }</strong>
                </p>
                <div class="confidence-meter">
                    <div class="meter-label">{ t.translate("confidenceTitle") }</div>
                    <div class="meter">
                        <div class="meter-fill" style={format!("width: {}%", confidence)}></div>
                    </div>
                    <div class="meter-value">{ percent(view.confidence) }</div>
                </div>
            </div>
            <div class="detailed-results">
                <h4>{ t.translate("probabilityDistribution") }</h4>
                <div class="result-bars">
                    { for distribution_rows(t, view).into_iter().map(|(id, label, probability)| {
                        html! {
                            <div class="result-item" key={id.to_string()}>
                                <div class="result-label">{ label }</div>
                                <div class="result-bar-container">
                                    <div class="result-bar" style={format!("width: {}%", probability * 100.0)}></div>
                                </div>
                                <div class="result-value">{ percent(probability) }</div>
                            </div>
                        }
                    })}
                </div>
            </div>
        </div>
    }
}

fn render_comparison(t: &Translator, comparison: &ComparisonView) -> Html {
    html! {
        <div class="comparison-results">
            <h3>{ t.translate("comparisonTitle") }</h3>
            <p class="comparison-summary">
                { format!("{} {}/{}", t.translate("successfulModels"), comparison.successful(), comparison.total()) }
            </p>
            <div class="comparison-grid">
                { for comparison.outcomes.iter().map(|outcome| match outcome {
                    ModelOutcome::Success { algorithm, view } => render_prediction(t, algorithm, view),
                    ModelOutcome::Failure { algorithm, reason } => html! {
                        <div class="prediction-card failed" key={algorithm.clone()}>
                            <h3>{ algorithm }</h3>
                            <p class="error-message">
                                <i class="fa-solid fa-circle-exclamation"></i>
                                { format!(" {} {}", t.translate("predictionFailed"), reason) }
                            </p>
                        </div>
                    },
                })}
            </div>
        </div>
    }
}

fn render_consensus(t: &Translator, consensus: &Consensus) -> Html {
    let content = match consensus {
        Consensus::NoData => html! { <p>{ t.translate("consensusNoData") }</p> },
        Consensus::Unanimous(category) => html! {
            <p class="consensus-unanimous">
                <i class="fa-solid fa-circle-check"></i>
                { format!(" {} {}", t.translate("consensusUnanimous"), t.category_label(category)) }
            </p>
        },
        Consensus::Split(groups) => html! {
            <>
                <p class="consensus-split">{ t.translate("consensusSplit") }</p>
                <ul class="consensus-groups">
                    { for groups.iter().map(|group| html! {
                        <li key={group.category.id.to_string()}>
                            { format!(
                                "{}: {} {} ({:.1}%)",
                                t.category_label(&group.category),
                                group.count,
                                t.translate("modelsCount"),
                                group.percentage
                            ) }
                        </li>
                    })}
                </ul>
            </>
        },
    };

    html! {
        <div class="consensus-analysis">
            <h3>{ t.translate("consensusTitle") }</h3>
            { content }
        </div>
    }
}
