use shared::{
    ComparisonView, Consensus, ModelOutcome, PredictionOutcome, PredictionView,
    TranslationProvider, Translator,
};

fn percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

fn push_view(lines: &mut Vec<String>, t: &Translator, view: &PredictionView, top: Option<usize>, indent: &str) {
    lines.push(format!(
        "{}{} {} ({})",
        indent,
        t.translate("mostLikelyCategory"),
        t.category_label(&view.predicted),
        percent(view.confidence)
    ));
    lines.push(format!("{}{}:", indent, t.translate("probabilityDistribution")));

    let ranked = match top {
        Some(count) => view.top(count),
        None => &view.ranked[..],
    };
    for entry in ranked {
        lines.push(format!(
            "{}  {:<16} {:>8}",
            indent,
            t.category_label(&entry.category),
            percent(entry.probability)
        ));
    }
}

fn push_comparison(lines: &mut Vec<String>, t: &Translator, comparison: &ComparisonView, top: Option<usize>) {
    lines.push(t.translate("comparisonTitle"));
    lines.push(format!(
        "{} {}/{}",
        t.translate("successfulModels"),
        comparison.successful(),
        comparison.total()
    ));

    for outcome in &comparison.outcomes {
        lines.push(String::new());
        lines.push(format!("[{}]", outcome.algorithm()));
        match outcome {
            ModelOutcome::Success { view, .. } => push_view(lines, t, view, top, "  "),
            ModelOutcome::Failure { reason, .. } => {
                lines.push(format!("  {} {}", t.translate("predictionFailed"), reason))
            }
        }
    }
}

fn push_consensus(lines: &mut Vec<String>, t: &Translator, consensus: &Consensus) {
    lines.push(String::new());
    lines.push(t.translate("consensusTitle"));
    match consensus {
        Consensus::NoData => lines.push(t.translate("consensusNoData")),
        Consensus::Unanimous(category) => lines.push(format!(
            "{} {}",
            t.translate("consensusUnanimous"),
            t.category_label(category)
        )),
        Consensus::Split(groups) => {
            lines.push(t.translate("consensusSplit"));
            for group in groups {
                lines.push(format!(
                    "  {}: {} {} ({:.1}%)",
                    t.category_label(&group.category),
                    group.count,
                    t.translate("modelsCount"),
                    group.percentage
                ));
            }
        }
    }
}

/// Renders a finished prediction as plain text in the translator's locale.
pub fn render(outcome: &PredictionOutcome, t: &Translator, top: Option<usize>) -> String {
    let mut lines = vec![t.translate("resultsTitle")];

    match outcome {
        PredictionOutcome::Single { algorithm, view } => {
            lines.push(format!("[{}]", algorithm));
            push_view(&mut lines, t, view, top, "");
        }
        PredictionOutcome::Comparison(comparison) => push_comparison(&mut lines, t, comparison, top),
    }

    if let Some(consensus) = outcome.consensus() {
        push_consensus(&mut lines, t, &consensus);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{normalize, Algorithm, CategoryTable, Locale, RawPredictionResponse};

    fn view(predicted: i64, probabilities: Vec<f64>) -> PredictionView {
        normalize(
            &RawPredictionResponse::new(Some(predicted), probabilities),
            &CategoryTable::pacs(),
        )
        .unwrap()
    }

    #[test]
    fn single_report_lists_the_ranked_categories() {
        let t = Translator::embedded().unwrap();
        let outcome = PredictionOutcome::Single {
            algorithm: Algorithm::LFME,
            view: view(0, vec![0.7, 0.2, 0.1, 0.0, 0.0, 0.0, 0.0]),
        };

        let text = render(&outcome, &t, Some(2));
        assert!(text.contains("[LFME]"));
        assert!(text.contains("Most likely category: 🐕 dog (70.00%)"));
        assert!(text.contains("🐘 elephant"));
        assert!(!text.contains("🦒 giraffe"));
        assert!(!text.contains("Consensus"));
    }

    #[test]
    fn comparison_report_includes_failures_and_consensus() {
        let t = Translator::embedded().unwrap().with_locale(Locale::Zh);
        let outcome = PredictionOutcome::Comparison(ComparisonView {
            outcomes: vec![
                ModelOutcome::Success {
                    algorithm: "LFME".into(),
                    view: view(4, vec![0.0, 0.0, 0.0, 0.0, 0.9, 0.1, 0.0]),
                },
                ModelOutcome::Failure {
                    algorithm: "ERM".into(),
                    reason: "checkpoint missing".into(),
                },
            ],
        });

        let text = render(&outcome, &t, None);
        assert!(text.contains("[ERM]"));
        assert!(text.contains("checkpoint missing"));
        assert!(text.contains("1/2"));
        assert!(text.contains(&t.translate("consensusUnanimous")));
    }
}
