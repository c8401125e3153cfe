//! Results page: totals, item comparison, decade projection and recommendations
//! gathered into one serializable value.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::engine::{
    generate_recommendations, grand_total, project_by_category, project_scenario, EmissionsEngine,
};
use crate::factors::EmissionFactorTable;
use crate::types::{
    Category, ComparisonSeries, EmissionsResult, ProjectionSeries, QuantityInput, Recommendation,
};

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub totals: EmissionsResult,
    pub grand_total: f64,
    pub comparison: ComparisonSeries,
    pub projection: ProjectionSeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_by_category: Option<BTreeMap<Category, ProjectionSeries>>,
    pub recommendations: Vec<Recommendation>,
    /// Markdown listing with a heading for each category that has entries.
    pub recommendation_lines: Vec<String>,
}

impl Report {
    pub fn build(
        table: &EmissionFactorTable,
        input: &QuantityInput,
        config: &EngineConfig,
        per_category: bool,
    ) -> Self {
        let engine = EmissionsEngine::new(table).warn_unknown_items(config.warn_unknown_items);
        let totals = engine.compute_totals(input);
        let grand_total = grand_total(&totals);
        debug!(grand_total, "computed category totals");

        let projection = project_scenario(grand_total, &config.projection);
        let projection_by_category =
            per_category.then(|| project_by_category(&totals, &config.projection));
        let recommendations = generate_recommendations(input);
        let recommendation_lines = recommendation_lines(input, &recommendations);

        Report {
            comparison: engine.derive_comparison_series(input),
            totals,
            grand_total,
            projection,
            projection_by_category,
            recommendations,
            recommendation_lines,
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "Total emissions (kg CO2e)")?;
        for (category, total) in self.totals.iter() {
            writeln!(out, "  {:<12} {:>14.2}", category.label(), total)?;
        }
        writeln!(out, "  {:<12} {:>14.2}", "All", self.grand_total)?;

        if !self.comparison.is_empty() {
            writeln!(out)?;
            writeln!(out, "Emissions comparison (kg CO2e/year)")?;
            writeln!(out, "  {:<20} {:>14} {:>14}", "Item", "Traditional", "Reduced")?;
            for i in 0..self.comparison.len() {
                writeln!(
                    out,
                    "  {:<20} {:>14.2} {:>14.2}",
                    self.comparison.labels[i], self.comparison.traditional[i], self.comparison.reduced[i]
                )?;
            }
        }

        writeln!(out)?;
        writeln!(out, "Predicted emissions (kg CO2e)")?;
        write_projection(out, &self.projection)?;
        if let Some(by_category) = &self.projection_by_category {
            for (category, series) in by_category {
                writeln!(out)?;
                writeln!(out, "Predicted emissions, {} (kg CO2e)", category.label())?;
                write_projection(out, series)?;
            }
        }

        writeln!(out)?;
        writeln!(out, "Recommendations")?;
        for line in &self.recommendation_lines {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

fn write_projection(out: &mut String, series: &ProjectionSeries) -> std::fmt::Result {
    writeln!(out, "  {:<6} {:>14} {:>14}", "Year", "Traditional", "Reduced")?;
    for (i, year) in series.years().enumerate() {
        writeln!(
            out,
            "  {:<6} {:>14.2} {:>14.2}",
            year, series.traditional[i], series.reduced[i]
        )?;
    }
    Ok(())
}

fn heading(category: Category) -> &'static str {
    match category {
        Category::Livestock => "### Recommendations for Livestock",
        Category::Crops => "### Recommendations for Crops",
        Category::Fertilizer => "### Recommendations for Fertilizers",
        Category::Fuel => "### Recommendations for Fuel",
        Category::Electricity => "### Recommendations for Electricity",
    }
}

/// Heading for every category with entries (even all-zero ones), then its bullet lines.
pub fn recommendation_lines(input: &QuantityInput, recommendations: &[Recommendation]) -> Vec<String> {
    let mut lines = Vec::new();
    for category in Category::ALL {
        if !input.has_entries(category) {
            continue;
        }
        lines.push(heading(category).to_string());
        lines.extend(
            recommendations
                .iter()
                .filter(|r| r.category == category)
                .map(|r| format!("- {}", r.message)),
        );
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn sample_input() -> QuantityInput {
        QuantityInput::new()
            .with(Category::Crops, "Wheat", 10.0)
            .unwrap()
            .with(Category::Fertilizer, "Urea", 5.0)
            .unwrap()
            .with(Category::Electricity, "Solar", 0.0)
            .unwrap()
    }

    #[test]
    fn test_report_aggregates_everything() {
        let report = Report::build(
            EmissionFactorTable::standard(),
            &sample_input(),
            &EngineConfig::default(),
            false,
        );
        assert!((report.grand_total - 16.25).abs() < 1e-9);
        assert_eq!(report.projection.traditional[0], report.grand_total);
        assert_eq!(report.projection.len(), 10);
        assert_eq!(report.comparison.len(), 3);
        assert_eq!(report.recommendations.len(), 2);
        assert!(report.projection_by_category.is_none());
    }

    #[test]
    fn test_unknown_item_warned_once_per_report() {
        let input = QuantityInput::new()
            .with(Category::Livestock, "Llama", 3.0)
            .unwrap()
            .with(Category::Livestock, "Pigs", 2.0)
            .unwrap();
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let report = tracing::subscriber::with_default(subscriber, || {
            Report::build(
                EmissionFactorTable::standard(),
                &input,
                &EngineConfig::default(),
                false,
            )
        });

        assert_eq!(report.comparison.len(), 2);
        assert_eq!(report.comparison.traditional[0], 0.0);
        assert_eq!(logs.text().matches("not in emission factor table").count(), 1);
    }

    #[test]
    fn test_recommendation_lines_have_headings() {
        let input = sample_input();
        let recs = generate_recommendations(&input);
        let lines = recommendation_lines(&input, &recs);
        assert_eq!(
            lines,
            vec![
                "### Recommendations for Crops".to_string(),
                "- Optimize fertilizer use and adopt precision agriculture techniques for Wheat to minimize emissions."
                    .to_string(),
                "### Recommendations for Fertilizers".to_string(),
                "- Use fertilizers like Organic Compost or Filter Cake to reduce emissions compared to conventional options."
                    .to_string(),
                // Solar was entered at zero: heading only.
                "### Recommendations for Electricity".to_string(),
            ]
        );
    }

    #[test]
    fn test_per_category_projection_included_when_asked() {
        let report = Report::build(
            EmissionFactorTable::standard(),
            &sample_input(),
            &EngineConfig::default(),
            true,
        );
        let by_category = report.projection_by_category.as_ref().unwrap();
        assert_eq!(by_category.len(), 5);
        assert!((by_category[&Category::Crops].traditional[0] - 6.9).abs() < 1e-9);
    }

    #[test]
    fn test_render_text_mentions_sections() {
        let report = Report::build(
            EmissionFactorTable::standard(),
            &sample_input(),
            &EngineConfig::default(),
            false,
        );
        let text = report.render_text();
        assert!(text.contains("Total emissions (kg CO2e)"));
        assert!(text.contains("Wheat"));
        assert!(text.contains("2033"));
        assert!(text.contains("### Recommendations for Crops"));
    }

    #[test]
    fn test_report_serializes_category_keys() {
        let report = Report::build(
            EmissionFactorTable::standard(),
            &sample_input(),
            &EngineConfig::default(),
            false,
        );
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["totals"]["crops"].as_f64().is_some());
        assert_eq!(json["projection"]["start_year"], 2024);
        assert!(json.get("projection_by_category").is_none());
    }
}
