use std::fmt::{self, Display, Formatter};

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::*;

use crate::{BootstrapReport, BootstrapResult, Significance};

fn number(x: f64) -> String {
    if x.is_finite() && x != 0.0 && !(1e-4..1e6).contains(&x.abs()) {
        format!("{x:.3e}")
    } else {
        format!("{x:.4}")
    }
}

fn verdict(r: &BootstrapResult) -> &'static str {
    match r.classify() {
        Significance::Positive => "🟢 Positive",
        Significance::Negative => "🔴 Negative",
        Significance::Insignificant => "⚪ Not significant",
    }
}

impl BootstrapReport {
    /// Render the report as a table, one row per `(column, statistic)`.
    pub fn display(&self) -> String {
        let mut title_table = Table::new();
        title_table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .add_row(vec![Cell::new(format!(
                "Bootstrap confidence intervals ({:.0}%, {} resamples)",
                self.confidence_level() * 100.0,
                self.n_bootstraps()
            ))
            .set_alignment(CellAlignment::Center)]);

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(
                ["Column", "Statistic", "Value", "Lower", "Upper", "Width", "Sign"]
                    .into_iter()
                    .map(|h| Cell::new(h).set_alignment(CellAlignment::Center)),
            );

        for column in self {
            for (statistic, r) in column.iter() {
                table.add_row(vec![
                    Cell::new(column.name()).set_alignment(CellAlignment::Left),
                    Cell::new(statistic).set_alignment(CellAlignment::Left),
                    Cell::new(number(r.value())).set_alignment(CellAlignment::Right),
                    Cell::new(number(r.lower_bound())).set_alignment(CellAlignment::Right),
                    Cell::new(number(r.upper_bound())).set_alignment(CellAlignment::Right),
                    Cell::new(number(r.error_width())).set_alignment(CellAlignment::Right),
                    Cell::new(verdict(r)).set_alignment(CellAlignment::Left),
                ]);
            }
        }

        format!("{title_table}\n{table}")
    }
}

impl Display for BootstrapReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use crate::{bootstrap_simulation, BootstrapResult, NamedStatistic};

    #[test]
    fn renders_every_pair() {
        let report = bootstrap_simulation(
            vec![("height", vec![1.0_f64, 2.0, 3.0]), ("weight", vec![-4.0, -5.0, -6.0])],
            &[NamedStatistic::mean(), NamedStatistic::median()],
            0.9,
            20,
            1,
        )
        .unwrap();

        let text = report.to_string();
        assert!(text.contains("90%, 20 resamples"));
        for needle in ["height", "weight", "mean", "median", "Positive", "Negative"] {
            assert!(text.contains(needle), "missing `{needle}` in\n{text}");
        }
    }

    #[test]
    fn zero_estimate_is_not_called_straddling() {
        let touching = BootstrapResult::new(0.0, 0.0, 3.0).unwrap();
        let straddling = BootstrapResult::new(-1.0, 0.5, 3.0).unwrap();
        assert_eq!(super::verdict(&touching), "⚪ Not significant");
        assert_eq!(super::verdict(&straddling), "⚪ Not significant");
        assert_eq!(super::verdict(&BootstrapResult::point(2.0)), "🟢 Positive");
    }

    #[test]
    fn formats_extreme_magnitudes_in_scientific_notation() {
        assert_eq!(super::number(1.5), "1.5000");
        assert_eq!(super::number(0.0), "0.0000");
        assert_eq!(super::number(2.5e7), "2.500e7");
    }
}
