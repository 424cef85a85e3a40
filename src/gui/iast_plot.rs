use crate::Adsorption::pressure_sweep::SweepResult;
use eframe::egui::{self, Color32};
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoints, Points};
use nalgebra::DMatrix;

/// right end of the pressure axis (bar)
pub const PRESSURE_AXIS_MAX: f64 = 4.2;
/// headroom above the largest loading
pub const LOADING_HEADROOM: f64 = 1.1;

const SERIES_STYLE: [(Color32, MarkerShape); 4] = [
    (Color32::BLUE, MarkerShape::Circle),
    (Color32::RED, MarkerShape::Square),
    (Color32::DARK_GREEN, MarkerShape::Diamond),
    (Color32::BROWN, MarkerShape::Up),
];

/// `CH4` -> `CH₄`
pub fn subscript_digits(formula: &str) -> String {
    formula
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32(0x2080 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}

/// Mixture loadings against total pressure, one line-and-marker series per species
pub struct IastPlotWindow {
    pub visible: bool,
    pub title: String,
    pub species: Vec<String>,
    pub pressures: Vec<f64>,
    /// rows follow `pressures`, columns follow `species`
    pub loadings: DMatrix<f64>,
}

impl IastPlotWindow {
    pub fn new(
        title: String,
        species: Vec<String>,
        pressures: Vec<f64>,
        loadings: DMatrix<f64>,
    ) -> Self {
        Self {
            visible: true,
            title,
            species,
            pressures,
            loadings,
        }
    }

    pub fn from_result(result: &SweepResult, title: String) -> Self {
        Self::new(
            title,
            result.species.clone(),
            result.pressures.clone(),
            result.loadings.clone(),
        )
    }

    /// `[pressure, loading]` pairs of species `j`
    pub fn series(&self, j: usize) -> Vec<[f64; 2]> {
        if j >= self.loadings.ncols() {
            return Vec::new();
        }
        self.pressures
            .iter()
            .zip(self.loadings.column(j).iter())
            .map(|(&p, &q)| [p, q])
            .collect()
    }

    /// upper end of the loading axis
    pub fn y_max(&self) -> f64 {
        if self.loadings.is_empty() {
            return 1.0;
        }
        self.loadings.max() * LOADING_HEADROOM
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        if !self.visible {
            return;
        }
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.title);
            ui.separator();
            Plot::new("iast_mixture_isotherms")
                .legend(Legend::default())
                .x_axis_label("Total Pressure (bar)")
                .y_axis_label("Loading (mmol/g)")
                .show_grid(true)
                .include_x(0.0)
                .include_x(PRESSURE_AXIS_MAX)
                .include_y(0.0)
                .include_y(self.y_max())
                .show(ui, |plot_ui| {
                    for (j, name) in self.species.iter().enumerate() {
                        let (color, marker) = SERIES_STYLE[j % SERIES_STYLE.len()];
                        let label = subscript_digits(name);
                        let data = self.series(j);
                        plot_ui.line(
                            Line::new(PlotPoints::from(data.clone()))
                                .name(&label)
                                .color(color)
                                .width(2.0),
                        );
                        plot_ui.points(
                            Points::new(PlotPoints::from(data))
                                .name(&label)
                                .color(color)
                                .shape(marker)
                                .filled(true)
                                .radius(4.0),
                        );
                    }
                });
        });
    }
}

struct IastPlotApp {
    window: IastPlotWindow,
}

impl eframe::App for IastPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.window.show(ctx);
    }
}

/// Opens a native window with the mixture isotherms; returns when it is closed
pub fn show_iast_plot(result: &SweepResult, title: &str) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 600.0])
            .with_title(title.lines().next().unwrap_or("IAST")),
        ..Default::default()
    };
    let window = IastPlotWindow::from_result(result, subscript_digits(title));
    eframe::run_native(
        "GeoSorb IAST",
        options,
        Box::new(|_cc| Ok(Box::new(IastPlotApp { window }))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn window() -> IastPlotWindow {
        IastPlotWindow::new(
            "Binary Mixture Isotherms (CH4/CO2) in IRMOF-1".to_string(),
            vec!["CH4".to_string(), "CO2".to_string()],
            vec![0.1, 0.3, 0.5],
            DMatrix::from_row_slice(3, 2, &[0.05, 0.4, 0.14, 1.1, 0.22, 1.7]),
        )
    }

    #[test]
    fn series_follow_columns() {
        let w = window();
        assert_eq!(w.series(0), vec![[0.1, 0.05], [0.3, 0.14], [0.5, 0.22]]);
        assert_eq!(w.series(1)[2], [0.5, 1.7]);
        assert!(w.series(2).is_empty());
        assert!(w.visible);
    }

    #[test]
    fn loading_axis_has_headroom() {
        assert_relative_eq!(window().y_max(), 1.7 * 1.1, epsilon = 1e-12);
        let empty = IastPlotWindow::new(
            String::new(),
            vec!["CH4".to_string()],
            Vec::new(),
            DMatrix::zeros(0, 1),
        );
        assert_relative_eq!(empty.y_max(), 1.0);
    }

    #[test]
    fn legend_names_use_subscripts() {
        assert_eq!(subscript_digits("CH4"), "CH₄");
        assert_eq!(subscript_digits("CO2"), "CO₂");
        assert_eq!(subscript_digits("N2O4"), "N₂O₄");
        assert_eq!(subscript_digits("Ar"), "Ar");
    }
}
