use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Plot};

use rent_panda::data::aggregate::{
    Kpis, NeighborhoodMean, PriceBucketStats, SizeBucketStats, SuiteComparison,
};
use rent_panda::data::view::{
    Report, ViewModel, NO_MATCHES_MESSAGE, RANKING_UNAVAILABLE_MESSAGE,
    SUITE_UNAVAILABLE_MESSAGE,
};
use rent_panda::format::{format_brl, format_count};

use crate::color::{self, WITHOUT_SUITE, WITH_SUITE};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 300.0;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render KPIs and charts for the current view model.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    ui.heading("Rental Market Analysis");
    ui.label("Find the apartment that fits your profile and budget.");
    ui.separator();

    let report = match &state.view {
        ViewModel::Ready(report) => report,
        ViewModel::Empty => {
            ui.label(RichText::new(NO_MATCHES_MESSAGE).color(Color32::YELLOW));
            return;
        }
    };

    ui.strong("Overview");
    kpi_cards(ui, &report.kpis);
    ui.separator();

    ui.strong("Mean Rent by Neighborhood");
    match &report.ranking {
        Some(ranking) => ranking_chart(ui, ranking),
        None => info(ui, RANKING_UNAVAILABLE_MESSAGE),
    }
    ui.separator();

    ui.strong("Mean Rent by Apartment Size");
    size_chart(ui, &report.size_buckets);
    size_counts(ui, &report.size_buckets);
    ui.separator();

    ui.strong("Price Distribution");
    price_chart(ui, &report.price_buckets);
    ui.separator();

    ui.strong("Mean Rent: With vs Without Suite");
    match &report.suite_comparison {
        Some(cmp) => suite_chart(ui, cmp),
        None => info(ui, SUITE_UNAVAILABLE_MESSAGE),
    }
    ui.separator();

    ui.strong("Detailed Listings");
    detail_heading(ui, report);
}

fn info(ui: &mut Ui, message: &str) {
    ui.label(RichText::new(message).italics().color(Color32::LIGHT_BLUE));
}

fn detail_heading(ui: &mut Ui, report: &Report) {
    let (min, max) = report.price_range;
    ui.label(format!(
        "{} listings between {} and {}",
        format_count(report.rows.len()),
        format_brl(min),
        format_brl(max)
    ));
    crate::ui::table::listings_table(ui, &report.rows);
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

fn kpi_cards(ui: &mut Ui, kpis: &Kpis) {
    let cards = [
        ("Mean Rent", format_brl(kpis.mean_price)),
        ("Mean Monthly Cost", format_brl(kpis.mean_monthly_cost)),
        ("Mean Price per m²", format_brl(kpis.price_per_area)),
        ("Total Listings", format_count(kpis.count)),
    ];
    ui.columns(cards.len(), |cols| {
        for (col, (title, value)) in cols.iter_mut().zip(cards) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.label(title);
                ui.heading(value);
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Axis formatter that prints the category label at integer positions.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

fn currency_axis(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    format_brl(mark.value)
}

fn static_plot(id: &str) -> Plot {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_grid([true, false])
}

/// Horizontal bars, highest mean at the top, coloured on a blue scale.
fn ranking_chart(ui: &mut Ui, ranking: &[NeighborhoodMean]) {
    let n = ranking.len();
    let lo = ranking.iter().map(|r| r.mean_price).fold(f64::INFINITY, f64::min);
    let hi = ranking.iter().map(|r| r.mean_price).fold(f64::NEG_INFINITY, f64::max);

    let mut labels = vec![String::new(); n];
    let bars: Vec<Bar> = ranking
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let pos = n - 1 - i;
            labels[pos] = r.neighborhood.clone();
            Bar::new(pos as f64, r.mean_price)
                .name(&r.neighborhood)
                .fill(color::blue_scale(r.mean_price, lo, hi))
                .width(0.7)
        })
        .collect();

    let chart = BarChart::new(bars)
        .horizontal()
        .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
            format!("{}\n{}", bar.name, format_brl(bar.value))
        }));

    static_plot("neighborhood_ranking")
        .x_axis_label("Mean rent")
        .x_axis_formatter(currency_axis)
        .y_axis_formatter(category_axis(labels))
        .include_x(0.0)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

fn size_chart(ui: &mut Ui, buckets: &[SizeBucketStats]) {
    let palette = color::sequential_blues(buckets.len());
    let labels: Vec<String> = buckets.iter().map(|b| b.bucket.label().to_string()).collect();

    let bars: Vec<Bar> = buckets
        .iter()
        .zip(palette)
        .enumerate()
        .filter_map(|(i, (b, fill))| {
            let mean = b.mean_price?;
            Some(
                Bar::new(i as f64, mean)
                    .name(b.bucket.label())
                    .fill(fill)
                    .width(0.7),
            )
        })
        .collect();

    let chart = BarChart::new(bars)
        .horizontal()
        .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
            format!("{}\n{}", bar.name, format_brl(bar.value))
        }));

    static_plot("size_buckets")
        .x_axis_label("Mean rent")
        .x_axis_formatter(currency_axis)
        .y_axis_formatter(category_axis(labels))
        .include_x(0.0)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

fn size_counts(ui: &mut Ui, buckets: &[SizeBucketStats]) {
    ui.label(RichText::new("Listings per size range:").strong());
    egui::Grid::new("size_counts")
        .striped(true)
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            for b in buckets {
                ui.label(b.bucket.label());
                ui.label(format_count(b.count));
                ui.end_row();
            }
        });
}

fn price_chart(ui: &mut Ui, buckets: &[PriceBucketStats]) {
    let palette = color::sequential_blues(buckets.len());
    let labels: Vec<String> = buckets.iter().map(|b| b.bucket.label().to_string()).collect();

    let bars: Vec<Bar> = buckets
        .iter()
        .zip(palette)
        .enumerate()
        .map(|(i, (b, fill))| {
            Bar::new(i as f64, b.count as f64)
                .name(b.bucket.label())
                .fill(fill)
                .width(0.7)
        })
        .collect();

    let chart = BarChart::new(bars).element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
        format!("{}\n{} listings", bar.name, bar.value as usize)
    }));

    static_plot("price_buckets")
        .x_axis_label("Price range")
        .y_axis_label("Listings")
        .x_axis_formatter(category_axis(labels))
        .include_y(0.0)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

fn suite_chart(ui: &mut Ui, cmp: &SuiteComparison) {
    let labels = vec!["With suite".to_string(), "Without suite".to_string()];
    let bars = vec![
        Bar::new(0.0, cmp.with_suite)
            .name(&labels[0])
            .fill(WITH_SUITE)
            .width(0.6),
        Bar::new(1.0, cmp.without_suite)
            .name(&labels[1])
            .fill(WITHOUT_SUITE)
            .width(0.6),
    ];

    let chart = BarChart::new(bars).element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
        format!("{}\n{:.2}", bar.name, bar.value)
    }));

    static_plot("suite_comparison")
        .y_axis_label("Mean rent (R$)")
        .x_axis_formatter(category_axis(labels))
        .y_axis_formatter(currency_axis)
        .include_y(0.0)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}
