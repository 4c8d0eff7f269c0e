use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use rent_panda::data::model::Listing;
use rent_panda::format::format_brl;

const HEADERS: [&str; 7] = [
    "Neighborhood",
    "Rooms",
    "Parking",
    "Area (m²)",
    "Rent (R$)",
    "Condo fee (R$)",
    "Total cost (R$)",
];

/// Detail table of the filtered listings (rows already sorted by rent).
pub fn listings_table(ui: &mut Ui, rows: &[Listing]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(400.0)
        .column(Column::auto().at_least(140.0))
        .columns(Column::auto().at_least(70.0), HEADERS.len() - 1)
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let l = &rows[row.index()];
                let cells = [
                    l.neighborhood.clone(),
                    l.rooms.to_string(),
                    l.parking.to_string(),
                    format!("{:.0}", l.area),
                    format_brl(l.price),
                    format_brl(l.condo_fee),
                    format_brl(l.monthly_cost),
                ];
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
