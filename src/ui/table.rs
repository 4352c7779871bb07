use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use bnb_insights::data::summary::{ColumnSummary, SummaryReport};

const STATS: [(&str, fn(&ColumnSummary) -> f64); 7] = [
    ("mean", |c: &ColumnSummary| c.mean),
    ("std", |c: &ColumnSummary| c.std),
    ("min", |c: &ColumnSummary| c.min),
    ("25%", |c: &ColumnSummary| c.p25),
    ("50%", |c: &ColumnSummary| c.p50),
    ("75%", |c: &ColumnSummary| c.p75),
    ("max", |c: &ColumnSummary| c.max),
];

/// Describe-style table: one row per statistic, one column per field.
pub fn summary_table(ui: &mut Ui, report: &SummaryReport) {
    ui.push_id("summary_table", |ui: &mut Ui| describe_rows(ui, report));
}

fn describe_rows(ui: &mut Ui, report: &SummaryReport) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(60.0))
        .columns(Column::auto().at_least(90.0), report.columns.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("");
            });
            for col in &report.columns {
                header.col(|ui| {
                    ui.strong(col.name);
                });
            }
        })
        .body(|mut body| {
            body.row(18.0, |mut row| {
                row.col(|ui| {
                    ui.label("count");
                });
                for col in &report.columns {
                    row.col(|ui| {
                        ui.monospace(col.count.to_string());
                    });
                }
            });
            for (label, get) in STATS {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(label);
                    });
                    for col in &report.columns {
                        row.col(|ui| {
                            ui.monospace(format!("{:.4}", get(col)));
                        });
                    }
                });
            }
        });
}
